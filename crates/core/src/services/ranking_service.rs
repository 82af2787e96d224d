use crate::models::account::{AccountSeries, AccountTable, LatestSource};
use crate::models::aligned::AlignedPoint;
use crate::services::color_service::ColorService;

/// Builds the leaderboard from the aligned window.
///
/// An account's `latest_value` is its value at the most recent aligned
/// point carrying it. If the window holds no point for the account, the
/// highest value seen across the whole batch is used instead, so a quiet
/// account does not drop to zero.
pub struct RankingService {
    color_service: ColorService,
}

impl RankingService {
    pub fn new() -> Self {
        Self::with_colors(ColorService::new())
    }

    pub fn with_colors(color_service: ColorService) -> Self {
        Self { color_service }
    }

    /// Rank every account of `accounts`: descending `latest_value`, ties by
    /// ascending account id.
    #[must_use]
    pub fn rank(&self, points: &[AlignedPoint], accounts: &AccountTable) -> Vec<AccountSeries> {
        let mut ranking: Vec<AccountSeries> = accounts
            .iter()
            .enumerate()
            .map(|(position, account)| {
                let in_window = points
                    .iter()
                    .rev()
                    .find_map(|p| p.value(&account.account_key));
                let (latest_value, latest_source) = match in_window {
                    Some(value) => (value, LatestSource::InWindow),
                    None => (account.max_value, LatestSource::Fallback),
                };

                let color_index = self
                    .color_service
                    .palette_index(Some(account.account_id), position);

                AccountSeries {
                    account_id: account.account_id,
                    account_key: account.account_key.clone(),
                    display_name: account.display_name.clone(),
                    color_index,
                    color: self.color_service.color_at(color_index).to_string(),
                    latest_value,
                    latest_source,
                }
            })
            .collect();

        ranking.sort_by(|a, b| {
            b.latest_value
                .total_cmp(&a.latest_value)
                .then_with(|| a.account_id.cmp(&b.account_id))
        });
        ranking
    }
}

impl Default for RankingService {
    fn default() -> Self {
        Self::new()
    }
}
