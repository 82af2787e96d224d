use crate::models::account::AccountTable;
use crate::models::aligned::{AlignedPoint, TooltipRow};
use crate::models::settings::EngineConfig;
use crate::services::color_service::ColorService;

/// Text shown on the chart and leaderboard: marker initials, card badges,
/// dollar amounts, tooltip rows and the x-axis label spacing.
pub struct LabelService {
    color_service: ColorService,
    tick_divisions: usize,
}

impl LabelService {
    pub fn new() -> Self {
        Self::from_config(&EngineConfig::default())
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            color_service: ColorService::from_config(config),
            tick_divisions: config.tick_divisions.max(1),
        }
    }

    /// Show every n-th x-axis label: `len / divisions` (0 = every label).
    #[must_use]
    pub fn tick_interval(&self, len: usize) -> usize {
        len / self.tick_divisions
    }

    /// Rows for the accounts present at `point`, in account-table order.
    #[must_use]
    pub fn tooltip_rows(&self, point: &AlignedPoint, accounts: &AccountTable) -> Vec<TooltipRow> {
        accounts
            .iter()
            .enumerate()
            .filter_map(|(position, account)| {
                let value = point.value(&account.account_key)?;
                Some(TooltipRow {
                    account_key: account.account_key.clone(),
                    display_name: account.display_name.clone(),
                    color: self
                        .color_service
                        .color_for(Some(account.account_id), position)
                        .to_string(),
                    value,
                })
            })
            .collect()
    }
}

impl Default for LabelService {
    fn default() -> Self {
        Self::new()
    }
}

/// Up to three uppercase initials for the end-of-line marker, "A" if none.
#[must_use]
pub fn initials(name: &str) -> String {
    let initials: String = name
        .split(' ')
        .filter_map(|part| part.chars().next())
        .flat_map(char::to_uppercase)
        .take(3)
        .collect();
    if initials.is_empty() {
        "A".to_string()
    } else {
        initials
    }
}

/// First two characters, uppercased, for the leaderboard avatar.
#[must_use]
pub fn badge(name: &str) -> String {
    name.chars().take(2).flat_map(char::to_uppercase).collect()
}

/// `$1,234.56`. Non-finite values render as `--`.
#[must_use]
pub fn format_usd(value: f64) -> String {
    if !value.is_finite() {
        return "--".to_string();
    }
    let cents = (value.abs() * 100.0).round() as u128;
    let whole = (cents / 100).to_string();
    let frac = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${grouped}.{frac:02}")
}
