use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::snapshot::NormalizedPoint;

const KEY_PREFIX: &str = "account_";

/// Stable series key for an account: `account_{id}`.
///
/// Derived only from the account id, so it survives re-ordering of the
/// input batch and repeated refreshes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountKey(String);

impl AccountKey {
    pub fn from_id(account_id: i64) -> Self {
        Self(format!("{KEY_PREFIX}{account_id}"))
    }

    /// Recover the account id. `None` for keys not built by [`AccountKey::from_id`].
    #[must_use]
    pub fn account_id(&self) -> Option<i64> {
        self.0.strip_prefix(KEY_PREFIX)?.parse().ok()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for AccountKey {
    fn from(account_id: i64) -> Self {
        Self::from_id(account_id)
    }
}

/// Which rule produced an account's `latest_value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LatestSource {
    /// Taken from the most recent aligned point carrying the account
    InWindow,
    /// No aligned point carried the account; highest value seen in the batch
    Fallback,
}

/// One leaderboard row / chart series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSeries {
    pub account_id: i64,
    pub account_key: AccountKey,
    pub display_name: String,

    /// Index into the configured palette, `None` when the palette is empty
    pub color_index: Option<usize>,

    /// Resolved display color (palette entry or fallback)
    pub color: String,

    pub latest_value: f64,
    pub latest_source: LatestSource,
}

/// What the batch tells us about one account, independent of any window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountIdentity {
    pub account_id: i64,
    pub account_key: AccountKey,
    pub display_name: String,

    /// Highest value ever observed for this account in the batch
    pub max_value: f64,
}

/// Every account seen in a batch, enumerated by ascending account id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountTable {
    accounts: BTreeMap<i64, AccountIdentity>,
}

impl AccountTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the table from a normalized batch. The display name of the
    /// last record for an account wins.
    pub fn from_points(points: &[NormalizedPoint]) -> Self {
        let mut table = Self::new();
        for point in points {
            table.observe(point.account_id, &point.display_name, point.value);
        }
        table
    }

    /// Record one observation.
    pub fn observe(&mut self, account_id: i64, display_name: &str, value: f64) {
        let entry = self
            .accounts
            .entry(account_id)
            .or_insert_with(|| AccountIdentity {
                account_id,
                account_key: AccountKey::from_id(account_id),
                display_name: display_name.to_string(),
                max_value: value,
            });
        entry.display_name = display_name.to_string();
        if value > entry.max_value {
            entry.max_value = value;
        }
    }

    #[must_use]
    pub fn get(&self, account_id: i64) -> Option<&AccountIdentity> {
        self.accounts.get(&account_id)
    }

    /// Accounts in their stable enumeration order (ascending id).
    pub fn iter(&self) -> impl Iterator<Item = &AccountIdentity> {
        self.accounts.values()
    }

    /// Keys of every known account, the universe for active-set reconciliation.
    #[must_use]
    pub fn keys(&self) -> Vec<AccountKey> {
        self.accounts.values().map(|a| a.account_key.clone()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}
