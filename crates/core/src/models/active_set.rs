use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::account::AccountKey;

/// The accounts currently drawn on the chart.
///
/// The only state that survives a refresh. It changes through exactly two
/// transitions, [`ActiveSet::reconcile`] and [`ActiveSet::toggle`], and is
/// never empty after either one as long as some account exists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActiveSet {
    keys: BTreeSet<AccountKey>,
}

impl ActiveSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with every key of `universe` active.
    pub fn all<I>(universe: I) -> Self
    where
        I: IntoIterator<Item = AccountKey>,
    {
        Self {
            keys: universe.into_iter().collect(),
        }
    }

    /// Align with a freshly observed account universe.
    ///
    /// Keeps the still-existing active keys; if none survive (first run or
    /// every active account disappeared) the whole universe becomes active.
    pub fn reconcile<'a, I>(&mut self, universe: I)
    where
        I: IntoIterator<Item = &'a AccountKey>,
    {
        let universe: BTreeSet<AccountKey> = universe.into_iter().cloned().collect();
        let kept: BTreeSet<AccountKey> = self.keys.intersection(&universe).cloned().collect();
        self.keys = if kept.is_empty() { universe } else { kept };
    }

    /// Flip one key. Removing the last active key is refused: that key
    /// stays as the sole visible series.
    pub fn toggle(&mut self, key: &AccountKey) {
        if self.keys.contains(key) {
            if self.keys.len() > 1 {
                self.keys.remove(key);
            }
        } else {
            self.keys.insert(key.clone());
        }
    }

    /// Value-returning form of [`ActiveSet::reconcile`].
    #[must_use]
    pub fn reconciled<'a, I>(mut self, universe: I) -> Self
    where
        I: IntoIterator<Item = &'a AccountKey>,
    {
        self.reconcile(universe);
        self
    }

    /// Value-returning form of [`ActiveSet::toggle`].
    #[must_use]
    pub fn toggled(mut self, key: &AccountKey) -> Self {
        self.toggle(key);
        self
    }

    #[must_use]
    pub fn contains(&self, key: &AccountKey) -> bool {
        self.keys.contains(key)
    }

    /// A series is drawn at full strength when it is active and either
    /// nothing is hovered or it is the hovered one.
    #[must_use]
    pub fn is_highlighted(&self, key: &AccountKey, hovered: Option<&AccountKey>) -> bool {
        self.contains(key) && hovered.map_or(true, |h| h == key)
    }

    /// Leaderboard cards fade out when inactive or when another account is hovered.
    #[must_use]
    pub fn is_muted(&self, key: &AccountKey, hovered: Option<&AccountKey>) -> bool {
        !self.contains(key) || hovered.is_some_and(|h| h != key)
    }

    #[must_use]
    pub fn keys(&self) -> &BTreeSet<AccountKey> {
        &self.keys
    }

    pub fn iter(&self) -> impl Iterator<Item = &AccountKey> {
        self.keys.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
