use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::account::AccountKey;
use super::settings::DEFAULT_DOMAIN;

/// One time bucket of the synchronized chart.
///
/// `values` only holds accounts that actually reported at this instant.
/// A missing key means "no data", never zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedPoint {
    pub time_key: String,
    pub display_time: String,
    pub values: BTreeMap<AccountKey, f64>,
}

impl AlignedPoint {
    #[must_use]
    pub fn value(&self, key: &AccountKey) -> Option<f64> {
        self.values.get(key).copied()
    }

    #[must_use]
    pub fn contains(&self, key: &AccountKey) -> bool {
        self.values.contains_key(key)
    }
}

/// Padded y-axis range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DomainRange {
    pub min: f64,
    pub max: f64,
}

impl DomainRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

impl Default for DomainRange {
    fn default() -> Self {
        let [min, max] = DEFAULT_DOMAIN;
        Self { min, max }
    }
}

impl From<DomainRange> for [f64; 2] {
    fn from(range: DomainRange) -> Self {
        [range.min, range.max]
    }
}

/// Last data-bearing point of a series, used for the terminal marker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Index into the aligned point sequence
    pub index: usize,
    pub value: f64,
}

/// One line of the hover tooltip for an aligned point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipRow {
    pub account_key: AccountKey,
    pub display_name: String,
    pub color: String,
    pub value: f64,
}
