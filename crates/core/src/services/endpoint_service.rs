use std::collections::BTreeMap;

use crate::models::account::AccountKey;
use crate::models::aligned::{AlignedPoint, Endpoint};

/// Finds where each series ends, for the terminal marker and value label.
pub struct EndpointService;

impl EndpointService {
    pub fn new() -> Self {
        Self
    }

    /// One pass over the series: the last `(index, value)` per account key.
    /// Accounts without any point get no entry.
    #[must_use]
    pub fn locate_endpoints(&self, points: &[AlignedPoint]) -> BTreeMap<AccountKey, Endpoint> {
        let mut endpoints = BTreeMap::new();
        for (index, point) in points.iter().enumerate() {
            for (key, value) in &point.values {
                endpoints.insert(key.clone(), Endpoint { index, value: *value });
            }
        }
        endpoints
    }

    /// Endpoint of a single series.
    #[must_use]
    pub fn endpoint_for(&self, points: &[AlignedPoint], key: &AccountKey) -> Option<Endpoint> {
        points
            .iter()
            .enumerate()
            .rev()
            .find_map(|(index, p)| p.value(key).map(|value| Endpoint { index, value }))
    }
}

impl Default for EndpointService {
    fn default() -> Self {
        Self::new()
    }
}
