use std::collections::BTreeSet;

use crate::models::account::AccountKey;
use crate::models::aligned::{AlignedPoint, DomainRange};
use crate::models::settings::EngineConfig;

/// Derives the padded y-axis range for the visible series.
pub struct DomainService {
    default_domain: DomainRange,
    padding_ratio: f64,
    min_padding: f64,
}

impl DomainService {
    pub fn new() -> Self {
        Self::from_config(&EngineConfig::default())
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        let [min, max] = config.default_domain;
        Self {
            default_domain: DomainRange::new(min, max),
            padding_ratio: config.padding_ratio,
            min_padding: config.min_padding,
        }
    }

    /// Compute the range over every value whose key is in `filter`
    /// (`None` = all accounts).
    ///
    /// Padding is `max(range * ratio, min_padding)` on both sides. The lower
    /// bound is `max(0, min - padding)` only when every visible value is
    /// non-negative. With negative data it is `min - padding`, unclamped, so
    /// no point falls below the axis. Without any finite value the default
    /// domain is returned.
    #[must_use]
    pub fn domain(
        &self,
        points: &[AlignedPoint],
        filter: Option<&BTreeSet<AccountKey>>,
    ) -> DomainRange {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        let visible = points
            .iter()
            .flat_map(|p| p.values.iter())
            .filter(|(key, _)| filter.map_or(true, |f| f.contains(*key)))
            .map(|(_, value)| *value)
            .filter(|value| value.is_finite());
        for value in visible {
            min = min.min(value);
            max = max.max(value);
        }

        if !min.is_finite() || !max.is_finite() {
            return self.default_domain;
        }

        let padding = ((max - min) * self.padding_ratio).max(self.min_padding);
        let lower = if min >= 0.0 {
            (min - padding).max(0.0)
        } else {
            // Clamping would cut off negative data.
            min - padding
        };
        DomainRange::new(lower, max + padding)
    }
}

impl Default for DomainService {
    fn default() -> Self {
        Self::new()
    }
}
