use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Default series palette, indexed by `|account_id| % len`.
pub const DEFAULT_PALETTE: [&str; 8] = [
    "#F0B90B", "#0ECB81", "#F6465D", "#627eea", "#9945ff", "#00B8D9", "#FF9F43", "#8A63D2",
];

/// Color used when no palette entry can be assigned.
pub const DEFAULT_FALLBACK_COLOR: &str = "#7E8494";

/// Y-axis range used when there is nothing to plot.
pub const DEFAULT_DOMAIN: [f64; 2] = [0.0, 100_000.0];

/// Tunables for the alignment / ranking engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Series colors (hex strings)
    pub palette: Vec<String>,

    /// Color for accounts without a palette slot
    pub fallback_color: String,

    /// Y-axis range used when there is nothing to plot
    pub default_domain: [f64; 2],

    /// Fraction of the value range added above and below
    pub padding_ratio: f64,

    /// Minimum padding, keeps a flat series visible
    pub min_padding: f64,

    /// Keep only the trailing N aligned points. `None` keeps everything.
    pub max_points: Option<usize>,

    /// Number of x-axis label divisions
    pub tick_divisions: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            palette: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
            fallback_color: DEFAULT_FALLBACK_COLOR.to_string(),
            default_domain: DEFAULT_DOMAIN,
            padding_ratio: 0.1,
            min_padding: 50.0,
            max_points: None,
            tick_divisions: 8,
        }
    }
}

impl EngineConfig {
    /// Parse a JSON config; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        let [lo, hi] = self.default_domain;
        if !lo.is_finite() || !hi.is_finite() || lo > hi {
            return Err(CoreError::ValidationError(format!(
                "default_domain must be a finite, ordered pair (got [{lo}, {hi}])"
            )));
        }
        if !self.padding_ratio.is_finite() || self.padding_ratio < 0.0 {
            return Err(CoreError::ValidationError(format!(
                "padding_ratio must be a non-negative number (got {})",
                self.padding_ratio
            )));
        }
        if !self.min_padding.is_finite() || self.min_padding < 0.0 {
            return Err(CoreError::ValidationError(format!(
                "min_padding must be a non-negative number (got {})",
                self.min_padding
            )));
        }
        if self.max_points == Some(0) {
            return Err(CoreError::ValidationError(
                "max_points must be at least 1 when set".into(),
            ));
        }
        if self.tick_divisions == 0 {
            return Err(CoreError::ValidationError(
                "tick_divisions must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Where and how often the dashboard pulls asset-curve batches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Arena backend origin, e.g. "http://localhost:8802"
    pub base_url: String,

    /// Path of the asset-curve endpoint
    pub curve_path: String,

    /// Poll cadence for the host scheduler
    pub refresh_interval_secs: u64,

    /// Identical requests inside this window reuse the previous batch
    pub dedup_interval_secs: u64,

    pub request_timeout_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8802".to_string(),
            curve_path: "/api/arena/asset-curve".to_string(),
            refresh_interval_secs: 60,
            dedup_interval_secs: 30,
            request_timeout_secs: 30,
        }
    }
}

impl FeedConfig {
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(CoreError::ValidationError(format!(
                "base_url must start with http:// or https:// (got '{}')",
                self.base_url
            )));
        }
        if !self.curve_path.starts_with('/') {
            return Err(CoreError::ValidationError(format!(
                "curve_path must start with '/' (got '{}')",
                self.curve_path
            )));
        }
        if self.refresh_interval_secs == 0 {
            return Err(CoreError::ValidationError(
                "refresh_interval_secs must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Full endpoint URL without query string.
    #[must_use]
    pub fn curve_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.curve_path)
    }
}
