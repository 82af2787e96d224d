use serde::{Deserialize, Serialize};

/// Which asset curve to request from the arena backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurveQuery {
    /// Bucket size, e.g. "5m", "1h", "1d"
    pub timeframe: String,

    /// Account mode, e.g. "paper"
    pub trading_mode: String,
}

impl CurveQuery {
    pub fn new(timeframe: impl Into<String>, trading_mode: impl Into<String>) -> Self {
        Self {
            timeframe: timeframe.into(),
            trading_mode: trading_mode.into(),
        }
    }

    /// Deduplication key: identical keys share one in-flight window.
    #[must_use]
    pub fn cache_key(&self) -> String {
        format!("asset-curve-{}-{}", self.timeframe, self.trading_mode)
    }
}

impl Default for CurveQuery {
    fn default() -> Self {
        Self::new("5m", "paper")
    }
}
