use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// One raw equity observation as delivered by the arena backend.
///
/// Any of the three time fields may be missing; a record without all three
/// is unusable and gets dropped by the normalizer. Wire names follow the
/// backend (`datetime_str`, `date`, `username`), camelCase aliases are
/// accepted too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSnapshot {
    /// Epoch timestamp, in seconds or milliseconds
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub timestamp: Option<f64>,

    /// ISO-8601 date-time string
    #[serde(default, rename = "datetime_str", alias = "isoTime")]
    pub iso_time: Option<String>,

    /// Free-form date label (e.g. "2024-01-01")
    #[serde(default, rename = "date", alias = "dateLabel")]
    pub date_label: Option<String>,

    /// Competing account this snapshot belongs to
    #[serde(alias = "accountId")]
    pub account_id: i64,

    /// Total equity (cash + positions). Invalid input decodes to 0.
    #[serde(default, alias = "totalAssets", deserialize_with = "lenient_amount")]
    pub total_assets: f64,

    /// Human-readable account name
    #[serde(default, rename = "username", alias = "displayName")]
    pub display_name: Option<String>,
}

impl RawSnapshot {
    /// Snapshot keyed by an ISO time string.
    pub fn at_iso(iso_time: impl Into<String>, account_id: i64, total_assets: f64) -> Self {
        Self {
            timestamp: None,
            iso_time: Some(iso_time.into()),
            date_label: None,
            account_id,
            total_assets,
            display_name: None,
        }
    }

    /// Snapshot keyed by an epoch timestamp.
    pub fn at_epoch(timestamp: f64, account_id: i64, total_assets: f64) -> Self {
        Self {
            timestamp: Some(timestamp),
            iso_time: None,
            date_label: None,
            account_id,
            total_assets,
            display_name: None,
        }
    }

    /// Attach a display name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }
}

/// Accept a number or a numeric string; everything else becomes 0.
fn lenient_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(number_from_value(&value).unwrap_or(0.0))
}

/// Accept a number or numeric string; anything else means "no timestamp".
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(number_from_value(&value))
}

fn number_from_value(value: &serde_json::Value) -> Option<f64> {
    let n = match value {
        serde_json::Value::Number(n) => n.as_f64()?,
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Canonical record produced by the normalizer. `value` is always finite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPoint {
    /// Grouping key: ISO time, else date label, else stringified timestamp
    pub time_key: String,

    /// `MM/DD, HH:MM` rendering of `instant`, or the raw key
    pub display_time: String,

    /// Instant parsed from the field that produced `time_key`
    #[serde(default)]
    pub instant: Option<DateTime<Utc>>,

    pub account_id: i64,

    pub value: f64,

    /// Display name, defaulted to "Account {id}"
    pub display_name: String,
}
