use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::models::snapshot::{NormalizedPoint, RawSnapshot};

/// Naive date-time layouts accepted for ISO-ish time strings (read as UTC).
const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Epoch strings longer than this are milliseconds, shorter ones seconds.
const EPOCH_SECONDS_MAX_LEN: usize = 10;

/// Chart label layout: `01/31, 14:05`.
const DISPLAY_FORMAT: &str = "%m/%d, %H:%M";

/// Turns raw backend snapshots into canonical [`NormalizedPoint`]s.
///
/// Per-record and side-effect free. A snapshot without a usable time
/// field is skipped; a bad amount has already been coerced to 0 while
/// decoding.
pub struct NormalizeService;

impl NormalizeService {
    pub fn new() -> Self {
        Self
    }

    /// Normalize one snapshot, or `None` when it has no usable time field.
    #[must_use]
    pub fn normalize(&self, raw: &RawSnapshot) -> Option<NormalizedPoint> {
        let iso_time = non_blank(raw.iso_time.as_deref());
        let date_label = non_blank(raw.date_label.as_deref());
        let timestamp = raw.timestamp.filter(|t| t.is_finite());

        // The epoch rule only applies to the timestamp field: a numeric
        // date label such as "20240102" stays unparseable.
        let (time_key, instant) = if let Some(iso) = iso_time {
            (iso.to_string(), parse_iso(iso))
        } else if let Some(label) = date_label {
            (label.to_string(), parse_iso(label))
        } else {
            let ts = timestamp?;
            (stringify_timestamp(ts), epoch_to_instant(ts))
        };
        let display_time = match instant {
            Some(dt) => format_display_time(dt),
            None => time_key.clone(),
        };

        let value = if raw.total_assets.is_finite() {
            raw.total_assets
        } else {
            0.0
        };
        let display_name = match non_blank(raw.display_name.as_deref()) {
            Some(name) => name.to_string(),
            None => format!("Account {}", raw.account_id),
        };

        Some(NormalizedPoint {
            time_key,
            display_time,
            instant,
            account_id: raw.account_id,
            value,
            display_name,
        })
    }

    /// Normalize a whole batch, dropping unusable records.
    #[must_use]
    pub fn normalize_batch(&self, batch: &[RawSnapshot]) -> Vec<NormalizedPoint> {
        let points: Vec<NormalizedPoint> =
            batch.iter().filter_map(|raw| self.normalize(raw)).collect();
        let dropped = batch.len() - points.len();
        if dropped > 0 {
            tracing::debug!("Dropped {dropped} of {} snapshots without a time field", batch.len());
        }
        points
    }
}

impl Default for NormalizeService {
    fn default() -> Self {
        Self::new()
    }
}

// ── Time helpers ────────────────────────────────────────────────────

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

/// Parse RFC 3339, a naive ISO date-time (taken as UTC) or a bare date.
#[must_use]
pub fn parse_iso(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Epoch number to instant, using the printed length to tell seconds from
/// milliseconds.
#[must_use]
pub fn epoch_to_instant(timestamp: f64) -> Option<DateTime<Utc>> {
    if !timestamp.is_finite() {
        return None;
    }
    let millis = if stringify_timestamp(timestamp).len() > EPOCH_SECONDS_MAX_LEN {
        timestamp
    } else {
        timestamp * 1000.0
    };
    let millis = millis.round();
    if millis < i64::MIN as f64 || millis > i64::MAX as f64 {
        return None;
    }
    DateTime::from_timestamp_millis(millis as i64)
}

/// Render a timestamp the way it is used as a grouping key: integral values
/// without a fractional part.
#[must_use]
pub fn stringify_timestamp(timestamp: f64) -> String {
    if timestamp.fract() == 0.0 && timestamp.abs() < 1e15 {
        format!("{}", timestamp as i64)
    } else {
        format!("{timestamp}")
    }
}

#[must_use]
pub fn format_display_time(instant: DateTime<Utc>) -> String {
    instant.format(DISPLAY_FORMAT).to_string()
}
