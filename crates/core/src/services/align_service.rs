use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use crate::models::account::AccountKey;
use crate::models::aligned::AlignedPoint;
use crate::models::snapshot::{NormalizedPoint, RawSnapshot};
use crate::services::normalize_service::NormalizeService;

/// Groups normalized snapshots into ordered, deduplicated time buckets.
///
/// - one [`AlignedPoint`] per distinct time key
/// - a later `(account, time key)` pair overwrites an earlier one
/// - buckets with a resolved instant (taken from their first point) sort
///   ascending by instant, equal instants keep first-seen order
/// - buckets without one follow, in first-seen order
pub struct AlignService {
    normalize_service: NormalizeService,
}

struct Bucket<'a> {
    time_key: &'a str,
    display_time: &'a str,
    instant: Option<DateTime<Utc>>,
    values: BTreeMap<AccountKey, f64>,
}

impl AlignService {
    pub fn new() -> Self {
        Self {
            normalize_service: NormalizeService::new(),
        }
    }

    /// Normalize a raw batch, then align it.
    #[must_use]
    pub fn align_snapshots(&self, batch: &[RawSnapshot]) -> Vec<AlignedPoint> {
        let points = self.normalize_service.normalize_batch(batch);
        self.align(&points)
    }

    #[must_use]
    pub fn align(&self, points: &[NormalizedPoint]) -> Vec<AlignedPoint> {
        let mut buckets: Vec<Bucket<'_>> = Vec::new();
        let mut by_key: HashMap<&str, usize> = HashMap::new();

        for point in points {
            let idx = match by_key.get(point.time_key.as_str()) {
                Some(&idx) => idx,
                None => {
                    buckets.push(Bucket {
                        time_key: &point.time_key,
                        display_time: &point.display_time,
                        instant: point.instant,
                        values: BTreeMap::new(),
                    });
                    by_key.insert(&point.time_key, buckets.len() - 1);
                    buckets.len() - 1
                }
            };
            buckets[idx]
                .values
                .insert(AccountKey::from_id(point.account_id), point.value);
        }

        // `sort_by` is stable, so first-seen order breaks every tie.
        buckets.sort_by(|a, b| match (a.instant, b.instant) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });

        buckets
            .into_iter()
            .map(|bucket| AlignedPoint {
                time_key: bucket.time_key.to_string(),
                display_time: bucket.display_time.to_string(),
                values: bucket.values,
            })
            .collect()
    }
}

impl Default for AlignService {
    fn default() -> Self {
        Self::new()
    }
}

/// The trailing `max_points` aligned points. `None` keeps the whole series.
#[must_use]
pub fn window(points: &[AlignedPoint], max_points: Option<usize>) -> &[AlignedPoint] {
    match max_points {
        Some(n) if n < points.len() => &points[points.len() - n..],
        _ => points,
    }
}
