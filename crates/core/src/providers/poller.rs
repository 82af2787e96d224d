use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

use crate::errors::CoreError;
use crate::models::query::CurveQuery;
use crate::models::settings::FeedConfig;
use crate::models::snapshot::RawSnapshot;
use super::traits::SnapshotSource;

/// Wraps a source and collapses repeated requests.
///
/// A query whose `cache_key` was fetched less than `interval` ago is
/// answered from the previous batch without touching the inner source.
/// Failed fetches are not cached.
pub struct DedupingSource<S> {
    inner: S,
    interval: Duration,
    recent: Mutex<HashMap<String, (DateTime<Utc>, Vec<RawSnapshot>)>>,
}

impl<S: SnapshotSource> DedupingSource<S> {
    pub fn new(inner: S, interval: Duration) -> Self {
        Self {
            inner,
            interval,
            recent: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(inner: S, config: &FeedConfig) -> Self {
        let secs = i64::try_from(config.dedup_interval_secs).unwrap_or(i64::MAX);
        Self::new(inner, Duration::try_seconds(secs).unwrap_or(Duration::MAX))
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Forget the cached batch for one query so the next call refetches.
    pub fn invalidate(&self, query: &CurveQuery) {
        self.lock().remove(&query.cache_key());
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, (DateTime<Utc>, Vec<RawSnapshot>)>> {
        // A panic while holding the lock cannot leave the map half-written.
        self.recent.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl<S: SnapshotSource> SnapshotSource for DedupingSource<S> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn fetch_snapshots(&self, query: &CurveQuery) -> Result<Vec<RawSnapshot>, CoreError> {
        let key = query.cache_key();
        {
            let recent = self.lock();
            if let Some((fetched_at, batch)) = recent.get(&key) {
                if Utc::now() - *fetched_at < self.interval {
                    tracing::debug!("Reusing {key} batch fetched at {fetched_at}");
                    return Ok(batch.clone());
                }
            }
        }

        let batch = self.inner.fetch_snapshots(query).await?;
        self.lock().insert(key, (Utc::now(), batch.clone()));
        Ok(batch)
    }
}
