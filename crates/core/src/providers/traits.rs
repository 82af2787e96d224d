use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::query::CurveQuery;
use crate::models::snapshot::RawSnapshot;

/// Anything that can deliver a batch of raw equity snapshots.
///
/// The HTTP backend, the dedup wrapper and test mocks all implement this,
/// so the dashboard never depends on a concrete transport.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait SnapshotSource: Send + Sync {
    /// Human-readable name of this source (for logs/errors).
    fn name(&self) -> &str;

    /// Fetch the current asset-curve batch for `query`.
    async fn fetch_snapshots(&self, query: &CurveQuery) -> Result<Vec<RawSnapshot>, CoreError>;
}
