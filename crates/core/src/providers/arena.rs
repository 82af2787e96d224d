use async_trait::async_trait;
use reqwest::Client;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::query::CurveQuery;
use crate::models::settings::FeedConfig;
use crate::models::snapshot::RawSnapshot;
use super::traits::SnapshotSource;

const PROVIDER: &str = "ArenaApi";

/// Arena backend asset-curve endpoint.
///
/// `GET {base_url}{curve_path}?timeframe=5m&trading_mode=paper` returns a
/// JSON array of snapshots, one per account per bucket.
pub struct ArenaApiSource {
    client: Client,
    url: String,
}

impl ArenaApiSource {
    pub fn new(config: &FeedConfig) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(config.request_timeout_secs));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            url: config.curve_url(),
        }
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for ArenaApiSource {
    fn default() -> Self {
        Self::new(&FeedConfig::default())
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl SnapshotSource for ArenaApiSource {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn fetch_snapshots(&self, query: &CurveQuery) -> Result<Vec<RawSnapshot>, CoreError> {
        let resp = self
            .client
            .get(&self.url)
            .query(&[
                ("timeframe", query.timeframe.as_str()),
                ("trading_mode", query.trading_mode.as_str()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            tracing::warn!("Asset curve request for {} failed: HTTP {status}", query.cache_key());
            return Err(CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("HTTP {status} for {}", query.cache_key()),
            });
        }

        let body = resp.text().await?;
        parse_snapshot_batch(&body)
    }
}

/// Decode an asset-curve payload.
///
/// Malformed JSON is an error. A payload that is valid JSON but not an
/// array is treated as "no data yet". Elements that do not decode as a
/// snapshot are skipped individually.
pub fn parse_snapshot_batch(json: &str) -> Result<Vec<RawSnapshot>, CoreError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let serde_json::Value::Array(items) = value else {
        tracing::warn!("Asset curve payload is not an array, treating as empty");
        return Ok(Vec::new());
    };

    let total = items.len();
    let batch: Vec<RawSnapshot> = items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                tracing::debug!("Skipping undecodable snapshot: {e}");
                None
            }
        })
        .collect();

    if batch.len() < total {
        tracing::debug!("Decoded {} of {total} snapshots", batch.len());
    }
    Ok(batch)
}
