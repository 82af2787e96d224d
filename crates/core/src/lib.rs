pub mod errors;
pub mod models;
pub mod providers;
pub mod services;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use models::{
    account::{AccountKey, AccountSeries, AccountTable},
    active_set::ActiveSet,
    aligned::{AlignedPoint, DomainRange, Endpoint, TooltipRow},
    query::CurveQuery,
    settings::EngineConfig,
    snapshot::RawSnapshot,
};
use providers::traits::SnapshotSource;
use services::{
    align_service::{window, AlignService},
    color_service::ColorService,
    domain_service::DomainService,
    endpoint_service::EndpointService,
    label_service::LabelService,
    normalize_service::NormalizeService,
    ranking_service::RankingService,
};

use errors::CoreError;

/// Everything the renderer needs for one refresh.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    /// Chart data, ascending by time (trailing window if configured)
    pub points: Vec<AlignedPoint>,

    /// Y-axis range over the active series
    pub domain: DomainRange,

    /// Leaderboard, best first
    pub ranking: Vec<AccountSeries>,

    /// Terminal marker per account with data
    pub endpoints: BTreeMap<AccountKey, Endpoint>,

    /// Series currently drawn
    pub active: ActiveSet,

    /// Every account in the batch, in stable enumeration order
    pub accounts: AccountTable,

    /// Show every n-th x-axis label
    pub tick_interval: usize,
}

/// The stateless engine: one batch plus the previous active set in, one
/// [`DashboardView`] out.
pub struct ArenaEngine {
    config: EngineConfig,
    normalize_service: NormalizeService,
    align_service: AlignService,
    domain_service: DomainService,
    ranking_service: RankingService,
    endpoint_service: EndpointService,
    label_service: LabelService,
}

impl ArenaEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            normalize_service: NormalizeService::new(),
            align_service: AlignService::new(),
            domain_service: DomainService::from_config(&config),
            ranking_service: RankingService::with_colors(ColorService::from_config(&config)),
            endpoint_service: EndpointService::new(),
            label_service: LabelService::from_config(&config),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Recompute every derived structure from scratch.
    ///
    /// `active` is reconciled against the accounts of this batch. An empty
    /// batch leaves it untouched so a blank poll does not reset the
    /// user's selection.
    #[must_use]
    pub fn compute(&self, batch: &[RawSnapshot], mut active: ActiveSet) -> DashboardView {
        let normalized = self.normalize_service.normalize_batch(batch);
        let accounts = AccountTable::from_points(&normalized);
        let aligned = self.align_service.align(&normalized);
        let points = window(&aligned, self.config.max_points).to_vec();

        if !accounts.is_empty() {
            active.reconcile(&accounts.keys());
        }

        let domain = self.domain(&points, &active);
        let ranking = self.ranking_service.rank(&points, &accounts);
        let endpoints = self.endpoint_service.locate_endpoints(&points);
        let tick_interval = self.label_service.tick_interval(points.len());

        DashboardView {
            points,
            domain,
            ranking,
            endpoints,
            active,
            accounts,
            tick_interval,
        }
    }

    /// Domain over the active series, or over everything when nothing is active.
    #[must_use]
    pub fn domain(&self, points: &[AlignedPoint], active: &ActiveSet) -> DomainRange {
        let filter = (!active.is_empty()).then(|| active.keys());
        self.domain_service.domain(points, filter)
    }

    #[must_use]
    pub fn tooltip(&self, point: &AlignedPoint, accounts: &AccountTable) -> Vec<TooltipRow> {
        self.label_service.tooltip_rows(point, accounts)
    }
}

impl Default for ArenaEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

/// Main entry point: the engine plus the state that outlives a refresh
/// (active set and hovered account).
#[must_use]
pub struct ArenaDashboard {
    engine: ArenaEngine,
    view: DashboardView,
    hovered: Option<AccountKey>,
}

impl std::fmt::Debug for ArenaDashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArenaDashboard")
            .field("points", &self.view.points.len())
            .field("accounts", &self.view.accounts.len())
            .field("active", &self.view.active.len())
            .field("hovered", &self.hovered)
            .finish()
    }
}

impl ArenaDashboard {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            engine: ArenaEngine::new(config),
            view: DashboardView::default(),
            hovered: None,
        }
    }

    /// Build from a JSON engine config.
    pub fn from_config_json(json: &str) -> Result<Self, CoreError> {
        Ok(Self::new(EngineConfig::from_json(json)?))
    }

    // ── Refresh ─────────────────────────────────────────────────────

    /// Replace the view with one computed from `batch`.
    pub fn refresh(&mut self, batch: &[RawSnapshot]) -> &DashboardView {
        let active = std::mem::take(&mut self.view.active);
        self.view = self.engine.compute(batch, active);

        let hovered_gone = self.hovered.as_ref().is_some_and(|key| {
            key.account_id()
                .and_then(|id| self.view.accounts.get(id))
                .is_none()
        });
        if hovered_gone {
            self.hovered = None;
        }
        tracing::debug!(
            "Refreshed: {} points, {} accounts, {} active",
            self.view.points.len(),
            self.view.accounts.len(),
            self.view.active.len()
        );
        &self.view
    }

    /// Pull a batch from `source` and refresh. On failure the previous
    /// view stays in place.
    pub async fn refresh_from(
        &mut self,
        source: &dyn SnapshotSource,
        query: &CurveQuery,
    ) -> Result<&DashboardView, CoreError> {
        let batch = source.fetch_snapshots(query).await?;
        Ok(self.refresh(&batch))
    }

    #[must_use]
    pub fn view(&self) -> &DashboardView {
        &self.view
    }

    // ── Visibility ──────────────────────────────────────────────────

    #[must_use]
    pub fn active_set(&self) -> &ActiveSet {
        &self.view.active
    }

    /// Show or hide one series. The y-axis domain follows the new active set.
    /// Keys for accounts absent from the current batch are ignored.
    pub fn toggle_account(&mut self, key: &AccountKey) -> &DashboardView {
        let known = key
            .account_id()
            .and_then(|id| self.view.accounts.get(id))
            .is_some();
        if !known {
            tracing::debug!("Ignoring toggle for unknown series {key}");
            return &self.view;
        }
        self.view.active.toggle(key);
        self.view.domain = self.engine.domain(&self.view.points, &self.view.active);
        &self.view
    }

    pub fn set_hovered(&mut self, key: Option<AccountKey>) {
        self.hovered = key;
    }

    #[must_use]
    pub fn hovered(&self) -> Option<&AccountKey> {
        self.hovered.as_ref()
    }

    #[must_use]
    pub fn is_highlighted(&self, key: &AccountKey) -> bool {
        self.view.active.is_highlighted(key, self.hovered.as_ref())
    }

    #[must_use]
    pub fn is_muted(&self, key: &AccountKey) -> bool {
        self.view.active.is_muted(key, self.hovered.as_ref())
    }

    // ── Labels ──────────────────────────────────────────────────────

    /// Tooltip rows for the aligned point at `index`, empty when out of range.
    #[must_use]
    pub fn tooltip(&self, index: usize) -> Vec<TooltipRow> {
        self.view
            .points
            .get(index)
            .map(|point| self.engine.tooltip(point, &self.view.accounts))
            .unwrap_or_default()
    }

    /// Serialize the current view for a JS/WASM renderer.
    pub fn view_to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string(&self.view)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize view: {e}")))
    }
}

impl Default for ArenaDashboard {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
