//! The [`LoadService`] facade: cached reads and invalidating writes
//! for the `/celulose` resource.

use celulog_client::{ApiError, CelluloseClient};
use celulog_core::{DailySummary, Load, LoadDraft, LoadFilter};
use tracing::info;

use crate::cache::{CachedQuery, KeyedQuery, QueryStatus, RetryPolicy};

/// Retry budget for history searches. Reads of the latest/day views
/// fail fast instead; they are cheap to re-issue by hand.
pub const SEARCH_RETRIES: u32 = 3;

/// Names for the cached read views. Mutations list the keys they
/// outdate; anything not listed keeps serving its cached value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKey {
    Latest,
    DaySummary,
    Filtered,
}

/// Cached front door to the cellulose API.
///
/// The filtered view never fetches on its own: a search runs only when
/// a caller hands [`LoadService::filtered`] a concrete filter, and each
/// distinct filter caches separately.
pub struct LoadService {
    api: CelluloseClient,
    latest: CachedQuery<Vec<Load>>,
    summary: CachedQuery<Vec<DailySummary>>,
    filtered: KeyedQuery<LoadFilter, Vec<Load>>,
}

impl LoadService {
    pub fn new(api: CelluloseClient) -> Self {
        Self {
            api,
            latest: CachedQuery::new("latest", RetryPolicy::none()),
            summary: CachedQuery::new("day_summary", RetryPolicy::none()),
            filtered: KeyedQuery::new("filtered", RetryPolicy::transient(SEARCH_RETRIES)),
        }
    }

    pub fn client(&self) -> &CelluloseClient {
        &self.api
    }

    // ── Reads ───────────────────────────────────────────────────────

    /// Most recent loads, cached until a mutation invalidates them.
    pub async fn latest(&self) -> Result<Vec<Load>, ApiError> {
        self.latest.get_or_fetch(|| self.api.latest()).await
    }

    /// Today's per-material totals, cached like `latest`.
    pub async fn day_summary(&self) -> Result<Vec<DailySummary>, ApiError> {
        self.summary.get_or_fetch(|| self.api.day_summary()).await
    }

    /// Search the history. Transient failures retry up to
    /// [`SEARCH_RETRIES`] times before surfacing.
    pub async fn filtered(&self, filter: &LoadFilter) -> Result<Vec<Load>, ApiError> {
        self.filtered
            .get_or_fetch(filter, || self.api.filtered(filter))
            .await
    }

    /// Last results for `filter` without going to the network.
    pub async fn cached_filtered(&self, filter: &LoadFilter) -> Option<Vec<Load>> {
        self.filtered.cached(filter).await
    }

    // ── Mutations ───────────────────────────────────────────────────

    /// Register a new load, then invalidate `invalidate`. A failed
    /// request leaves every cache untouched.
    pub async fn create(
        &self,
        draft: &LoadDraft,
        invalidate: &[QueryKey],
    ) -> Result<LoadDraft, ApiError> {
        let created = self.api.create(draft).await?;
        info!(material = %draft.material, operator = %draft.operator, "load registered");
        self.invalidate(invalidate).await;
        Ok(created)
    }

    /// Replace an existing load, then invalidate `invalidate`.
    pub async fn update(
        &self,
        draft: &LoadDraft,
        invalidate: &[QueryKey],
    ) -> Result<LoadDraft, ApiError> {
        let updated = self.api.update(draft).await?;
        info!(
            id = draft.id.as_deref().unwrap_or_default(),
            "load updated"
        );
        self.invalidate(invalidate).await;
        Ok(updated)
    }

    /// Remove a load, then invalidate `invalidate`.
    pub async fn delete(&self, id: &str, invalidate: &[QueryKey]) -> Result<(), ApiError> {
        self.api.delete(id).await?;
        info!(id, "load removed");
        self.invalidate(invalidate).await;
        Ok(())
    }

    // ── Cache control ───────────────────────────────────────────────

    /// Mark the listed views stale. Each refetches exactly once, on
    /// its next read.
    pub async fn invalidate(&self, keys: &[QueryKey]) {
        for key in keys {
            match key {
                QueryKey::Latest => self.latest.invalidate().await,
                QueryKey::DaySummary => self.summary.invalidate().await,
                QueryKey::Filtered => self.filtered.invalidate_all().await,
            }
        }
    }

    /// The manual refresh button: outdate both main-page views.
    pub async fn refresh(&self) {
        self.invalidate(&[QueryKey::Latest, QueryKey::DaySummary]).await;
    }

    pub async fn status(&self, key: QueryKey) -> QueryStatus {
        match key {
            QueryKey::Latest => self.latest.status().await,
            QueryKey::DaySummary => self.summary.status().await,
            QueryKey::Filtered => self.filtered.status().await,
        }
    }
}
