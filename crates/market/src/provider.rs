use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use escalator_common::types::Period;

use crate::cache::{CacheStats, SnapshotCache};
use crate::snapshot::MarketSnapshot;
use crate::source::MarketDataSource;

/// Fronts a `MarketDataSource` with the per-period snapshot cache and the
/// degraded-mode fallback.
pub struct MarketSnapshotProvider {
    source: Arc<dyn MarketDataSource>,
    cache: SnapshotCache,
}

impl MarketSnapshotProvider {
    pub fn new(source: Arc<dyn MarketDataSource>, ttl: Duration) -> Self {
        Self {
            source,
            cache: SnapshotCache::new(ttl),
        }
    }

    /// Snapshot for `period`, served from cache when fresh.
    ///
    /// Never fails: a source error yields a degraded, empty snapshot which is
    /// not cached, so the next call retries the source.
    pub async fn fetch(&self, period: Period) -> MarketSnapshot {
        self.fetch_at(period, Utc::now()).await
    }

    /// `fetch` against an explicit clock reading.
    pub async fn fetch_at(&self, period: Period, now: DateTime<Utc>) -> MarketSnapshot {
        // Only this period's slot is held across the fetch, so concurrent misses
        // for it fetch once while other periods keep serving
        let mut slot = self.cache.lock(period).await;

        if let Some(entry) = slot.as_ref().filter(|entry| entry.is_fresh(now)) {
            tracing::debug!(period = %period, "Market snapshot served from cache");
            return entry.value.clone();
        }

        match self.source.close_series(period).await {
            Ok(series) => {
                let snapshot = MarketSnapshot::from_series(period, &series);
                tracing::info!(
                    period = %period,
                    source = self.source.name(),
                    instruments = series.len(),
                    "Market snapshot refreshed"
                );
                *slot = Some(self.cache.entry(snapshot.clone(), now));
                snapshot
            }
            Err(e) => {
                tracing::warn!(
                    period = %period,
                    source = self.source.name(),
                    error = %e,
                    "Market data unavailable, entering degraded mode"
                );
                MarketSnapshot::degraded(period)
            }
        }
    }

    /// Cache occupancy, read without waiting on in-flight refreshes.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
