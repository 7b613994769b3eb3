//! Time-windowed snapshot cache.
//!
//! Each period owns its own slot holding the last successful snapshot together
//! with the time it was fetched. A lookup past the entry's TTL misses, and the
//! caller replaces the entry wholesale with a fresh fetch. Slots are locked
//! independently, so a refresh of one period never waits on another.

use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::{Mutex, MutexGuard};

use escalator_common::types::Period;

use crate::snapshot::MarketSnapshot;

/// Default freshness window in seconds (10 minutes).
pub const DEFAULT_TTL_SECONDS: u64 = 600;

/// A cached value with its fetch time and lifetime.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub value: T,
    pub fetched_at: DateTime<Utc>,
    pub ttl: TimeDelta,
}

impl<T> CacheEntry<T> {
    /// Fresh while strictly less than `ttl` has elapsed since the fetch.
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.fetched_at) < self.ttl
    }
}

/// Contents of one period's slot.
pub type Slot = Option<CacheEntry<MarketSnapshot>>;

/// Occupancy counts for monitoring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct CacheStats {
    /// Periods holding a snapshot, fresh or not.
    pub cached: usize,
    /// Periods whose slot is locked by an in-flight refresh.
    pub refreshing: usize,
}

/// Per-period snapshot cache.
pub struct SnapshotCache {
    ttl: TimeDelta,
    slots: [Mutex<Slot>; Period::ALL.len()],
}

impl SnapshotCache {
    pub fn new(ttl: std::time::Duration) -> Self {
        Self {
            ttl: TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX),
            slots: std::array::from_fn(|_| Mutex::new(None)),
        }
    }

    /// Exclusive access to one period's slot.
    pub async fn lock(&self, period: Period) -> MutexGuard<'_, Slot> {
        self.slots[period as usize].lock().await
    }

    /// Snapshot for `period` if one was stored within the TTL.
    pub async fn get(&self, period: Period, now: DateTime<Utc>) -> Option<MarketSnapshot> {
        self.lock(period)
            .await
            .as_ref()
            .filter(|entry| entry.is_fresh(now))
            .map(|entry| entry.value.clone())
    }

    /// Entry stamped with this cache's TTL.
    pub fn entry(&self, snapshot: MarketSnapshot, now: DateTime<Utc>) -> CacheEntry<MarketSnapshot> {
        CacheEntry {
            value: snapshot,
            fetched_at: now,
            ttl: self.ttl,
        }
    }

    /// Store (or replace) the snapshot for `period`.
    pub async fn insert(&self, period: Period, snapshot: MarketSnapshot, now: DateTime<Utc>) {
        *self.lock(period).await = Some(self.entry(snapshot, now));
    }

    /// Non-blocking occupancy read; a slot under refresh counts as refreshing.
    pub fn stats(&self) -> CacheStats {
        self.slots
            .iter()
            .fold(CacheStats::default(), |mut stats, slot| {
                match slot.try_lock() {
                    Ok(guard) if guard.is_some() => stats.cached += 1,
                    Ok(_) => {}
                    Err(_) => stats.refreshing += 1,
                }
                stats
            })
    }
}

impl Default for SnapshotCache {
    fn default() -> Self {
        Self::new(std::time::Duration::from_secs(DEFAULT_TTL_SECONDS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_hit_within_ttl() {
        let cache = SnapshotCache::default();
        let snapshot = MarketSnapshot::degraded(Period::OneMonth).with_placeholders();
        cache.insert(Period::OneMonth, snapshot.clone(), t0()).await;

        let later = t0() + TimeDelta::seconds(599);
        assert_eq!(cache.get(Period::OneMonth, later).await, Some(snapshot));
    }

    #[tokio::test]
    async fn test_miss_after_ttl() {
        let cache = SnapshotCache::default();
        cache
            .insert(Period::OneMonth, MarketSnapshot::degraded(Period::OneMonth), t0())
            .await;

        assert!(cache.get(Period::OneMonth, t0() + TimeDelta::seconds(600)).await.is_none());
        assert_eq!(cache.stats().cached, 1);
    }

    #[tokio::test]
    async fn test_periods_are_independent() {
        let cache = SnapshotCache::new(std::time::Duration::from_secs(60));
        cache
            .insert(Period::OneMonth, MarketSnapshot::degraded(Period::OneMonth), t0())
            .await;

        assert!(cache.get(Period::OneMonth, t0()).await.is_some());
        assert!(cache.get(Period::OneYear, t0()).await.is_none());
    }

    #[tokio::test]
    async fn test_insert_replaces_entry() {
        let cache = SnapshotCache::new(std::time::Duration::from_secs(60));
        cache
            .insert(Period::SixMonths, MarketSnapshot::degraded(Period::SixMonths), t0())
            .await;

        let refreshed = t0() + TimeDelta::seconds(120);
        let replacement = MarketSnapshot::degraded(Period::SixMonths).with_placeholders();
        cache.insert(Period::SixMonths, replacement.clone(), refreshed).await;

        assert_eq!(cache.get(Period::SixMonths, refreshed).await, Some(replacement));
        assert_eq!(cache.stats().cached, 1);
    }

    #[tokio::test]
    async fn test_locked_slot_does_not_block_others() {
        let cache = SnapshotCache::default();
        cache
            .insert(Period::OneMonth, MarketSnapshot::degraded(Period::OneMonth), t0())
            .await;

        let _held = cache.lock(Period::OneYear).await;
        assert!(cache.get(Period::OneMonth, t0()).await.is_some());
        assert_eq!(
            cache.stats(),
            CacheStats {
                cached: 1,
                refreshing: 1
            }
        );
    }
}
