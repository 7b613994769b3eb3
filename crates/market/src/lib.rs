//! Market snapshot provider: fetches close-price series for the tracked
//! instruments, turns them into period snapshots and caches each period for a
//! fixed window.

pub mod cache;
pub mod provider;
pub mod snapshot;
pub mod source;

pub use cache::CacheStats;
pub use provider::MarketSnapshotProvider;
pub use snapshot::MarketSnapshot;
pub use source::{MarketDataSource, MarketError, PriceSeries, YahooChartSource};
