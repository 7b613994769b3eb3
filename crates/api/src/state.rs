//! Shared application state for the Axum API server.

use std::sync::Arc;

use escalator_common::config::AppConfig;
use escalator_common::locale::LocaleFormat;
use escalator_market::MarketSnapshotProvider;

/// Application state shared across all route handlers via Axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<MarketSnapshotProvider>,
    pub config: AppConfig,
    pub locale: LocaleFormat,
}

impl AppState {
    pub fn new(provider: Arc<MarketSnapshotProvider>, config: AppConfig) -> Self {
        Self {
            provider,
            config,
            locale: LocaleFormat::TURKISH,
        }
    }
}
