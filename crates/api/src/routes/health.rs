//! Health check endpoint.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// GET /health — Liveness plus snapshot cache occupancy.
///
/// Reads the cache without waiting, so a slow market refresh shows up as
/// `refreshing` rather than stalling the check.
async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    let cache = state.provider.cache_stats();
    Json(json!({
        "status": "ok",
        "service": "escalator-api",
        "version": env!("CARGO_PKG_VERSION"),
        "market_cache": {
            "cached_periods": cache.cached,
            "refreshing_periods": cache.refreshing,
            "ttl_secs": state.config.market_cache_ttl_secs,
        }
    }))
}
