//! Market snapshot routes.

use std::collections::BTreeMap;

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use escalator_common::error::AppError;
use escalator_common::types::{Instrument, Period};
use escalator_engine::pipeline::resolve_indicator;

use crate::state::AppState;
use crate::view::MarketView;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/market", get(default_market))
        .route("/api/market/{period}", get(market_for_period))
}

#[derive(Debug, Deserialize)]
pub struct MarketQuery {
    pub period: Option<String>,
}

/// GET /api/market — Cards for `?period=` (1 month when omitted).
async fn default_market(
    State(state): State<AppState>,
    Query(query): Query<MarketQuery>,
) -> Result<Json<MarketView>, AppError> {
    let period = match query.period {
        Some(code) => code.parse().map_err(AppError::Validation)?,
        None => Period::default(),
    };
    Ok(Json(market_view(&state, period).await))
}

/// GET /api/market/:period — Cards for `1mo`, `3mo`, `6mo`, `ytd` or `1y`.
async fn market_for_period(
    State(state): State<AppState>,
    Path(period): Path<String>,
) -> Result<Json<MarketView>, AppError> {
    let period: Period = period.parse().map_err(AppError::Validation)?;
    Ok(Json(market_view(&state, period).await))
}

async fn market_view(state: &AppState, period: Period) -> MarketView {
    let snapshot = state.provider.fetch(period).await.with_placeholders();
    let no_overrides = BTreeMap::new();
    let indicators: Vec<_> = Instrument::ALL
        .iter()
        .map(|i| resolve_indicator(*i, &snapshot.entries, &no_overrides))
        .collect();
    MarketView::build(&state.locale, period, snapshot.degraded, &indicators)
}
