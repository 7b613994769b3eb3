//! Escalation evaluation routes.

use std::collections::BTreeMap;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use escalator_common::types::{Instrument, Period};
use escalator_engine::basket::Weights;
use escalator_engine::pipeline::{EscalationInputs, FuelPrice, InflationInputs, evaluate};

use crate::state::AppState;
use crate::view::{DashboardView, PRINCIPAL_HINT, PrincipalView};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/escalation/defaults", get(defaults))
        .route("/api/escalation", post(evaluate_dashboard))
}

/// Operator inputs for one dashboard evaluation. Every field is optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EscalationRequest {
    pub period: Period,
    /// Contract amount as typed, e.g. "1.250.000,50"
    pub principal: String,
    /// Percentages for instruments the snapshot has no current value for
    pub manual_overrides: BTreeMap<Instrument, f64>,
    pub inflation: InflationInputs,
    pub gasoline: FuelPrice,
    pub diesel: FuelPrice,
    pub weights: Weights,
}

impl Default for EscalationRequest {
    fn default() -> Self {
        Self {
            period: Period::OneMonth,
            principal: "100.000,00".to_string(),
            manual_overrides: BTreeMap::new(),
            inflation: InflationInputs::default(),
            gasoline: FuelPrice {
                old_price: 42.0,
                new_price: 44.0,
            },
            diesel: FuelPrice {
                old_price: 43.0,
                new_price: 45.0,
            },
            weights: Weights::dashboard_default(),
        }
    }
}

/// GET /api/escalation/defaults — The inputs a fresh dashboard starts with.
async fn defaults() -> Json<EscalationRequest> {
    Json(EscalationRequest::default())
}

/// POST /api/escalation — Evaluate the dashboard for the given inputs.
///
/// An unparsable principal falls back to zero, and a weight sum other than 100
/// or an out-of-range figure returns a banner in place of the summary. All of
/// these are 200 responses carrying the market cards.
async fn evaluate_dashboard(
    State(state): State<AppState>,
    Json(req): Json<EscalationRequest>,
) -> Json<DashboardView> {
    let principal = parse_principal(&state, &req.principal);
    let snapshot = state.provider.fetch(req.period).await.with_placeholders();

    let inputs = EscalationInputs {
        principal: principal.value,
        market: snapshot.entries,
        manual_overrides: req.manual_overrides,
        inflation: req.inflation,
        gasoline: req.gasoline,
        diesel: req.diesel,
        weights: req.weights,
    };

    let report = evaluate(&inputs);

    tracing::info!(
        period = %req.period,
        degraded = snapshot.degraded,
        weight_total = report.weight_total,
        "Dashboard evaluated"
    );

    Json(DashboardView::build(
        &state.locale,
        &state.config.currency_label,
        req.period,
        snapshot.degraded,
        principal,
        &report,
    ))
}

fn parse_principal(state: &AppState, input: &str) -> PrincipalView {
    let (value, error) = match state.locale.parse_amount(input) {
        Ok(value) => (value, None),
        Err(e) => {
            tracing::warn!(input, error = %e, "Principal rejected, using zero");
            (Decimal::ZERO, Some(format!("{}: {}", PRINCIPAL_HINT, e)))
        }
    };
    PrincipalView {
        input: input.to_string(),
        value,
        formatted: state.locale.format_amount(value),
        error,
    }
}
