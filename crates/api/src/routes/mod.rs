pub mod escalation;
pub mod health;
pub mod market;

use axum::Router;

use escalator_common::error::AppError;

use crate::state::AppState;

/// Build the complete API router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(market::router())
        .merge(escalation::router())
        .fallback(not_found)
        .with_state(state)
}

async fn not_found() -> AppError {
    AppError::NotFound("No such route".to_string())
}
