//! Dashboard API: market snapshot cards and the escalation evaluation.
//!
//! Endpoints:
//! - GET  /health
//! - GET  /api/market?period=, /api/market/{period}: indicator cards for a period
//! - GET  /api/escalation/defaults: starting operator inputs
//! - POST /api/escalation: evaluate the whole dashboard

pub mod routes;
pub mod state;
pub mod view;
