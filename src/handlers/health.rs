//! Liveness check

use axum::{routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub checked_at: DateTime<Utc>,
}

/// Postgres and Redis are checked once at startup, not per request
async fn liveness() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        checked_at: Utc::now(),
    })
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(liveness))
}
