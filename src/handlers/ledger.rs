//! Public ledger handler

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::{
    error::AppResult,
    middleware::CurrentIdentity,
    services::{aggregator::PublicLedgerEntry, LedgerService},
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct PublicLedgerResponse {
    pub entries: Vec<PublicLedgerEntry>,
}

/// Recent approved donations, private donors anonymized
async fn public_ledger(
    State(state): State<AppState>,
    identity: CurrentIdentity,
) -> AppResult<Json<PublicLedgerResponse>> {
    let entries = LedgerService::public_ledger(state.transactions(), identity.as_ref()).await?;
    Ok(Json(PublicLedgerResponse { entries }))
}

/// Ledger routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/public", get(public_ledger))
}
