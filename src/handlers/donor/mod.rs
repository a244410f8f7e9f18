//! Donor self-service handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;
pub use request::*;
pub use response::*;

use axum::{
    routing::{get, put},
    Router,
};

use crate::state::AppState;

/// Donor routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(handler::get_profile).put(handler::update_profile))
        .route(
            "/transactions",
            get(handler::list_own_transactions).post(handler::submit_pledge),
        )
        .route("/transactions/{id}/proof", put(handler::attach_proof))
}
