//! Admin management handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;
pub use request::*;
pub use response::*;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::state::AppState;

/// Admin routes
pub fn routes() -> Router<AppState> {
    Router::new()
        // Ledger management
        .route("/transactions", get(handler::list_transactions))
        .route("/transactions/manual", post(handler::credit_manual))
        .route(
            "/transactions/{id}",
            get(handler::get_transaction).delete(handler::delete_transaction),
        )
        .route("/transactions/{id}/status", patch(handler::update_status))
        // User management
        .route("/users", get(handler::list_donors).post(handler::create_user))
        .route(
            "/users/{id}",
            get(handler::get_user).delete(handler::delete_user),
        )
}
