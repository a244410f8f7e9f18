//! Donor registration and token sessions
//!
//! Access tokens are short-lived JWTs; refresh tokens rotate on every use.

mod handler;
pub mod request;
pub mod response;

pub use request::*;
pub use response::*;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    let sessions = Router::new()
        .route("/login", post(handler::login))
        .route("/refresh", post(handler::rotate_session))
        .route("/logout", post(handler::logout));

    Router::new()
        .route("/register", post(handler::register))
        .route("/me", get(handler::current_user))
        .merge(sessions)
}
