//! HTTP Request Handlers
//!
//! This module contains all HTTP request handlers organized by domain.
//! Handlers stay thin: they pull the caller's identity from the request and
//! hand it to the services, which apply the access policy.

pub mod admin;
pub mod auth;
pub mod donor;
pub mod health;
pub mod ledger;

use axum::{middleware, Router};

use crate::{
    constants::API_BASE_PATH,
    middleware::{identity_middleware, logging_middleware},
    state::AppState,
};

/// Create all API routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .nest("/auth", auth::routes())
        .nest("/donor", donor::routes())
        .nest("/ledger", ledger::routes())
        .nest("/admin", admin::routes())
}

/// Versioned API with identity resolution and request logging applied
pub fn app(state: AppState) -> Router {
    Router::new()
        .nest(API_BASE_PATH, routes())
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn_with_state(state.clone(), identity_middleware))
        .with_state(state)
}
