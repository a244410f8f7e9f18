//! Access log
//!
//! Sits inside the identity layer, so the resolved caller is on the request.

use axum::{
    body::Body,
    extract::Request,
    http::{HeaderValue, StatusCode},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use uuid::Uuid;

use crate::models::Identity;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Log one line per request and echo its id in `x-request-id`
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let started = Instant::now();
    let request_id = Uuid::new_v4().to_string();
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let caller = request
        .extensions()
        .get::<Identity>()
        .map_or_else(|| "-".to_owned(), |identity| identity.username.clone());

    let mut response = next.run(request).await;
    let status = response.status();
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    // 404s are routine probing noise
    let noteworthy = status.is_server_error()
        || (status.is_client_error() && status != StatusCode::NOT_FOUND);

    if noteworthy {
        tracing::warn!(
            request_id,
            %method,
            path,
            caller,
            status = status.as_u16(),
            elapsed_ms,
            "request failed"
        );
    } else {
        tracing::info!(
            request_id,
            %method,
            path,
            caller,
            status = status.as_u16(),
            elapsed_ms,
            "request served"
        );
    }

    response
}
