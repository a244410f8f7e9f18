//! Identity middleware
//!
//! Decodes `Authorization: Bearer <jwt>` into an [`Identity`] request
//! extension. Requests without a usable token pass through with no identity;
//! whether that is acceptable is decided by the access policy in the service
//! layer, never here.

use std::convert::Infallible;

use axum::{
    body::Body,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::{models::Identity, services::AuthService, state::AppState};

/// The caller's identity, if the request carried a valid token
#[derive(Debug, Clone)]
pub struct CurrentIdentity(pub Option<Identity>);

impl CurrentIdentity {
    pub fn as_ref(&self) -> Option<&Identity> {
        self.0.as_ref()
    }
}

impl<S> FromRequestParts<S> for CurrentIdentity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(CurrentIdentity(parts.extensions.get::<Identity>().cloned()))
    }
}

fn bearer_token(request: &Request<Body>) -> Option<&str> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Attach an [`Identity`] to the request when a valid token is present
pub async fn identity_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let identity = bearer_token(&request).and_then(|token| {
        match AuthService::verify_token(token, &state.config().jwt.secret)
            .map(|claims| claims.identity())
        {
            Ok(identity) => Some(identity),
            Err(e) => {
                debug!(path = %request.uri().path(), error = %e, "Ignoring unusable bearer token");
                None
            }
        }
    });

    if let Some(identity) = identity {
        debug!(user_id = %identity.id, role = %identity.role, "Request authenticated");
        request.extensions_mut().insert(identity);
    }

    next.run(request).await
}
