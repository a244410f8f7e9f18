use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    middleware::CurrentIdentity,
    services::{AccessPolicy, AuthService, UserService},
    state::AppState,
};

use super::{
    request::{LoginRequest, LogoutRequest, RefreshTokenRequest, RegisterRequest},
    response::{AccountResponse, AuthResponse, MessageResponse, TokenResponse},
};

/// Self-registration; always creates a donor
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<AccountResponse>)> {
    let Json(payload) = payload?;
    let user = UserService::register(state.users(), payload.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(AccountResponse::new(user).with_message("Registration successful")),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<AuthResponse>> {
    let Json(payload) = payload?;
    payload.validate()?;

    let (user, tokens) = AuthService::login(
        state.users(),
        state.sessions(),
        state.config(),
        &payload.username,
        &payload.password,
    )
    .await?;

    Ok(Json(AuthResponse::new(tokens, user)))
}

/// Trade a refresh token for a new pair; the old one stops working
pub async fn rotate_session(
    State(state): State<AppState>,
    payload: Result<Json<RefreshTokenRequest>, JsonRejection>,
) -> AppResult<Json<TokenResponse>> {
    let Json(payload) = payload?;
    payload.validate()?;

    let pair = AuthService::refresh(
        state.users(),
        state.sessions(),
        state.config(),
        &payload.refresh_token,
    )
    .await?;

    Ok(Json(pair.into()))
}

/// Body is optional: without one nothing but the access token's validity is checked
pub async fn logout(
    State(state): State<AppState>,
    identity: CurrentIdentity,
    payload: Result<Option<Json<LogoutRequest>>, JsonRejection>,
) -> AppResult<Json<MessageResponse>> {
    let identity = AccessPolicy::authenticated(identity.as_ref())?;
    let LogoutRequest {
        refresh_token,
        all_sessions,
    } = payload?.map(|Json(body)| body).unwrap_or_default();

    AuthService::logout(
        state.sessions(),
        identity,
        refresh_token.as_deref(),
        all_sessions.unwrap_or(false),
    )
    .await?;

    Ok(Json(MessageResponse {
        message: "Logged out",
    }))
}

pub async fn current_user(
    State(state): State<AppState>,
    identity: CurrentIdentity,
) -> AppResult<Json<AccountResponse>> {
    let user = UserService::current_user(state.users(), identity.as_ref()).await?;

    Ok(Json(AccountResponse::new(user)))
}
