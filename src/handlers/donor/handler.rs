//! Donor handler implementations

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    handlers::auth::UserResponse,
    middleware::CurrentIdentity,
    services::{
        user_service::Profile, AccessPolicy, LedgerService, LifecycleService, UserService,
    },
    state::AppState,
};

use super::{
    request::{AttachProofRequest, CreatePledgeRequest, HistoryQuery, UpdateProfileRequest},
    response::{DonorTransactionsResponse, TransactionResponse},
};

/// Own profile with completed-donation totals
pub async fn get_profile(
    State(state): State<AppState>,
    identity: CurrentIdentity,
) -> AppResult<Json<Profile>> {
    let profile =
        UserService::profile(state.users(), state.transactions(), identity.as_ref()).await?;
    Ok(Json(profile))
}

pub async fn update_profile(
    State(state): State<AppState>,
    identity: CurrentIdentity,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> AppResult<Json<UserResponse>> {
    AccessPolicy::require_donor(identity.as_ref())?;
    let Json(payload) = payload?;

    let user = UserService::update_profile(state.users(), identity.as_ref(), payload.into()).await?;
    Ok(Json(user.into()))
}

/// One page of own transactions, the overall summary and the public ledger
pub async fn list_own_transactions(
    State(state): State<AppState>,
    identity: CurrentIdentity,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> AppResult<Json<DonorTransactionsResponse>> {
    AccessPolicy::require_donor(identity.as_ref())?;
    let Query(query) = query?;

    let overview =
        LedgerService::donor_overview(state.transactions(), identity.as_ref(), query.into())
            .await?;
    Ok(Json(overview.into()))
}

pub async fn submit_pledge(
    State(state): State<AppState>,
    identity: CurrentIdentity,
    payload: Result<Json<CreatePledgeRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<TransactionResponse>)> {
    AccessPolicy::require_donor(identity.as_ref())?;
    let Json(payload) = payload?;

    let transaction = LifecycleService::submit_pledge(
        state.transactions(),
        state.users(),
        identity.as_ref(),
        payload.into(),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(TransactionResponse {
            message: "Pledge submitted".to_string(),
            transaction,
        }),
    ))
}

pub async fn attach_proof(
    State(state): State<AppState>,
    identity: CurrentIdentity,
    Path(id): Path<Uuid>,
    payload: Result<Json<AttachProofRequest>, JsonRejection>,
) -> AppResult<Json<TransactionResponse>> {
    AccessPolicy::require_donor(identity.as_ref())?;
    let Json(payload) = payload?;

    let transaction = LifecycleService::attach_proof(
        state.transactions(),
        identity.as_ref(),
        id,
        &payload.proof_url,
    )
    .await?;

    Ok(Json(TransactionResponse {
        message: "Proof attached".to_string(),
        transaction,
    }))
}
