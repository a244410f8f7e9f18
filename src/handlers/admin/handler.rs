//! Admin handler implementations

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppResult,
    middleware::CurrentIdentity,
    services::{
        user_service::UserDetail, AccessPolicy, LedgerService, LifecycleService,
        TransactionService, UserService,
    },
    state::AppState,
};

use super::{
    request::{CreateUserRequest, ListTransactionsQuery, ManualCreditRequest, UpdateStatusRequest},
    response::{
        AdminTransactionsResponse, CreatedUserResponse, DonorsListResponse, TransactionResponse,
    },
};

/// Every transaction, optionally filtered by status, with ledger stats
pub async fn list_transactions(
    State(state): State<AppState>,
    identity: CurrentIdentity,
    query: Result<Query<ListTransactionsQuery>, QueryRejection>,
) -> AppResult<Json<AdminTransactionsResponse>> {
    AccessPolicy::require_admin(identity.as_ref())?;
    let Query(query) = query?;

    let overview = LedgerService::admin_overview(
        state.transactions(),
        identity.as_ref(),
        query.status.as_deref(),
    )
    .await?;

    Ok(Json(AdminTransactionsResponse {
        transactions: overview.transactions,
        stats: overview.stats,
    }))
}

pub async fn get_transaction(
    State(state): State<AppState>,
    identity: CurrentIdentity,
    Path(id): Path<Uuid>,
) -> AppResult<Json<TransactionResponse>> {
    AccessPolicy::require_admin(identity.as_ref())?;
    let transaction = TransactionService::find_by_id(state.transactions(), id).await?;
    Ok(Json(TransactionResponse { transaction }))
}

pub async fn update_status(
    State(state): State<AppState>,
    identity: CurrentIdentity,
    Path(id): Path<Uuid>,
    payload: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> AppResult<Json<TransactionResponse>> {
    AccessPolicy::require_admin(identity.as_ref())?;
    let Json(payload) = payload?;
    payload.validate()?;

    let transaction =
        LifecycleService::transition(state.transactions(), identity.as_ref(), id, &payload.status)
            .await?;
    Ok(Json(TransactionResponse { transaction }))
}

pub async fn delete_transaction(
    State(state): State<AppState>,
    identity: CurrentIdentity,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    LifecycleService::delete(state.transactions(), identity.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn credit_manual(
    State(state): State<AppState>,
    identity: CurrentIdentity,
    payload: Result<Json<ManualCreditRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<TransactionResponse>)> {
    AccessPolicy::require_admin(identity.as_ref())?;
    let Json(payload) = payload?;

    let transaction = LifecycleService::credit_manual(
        state.transactions(),
        state.users(),
        identity.as_ref(),
        payload.into(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(TransactionResponse { transaction })))
}

/// Donors with contribution figures, newest first
pub async fn list_donors(
    State(state): State<AppState>,
    identity: CurrentIdentity,
) -> AppResult<Json<DonorsListResponse>> {
    let users =
        UserService::list_donors(state.users(), state.transactions(), identity.as_ref()).await?;

    Ok(Json(DonorsListResponse {
        total: users.len(),
        users,
    }))
}

pub async fn create_user(
    State(state): State<AppState>,
    identity: CurrentIdentity,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<CreatedUserResponse>)> {
    AccessPolicy::require_admin(identity.as_ref())?;
    let Json(payload) = payload?;

    let (fields, role) = payload.into_parts();
    let user =
        UserService::create_user(state.users(), identity.as_ref(), fields, role.as_deref())
            .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedUserResponse {
            message: "User created successfully".to_string(),
            user: user.into(),
        }),
    ))
}

pub async fn get_user(
    State(state): State<AppState>,
    identity: CurrentIdentity,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserDetail>> {
    let detail =
        UserService::user_detail(state.users(), state.transactions(), identity.as_ref(), id)
            .await?;
    Ok(Json(detail))
}

/// Delete a donor together with their transactions
pub async fn delete_user(
    State(state): State<AppState>,
    identity: CurrentIdentity,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    UserService::delete_user(state.users(), state.transactions(), identity.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
