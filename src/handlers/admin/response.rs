//! Admin response DTOs

use serde::Serialize;

use crate::{
    handlers::auth::UserResponse,
    models::Transaction,
    services::{aggregator::LedgerStats, user_service::DonorListing},
};

/// Full ledger listing with dashboard stats
#[derive(Debug, Serialize)]
pub struct AdminTransactionsResponse {
    pub transactions: Vec<Transaction>,
    pub stats: LedgerStats,
}

#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    pub transaction: Transaction,
}

#[derive(Debug, Serialize)]
pub struct DonorsListResponse {
    pub users: Vec<DonorListing>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct CreatedUserResponse {
    pub message: String,
    pub user: UserResponse,
}
