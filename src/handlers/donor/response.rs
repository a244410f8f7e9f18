//! Donor response DTOs

use serde::Serialize;

use crate::{
    models::{Pagination, Transaction},
    services::{
        aggregator::{DonorSummary, PublicLedgerEntry},
        ledger_service::DonorOverview,
    },
};

/// One page of own transactions plus the public ledger
#[derive(Debug, Serialize)]
pub struct DonorTransactionsResponse {
    pub transactions: Vec<Transaction>,
    pub pagination: Pagination,
    pub summary: DonorSummary,
    pub public_ledger: Vec<PublicLedgerEntry>,
}

impl From<DonorOverview> for DonorTransactionsResponse {
    fn from(overview: DonorOverview) -> Self {
        Self {
            transactions: overview.transactions,
            pagination: overview.pagination,
            summary: overview.summary,
            public_ledger: overview.public_ledger,
        }
    }
}

/// Single transaction envelope
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    pub message: String,
    pub transaction: Transaction,
}
