//! Ledger aggregation
//!
//! Pure read-side computations over a slice of transactions. Nothing here
//! touches storage or the clock: the same input always produces the same
//! output. Funds are grouped by case-insensitive keyword match on the
//! free-text category, so a category mentioning both keywords counts toward
//! both funds.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    constants::{funds, ANONYMOUS_DONOR_NAME},
    models::{Transaction, TransactionStatus},
};

/// Case-insensitive substring match of `keyword` in `category`
pub fn category_matches(category: &str, keyword: &str) -> bool {
    category.to_lowercase().contains(&keyword.to_lowercase())
}

pub fn is_rabta(category: &str) -> bool {
    category_matches(category, funds::RABTA)
}

pub fn is_madrassa(category: &str) -> bool {
    category_matches(category, funds::MADRASSA)
}

fn approved(transactions: &[Transaction]) -> impl Iterator<Item = &Transaction> {
    transactions
        .iter()
        .filter(|t| t.status == TransactionStatus::Approved)
}

/// Sum of approved amounts
pub fn total_approved(transactions: &[Transaction]) -> f64 {
    approved(transactions).map(|t| t.amount).sum()
}

/// Sum of approved amounts whose category contains `keyword`
pub fn fund_total(transactions: &[Transaction], keyword: &str) -> f64 {
    approved(transactions)
        .filter(|t| category_matches(&t.category, keyword))
        .map(|t| t.amount)
        .sum()
}

pub fn pending_count(transactions: &[Transaction]) -> usize {
    transactions
        .iter()
        .filter(|t| t.status == TransactionStatus::Pending)
        .count()
}

/// Contribution summary for one donor
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserStats {
    pub total_contributed: f64,
    pub madrassa_total: f64,
    pub rabta_total: f64,
    pub pending_count: usize,
    pub approved_count: usize,
    pub rejected_count: usize,
    pub total_transactions: usize,
}

/// Single pass over one donor's transactions
pub fn per_user_stats(transactions: &[Transaction]) -> UserStats {
    transactions
        .iter()
        .fold(UserStats::default(), |mut stats, t| {
            stats.total_transactions += 1;
            match t.status {
                TransactionStatus::Approved => {
                    stats.approved_count += 1;
                    stats.total_contributed += t.amount;
                    if is_madrassa(&t.category) {
                        stats.madrassa_total += t.amount;
                    }
                    if is_rabta(&t.category) {
                        stats.rabta_total += t.amount;
                    }
                }
                TransactionStatus::Pending => stats.pending_count += 1,
                TransactionStatus::Rejected => stats.rejected_count += 1,
                TransactionStatus::Completed => {}
            }
            stats
        })
}

/// Dashboard totals across the whole ledger
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LedgerStats {
    pub total_approved_funds: f64,
    pub rabta_fund: f64,
    pub madrassa_fund: f64,
    pub pending_count: usize,
    pub total_transactions: usize,
}

pub fn ledger_stats(transactions: &[Transaction]) -> LedgerStats {
    LedgerStats {
        total_approved_funds: total_approved(transactions),
        rabta_fund: fund_total(transactions, funds::RABTA),
        madrassa_fund: fund_total(transactions, funds::MADRASSA),
        pending_count: pending_count(transactions),
        total_transactions: transactions.len(),
    }
}

/// A donor's own headline numbers
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DonorSummary {
    pub total_approved_donations: f64,
    pub pending_pledges: usize,
}

pub fn donor_summary(transactions: &[Transaction]) -> DonorSummary {
    DonorSummary {
        total_approved_donations: total_approved(transactions),
        pending_pledges: pending_count(transactions),
    }
}

/// Totals shown on a donor profile, counted over `completed` records
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProfileTotals {
    pub total_donations: f64,
    pub last_donation: Option<DateTime<Utc>>,
}

pub fn profile_totals(transactions: &[Transaction]) -> ProfileTotals {
    transactions
        .iter()
        .filter(|t| t.status == TransactionStatus::Completed)
        .fold(ProfileTotals::default(), |mut totals, t| {
            totals.total_donations += t.amount;
            let date = t.effective_date();
            totals.last_donation = Some(totals.last_donation.map_or(date, |d| d.max(date)));
            totals
        })
}

/// Entry on the donor-facing public ledger
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublicLedgerEntry {
    pub id: uuid::Uuid,
    pub donor_name: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub category: String,
    pub proof_url: Option<String>,
    pub is_private: bool,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<&Transaction> for PublicLedgerEntry {
    fn from(t: &Transaction) -> Self {
        let (donor_name, proof_url) = if t.is_private {
            (ANONYMOUS_DONOR_NAME.to_string(), None)
        } else {
            (t.donor_name.clone(), t.proof_url.clone())
        };

        Self {
            id: t.id,
            donor_name,
            amount: t.amount,
            category: t.category.clone(),
            proof_url,
            is_private: t.is_private,
            date: t.effective_date(),
            created_at: t.created_at,
        }
    }
}

/// Approved entries, newest created first, at most `limit`, private ones redacted
pub fn public_ledger(transactions: &[Transaction], limit: usize) -> Vec<PublicLedgerEntry> {
    let mut entries: Vec<&Transaction> = approved(transactions).collect();
    entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    entries
        .into_iter()
        .take(limit)
        .map(PublicLedgerEntry::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use uuid::Uuid;

    fn tx(amount: f64, category: &str, status: TransactionStatus) -> Transaction {
        let created = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        Transaction {
            id: Uuid::new_v4(),
            owner_id: None,
            donor_name: "Ahmed Ali".to_string(),
            amount,
            category: category.to_string(),
            description: None,
            proof_url: Some("https://proof.example/1.png".to_string()),
            status,
            is_private: false,
            notes: None,
            date: None,
            created_at: created,
            updated_at: created,
        }
    }

    use TransactionStatus::*;

    #[test]
    fn test_empty_ledger_totals_zero() {
        assert_eq!(total_approved(&[]), 0.0);
        assert_eq!(fund_total(&[], "rabta"), 0.0);
        assert_eq!(pending_count(&[]), 0);
        assert_eq!(per_user_stats(&[]), UserStats::default());
    }

    #[test]
    fn test_total_approved_ignores_other_statuses() {
        let txns = vec![
            tx(100.0, "rabta", Approved),
            tx(50.0, "rabta", Pending),
            tx(25.0, "madrassa", Rejected),
            tx(10.0, "donation", Approved),
            tx(7.0, "rabta", Completed),
        ];
        assert_eq!(total_approved(&txns), 110.0);
        assert_eq!(pending_count(&txns), 1);
    }

    #[test]
    fn test_fund_total_matches_case_insensitively() {
        let txns = vec![
            tx(1000.0, "Rabta Fund", Approved),
            tx(300.0, "rabta-fund", Approved),
            tx(200.0, "madrassa", Approved),
        ];
        assert_eq!(fund_total(&txns, "rabta"), 1300.0);
        assert_eq!(fund_total(&txns, "RABTA"), 1300.0);
        assert_eq!(fund_total(&txns, "madrassa"), 200.0);
    }

    #[test]
    fn test_category_with_both_keywords_counts_twice() {
        let txns = vec![tx(40.0, "rabta madrassa joint", Approved)];
        assert_eq!(fund_total(&txns, "rabta"), 40.0);
        assert_eq!(fund_total(&txns, "madrassa"), 40.0);

        let stats = per_user_stats(&txns);
        assert_eq!(stats.rabta_total, 40.0);
        assert_eq!(stats.madrassa_total, 40.0);
        assert_eq!(stats.total_contributed, 40.0);
    }

    #[test]
    fn test_per_user_stats_single_pass() {
        let txns = vec![
            tx(500.0, "madrassa", Approved),
            tx(250.0, "Rabta", Approved),
            tx(75.0, "rabta", Pending),
            tx(60.0, "rabta", Pending),
            tx(20.0, "madrassa", Rejected),
        ];
        let stats = per_user_stats(&txns);
        assert_eq!(
            stats,
            UserStats {
                total_contributed: 750.0,
                madrassa_total: 500.0,
                rabta_total: 250.0,
                pending_count: 2,
                approved_count: 2,
                rejected_count: 1,
                total_transactions: 5,
            }
        );
    }

    #[test]
    fn test_ledger_stats() {
        let txns = vec![
            tx(5000.0, "rabta", Approved),
            tx(1500.0, "madrassa", Approved),
            tx(100.0, "rabta", Pending),
        ];
        let stats = ledger_stats(&txns);
        assert_eq!(stats.total_approved_funds, 6500.0);
        assert_eq!(stats.rabta_fund, 5000.0);
        assert_eq!(stats.madrassa_fund, 1500.0);
        assert_eq!(stats.pending_count, 1);
        assert_eq!(stats.total_transactions, 3);
    }

    #[test]
    fn test_aggregation_is_deterministic() {
        let txns = vec![tx(1.5, "rabta", Approved), tx(2.25, "madrassa", Approved)];
        assert_eq!(ledger_stats(&txns), ledger_stats(&txns));
        assert_eq!(per_user_stats(&txns), per_user_stats(&txns));
    }

    #[test]
    fn test_profile_totals_use_completed_records() {
        let mut early = tx(300.0, "rabta", Completed);
        early.date = Some(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());
        let mut late = tx(200.0, "rabta", Completed);
        late.date = Some(Utc.with_ymd_and_hms(2024, 9, 1, 0, 0, 0).unwrap());
        let txns = vec![early, late.clone(), tx(999.0, "rabta", Approved)];

        let totals = profile_totals(&txns);
        assert_eq!(totals.total_donations, 500.0);
        assert_eq!(totals.last_donation, late.date);
    }

    #[test]
    fn test_public_ledger_redacts_private_entries() {
        let mut private = tx(100.0, "rabta", Approved);
        private.is_private = true;
        private.created_at += Duration::hours(1);
        let public = tx(50.0, "madrassa", Approved);
        let pending = tx(10.0, "rabta", Pending);

        let ledger = public_ledger(&[public.clone(), private.clone(), pending], 50);
        assert_eq!(ledger.len(), 2);

        assert_eq!(ledger[0].id, private.id);
        assert_eq!(ledger[0].donor_name, ANONYMOUS_DONOR_NAME);
        assert_eq!(ledger[0].proof_url, None);

        assert_eq!(ledger[1].donor_name, "Ahmed Ali");
        assert_eq!(ledger[1].proof_url, public.proof_url);
    }

    #[test]
    fn test_public_ledger_respects_limit() {
        let txns: Vec<_> = (0..60).map(|_| tx(1.0, "rabta", Approved)).collect();
        assert_eq!(public_ledger(&txns, 50).len(), 50);
    }
}
