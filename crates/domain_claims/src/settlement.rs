//! Finance settlement records
//!
//! Settlement is the terminal adjudication step: a finance officer consumes
//! a forwarded claim and produces a [`FinanceRecord`] alongside the claim's
//! final status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{ClaimId, FinanceRecordId, Money};

/// Finance officer's decision on a forwarded claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinanceDecision {
    Approved,
    Rejected,
}

impl std::fmt::Display for FinanceDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FinanceDecision::Approved => write!(f, "APPROVED"),
            FinanceDecision::Rejected => write!(f, "REJECTED"),
        }
    }
}

/// The settlement outcome for one claim
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinanceRecord {
    pub id: FinanceRecordId,
    pub claim_id: ClaimId,
    /// Finance officer who made the decision
    pub decided_by: String,
    pub decision: FinanceDecision,
    pub remarks: Option<String>,
    /// Amount released; absent on rejection
    pub approved_amount: Option<Money>,
    pub processed_at: DateTime<Utc>,
}

impl FinanceRecord {
    pub fn new(
        claim_id: ClaimId,
        decided_by: impl Into<String>,
        decision: FinanceDecision,
        remarks: Option<String>,
        approved_amount: Option<Money>,
    ) -> Self {
        Self {
            id: FinanceRecordId::new_v7(),
            claim_id,
            decided_by: decided_by.into(),
            decision,
            remarks,
            approved_amount,
            processed_at: Utc::now(),
        }
    }
}
