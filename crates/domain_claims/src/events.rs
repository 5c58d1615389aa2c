//! Domain events for the claim aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{ClaimId, Money};

use crate::claim::ClaimStatus;

/// Domain events emitted by the Claim aggregate
///
/// The service drains these after a successful save and turns them into
/// audit entries, so trail writes never sit inside the transaction path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ClaimEvent {
    Submitted {
        claim_id: ClaimId,
        amount: Money,
        timestamp: DateTime<Utc>,
    },
    StatusChanged {
        claim_id: ClaimId,
        status: ClaimStatus,
        remarks: Option<String>,
        timestamp: DateTime<Utc>,
    },
    Resubmitted {
        claim_id: ClaimId,
        amount: Money,
        timestamp: DateTime<Utc>,
    },
}

impl ClaimEvent {
    pub fn claim_id(&self) -> ClaimId {
        match self {
            ClaimEvent::Submitted { claim_id, .. } => *claim_id,
            ClaimEvent::StatusChanged { claim_id, .. } => *claim_id,
            ClaimEvent::Resubmitted { claim_id, .. } => *claim_id,
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            ClaimEvent::Submitted { .. } => "ClaimSubmitted",
            ClaimEvent::StatusChanged { .. } => "ClaimStatusChanged",
            ClaimEvent::Resubmitted { .. } => "ClaimResubmitted",
        }
    }
}
