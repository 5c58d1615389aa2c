//! Claim aggregate

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{ClaimId, EnrollmentId, Money, ProductId};

use crate::error::ClaimError;
use crate::events::ClaimEvent;

/// Claim adjudication states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClaimStatus {
    /// Received from the policy holder
    Submitted,
    /// Picked up by a claims manager
    UnderReview,
    /// Cleared first-stage adjudication
    ApprovedByClaims,
    /// Handed to finance for settlement
    ForwardedToFinance,
    /// Settled; counts against coverage
    ApprovedByFinance,
    /// Denied at either stage
    Rejected,
    /// Sent back to the holder for correction
    RequiresCorrection,
}

impl ClaimStatus {
    /// Settled and denied claims accept no further transitions
    pub fn is_terminal(self) -> bool {
        matches!(self, ClaimStatus::ApprovedByFinance | ClaimStatus::Rejected)
    }

    /// The legal-transition table for claims
    ///
    /// Every status write in the domain funnels through this table, so the
    /// review and forward paths are guarded exactly like the rest.
    pub fn can_transition_to(self, target: ClaimStatus) -> bool {
        use ClaimStatus::*;
        matches!(
            (self, target),
            (Submitted, UnderReview)
                | (Submitted, ApprovedByClaims)
                | (Submitted, Rejected)
                | (Submitted, RequiresCorrection)
                | (UnderReview, ApprovedByClaims)
                | (UnderReview, Rejected)
                | (UnderReview, RequiresCorrection)
                | (RequiresCorrection, Submitted)
                | (ApprovedByClaims, ForwardedToFinance)
                | (ForwardedToFinance, ApprovedByFinance)
                | (ForwardedToFinance, Rejected)
        )
    }
}

impl std::fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ClaimStatus::Submitted => "SUBMITTED",
            ClaimStatus::UnderReview => "UNDER_REVIEW",
            ClaimStatus::ApprovedByClaims => "APPROVED_BY_CLAIMS",
            ClaimStatus::ForwardedToFinance => "FORWARDED_TO_FINANCE",
            ClaimStatus::ApprovedByFinance => "APPROVED_BY_FINANCE",
            ClaimStatus::Rejected => "REJECTED",
            ClaimStatus::RequiresCorrection => "REQUIRES_CORRECTION",
        };
        write!(f, "{name}")
    }
}

/// Clinical context attached to a claim
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicalDetails {
    pub diagnosis: Option<String>,
    pub hospital_name: Option<String>,
    pub treatment_date: Option<NaiveDate>,
}

impl MedicalDetails {
    pub fn is_empty(&self) -> bool {
        self.diagnosis.is_none() && self.hospital_name.is_none() && self.treatment_date.is_none()
    }
}

/// A claim against an enrollment's coverage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claim {
    pub id: ClaimId,
    pub enrollment_id: EnrollmentId,
    /// Product the claim is made under; must equal the enrollment's product
    /// at submission time
    pub product_id: ProductId,
    pub claim_date: NaiveDate,
    pub amount_claimed: Money,
    pub description: String,
    pub medical: Option<MedicalDetails>,
    pub status: ClaimStatus,
    pub remarks: Option<String>,
    /// Optimistic-concurrency counter, bumped by the store on save
    pub version: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip)]
    events: Vec<ClaimEvent>,
}

impl Claim {
    /// Creates a freshly submitted claim
    pub fn submit(
        enrollment_id: EnrollmentId,
        product_id: ProductId,
        claim_date: NaiveDate,
        amount_claimed: Money,
        description: String,
        medical: Option<MedicalDetails>,
    ) -> Self {
        let now = Utc::now();
        let id = ClaimId::new_v7();
        Self {
            id,
            enrollment_id,
            product_id,
            claim_date,
            amount_claimed,
            description,
            medical,
            status: ClaimStatus::Submitted,
            remarks: None,
            version: 0,
            created_at: now,
            updated_at: now,
            events: vec![ClaimEvent::Submitted {
                claim_id: id,
                amount: amount_claimed,
                timestamp: now,
            }],
        }
    }

    /// Returns accumulated domain events and clears them
    pub fn take_events(&mut self) -> Vec<ClaimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Moves the claim to `target`, recording remarks
    ///
    /// # Errors
    ///
    /// Rejects any move not present in the legal-transition table.
    pub fn transition_to(
        &mut self,
        target: ClaimStatus,
        remarks: Option<String>,
    ) -> Result<(), ClaimError> {
        if !self.status.can_transition_to(target) {
            return Err(ClaimError::InvalidStatusTransition {
                from: self.status,
                to: target,
            });
        }

        let now = Utc::now();
        self.status = target;
        if remarks.is_some() {
            self.remarks = remarks.clone();
        }
        self.updated_at = now;
        self.events.push(ClaimEvent::StatusChanged {
            claim_id: self.id,
            status: target,
            remarks,
            timestamp: now,
        });
        Ok(())
    }

    /// Replaces the correctable fields and returns the claim to `Submitted`
    ///
    /// Only legal from `RequiresCorrection`.
    pub fn resubmit(
        &mut self,
        claim_date: NaiveDate,
        amount_claimed: Money,
        description: String,
        medical: Option<MedicalDetails>,
    ) -> Result<(), ClaimError> {
        if !self.status.can_transition_to(ClaimStatus::Submitted) {
            return Err(ClaimError::InvalidStatusTransition {
                from: self.status,
                to: ClaimStatus::Submitted,
            });
        }

        let now = Utc::now();
        self.claim_date = claim_date;
        self.amount_claimed = amount_claimed;
        self.description = description;
        self.medical = medical;
        self.status = ClaimStatus::Submitted;
        self.updated_at = now;
        self.events.push(ClaimEvent::Resubmitted {
            claim_id: self.id,
            amount: amount_claimed,
            timestamp: now,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Currency;
    use rust_decimal_macros::dec;

    fn claim() -> Claim {
        Claim::submit(
            EnrollmentId::new_v7(),
            ProductId::new_v7(),
            Utc::now().date_naive(),
            Money::new(dec!(30000), Currency::USD),
            "hospitalization".into(),
            None,
        )
    }

    #[test]
    fn test_submit_starts_in_submitted() {
        let claim = claim();
        assert_eq!(claim.status, ClaimStatus::Submitted);
        assert!(claim.remarks.is_none());
    }

    #[test]
    fn test_full_approval_path() {
        let mut claim = claim();
        claim
            .transition_to(ClaimStatus::UnderReview, None)
            .unwrap();
        claim
            .transition_to(ClaimStatus::ApprovedByClaims, Some("documents ok".into()))
            .unwrap();
        claim
            .transition_to(ClaimStatus::ForwardedToFinance, None)
            .unwrap();
        claim
            .transition_to(ClaimStatus::ApprovedByFinance, Some("paid".into()))
            .unwrap();

        assert!(claim.status.is_terminal());
        assert_eq!(claim.remarks.as_deref(), Some("paid"));
    }

    #[test]
    fn test_forward_requires_claims_approval_first() {
        let mut claim = claim();
        let err = claim
            .transition_to(ClaimStatus::ForwardedToFinance, None)
            .unwrap_err();
        assert!(matches!(
            err,
            ClaimError::InvalidStatusTransition {
                from: ClaimStatus::Submitted,
                to: ClaimStatus::ForwardedToFinance,
            }
        ));
    }

    #[test]
    fn test_settlement_requires_forwarding_first() {
        let mut claim = claim();
        claim
            .transition_to(ClaimStatus::UnderReview, None)
            .unwrap();
        assert!(claim
            .transition_to(ClaimStatus::ApprovedByFinance, None)
            .is_err());
    }

    #[test]
    fn test_correction_loop_returns_to_submitted() {
        let mut claim = claim();
        claim
            .transition_to(ClaimStatus::RequiresCorrection, Some("wrong date".into()))
            .unwrap();

        claim
            .resubmit(
                Utc::now().date_naive(),
                Money::new(dec!(28000), Currency::USD),
                "hospitalization, corrected".into(),
                None,
            )
            .unwrap();
        assert_eq!(claim.status, ClaimStatus::Submitted);
        assert_eq!(claim.amount_claimed.amount(), dec!(28000));
    }

    #[test]
    fn test_resubmit_only_from_requires_correction() {
        let mut claim = claim();
        assert!(claim
            .resubmit(
                Utc::now().date_naive(),
                Money::new(dec!(1), Currency::USD),
                "x".into(),
                None,
            )
            .is_err());
    }

    #[test]
    fn test_terminal_states_accept_nothing() {
        let mut claim = claim();
        claim.transition_to(ClaimStatus::Rejected, None).unwrap();
        assert!(claim
            .transition_to(ClaimStatus::UnderReview, None)
            .is_err());
    }

    #[test]
    fn test_remarks_kept_when_transition_carries_none() {
        let mut claim = claim();
        claim
            .transition_to(ClaimStatus::UnderReview, Some("first pass".into()))
            .unwrap();
        claim
            .transition_to(ClaimStatus::ApprovedByClaims, None)
            .unwrap();
        assert_eq!(claim.remarks.as_deref(), Some("first pass"));
    }
}
