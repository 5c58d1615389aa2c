//! Claims adjudication engine
//!
//! Each operation is one unit of work: load, validate through the claim's
//! transition table, persist conditionally, then emit audit entries and
//! notifications. The review and forward paths carry the same transition
//! guard as everything else.

use std::sync::Arc;

use rust_decimal::Decimal;
use validator::Validate;

use core_kernel::{
    audit::record_or_warn, notify::notify_or_warn, Actor, AuditAction, AuditEntry, AuditRecorder,
    Capability, ClaimId, EnrollmentId, EntityType, Money, Notifier, UserId,
};
use domain_catalog::CatalogPort;
use domain_enrollment::EnrollmentPort;

use crate::claim::{Claim, ClaimStatus, MedicalDetails};
use crate::coverage::coverage_used_percent;
use crate::error::ClaimError;
use crate::events::ClaimEvent;
use crate::ports::{ClaimPort, FinanceRecordPort};
use crate::requests::SubmitClaimRequest;
use crate::settlement::{FinanceDecision, FinanceRecord};

/// Statuses a claims manager may set during review
const REVIEW_TARGETS: [ClaimStatus; 4] = [
    ClaimStatus::UnderReview,
    ClaimStatus::ApprovedByClaims,
    ClaimStatus::Rejected,
    ClaimStatus::RequiresCorrection,
];

/// The claims adjudication engine
pub struct ClaimsService {
    claims: Arc<dyn ClaimPort>,
    finance_records: Arc<dyn FinanceRecordPort>,
    enrollments: Arc<dyn EnrollmentPort>,
    catalog: Arc<dyn CatalogPort>,
    audit: Arc<dyn AuditRecorder>,
    notifier: Arc<dyn Notifier>,
}

impl ClaimsService {
    pub fn new(
        claims: Arc<dyn ClaimPort>,
        finance_records: Arc<dyn FinanceRecordPort>,
        enrollments: Arc<dyn EnrollmentPort>,
        catalog: Arc<dyn CatalogPort>,
        audit: Arc<dyn AuditRecorder>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            claims,
            finance_records,
            enrollments,
            catalog,
            audit,
            notifier,
        }
    }

    /// Files a new claim under the holder's enrollment
    ///
    /// # Errors
    ///
    /// - [`ClaimError::Validation`] for a malformed request (future date,
    ///   non-positive amount)
    /// - [`ClaimError::PolicyMismatch`] when the request names a policy the
    ///   enrollment does not hold
    pub async fn submit_claim(
        &self,
        enrollment_id: EnrollmentId,
        request: SubmitClaimRequest,
        actor: &Actor,
    ) -> Result<Claim, ClaimError> {
        actor.require(Capability::SubmitClaims)?;
        request
            .validate()
            .map_err(|e| ClaimError::Validation(e.to_string()))?;

        let enrollment = self.enrollments.get(enrollment_id).await?;
        if enrollment.user_id != actor.user_id {
            return Err(ClaimError::NotOwner);
        }
        if enrollment.product_id != request.product_id {
            return Err(ClaimError::PolicyMismatch);
        }

        let product = self.catalog.get_product(enrollment.product_id).await?;
        let amount = Money::new(request.amount_claimed, product.coverage_amount.currency());
        let medical = medical_details(&request);

        let mut claim = Claim::submit(
            enrollment.id,
            enrollment.product_id,
            request.claim_date,
            amount,
            request.description,
            medical,
        );
        claim.version = self.claims.save(&claim, claim.version).await?;

        tracing::info!(claim_id = %claim.id, amount = %amount, "claim submitted");
        self.publish(&mut claim, &actor.name).await;

        Ok(claim)
    }

    /// First-stage review by the claims manager
    ///
    /// `new_status` must be one the review stage legitimately produces;
    /// the move must also be legal from the claim's current status.
    pub async fn review(
        &self,
        claim_id: ClaimId,
        new_status: ClaimStatus,
        remarks: Option<String>,
        actor: &Actor,
    ) -> Result<Claim, ClaimError> {
        actor.require(Capability::ReviewClaims)?;
        if !REVIEW_TARGETS.contains(&new_status) {
            return Err(ClaimError::Validation(format!(
                "review cannot set claim status to {new_status}"
            )));
        }

        let mut claim = self.claims.get(claim_id).await?;
        claim.transition_to(new_status, remarks)?;
        claim.version = self.claims.save(&claim, claim.version).await?;

        self.publish(&mut claim, &actor.name).await;

        if new_status == ClaimStatus::RequiresCorrection {
            if let Some(holder) = self.holder_of(&claim).await {
                notify_or_warn(
                    self.notifier.as_ref(),
                    holder,
                    "Your claim needs correction before it can be processed",
                )
                .await;
            }
        }

        Ok(claim)
    }

    /// Corrects and refiles a claim sent back by review
    pub async fn resubmit(
        &self,
        claim_id: ClaimId,
        request: SubmitClaimRequest,
        actor: &Actor,
    ) -> Result<Claim, ClaimError> {
        actor.require(Capability::SubmitClaims)?;
        request
            .validate()
            .map_err(|e| ClaimError::Validation(e.to_string()))?;

        let mut claim = self.claims.get(claim_id).await?;
        let enrollment = self.enrollments.get(claim.enrollment_id).await?;
        if enrollment.user_id != actor.user_id {
            return Err(ClaimError::NotOwner);
        }
        if claim.product_id != request.product_id {
            return Err(ClaimError::PolicyMismatch);
        }

        let amount = Money::new(request.amount_claimed, claim.amount_claimed.currency());
        let medical = medical_details(&request);
        claim.resubmit(
            request.claim_date,
            amount,
            request.description,
            medical,
        )?;
        claim.version = self.claims.save(&claim, claim.version).await?;

        self.publish(&mut claim, &actor.name).await;

        Ok(claim)
    }

    /// Hands an approved claim to finance for settlement
    pub async fn forward_to_finance(
        &self,
        claim_id: ClaimId,
        remarks: Option<String>,
        actor: &Actor,
    ) -> Result<Claim, ClaimError> {
        actor.require(Capability::ReviewClaims)?;

        let mut claim = self.claims.get(claim_id).await?;
        claim.transition_to(ClaimStatus::ForwardedToFinance, remarks)?;
        claim.version = self.claims.save(&claim, claim.version).await?;

        self.publish(&mut claim, &actor.name).await;

        Ok(claim)
    }

    /// Final settlement of a forwarded claim
    ///
    /// Produces the [`FinanceRecord`] and moves the claim to its terminal
    /// status in one operation.
    pub async fn settle(
        &self,
        claim_id: ClaimId,
        decision: FinanceDecision,
        remarks: Option<String>,
        approved_amount: Option<Decimal>,
        actor: &Actor,
    ) -> Result<(Claim, FinanceRecord), ClaimError> {
        actor.require(Capability::SettleClaims)?;

        let mut claim = self.claims.get(claim_id).await?;
        let target = match decision {
            FinanceDecision::Approved => ClaimStatus::ApprovedByFinance,
            FinanceDecision::Rejected => ClaimStatus::Rejected,
        };
        claim.transition_to(target, remarks.clone())?;

        let record = FinanceRecord::new(
            claim.id,
            &actor.name,
            decision,
            remarks,
            approved_amount.map(|a| Money::new(a, claim.amount_claimed.currency())),
        );
        self.finance_records.save(&record).await?;
        claim.version = self.claims.save(&claim, claim.version).await?;

        tracing::info!(claim_id = %claim.id, decision = %decision, "claim settled");
        self.publish(&mut claim, &actor.name).await;
        record_or_warn(
            self.audit.as_ref(),
            AuditEntry::new(
                EntityType::FinanceRecord,
                record.id,
                AuditAction::Create,
                &actor.name,
                format!(
                    "Claim processed with status: {decision}. Approved amount: {}",
                    record
                        .approved_amount
                        .map(|a| a.to_string())
                        .unwrap_or_else(|| "none".into())
                ),
            ),
        )
        .await;

        if let Some(holder) = self.holder_of(&claim).await {
            let message = match decision {
                FinanceDecision::Approved => "Your claim has been approved and settled",
                FinanceDecision::Rejected => "Your claim has been rejected",
            };
            notify_or_warn(self.notifier.as_ref(), holder, message).await;
        }

        Ok((claim, record))
    }

    /// Percentage of the enrollment's coverage consumed by settled claims
    pub async fn coverage_used(
        &self,
        enrollment_id: EnrollmentId,
    ) -> Result<Decimal, ClaimError> {
        let enrollment = self.enrollments.get(enrollment_id).await?;
        let product = self.catalog.get_product(enrollment.product_id).await?;
        let claims = self.claims.find_by_enrollment(enrollment_id).await?;
        Ok(coverage_used_percent(&claims, product.coverage_amount)?)
    }

    /// All claims filed under one enrollment
    pub async fn claims_for(
        &self,
        enrollment_id: EnrollmentId,
    ) -> Result<Vec<Claim>, ClaimError> {
        Ok(self.claims.find_by_enrollment(enrollment_id).await?)
    }

    /// Work queue for the claims manager
    pub async fn claims_in(&self, status: ClaimStatus) -> Result<Vec<Claim>, ClaimError> {
        Ok(self.claims.find_by_status(status).await?)
    }

    /// Settlement history for one claim
    pub async fn settlements_for(
        &self,
        claim_id: ClaimId,
    ) -> Result<Vec<FinanceRecord>, ClaimError> {
        Ok(self.finance_records.find_by_claim(claim_id).await?)
    }

    /// Drains domain events into audit entries
    async fn publish(&self, claim: &mut Claim, performed_by: &str) {
        for event in claim.take_events() {
            let entry = audit_entry_for(claim, &event, performed_by);
            record_or_warn(self.audit.as_ref(), entry).await;
        }
    }

    /// Resolves the holder to notify; best effort like the notification
    /// itself
    async fn holder_of(&self, claim: &Claim) -> Option<UserId> {
        match self.enrollments.get(claim.enrollment_id).await {
            Ok(enrollment) => Some(enrollment.user_id),
            Err(err) => {
                tracing::warn!(error = %err, claim_id = %claim.id, "holder lookup failed");
                None
            }
        }
    }
}

fn medical_details(request: &SubmitClaimRequest) -> Option<MedicalDetails> {
    let details = MedicalDetails {
        diagnosis: request.medical_diagnosis.clone(),
        hospital_name: request.hospital_name.clone(),
        treatment_date: request.treatment_date,
    };
    (!details.is_empty()).then_some(details)
}

fn audit_entry_for(claim: &Claim, event: &ClaimEvent, performed_by: &str) -> AuditEntry {
    let (action, details) = match event {
        ClaimEvent::Submitted { amount, .. } => (
            AuditAction::Create,
            format!("Claim submitted for amount: {amount}"),
        ),
        ClaimEvent::StatusChanged {
            status, remarks, ..
        } => {
            let action = match status {
                ClaimStatus::Rejected => AuditAction::Reject,
                ClaimStatus::ApprovedByClaims | ClaimStatus::ApprovedByFinance => {
                    AuditAction::Approve
                }
                ClaimStatus::ForwardedToFinance => AuditAction::Forward,
                _ => AuditAction::Update,
            };
            let details = match status {
                ClaimStatus::ForwardedToFinance => format!(
                    "Claim forwarded to finance. Remarks: {}",
                    remarks.as_deref().unwrap_or("none")
                ),
                _ => format!(
                    "Claim status changed to {status}. Remarks: {}",
                    remarks.as_deref().unwrap_or("none")
                ),
            };
            (action, details)
        }
        ClaimEvent::Resubmitted { amount, .. } => (
            AuditAction::Update,
            format!("Claim resubmitted for amount: {amount}"),
        ),
    };
    AuditEntry::new(EntityType::Claim, claim.id, action, performed_by, details)
}
