//! Enrollment workflow engine
//!
//! Orchestrates each operation as one unit of work: load current state,
//! validate through the aggregate's guarded transitions, persist with a
//! conditional save, then emit audit entries and notifications from the
//! drained domain events. Audit and notification failures never fail the
//! primary operation.

use std::sync::Arc;

use core_kernel::{
    audit::record_or_warn, notify::notify_or_warn, Actor, AuditAction, AuditEntry, AuditRecorder,
    Capability, EnrollmentId, EntityType, Notifier, ProductId,
};
use domain_catalog::CatalogPort;

use crate::config::EnrollmentConfig;
use crate::enrollment::{Enrollment, EnrollmentStatus};
use crate::error::EnrollmentError;
use crate::events::EnrollmentEvent;
use crate::ports::{CertificatePort, EnrollmentPort, PaymentPort};

/// The enrollment workflow engine
pub struct EnrollmentService {
    enrollments: Arc<dyn EnrollmentPort>,
    catalog: Arc<dyn CatalogPort>,
    payments: Arc<dyn PaymentPort>,
    certificates: Arc<dyn CertificatePort>,
    audit: Arc<dyn AuditRecorder>,
    notifier: Arc<dyn Notifier>,
    config: EnrollmentConfig,
}

impl EnrollmentService {
    pub fn new(
        enrollments: Arc<dyn EnrollmentPort>,
        catalog: Arc<dyn CatalogPort>,
        payments: Arc<dyn PaymentPort>,
        certificates: Arc<dyn CertificatePort>,
        audit: Arc<dyn AuditRecorder>,
        notifier: Arc<dyn Notifier>,
        config: EnrollmentConfig,
    ) -> Self {
        Self {
            enrollments,
            catalog,
            payments,
            certificates,
            audit,
            notifier,
            config,
        }
    }

    /// Purchases a policy for the acting user
    ///
    /// Charges the full term premium before anything is persisted; a failed
    /// payment aborts with nothing written. A user with an active
    /// enrollment is upgraded in place rather than given a second row.
    ///
    /// # Errors
    ///
    /// - [`EnrollmentError::PolicyInactive`] if the product was retired
    /// - [`EnrollmentError::EnrollmentPending`] if an unapproved enrollment
    ///   already exists for this user
    /// - [`EnrollmentError::PaymentFailed`] if the charge did not clear
    pub async fn enroll(
        &self,
        actor: &Actor,
        product_id: ProductId,
    ) -> Result<Enrollment, EnrollmentError> {
        let product = self.catalog.get_product(product_id).await?;
        if !product.active {
            return Err(EnrollmentError::PolicyInactive {
                name: product.name.clone(),
            });
        }

        let existing = self.enrollments.find_by_user(actor.user_id).await?;
        if let Some(e) = &existing {
            if e.status == EnrollmentStatus::PendingApproval {
                return Err(EnrollmentError::EnrollmentPending);
            }
        }

        let receipt = self
            .payments
            .charge(actor.user_id, product.total_premium())
            .await?;
        if !receipt.succeeded() {
            return Err(EnrollmentError::PaymentFailed {
                transaction_id: receipt.transaction_id,
            });
        }

        let mut enrollment = match existing {
            Some(mut e) if e.is_active() => {
                e.upgrade(&product)?;
                e
            }
            _ => Enrollment::open(actor.user_id, &product, self.config.activation),
        };

        let certificate = self
            .certificates
            .generate_certificate(&enrollment)
            .await
            .map_err(|e| EnrollmentError::Certificate(e.to_string()))?;
        enrollment.certificate_url = Some(certificate);

        enrollment.version = self
            .enrollments
            .save(&enrollment, enrollment.version)
            .await?;

        tracing::info!(
            enrollment_id = %enrollment.id,
            product = %enrollment.product_name,
            status = %enrollment.status,
            transaction_id = %receipt.transaction_id,
            "enrollment purchase completed"
        );
        self.publish(&mut enrollment, &actor.name).await;
        Ok(enrollment)
    }

    /// Records the policy-manager sign-off on a pending enrollment
    pub async fn approve_by_policy_manager(
        &self,
        id: EnrollmentId,
        actor: &Actor,
    ) -> Result<Enrollment, EnrollmentError> {
        actor.require(Capability::ApproveAsPolicyManager)?;

        let mut enrollment = self.enrollments.get(id).await?;
        enrollment.approve_by_policy_manager(&actor.name)?;
        enrollment.version = self
            .enrollments
            .save(&enrollment, enrollment.version)
            .await?;

        self.publish(&mut enrollment, &actor.name).await;
        Ok(enrollment)
    }

    /// Records the finance-officer sign-off on a pending enrollment
    pub async fn approve_by_finance_officer(
        &self,
        id: EnrollmentId,
        actor: &Actor,
    ) -> Result<Enrollment, EnrollmentError> {
        actor.require(Capability::ApproveAsFinanceOfficer)?;

        let mut enrollment = self.enrollments.get(id).await?;
        enrollment.approve_by_finance_officer(&actor.name)?;
        enrollment.version = self
            .enrollments
            .save(&enrollment, enrollment.version)
            .await?;

        self.publish(&mut enrollment, &actor.name).await;
        Ok(enrollment)
    }

    /// Temporarily deactivates an active enrollment
    pub async fn suspend(
        &self,
        id: EnrollmentId,
        reason: &str,
        actor: &Actor,
    ) -> Result<Enrollment, EnrollmentError> {
        actor.require(Capability::AdministerEnrollments)?;

        let mut enrollment = self.enrollments.get(id).await?;
        enrollment.suspend(reason)?;
        enrollment.version = self
            .enrollments
            .save(&enrollment, enrollment.version)
            .await?;

        self.publish(&mut enrollment, &actor.name).await;
        Ok(enrollment)
    }

    /// Restores a suspended enrollment whose term has not run out
    pub async fn reactivate(
        &self,
        id: EnrollmentId,
        actor: &Actor,
    ) -> Result<Enrollment, EnrollmentError> {
        actor.require(Capability::AdministerEnrollments)?;

        let mut enrollment = self.enrollments.get(id).await?;
        enrollment.reactivate()?;
        enrollment.version = self
            .enrollments
            .save(&enrollment, enrollment.version)
            .await?;

        self.publish(&mut enrollment, &actor.name).await;
        Ok(enrollment)
    }

    /// Cancels the acting holder's own active enrollment; terminal
    pub async fn cancel(
        &self,
        id: EnrollmentId,
        reason: &str,
        actor: &Actor,
    ) -> Result<Enrollment, EnrollmentError> {
        actor.require(Capability::CancelOwnEnrollment)?;

        let mut enrollment = self.enrollments.get(id).await?;
        if enrollment.user_id != actor.user_id {
            return Err(EnrollmentError::NotOwner);
        }
        enrollment.cancel(reason)?;
        enrollment.version = self
            .enrollments
            .save(&enrollment, enrollment.version)
            .await?;

        self.publish(&mut enrollment, &actor.name).await;
        Ok(enrollment)
    }

    /// Expires every active enrollment whose term has run out
    ///
    /// Returns the affected set. Idempotent: a second run finds no active
    /// enrollment past its end date and returns an empty set.
    pub async fn sweep_expired(&self, actor: &Actor) -> Result<Vec<Enrollment>, EnrollmentError> {
        actor.require(Capability::AdministerEnrollments)?;

        let today = chrono::Utc::now().date_naive();
        let active = self
            .enrollments
            .find_by_status(EnrollmentStatus::Active)
            .await?;

        let mut expired = Vec::new();
        for mut enrollment in active {
            if !enrollment.expire_if_due(today) {
                continue;
            }
            enrollment.version = self
                .enrollments
                .save(&enrollment, enrollment.version)
                .await?;
            self.publish(&mut enrollment, &actor.name).await;
            expired.push(enrollment);
        }

        tracing::info!(count = expired.len(), "expiry sweep completed");
        Ok(expired)
    }

    /// The acting user's current enrollment
    pub async fn enrollment_for(
        &self,
        user_id: core_kernel::UserId,
    ) -> Result<Option<Enrollment>, EnrollmentError> {
        Ok(self.enrollments.find_by_user(user_id).await?)
    }

    /// All enrollments awaiting the dual-approval gate
    pub async fn pending_approvals(&self) -> Result<Vec<Enrollment>, EnrollmentError> {
        Ok(self
            .enrollments
            .find_by_status(EnrollmentStatus::PendingApproval)
            .await?)
    }

    /// Drains domain events into audit entries and notifications
    async fn publish(&self, enrollment: &mut Enrollment, performed_by: &str) {
        for event in enrollment.take_events() {
            let entry = audit_entry_for(enrollment, &event, performed_by);
            record_or_warn(self.audit.as_ref(), entry).await;
            if let Some(message) = notification_for(&event) {
                notify_or_warn(self.notifier.as_ref(), enrollment.user_id, &message).await;
            }
        }
    }
}

fn audit_entry_for(
    enrollment: &Enrollment,
    event: &EnrollmentEvent,
    performed_by: &str,
) -> AuditEntry {
    let policy = &enrollment.product_name;
    let (action, performer, details) = match event {
        EnrollmentEvent::Created { status, .. } => (
            AuditAction::Create,
            performed_by,
            format!("Enrollment created with status {status}. Policy: {policy}"),
        ),
        EnrollmentEvent::SignoffRecorded { role, approver, .. } => (
            AuditAction::Approve,
            approver.as_str(),
            format!("Policy approved by {role}. Policy: {policy}"),
        ),
        EnrollmentEvent::Activated { .. } => (
            AuditAction::Update,
            performed_by,
            format!("Policy activated after dual approval. Policy: {policy}"),
        ),
        EnrollmentEvent::Upgraded {
            from_product,
            to_product,
            ..
        } => (
            AuditAction::Update,
            performed_by,
            format!("Policy upgraded from {from_product} to {to_product}"),
        ),
        EnrollmentEvent::Suspended { reason, .. } => (
            AuditAction::Suspend,
            performed_by,
            format!("Policy suspended. Reason: {reason}. Policy: {policy}"),
        ),
        EnrollmentEvent::Reactivated { .. } => (
            AuditAction::Reactivate,
            performed_by,
            format!("Policy reactivated from suspended status. Policy: {policy}"),
        ),
        EnrollmentEvent::Cancelled { reason, .. } => (
            AuditAction::Cancel,
            performed_by,
            format!("Policy deactivated. Reason: {reason}. Policy: {policy}"),
        ),
        EnrollmentEvent::Expired { end_date, .. } => (
            AuditAction::Expire,
            performed_by,
            format!("Policy automatically expired. End date: {end_date}. Policy: {policy}"),
        ),
    };
    AuditEntry::new(
        EntityType::Enrollment,
        enrollment.id,
        action,
        performer,
        details,
    )
}

fn notification_for(event: &EnrollmentEvent) -> Option<String> {
    match event {
        EnrollmentEvent::Created {
            product_name,
            status: EnrollmentStatus::PendingApproval,
            ..
        } => Some(format!(
            "Your enrollment for {product_name} was received and is awaiting approval"
        )),
        EnrollmentEvent::Activated { .. } => Some("Your policy is now active".to_string()),
        EnrollmentEvent::Upgraded { to_product, .. } => {
            Some(format!("Your policy was upgraded to {to_product}"))
        }
        EnrollmentEvent::Suspended { reason, .. } => {
            Some(format!("Your policy has been suspended. Reason: {reason}"))
        }
        EnrollmentEvent::Reactivated { .. } => {
            Some("Your policy has been reactivated".to_string())
        }
        EnrollmentEvent::Cancelled { .. } => Some("Your policy has been cancelled".to_string()),
        EnrollmentEvent::Expired { end_date, .. } => {
            Some(format!("Your policy expired on {end_date}"))
        }
        _ => None,
    }
}
