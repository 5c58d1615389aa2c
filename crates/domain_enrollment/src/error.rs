//! Enrollment domain errors
//!
//! Precondition and conflict failures carry the offending state so the
//! message shown to the caller stays actionable.

use chrono::NaiveDate;
use thiserror::Error;

use core_kernel::{AccessDenied, PortError};

use crate::enrollment::EnrollmentStatus;
use crate::events::SignoffRole;

/// Errors that can occur in the enrollment domain
#[derive(Debug, Error)]
pub enum EnrollmentError {
    /// The product is retired and not available for purchase
    #[error("Policy \"{name}\" is not available for purchase")]
    PolicyInactive { name: String },

    /// The purchase payment did not clear; nothing was persisted
    #[error("Payment failed (transaction {transaction_id}). Please try again")]
    PaymentFailed { transaction_id: String },

    /// Approval attempted outside the pending-approval gate
    #[error("Policy is not in pending approval status. Current status: {current}")]
    NotPendingApproval { current: EnrollmentStatus },

    /// This sign-off was already recorded
    #[error("Policy has already been approved by {role}")]
    AlreadyApproved { role: SignoffRole },

    /// Operation requires an active enrollment
    #[error("Policy is not active. Current status: {current}")]
    NotActive { current: EnrollmentStatus },

    /// Reactivation requires a suspended enrollment
    #[error("Only suspended policies can be reactivated. Current status: {current}")]
    NotSuspended { current: EnrollmentStatus },

    /// The coverage term ran out while suspended
    #[error("Cannot reactivate an expired policy. End date was: {end_date}")]
    PolicyExpired { end_date: NaiveDate },

    /// A purchase while an unapproved enrollment exists would double-charge
    #[error("An enrollment is already awaiting approval for this user")]
    EnrollmentPending,

    /// The actor does not own this enrollment
    #[error("Enrollment belongs to a different policy holder")]
    NotOwner,

    /// Certificate generation failed after the purchase was recorded
    #[error("Certificate generation failed: {0}")]
    Certificate(String),

    /// Collaborator failure (store, catalog lookup)
    #[error(transparent)]
    Port(#[from] PortError),

    /// Actor's role does not permit the operation
    #[error(transparent)]
    Forbidden(#[from] AccessDenied),
}
