//! Claims domain errors

use thiserror::Error;

use core_kernel::{AccessDenied, MoneyError, PortError};

use crate::claim::ClaimStatus;

/// Errors that can occur in the claims domain
#[derive(Debug, Error)]
pub enum ClaimError {
    /// Request failed validation before any state was touched
    #[error("Validation error: {0}")]
    Validation(String),

    /// The claimed policy is not the policy the enrollment holds
    #[error("Policy holder does not own this policy")]
    PolicyMismatch,

    /// The claim belongs to a different enrollment
    #[error("Claim belongs to a different policy holder")]
    NotOwner,

    /// Move not present in the legal-transition table
    #[error("Invalid claim status transition from {from} to {to}")]
    InvalidStatusTransition { from: ClaimStatus, to: ClaimStatus },

    /// Monetary arithmetic failed (currency mismatch, zero coverage)
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// Collaborator failure (store, catalog, enrollment lookup)
    #[error(transparent)]
    Port(#[from] PortError),

    /// Actor's role does not permit the operation
    #[error(transparent)]
    Forbidden(#[from] AccessDenied),
}
