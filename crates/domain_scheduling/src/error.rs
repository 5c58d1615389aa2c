//! Scheduling domain errors

use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

use core_kernel::{AccessDenied, PortError};
use domain_catalog::PolicyTier;

use crate::appointment::AppointmentStatus;

/// Errors that can occur in the scheduling domain
#[derive(Debug, Error)]
pub enum SchedulingError {
    /// Request failed validation before any state was touched
    #[error("Validation error: {0}")]
    Validation(String),

    /// Appointment booking is gated to PREMIUM and SENIOR tiers
    #[error(
        "Appointment booking is only available for PREMIUM and SENIOR policy holders. \
         Current tier: {tier}"
    )]
    TierNotEligible { tier: PolicyTier },

    /// The doctor is not accepting bookings
    #[error("Doctor is not available")]
    DoctorUnavailable,

    /// Another non-terminal appointment already holds this slot
    #[error("Time slot {date} {time} is already booked")]
    SlotTaken { date: NaiveDate, time: NaiveTime },

    /// The responding doctor is not the assigned doctor
    #[error("Appointment is assigned to a different doctor")]
    NotAuthorized,

    /// The appointment is not in a state this response applies to
    #[error("Appointment cannot be responded to. Current status: {current}")]
    InvalidState { current: AppointmentStatus },

    /// The appointment belongs to a different enrollment
    #[error("Appointment belongs to a different policy holder")]
    NotOwner,

    /// Edits and deletes only apply before resolution
    #[error("Appointment can no longer be changed. Current status: {current}")]
    NotEditable { current: AppointmentStatus },

    /// Move not present in the legal-transition table
    #[error("Invalid appointment status transition from {from} to {to}")]
    InvalidStatusTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    /// Collaborator failure (store, catalog, enrollment lookup)
    #[error(transparent)]
    Port(#[from] PortError),

    /// Actor's role does not permit the operation
    #[error(transparent)]
    Forbidden(#[from] AccessDenied),
}
