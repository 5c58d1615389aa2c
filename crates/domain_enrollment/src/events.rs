//! Domain events for the enrollment aggregate
//!
//! Events capture every lifecycle transition. The service layer drains them
//! after a successful save and turns them into audit entries and
//! notifications, keeping those side effects out of the transaction path.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::EnrollmentId;

use crate::enrollment::EnrollmentStatus;

/// The two independent approval roles in the activation gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignoffRole {
    PolicyManager,
    FinanceOfficer,
}

impl std::fmt::Display for SignoffRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignoffRole::PolicyManager => write!(f, "Policy Manager"),
            SignoffRole::FinanceOfficer => write!(f, "Finance Officer"),
        }
    }
}

/// Domain events emitted by the Enrollment aggregate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EnrollmentEvent {
    Created {
        enrollment_id: EnrollmentId,
        product_name: String,
        status: EnrollmentStatus,
        timestamp: DateTime<Utc>,
    },
    SignoffRecorded {
        enrollment_id: EnrollmentId,
        role: SignoffRole,
        approver: String,
        timestamp: DateTime<Utc>,
    },
    Activated {
        enrollment_id: EnrollmentId,
        timestamp: DateTime<Utc>,
    },
    Upgraded {
        enrollment_id: EnrollmentId,
        from_product: String,
        to_product: String,
        timestamp: DateTime<Utc>,
    },
    Suspended {
        enrollment_id: EnrollmentId,
        reason: String,
        timestamp: DateTime<Utc>,
    },
    Reactivated {
        enrollment_id: EnrollmentId,
        timestamp: DateTime<Utc>,
    },
    Cancelled {
        enrollment_id: EnrollmentId,
        reason: String,
        timestamp: DateTime<Utc>,
    },
    Expired {
        enrollment_id: EnrollmentId,
        end_date: NaiveDate,
        timestamp: DateTime<Utc>,
    },
}

impl EnrollmentEvent {
    /// Returns the enrollment ID associated with this event
    pub fn enrollment_id(&self) -> EnrollmentId {
        match self {
            EnrollmentEvent::Created { enrollment_id, .. } => *enrollment_id,
            EnrollmentEvent::SignoffRecorded { enrollment_id, .. } => *enrollment_id,
            EnrollmentEvent::Activated { enrollment_id, .. } => *enrollment_id,
            EnrollmentEvent::Upgraded { enrollment_id, .. } => *enrollment_id,
            EnrollmentEvent::Suspended { enrollment_id, .. } => *enrollment_id,
            EnrollmentEvent::Reactivated { enrollment_id, .. } => *enrollment_id,
            EnrollmentEvent::Cancelled { enrollment_id, .. } => *enrollment_id,
            EnrollmentEvent::Expired { enrollment_id, .. } => *enrollment_id,
        }
    }

    /// Returns the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            EnrollmentEvent::Created { .. } => "EnrollmentCreated",
            EnrollmentEvent::SignoffRecorded { .. } => "SignoffRecorded",
            EnrollmentEvent::Activated { .. } => "EnrollmentActivated",
            EnrollmentEvent::Upgraded { .. } => "EnrollmentUpgraded",
            EnrollmentEvent::Suspended { .. } => "EnrollmentSuspended",
            EnrollmentEvent::Reactivated { .. } => "EnrollmentReactivated",
            EnrollmentEvent::Cancelled { .. } => "EnrollmentCancelled",
            EnrollmentEvent::Expired { .. } => "EnrollmentExpired",
        }
    }
}
