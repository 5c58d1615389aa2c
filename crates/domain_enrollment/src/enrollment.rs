//! Enrollment aggregate root
//!
//! The Enrollment is the consistency boundary for a policy holder's
//! subscription. All status writes go through guarded transition methods;
//! the legal transitions are one explicit table in
//! [`EnrollmentStatus::can_transition_to`].
//!
//! # Invariants
//!
//! - Under the dual-approval entry path, `Active` implies both sign-offs
//!   are recorded
//! - `end_date` is always `start_date` plus the product term, recomputed on
//!   every upgrade
//! - `Cancelled` and `Expired` are terminal

use chrono::{DateTime, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{EnrollmentId, ProductId, UserId};
use domain_catalog::PolicyProduct;

use crate::config::ActivationMode;
use crate::error::EnrollmentError;
use crate::events::{EnrollmentEvent, SignoffRole};

/// Enrollment lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnrollmentStatus {
    PendingApproval,
    Active,
    Suspended,
    Expired,
    Cancelled,
}

impl EnrollmentStatus {
    /// No transition is defined out of a terminal state
    pub fn is_terminal(self) -> bool {
        matches!(self, EnrollmentStatus::Expired | EnrollmentStatus::Cancelled)
    }

    /// The legal-transition table for enrollments
    pub fn can_transition_to(self, target: EnrollmentStatus) -> bool {
        use EnrollmentStatus::*;
        matches!(
            (self, target),
            (PendingApproval, Active)
                | (Active, Suspended)
                | (Active, Cancelled)
                | (Active, Expired)
                | (Suspended, Active)
        )
    }
}

impl std::fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EnrollmentStatus::PendingApproval => "PENDING_APPROVAL",
            EnrollmentStatus::Active => "ACTIVE",
            EnrollmentStatus::Suspended => "SUSPENDED",
            EnrollmentStatus::Expired => "EXPIRED",
            EnrollmentStatus::Cancelled => "CANCELLED",
        };
        write!(f, "{name}")
    }
}

/// One recorded approval: who signed off and when
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signoff {
    pub approver: String,
    pub at: DateTime<Utc>,
}

/// A policy holder's subscription to a catalog product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: EnrollmentId,
    pub user_id: UserId,
    pub product_id: ProductId,
    /// Product name snapshot for audit detail and upgrade history
    pub product_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: EnrollmentStatus,
    pub policy_manager_signoff: Option<Signoff>,
    pub finance_officer_signoff: Option<Signoff>,
    pub certificate_url: Option<String>,
    /// Optimistic-concurrency counter, bumped by the store on save
    pub version: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Domain events pending emission
    #[serde(skip)]
    events: Vec<EnrollmentEvent>,
}

impl Enrollment {
    /// Opens a new enrollment for `user` on `product`
    ///
    /// The starting status depends on the configured activation mode:
    /// dual approval parks the enrollment in `PendingApproval`, immediate
    /// activation goes straight to `Active` (payment has already cleared by
    /// the time this runs).
    pub fn open(user_id: UserId, product: &PolicyProduct, activation: ActivationMode) -> Self {
        let now = Utc::now();
        let start = now.date_naive();
        let status = match activation {
            ActivationMode::DualApproval => EnrollmentStatus::PendingApproval,
            ActivationMode::ImmediateOnPayment => EnrollmentStatus::Active,
        };
        let id = EnrollmentId::new_v7();

        Self {
            id,
            user_id,
            product_id: product.id,
            product_name: product.name.clone(),
            start_date: start,
            end_date: term_end(start, product.duration_months),
            status,
            policy_manager_signoff: None,
            finance_officer_signoff: None,
            certificate_url: None,
            version: 0,
            created_at: now,
            updated_at: now,
            events: vec![EnrollmentEvent::Created {
                enrollment_id: id,
                product_name: product.name.clone(),
                status,
                timestamp: now,
            }],
        }
    }

    /// Returns accumulated domain events and clears them
    pub fn take_events(&mut self) -> Vec<EnrollmentEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_active(&self) -> bool {
        self.status == EnrollmentStatus::Active
    }

    /// Records the policy-manager sign-off
    ///
    /// # Errors
    ///
    /// Fails unless the enrollment is awaiting approval, or if this
    /// sign-off was already recorded. Activates the enrollment when the
    /// finance-officer sign-off is already present.
    pub fn approve_by_policy_manager(&mut self, approver: &str) -> Result<(), EnrollmentError> {
        if self.status != EnrollmentStatus::PendingApproval {
            return Err(EnrollmentError::NotPendingApproval {
                current: self.status,
            });
        }
        if self.policy_manager_signoff.is_some() {
            return Err(EnrollmentError::AlreadyApproved {
                role: SignoffRole::PolicyManager,
            });
        }

        let now = Utc::now();
        self.policy_manager_signoff = Some(Signoff {
            approver: approver.to_string(),
            at: now,
        });
        self.updated_at = now;
        self.events.push(EnrollmentEvent::SignoffRecorded {
            enrollment_id: self.id,
            role: SignoffRole::PolicyManager,
            approver: approver.to_string(),
            timestamp: now,
        });

        if self.finance_officer_signoff.is_some() {
            self.activate(now);
        }
        Ok(())
    }

    /// Records the finance-officer sign-off
    ///
    /// Mirror of [`Self::approve_by_policy_manager`].
    pub fn approve_by_finance_officer(&mut self, approver: &str) -> Result<(), EnrollmentError> {
        if self.status != EnrollmentStatus::PendingApproval {
            return Err(EnrollmentError::NotPendingApproval {
                current: self.status,
            });
        }
        if self.finance_officer_signoff.is_some() {
            return Err(EnrollmentError::AlreadyApproved {
                role: SignoffRole::FinanceOfficer,
            });
        }

        let now = Utc::now();
        self.finance_officer_signoff = Some(Signoff {
            approver: approver.to_string(),
            at: now,
        });
        self.updated_at = now;
        self.events.push(EnrollmentEvent::SignoffRecorded {
            enrollment_id: self.id,
            role: SignoffRole::FinanceOfficer,
            approver: approver.to_string(),
            timestamp: now,
        });

        if self.policy_manager_signoff.is_some() {
            self.activate(now);
        }
        Ok(())
    }

    fn activate(&mut self, now: DateTime<Utc>) {
        self.status = EnrollmentStatus::Active;
        self.updated_at = now;
        self.events.push(EnrollmentEvent::Activated {
            enrollment_id: self.id,
            timestamp: now,
        });
    }

    /// Switches an active enrollment to a new product
    ///
    /// The coverage term restarts today and the enrollment stays active;
    /// an upgrade does not go back through the approval gate.
    pub fn upgrade(&mut self, product: &PolicyProduct) -> Result<(), EnrollmentError> {
        if self.status != EnrollmentStatus::Active {
            return Err(EnrollmentError::NotActive {
                current: self.status,
            });
        }

        let now = Utc::now();
        let from_product = std::mem::replace(&mut self.product_name, product.name.clone());
        self.product_id = product.id;
        self.start_date = now.date_naive();
        self.end_date = term_end(self.start_date, product.duration_months);
        self.updated_at = now;
        self.events.push(EnrollmentEvent::Upgraded {
            enrollment_id: self.id,
            from_product,
            to_product: product.name.clone(),
            timestamp: now,
        });
        Ok(())
    }

    /// Temporarily deactivates an active enrollment
    pub fn suspend(&mut self, reason: &str) -> Result<(), EnrollmentError> {
        if self.status != EnrollmentStatus::Active {
            return Err(EnrollmentError::NotActive {
                current: self.status,
            });
        }

        let now = Utc::now();
        self.status = EnrollmentStatus::Suspended;
        self.updated_at = now;
        self.events.push(EnrollmentEvent::Suspended {
            enrollment_id: self.id,
            reason: reason.to_string(),
            timestamp: now,
        });
        Ok(())
    }

    /// Restores a suspended enrollment to active
    ///
    /// # Errors
    ///
    /// Fails if the enrollment is not suspended, or if its coverage term
    /// has already run out.
    pub fn reactivate(&mut self) -> Result<(), EnrollmentError> {
        if self.status != EnrollmentStatus::Suspended {
            return Err(EnrollmentError::NotSuspended {
                current: self.status,
            });
        }
        let today = Utc::now().date_naive();
        if self.end_date < today {
            return Err(EnrollmentError::PolicyExpired {
                end_date: self.end_date,
            });
        }

        let now = Utc::now();
        self.status = EnrollmentStatus::Active;
        self.updated_at = now;
        self.events.push(EnrollmentEvent::Reactivated {
            enrollment_id: self.id,
            timestamp: now,
        });
        Ok(())
    }

    /// Cancels an active enrollment; terminal
    pub fn cancel(&mut self, reason: &str) -> Result<(), EnrollmentError> {
        if self.status != EnrollmentStatus::Active {
            return Err(EnrollmentError::NotActive {
                current: self.status,
            });
        }

        let now = Utc::now();
        self.status = EnrollmentStatus::Cancelled;
        self.updated_at = now;
        self.events.push(EnrollmentEvent::Cancelled {
            enrollment_id: self.id,
            reason: reason.to_string(),
            timestamp: now,
        });
        Ok(())
    }

    /// Expires the enrollment if its term has run out as of `today`
    ///
    /// Returns whether a transition happened, so expiry sweeps stay
    /// idempotent.
    pub fn expire_if_due(&mut self, today: NaiveDate) -> bool {
        if self.status != EnrollmentStatus::Active || self.end_date > today {
            return false;
        }

        let now = Utc::now();
        self.status = EnrollmentStatus::Expired;
        self.updated_at = now;
        self.events.push(EnrollmentEvent::Expired {
            enrollment_id: self.id,
            end_date: self.end_date,
            timestamp: now,
        });
        true
    }
}

/// Coverage end date: start plus the product term in calendar months
fn term_end(start: NaiveDate, months: u32) -> NaiveDate {
    start + Months::new(months)
}
