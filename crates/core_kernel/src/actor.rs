//! Actors, roles, and capability checks
//!
//! Every workflow operation is performed by an [`Actor`]: an identified user
//! acting in exactly one operational role. Instead of scattering role
//! comparisons across call sites, each workflow entry point performs a single
//! typed capability check via [`Actor::require`]. The role-to-capability
//! mapping is one exhaustive match, so adding a role or capability forces
//! every combination to be considered.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::identifiers::UserId;

/// Operational roles in the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    PolicyManager,
    FinanceOfficer,
    ClaimsManager,
    Doctor,
    PolicyHolder,
}

/// Capabilities gated at workflow boundaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Create, edit, and retire catalog products
    ManageCatalog,
    /// Record the policy-manager sign-off on a pending enrollment
    ApproveAsPolicyManager,
    /// Record the finance-officer sign-off on a pending enrollment
    ApproveAsFinanceOfficer,
    /// Suspend, reactivate, or expire enrollments
    AdministerEnrollments,
    /// Cancel one's own enrollment
    CancelOwnEnrollment,
    /// Submit and resubmit claims against one's own enrollment
    SubmitClaims,
    /// Review claims and forward them to finance
    ReviewClaims,
    /// Settle forwarded claims with a finance decision
    SettleClaims,
    /// Book, edit, and delete one's own appointments
    BookAppointments,
    /// Accept or reject appointments assigned to oneself
    RespondToAppointments,
    /// Mark appointments completed, cancelled, or no-show
    ResolveAppointments,
}

impl Role {
    /// Whether this role carries the given capability
    pub fn permits(self, capability: Capability) -> bool {
        use Capability::*;
        match self {
            Role::PolicyManager => matches!(
                capability,
                ManageCatalog | ApproveAsPolicyManager | AdministerEnrollments
            ),
            Role::FinanceOfficer => {
                matches!(capability, ApproveAsFinanceOfficer | SettleClaims)
            }
            Role::ClaimsManager => matches!(capability, ReviewClaims),
            Role::Doctor => {
                matches!(capability, RespondToAppointments | ResolveAppointments)
            }
            Role::PolicyHolder => matches!(
                capability,
                CancelOwnEnrollment | SubmitClaims | BookAppointments
            ),
        }
    }
}

/// Raised when an actor attempts an operation its role does not permit
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{role:?} is not permitted to perform this operation")]
pub struct AccessDenied {
    pub role: Role,
    pub capability: Capability,
}

/// An identified user acting in a role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: UserId,
    /// Display identity recorded in audit trails (typically an email)
    pub name: String,
    pub role: Role,
}

impl Actor {
    pub fn new(user_id: UserId, name: impl Into<String>, role: Role) -> Self {
        Self {
            user_id,
            name: name.into(),
            role,
        }
    }

    /// Checks that this actor's role permits `capability`
    pub fn require(&self, capability: Capability) -> Result<(), AccessDenied> {
        if self.role.permits(capability) {
            Ok(())
        } else {
            Err(AccessDenied {
                role: self.role,
                capability,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(role: Role) -> Actor {
        Actor::new(UserId::new(), "test@medisure.io", role)
    }

    #[test]
    fn test_policy_manager_can_approve() {
        assert!(actor(Role::PolicyManager)
            .require(Capability::ApproveAsPolicyManager)
            .is_ok());
    }

    #[test]
    fn test_policy_manager_cannot_settle_claims() {
        let denied = actor(Role::PolicyManager)
            .require(Capability::SettleClaims)
            .unwrap_err();
        assert_eq!(denied.role, Role::PolicyManager);
    }

    #[test]
    fn test_finance_officer_cannot_sign_off_as_policy_manager() {
        assert!(actor(Role::FinanceOfficer)
            .require(Capability::ApproveAsPolicyManager)
            .is_err());
    }

    #[test]
    fn test_holder_can_book_but_not_respond() {
        let holder = actor(Role::PolicyHolder);
        assert!(holder.require(Capability::BookAppointments).is_ok());
        assert!(holder.require(Capability::RespondToAppointments).is_err());
    }

    #[test]
    fn test_doctor_can_respond_and_resolve() {
        let doctor = actor(Role::Doctor);
        assert!(doctor.require(Capability::RespondToAppointments).is_ok());
        assert!(doctor.require(Capability::ResolveAppointments).is_ok());
    }
}
