//! Claims Domain
//!
//! Claim submission through multi-stage adjudication to financial
//! settlement, plus the read-time coverage-consumption aggregate.
//!
//! # Claim Lifecycle
//!
//! ```text
//! Submitted -> UnderReview -> ApprovedByClaims -> ForwardedToFinance -> ApprovedByFinance
//!          \              \-> Rejected                             \-> Rejected
//!           \-> RequiresCorrection -> Submitted (resubmission)
//! ```
//!
//! Every status write goes through one legal-transition table; there is no
//! unguarded overwrite path.

pub mod claim;
pub mod coverage;
pub mod error;
pub mod events;
pub mod ports;
pub mod requests;
pub mod service;
pub mod settlement;

pub use claim::{Claim, ClaimStatus, MedicalDetails};
pub use coverage::coverage_used_percent;
pub use error::ClaimError;
pub use events::ClaimEvent;
pub use ports::{ClaimPort, FinanceRecordPort};
pub use requests::SubmitClaimRequest;
pub use service::ClaimsService;
pub use settlement::{FinanceDecision, FinanceRecord};
