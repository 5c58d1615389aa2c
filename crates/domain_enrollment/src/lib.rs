//! Enrollment Domain
//!
//! A policy holder's subscription to a catalog product, from purchase through
//! the dual-approval activation gate to the terminal states.
//!
//! # Lifecycle
//!
//! ```text
//! PendingApproval -> Active -> Suspended -> Active
//!                          \-> Cancelled
//!                          \-> Expired
//! ```
//!
//! Activation is configurable: under [`ActivationMode::DualApproval`] a new
//! enrollment waits for independent policy-manager and finance-officer
//! sign-offs; under [`ActivationMode::ImmediateOnPayment`] it activates as
//! soon as the payment clears. The choice is always explicit - there is no
//! default mode.

pub mod config;
pub mod enrollment;
pub mod error;
pub mod events;
pub mod ports;
pub mod service;

pub use config::{ActivationMode, EnrollmentConfig};
pub use enrollment::{Enrollment, EnrollmentStatus, Signoff};
pub use error::EnrollmentError;
pub use events::{EnrollmentEvent, SignoffRole};
pub use ports::{CertificatePort, EnrollmentPort, PaymentPort, PaymentReceipt, PaymentStatus};
pub use service::EnrollmentService;
