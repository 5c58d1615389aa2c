//! Scheduling Domain
//!
//! Clinical appointment booking between policy holders and doctors, with
//! doctor accept/reject semantics and schedule-conflict avoidance.
//!
//! # Appointment Lifecycle
//!
//! ```text
//! Pending -> Scheduled -> Confirmed -> Completed
//!        \           \-> Completed / Cancelled / NoShow
//!         \-> Rejected
//! ```
//!
//! Appointment booking is a tier-gated feature: only enrollments on a
//! PREMIUM or SENIOR product may book, and the gate is enforced inside the
//! engine at every mutating entry point.
//!
//! The no-double-booking invariant (one non-terminal appointment per doctor
//! and slot) is on by default and can only be waived by explicit
//! configuration.

pub mod appointment;
pub mod config;
pub mod doctor;
pub mod error;
pub mod ports;
pub mod requests;
pub mod service;

pub use appointment::{Appointment, AppointmentStatus};
pub use config::SchedulerConfig;
pub use doctor::Doctor;
pub use error::SchedulingError;
pub use ports::{AppointmentPort, DoctorPort};
pub use requests::BookAppointmentRequest;
pub use service::SchedulingService;
