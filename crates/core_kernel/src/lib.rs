//! Core Kernel - Foundational types and utilities for the health-policy system
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Money types with precise decimal arithmetic
//! - Strongly-typed identifiers
//! - Actor/role capability checks performed once at workflow boundaries
//! - Audit and notification ports shared by every workflow engine

pub mod actor;
pub mod audit;
pub mod identifiers;
pub mod money;
pub mod notify;
pub mod ports;

pub use actor::{AccessDenied, Actor, Capability, Role};
pub use audit::{AuditAction, AuditEntry, AuditRecorder, EntityType};
pub use identifiers::{
    AppointmentId, AuditEventId, ClaimId, DoctorId, EnrollmentId, FinanceRecordId, ProductId,
    UserId,
};
pub use money::{Currency, Money, MoneyError};
pub use notify::Notifier;
pub use ports::{DomainPort, PortError};
