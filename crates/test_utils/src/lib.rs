//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! health-policy test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built test data for common entities
//! - `builders`: Builder patterns for test data construction
//! - `assertions`: Custom assertion helpers for domain types
//! - `telemetry`: One-shot tracing initialization for test runs

pub mod assertions;
pub mod builders;
pub mod fixtures;
pub mod telemetry;

pub use assertions::*;
pub use builders::*;
pub use fixtures::*;
pub use telemetry::*;
