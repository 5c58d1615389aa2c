//! Enrollment engine configuration

use serde::{Deserialize, Serialize};

/// How a freshly purchased enrollment reaches `Active`
///
/// Deliberately has no `Default` implementation: deployments must choose an
/// activation policy explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationMode {
    /// New enrollments wait in `PendingApproval` until both the policy
    /// manager and the finance officer have signed off
    DualApproval,
    /// New enrollments activate as soon as the purchase payment clears
    ImmediateOnPayment,
}

/// Configuration for the enrollment engine
#[derive(Debug, Clone, Deserialize)]
pub struct EnrollmentConfig {
    pub activation: ActivationMode,
}

impl EnrollmentConfig {
    pub fn new(activation: ActivationMode) -> Self {
        Self { activation }
    }

    /// Loads configuration from `ENROLLMENT_`-prefixed environment variables
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("ENROLLMENT"))
            .build()?
            .try_deserialize()
    }
}
