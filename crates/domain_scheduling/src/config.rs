//! Scheduler configuration

use serde::Deserialize;

/// Configuration for the appointment scheduler
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerConfig {
    /// Reject bookings into a slot already held by a non-terminal
    /// appointment for the same doctor. On by default; switching this off
    /// is an explicit opt-in to downstream manual conflict resolution.
    #[serde(default = "default_enforce_slot_check")]
    pub enforce_slot_check: bool,
}

fn default_enforce_slot_check() -> bool {
    true
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enforce_slot_check: true,
        }
    }
}

impl SchedulerConfig {
    /// Loads configuration from `SCHEDULER_`-prefixed environment variables
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("SCHEDULER"))
            .build()?
            .try_deserialize()
    }
}
