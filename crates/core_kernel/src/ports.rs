//! Port infrastructure shared by all domain modules
//!
//! Each domain defines async port traits for the collaborators it consumes
//! (persistence, payment capture, certificate generation, notification
//! delivery). Adapters implement those traits; the domain services only ever
//! see the trait objects. All port methods return `Result<T, PortError>` so
//! error handling is uniform across adapters.

use std::fmt;
use thiserror::Error;

/// Error type for port operations
///
/// Provides a unified error type that all port implementations must use,
/// ensuring consistent error handling across adapters.
#[derive(Debug, Error)]
pub enum PortError {
    /// The requested entity was not found
    #[error("Not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    /// A validation error occurred
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// The operation conflicts with existing data
    ///
    /// Also covers conditional-save failures: a save whose expected version
    /// no longer matches the stored version is reported as a conflict.
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// Connection to the underlying system failed
    #[error("Connection error: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An internal error occurred
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl PortError {
    /// Creates a NotFound error
    pub fn not_found(entity_type: impl Into<String>, id: impl fmt::Display) -> Self {
        PortError::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        PortError::Validation {
            message: message.into(),
        }
    }

    /// Creates a Conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        PortError::Conflict {
            message: message.into(),
        }
    }

    /// Creates a version-conflict error for a conditional save
    pub fn stale_version(entity_type: impl Into<String>, id: impl fmt::Display) -> Self {
        PortError::Conflict {
            message: format!(
                "{} {} was modified concurrently; reload and retry",
                entity_type.into(),
                id
            ),
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        PortError::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Returns true if this error indicates the entity was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, PortError::NotFound { .. })
    }

    /// Returns true if this error indicates a write conflict
    pub fn is_conflict(&self) -> bool {
        matches!(self, PortError::Conflict { .. })
    }
}

/// Marker trait for all domain ports
///
/// All port traits should extend this marker to ensure they are
/// thread-safe and can be used in async contexts.
pub trait DomainPort: Send + Sync + 'static {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_entity() {
        let error = PortError::not_found("Enrollment", "123");
        assert!(error.is_not_found());
        assert!(error.to_string().contains("Enrollment"));
        assert!(error.to_string().contains("123"));
    }

    #[test]
    fn test_stale_version_is_conflict() {
        let error = PortError::stale_version("Claim", "abc");
        assert!(error.is_conflict());
        assert!(!error.is_not_found());
    }
}
