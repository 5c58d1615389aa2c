//! Catalog domain errors

use thiserror::Error;

use core_kernel::{AccessDenied, PortError};

/// Errors that can occur in the catalog domain
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Request failed validation before any state was touched
    #[error("Validation error: {0}")]
    Validation(String),

    /// Collaborator failure (store lookup, save)
    #[error(transparent)]
    Port(#[from] PortError),

    /// Actor's role does not permit the operation
    #[error(transparent)]
    Forbidden(#[from] AccessDenied),
}
