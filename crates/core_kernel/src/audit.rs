//! Append-only audit trail
//!
//! Every state transition in the system emits one [`AuditEntry`] naming the
//! entity, the action, the performer, and a human-readable detail. Entries
//! are never mutated or deleted.
//!
//! Audit writes are best effort: [`record_or_warn`] swallows recorder
//! failures after logging them, so an unavailable audit store never fails or
//! rolls back the primary state transition.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identifiers::AuditEventId;
use crate::ports::{DomainPort, PortError};

/// Kinds of entities that appear in the audit trail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    Product,
    Enrollment,
    Claim,
    FinanceRecord,
    Appointment,
    Doctor,
}

/// Actions recorded against entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    Approve,
    Reject,
    Forward,
    Suspend,
    Reactivate,
    Cancel,
    Expire,
}

/// A single immutable audit record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: AuditEventId,
    pub entity_type: EntityType,
    /// Display form of the entity identifier
    pub entity_id: String,
    pub action: AuditAction,
    pub performed_by: String,
    pub details: String,
    pub timestamp: DateTime<Utc>,
}

impl AuditEntry {
    pub fn new(
        entity_type: EntityType,
        entity_id: impl std::fmt::Display,
        action: AuditAction,
        performed_by: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            id: AuditEventId::new_v7(),
            entity_type,
            entity_id: entity_id.to_string(),
            action,
            performed_by: performed_by.into(),
            details: details.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Port for the append-only audit store
#[async_trait]
pub trait AuditRecorder: DomainPort {
    /// Appends one entry to the trail
    async fn record(&self, entry: AuditEntry) -> Result<(), PortError>;

    /// Returns all entries for one entity, oldest first
    async fn entries_for(
        &self,
        entity_type: EntityType,
        entity_id: &str,
    ) -> Result<Vec<AuditEntry>, PortError>;
}

/// Records an audit entry, logging and swallowing any failure
///
/// The primary operation has already been persisted by the time this runs;
/// an incomplete trail is preferable to failing the caller.
pub async fn record_or_warn(recorder: &dyn AuditRecorder, entry: AuditEntry) {
    if let Err(err) = recorder.record(entry).await {
        tracing::warn!(error = %err, "audit write failed; continuing");
    }
}

/// In-memory audit store for tests
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// Append-only in-memory implementation of [`AuditRecorder`]
    #[derive(Debug, Default, Clone)]
    pub struct MemoryAuditLog {
        entries: Arc<RwLock<Vec<AuditEntry>>>,
        fail_writes: Arc<RwLock<bool>>,
    }

    impl MemoryAuditLog {
        pub fn new() -> Self {
            Self::default()
        }

        /// Makes subsequent `record` calls fail, for best-effort tests
        pub async fn fail_writes(&self, fail: bool) {
            *self.fail_writes.write().await = fail;
        }

        /// Returns a snapshot of the whole trail
        pub async fn all(&self) -> Vec<AuditEntry> {
            self.entries.read().await.clone()
        }
    }

    impl DomainPort for MemoryAuditLog {}

    #[async_trait]
    impl AuditRecorder for MemoryAuditLog {
        async fn record(&self, entry: AuditEntry) -> Result<(), PortError> {
            if *self.fail_writes.read().await {
                return Err(PortError::internal("audit store unavailable"));
            }
            self.entries.write().await.push(entry);
            Ok(())
        }

        async fn entries_for(
            &self,
            entity_type: EntityType,
            entity_id: &str,
        ) -> Result<Vec<AuditEntry>, PortError> {
            Ok(self
                .entries
                .read()
                .await
                .iter()
                .filter(|e| e.entity_type == entity_type && e.entity_id == entity_id)
                .cloned()
                .collect())
        }
    }
}
