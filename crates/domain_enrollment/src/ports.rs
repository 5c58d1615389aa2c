//! Enrollment domain ports
//!
//! The enrollment engine consumes three collaborators through these traits:
//! its own store, the payment gateway, and the certificate generator.
//! Saves are conditional on the version the caller loaded, so two staff
//! members approving the same enrollment concurrently cannot both win.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use core_kernel::{DomainPort, EnrollmentId, Money, PortError, UserId};

use crate::enrollment::{Enrollment, EnrollmentStatus};

/// Outcome of a synchronous payment capture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Success,
    Failed,
}

/// Receipt returned by the payment gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentReceipt {
    pub status: PaymentStatus,
    pub transaction_id: String,
}

impl PaymentReceipt {
    pub fn succeeded(&self) -> bool {
        self.status == PaymentStatus::Success
    }
}

/// Port for the enrollment store
#[async_trait]
pub trait EnrollmentPort: DomainPort {
    /// Retrieves an enrollment by id, or `PortError::NotFound`
    async fn get(&self, id: EnrollmentId) -> Result<Enrollment, PortError>;

    /// The user's most recent enrollment, if any
    async fn find_by_user(&self, user_id: UserId) -> Result<Option<Enrollment>, PortError>;

    /// All enrollments currently in `status`
    async fn find_by_status(
        &self,
        status: EnrollmentStatus,
    ) -> Result<Vec<Enrollment>, PortError>;

    /// Conditional upsert
    ///
    /// Fails with `PortError::Conflict` when the stored version no longer
    /// matches `expected_version`. Returns the new version on success.
    async fn save(
        &self,
        enrollment: &Enrollment,
        expected_version: u32,
    ) -> Result<u32, PortError>;
}

/// Port for synchronous payment capture
#[async_trait]
pub trait PaymentPort: DomainPort {
    async fn charge(&self, user_id: UserId, amount: Money) -> Result<PaymentReceipt, PortError>;
}

/// Port for policy certificate generation
#[async_trait]
pub trait CertificatePort: DomainPort {
    /// Renders the enrollment certificate and returns a document handle
    async fn generate_certificate(&self, enrollment: &Enrollment) -> Result<String, PortError>;
}

/// In-memory adapters for tests
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// In-memory enrollment store with compare-and-swap saves
    #[derive(Debug, Default, Clone)]
    pub struct MemoryEnrollmentStore {
        enrollments: Arc<RwLock<HashMap<EnrollmentId, Enrollment>>>,
    }

    impl MemoryEnrollmentStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Seeds the store, bypassing the version check
        pub async fn insert(&self, enrollment: Enrollment) {
            self.enrollments
                .write()
                .await
                .insert(enrollment.id, enrollment);
        }
    }

    impl DomainPort for MemoryEnrollmentStore {}

    #[async_trait]
    impl EnrollmentPort for MemoryEnrollmentStore {
        async fn get(&self, id: EnrollmentId) -> Result<Enrollment, PortError> {
            self.enrollments
                .read()
                .await
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Enrollment", id))
        }

        async fn find_by_user(
            &self,
            user_id: UserId,
        ) -> Result<Option<Enrollment>, PortError> {
            Ok(self
                .enrollments
                .read()
                .await
                .values()
                .filter(|e| e.user_id == user_id)
                .max_by_key(|e| e.created_at)
                .cloned())
        }

        async fn find_by_status(
            &self,
            status: EnrollmentStatus,
        ) -> Result<Vec<Enrollment>, PortError> {
            Ok(self
                .enrollments
                .read()
                .await
                .values()
                .filter(|e| e.status == status)
                .cloned()
                .collect())
        }

        async fn save(
            &self,
            enrollment: &Enrollment,
            expected_version: u32,
        ) -> Result<u32, PortError> {
            let mut enrollments = self.enrollments.write().await;
            if let Some(existing) = enrollments.get(&enrollment.id) {
                if existing.version != expected_version {
                    return Err(PortError::stale_version("Enrollment", enrollment.id));
                }
            } else if expected_version != 0 {
                return Err(PortError::stale_version("Enrollment", enrollment.id));
            }

            let new_version = expected_version + 1;
            let mut stored = enrollment.clone();
            stored.version = new_version;
            enrollments.insert(stored.id, stored);
            Ok(new_version)
        }
    }

    /// Scriptable payment gateway
    #[derive(Debug, Default)]
    pub struct MockPaymentGateway {
        decline_all: Arc<RwLock<bool>>,
        sequence: AtomicU64,
        charges: Arc<RwLock<Vec<(UserId, Money)>>>,
    }

    impl MockPaymentGateway {
        pub fn new() -> Self {
            Self::default()
        }

        /// Makes every subsequent charge fail
        pub async fn decline_all(&self, decline: bool) {
            *self.decline_all.write().await = decline;
        }

        /// Charges captured so far
        pub async fn charges(&self) -> Vec<(UserId, Money)> {
            self.charges.read().await.clone()
        }
    }

    impl DomainPort for MockPaymentGateway {}

    #[async_trait]
    impl PaymentPort for MockPaymentGateway {
        async fn charge(
            &self,
            user_id: UserId,
            amount: Money,
        ) -> Result<PaymentReceipt, PortError> {
            let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
            let transaction_id = format!("TXN-{seq:08}");
            if *self.decline_all.read().await {
                return Ok(PaymentReceipt {
                    status: PaymentStatus::Failed,
                    transaction_id,
                });
            }
            self.charges.write().await.push((user_id, amount));
            Ok(PaymentReceipt {
                status: PaymentStatus::Success,
                transaction_id,
            })
        }
    }

    /// Certificate generator returning deterministic handles
    #[derive(Debug, Default)]
    pub struct MockCertificateService {
        fail: Arc<RwLock<bool>>,
    }

    impl MockCertificateService {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn fail_generation(&self, fail: bool) {
            *self.fail.write().await = fail;
        }
    }

    impl DomainPort for MockCertificateService {}

    #[async_trait]
    impl CertificatePort for MockCertificateService {
        async fn generate_certificate(
            &self,
            enrollment: &Enrollment,
        ) -> Result<String, PortError> {
            if *self.fail.read().await {
                return Err(PortError::internal("certificate renderer unavailable"));
            }
            Ok(format!("documents://certificates/{}.pdf", enrollment.id))
        }
    }
}
