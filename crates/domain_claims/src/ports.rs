//! Claims domain ports

use async_trait::async_trait;

use core_kernel::{ClaimId, DomainPort, EnrollmentId, PortError};

use crate::claim::{Claim, ClaimStatus};
use crate::settlement::FinanceRecord;

/// Port for the claim store
#[async_trait]
pub trait ClaimPort: DomainPort {
    /// Retrieves a claim by id, or `PortError::NotFound`
    async fn get(&self, id: ClaimId) -> Result<Claim, PortError>;

    /// All claims filed under one enrollment
    async fn find_by_enrollment(
        &self,
        enrollment_id: EnrollmentId,
    ) -> Result<Vec<Claim>, PortError>;

    /// All claims currently in `status`
    async fn find_by_status(&self, status: ClaimStatus) -> Result<Vec<Claim>, PortError>;

    /// Conditional upsert; `PortError::Conflict` on a stale version
    async fn save(&self, claim: &Claim, expected_version: u32) -> Result<u32, PortError>;
}

/// Port for the settlement-record store
#[async_trait]
pub trait FinanceRecordPort: DomainPort {
    async fn save(&self, record: &FinanceRecord) -> Result<(), PortError>;

    async fn find_by_claim(&self, claim_id: ClaimId) -> Result<Vec<FinanceRecord>, PortError>;
}

/// In-memory adapters for tests
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    use core_kernel::FinanceRecordId;

    /// In-memory claim store with compare-and-swap saves
    #[derive(Debug, Default, Clone)]
    pub struct MemoryClaimStore {
        claims: Arc<RwLock<HashMap<ClaimId, Claim>>>,
    }

    impl MemoryClaimStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Seeds the store, bypassing the version check
        pub async fn insert(&self, claim: Claim) {
            self.claims.write().await.insert(claim.id, claim);
        }
    }

    impl DomainPort for MemoryClaimStore {}

    #[async_trait]
    impl ClaimPort for MemoryClaimStore {
        async fn get(&self, id: ClaimId) -> Result<Claim, PortError> {
            self.claims
                .read()
                .await
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Claim", id))
        }

        async fn find_by_enrollment(
            &self,
            enrollment_id: EnrollmentId,
        ) -> Result<Vec<Claim>, PortError> {
            Ok(self
                .claims
                .read()
                .await
                .values()
                .filter(|c| c.enrollment_id == enrollment_id)
                .cloned()
                .collect())
        }

        async fn find_by_status(&self, status: ClaimStatus) -> Result<Vec<Claim>, PortError> {
            Ok(self
                .claims
                .read()
                .await
                .values()
                .filter(|c| c.status == status)
                .cloned()
                .collect())
        }

        async fn save(&self, claim: &Claim, expected_version: u32) -> Result<u32, PortError> {
            let mut claims = self.claims.write().await;
            if let Some(existing) = claims.get(&claim.id) {
                if existing.version != expected_version {
                    return Err(PortError::stale_version("Claim", claim.id));
                }
            } else if expected_version != 0 {
                return Err(PortError::stale_version("Claim", claim.id));
            }

            let new_version = expected_version + 1;
            let mut stored = claim.clone();
            stored.version = new_version;
            claims.insert(stored.id, stored);
            Ok(new_version)
        }
    }

    /// In-memory settlement-record store
    #[derive(Debug, Default, Clone)]
    pub struct MemoryFinanceRecordStore {
        records: Arc<RwLock<HashMap<FinanceRecordId, FinanceRecord>>>,
    }

    impl MemoryFinanceRecordStore {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl DomainPort for MemoryFinanceRecordStore {}

    #[async_trait]
    impl FinanceRecordPort for MemoryFinanceRecordStore {
        async fn save(&self, record: &FinanceRecord) -> Result<(), PortError> {
            self.records
                .write()
                .await
                .insert(record.id, record.clone());
            Ok(())
        }

        async fn find_by_claim(
            &self,
            claim_id: ClaimId,
        ) -> Result<Vec<FinanceRecord>, PortError> {
            Ok(self
                .records
                .read()
                .await
                .values()
                .filter(|r| r.claim_id == claim_id)
                .cloned()
                .collect())
        }
    }
}
