//! Catalog staff operations

use std::sync::Arc;

use core_kernel::{
    audit::record_or_warn, Actor, AuditAction, AuditEntry, AuditRecorder, Capability, EntityType,
    ProductId,
};

use crate::error::CatalogError;
use crate::ports::CatalogPort;
use crate::product::{PolicyProduct, ProductDraft};

/// Staff-facing catalog maintenance
pub struct CatalogService {
    catalog: Arc<dyn CatalogPort>,
    audit: Arc<dyn AuditRecorder>,
}

impl CatalogService {
    pub fn new(catalog: Arc<dyn CatalogPort>, audit: Arc<dyn AuditRecorder>) -> Self {
        Self { catalog, audit }
    }

    /// Creates a new product offering
    pub async fn create_product(
        &self,
        draft: ProductDraft,
        actor: &Actor,
    ) -> Result<PolicyProduct, CatalogError> {
        actor.require(Capability::ManageCatalog)?;

        let product = PolicyProduct::create(draft)?;
        self.catalog.save_product(&product).await?;

        tracing::info!(product_id = %product.id, name = %product.name, "product created");
        record_or_warn(
            self.audit.as_ref(),
            AuditEntry::new(
                EntityType::Product,
                product.id,
                AuditAction::Create,
                &actor.name,
                format!("Product created: {} ({})", product.name, product.tier),
            ),
        )
        .await;

        Ok(product)
    }

    /// Edits a product; enrollments already referencing it are unaffected
    pub async fn update_product(
        &self,
        id: ProductId,
        draft: ProductDraft,
        actor: &Actor,
    ) -> Result<PolicyProduct, CatalogError> {
        actor.require(Capability::ManageCatalog)?;

        let mut product = self.catalog.get_product(id).await?;
        product.apply(draft)?;
        self.catalog.save_product(&product).await?;

        record_or_warn(
            self.audit.as_ref(),
            AuditEntry::new(
                EntityType::Product,
                product.id,
                AuditAction::Update,
                &actor.name,
                format!("Product updated: {}", product.name),
            ),
        )
        .await;

        Ok(product)
    }

    /// Soft-deletes a product so it stops being offered
    pub async fn deactivate_product(
        &self,
        id: ProductId,
        actor: &Actor,
    ) -> Result<PolicyProduct, CatalogError> {
        actor.require(Capability::ManageCatalog)?;

        let mut product = self.catalog.get_product(id).await?;
        product.retire();
        self.catalog.save_product(&product).await?;

        record_or_warn(
            self.audit.as_ref(),
            AuditEntry::new(
                EntityType::Product,
                product.id,
                AuditAction::Delete,
                &actor.name,
                format!("Product retired: {}", product.name),
            ),
        )
        .await;

        Ok(product)
    }

    /// Products currently offered for purchase
    pub async fn active_products(&self) -> Result<Vec<PolicyProduct>, CatalogError> {
        Ok(self.catalog.find_products(true).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::mock::MemoryCatalog;
    use crate::product::PolicyTier;
    use core_kernel::audit::mock::MemoryAuditLog;
    use core_kernel::{Currency, Money, Role, UserId};
    use rust_decimal_macros::dec;

    fn staff() -> Actor {
        Actor::new(UserId::new(), "manager@medisure.io", Role::PolicyManager)
    }

    fn draft() -> ProductDraft {
        ProductDraft {
            name: "Basic Health".into(),
            tier: PolicyTier::Basic,
            coverage_amount: Money::new(dec!(50000), Currency::USD),
            premium_amount: Money::new(dec!(100), Currency::USD),
            duration_months: 12,
            description: Some("Entry-level cover".into()),
        }
    }

    fn service() -> (CatalogService, Arc<MemoryAuditLog>) {
        let audit = Arc::new(MemoryAuditLog::new());
        let service = CatalogService::new(Arc::new(MemoryCatalog::new()), audit.clone());
        (service, audit)
    }

    #[tokio::test]
    async fn test_create_then_deactivate_product() {
        let (service, _) = service();
        let product = service.create_product(draft(), &staff()).await.unwrap();
        assert_eq!(service.active_products().await.unwrap().len(), 1);

        service
            .deactivate_product(product.id, &staff())
            .await
            .unwrap();
        assert!(service.active_products().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_product_requires_catalog_capability() {
        let (service, _) = service();
        let holder = Actor::new(UserId::new(), "holder@medisure.io", Role::PolicyHolder);
        assert!(matches!(
            service.create_product(draft(), &holder).await,
            Err(CatalogError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_create_product_writes_audit_entry() {
        let (service, audit) = service();
        let product = service.create_product(draft(), &staff()).await.unwrap();

        let trail = audit
            .entries_for(EntityType::Product, &product.id.to_string())
            .await
            .unwrap();
        assert_eq!(trail.len(), 1);
        assert_eq!(trail[0].performed_by, "manager@medisure.io");
    }
}
