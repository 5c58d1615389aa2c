//! Catalog domain ports

use async_trait::async_trait;

use core_kernel::{DomainPort, PortError, ProductId};

use crate::product::PolicyProduct;

/// Port for the product store
///
/// Consumed read-only by the enrollment, claims, and scheduling engines;
/// written only by [`crate::CatalogService`].
#[async_trait]
pub trait CatalogPort: DomainPort {
    /// Retrieves a product by id, or `PortError::NotFound`
    async fn get_product(&self, id: ProductId) -> Result<PolicyProduct, PortError>;

    /// Lists products, optionally restricted to active ones
    async fn find_products(&self, active_only: bool) -> Result<Vec<PolicyProduct>, PortError>;

    /// Upserts a product
    async fn save_product(&self, product: &PolicyProduct) -> Result<(), PortError>;
}

/// In-memory catalog adapter for tests
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    #[derive(Debug, Default, Clone)]
    pub struct MemoryCatalog {
        products: Arc<RwLock<HashMap<ProductId, PolicyProduct>>>,
    }

    impl MemoryCatalog {
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates the catalog for tests
        pub async fn with_products(products: Vec<PolicyProduct>) -> Self {
            let catalog = Self::new();
            for product in products {
                catalog.products.write().await.insert(product.id, product);
            }
            catalog
        }
    }

    impl DomainPort for MemoryCatalog {}

    #[async_trait]
    impl CatalogPort for MemoryCatalog {
        async fn get_product(&self, id: ProductId) -> Result<PolicyProduct, PortError> {
            self.products
                .read()
                .await
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("PolicyProduct", id))
        }

        async fn find_products(
            &self,
            active_only: bool,
        ) -> Result<Vec<PolicyProduct>, PortError> {
            Ok(self
                .products
                .read()
                .await
                .values()
                .filter(|p| !active_only || p.active)
                .cloned()
                .collect())
        }

        async fn save_product(&self, product: &PolicyProduct) -> Result<(), PortError> {
            self.products
                .write()
                .await
                .insert(product.id, product.clone());
            Ok(())
        }
    }
}
