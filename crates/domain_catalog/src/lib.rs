//! Policy Catalog Domain
//!
//! Reference data for the policy products that enrollments subscribe to.
//! Products are immutable-ish: staff edits only affect future enrollments,
//! and retirement is a soft delete (`active = false`) so historical
//! enrollments keep resolving their product.
//!
//! The catalog also owns the feature-tier gate: only PREMIUM and SENIOR
//! products grant access to clinical appointment booking.

pub mod error;
pub mod ports;
pub mod product;
pub mod service;

pub use error::CatalogError;
pub use ports::CatalogPort;
pub use product::{PolicyProduct, PolicyTier, ProductDraft};
pub use service::CatalogService;
