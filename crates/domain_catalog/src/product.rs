//! Policy product reference data

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{Money, ProductId};

use crate::error::CatalogError;

/// Product category, gating eligibility for premium features
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PolicyTier {
    Basic,
    Premium,
    Family,
    Senior,
}

impl PolicyTier {
    /// Whether holders on this tier may book clinical appointments
    pub fn supports_appointments(self) -> bool {
        match self {
            PolicyTier::Premium | PolicyTier::Senior => true,
            PolicyTier::Basic | PolicyTier::Family => false,
        }
    }
}

impl std::fmt::Display for PolicyTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PolicyTier::Basic => "BASIC",
            PolicyTier::Premium => "PREMIUM",
            PolicyTier::Family => "FAMILY",
            PolicyTier::Senior => "SENIOR",
        };
        write!(f, "{name}")
    }
}

/// A named policy product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyProduct {
    pub id: ProductId,
    pub name: String,
    pub tier: PolicyTier,
    pub coverage_amount: Money,
    /// Monthly premium
    pub premium_amount: Money,
    pub duration_months: u32,
    pub description: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Field set for creating or editing a product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub tier: PolicyTier,
    pub coverage_amount: Money,
    pub premium_amount: Money,
    pub duration_months: u32,
    pub description: Option<String>,
}

impl ProductDraft {
    fn validate(&self) -> Result<(), CatalogError> {
        if self.name.trim().is_empty() {
            return Err(CatalogError::Validation("product name is required".into()));
        }
        if !self.coverage_amount.is_positive() {
            return Err(CatalogError::Validation(
                "coverage amount must be positive".into(),
            ));
        }
        if !self.premium_amount.is_positive() {
            return Err(CatalogError::Validation(
                "premium amount must be positive".into(),
            ));
        }
        if self.duration_months == 0 {
            return Err(CatalogError::Validation(
                "duration must be at least one month".into(),
            ));
        }
        Ok(())
    }
}

impl PolicyProduct {
    /// Creates an active product from a validated draft
    pub fn create(draft: ProductDraft) -> Result<Self, CatalogError> {
        draft.validate()?;
        let now = Utc::now();
        Ok(Self {
            id: ProductId::new_v7(),
            name: draft.name,
            tier: draft.tier,
            coverage_amount: draft.coverage_amount,
            premium_amount: draft.premium_amount,
            duration_months: draft.duration_months,
            description: draft.description,
            active: true,
            created_at: now,
            updated_at: now,
        })
    }

    /// Applies a staff edit; existing enrollments are unaffected
    pub fn apply(&mut self, draft: ProductDraft) -> Result<(), CatalogError> {
        draft.validate()?;
        self.name = draft.name;
        self.tier = draft.tier;
        self.coverage_amount = draft.coverage_amount;
        self.premium_amount = draft.premium_amount;
        self.duration_months = draft.duration_months;
        self.description = draft.description;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Soft delete; the product stops being offered but stays resolvable
    pub fn retire(&mut self) {
        self.active = false;
        self.updated_at = Utc::now();
    }

    /// The full premium charged at purchase: monthly premium times term
    pub fn total_premium(&self) -> Money {
        self.premium_amount
            .multiply(Decimal::from(self.duration_months))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Currency;
    use rust_decimal_macros::dec;

    fn draft() -> ProductDraft {
        ProductDraft {
            name: "Premium Health Plus".into(),
            tier: PolicyTier::Premium,
            coverage_amount: Money::new(dec!(100000), Currency::USD),
            premium_amount: Money::new(dec!(250), Currency::USD),
            duration_months: 12,
            description: None,
        }
    }

    #[test]
    fn test_create_product_is_active() {
        let product = PolicyProduct::create(draft()).unwrap();
        assert!(product.active);
        assert_eq!(product.duration_months, 12);
    }

    #[test]
    fn test_total_premium_multiplies_by_term() {
        let product = PolicyProduct::create(draft()).unwrap();
        assert_eq!(product.total_premium().amount(), dec!(3000));
    }

    #[test]
    fn test_zero_duration_rejected() {
        let mut d = draft();
        d.duration_months = 0;
        assert!(matches!(
            PolicyProduct::create(d),
            Err(CatalogError::Validation(_))
        ));
    }

    #[test]
    fn test_tier_gate_is_premium_and_senior_only() {
        assert!(PolicyTier::Premium.supports_appointments());
        assert!(PolicyTier::Senior.supports_appointments());
        assert!(!PolicyTier::Basic.supports_appointments());
        assert!(!PolicyTier::Family.supports_appointments());
    }

    #[test]
    fn test_retire_keeps_product_resolvable() {
        let mut product = PolicyProduct::create(draft()).unwrap();
        product.retire();
        assert!(!product.active);
        assert_eq!(product.name, "Premium Health Plus");
    }
}
