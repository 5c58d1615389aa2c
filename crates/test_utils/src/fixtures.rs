//! Pre-built Test Fixtures
//!
//! Ready-to-use test data for common entities across the system. Fixed
//! fixtures are predictable for unit tests; the `random_*` helpers lean on
//! `fake` where uniqueness matters more than predictability.

use fake::faker::name::en::Name;
use fake::Fake;
use rust_decimal_macros::dec;

use core_kernel::{Actor, Currency, Money, Role, UserId};
use domain_catalog::{PolicyProduct, PolicyTier, ProductDraft};
use domain_scheduling::Doctor;

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// Standard coverage amount used in consumption scenarios
    pub fn usd_coverage() -> Money {
        Money::new(dec!(100000), Currency::USD)
    }

    /// A monthly premium
    pub fn usd_premium() -> Money {
        Money::new(dec!(250), Currency::USD)
    }

    /// A typical claim amount
    pub fn usd_claim() -> Money {
        Money::new(dec!(30000), Currency::USD)
    }

    /// An LKR amount for currency mismatch tests
    pub fn lkr_100() -> Money {
        Money::new(dec!(100), Currency::LKR)
    }
}

/// Fixture for catalog products
pub struct ProductFixtures;

impl ProductFixtures {
    /// A PREMIUM-tier product: appointment-eligible, 12-month term
    pub fn premium_health() -> PolicyProduct {
        PolicyProduct::create(ProductDraft {
            name: "Premium Health Plus".into(),
            tier: PolicyTier::Premium,
            coverage_amount: MoneyFixtures::usd_coverage(),
            premium_amount: MoneyFixtures::usd_premium(),
            duration_months: 12,
            description: Some("Full cover with clinical appointments".into()),
        })
        .expect("fixture product is valid")
    }

    /// A BASIC-tier product: no appointment access, 6-month term
    pub fn basic_health() -> PolicyProduct {
        PolicyProduct::create(ProductDraft {
            name: "Basic Health".into(),
            tier: PolicyTier::Basic,
            coverage_amount: Money::new(dec!(50000), Currency::USD),
            premium_amount: Money::new(dec!(100), Currency::USD),
            duration_months: 6,
            description: None,
        })
        .expect("fixture product is valid")
    }

    /// A SENIOR-tier product
    pub fn senior_care() -> PolicyProduct {
        PolicyProduct::create(ProductDraft {
            name: "Senior Care".into(),
            tier: PolicyTier::Senior,
            coverage_amount: Money::new(dec!(200000), Currency::USD),
            premium_amount: Money::new(dec!(400), Currency::USD),
            duration_months: 12,
            description: None,
        })
        .expect("fixture product is valid")
    }

    /// A retired product no longer offered for purchase
    pub fn retired() -> PolicyProduct {
        let mut product = Self::basic_health();
        product.retire();
        product
    }
}

/// Fixture for actors in each operational role
pub struct ActorFixtures;

impl ActorFixtures {
    pub fn policy_holder() -> Actor {
        Actor::new(UserId::new(), "holder@example.com", Role::PolicyHolder)
    }

    pub fn policy_manager() -> Actor {
        Actor::new(UserId::new(), "pm@medisure.io", Role::PolicyManager)
    }

    pub fn finance_officer() -> Actor {
        Actor::new(UserId::new(), "fo@medisure.io", Role::FinanceOfficer)
    }

    pub fn claims_manager() -> Actor {
        Actor::new(UserId::new(), "cm@medisure.io", Role::ClaimsManager)
    }

    /// A distinct holder per call, for multi-party scenarios
    pub fn random_holder() -> Actor {
        let name: String = Name().fake();
        let email = format!(
            "{}@example.com",
            name.to_lowercase().replace([' ', '.'], "")
        );
        Actor::new(UserId::new(), email, Role::PolicyHolder)
    }
}

/// Fixture for doctors and their acting identities
pub struct DoctorFixtures;

impl DoctorFixtures {
    /// An available cardiologist plus the actor behind the account
    pub fn cardiologist() -> (Doctor, Actor) {
        let user_id = UserId::new();
        let doctor = Doctor::new(user_id, "Perera", "Cardiology", "SLMC-10231");
        let actor = Actor::new(user_id, "perera@medisure.io", Role::Doctor);
        (doctor, actor)
    }

    /// A doctor who is not accepting bookings
    pub fn off_duty() -> (Doctor, Actor) {
        let user_id = UserId::new();
        let mut doctor = Doctor::new(user_id, "Silva", "Dermatology", "SLMC-20417");
        doctor.set_available(false);
        let actor = Actor::new(user_id, "silva@medisure.io", Role::Doctor);
        (doctor, actor)
    }

    /// A distinct available doctor per call
    pub fn random() -> (Doctor, Actor) {
        let user_id = UserId::new();
        let name: String = Name().fake();
        let registration = format!("SLMC-{}", (10000..99999).fake::<u32>());
        let doctor = Doctor::new(user_id, name.clone(), "General Practice", registration);
        let email = format!(
            "{}@medisure.io",
            name.to_lowercase().replace([' ', '.'], "")
        );
        let actor = Actor::new(user_id, email, Role::Doctor);
        (doctor, actor)
    }
}
