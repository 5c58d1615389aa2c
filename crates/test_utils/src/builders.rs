//! Test Data Builders
//!
//! Builder patterns for constructing test data with sensible defaults.
//! Tests specify only the fields they care about.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{DoctorId, Money, ProductId};
use domain_catalog::{PolicyProduct, PolicyTier, ProductDraft};
use domain_claims::SubmitClaimRequest;
use domain_scheduling::BookAppointmentRequest;

use crate::fixtures::MoneyFixtures;

/// Builder for catalog products
pub struct ProductBuilder {
    name: String,
    tier: PolicyTier,
    coverage_amount: Money,
    premium_amount: Money,
    duration_months: u32,
    description: Option<String>,
}

impl Default for ProductBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductBuilder {
    pub fn new() -> Self {
        Self {
            name: "Test Health Cover".into(),
            tier: PolicyTier::Premium,
            coverage_amount: MoneyFixtures::usd_coverage(),
            premium_amount: MoneyFixtures::usd_premium(),
            duration_months: 12,
            description: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_tier(mut self, tier: PolicyTier) -> Self {
        self.tier = tier;
        self
    }

    pub fn with_coverage(mut self, coverage: Money) -> Self {
        self.coverage_amount = coverage;
        self
    }

    pub fn with_premium(mut self, premium: Money) -> Self {
        self.premium_amount = premium;
        self
    }

    pub fn with_duration_months(mut self, months: u32) -> Self {
        self.duration_months = months;
        self
    }

    pub fn build(self) -> PolicyProduct {
        PolicyProduct::create(ProductDraft {
            name: self.name,
            tier: self.tier,
            coverage_amount: self.coverage_amount,
            premium_amount: self.premium_amount,
            duration_months: self.duration_months,
            description: self.description,
        })
        .expect("builder produces a valid product")
    }
}

/// Builder for claim submission requests
pub struct ClaimRequestBuilder {
    product_id: ProductId,
    claim_date: NaiveDate,
    amount_claimed: Decimal,
    description: String,
    medical_diagnosis: Option<String>,
    hospital_name: Option<String>,
    treatment_date: Option<NaiveDate>,
}

impl ClaimRequestBuilder {
    /// Claims must name the enrollment's product, so the builder starts
    /// from it
    pub fn for_product(product_id: ProductId) -> Self {
        Self {
            product_id,
            claim_date: chrono::Utc::now().date_naive(),
            amount_claimed: dec!(1000),
            description: "outpatient treatment".into(),
            medical_diagnosis: None,
            hospital_name: None,
            treatment_date: None,
        }
    }

    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.amount_claimed = amount;
        self
    }

    pub fn with_claim_date(mut self, date: NaiveDate) -> Self {
        self.claim_date = date;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_diagnosis(mut self, diagnosis: impl Into<String>) -> Self {
        self.medical_diagnosis = Some(diagnosis.into());
        self
    }

    pub fn with_hospital(mut self, hospital: impl Into<String>) -> Self {
        self.hospital_name = Some(hospital.into());
        self
    }

    pub fn build(self) -> SubmitClaimRequest {
        SubmitClaimRequest {
            product_id: self.product_id,
            claim_date: self.claim_date,
            amount_claimed: self.amount_claimed,
            description: self.description,
            medical_diagnosis: self.medical_diagnosis,
            hospital_name: self.hospital_name,
            treatment_date: self.treatment_date,
        }
    }
}

/// Builder for appointment booking requests
pub struct AppointmentRequestBuilder {
    doctor_id: DoctorId,
    date: NaiveDate,
    time: NaiveTime,
    reason: String,
    notes: Option<String>,
}

impl AppointmentRequestBuilder {
    pub fn with_doctor(doctor_id: DoctorId) -> Self {
        Self {
            doctor_id,
            date: chrono::Utc::now().date_naive() + chrono::Days::new(14),
            time: NaiveTime::from_hms_opt(9, 0, 0).expect("valid time"),
            reason: "annual check-up".into(),
            notes: None,
        }
    }

    pub fn on(mut self, date: NaiveDate, time: NaiveTime) -> Self {
        self.date = date;
        self.time = time;
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn build(self) -> BookAppointmentRequest {
        BookAppointmentRequest {
            doctor_id: self.doctor_id,
            date: self.date,
            time: self.time,
            reason: self.reason,
            notes: self.notes,
        }
    }
}
