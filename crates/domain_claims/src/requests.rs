//! Claim request payloads

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use core_kernel::ProductId;

/// Payload for submitting or resubmitting a claim
///
/// Validation runs before any state is touched; the ownership check against
/// the enrollment's policy happens afterwards in the service.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitClaimRequest {
    pub product_id: ProductId,
    #[validate(custom(function = "not_in_future"))]
    pub claim_date: NaiveDate,
    #[validate(custom(function = "positive_amount"))]
    pub amount_claimed: Decimal,
    #[validate(length(min = 1, max = 2000))]
    pub description: String,
    pub medical_diagnosis: Option<String>,
    pub hospital_name: Option<String>,
    pub treatment_date: Option<NaiveDate>,
}

fn positive_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if amount.is_sign_positive() && !amount.is_zero() {
        Ok(())
    } else {
        let mut error = ValidationError::new("amount_claimed");
        error.message = Some("claim amount must be greater than zero".into());
        Err(error)
    }
}

fn not_in_future(claim_date: &NaiveDate) -> Result<(), ValidationError> {
    if *claim_date <= chrono::Utc::now().date_naive() {
        Ok(())
    } else {
        let mut error = ValidationError::new("claim_date");
        error.message = Some("claim date cannot be in the future".into());
        Err(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn request() -> SubmitClaimRequest {
        SubmitClaimRequest {
            product_id: ProductId::new(),
            claim_date: chrono::Utc::now().date_naive(),
            amount_claimed: dec!(1500),
            description: "outpatient surgery".into(),
            medical_diagnosis: None,
            hospital_name: None,
            treatment_date: None,
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_zero_amount_rejected() {
        let mut r = request();
        r.amount_claimed = dec!(0);
        assert!(r.validate().is_err());
    }

    #[test]
    fn test_negative_amount_rejected() {
        let mut r = request();
        r.amount_claimed = dec!(-10);
        assert!(r.validate().is_err());
    }

    #[test]
    fn test_future_claim_date_rejected() {
        let mut r = request();
        r.claim_date = chrono::Utc::now().date_naive() + chrono::Days::new(1);
        assert!(r.validate().is_err());
    }

    #[test]
    fn test_empty_description_rejected() {
        let mut r = request();
        r.description = String::new();
        assert!(r.validate().is_err());
    }
}
