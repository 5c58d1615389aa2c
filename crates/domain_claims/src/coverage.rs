//! Coverage-consumption aggregate
//!
//! Coverage used is never stored: it is recomputed at read time from the
//! claims that finance has settled, so it can only grow as claims reach
//! `ApprovedByFinance` and is clamped to [0, 100].

use rust_decimal::Decimal;

use core_kernel::{Money, MoneyError};

use crate::claim::{Claim, ClaimStatus};

/// Percentage of `coverage_amount` consumed by finance-approved claims
///
/// Claims in any other status contribute nothing. The result is clamped to
/// [0, 100] so over-consumption reads as a fully used policy.
pub fn coverage_used_percent(
    claims: &[Claim],
    coverage_amount: Money,
) -> Result<Decimal, MoneyError> {
    let mut settled = Money::zero(coverage_amount.currency());
    for claim in claims {
        if claim.status == ClaimStatus::ApprovedByFinance {
            settled = settled.checked_add(&claim.amount_claimed)?;
        }
    }
    settled.percent_of(&coverage_amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use core_kernel::{Currency, EnrollmentId, ProductId};
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn claim(amount: Decimal, status: ClaimStatus) -> Claim {
        let mut claim = Claim::submit(
            EnrollmentId::new_v7(),
            ProductId::new_v7(),
            Utc::now().date_naive(),
            Money::new(amount, Currency::USD),
            "test".into(),
            None,
        );
        // Drive the claim to the desired status through the legal table
        match status {
            ClaimStatus::Submitted => {}
            ClaimStatus::UnderReview => {
                claim.transition_to(ClaimStatus::UnderReview, None).unwrap();
            }
            ClaimStatus::Rejected => {
                claim.transition_to(ClaimStatus::Rejected, None).unwrap();
            }
            _ => {
                claim.transition_to(ClaimStatus::UnderReview, None).unwrap();
                claim
                    .transition_to(ClaimStatus::ApprovedByClaims, None)
                    .unwrap();
                if status != ClaimStatus::ApprovedByClaims {
                    claim
                        .transition_to(ClaimStatus::ForwardedToFinance, None)
                        .unwrap();
                    if status == ClaimStatus::ApprovedByFinance {
                        claim
                            .transition_to(ClaimStatus::ApprovedByFinance, None)
                            .unwrap();
                    }
                }
            }
        }
        claim
    }

    #[test]
    fn test_no_settled_claims_is_zero() {
        let claims = vec![
            claim(dec!(30000), ClaimStatus::Submitted),
            claim(dec!(40000), ClaimStatus::Rejected),
        ];
        let pct =
            coverage_used_percent(&claims, Money::new(dec!(100000), Currency::USD)).unwrap();
        assert_eq!(pct, dec!(0));
    }

    #[test]
    fn test_partial_consumption() {
        let claims = vec![claim(dec!(25000), ClaimStatus::ApprovedByFinance)];
        let pct =
            coverage_used_percent(&claims, Money::new(dec!(100000), Currency::USD)).unwrap();
        assert_eq!(pct, dec!(25));
    }

    #[test]
    fn test_over_consumption_clamps_to_hundred() {
        // 30k + 80k settled against 100k of coverage
        let claims = vec![
            claim(dec!(30000), ClaimStatus::ApprovedByFinance),
            claim(dec!(80000), ClaimStatus::ApprovedByFinance),
        ];
        let pct =
            coverage_used_percent(&claims, Money::new(dec!(100000), Currency::USD)).unwrap();
        assert_eq!(pct, dec!(100));
    }

    #[test]
    fn test_forwarded_claims_do_not_count_yet() {
        let claims = vec![claim(dec!(50000), ClaimStatus::ForwardedToFinance)];
        let pct =
            coverage_used_percent(&claims, Money::new(dec!(100000), Currency::USD)).unwrap();
        assert_eq!(pct, dec!(0));
    }

    proptest! {
        #[test]
        fn consumption_is_clamped(
            amounts in prop::collection::vec(1u64..1_000_000, 0..8),
            coverage in 1u64..500_000,
        ) {
            let claims: Vec<Claim> = amounts
                .iter()
                .map(|a| claim(Decimal::from(*a), ClaimStatus::ApprovedByFinance))
                .collect();
            let pct = coverage_used_percent(
                &claims,
                Money::new(Decimal::from(coverage), Currency::USD),
            )
            .unwrap();
            prop_assert!(pct >= dec!(0));
            prop_assert!(pct <= dec!(100));
        }

        #[test]
        fn settling_one_more_claim_never_decreases_consumption(
            amounts in prop::collection::vec(1u64..100_000, 1..6),
            extra in 1u64..100_000,
            coverage in 1u64..500_000,
        ) {
            let coverage = Money::new(Decimal::from(coverage), Currency::USD);
            let mut claims: Vec<Claim> = amounts
                .iter()
                .map(|a| claim(Decimal::from(*a), ClaimStatus::ApprovedByFinance))
                .collect();
            let before = coverage_used_percent(&claims, coverage).unwrap();

            claims.push(claim(Decimal::from(extra), ClaimStatus::ApprovedByFinance));
            let after = coverage_used_percent(&claims, coverage).unwrap();

            prop_assert!(after >= before);
        }
    }
}
