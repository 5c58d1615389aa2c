//! Custom Test Assertions
//!
//! Specialized assertion helpers for domain types that give more meaningful
//! error messages than standard assertions.

use rust_decimal::Decimal;

use core_kernel::{AuditAction, AuditEntry, Money};

/// Asserts that two Money values are equal within a tolerance
///
/// # Panics
///
/// Panics if the currencies don't match or the amounts differ by more than
/// `tolerance`.
pub fn assert_money_approx_eq(actual: &Money, expected: &Money, tolerance: Decimal) {
    assert_eq!(
        actual.currency(),
        expected.currency(),
        "Currency mismatch: actual={}, expected={}",
        actual.currency(),
        expected.currency()
    );

    let diff = (actual.amount() - expected.amount()).abs();
    assert!(
        diff <= tolerance,
        "Money amounts differ by more than tolerance: actual={}, expected={}, diff={}",
        actual.amount(),
        expected.amount(),
        diff,
    );
}

/// Asserts that an audit trail contains an entry with the given action
/// whose detail mentions `fragment`
///
/// # Panics
///
/// Panics with the full trail rendered when no entry matches.
pub fn assert_audited(trail: &[AuditEntry], action: AuditAction, fragment: &str) {
    let found = trail
        .iter()
        .any(|e| e.action == action && e.details.contains(fragment));
    assert!(
        found,
        "No audit entry with action {:?} mentioning {:?}. Trail: {:#?}",
        action,
        fragment,
        trail
            .iter()
            .map(|e| format!("{:?}: {}", e.action, e.details))
            .collect::<Vec<_>>()
    );
}

/// Asserts that the audit trail is ordered oldest-first
pub fn assert_trail_chronological(trail: &[AuditEntry]) {
    for pair in trail.windows(2) {
        assert!(
            pair[0].timestamp <= pair[1].timestamp,
            "Audit trail out of order: {} after {}",
            pair[0].timestamp,
            pair[1].timestamp
        );
    }
}
