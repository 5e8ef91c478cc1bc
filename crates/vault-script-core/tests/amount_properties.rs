// crates/vault-script-core/tests/amount_properties.rs
// ============================================================================
// Module: Amount Property Tests
// Description: Property tests for fixed-point and percentage arithmetic.
// ============================================================================
//! ## Overview
//! Checks that amount conversion truncates instead of rounding and that
//! percentage resolution never overshoots the balance it slices.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use proptest::prelude::*;
use vault_script_core::FIXED_POINT_UNIT;
use vault_script_core::format_fixed_point;
use vault_script_core::parse_percentage;
use vault_script_core::resolve_percentage;
use vault_script_core::to_fixed_point;

proptest! {
    #[test]
    fn formatted_amounts_parse_back(value in any::<u128>()) {
        let text = format_fixed_point(value);
        prop_assert_eq!(to_fixed_point(&text).unwrap(), value);
    }

    #[test]
    fn extra_fraction_digits_truncate(
        whole in 0u64..1_000_000,
        fraction in 0u64..1_000_000_000_000_000_000,
        tail in 1u8..10,
    ) {
        let literal = format!("{whole}.{fraction:018}{tail}");
        let expected = u128::from(whole) * FIXED_POINT_UNIT + u128::from(fraction);
        prop_assert_eq!(to_fixed_point(&literal).unwrap(), expected);
    }

    #[test]
    fn percentage_never_exceeds_total(percent in 0u32..=100, total in any::<u128>()) {
        let share = resolve_percentage(percent, total);
        prop_assert!(share <= total);
        if percent > 0 {
            prop_assert!(share >= resolve_percentage(percent - 1, total));
        }
    }

    #[test]
    fn full_and_empty_percentages_are_exact(total in any::<u128>()) {
        prop_assert_eq!(resolve_percentage(100, total), total);
        prop_assert_eq!(resolve_percentage(0, total), 0);
    }

    #[test]
    fn integer_percentages_parse(percent in 0u32..=100) {
        prop_assert_eq!(parse_percentage(&percent.to_string()).unwrap(), percent);
    }

    #[test]
    fn oversized_percentages_parse_and_scale(
        percent in 101u32..100_000,
        total in 0u128..1_000_000_000_000,
    ) {
        prop_assert_eq!(parse_percentage(&percent.to_string()).unwrap(), percent);
        prop_assert!(resolve_percentage(percent, total) >= total);
    }
}

#[test]
fn truncation_is_not_rounding() {
    assert_eq!(to_fixed_point("0.0000000000000000019").unwrap(), 1);
    assert_eq!(to_fixed_point("1.9999999999999999999").unwrap(), 2 * FIXED_POINT_UNIT - 1);
}

#[test]
fn fractional_percentages_are_rejected() {
    assert!(parse_percentage("12.5").is_err());
    assert_eq!(parse_percentage("50.00").unwrap(), 50);
    assert!(parse_percentage("4294967296").is_err());
}
