// crates/vault-script-core/src/core/amount.rs
// ============================================================================
// Module: Vault Script Quantities
// Description: Fixed-point conversion for human-readable script amounts.
// Purpose: Turn decimal and percentage literals into ledger integer amounts.
// Dependencies: bigdecimal, serde, thiserror
// ============================================================================

//! ## Overview
//! Script amounts are written as decimal literals (`10`, `0.5`) and converted
//! to integers scaled by 10^18. Digits beyond the scale are truncated, never
//! rounded. Percentage literals (`100%`) are resolved against a live balance
//! at execution time with floor division.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use bigdecimal::ToPrimitive;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Fractional digits used for every script amount.
pub const FIXED_POINT_DECIMALS: u32 = 18;
/// One whole token at [`FIXED_POINT_DECIMALS`] scale.
pub const FIXED_POINT_UNIT: u128 = 1_000_000_000_000_000_000;
/// Largest scale whose unit still fits in a `u128`.
pub const MAX_FIXED_POINT_DECIMALS: u32 = 38;
/// Maximum accepted length of an amount literal.
const MAX_AMOUNT_LITERAL_BYTES: usize = 96;
/// Denominator for percentage resolution.
const PERCENT_SCALE: u128 = 100;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Amount literal conversion errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    /// The literal is not a plain decimal number.
    #[error("invalid amount number: `{raw}` ({reason})")]
    Invalid {
        /// Raw literal text.
        raw: String,
        /// Short rejection reason.
        reason: &'static str,
    },
    /// The scaled amount does not fit the ledger integer type.
    #[error("amount out of range: `{raw}`")]
    OutOfRange {
        /// Raw literal text.
        raw: String,
    },
    /// The requested scale cannot be represented.
    #[error("unsupported decimal scale: {decimals} (max {MAX_FIXED_POINT_DECIMALS})")]
    UnsupportedScale {
        /// Requested fractional digits.
        decimals: u32,
    },
    /// The percentage literal is not an integer that fits in `u32`.
    #[error("invalid percentage: `{raw}%` ({reason})")]
    InvalidPercentage {
        /// Raw literal text without the `%` suffix.
        raw: String,
        /// Short rejection reason.
        reason: &'static str,
    },
}

// ============================================================================
// SECTION: Literals
// ============================================================================

/// Decimal literal captured verbatim from a script line.
///
/// # Invariants
/// - Only checked lexically at parse time; numeric validation happens when the
///   literal is resolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecimalLiteral(String);

impl DecimalLiteral {
    /// Creates a literal from raw script text.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the raw literal text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Converts the literal to a fixed-point integer at 18 decimals.
    ///
    /// # Errors
    ///
    /// Returns [`AmountError`] when the literal is malformed or out of range.
    pub fn to_fixed_point(&self) -> Result<u128, AmountError> {
        to_fixed_point(&self.0)
    }

    /// Parses the literal as an integer percentage.
    ///
    /// # Errors
    ///
    /// Returns [`AmountError::InvalidPercentage`] for fractional or out-of-range values.
    pub fn to_percentage(&self) -> Result<u32, AmountError> {
        parse_percentage(&self.0)
    }
}

impl fmt::Display for DecimalLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for DecimalLiteral {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Amount argument of a script command.
///
/// # Invariants
/// - Resolved to an integer only at execution time; percentages need a live
///   balance read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "literal", rename_all = "snake_case")]
pub enum AmountSpec {
    /// Absolute decimal quantity (`10`, `0.5`).
    Absolute(DecimalLiteral),
    /// Percentage of the actor's current balance (`100%`), stored without `%`.
    Percent(DecimalLiteral),
}

impl fmt::Display for AmountSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absolute(literal) => write!(f, "{literal}"),
            Self::Percent(literal) => write!(f, "{literal}%"),
        }
    }
}

// ============================================================================
// SECTION: Conversion
// ============================================================================

/// Converts a decimal literal to an integer scaled by 10^18, truncating.
///
/// # Errors
///
/// Returns [`AmountError`] when the literal is malformed or out of range.
pub fn to_fixed_point(amount: &str) -> Result<u128, AmountError> {
    to_fixed_point_with_decimals(amount, FIXED_POINT_DECIMALS)
}

/// Converts a decimal literal to an integer scaled by `10^decimals`.
///
/// Fractional digits beyond `decimals` are dropped.
///
/// # Errors
///
/// Returns [`AmountError`] when the literal is malformed, the scale is not
/// representable, or the result exceeds `u128`.
pub fn to_fixed_point_with_decimals(amount: &str, decimals: u32) -> Result<u128, AmountError> {
    if decimals > MAX_FIXED_POINT_DECIMALS {
        return Err(AmountError::UnsupportedScale {
            decimals,
        });
    }
    let (whole, fraction) = split_decimal_literal(amount)?;
    let normalized = format!(
        "{}.{}",
        if whole.is_empty() { "0" } else { whole },
        if fraction.is_empty() { "0" } else { fraction }
    );
    let decimal = BigDecimal::from_str(&normalized).map_err(|_| AmountError::Invalid {
        raw: amount.to_string(),
        reason: "not a decimal number",
    })?;
    let (digits, scale) = decimal.into_bigint_and_exponent();
    let scaled = BigDecimal::new(digits, scale - i64::from(decimals)).with_scale(0);
    let (integer, _) = scaled.into_bigint_and_exponent();
    integer.to_u128().ok_or_else(|| AmountError::OutOfRange {
        raw: amount.to_string(),
    })
}

/// Renders a fixed-point integer at 18 decimals, trimming trailing zeros.
#[must_use]
pub fn format_fixed_point(value: u128) -> String {
    let whole = value / FIXED_POINT_UNIT;
    let fraction = value % FIXED_POINT_UNIT;
    if fraction == 0 {
        return whole.to_string();
    }
    let digits = format!("{fraction:018}");
    format!("{whole}.{}", digits.trim_end_matches('0'))
}

/// Parses an integer percentage literal (without `%`).
///
/// A fractional part made only of zeros (`50.0`) is accepted. Values above
/// 100 are returned as-is so the ledger rejects the oversized request.
///
/// # Errors
///
/// Returns [`AmountError::InvalidPercentage`] for fractional or malformed
/// values and for values that do not fit in `u32`.
pub fn parse_percentage(raw: &str) -> Result<u32, AmountError> {
    let invalid = |reason| AmountError::InvalidPercentage {
        raw: raw.to_string(),
        reason,
    };
    let (whole, fraction) = split_decimal_literal(raw).map_err(|_| invalid("not a number"))?;
    if fraction.bytes().any(|b| b != b'0') {
        return Err(invalid("fractional percentages are not supported"));
    }
    if whole.is_empty() {
        return Ok(0);
    }
    whole.parse().map_err(|_| invalid("out of range"))
}

/// Resolves `floor(total * percent / 100)` without intermediate overflow.
///
/// Results saturate at `u128::MAX` for percentages above 100.
#[must_use]
pub fn resolve_percentage(percent: u32, total: u128) -> u128 {
    let percent = u128::from(percent);
    let quotient = (total / PERCENT_SCALE).saturating_mul(percent);
    let remainder = (total % PERCENT_SCALE) * percent / PERCENT_SCALE;
    quotient.saturating_add(remainder)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Splits a plain decimal literal into whole and fractional digit runs.
fn split_decimal_literal(raw: &str) -> Result<(&str, &str), AmountError> {
    let invalid = |reason| AmountError::Invalid {
        raw: raw.to_string(),
        reason,
    };
    if raw.is_empty() {
        return Err(invalid("empty literal"));
    }
    if raw.len() > MAX_AMOUNT_LITERAL_BYTES {
        return Err(invalid("literal too long"));
    }
    let (whole, fraction) = raw.split_once('.').unwrap_or((raw, ""));
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(invalid("unexpected character"));
    }
    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid("no digits"));
    }
    Ok((whole, fraction))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
