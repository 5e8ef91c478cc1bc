// crates/vault-script-core/src/runtime/error.rs
// ============================================================================
// Module: Vault Script Errors
// Description: Error taxonomy for script parsing and execution.
// Purpose: Classify failures so `error:` lines absorb only ledger outcomes.
// Dependencies: crate::{core, interfaces}, thiserror
// ============================================================================

//! ## Overview
//! Every failure inside a script is a [`ScriptError`]. Ledger reverts and
//! assertion failures are *expectable*: an `error:` line may absorb them.
//! Everything else is a script-authoring problem and always aborts the run.
//! [`ScriptFailure`] attaches the offending line for diagnostics.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::amount::AmountError;
use crate::core::handle::HandleKind;
use crate::core::script::ScriptLimitExceeded;
use crate::interfaces::LedgerError;

// ============================================================================
// SECTION: Script Errors
// ============================================================================

/// Failure of a single script line.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    /// Malformed numeric literal.
    #[error(transparent)]
    AmountParse(#[from] AmountError),
    /// Symbol or role missing from the execution context.
    #[error("unknown symbol: {name}")]
    UnknownSymbol {
        /// Unresolved name.
        name: String,
    },
    /// Symbol resolved to a handle of the wrong kind.
    #[error("symbol {name} is a {found}, expected {expected}")]
    HandleKind {
        /// Symbol name.
        name: String,
        /// Accepted kinds, rendered for display.
        expected: &'static str,
        /// Kind actually registered.
        found: HandleKind,
    },
    /// No grammar rule matched the line.
    #[error("Invalid line: {line}")]
    UnrecognizedLine {
        /// Offending line text.
        line: String,
    },
    /// An `error:` line's nested command succeeded.
    #[error("expected failure containing `{expected}` but `{line}` succeeded")]
    ExpectedFailureNotRaised {
        /// Nested line text.
        line: String,
        /// Expected message substring.
        expected: String,
    },
    /// An `error:` line's nested command failed with another message.
    #[error("expected failure containing `{expected}`, got: {actual}")]
    ErrorMessageMismatch {
        /// Expected message substring.
        expected: String,
        /// Actual failure message.
        actual: String,
    },
    /// Holder balance outside tolerance.
    #[error(
        "balance mismatch for {holder} in {token}: expected {expected}+/-{tolerance}, got {actual}"
    )]
    BalanceMismatch {
        /// Holder label.
        holder: String,
        /// Token symbol.
        token: String,
        /// Expected fixed-point amount.
        expected: u128,
        /// Observed fixed-point amount.
        actual: u128,
        /// Allowed absolute difference.
        tolerance: u128,
    },
    /// Total supply differs from the expected amount.
    #[error("total supply mismatch for {token}: expected {expected}, actual {actual}")]
    TotalSupplyMismatch {
        /// Token symbol.
        token: String,
        /// Expected fixed-point amount.
        expected: u128,
        /// Observed fixed-point amount.
        actual: u128,
    },
    /// A wait would overflow the ledger clock.
    #[error("wait of {seconds_label} overflows the ledger clock")]
    TimeOverflow {
        /// Requested duration, rendered for display.
        seconds_label: String,
    },
    /// Script rejected by size limits.
    #[error("script limit exceeded: {0}")]
    ScriptLimit(String),
    /// Failure reported by the ledger.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl ScriptError {
    /// Returns true for failures an `error:` line may absorb.
    #[must_use]
    pub const fn is_expectable(&self) -> bool {
        matches!(
            self,
            Self::Ledger(_)
                | Self::BalanceMismatch {
                    ..
                }
                | Self::TotalSupplyMismatch {
                    ..
                }
        )
    }

    /// Returns a stable label for the error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::AmountParse(_) => "amount_parse",
            Self::UnknownSymbol {
                ..
            } => "unknown_symbol",
            Self::HandleKind {
                ..
            } => "handle_kind",
            Self::UnrecognizedLine {
                ..
            } => "unrecognized_line",
            Self::ExpectedFailureNotRaised {
                ..
            } => "expected_failure_not_raised",
            Self::ErrorMessageMismatch {
                ..
            } => "error_message_mismatch",
            Self::BalanceMismatch {
                ..
            } => "balance_mismatch",
            Self::TotalSupplyMismatch {
                ..
            } => "total_supply_mismatch",
            Self::TimeOverflow {
                ..
            } => "time_overflow",
            Self::ScriptLimit(_) => "script_limit",
            Self::Ledger(_) => "ledger",
        }
    }
}

impl From<ScriptLimitExceeded> for ScriptError {
    fn from(value: ScriptLimitExceeded) -> Self {
        match value {
            ScriptLimitExceeded::Bytes {
                max,
                actual,
            } => Self::ScriptLimit(format!("{actual} bytes (max {max})")),
            ScriptLimitExceeded::Lines {
                max,
                actual,
            } => Self::ScriptLimit(format!("{actual} lines (max {max})")),
        }
    }
}

// ============================================================================
// SECTION: Script Failures
// ============================================================================

/// First unhandled error of a script run, tied to its line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line_number} `{line}`: {source}")]
pub struct ScriptFailure {
    /// 1-based source line number (0 when the whole script was rejected).
    pub line_number: usize,
    /// Offending line text.
    pub line: String,
    /// Underlying error.
    pub source: ScriptError,
}
