// crates/vault-script-core/src/core/time.rs
// ============================================================================
// Module: Vault Script Time Model
// Description: Wait durations expressed by `wait:` script lines.
// Purpose: Convert script time units into ledger seconds.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Ledger clocks count whole unix seconds. Scripts express forward jumps in
//! days or hours; conversion is checked so oversized waits fail instead of
//! wrapping.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Seconds per hour.
const SECONDS_PER_HOUR: u64 = 60 * 60;
/// Seconds per day.
const SECONDS_PER_DAY: u64 = 24 * SECONDS_PER_HOUR;

// ============================================================================
// SECTION: Wait Durations
// ============================================================================

/// Unit accepted by `wait:` lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitUnit {
    /// 86,400 seconds.
    Days,
    /// 3,600 seconds.
    Hours,
}

impl WaitUnit {
    /// Parses the script keyword for a unit.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "days" => Some(Self::Days),
            "hours" => Some(Self::Hours),
            _ => None,
        }
    }

    /// Returns the script keyword for the unit.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Days => "days",
            Self::Hours => "hours",
        }
    }

    /// Returns the unit length in seconds.
    #[must_use]
    pub const fn seconds(self) -> u64 {
        match self {
            Self::Days => SECONDS_PER_DAY,
            Self::Hours => SECONDS_PER_HOUR,
        }
    }
}

/// Forward time jump requested by a script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitDuration {
    /// Number of units.
    pub amount: u64,
    /// Unit of the jump.
    pub unit: WaitUnit,
}

impl WaitDuration {
    /// Creates a wait duration.
    #[must_use]
    pub const fn new(amount: u64, unit: WaitUnit) -> Self {
        Self {
            amount,
            unit,
        }
    }

    /// Returns the duration in seconds, or `None` on overflow.
    #[must_use]
    pub const fn as_secs(self) -> Option<u64> {
        self.amount.checked_mul(self.unit.seconds())
    }
}

impl fmt::Display for WaitDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.unit.as_str())
    }
}
