// crates/vault-script-core/src/core/command.rs
// ============================================================================
// Module: Vault Script Commands
// Description: Structured commands produced from script lines.
// Purpose: Give the interpreter a typed, immutable view of each line.
// Dependencies: crate::core::{amount, identifiers, time}, serde
// ============================================================================

//! ## Overview
//! Each recognized script line becomes exactly one [`Command`]. Commands keep
//! symbols and amounts unresolved; the interpreter binds them against the
//! execution context and the ledger when the line runs.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::amount::AmountSpec;
use crate::core::amount::DecimalLiteral;
use crate::core::identifiers::ActorIndex;
use crate::core::identifiers::SymbolName;
use crate::core::time::WaitDuration;

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Holder named by a `balance:` line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Holder {
    /// `User<N>` signer.
    Actor(ActorIndex),
    /// Registered contract symbol or actor role.
    Named(String),
}

/// Parsed script command.
///
/// # Invariants
/// - Never mutated after parsing.
/// - `ExpectFailure` wraps exactly one nested command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verb", rename_all = "snake_case")]
pub enum Command {
    /// `User<N>: mint <amount> <TOKEN>`.
    Mint {
        /// Acting signer.
        actor: ActorIndex,
        /// Quantity to mint.
        amount: DecimalLiteral,
        /// Token symbol.
        token: SymbolName,
    },
    /// `User<N>: deposit <amount> <TOKEN>[ into <VAULT>]`.
    Deposit {
        /// Acting signer.
        actor: ActorIndex,
        /// Quantity of the asset to deposit.
        amount: DecimalLiteral,
        /// Asset symbol.
        token: SymbolName,
        /// Explicit vault symbol, if any.
        vault: Option<SymbolName>,
    },
    /// `User<N>: withdraw <amount|amount%> <TOKEN>[ from <VAULT>]`.
    Withdraw {
        /// Acting signer.
        actor: ActorIndex,
        /// Asset quantity or share percentage.
        amount: AmountSpec,
        /// Asset symbol to receive.
        token: SymbolName,
        /// Explicit vault symbol, if any.
        vault: Option<SymbolName>,
    },
    /// `User<N>: cooldown <amount|amount%> <VAULT>`.
    Cooldown {
        /// Acting signer.
        actor: ActorIndex,
        /// Asset quantity or share percentage.
        amount: AmountSpec,
        /// Staking vault symbol.
        vault: SymbolName,
    },
    /// `User<N>: unstake from <VAULT>`.
    Unstake {
        /// Acting signer.
        actor: ActorIndex,
        /// Staking vault symbol.
        vault: SymbolName,
    },
    /// `balance: (User<N>|<NAME>) <amount> <TOKEN>`.
    Balance {
        /// Account whose balance is checked.
        holder: Holder,
        /// Expected quantity.
        amount: DecimalLiteral,
        /// Token symbol.
        token: SymbolName,
    },
    /// `totalSupply: <amount> <TOKEN>`.
    TotalSupply {
        /// Expected supply.
        amount: DecimalLiteral,
        /// Token symbol.
        token: SymbolName,
    },
    /// `wait: <N> (days|hours)`.
    Wait {
        /// Forward jump.
        duration: WaitDuration,
    },
    /// `error: <line> | <expected>`.
    ExpectFailure {
        /// Nested command that must fail.
        inner: Box<Self>,
        /// Trimmed source text of the nested command.
        inner_line: String,
        /// Substring the failure message must contain.
        expected: String,
    },
}

impl Command {
    /// Returns the script verb of the command.
    #[must_use]
    pub const fn verb(&self) -> &'static str {
        match self {
            Self::Mint {
                ..
            } => "mint",
            Self::Deposit {
                ..
            } => "deposit",
            Self::Withdraw {
                ..
            } => "withdraw",
            Self::Cooldown {
                ..
            } => "cooldown",
            Self::Unstake {
                ..
            } => "unstake",
            Self::Balance {
                ..
            } => "balance",
            Self::TotalSupply {
                ..
            } => "totalSupply",
            Self::Wait {
                ..
            } => "wait",
            Self::ExpectFailure {
                ..
            } => "error",
        }
    }
}
