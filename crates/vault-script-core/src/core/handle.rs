// crates/vault-script-core/src/core/handle.rs
// ============================================================================
// Module: Vault Script Ledger Handles
// Description: Tagged ledger handles stored in the execution symbol table.
// Purpose: Let commands pick call shapes by contract kind, not by identity.
// Dependencies: crate::core::identifiers, serde
// ============================================================================

//! ## Overview
//! A symbol resolves to a [`LedgerHandle`]: the contract address plus its
//! kind. Every kind is also a token (vault shares are balances too), so
//! balance and supply reads accept any handle.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::Address;

// ============================================================================
// SECTION: Handle Kinds
// ============================================================================

/// Contract kind of a ledger handle.
///
/// # Invariants
/// - Variants are stable for configuration and error labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleKind {
    /// Plain token (`USDe`).
    Asset,
    /// Share-issuing vault (`pUSDe`).
    Vault,
    /// Deposit router in front of a vault (`pUSDeDepositor`).
    Depositor,
    /// Vault with a cooldown before redemption (`sUSDe`).
    StakingVault,
}

impl HandleKind {
    /// Returns a stable label for the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Vault => "vault",
            Self::Depositor => "depositor",
            Self::StakingVault => "staking_vault",
        }
    }
}

impl fmt::Display for HandleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Ledger Handles
// ============================================================================

/// Symbol table entry: a contract address tagged with its kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "address", rename_all = "snake_case")]
pub enum LedgerHandle {
    /// Plain token.
    Asset(Address),
    /// Share-issuing vault.
    Vault(Address),
    /// Deposit router.
    Depositor(Address),
    /// Cooldown-gated vault.
    StakingVault(Address),
}

impl LedgerHandle {
    /// Builds a handle from a kind and address.
    #[must_use]
    pub fn new(kind: HandleKind, address: Address) -> Self {
        match kind {
            HandleKind::Asset => Self::Asset(address),
            HandleKind::Vault => Self::Vault(address),
            HandleKind::Depositor => Self::Depositor(address),
            HandleKind::StakingVault => Self::StakingVault(address),
        }
    }

    /// Returns the contract address.
    #[must_use]
    pub const fn address(&self) -> &Address {
        match self {
            Self::Asset(address)
            | Self::Vault(address)
            | Self::Depositor(address)
            | Self::StakingVault(address) => address,
        }
    }

    /// Returns the handle kind.
    #[must_use]
    pub const fn kind(&self) -> HandleKind {
        match self {
            Self::Asset(_) => HandleKind::Asset,
            Self::Vault(_) => HandleKind::Vault,
            Self::Depositor(_) => HandleKind::Depositor,
            Self::StakingVault(_) => HandleKind::StakingVault,
        }
    }

    /// Returns true for handles that issue shares against an asset.
    #[must_use]
    pub const fn is_vault(&self) -> bool {
        matches!(self, Self::Vault(_) | Self::StakingVault(_))
    }
}
