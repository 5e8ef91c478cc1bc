// crates/vault-script-core/src/runtime/settings.rs
// ============================================================================
// Module: Vault Script Interpreter Settings
// Description: Tunables that shape how commands map onto ledger calls.
// Purpose: Keep defaults (vault, depositor suffix, tolerance) out of handlers.
// Dependencies: crate::core, serde
// ============================================================================

//! ## Overview
//! Defaults match the harness conventions: deposits without a vault go to
//! `pUSDe` through `pUSDeDepositor`, `USDe` shortfalls are minted on deposit,
//! and balance checks allow one unit of rounding drift.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::SymbolName;
use crate::core::script::ScriptLimits;

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Default absolute tolerance for `balance:` checks, in fixed-point units.
pub const DEFAULT_BALANCE_TOLERANCE: u128 = 1;
/// Default vault for deposits and withdrawals without an explicit vault.
pub const DEFAULT_VAULT: &str = "pUSDe";
/// Default suffix that names a vault's depositor.
pub const DEFAULT_DEPOSITOR_SUFFIX: &str = "Depositor";
/// Default assets whose deposit shortfall is minted automatically.
pub const DEFAULT_AUTO_MINT_ASSETS: &[&str] = &["USDe"];

// ============================================================================
// SECTION: Settings
// ============================================================================

/// Interpreter tunables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterpreterSettings {
    /// Allowed absolute difference for balance assertions.
    pub balance_tolerance: u128,
    /// Vault used when a deposit or withdraw names none.
    pub default_vault: SymbolName,
    /// Suffix appended to a vault symbol to find its depositor.
    pub depositor_suffix: String,
    /// Assets minted on demand to cover deposit shortfalls.
    pub auto_mint_assets: Vec<SymbolName>,
    /// Script size limits.
    pub limits: ScriptLimits,
}

impl InterpreterSettings {
    /// Returns true when deposits of `asset` mint their shortfall.
    #[must_use]
    pub fn auto_mints(&self, asset: &SymbolName) -> bool {
        self.auto_mint_assets.contains(asset)
    }
}

impl Default for InterpreterSettings {
    fn default() -> Self {
        Self {
            balance_tolerance: DEFAULT_BALANCE_TOLERANCE,
            default_vault: SymbolName::new(DEFAULT_VAULT),
            depositor_suffix: DEFAULT_DEPOSITOR_SUFFIX.to_string(),
            auto_mint_assets: DEFAULT_AUTO_MINT_ASSETS
                .iter()
                .copied()
                .map(SymbolName::new)
                .collect(),
            limits: ScriptLimits::default(),
        }
    }
}
