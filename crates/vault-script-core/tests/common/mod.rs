// crates/vault-script-core/tests/common/mod.rs
// ============================================================================
// Module: Vault Script Test Fixtures
// Description: Shared deployment fixture for interpreter tests.
// Purpose: Deploy the USDe/pUSDe/sUSDe contracts and seed a matching context.
// ============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]
#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only fixtures are permitted to panic."
)]

use vault_script_core::Address;
use vault_script_core::ExecutionContext;
use vault_script_core::InMemoryLedger;
use vault_script_core::LedgerHandle;
use vault_script_core::ScriptInterpreter;

/// Cooldown of the staking vault, in seconds.
pub const COOLDOWN_SECONDS: u64 = 7 * 24 * 60 * 60;

/// Deployed contracts and a context that names them.
pub struct Deployment {
    /// Ledger shared with the interpreter.
    pub ledger: InMemoryLedger,
    /// Context with every contract registered.
    pub context: ExecutionContext,
    /// Mintable base asset.
    pub usde: Address,
    /// Default vault over USDe.
    pub pusde: Address,
    /// Depositor in front of pUSDe.
    pub pusde_depositor: Address,
    /// Staking vault over USDe with a cooldown.
    pub susde: Address,
    /// Mintable extra asset accepted by pUSDe.
    pub dai: Address,
}

impl Deployment {
    /// Returns an interpreter bound to a handle on the same ledger state.
    pub fn interpreter(&self) -> ScriptInterpreter<InMemoryLedger> {
        ScriptInterpreter::new(self.ledger.clone())
    }
}

/// Deploys the standard contracts.
pub fn deploy() -> Deployment {
    let ledger = InMemoryLedger::new();
    let usde = ledger.deploy_token(true).unwrap();
    let dai = ledger.deploy_token(true).unwrap();
    let pusde = ledger.deploy_vault(&usde).unwrap();
    let pusde_depositor = ledger.deploy_depositor(&pusde).unwrap();
    let susde = ledger.deploy_staking_vault(&usde, COOLDOWN_SECONDS).unwrap();
    ledger.set_supported_asset(&pusde, &dai, true).unwrap();

    let mut context = ExecutionContext::new();
    context.register("USDe", LedgerHandle::Asset(usde.clone()));
    context.register("DAI", LedgerHandle::Asset(dai.clone()));
    context.register("pUSDe", LedgerHandle::Vault(pusde.clone()));
    context.register("pUSDeDepositor", LedgerHandle::Depositor(pusde_depositor.clone()));
    context.register("sUSDe", LedgerHandle::StakingVault(susde.clone()));

    Deployment {
        ledger,
        context,
        usde,
        pusde,
        pusde_depositor,
        susde,
        dai,
    }
}

/// Converts whole tokens to fixed-point units.
pub const fn units(tokens: u128) -> u128 {
    tokens * 1_000_000_000_000_000_000
}
