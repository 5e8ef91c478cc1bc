// crates/vault-script-core/src/runtime/context.rs
// ============================================================================
// Module: Vault Script Execution Context
// Description: Per-run symbol table, actor roles, and current actor.
// Purpose: Resolve script names into ledger handles and signer addresses.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! An [`ExecutionContext`] is created once per test run, seeded by fixture
//! setup or configuration, and threaded by `&mut` through every command. It
//! is never reset between commands or between scripts run against it, so a
//! later script observes the current actor left by an earlier one.
//!
//! Security posture: every lookup is explicit and fails closed with
//! [`ScriptError::UnknownSymbol`]; there is no dynamic property fallback.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use crate::core::command::Holder;
use crate::core::handle::HandleKind;
use crate::core::handle::LedgerHandle;
use crate::core::identifiers::Actor;
use crate::core::identifiers::ActorIndex;
use crate::core::identifiers::ActorRef;
use crate::core::identifiers::Address;
use crate::core::identifiers::SymbolName;
use crate::interfaces::SignerRegistry;
use crate::runtime::error::ScriptError;
use crate::runtime::settings::InterpreterSettings;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Role seeded into every new context.
pub const OWNER_ROLE: &str = "owner";

/// Handle kinds a deposit may target.
const DEPOSIT_KINDS: &[HandleKind] =
    &[HandleKind::Vault, HandleKind::StakingVault, HandleKind::Depositor];
/// Handle kinds a withdraw may target.
const WITHDRAW_KINDS: &[HandleKind] = &[HandleKind::Vault, HandleKind::StakingVault];
/// Handle kinds a cooldown or unstake may target.
const STAKING_KINDS: &[HandleKind] = &[HandleKind::StakingVault];

// ============================================================================
// SECTION: Resolved Targets
// ============================================================================

/// Symbol and handle a command resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// Symbol the handle was registered under.
    pub name: SymbolName,
    /// Registered handle.
    pub handle: LedgerHandle,
}

// ============================================================================
// SECTION: Execution Context
// ============================================================================

/// Mutable per-run interpreter state.
///
/// # Invariants
/// - `current_actor` is only written by actor resolution.
/// - Symbol names are unique; re-registering replaces the handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionContext {
    /// Actor resolved by the most recent actor-bearing command.
    current_actor: Option<Actor>,
    /// Contract symbols.
    symbols: BTreeMap<SymbolName, LedgerHandle>,
    /// Named actor roles.
    roles: BTreeMap<String, ActorIndex>,
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutionContext {
    /// Creates an empty context with the `owner` role bound to signer 0.
    #[must_use]
    pub fn new() -> Self {
        let mut roles = BTreeMap::new();
        roles.insert(OWNER_ROLE.to_string(), ActorIndex::new(0));
        Self {
            current_actor: None,
            symbols: BTreeMap::new(),
            roles,
        }
    }

    /// Registers a symbol, returning the handle it replaced.
    pub fn register(
        &mut self,
        name: impl Into<SymbolName>,
        handle: LedgerHandle,
    ) -> Option<LedgerHandle> {
        self.symbols.insert(name.into(), handle)
    }

    /// Binds a role name to a signer index, returning the previous index.
    pub fn register_role(
        &mut self,
        role: impl Into<String>,
        index: ActorIndex,
    ) -> Option<ActorIndex> {
        self.roles.insert(role.into(), index)
    }

    /// Returns the actor resolved most recently.
    #[must_use]
    pub const fn current_actor(&self) -> Option<&Actor> {
        self.current_actor.as_ref()
    }

    /// Returns registered symbols in name order.
    pub fn symbols(&self) -> impl Iterator<Item = (&SymbolName, &LedgerHandle)> {
        self.symbols.iter()
    }

    /// Resolves an actor through the signer registry and makes it current.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::UnknownSymbol`] for unbound roles and
    /// [`ScriptError::Ledger`] when the registry has no such signer.
    pub async fn resolve_actor<S>(
        &mut self,
        registry: &S,
        actor: &ActorRef,
    ) -> Result<Actor, ScriptError>
    where
        S: SignerRegistry + ?Sized,
    {
        let index = match actor {
            ActorRef::Index(index) => *index,
            ActorRef::Role(role) => self.resolve_role(role)?,
        };
        let address = registry.signer(index).await?;
        let resolved = Actor {
            index,
            address,
        };
        self.current_actor = Some(resolved.clone());
        Ok(resolved)
    }

    /// Looks up a role binding.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::UnknownSymbol`] when the role is unbound.
    pub fn resolve_role(&self, role: &str) -> Result<ActorIndex, ScriptError> {
        self.roles.get(role).copied().ok_or_else(|| ScriptError::UnknownSymbol {
            name: role.to_string(),
        })
    }

    /// Looks up a registered symbol.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::UnknownSymbol`] when the symbol is not registered.
    pub fn resolve_symbol(&self, name: &SymbolName) -> Result<&LedgerHandle, ScriptError> {
        self.symbols.get(name).ok_or_else(|| ScriptError::UnknownSymbol {
            name: name.as_str().to_string(),
        })
    }

    /// Chooses the contract a deposit goes through.
    ///
    /// An explicit vault `V` prefers its depositor `V<suffix>` when one is
    /// registered. Without an explicit vault the default vault is used the
    /// same way.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::UnknownSymbol`] when neither the depositor nor
    /// the vault is registered, and [`ScriptError::HandleKind`] when the
    /// target cannot accept deposits.
    pub fn deposit_target(
        &self,
        explicit: Option<&SymbolName>,
        settings: &InterpreterSettings,
    ) -> Result<ResolvedTarget, ScriptError> {
        let vault = explicit.unwrap_or(&settings.default_vault);
        let depositor = vault.with_suffix(&settings.depositor_suffix);
        let name = if self.symbols.contains_key(&depositor) { depositor } else { vault.clone() };
        self.resolve_kind(name, DEPOSIT_KINDS, "vault, staking_vault or depositor")
    }

    /// Chooses the vault a withdraw redeems from.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::UnknownSymbol`] or [`ScriptError::HandleKind`]
    /// when the vault is missing or is not a vault.
    pub fn withdraw_vault(
        &self,
        explicit: Option<&SymbolName>,
        settings: &InterpreterSettings,
    ) -> Result<ResolvedTarget, ScriptError> {
        let name = explicit.unwrap_or(&settings.default_vault).clone();
        self.resolve_kind(name, WITHDRAW_KINDS, "vault or staking_vault")
    }

    /// Resolves a staking vault for cooldown and unstake lines.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::UnknownSymbol`] or [`ScriptError::HandleKind`]
    /// when the vault is missing or has no cooldown.
    pub fn staking_vault(&self, name: &SymbolName) -> Result<ResolvedTarget, ScriptError> {
        self.resolve_kind(name.clone(), STAKING_KINDS, "staking_vault")
    }

    /// Resolves a balance holder to an address.
    ///
    /// `User<N>` resolves (and becomes) the current actor. Other names are
    /// looked up as contract symbols first, then as roles.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::UnknownSymbol`] when the name is neither a
    /// symbol nor a role, and [`ScriptError::Ledger`] for unknown signers.
    pub async fn resolve_holder<S>(
        &mut self,
        registry: &S,
        holder: &Holder,
    ) -> Result<Address, ScriptError>
    where
        S: SignerRegistry + ?Sized,
    {
        match holder {
            Holder::Actor(index) => {
                Ok(self.resolve_actor(registry, &ActorRef::Index(*index)).await?.address)
            }
            Holder::Named(name) => {
                if let Some(handle) = self.symbols.get(&SymbolName::new(name.as_str())) {
                    return Ok(handle.address().clone());
                }
                let role = ActorRef::Role(name.clone());
                Ok(self.resolve_actor(registry, &role).await?.address)
            }
        }
    }

    /// Looks up `name` and checks its kind against `accepted`.
    fn resolve_kind(
        &self,
        name: SymbolName,
        accepted: &[HandleKind],
        expected: &'static str,
    ) -> Result<ResolvedTarget, ScriptError> {
        let handle = self.resolve_symbol(&name)?.clone();
        if !accepted.contains(&handle.kind()) {
            return Err(ScriptError::HandleKind {
                name: name.as_str().to_string(),
                expected,
                found: handle.kind(),
            });
        }
        Ok(ResolvedTarget {
            name,
            handle,
        })
    }
}
