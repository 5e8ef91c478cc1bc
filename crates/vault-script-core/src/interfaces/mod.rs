// crates/vault-script-core/src/interfaces/mod.rs
// ============================================================================
// Module: Vault Script Interfaces
// Description: Backend-agnostic ledger, signer, and clock interfaces.
// Purpose: Define the contract surfaces the interpreter drives.
// Dependencies: crate::core, async-trait, thiserror
// ============================================================================

//! ## Overview
//! The interpreter never implements vault logic. It calls into a [`Ledger`]
//! supplied by the host: a chain binding in deployments, or
//! [`InMemoryLedger`](crate::runtime::InMemoryLedger) in tests. Transaction
//! methods resolve only after the transaction is confirmed, so the next
//! script line always observes its effects.

// ============================================================================
// SECTION: Imports
// ============================================================================

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::identifiers::ActorIndex;
use crate::core::identifiers::Address;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Ledger failures surfaced to scripts.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - `Reverted` carries the contract's revert reason verbatim so `error:`
///   lines can match on it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// A transaction or call reverted.
    #[error("execution reverted: {0}")]
    Reverted(String),
    /// The signer registry has no signer at the index.
    #[error("unknown signer index: {0}")]
    UnknownSigner(ActorIndex),
    /// No contract is deployed at the address.
    #[error("no contract at address {0}")]
    UnknownContract(Address),
    /// A clock jump did not move time forward.
    #[error(
        "timestamp {requested} is lower than or equal to previous block's timestamp {latest}"
    )]
    InvalidTimestamp {
        /// Requested unix seconds.
        requested: u64,
        /// Latest block timestamp.
        latest: u64,
    },
    /// The ledger backend is unavailable.
    #[error("ledger unavailable: {0}")]
    Unavailable(String),
}

// ============================================================================
// SECTION: Receipts
// ============================================================================

/// Confirmation of a mined transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    /// Block that included the transaction.
    pub block_number: u64,
    /// Block timestamp in unix seconds.
    pub timestamp: u64,
}

// ============================================================================
// SECTION: Signer Registry
// ============================================================================

/// Maps actor indices to signer addresses.
#[async_trait]
pub trait SignerRegistry: Send + Sync {
    /// Returns the signer address at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnknownSigner`] when no signer exists.
    async fn signer(&self, index: ActorIndex) -> Result<Address, LedgerError>;
}

// ============================================================================
// SECTION: Time Control
// ============================================================================

/// Simulated clock control.
#[async_trait]
pub trait TimeControl: Send + Sync {
    /// Returns the latest block timestamp in unix seconds.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] when the clock cannot be read.
    async fn latest_timestamp(&self) -> Result<u64, LedgerError>;

    /// Moves the clock to `unix_seconds`, mining a block at that time.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidTimestamp`] unless time moves forward.
    async fn increase_time_to(&self, unix_seconds: u64) -> Result<TxReceipt, LedgerError>;

    /// Mines an empty block so time-gated reads observe the latest clock.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] when mining fails.
    async fn force_mine(&self) -> Result<TxReceipt, LedgerError>;
}

// ============================================================================
// SECTION: Ledger
// ============================================================================

/// Token, vault, and staking operations driven by scripts.
///
/// `caller` is the signer sending a transaction. Reads take no caller.
#[async_trait]
pub trait Ledger: SignerRegistry + TimeControl {
    /// Returns `holder`'s balance of `token`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] when the read fails.
    async fn balance_of(&self, token: &Address, holder: &Address) -> Result<u128, LedgerError>;

    /// Returns the total supply of `token`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] when the read fails.
    async fn total_supply(&self, token: &Address) -> Result<u128, LedgerError>;

    /// Returns the underlying asset of `vault`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] when `vault` is not a vault.
    async fn vault_asset(&self, vault: &Address) -> Result<Address, LedgerError>;

    /// Approves `spender` to pull `amount` of `token` from `caller`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] when the transaction reverts.
    async fn approve(
        &self,
        caller: &Address,
        token: &Address,
        spender: &Address,
        amount: u128,
    ) -> Result<TxReceipt, LedgerError>;

    /// Mints `amount` of `token` to `to` (test-only capability).
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] when the token is not mintable.
    async fn mint(
        &self,
        caller: &Address,
        token: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<TxReceipt, LedgerError>;

    /// Deposits `amount` of the vault asset, minting shares to `receiver`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] when the transaction reverts.
    async fn deposit(
        &self,
        caller: &Address,
        vault: &Address,
        amount: u128,
        receiver: &Address,
    ) -> Result<TxReceipt, LedgerError>;

    /// Deposits `amount` of `asset` through a depositor contract.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] when the transaction reverts.
    async fn deposit_via(
        &self,
        caller: &Address,
        depositor: &Address,
        asset: &Address,
        amount: u128,
        receiver: &Address,
    ) -> Result<TxReceipt, LedgerError>;

    /// Withdraws `amount` of the vault asset, burning `owner`'s shares.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] when the transaction reverts.
    async fn withdraw(
        &self,
        caller: &Address,
        vault: &Address,
        amount: u128,
        receiver: &Address,
        owner: &Address,
    ) -> Result<TxReceipt, LedgerError>;

    /// Asset-qualified withdraw overload for multi-asset vaults.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] when the transaction reverts.
    async fn withdraw_asset(
        &self,
        caller: &Address,
        vault: &Address,
        asset: &Address,
        amount: u128,
        receiver: &Address,
        owner: &Address,
    ) -> Result<TxReceipt, LedgerError>;

    /// Redeems `shares` of `owner` for vault assets.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] when the transaction reverts.
    async fn redeem(
        &self,
        caller: &Address,
        vault: &Address,
        shares: u128,
        receiver: &Address,
        owner: &Address,
    ) -> Result<TxReceipt, LedgerError>;

    /// Returns the assets `shares` would redeem for.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] when the read fails.
    async fn preview_redeem(&self, vault: &Address, shares: u128) -> Result<u128, LedgerError>;

    /// Starts a cooldown on `assets` worth of the caller's staked shares.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] when the transaction reverts.
    async fn cooldown_assets(
        &self,
        caller: &Address,
        vault: &Address,
        assets: u128,
    ) -> Result<TxReceipt, LedgerError>;

    /// Claims assets whose cooldown has elapsed.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] when the cooldown is still running.
    async fn unstake(
        &self,
        caller: &Address,
        vault: &Address,
        receiver: &Address,
    ) -> Result<TxReceipt, LedgerError>;
}
