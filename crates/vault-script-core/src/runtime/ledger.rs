// crates/vault-script-core/src/runtime/ledger.rs
// ============================================================================
// Module: Vault Script In-Memory Ledger
// Description: Deterministic in-memory ledger for tests and local demos.
// Purpose: Exercise scripts against token, vault, and staking semantics without a chain.
// Dependencies: crate::{core, interfaces}, async-trait, bigdecimal
// ============================================================================

//! ## Overview
//! [`InMemoryLedger`] models just enough of an EVM test chain to run vault
//! scenarios:
//! - ERC20 tokens with balances, allowances, and optional open minting.
//! - ERC4626 vaults with proportional share math (floor on deposit/redeem,
//!   ceil on withdraw) and deposit/withdraw toggles.
//! - Depositors that route a vault's asset (or a supported extra asset)
//!   into the vault on behalf of a receiver.
//! - Staking vaults with a cooldown silo and 8-hour linear reward vesting.
//! - A block clock: every transaction mines one block one second later, and
//!   [`TimeControl::increase_time_to`] must move time forward.
//!
//! Transactions run against a copy of the state that is committed only on
//! success, so a reverted call leaves balances, allowances, and the clock
//! untouched. It is not intended for production use.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use async_trait::async_trait;
use bigdecimal::num_bigint::BigInt;
use bigdecimal::ToPrimitive;

use crate::core::identifiers::ActorIndex;
use crate::core::identifiers::Address;
use crate::interfaces::Ledger;
use crate::interfaces::LedgerError;
use crate::interfaces::SignerRegistry;
use crate::interfaces::TimeControl;
use crate::interfaces::TxReceipt;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Signers created by [`InMemoryLedger::new`].
pub const DEFAULT_SIGNER_COUNT: u32 = 20;
/// Genesis block timestamp (unix seconds).
pub const GENESIS_TIMESTAMP: u64 = 1_700_000_000;
/// Linear vesting window for staking rewards, in seconds.
pub const REWARD_VESTING_PERIOD: u64 = 8 * 60 * 60;

/// Seed offset for signer addresses.
const SIGNER_SEED: u64 = 0x5100_0000;
/// Seed offset for contract addresses.
const CONTRACT_SEED: u64 = 0xC000_0000;

// ============================================================================
// SECTION: State
// ============================================================================

/// ERC20 bookkeeping shared by every contract.
#[derive(Debug, Clone, Default)]
struct TokenState {
    /// Open minting for test tokens.
    mintable: bool,
    /// Holder balances.
    balances: BTreeMap<Address, u128>,
    /// `(owner, spender)` allowances.
    allowances: BTreeMap<(Address, Address), u128>,
    /// Sum of balances.
    total_supply: u128,
}

/// Pending cooldown of one staker.
#[derive(Debug, Clone, Copy, Default)]
struct Cooldown {
    /// Timestamp at which the assets unlock.
    end: u64,
    /// Assets parked in the silo.
    underlying: u128,
}

/// Cooldown and vesting state of a staking vault.
#[derive(Debug, Clone)]
struct StakingState {
    /// Cooldown length in seconds; zero allows direct withdrawals.
    cooldown_duration: u64,
    /// Address that holds assets during cooldown.
    silo: Address,
    /// Cooldowns by staker.
    cooldowns: BTreeMap<Address, Cooldown>,
    /// Rewards of the latest distribution.
    vesting_amount: u128,
    /// Timestamp of the latest distribution.
    last_distribution: u64,
}

/// ERC4626 vault state.
#[derive(Debug, Clone)]
struct VaultState {
    /// Underlying asset.
    asset: Address,
    /// Extra assets accepted 1:1 by deposits and withdrawals.
    supported_assets: BTreeSet<Address>,
    /// Deposit switch.
    deposits_enabled: bool,
    /// Withdrawal switch.
    withdrawals_enabled: bool,
    /// Present for staking vaults.
    staking: Option<StakingState>,
}

/// Contract-specific behavior.
#[derive(Debug, Clone)]
enum ContractKind {
    /// Plain token.
    Token,
    /// Vault, possibly with staking.
    Vault(VaultState),
    /// Deposit router in front of `vault`.
    Depositor {
        /// Target vault.
        vault: Address,
    },
}

/// Deployed contract.
#[derive(Debug, Clone)]
struct Contract {
    /// Token bookkeeping.
    token: TokenState,
    /// Contract behavior.
    kind: ContractKind,
}

/// Rounding direction for share math.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rounding {
    /// Toward zero.
    Down,
    /// Away from zero.
    Up,
}

/// Complete ledger state.
#[derive(Debug, Clone)]
struct LedgerState {
    /// Latest block number.
    block_number: u64,
    /// Latest block timestamp.
    timestamp: u64,
    /// Signer addresses by index.
    signers: Vec<Address>,
    /// Contracts by address.
    contracts: BTreeMap<Address, Contract>,
    /// Next contract address seed.
    next_contract: u64,
}

// ============================================================================
// SECTION: In-Memory Ledger
// ============================================================================

/// In-memory ledger for tests and examples.
#[derive(Debug, Clone)]
pub struct InMemoryLedger {
    /// Ledger state protected by a mutex.
    state: Arc<Mutex<LedgerState>>,
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryLedger {
    /// Creates a ledger with [`DEFAULT_SIGNER_COUNT`] signers.
    #[must_use]
    pub fn new() -> Self {
        Self::with_signers(DEFAULT_SIGNER_COUNT)
    }

    /// Creates a ledger with `count` signers; signer 0 is the deployer.
    #[must_use]
    pub fn with_signers(count: u32) -> Self {
        let signers =
            (0 .. u64::from(count)).map(|index| Address::from_seed(SIGNER_SEED + index)).collect();
        Self {
            state: Arc::new(Mutex::new(LedgerState {
                block_number: 0,
                timestamp: GENESIS_TIMESTAMP,
                signers,
                contracts: BTreeMap::new(),
                next_contract: 1,
            })),
        }
    }

    /// Deploys a token; `mintable` tokens accept mints from anyone.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Unavailable`] when the state lock is poisoned.
    pub fn deploy_token(&self, mintable: bool) -> Result<Address, LedgerError> {
        self.deploy(ContractKind::Token, mintable)
    }

    /// Deploys a vault over `asset`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnknownContract`] when `asset` is not deployed.
    pub fn deploy_vault(&self, asset: &Address) -> Result<Address, LedgerError> {
        self.deploy_vault_kind(asset, None)
    }

    /// Deploys a staking vault over `asset` with a cooldown in seconds.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnknownContract`] when `asset` is not deployed.
    pub fn deploy_staking_vault(
        &self,
        asset: &Address,
        cooldown_duration: u64,
    ) -> Result<Address, LedgerError> {
        let silo = {
            let mut state = self.lock()?;
            state.allocate_address()
        };
        self.deploy_vault_kind(
            asset,
            Some(StakingState {
                cooldown_duration,
                silo,
                cooldowns: BTreeMap::new(),
                vesting_amount: 0,
                last_distribution: 0,
            }),
        )
    }

    /// Deploys a depositor routing into `vault`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Reverted`] when `vault` is not a vault.
    pub fn deploy_depositor(&self, vault: &Address) -> Result<Address, LedgerError> {
        self.lock()?.vault(vault)?;
        self.deploy(
            ContractKind::Depositor {
                vault: vault.clone(),
            },
            false,
        )
    }

    /// Adds or removes an extra asset accepted by `vault`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] when either contract is missing.
    pub fn set_supported_asset(
        &self,
        vault: &Address,
        asset: &Address,
        supported: bool,
    ) -> Result<TxReceipt, LedgerError> {
        self.transact(|state| {
            state.contract(asset)?;
            let vault = state.vault_mut(vault)?;
            if supported {
                vault.supported_assets.insert(asset.clone());
            } else {
                vault.supported_assets.remove(asset);
            }
            Ok(())
        })
    }

    /// Toggles deposits on `vault`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] when `vault` is not a vault.
    pub fn set_deposits_enabled(
        &self,
        vault: &Address,
        enabled: bool,
    ) -> Result<TxReceipt, LedgerError> {
        self.transact(|state| {
            state.vault_mut(vault)?.deposits_enabled = enabled;
            Ok(())
        })
    }

    /// Toggles withdrawals on `vault`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] when `vault` is not a vault.
    pub fn set_withdrawals_enabled(
        &self,
        vault: &Address,
        enabled: bool,
    ) -> Result<TxReceipt, LedgerError> {
        self.transact(|state| {
            state.vault_mut(vault)?.withdrawals_enabled = enabled;
            Ok(())
        })
    }

    /// Sets the cooldown length of a staking vault.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] when `vault` is not a staking vault.
    pub fn set_cooldown_duration(
        &self,
        vault: &Address,
        seconds: u64,
    ) -> Result<TxReceipt, LedgerError> {
        self.transact(|state| {
            state.staking_mut(vault)?.cooldown_duration = seconds;
            Ok(())
        })
    }

    /// Transfers `amount` of the asset from `caller` into a staking vault as
    /// rewards that vest linearly over [`REWARD_VESTING_PERIOD`].
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Reverted`] with `OperationNotAllowed` unless the
    /// caller is the deployer, `StillVesting` while earlier rewards vest, or a
    /// token error when the caller lacks funds.
    pub fn transfer_in_rewards(
        &self,
        caller: &Address,
        vault: &Address,
        amount: u128,
    ) -> Result<TxReceipt, LedgerError> {
        self.transact(|state| {
            if state.signers.first() != Some(caller) {
                return Err(revert("OperationNotAllowed()"));
            }
            if state.unvested(vault)? > 0 {
                return Err(revert("StillVesting()"));
            }
            let now = state.timestamp;
            let asset = state.vault(vault)?.asset.clone();
            let staking = state.staking_mut(vault)?;
            staking.vesting_amount = amount;
            staking.last_distribution = now;
            state.transfer(&asset, caller, vault, amount)
        })
    }

    /// Returns rewards of a staking vault that have not vested yet.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] when `vault` is not a staking vault.
    pub fn unvested_amount(&self, vault: &Address) -> Result<u128, LedgerError> {
        self.lock()?.unvested(vault)
    }

    /// Returns the assets backing a vault's shares.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] when `vault` is not a vault.
    pub fn total_assets(&self, vault: &Address) -> Result<u128, LedgerError> {
        self.lock()?.total_assets(vault)
    }

    /// Returns the latest block number.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Unavailable`] when the state lock is poisoned.
    pub fn block_number(&self) -> Result<u64, LedgerError> {
        Ok(self.lock()?.block_number)
    }

    /// Locks the ledger state.
    fn lock(&self) -> Result<MutexGuard<'_, LedgerState>, LedgerError> {
        self.state
            .lock()
            .map_err(|_| LedgerError::Unavailable("in-memory ledger mutex poisoned".to_string()))
    }

    /// Deploys a contract at a fresh address.
    fn deploy(&self, kind: ContractKind, mintable: bool) -> Result<Address, LedgerError> {
        let mut state = self.lock()?;
        let address = state.allocate_address();
        state.contracts.insert(
            address.clone(),
            Contract {
                token: TokenState {
                    mintable,
                    ..TokenState::default()
                },
                kind,
            },
        );
        Ok(address)
    }

    /// Deploys a vault, optionally with staking.
    fn deploy_vault_kind(
        &self,
        asset: &Address,
        staking: Option<StakingState>,
    ) -> Result<Address, LedgerError> {
        self.lock()?.contract(asset)?;
        self.deploy(
            ContractKind::Vault(VaultState {
                asset: asset.clone(),
                supported_assets: BTreeSet::new(),
                deposits_enabled: true,
                withdrawals_enabled: true,
                staking,
            }),
            false,
        )
    }

    /// Runs a transaction in a new block, committing only on success.
    fn transact<F>(&self, apply: F) -> Result<TxReceipt, LedgerError>
    where
        F: FnOnce(&mut LedgerState) -> Result<(), LedgerError>,
    {
        let mut guard = self.lock()?;
        let mut next = guard.clone();
        next.mine(next.timestamp.saturating_add(1));
        apply(&mut next)?;
        let receipt = next.receipt();
        *guard = next;
        Ok(receipt)
    }
}

// ============================================================================
// SECTION: State Operations
// ============================================================================

impl LedgerState {
    /// Returns a fresh contract address.
    fn allocate_address(&mut self) -> Address {
        let address = Address::from_seed(CONTRACT_SEED + self.next_contract);
        self.next_contract += 1;
        address
    }

    /// Appends a block at `timestamp`.
    const fn mine(&mut self, timestamp: u64) {
        self.block_number += 1;
        self.timestamp = timestamp;
    }

    /// Returns the receipt of the latest block.
    const fn receipt(&self) -> TxReceipt {
        TxReceipt {
            block_number: self.block_number,
            timestamp: self.timestamp,
        }
    }

    /// Looks up a contract.
    fn contract(&self, address: &Address) -> Result<&Contract, LedgerError> {
        self.contracts.get(address).ok_or_else(|| LedgerError::UnknownContract(address.clone()))
    }

    /// Looks up a contract for mutation.
    fn contract_mut(&mut self, address: &Address) -> Result<&mut Contract, LedgerError> {
        self.contracts.get_mut(address).ok_or_else(|| LedgerError::UnknownContract(address.clone()))
    }

    /// Looks up a vault.
    fn vault(&self, address: &Address) -> Result<&VaultState, LedgerError> {
        match &self.contract(address)?.kind {
            ContractKind::Vault(vault) => Ok(vault),
            _ => Err(revert(format!("NotAVault({address})"))),
        }
    }

    /// Looks up a vault for mutation.
    fn vault_mut(&mut self, address: &Address) -> Result<&mut VaultState, LedgerError> {
        match &mut self.contract_mut(address)?.kind {
            ContractKind::Vault(vault) => Ok(vault),
            _ => Err(revert(format!("NotAVault({address})"))),
        }
    }

    /// Looks up a staking vault.
    fn staking(&self, address: &Address) -> Result<&StakingState, LedgerError> {
        self.vault(address)?.staking.as_ref().ok_or_else(|| revert("OperationNotAllowed()"))
    }

    /// Looks up a staking vault for mutation.
    fn staking_mut(&mut self, address: &Address) -> Result<&mut StakingState, LedgerError> {
        self.vault_mut(address)?.staking.as_mut().ok_or_else(|| revert("OperationNotAllowed()"))
    }

    /// Returns `holder`'s balance of `token`.
    fn balance(&self, token: &Address, holder: &Address) -> Result<u128, LedgerError> {
        Ok(self.contract(token)?.token.balances.get(holder).copied().unwrap_or(0))
    }

    /// Moves `amount` of `token` between holders.
    fn transfer(
        &mut self,
        token: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), LedgerError> {
        self.burn(token, from, amount)?;
        self.mint(token, to, amount)
    }

    /// Credits `amount` of `token` to `to`, growing supply.
    fn mint(&mut self, token: &Address, to: &Address, amount: u128) -> Result<(), LedgerError> {
        let state = &mut self.contract_mut(token)?.token;
        state.total_supply = state.total_supply.checked_add(amount).ok_or_else(overflow)?;
        let balance = state.balances.entry(to.clone()).or_insert(0);
        *balance = balance.checked_add(amount).ok_or_else(overflow)?;
        Ok(())
    }

    /// Debits `amount` of `token` from `from`, shrinking supply.
    fn burn(&mut self, token: &Address, from: &Address, amount: u128) -> Result<(), LedgerError> {
        let state = &mut self.contract_mut(token)?.token;
        let balance = state.balances.get(from).copied().unwrap_or(0);
        if balance < amount {
            return Err(revert(format!("ERC20InsufficientBalance({from}, {balance}, {amount})")));
        }
        state.balances.insert(from.clone(), balance - amount);
        state.total_supply -= amount;
        Ok(())
    }

    /// Consumes `amount` of `spender`'s allowance over `owner`'s `token`.
    fn spend_allowance(
        &mut self,
        token: &Address,
        owner: &Address,
        spender: &Address,
        amount: u128,
    ) -> Result<(), LedgerError> {
        let state = &mut self.contract_mut(token)?.token;
        let key = (owner.clone(), spender.clone());
        let allowance = state.allowances.get(&key).copied().unwrap_or(0);
        if allowance == u128::MAX {
            return Ok(());
        }
        if allowance < amount {
            return Err(revert(format!(
                "ERC20InsufficientAllowance({spender}, {allowance}, {amount})"
            )));
        }
        state.allowances.insert(key, allowance - amount);
        Ok(())
    }

    /// Returns unvested staking rewards at the current block time.
    fn unvested(&self, vault: &Address) -> Result<u128, LedgerError> {
        let staking = self.staking(vault)?;
        let elapsed = self.timestamp.saturating_sub(staking.last_distribution);
        if elapsed >= REWARD_VESTING_PERIOD {
            return Ok(0);
        }
        mul_div(
            staking.vesting_amount,
            u128::from(REWARD_VESTING_PERIOD - elapsed),
            u128::from(REWARD_VESTING_PERIOD),
            Rounding::Down,
        )
    }

    /// Returns assets backing a vault's shares, net of unvested rewards.
    fn total_assets(&self, vault_address: &Address) -> Result<u128, LedgerError> {
        let vault = self.vault(vault_address)?;
        let mut total = self.balance(&vault.asset, vault_address)?;
        for extra in &vault.supported_assets {
            total = total.checked_add(self.balance(extra, vault_address)?).ok_or_else(overflow)?;
        }
        if vault.staking.is_some() {
            total = total.saturating_sub(self.unvested(vault_address)?);
        }
        Ok(total)
    }

    /// Converts assets to shares.
    fn to_shares(
        &self,
        vault: &Address,
        assets: u128,
        rounding: Rounding,
    ) -> Result<u128, LedgerError> {
        let supply = self.contract(vault)?.token.total_supply;
        let total_assets = self.total_assets(vault)?;
        mul_div(assets, plus_one(supply)?, plus_one(total_assets)?, rounding)
    }

    /// Converts shares to assets.
    fn to_assets(
        &self,
        vault: &Address,
        shares: u128,
        rounding: Rounding,
    ) -> Result<u128, LedgerError> {
        let supply = self.contract(vault)?.token.total_supply;
        let total_assets = self.total_assets(vault)?;
        mul_div(shares, plus_one(total_assets)?, plus_one(supply)?, rounding)
    }

    /// Returns the assets `owner` may withdraw.
    fn max_withdraw(&self, vault: &Address, owner: &Address) -> Result<u128, LedgerError> {
        self.to_assets(vault, self.balance(vault, owner)?, Rounding::Down)
    }

    /// Fails when deposits are off.
    fn ensure_deposits(&self, vault: &Address) -> Result<(), LedgerError> {
        if self.vault(vault)?.deposits_enabled {
            Ok(())
        } else {
            Err(revert("DepositsDisabled()"))
        }
    }

    /// Fails when withdrawals are off or a cooldown is mandatory.
    fn ensure_withdrawals(&self, vault: &Address) -> Result<(), LedgerError> {
        let state = self.vault(vault)?;
        if !state.withdrawals_enabled {
            return Err(revert("WithdrawalsDisabled()"));
        }
        if state.staking.as_ref().is_some_and(|staking| staking.cooldown_duration > 0) {
            return Err(revert("OperationNotAllowed()"));
        }
        Ok(())
    }

    /// Mints shares for `assets` of `asset` pulled from `payer`.
    fn deposit_assets(
        &mut self,
        vault: &Address,
        asset: &Address,
        payer: &Address,
        amount: u128,
        receiver: &Address,
    ) -> Result<(), LedgerError> {
        self.ensure_deposits(vault)?;
        let shares = self.to_shares(vault, amount, Rounding::Down)?;
        self.transfer(asset, payer, vault, amount)?;
        self.mint(vault, receiver, shares)
    }

    /// Burns `owner`'s shares and pays out `amount` of `asset`.
    fn withdraw_assets(
        &mut self,
        call: &WithdrawCall<'_>,
        asset: &Address,
        amount: u128,
    ) -> Result<(), LedgerError> {
        self.ensure_withdrawals(call.vault)?;
        let max = self.max_withdraw(call.vault, call.owner)?;
        if amount > max {
            return Err(revert(format!(
                "ERC4626ExceededMaxWithdraw({}, {amount}, {max})",
                call.owner
            )));
        }
        let shares = self.to_shares(call.vault, amount, Rounding::Up)?;
        if call.caller != call.owner {
            self.spend_allowance(call.vault, call.owner, call.caller, shares)?;
        }
        self.burn(call.vault, call.owner, shares)?;
        self.transfer(asset, call.vault, call.receiver, amount)
    }
}

/// Parties of a withdraw or redeem.
struct WithdrawCall<'a> {
    /// Transaction sender.
    caller: &'a Address,
    /// Vault address.
    vault: &'a Address,
    /// Asset recipient.
    receiver: &'a Address,
    /// Share owner.
    owner: &'a Address,
}

// ============================================================================
// SECTION: Interface Implementations
// ============================================================================

#[async_trait]
impl SignerRegistry for InMemoryLedger {
    async fn signer(&self, index: ActorIndex) -> Result<Address, LedgerError> {
        let state = self.lock()?;
        usize::try_from(index.get())
            .ok()
            .and_then(|slot| state.signers.get(slot))
            .cloned()
            .ok_or(LedgerError::UnknownSigner(index))
    }
}

#[async_trait]
impl TimeControl for InMemoryLedger {
    async fn latest_timestamp(&self) -> Result<u64, LedgerError> {
        Ok(self.lock()?.timestamp)
    }

    async fn increase_time_to(&self, unix_seconds: u64) -> Result<TxReceipt, LedgerError> {
        let mut state = self.lock()?;
        if unix_seconds <= state.timestamp {
            return Err(LedgerError::InvalidTimestamp {
                requested: unix_seconds,
                latest: state.timestamp,
            });
        }
        state.mine(unix_seconds);
        Ok(state.receipt())
    }

    async fn force_mine(&self) -> Result<TxReceipt, LedgerError> {
        self.transact(|_| Ok(()))
    }
}

#[async_trait]
impl Ledger for InMemoryLedger {
    async fn balance_of(&self, token: &Address, holder: &Address) -> Result<u128, LedgerError> {
        self.lock()?.balance(token, holder)
    }

    async fn total_supply(&self, token: &Address) -> Result<u128, LedgerError> {
        Ok(self.lock()?.contract(token)?.token.total_supply)
    }

    async fn vault_asset(&self, vault: &Address) -> Result<Address, LedgerError> {
        Ok(self.lock()?.vault(vault)?.asset.clone())
    }

    async fn approve(
        &self,
        caller: &Address,
        token: &Address,
        spender: &Address,
        amount: u128,
    ) -> Result<TxReceipt, LedgerError> {
        self.transact(|state| {
            state
                .contract_mut(token)?
                .token
                .allowances
                .insert((caller.clone(), spender.clone()), amount);
            Ok(())
        })
    }

    async fn mint(
        &self,
        _caller: &Address,
        token: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<TxReceipt, LedgerError> {
        self.transact(|state| {
            if !state.contract(token)?.token.mintable {
                return Err(revert("OperationNotAllowed()"));
            }
            state.mint(token, to, amount)
        })
    }

    async fn deposit(
        &self,
        caller: &Address,
        vault: &Address,
        amount: u128,
        receiver: &Address,
    ) -> Result<TxReceipt, LedgerError> {
        self.transact(|state| {
            let asset = state.vault(vault)?.asset.clone();
            state.spend_allowance(&asset, caller, vault, amount)?;
            state.deposit_assets(vault, &asset, caller, amount, receiver)
        })
    }

    async fn deposit_via(
        &self,
        caller: &Address,
        depositor: &Address,
        asset: &Address,
        amount: u128,
        receiver: &Address,
    ) -> Result<TxReceipt, LedgerError> {
        self.transact(|state| {
            let ContractKind::Depositor {
                vault,
            } = &state.contract(depositor)?.kind
            else {
                return Err(revert(format!("NotADepositor({depositor})")));
            };
            let vault = vault.clone();
            let target = state.vault(&vault)?;
            if &target.asset != asset && !target.supported_assets.contains(asset) {
                return Err(revert(format!("InvalidAsset({asset})")));
            }
            state.spend_allowance(asset, caller, depositor, amount)?;
            state.deposit_assets(&vault, asset, caller, amount, receiver)
        })
    }

    async fn withdraw(
        &self,
        caller: &Address,
        vault: &Address,
        amount: u128,
        receiver: &Address,
        owner: &Address,
    ) -> Result<TxReceipt, LedgerError> {
        self.transact(|state| {
            let asset = state.vault(vault)?.asset.clone();
            let call = WithdrawCall {
                caller,
                vault,
                receiver,
                owner,
            };
            state.withdraw_assets(&call, &asset, amount)
        })
    }

    async fn withdraw_asset(
        &self,
        caller: &Address,
        vault: &Address,
        asset: &Address,
        amount: u128,
        receiver: &Address,
        owner: &Address,
    ) -> Result<TxReceipt, LedgerError> {
        self.transact(|state| {
            let target = state.vault(vault)?;
            if &target.asset != asset && !target.supported_assets.contains(asset) {
                return Err(revert(format!("UnsupportedAsset({asset})")));
            }
            let call = WithdrawCall {
                caller,
                vault,
                receiver,
                owner,
            };
            state.withdraw_assets(&call, asset, amount)
        })
    }

    async fn redeem(
        &self,
        caller: &Address,
        vault: &Address,
        shares: u128,
        receiver: &Address,
        owner: &Address,
    ) -> Result<TxReceipt, LedgerError> {
        self.transact(|state| {
            state.ensure_withdrawals(vault)?;
            let max = state.balance(vault, owner)?;
            if shares > max {
                return Err(revert(format!("ERC4626ExceededMaxRedeem({owner}, {shares}, {max})")));
            }
            let assets = state.to_assets(vault, shares, Rounding::Down)?;
            if caller != owner {
                state.spend_allowance(vault, owner, caller, shares)?;
            }
            let asset = state.vault(vault)?.asset.clone();
            state.burn(vault, owner, shares)?;
            state.transfer(&asset, vault, receiver, assets)
        })
    }

    async fn preview_redeem(&self, vault: &Address, shares: u128) -> Result<u128, LedgerError> {
        self.lock()?.to_assets(vault, shares, Rounding::Down)
    }

    async fn cooldown_assets(
        &self,
        caller: &Address,
        vault: &Address,
        assets: u128,
    ) -> Result<TxReceipt, LedgerError> {
        self.transact(|state| {
            let staking = state.staking(vault)?;
            if staking.cooldown_duration == 0 {
                return Err(revert("OperationNotAllowed()"));
            }
            let silo = staking.silo.clone();
            if assets > state.max_withdraw(vault, caller)? {
                return Err(revert("ExcessiveWithdrawAmount()"));
            }
            let shares = state.to_shares(vault, assets, Rounding::Up)?;
            let asset = state.vault(vault)?.asset.clone();
            state.burn(vault, caller, shares)?;
            state.transfer(&asset, vault, &silo, assets)?;
            let now = state.timestamp;
            let staking = state.staking_mut(vault)?;
            let end = now.saturating_add(staking.cooldown_duration);
            let entry = staking.cooldowns.entry(caller.clone()).or_default();
            entry.end = end;
            entry.underlying = entry.underlying.checked_add(assets).ok_or_else(overflow)?;
            Ok(())
        })
    }

    async fn unstake(
        &self,
        caller: &Address,
        vault: &Address,
        receiver: &Address,
    ) -> Result<TxReceipt, LedgerError> {
        self.transact(|state| {
            let now = state.timestamp;
            let staking = state.staking(vault)?;
            let cooldown = staking.cooldowns.get(caller).copied().unwrap_or_default();
            if now < cooldown.end && staking.cooldown_duration > 0 {
                return Err(revert("InvalidCooldown()"));
            }
            let silo = staking.silo.clone();
            state.staking_mut(vault)?.cooldowns.remove(caller);
            let asset = state.vault(vault)?.asset.clone();
            state.transfer(&asset, &silo, receiver, cooldown.underlying)
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds a revert error.
fn revert(reason: impl Into<String>) -> LedgerError {
    LedgerError::Reverted(reason.into())
}

/// Builds the arithmetic overflow revert.
fn overflow() -> LedgerError {
    revert("panic: arithmetic overflow")
}

/// Returns `value + 1` or an overflow revert.
fn plus_one(value: u128) -> Result<u128, LedgerError> {
    value.checked_add(1).ok_or_else(overflow)
}

/// Computes `value * numerator / denominator` without intermediate overflow.
fn mul_div(
    value: u128,
    numerator: u128,
    denominator: u128,
    rounding: Rounding,
) -> Result<u128, LedgerError> {
    if denominator == 0 {
        return Err(revert("panic: division by zero"));
    }
    let product = BigInt::from(value) * BigInt::from(numerator);
    let denominator = BigInt::from(denominator);
    let mut quotient = &product / &denominator;
    if rounding == Rounding::Up && &quotient * &denominator != product {
        quotient += BigInt::from(1_u8);
    }
    quotient.to_u128().ok_or_else(overflow)
}

// ============================================================================
// SECTION: Tests
// ============================================================================
