// crates/vault-script-core/src/runtime/interpreter.rs
// ============================================================================
// Module: Vault Script Interpreter
// Description: Line dispatcher that drives a ledger from scenario scripts.
// Purpose: Execute scripts strictly in order and report the first unhandled failure.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! [`ScriptInterpreter`] filters a script, parses each line with the ordered
//! grammar, and executes the resulting [`Command`] against the ledger. Each
//! command's ledger calls are awaited to confirmation before the next line
//! runs. A failure that no `error:` line absorbs aborts the script and is
//! returned as a [`ScriptFailure`] naming the offending line.
//!
//! Command handlers return `Result<CommandOutcome, ScriptError>`; the
//! `error:` wrapper inspects that result instead of catching anything.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use serde::Serialize;

use crate::core::amount::AmountSpec;
use crate::core::amount::DecimalLiteral;
use crate::core::amount::format_fixed_point;
use crate::core::amount::resolve_percentage;
use crate::core::command::Command;
use crate::core::command::Holder;
use crate::core::handle::LedgerHandle;
use crate::core::identifiers::Actor;
use crate::core::identifiers::ActorIndex;
use crate::core::identifiers::ActorRef;
use crate::core::identifiers::Address;
use crate::core::identifiers::SymbolName;
use crate::core::script::Script;
use crate::core::script::ScriptLine;
use crate::core::time::WaitDuration;
use crate::interfaces::Ledger;
use crate::runtime::audit::NoopAuditSink;
use crate::runtime::audit::ScriptAuditEvent;
use crate::runtime::audit::ScriptAuditEventParams;
use crate::runtime::audit::ScriptAuditOutcome;
use crate::runtime::audit::ScriptAuditSink;
use crate::runtime::clock;
use crate::runtime::context::ExecutionContext;
use crate::runtime::error::ScriptError;
use crate::runtime::error::ScriptFailure;
use crate::runtime::grammar::parse_line;
use crate::runtime::settings::InterpreterSettings;

// ============================================================================
// SECTION: Outcomes
// ============================================================================

/// Result of one successfully executed command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CommandOutcome {
    /// Tokens minted to the actor.
    Minted {
        /// Token symbol.
        token: SymbolName,
        /// Fixed-point amount.
        amount: u128,
    },
    /// Assets deposited.
    Deposited {
        /// Contract the deposit went through.
        target: SymbolName,
        /// Fixed-point amount deposited.
        amount: u128,
        /// Shortfall minted before the deposit.
        auto_minted: u128,
    },
    /// Assets withdrawn by amount.
    Withdrawn {
        /// Vault symbol.
        vault: SymbolName,
        /// Fixed-point asset amount.
        amount: u128,
    },
    /// Shares redeemed by percentage.
    Redeemed {
        /// Vault symbol.
        vault: SymbolName,
        /// Shares redeemed.
        shares: u128,
    },
    /// Cooldown started.
    CooldownStarted {
        /// Staking vault symbol.
        vault: SymbolName,
        /// Assets placed in cooldown.
        assets: u128,
    },
    /// Cooled-down assets claimed.
    Unstaked {
        /// Staking vault symbol.
        vault: SymbolName,
    },
    /// Balance assertion held.
    BalanceChecked {
        /// Observed balance.
        actual: u128,
    },
    /// Total supply assertion held.
    TotalSupplyChecked {
        /// Observed supply.
        actual: u128,
    },
    /// Clock advanced.
    TimeAdvanced {
        /// Block timestamp after the confirmation block.
        timestamp: u64,
    },
    /// An `error:` line absorbed the expected failure.
    FailureAbsorbed {
        /// Message of the absorbed failure.
        message: String,
    },
}

/// Outcome of an executed line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineReport {
    /// 1-based source line number.
    pub line_number: usize,
    /// Command verb.
    pub verb: &'static str,
    /// Command outcome.
    pub outcome: CommandOutcome,
}

/// Summary of a completed script.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScriptReport {
    /// Executed lines in order.
    pub lines: Vec<LineReport>,
}

impl ScriptReport {
    /// Returns how many `error:` lines absorbed a failure.
    #[must_use]
    pub fn absorbed_failures(&self) -> usize {
        self.lines
            .iter()
            .filter(|line| matches!(line.outcome, CommandOutcome::FailureAbsorbed { .. }))
            .count()
    }
}

// ============================================================================
// SECTION: Interpreter
// ============================================================================

/// Scenario script interpreter bound to one ledger.
pub struct ScriptInterpreter<L> {
    /// Ledger driven by commands.
    ledger: L,
    /// Interpreter tunables.
    settings: InterpreterSettings,
    /// Audit sink for script events.
    audit: Arc<dyn ScriptAuditSink>,
}

impl<L> ScriptInterpreter<L>
where
    L: Ledger,
{
    /// Creates an interpreter with default settings and no audit output.
    #[must_use]
    pub fn new(ledger: L) -> Self {
        Self::with_settings(ledger, InterpreterSettings::default())
    }

    /// Creates an interpreter with explicit settings.
    #[must_use]
    pub fn with_settings(ledger: L, settings: InterpreterSettings) -> Self {
        Self {
            ledger,
            settings,
            audit: Arc::new(NoopAuditSink),
        }
    }

    /// Replaces the audit sink.
    #[must_use]
    pub fn with_audit_sink(mut self, audit: Arc<dyn ScriptAuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Returns the ledger.
    #[must_use]
    pub const fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Returns the interpreter settings.
    #[must_use]
    pub const fn settings(&self) -> &InterpreterSettings {
        &self.settings
    }

    /// Runs a script against `context`.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptFailure`] for the first failure no `error:` line
    /// absorbed; later lines are not executed.
    pub async fn run_script(
        &self,
        context: &mut ExecutionContext,
        text: &str,
    ) -> Result<ScriptReport, ScriptFailure> {
        let script = match Script::parse(text, self.settings.limits) {
            Ok(script) => script,
            Err(limit) => {
                let failure = ScriptFailure {
                    line_number: 0,
                    line: String::new(),
                    source: limit.into(),
                };
                self.emit(
                    "script_failed",
                    None,
                    None,
                    ScriptAuditOutcome::Failure,
                    Some(failure.to_string()),
                );
                return Err(failure);
            }
        };
        self.emit(
            "script_started",
            None,
            None,
            ScriptAuditOutcome::Success,
            Some(format!("{} lines", script.lines().len())),
        );
        let mut report = ScriptReport::default();
        for line in script.lines() {
            match self.run_line(context, line).await {
                Ok(line_report) => report.lines.push(line_report),
                Err(source) => {
                    let failure = ScriptFailure {
                        line_number: line.number,
                        line: line.text.clone(),
                        source,
                    };
                    self.emit(
                        "script_failed",
                        Some(line),
                        None,
                        ScriptAuditOutcome::Failure,
                        Some(failure.source.to_string()),
                    );
                    return Err(failure);
                }
            }
        }
        self.emit(
            "script_completed",
            None,
            None,
            ScriptAuditOutcome::Success,
            Some(format!("{} lines", report.lines.len())),
        );
        Ok(report)
    }

    /// Parses and executes one filtered line.
    async fn run_line(
        &self,
        context: &mut ExecutionContext,
        line: &ScriptLine,
    ) -> Result<LineReport, ScriptError> {
        let command = parse_line(&line.text)?;
        let outcome = self.execute(context, &command).await?;
        let (audit_outcome, detail) = match &outcome {
            CommandOutcome::FailureAbsorbed {
                message,
            } => (ScriptAuditOutcome::ExpectedFailure, Some(message.clone())),
            _ => (ScriptAuditOutcome::Success, None),
        };
        self.emit("line_processed", Some(line), Some(command.verb()), audit_outcome, detail);
        Ok(LineReport {
            line_number: line.number,
            verb: command.verb(),
            outcome,
        })
    }

    /// Executes one parsed command.
    ///
    /// # Errors
    ///
    /// Returns the [`ScriptError`] raised by resolution, the ledger, or an
    /// assertion.
    pub async fn execute(
        &self,
        context: &mut ExecutionContext,
        command: &Command,
    ) -> Result<CommandOutcome, ScriptError> {
        match command {
            Command::Mint {
                actor,
                amount,
                token,
            } => self.mint(context, *actor, amount, token).await,
            Command::Deposit {
                actor,
                amount,
                token,
                vault,
            } => self.deposit(context, *actor, amount, token, vault.as_ref()).await,
            Command::Withdraw {
                actor,
                amount,
                token,
                vault,
            } => self.withdraw(context, *actor, amount, token, vault.as_ref()).await,
            Command::Cooldown {
                actor,
                amount,
                vault,
            } => self.cooldown(context, *actor, amount, vault).await,
            Command::Unstake {
                actor,
                vault,
            } => self.unstake(context, *actor, vault).await,
            Command::Balance {
                holder,
                amount,
                token,
            } => self.check_balance(context, holder, amount, token).await,
            Command::TotalSupply {
                amount,
                token,
            } => self.check_total_supply(context, amount, token).await,
            Command::Wait {
                duration,
            } => self.wait(*duration).await,
            Command::ExpectFailure {
                inner,
                inner_line,
                expected,
            } => match Box::pin(self.execute(context, inner)).await {
                Ok(_) => Err(ScriptError::ExpectedFailureNotRaised {
                    line: inner_line.clone(),
                    expected: expected.clone(),
                }),
                Err(err) if err.is_expectable() => {
                    let message = err.to_string();
                    if message.contains(expected.as_str()) {
                        Ok(CommandOutcome::FailureAbsorbed {
                            message,
                        })
                    } else {
                        Err(ScriptError::ErrorMessageMismatch {
                            expected: expected.clone(),
                            actual: message,
                        })
                    }
                }
                Err(err) => Err(err),
            },
        }
    }

    // ------------------------------------------------------------------------
    // Command handlers
    // ------------------------------------------------------------------------

    /// Resolves `User<N>` and makes it the current actor.
    async fn actor(
        &self,
        context: &mut ExecutionContext,
        index: ActorIndex,
    ) -> Result<Actor, ScriptError> {
        context.resolve_actor(&self.ledger, &ActorRef::Index(index)).await
    }

    /// `mint`: mints to the actor.
    async fn mint(
        &self,
        context: &mut ExecutionContext,
        index: ActorIndex,
        amount: &DecimalLiteral,
        token: &SymbolName,
    ) -> Result<CommandOutcome, ScriptError> {
        let actor = self.actor(context, index).await?;
        let amount = amount.to_fixed_point()?;
        let token_address = context.resolve_symbol(token)?.address().clone();
        self.ledger.mint(&actor.address, &token_address, &actor.address, amount).await?;
        Ok(CommandOutcome::Minted {
            token: token.clone(),
            amount,
        })
    }

    /// `deposit`: mints any auto-mint shortfall, approves, then deposits.
    async fn deposit(
        &self,
        context: &mut ExecutionContext,
        index: ActorIndex,
        amount: &DecimalLiteral,
        token: &SymbolName,
        vault: Option<&SymbolName>,
    ) -> Result<CommandOutcome, ScriptError> {
        let actor = self.actor(context, index).await?;
        let amount = amount.to_fixed_point()?;
        let asset = context.resolve_symbol(token)?.address().clone();
        let target = context.deposit_target(vault, &self.settings)?;
        let auto_minted = self.mint_shortfall(&actor, &asset, token, amount).await?;
        let target_address = target.handle.address();
        self.ledger.approve(&actor.address, &asset, target_address, amount).await?;
        match &target.handle {
            LedgerHandle::Depositor(depositor) => {
                self.ledger
                    .deposit_via(&actor.address, depositor, &asset, amount, &actor.address)
                    .await?;
            }
            _ => {
                self.ledger.deposit(&actor.address, target_address, amount, &actor.address).await?;
            }
        }
        Ok(CommandOutcome::Deposited {
            target: target.name,
            amount,
            auto_minted,
        })
    }

    /// Mints the gap between the actor's balance and `amount` for auto-mint assets.
    async fn mint_shortfall(
        &self,
        actor: &Actor,
        asset: &Address,
        token: &SymbolName,
        amount: u128,
    ) -> Result<u128, ScriptError> {
        if !self.settings.auto_mints(token) {
            return Ok(0);
        }
        let balance = self.ledger.balance_of(asset, &actor.address).await?;
        if balance >= amount {
            return Ok(0);
        }
        let shortfall = amount - balance;
        self.ledger.mint(&actor.address, asset, &actor.address, shortfall).await?;
        self.emit(
            "auto_mint",
            None,
            Some("deposit"),
            ScriptAuditOutcome::Success,
            Some(format!("minted {} {token} to {}", format_fixed_point(shortfall), actor.index)),
        );
        Ok(shortfall)
    }

    /// `withdraw`: redeems a share percentage or withdraws an asset amount.
    async fn withdraw(
        &self,
        context: &mut ExecutionContext,
        index: ActorIndex,
        amount: &AmountSpec,
        token: &SymbolName,
        vault: Option<&SymbolName>,
    ) -> Result<CommandOutcome, ScriptError> {
        let actor = self.actor(context, index).await?;
        let asset = context.resolve_symbol(token)?.address().clone();
        let target = context.withdraw_vault(vault, &self.settings)?;
        let vault_address = target.handle.address();
        match amount {
            AmountSpec::Percent(percent) => {
                let percent = percent.to_percentage()?;
                let shares = self.ledger.balance_of(vault_address, &actor.address).await?;
                let shares = resolve_percentage(percent, shares);
                self.ledger
                    .redeem(&actor.address, vault_address, shares, &actor.address, &actor.address)
                    .await?;
                Ok(CommandOutcome::Redeemed {
                    vault: target.name,
                    shares,
                })
            }
            AmountSpec::Absolute(literal) => {
                let amount = literal.to_fixed_point()?;
                if self.ledger.vault_asset(vault_address).await? == asset {
                    self.ledger
                        .withdraw(
                            &actor.address,
                            vault_address,
                            amount,
                            &actor.address,
                            &actor.address,
                        )
                        .await?;
                } else {
                    self.ledger
                        .withdraw_asset(
                            &actor.address,
                            vault_address,
                            &asset,
                            amount,
                            &actor.address,
                            &actor.address,
                        )
                        .await?;
                }
                Ok(CommandOutcome::Withdrawn {
                    vault: target.name,
                    amount,
                })
            }
        }
    }

    /// `cooldown`: starts a cooldown on an asset amount or a share percentage.
    async fn cooldown(
        &self,
        context: &mut ExecutionContext,
        index: ActorIndex,
        amount: &AmountSpec,
        vault: &SymbolName,
    ) -> Result<CommandOutcome, ScriptError> {
        let actor = self.actor(context, index).await?;
        let target = context.staking_vault(vault)?;
        let vault_address = target.handle.address();
        let assets = match amount {
            AmountSpec::Percent(percent) => {
                let percent = percent.to_percentage()?;
                let shares = self.ledger.balance_of(vault_address, &actor.address).await?;
                let shares = resolve_percentage(percent, shares);
                self.ledger.preview_redeem(vault_address, shares).await?
            }
            AmountSpec::Absolute(literal) => literal.to_fixed_point()?,
        };
        self.ledger.cooldown_assets(&actor.address, vault_address, assets).await?;
        Ok(CommandOutcome::CooldownStarted {
            vault: target.name,
            assets,
        })
    }

    /// `unstake`: claims cooled-down assets to the actor.
    async fn unstake(
        &self,
        context: &mut ExecutionContext,
        index: ActorIndex,
        vault: &SymbolName,
    ) -> Result<CommandOutcome, ScriptError> {
        let actor = self.actor(context, index).await?;
        let target = context.staking_vault(vault)?;
        self.ledger.unstake(&actor.address, target.handle.address(), &actor.address).await?;
        Ok(CommandOutcome::Unstaked {
            vault: target.name,
        })
    }

    /// `balance`: asserts a holder balance within the configured tolerance.
    async fn check_balance(
        &self,
        context: &mut ExecutionContext,
        holder: &Holder,
        amount: &DecimalLiteral,
        token: &SymbolName,
    ) -> Result<CommandOutcome, ScriptError> {
        let expected = amount.to_fixed_point()?;
        let holder_address = context.resolve_holder(&self.ledger, holder).await?;
        let token_address = context.resolve_symbol(token)?.address().clone();
        let actual = self.ledger.balance_of(&token_address, &holder_address).await?;
        let tolerance = self.settings.balance_tolerance;
        if actual.abs_diff(expected) > tolerance {
            let holder = match holder {
                Holder::Actor(index) => index.to_string(),
                Holder::Named(name) => name.clone(),
            };
            return Err(ScriptError::BalanceMismatch {
                holder,
                token: token.as_str().to_string(),
                expected,
                actual,
                tolerance,
            });
        }
        Ok(CommandOutcome::BalanceChecked {
            actual,
        })
    }

    /// `totalSupply`: asserts an exact token supply.
    async fn check_total_supply(
        &self,
        context: &ExecutionContext,
        amount: &DecimalLiteral,
        token: &SymbolName,
    ) -> Result<CommandOutcome, ScriptError> {
        let expected = amount.to_fixed_point()?;
        let token_address = context.resolve_symbol(token)?.address();
        let actual = self.ledger.total_supply(token_address).await?;
        if actual != expected {
            return Err(ScriptError::TotalSupplyMismatch {
                token: token.as_str().to_string(),
                expected,
                actual,
            });
        }
        Ok(CommandOutcome::TotalSupplyChecked {
            actual,
        })
    }

    /// `wait`: advances the ledger clock.
    async fn wait(&self, duration: WaitDuration) -> Result<CommandOutcome, ScriptError> {
        let receipt = clock::advance(&self.ledger, duration).await?;
        self.emit(
            "time_advanced",
            None,
            Some("wait"),
            ScriptAuditOutcome::Success,
            Some(format!("{duration} to {}", receipt.timestamp)),
        );
        Ok(CommandOutcome::TimeAdvanced {
            timestamp: receipt.timestamp,
        })
    }

    /// Records an audit event.
    fn emit(
        &self,
        event: &'static str,
        line: Option<&ScriptLine>,
        verb: Option<&'static str>,
        outcome: ScriptAuditOutcome,
        detail: Option<String>,
    ) {
        self.audit.record(&ScriptAuditEvent::new(
            event,
            ScriptAuditEventParams {
                line_number: line.map(|line| line.number),
                line: line.map(|line| line.text.clone()),
                verb,
                outcome,
                detail,
            },
        ));
    }
}
