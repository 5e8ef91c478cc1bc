// crates/vault-script-core/src/lib.rs
// ============================================================================
// Module: Vault Script Core Library
// Description: Public API surface for the vault scenario interpreter.
// Purpose: Expose script types, ledger interfaces, and the interpreter.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Vault script core runs line-oriented scenario scripts against a vault
//! ledger. Scripts name actors (`User1`), contracts (`USDe`, `pUSDe`) and
//! human-readable decimal amounts; the interpreter resolves them through an
//! explicit [`ExecutionContext`], converts amounts to 18-decimal fixed point,
//! and asserts expected balances, supplies, and failures.
//!
//! The ledger itself is external and reached only through the
//! [`Ledger`] interface. [`InMemoryLedger`] is provided for tests.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::*;

pub use interfaces::Ledger;
pub use interfaces::LedgerError;
pub use interfaces::SignerRegistry;
pub use interfaces::TimeControl;
pub use interfaces::TxReceipt;
pub use runtime::CommandOutcome;
pub use runtime::ExecutionContext;
pub use runtime::FileAuditSink;
pub use runtime::InMemoryLedger;
pub use runtime::InterpreterSettings;
pub use runtime::NoopAuditSink;
pub use runtime::ScriptAuditEvent;
pub use runtime::ScriptAuditOutcome;
pub use runtime::ScriptAuditSink;
pub use runtime::ScriptError;
pub use runtime::ScriptFailure;
pub use runtime::ScriptInterpreter;
pub use runtime::ScriptReport;
pub use runtime::StderrAuditSink;
