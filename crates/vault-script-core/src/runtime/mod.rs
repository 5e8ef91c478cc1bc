// crates/vault-script-core/src/runtime/mod.rs
// ============================================================================
// Module: Vault Script Runtime
// Description: Grammar, execution context, interpreter, and ledger helpers.
// Purpose: Execute scenario scripts against a ledger, one line at a time.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Runtime modules parse script lines, resolve names through an explicit
//! execution context, and drive the ledger. The in-memory ledger backs
//! tests and local demos.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod audit;
pub mod clock;
pub mod context;
pub mod error;
pub mod grammar;
pub mod interpreter;
pub mod ledger;
pub mod settings;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::FileAuditSink;
pub use audit::NoopAuditSink;
pub use audit::ScriptAuditEvent;
pub use audit::ScriptAuditEventParams;
pub use audit::ScriptAuditOutcome;
pub use audit::ScriptAuditSink;
pub use audit::StderrAuditSink;
pub use clock::advance;
pub use context::ExecutionContext;
pub use context::OWNER_ROLE;
pub use context::ResolvedTarget;
pub use error::ScriptError;
pub use error::ScriptFailure;
pub use grammar::GRAMMAR;
pub use grammar::GrammarRule;
pub use grammar::governing_rule;
pub use grammar::parse_line;
pub use grammar::parse_script;
pub use interpreter::CommandOutcome;
pub use interpreter::LineReport;
pub use interpreter::ScriptInterpreter;
pub use interpreter::ScriptReport;
pub use ledger::InMemoryLedger;
pub use settings::InterpreterSettings;
