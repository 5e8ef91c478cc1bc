// crates/vault-script-core/src/core/mod.rs
// ============================================================================
// Module: Vault Script Core Types
// Description: Canonical script, command, quantity, and identifier types.
// Purpose: Provide stable, serializable types shared by the interpreter.
// Dependencies: bigdecimal, serde
// ============================================================================

//! ## Overview
//! Core types describe scripts and the commands parsed from them. They carry
//! no ledger state; resolution against a ledger happens in the runtime.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod amount;
pub mod command;
pub mod handle;
pub mod identifiers;
pub mod script;
pub mod time;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use amount::AmountError;
pub use amount::AmountSpec;
pub use amount::DecimalLiteral;
pub use amount::FIXED_POINT_DECIMALS;
pub use amount::FIXED_POINT_UNIT;
pub use amount::format_fixed_point;
pub use amount::parse_percentage;
pub use amount::resolve_percentage;
pub use amount::to_fixed_point;
pub use amount::to_fixed_point_with_decimals;
pub use command::Command;
pub use command::Holder;
pub use handle::HandleKind;
pub use handle::LedgerHandle;
pub use identifiers::Actor;
pub use identifiers::ActorIndex;
pub use identifiers::ActorRef;
pub use identifiers::Address;
pub use identifiers::SymbolName;
pub use script::Script;
pub use script::ScriptLimitExceeded;
pub use script::ScriptLimits;
pub use script::ScriptLine;
pub use time::WaitDuration;
pub use time::WaitUnit;
