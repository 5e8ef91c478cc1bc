// crates/vault-script-config/src/lib.rs
// ============================================================================
// Module: Vault Script Config Library
// Description: Harness config model, validation, and builders.
// Purpose: Single source of truth for vault-script.toml semantics.
// Dependencies: vault-script-core, serde, toml
// ============================================================================

//! ## Overview
//! `vault-script-config` defines the configuration model for the vault
//! script harness. It provides strict, fail-closed validation and builds the
//! interpreter settings, execution context, and audit sink a run needs.
//!
//! Security posture: config inputs are untrusted; paths and table sizes are
//! bounded before anything is built.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
