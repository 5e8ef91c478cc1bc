//! Context and sink builder tests for vault-script-config.
// crates/vault-script-config/tests/config_builders.rs
// =============================================================================
// Module: Config Builder Tests
// Description: Validate contexts and audit sinks built from configuration.
// Purpose: Ensure configured symbols, roles, and sinks reach the runtime.
// =============================================================================

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::fs;

use vault_script_config::AuditConfig;
use vault_script_config::AuditSinkKind;
use vault_script_core::ActorIndex;
use vault_script_core::HandleKind;
use vault_script_core::ScriptAuditEvent;
use vault_script_core::ScriptAuditOutcome;
use vault_script_core::SymbolName;
use vault_script_core::runtime::ScriptAuditEventParams;

mod common;

type TestResult = Result<(), String>;

#[test]
fn build_context_registers_symbols_and_roles() -> TestResult {
    let config = common::deployment_config().map_err(|err| err.to_string())?;
    config.validate().map_err(|err| err.to_string())?;
    let context = config.build_context().map_err(|err| err.to_string())?;

    let vault = context.resolve_symbol(&SymbolName::new("pUSDe")).map_err(|err| err.to_string())?;
    if vault.kind() != HandleKind::Vault {
        return Err(format!("unexpected kind: {}", vault.kind()));
    }
    if vault.address().as_str() != "0x00000000000000000000000000000000000000b2" {
        return Err(format!("address not normalized: {}", vault.address()));
    }
    let admin = context.resolve_role("admin").map_err(|err| err.to_string())?;
    if admin != ActorIndex::new(3) {
        return Err(format!("unexpected admin index: {admin}"));
    }
    let owner = context.resolve_role("owner").map_err(|err| err.to_string())?;
    if owner != ActorIndex::new(0) {
        return Err(format!("owner should default to index 0, got {owner}"));
    }
    let names: Vec<&str> = context.symbols().map(|(name, _)| name.as_str()).collect();
    if names != ["USDe", "pUSDe", "pUSDeDepositor"] {
        return Err(format!("unexpected symbol order: {names:?}"));
    }
    Ok(())
}

#[test]
fn file_sink_appends_json_lines() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("audit.jsonl");
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.audit = AuditConfig {
        sink: AuditSinkKind::File,
        path: Some(path.to_string_lossy().into_owned()),
    };
    config.validate().map_err(|err| err.to_string())?;
    let sink = config.build_audit_sink().map_err(|err| err.to_string())?;
    sink.record(&ScriptAuditEvent::new(
        "script_started",
        ScriptAuditEventParams {
            line_number: None,
            line: None,
            verb: None,
            outcome: ScriptAuditOutcome::Success,
            detail: Some("2 lines".to_string()),
        },
    ));
    let written = fs::read_to_string(&path).map_err(|err| err.to_string())?;
    if !written.contains("\"event\":\"script_started\"") || !written.ends_with('\n') {
        return Err(format!("unexpected audit output: {written}"));
    }
    Ok(())
}
