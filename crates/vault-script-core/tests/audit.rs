// crates/vault-script-core/tests/audit.rs
// ============================================================================
// Module: Script Audit Tests
// Description: Tests for the audit events emitted while scripts run.
// ============================================================================
//! ## Overview
//! Captures audit events in memory and on disk to check their order,
//! outcomes, and JSON-line encoding.

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

mod common;

use std::sync::Arc;
use std::sync::Mutex;

use common::deploy;
use vault_script_core::FileAuditSink;
use vault_script_core::ScriptAuditEvent;
use vault_script_core::ScriptAuditOutcome;
use vault_script_core::ScriptAuditSink;

/// Sink that keeps every event in memory.
#[derive(Default)]
struct RecordingSink {
    /// Events in arrival order.
    events: Mutex<Vec<ScriptAuditEvent>>,
}

impl RecordingSink {
    /// Returns event identifiers in arrival order.
    fn names(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().iter().map(|event| event.event).collect()
    }

    /// Returns a copy of every recorded event.
    fn events(&self) -> Vec<ScriptAuditEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl ScriptAuditSink for RecordingSink {
    fn record(&self, event: &ScriptAuditEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

#[tokio::test]
async fn successful_run_emits_ordered_events() {
    let mut deployment = deploy();
    let sink = Arc::new(RecordingSink::default());
    let interpreter = deployment.interpreter().with_audit_sink(sink.clone());
    interpreter
        .run_script(
            &mut deployment.context,
            "# setup
             User1: deposit 10 USDe

             wait: 1 hours
             error: User1: withdraw 11 USDe | ERC4626ExceededMaxWithdraw",
        )
        .await
        .unwrap();

    assert_eq!(
        sink.names(),
        vec![
            "script_started",
            "auto_mint",
            "line_processed",
            "time_advanced",
            "line_processed",
            "line_processed",
            "script_completed",
        ]
    );
    let events = sink.events();
    let deposit = &events[2];
    assert_eq!(deposit.line_number, Some(2));
    assert_eq!(deposit.verb, Some("deposit"));
    assert_eq!(deposit.outcome, ScriptAuditOutcome::Success);
    let absorbed = &events[5];
    assert_eq!(absorbed.line_number, Some(5));
    assert_eq!(absorbed.verb, Some("error"));
    assert_eq!(absorbed.outcome, ScriptAuditOutcome::ExpectedFailure);
    assert!(absorbed.detail.as_deref().unwrap().contains("ERC4626ExceededMaxWithdraw"));
}

#[tokio::test]
async fn failing_run_ends_with_failure_event() {
    let mut deployment = deploy();
    let sink = Arc::new(RecordingSink::default());
    let interpreter = deployment.interpreter().with_audit_sink(sink.clone());
    let failure = interpreter
        .run_script(
            &mut deployment.context,
            "User1: mint 1 USDe\nbalance: User1 2 USDe\nUser1: mint 1 USDe",
        )
        .await
        .unwrap_err();
    assert_eq!(failure.line_number, 2);

    let events = sink.events();
    let last = events.last().unwrap();
    assert_eq!(last.event, "script_failed");
    assert_eq!(last.outcome, ScriptAuditOutcome::Failure);
    assert_eq!(last.line_number, Some(2));
    assert_eq!(last.line.as_deref(), Some("balance: User1 2 USDe"));
    assert!(events.iter().all(|event| event.event != "script_completed"));
    assert_eq!(events.iter().filter(|event| event.event == "line_processed").count(), 1);
}

#[tokio::test]
async fn rejected_script_reports_failure_without_start() {
    let mut deployment = deploy();
    let sink = Arc::new(RecordingSink::default());
    let interpreter = deployment.interpreter().with_audit_sink(sink.clone());
    let oversized = "wait: 1 hours\n".repeat(20_000);
    let failure = interpreter.run_script(&mut deployment.context, &oversized).await.unwrap_err();
    assert_eq!(failure.line_number, 0);
    assert_eq!(sink.names(), vec!["script_failed"]);
}

#[tokio::test]
async fn file_sink_appends_json_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.jsonl");
    let mut deployment = deploy();
    let sink = Arc::new(FileAuditSink::new(&path).unwrap());
    let interpreter = deployment.interpreter().with_audit_sink(sink);
    interpreter.run_script(&mut deployment.context, "User3: mint 5 USDe").await.unwrap();
    interpreter.run_script(&mut deployment.context, "totalSupply: 5 USDe").await.unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    let records: Vec<serde_json::Value> =
        contents.lines().map(|line| serde_json::from_str(line).unwrap()).collect();
    assert_eq!(records.len(), 6);
    assert_eq!(records[0]["event"], "script_started");
    assert_eq!(records[1]["event"], "line_processed");
    assert_eq!(records[1]["verb"], "mint");
    assert_eq!(records[1]["outcome"], "success");
    assert_eq!(records[4]["verb"], "totalSupply");
    assert_eq!(records[5]["event"], "script_completed");
}
