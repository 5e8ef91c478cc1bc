// crates/vault-script-core/src/runtime/audit.rs
// ============================================================================
// Module: Vault Script Audit Logging
// Description: Structured audit events for script execution.
// Purpose: Emit JSON-line records of every processed line without a logging facade.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! The interpreter reports progress through a [`ScriptAuditSink`]. Events are
//! plain serializable records so hosts can route them to stderr, a file, or
//! their own pipeline. Sinks never fail the script: serialization or I/O
//! errors are dropped.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Outcome classification for an audit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptAuditOutcome {
    /// Step completed.
    Success,
    /// An `error:` line absorbed the expected failure.
    ExpectedFailure,
    /// Step failed and aborted the script.
    Failure,
}

/// Script audit event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptAuditEvent {
    /// Event identifier (`script_started`, `line_processed`, ...).
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// 1-based script line number when tied to a line.
    pub line_number: Option<usize>,
    /// Line text when tied to a line.
    pub line: Option<String>,
    /// Command verb when the line parsed.
    pub verb: Option<&'static str>,
    /// Event outcome.
    pub outcome: ScriptAuditOutcome,
    /// Free-form detail (error message, minted amount, new timestamp).
    pub detail: Option<String>,
}

/// Inputs required to construct a script audit event.
pub struct ScriptAuditEventParams {
    /// 1-based script line number when tied to a line.
    pub line_number: Option<usize>,
    /// Line text when tied to a line.
    pub line: Option<String>,
    /// Command verb when the line parsed.
    pub verb: Option<&'static str>,
    /// Event outcome.
    pub outcome: ScriptAuditOutcome,
    /// Free-form detail.
    pub detail: Option<String>,
}

impl ScriptAuditEvent {
    /// Creates a new audit event with a consistent timestamp.
    #[must_use]
    pub fn new(event: &'static str, params: ScriptAuditEventParams) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event,
            timestamp_ms,
            line_number: params.line_number,
            line: params.line,
            verb: params.verb,
            outcome: params.outcome,
            detail: params.detail,
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for script events.
pub trait ScriptAuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: &ScriptAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl ScriptAuditSink for StderrAuditSink {
    fn record(&self, event: &ScriptAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl ScriptAuditSink for FileAuditSink {
    fn record(&self, event: &ScriptAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl ScriptAuditSink for NoopAuditSink {
    fn record(&self, _event: &ScriptAuditEvent) {}
}
