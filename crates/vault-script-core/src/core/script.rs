// crates/vault-script-core/src/core/script.rs
// ============================================================================
// Module: Vault Script Text
// Description: Line filtering for raw script text.
// Purpose: Reduce script text to the ordered lines that carry commands.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Scripts are plain text with one command per line. Lines are trimmed;
//! blank lines and lines starting with `#` or `//` are dropped. The remaining
//! lines keep their 1-based source line numbers for diagnostics.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Default maximum script size in bytes.
pub const DEFAULT_MAX_SCRIPT_BYTES: usize = 256 * 1024;
/// Default maximum number of command lines per script.
pub const DEFAULT_MAX_SCRIPT_LINES: usize = 4_096;

/// Script size limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptLimits {
    /// Maximum raw script size in bytes.
    pub max_bytes: usize,
    /// Maximum number of command lines after filtering.
    pub max_lines: usize,
}

impl Default for ScriptLimits {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_SCRIPT_BYTES,
            max_lines: DEFAULT_MAX_SCRIPT_LINES,
        }
    }
}

// ============================================================================
// SECTION: Script
// ============================================================================

/// One command-bearing line of a script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptLine {
    /// 1-based line number in the script source.
    pub number: usize,
    /// Trimmed line text.
    pub text: String,
}

/// Filtered script ready for dispatch.
///
/// # Invariants
/// - Lines are in source order and never empty or comments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    /// Command-bearing lines.
    lines: Vec<ScriptLine>,
}

/// Reason a script was rejected before execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptLimitExceeded {
    /// Raw text exceeded the byte limit.
    Bytes {
        /// Configured limit.
        max: usize,
        /// Actual size.
        actual: usize,
    },
    /// Too many command lines.
    Lines {
        /// Configured limit.
        max: usize,
        /// Actual count.
        actual: usize,
    },
}

impl Script {
    /// Filters script text into command lines.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptLimitExceeded`] when the text breaks `limits`.
    pub fn parse(text: &str, limits: ScriptLimits) -> Result<Self, ScriptLimitExceeded> {
        if text.len() > limits.max_bytes {
            return Err(ScriptLimitExceeded::Bytes {
                max: limits.max_bytes,
                actual: text.len(),
            });
        }
        let lines: Vec<ScriptLine> = text
            .lines()
            .enumerate()
            .map(|(index, line)| (index + 1, line.trim()))
            .filter(|(_, line)| !is_insignificant(line))
            .map(|(number, line)| ScriptLine {
                number,
                text: line.to_string(),
            })
            .collect();
        if lines.len() > limits.max_lines {
            return Err(ScriptLimitExceeded::Lines {
                max: limits.max_lines,
                actual: lines.len(),
            });
        }
        Ok(Self {
            lines,
        })
    }

    /// Returns the command lines in execution order.
    #[must_use]
    pub fn lines(&self) -> &[ScriptLine] {
        &self.lines
    }

    /// Returns true when the script has no command lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Returns true for blank and comment lines.
fn is_insignificant(line: &str) -> bool {
    line.is_empty() || line.starts_with('#') || line.starts_with("//")
}
