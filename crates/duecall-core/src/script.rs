//! Call script templates.
//!
//! The script is an ordered sequence of template lines, one per dialogue
//! step, with named `{placeholder}` slots. It is loaded once and shared
//! (immutably) across all sessions.

use std::path::Path;

use tracing::info;

use crate::error::{DuecallError, Result};

/// Line roles by positional index.
pub mod line {
    pub const GREETING: usize = 0;
    pub const TIME_CONFIRMATION: usize = 1;
    pub const POLICY_SUMMARY: usize = 2;
    pub const BENEFITS_PROMPT: usize = 4;
    pub const SOLUTION: usize = 5;
    pub const MODE_CONFIRMATION: usize = 6;
    pub const THANKS: usize = 7;
    pub const ALREADY_PAID: usize = 8;
    pub const ALTERNATIVE_CLOSE: usize = 9;
}

/// Minimum number of script lines required to serve a call.
const MIN_LINES: usize = 10;

/// The ordered call script.
#[derive(Debug, Clone)]
pub struct CallScript {
    lines: Vec<String>,
}

impl CallScript {
    /// Build a script from in-memory lines (used by tests and fixtures).
    ///
    /// Rejects scripts shorter than the fixed call topology requires.
    pub fn new(lines: Vec<String>) -> Result<Self> {
        if lines.len() < MIN_LINES {
            return Err(DuecallError::Script(format!(
                "script has {} lines, need at least {}",
                lines.len(),
                MIN_LINES
            )));
        }
        Ok(Self { lines })
    }

    /// Load the script from a plain-text file, keeping non-empty trimmed
    /// lines in order. A missing or too-short script is fatal.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DuecallError::Script(format!("cannot read script {}: {}", path.display(), e))
        })?;
        let lines: Vec<String> = content
            .lines()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .map(|l| l.to_string())
            .collect();
        let script = Self::new(lines)?;
        info!(lines = script.lines.len(), "Call script loaded");
        Ok(script)
    }

    /// Get the raw template at a positional index.
    pub fn line(&self, idx: usize) -> Result<&str> {
        self.lines
            .get(idx)
            .map(|s| s.as_str())
            .ok_or_else(|| DuecallError::Script(format!("missing script line {}", idx)))
    }

    /// The final closing line.
    pub fn closing_line(&self) -> &str {
        // new() guarantees at least MIN_LINES entries.
        &self.lines[self.lines.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Substitute named `{placeholder}` slots in a template.
///
/// Unknown placeholders are left untouched, so a template may carry slots a
/// given step does not fill.
pub fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (key, value) in values {
        out = out.replace(&format!("{{{}}}", key), value);
    }
    out
}
