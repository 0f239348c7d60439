//! Shared output layer for human/JSON parity across all commands.
//!
//! Every command handler receives an [`OutputMode`] and a writer, so the
//! rendering can be exercised against an in-memory buffer in tests.

use serde::Serialize;
use std::io::{self, Write};

use storygraph_core::ErrorCode;

/// Shared width for human separators.
pub const RULE_WIDTH: usize = 72;

/// Write a section heading followed by a separator.
pub fn section(w: &mut dyn Write, heading: &str) -> io::Result<()> {
    writeln!(w, "{heading}")?;
    writeln!(w, "{:-<width$}", "", width = RULE_WIDTH)
}

/// Render a left-aligned key/value line in human output.
pub fn kv(w: &mut dyn Write, key: &str, value: impl AsRef<str>) -> io::Result<()> {
    writeln!(w, "{:<20} {}", format!("{key}:"), value.as_ref())
}

/// Trailer for human output when a command found something to fix.
pub fn finding(w: &mut dyn Write, code: ErrorCode) -> io::Result<()> {
    writeln!(w)?;
    writeln!(w, "{code}: {}", code.message())?;
    if let Some(hint) = code.hint() {
        writeln!(w, "hint: {hint}")?;
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable text.
    Human,
    /// Machine-readable JSON.
    Json,
}

impl OutputMode {
    pub const fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }
}

/// A structured error with an optional hint and error code.
#[derive(Debug, Serialize)]
pub struct CliError {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            hint: None,
            error_code: None,
        }
    }

    /// Attach the code and hint of a known [`ErrorCode`].
    pub fn with_code(message: impl Into<String>, code: ErrorCode) -> Self {
        Self {
            message: message.into(),
            hint: code.hint().map(str::to_string),
            error_code: Some(code.code().to_string()),
        }
    }
}

/// Render a serializable value in the requested format.
///
/// In JSON mode the value is serialized with `serde_json`; otherwise
/// `human_fn` produces the text.
pub fn render<T: Serialize>(
    mode: OutputMode,
    value: &T,
    w: &mut dyn Write,
    human_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut *w, value)?;
            writeln!(w)?;
        }
        OutputMode::Human => human_fn(value, w)?,
    }
    Ok(())
}

/// Render an error in the requested format.
pub fn render_error(mode: OutputMode, error: &CliError, w: &mut dyn Write) -> anyhow::Result<()> {
    match mode {
        OutputMode::Json => {
            let wrapper = serde_json::json!({ "error": error });
            serde_json::to_writer_pretty(&mut *w, &wrapper)?;
            writeln!(w)?;
        }
        OutputMode::Human => {
            match &error.error_code {
                Some(code) => writeln!(w, "error[{code}]: {}", error.message)?,
                None => writeln!(w, "error: {}", error.message)?,
            }
            if let Some(hint) = &error.hint {
                writeln!(w, "hint: {hint}")?;
            }
        }
    }
    Ok(())
}
