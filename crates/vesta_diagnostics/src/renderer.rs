//! Rendering diagnostics for people and for tools.

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;

/// Formats a single diagnostic.
pub trait DiagnosticRenderer {
    /// Renders `diag`, without a trailing newline.
    fn render(&self, diag: &Diagnostic) -> String;
}

/// Renders diagnostics in a rustc-like terminal format.
///
/// ```text
/// error[D001]: /app/main.ts imports libB/index from b.pkg, which is not a declared dependency
///   --> /app/main.ts
///    = help: declare the dependency that provides b.pkg
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalRenderer {
    /// Whether to use ANSI color codes in output.
    pub color: bool,
}

impl TerminalRenderer {
    /// Creates a new terminal renderer.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn severity(&self, severity: Severity) -> String {
        if !self.color {
            return severity.to_string();
        }
        let ansi = match severity {
            Severity::Error => "1;31",
            Severity::Warning => "1;33",
            Severity::Note => "1;36",
        };
        format!("\x1b[{ansi}m{severity}\x1b[0m")
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic) -> String {
        let mut out = format!(
            "{}[{}]: {}",
            self.severity(diag.severity),
            diag.code,
            diag.message
        );
        if let Some(file) = &diag.file {
            out.push_str(&format!("\n  --> {file}"));
        }
        for note in &diag.notes {
            out.push_str(&format!("\n   = note: {note}"));
        }
        for help in &diag.help {
            out.push_str(&format!("\n   = help: {help}"));
        }
        out
    }
}

/// Renders each diagnostic as one line of JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl DiagnosticRenderer for JsonRenderer {
    fn render(&self, diag: &Diagnostic) -> String {
        serde_json::to_string(diag).unwrap_or_default()
    }
}
