//! Diagnostics reported by the transpiler passes.
//!
//! A `Diagnostic` is the error currency of every library crate: parsers and
//! passes return `Result<_, Diagnostic>` and the driver decides whether to
//! abort the file or merely log and continue.

use serde::Serialize;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum DiagnosticCategory {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub file: String,
    /// Start byte offset in the source, 0 when no span is known.
    pub start: u32,
    /// End byte offset in the source, 0 when no span is known.
    pub end: u32,
    pub message_text: String,
}

impl Diagnostic {
    pub fn error(file: impl Into<String>, start: u32, end: u32, message: impl Into<String>) -> Self {
        Self {
            category: DiagnosticCategory::Error,
            file: file.into(),
            start,
            end,
            message_text: message.into(),
        }
    }

    /// An error with no usable source span.
    pub fn file_error(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::error(file, 0, 0, message)
    }

    pub fn warning(
        file: impl Into<String>,
        start: u32,
        end: u32,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category: DiagnosticCategory::Warning,
            file: file.into(),
            start,
            end,
            message_text: message.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.start == 0 && self.end == 0 {
            write!(f, "{}: {}", self.file, self.message_text)
        } else {
            write!(
                f,
                "{}:{}..{}: {}",
                self.file, self.start, self.end, self.message_text
            )
        }
    }
}

impl std::error::Error for Diagnostic {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_span_when_known() {
        let diag = Diagnostic::error("a.js", 4, 9, "unsupported type construct");
        assert_eq!(diag.to_string(), "a.js:4..9: unsupported type construct");
    }

    #[test]
    fn display_omits_zero_span() {
        let diag = Diagnostic::file_error("a.js", "parse failure");
        assert_eq!(diag.to_string(), "a.js: parse failure");
    }
}
