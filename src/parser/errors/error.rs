//! Syntax error types
//!
//! A [`SyntaxError`] is purely diagnostic: it is recorded on the document,
//! spans the construct the parser gave up on, and never takes part in
//! offset fixup after edits.

use text_size::TextRange;

use super::codes::ErrorCode;
use super::context::ParseContext;

/// Severity level for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Severity {
    /// Input the parser could not make sense of
    #[default]
    Error,
    /// Valid input this engine does not model (skipped at-rules)
    Warning,
}

impl Severity {
    /// Check if this is an error
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

/// A syntax error with location, code and message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    /// Human-readable error message
    pub message: String,
    /// From construct start to the recovery point
    pub range: TextRange,
    /// Categorized error code
    pub code: ErrorCode,
    /// Error severity
    pub severity: Severity,
}

impl SyntaxError {
    /// Create a new syntax error
    pub fn new(message: impl Into<String>, range: TextRange, code: ErrorCode) -> Self {
        Self {
            message: message.into(),
            range,
            code,
            severity: Severity::Error,
        }
    }

    /// Create an error with the code's default message
    pub fn from_code(code: ErrorCode, range: TextRange) -> Self {
        Self::new(code.default_message(), range, code)
    }

    /// Set the severity
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// The short expectation key ("identifier", "colon", "eof", ...)
    pub fn key(&self) -> &'static str {
        self.code.key()
    }

    pub fn offset(&self) -> usize {
        usize::from(self.range.start())
    }

    pub fn length(&self) -> usize {
        usize::from(self.range.len())
    }
}

impl std::fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} at {:?}: {}",
            self.severity.as_str(),
            self.code,
            self.range,
            self.message
        )
    }
}

/// Helper function to create a context-aware error message
pub fn format_context_error(
    found: &str,
    context: ParseContext,
    code: ErrorCode,
    range: TextRange,
) -> SyntaxError {
    let message = format!(
        "unexpected {} {}, expected {}",
        found,
        context.description(),
        context.expected_description()
    );

    SyntaxError::new(message, range, code)
}
