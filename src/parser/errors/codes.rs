//! Error code definitions for parser diagnostics
//!
//! Error codes follow a naming convention: E{category}{number}
//! - E01xx: Lexical errors (invalid characters)
//! - E02xx: Structural errors (braces, end of file, at-rules)
//! - E03xx: Construct errors (charset, selector, declaration parts)
//!
//! Every code also has a short expectation key (`identifier`, `colon`, ...)
//! which is what recovery fixtures and editor integrations match on.

use std::fmt;

/// Error codes for parser diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // E01xx: Lexical errors
    // =========================================================================
    /// Invalid or unexpected character in source
    E0101,

    // =========================================================================
    // E02xx: Structural errors
    // =========================================================================
    /// End of file inside a construct
    E0201,
    /// Expected `{` after selector
    E0202,
    /// Expected `;` to end a statement
    E0203,
    /// Unsupported at-rule skipped
    E0204,
    /// `@charset` after the first construct
    E0205,

    // =========================================================================
    // E03xx: Construct errors
    // =========================================================================
    /// Expected identifier (property name)
    E0301,
    /// Expected `:` after property name
    E0302,
    /// Missing or malformed declaration value
    E0303,
    /// Missing selector before `{`
    E0304,
    /// Expected string after `@charset`
    E0305,
}

impl ErrorCode {
    /// Get the string representation of the error code (e.g., "E0302")
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::E0101 => "E0101",
            Self::E0201 => "E0201",
            Self::E0202 => "E0202",
            Self::E0203 => "E0203",
            Self::E0204 => "E0204",
            Self::E0205 => "E0205",
            Self::E0301 => "E0301",
            Self::E0302 => "E0302",
            Self::E0303 => "E0303",
            Self::E0304 => "E0304",
            Self::E0305 => "E0305",
        }
    }

    /// Short key naming what the parser expected
    pub fn key(&self) -> &'static str {
        match self {
            Self::E0101 => "character",
            Self::E0201 => "eof",
            Self::E0202 => "left-brace",
            Self::E0203 => "semicolon",
            Self::E0204 => "at-rule",
            Self::E0205 => "charset",
            Self::E0301 => "identifier",
            Self::E0302 => "colon",
            Self::E0303 => "value",
            Self::E0304 => "selector",
            Self::E0305 => "string",
        }
    }

    /// Get a short description of the error category
    pub fn category_description(&self) -> &'static str {
        match self {
            Self::E0101 => "lexical error",
            Self::E0201 | Self::E0202 | Self::E0203 | Self::E0204 | Self::E0205 => {
                "structural error"
            }
            Self::E0301 | Self::E0302 | Self::E0303 | Self::E0304 | Self::E0305 => {
                "syntax error"
            }
        }
    }

    /// Get the default message template for this error code
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::E0101 => "invalid character",
            Self::E0201 => "unexpected end of file",
            Self::E0202 => "expected '{' after selector",
            Self::E0203 => "expected ';'",
            Self::E0204 => "unsupported at-rule skipped",
            Self::E0205 => "'@charset' must be the first statement",
            Self::E0301 => "expected property name",
            Self::E0302 => "expected ':' after property name",
            Self::E0303 => "expected declaration value",
            Self::E0304 => "expected selector before '{'",
            Self::E0305 => "expected string after '@charset'",
        }
    }

    /// Check if this is a lexical error
    pub fn is_lexical(&self) -> bool {
        matches!(self, Self::E0101)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
