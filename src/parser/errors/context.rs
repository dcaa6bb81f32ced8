//! Parse context tracking for context-aware error messages
//!
//! Each construct the parser enters has a context that names it in messages
//! and decides where recovery may stop.

use crate::parser::SyntaxKind;

/// Represents the current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseContext {
    /// Between statements
    TopLevel,
    /// Inside `@charset "...";`
    Charset,
    /// Reading a rule's selector
    Selector,
    /// Between the braces of a rule
    DeclarationList,
    /// Reading `property:`
    Declaration,
    /// Reading a declaration value
    Value,
}

impl ParseContext {
    /// Get a human-readable description of this context for error messages
    pub fn description(&self) -> &'static str {
        match self {
            Self::TopLevel => "at top level",
            Self::Charset => "in charset statement",
            Self::Selector => "in selector",
            Self::DeclarationList => "in rule body",
            Self::Declaration => "in declaration",
            Self::Value => "in declaration value",
        }
    }

    /// Get a description of what tokens are expected in this context
    pub fn expected_description(&self) -> &'static str {
        match self {
            Self::TopLevel => "a rule or '@charset'",
            Self::Charset => "a quoted encoding name followed by ';'",
            Self::Selector => "a selector followed by '{'",
            Self::DeclarationList => "a declaration or '}'",
            Self::Declaration => "a property name followed by ':'",
            Self::Value => "a value ended by ';' or '}'",
        }
    }

    /// Tokens at which recovery stops in this context
    pub fn recovery_tokens(&self) -> &'static [SyntaxKind] {
        match self {
            Self::TopLevel => &[],
            Self::Charset => &[SyntaxKind::SEMICOLON, SyntaxKind::L_BRACE, SyntaxKind::R_BRACE],
            Self::Selector | Self::DeclarationList => &[SyntaxKind::R_BRACE],
            Self::Declaration | Self::Value => &[SyntaxKind::SEMICOLON, SyntaxKind::R_BRACE],
        }
    }
}
