//! Logos-based lexer and recursive descent parser for stylesheets
//!
//! ## Architecture
//!
//! ```text
//! Source Text
//!     ↓
//! Lexer (logos) → Tokens with SyntaxKind
//!     ↓
//! Scanner → forward-only cursor, trivia skipped or kept
//!     ↓
//! Parser → Document (arena tree) + SyntaxErrors
//! ```
//!
//! Constructs are sliced from the source between their first and last
//! non-trivia tokens, so leaf values always equal their source text.

#[allow(clippy::module_inception)]
mod parser;

pub mod errors;
mod lexer;
mod syntax_kind;

pub use errors::{ErrorCode, ParseContext, Severity, SyntaxError};
pub use lexer::{Lexer, Scanner, Token, tokenize};
pub use parser::parse;
pub use syntax_kind::{SyntaxKind, kind_to_name};
