//! # cssedit-base
//!
//! Core library for parsing stylesheets into an editable document tree and
//! writing tree edits back into the source text without reformatting it.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! edit      → EditContext, buffer sync, storage, edit options
//!   ↓
//! syntax    → Arena Document, nodes, change events, visitor
//!   ↕
//! parser    → Logos lexer, recursive-descent parser, syntax errors
//!   ↓
//! base      → Primitives (TextBuffer, LineIndex, TextRange)
//! ```
//!
//! `parser` builds a `syntax::Document`, and the document stores the
//! parser's `SyntaxError`s, so those two reference each other.
//!
//! ## Example
//!
//! ```
//! use cssedit::edit::EditContext;
//!
//! let mut ctx = EditContext::from_text("a {}\n\nb {}\n").unwrap();
//! let first = ctx.document().rule(0).unwrap();
//! ctx.document_mut().remove_rule(first).unwrap();
//! assert_eq!(ctx.text(), "b {}\n");
//! ```

// ============================================================================
// MODULES (dependency order: base → parser ↔ syntax → edit)
// ============================================================================

/// Foundation types: TextBuffer, LineIndex, TextRange
pub mod base;

/// Parser: Logos lexer, recursive-descent parser, syntax errors
pub mod parser;

/// Syntax: arena Document, node kinds, change events, visitor
pub mod syntax;

/// Editing: EditContext keeping the tree and the text buffer in step
pub mod edit;

// Re-export foundation types
pub use base::{LineBuffer, LineIndex, Position, Span, TextBuffer, TextRange, TextSize};

// Re-export the main entry points
pub use edit::{EditContext, EditError, EditOptions};
pub use parser::{SyntaxError, parse};
pub use syntax::{Document, NodeId, NodeKind};
