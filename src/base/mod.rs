//! Foundation types for the cssedit toolchain.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`TextRange`], [`TextSize`] - Source positions (byte offsets)
//! - [`LineIndex`], [`LineEnding`] - Line bookkeeping
//! - [`Position`], [`Span`] - Line/column positions for diagnostics
//! - [`TextBuffer`], [`LineBuffer`] - Editable text behind an edit context
//!
//! This module has NO dependencies on other cssedit modules.

mod buffer;
mod line_index;
mod position;

pub use buffer::{BufferError, LineBuffer, TextBuffer};
pub use line_index::{LineEnding, LineIndex};
pub use position::{Position, Span};

// Re-export text-size types for convenience
pub use text_size;
pub use text_size::{TextRange, TextSize};
