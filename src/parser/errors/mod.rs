//! Parser error handling module
//!
//! - Categorized error codes with short expectation keys
//! - Context-aware error messages
//! - Per-context recovery token sets

mod codes;
mod context;
mod error;

pub use codes::ErrorCode;
pub use context::ParseContext;
pub use error::{Severity, SyntaxError, format_context_error};
