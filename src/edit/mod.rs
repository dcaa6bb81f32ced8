//! Text-preserving editing.
//!
//! An [`EditContext`] parses a text into a [`Document`](crate::syntax::Document)
//! and then listens to the document's change events. Each event becomes a
//! minimal patch on the private text buffer followed by an offset fixup of
//! the tree, so untouched text (comments, blank lines, odd formatting) is
//! never rewritten.
//!
//! ```text
//! Document mutation ──► ModelEvent ──► BufferSync ──► TextBuffer::replace
//!                                          │
//!                                          └──► Document offset fixup
//! ```

mod context;
mod error;
mod options;
mod storage;
mod sync;

pub use context::EditContext;
pub use error::{EditError, StorageError};
pub use options::EditOptions;
pub use storage::{FileStorage, MemoryStorage, Storage};
