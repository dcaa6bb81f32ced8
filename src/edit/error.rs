//! Error types for edit operations.

use std::path::PathBuf;

use thiserror::Error;

use crate::base::BufferError;
use crate::syntax::ModelError;

/// Errors raised by a [`Storage`](super::Storage) backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading the backing file failed.
    #[error("can not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing the backing file failed.
    #[error("can not write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The storage was used before `connect` or after `disconnect`.
    #[error("storage is not connected")]
    NotConnected,
}

/// Errors that can occur during edit operations.
#[derive(Debug, Error)]
pub enum EditError {
    /// Buffer access out of range.
    #[error(transparent)]
    Buffer(#[from] BufferError),

    /// Rejected document mutation.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Storage backend failure.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Caller supplied something the operation can not use.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The context was disconnected from its storage.
    #[error("edit context is disconnected")]
    Disconnected,
}

impl EditError {
    /// Create an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}
