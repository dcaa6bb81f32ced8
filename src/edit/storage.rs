//! Persistent homes for edited text.
//!
//! An [`EditContext`](super::EditContext) copies the storage content into a
//! private buffer on connect and only writes it back on commit.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tracing::debug;

use super::error::StorageError;
use crate::base::{LineBuffer, TextBuffer};

/// Where the text of an edit context comes from and goes back to
pub trait Storage {
    /// Open the store and return its current content
    fn connect(&mut self) -> Result<String, StorageError>;

    /// Replace the stored content with `text`
    fn commit(&mut self, text: &str) -> Result<(), StorageError>;

    /// Release the store; later commits fail with `NotConnected`
    fn disconnect(&mut self) -> Result<(), StorageError>;
}

/// A file on disk, mirrored in a line buffer while connected
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    mirror: Option<LineBuffer>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            mirror: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_connected(&self) -> bool {
        self.mirror.is_some()
    }
}

impl Storage for FileStorage {
    fn connect(&mut self) -> Result<String, StorageError> {
        let text = std::fs::read_to_string(&self.path).map_err(|source| StorageError::Read {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), len = text.len(), "connected file storage");
        self.mirror = Some(LineBuffer::new(text.clone()));
        Ok(text)
    }

    fn commit(&mut self, text: &str) -> Result<(), StorageError> {
        let mirror = self.mirror.as_mut().ok_or(StorageError::NotConnected)?;
        *mirror = LineBuffer::new(text);
        std::fs::write(&self.path, mirror.get()).map_err(|source| StorageError::Write {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), len = text.len(), "committed file storage");
        Ok(())
    }

    fn disconnect(&mut self) -> Result<(), StorageError> {
        self.mirror = None;
        Ok(())
    }
}

/// In-memory storage; clones share the same content
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    content: Rc<RefCell<String>>,
    connected: bool,
}

impl MemoryStorage {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            content: Rc::new(RefCell::new(text.into())),
            connected: false,
        }
    }

    /// The last committed content
    pub fn content(&self) -> String {
        self.content.borrow().clone()
    }
}

impl Storage for MemoryStorage {
    fn connect(&mut self) -> Result<String, StorageError> {
        self.connected = true;
        Ok(self.content())
    }

    fn commit(&mut self, text: &str) -> Result<(), StorageError> {
        if !self.connected {
            return Err(StorageError::NotConnected);
        }
        *self.content.borrow_mut() = text.to_string();
        Ok(())
    }

    fn disconnect(&mut self) -> Result<(), StorageError> {
        self.connected = false;
        Ok(())
    }
}
