//! Editable, line-aware text buffers.
//!
//! [`TextBuffer`] is the narrow interface the edit engine needs from whatever
//! holds the text. [`LineBuffer`] is the in-memory implementation used for
//! private working copies and detached contexts.

use super::line_index::LineIndex;
use thiserror::Error;

/// Failures raised by buffer access
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    #[error("can not access offset:{offset} length:{length} (buffer length is {len})")]
    OutOfRange {
        offset: usize,
        length: usize,
        len: usize,
    },

    #[error("offset {offset} is not on a character boundary")]
    NotCharBoundary { offset: usize },

    #[error("line {line} does not exist (buffer has {count} lines)")]
    LineOutOfRange { line: usize, count: usize },
}

/// A text document addressed by byte offsets
pub trait TextBuffer {
    /// The complete text
    fn get(&self) -> &str;

    /// The text in `[offset, offset + length)`
    fn get_range(&self, offset: usize, length: usize) -> Result<&str, BufferError>;

    /// Replace `[offset, offset + length)` with `text`
    fn replace(&mut self, offset: usize, length: usize, text: &str) -> Result<(), BufferError>;

    /// The line containing `offset`
    fn line_of_offset(&self, offset: usize) -> Result<usize, BufferError>;

    /// The delimiter ending `line`, or `None` for the last line
    fn line_delimiter(&self, line: usize) -> Result<Option<&'static str>, BufferError>;

    fn len(&self) -> usize {
        self.get().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replace the whole content
    fn set(&mut self, text: &str) -> Result<(), BufferError> {
        let len = self.len();
        self.replace(0, len, text)
    }
}

/// A `String` with a line index kept in step with every edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineBuffer {
    text: String,
    lines: LineIndex,
}

impl LineBuffer {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let lines = LineIndex::new(&text);
        Self { text, lines }
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.lines
    }

    pub fn into_string(self) -> String {
        self.text
    }

    fn check_range(&self, offset: usize, length: usize) -> Result<(), BufferError> {
        let out_of_range = BufferError::OutOfRange {
            offset,
            length,
            len: self.text.len(),
        };
        let end = offset.checked_add(length).ok_or(out_of_range.clone())?;
        if end > self.text.len() {
            return Err(out_of_range);
        }
        for at in [offset, end] {
            if !self.text.is_char_boundary(at) {
                return Err(BufferError::NotCharBoundary { offset: at });
            }
        }
        Ok(())
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl From<&str> for LineBuffer {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl TextBuffer for LineBuffer {
    fn get(&self) -> &str {
        &self.text
    }

    fn get_range(&self, offset: usize, length: usize) -> Result<&str, BufferError> {
        self.check_range(offset, length)?;
        Ok(&self.text[offset..offset + length])
    }

    fn replace(&mut self, offset: usize, length: usize, text: &str) -> Result<(), BufferError> {
        self.check_range(offset, length)?;
        self.text.replace_range(offset..offset + length, text);
        self.lines = LineIndex::new(&self.text);
        Ok(())
    }

    fn line_of_offset(&self, offset: usize) -> Result<usize, BufferError> {
        self.lines.line_of_offset(offset).ok_or(BufferError::OutOfRange {
            offset,
            length: 0,
            len: self.text.len(),
        })
    }

    fn line_delimiter(&self, line: usize) -> Result<Option<&'static str>, BufferError> {
        if line >= self.lines.line_count() {
            return Err(BufferError::LineOutOfRange {
                line,
                count: self.lines.line_count(),
            });
        }
        Ok(self.lines.line_ending(line).map(|ending| ending.as_str()))
    }
}
