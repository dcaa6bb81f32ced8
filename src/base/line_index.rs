//! Line bookkeeping for text buffers.
//!
//! A [`LineIndex`] records where every line starts and which delimiter ends
//! it. `\n`, `\r\n` and a lone `\r` are all recognised, so a buffer keeps the
//! line endings it was loaded with.

use super::position::{Position, Span};
use text_size::TextRange;

/// A line terminator as found in the source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineEnding {
    Lf,
    CrLf,
    Cr,
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
            Self::Cr => "\r",
        }
    }

    pub fn len(&self) -> usize {
        self.as_str().len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Line {
    start: usize,
    ending: Option<LineEnding>,
}

/// Maps byte offsets to lines and back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    lines: Vec<Line>,
    len: usize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let bytes = text.as_bytes();
        let mut lines = Vec::new();
        let mut start = 0;
        let mut i = 0;
        while i < bytes.len() {
            let ending = match bytes[i] {
                b'\n' => Some(LineEnding::Lf),
                b'\r' if bytes.get(i + 1) == Some(&b'\n') => Some(LineEnding::CrLf),
                b'\r' => Some(LineEnding::Cr),
                _ => None,
            };
            match ending {
                Some(ending) => {
                    lines.push(Line {
                        start,
                        ending: Some(ending),
                    });
                    i += ending.len();
                    start = i;
                }
                None => i += 1,
            }
        }
        // The last line never has a delimiter, and may be empty
        lines.push(Line {
            start,
            ending: None,
        });
        Self {
            lines,
            len: text.len(),
        }
    }

    /// Number of lines; an empty text has one (empty) line
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Length of the indexed text in bytes
    pub fn text_len(&self) -> usize {
        self.len
    }

    /// The line containing `offset`. `offset == len` maps to the last line.
    pub fn line_of_offset(&self, offset: usize) -> Option<usize> {
        if offset > self.len {
            return None;
        }
        Some(self.lines.partition_point(|line| line.start <= offset) - 1)
    }

    pub fn line_start(&self, line: usize) -> Option<usize> {
        self.lines.get(line).map(|l| l.start)
    }

    /// The delimiter terminating `line`, `None` for the last line
    pub fn line_ending(&self, line: usize) -> Option<LineEnding> {
        self.lines.get(line).and_then(|l| l.ending)
    }

    pub fn position(&self, offset: usize) -> Option<Position> {
        let line = self.line_of_offset(offset)?;
        Some(Position::new(line, offset - self.lines[line].start))
    }

    pub fn span(&self, range: TextRange) -> Option<Span> {
        let start = self.position(usize::from(range.start()))?;
        let end = self.position(usize::from(range.end()))?;
        Some(Span::new(start, end))
    }
}
