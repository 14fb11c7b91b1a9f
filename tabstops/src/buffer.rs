//! Text access primitives the conversion engine needs from an editor buffer.
//!
//! [`TextBuffer`] is the narrow slice of a host text buffer that scanning and
//! rewriting touch: forward search, line-start lookup, slicing and range
//! replacement. Offsets are byte offsets into UTF-8 text.
//!
//! [`String`] implements [`TextBuffer`] directly so the CLI and tests can run
//! conversions without an editor.

use std::{borrow::Cow, fmt, ops::Range};
use thiserror::Error;

/// Stable identity of an editor buffer.
///
/// Cloned views of the same document share one [`BufferId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(pub u64);

impl fmt::Display for BufferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "buffer#{}", self.0)
    }
}

/// Errors raised by buffer edit primitives.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EditError {
    /// Range extends past the end of the buffer
    #[error("Range {start}..{end} out of bounds for buffer of length {len}")]
    OutOfBounds { start: usize, end: usize, len: usize },

    /// Range does not fall on UTF-8 character boundaries
    #[error("Range {start}..{end} is not on a character boundary")]
    NotCharBoundary { start: usize, end: usize },

    /// Buffer no longer exists in the host
    #[error("Buffer not found: {0}")]
    BufferNotFound(BufferId),

    /// Host rejected the edit
    #[error("Host edit failed: {0}")]
    Host(String),
}

/// Read/replace access to buffer text.
pub trait TextBuffer {
    /// Length of the buffer in bytes.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Find the next literal occurrence of `pattern` at or after `from`.
    fn find(&self, pattern: &str, from: usize) -> Option<Range<usize>>;

    /// Text in `range`.
    fn text(&self, range: Range<usize>) -> Cow<'_, str>;

    /// Replace `range` with `text`.
    fn replace(&mut self, range: Range<usize>, text: &str) -> Result<(), EditError>;
}

impl TextBuffer for String {
    fn len(&self) -> usize {
        self.as_str().len()
    }

    fn find(&self, pattern: &str, from: usize) -> Option<Range<usize>> {
        if pattern.is_empty() || from > self.as_str().len() {
            return None;
        }
        let haystack = self.get(from..)?;
        let start = from + haystack.find(pattern)?;
        Some(start..start + pattern.len())
    }

    fn text(&self, range: Range<usize>) -> Cow<'_, str> {
        Cow::Borrowed(self.get(range).unwrap_or_default())
    }

    fn replace(&mut self, range: Range<usize>, text: &str) -> Result<(), EditError> {
        let len = self.as_str().len();
        if range.start > range.end || range.end > len {
            return Err(EditError::OutOfBounds {
                start: range.start,
                end: range.end,
                len,
            });
        }
        if !self.is_char_boundary(range.start) || !self.is_char_boundary(range.end) {
            return Err(EditError::NotCharBoundary {
                start: range.start,
                end: range.end,
            });
        }
        self.replace_range(range, text);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_searches_forward_from_offset() {
        let text = String::from("a\tb\tc");
        assert_eq!(TextBuffer::find(&text, "\t", 0), Some(1..2));
        assert_eq!(TextBuffer::find(&text, "\t", 2), Some(3..4));
        assert_eq!(TextBuffer::find(&text, "\t", 4), None);
        assert_eq!(TextBuffer::find(&text, "\t", 99), None);
    }

    #[test]
    fn replace_rejects_out_of_bounds() {
        let mut text = String::from("abc");
        let err = TextBuffer::replace(&mut text, 2..5, "x").unwrap_err();
        assert_eq!(
            err,
            EditError::OutOfBounds {
                start: 2,
                end: 5,
                len: 3
            }
        );
        assert_eq!(text, "abc");
    }

    #[test]
    fn replace_rejects_split_characters() {
        let mut text = String::from("é");
        let err = TextBuffer::replace(&mut text, 1..2, "x").unwrap_err();
        assert!(matches!(err, EditError::NotCharBoundary { .. }));
    }

    #[test]
    fn replace_swaps_range() {
        let mut text = String::from("\tfoo");
        TextBuffer::replace(&mut text, 0..1, "    ").unwrap();
        assert_eq!(text, "    foo");
    }
}
