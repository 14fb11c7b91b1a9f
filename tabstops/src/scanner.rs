//! Locates convertible runs inside leading indentation.
//!
//! [`IndentScanner`] walks a [`TextBuffer`] forward from the start, yielding
//! the ranges of every non-overlapping occurrence of a pattern whose line
//! prefix up to the match is whitespace only. Occurrences after code on the
//! same line are skipped, and the scan still moves past them.
//!
//! The scanner's only state is its position and whether the current line has
//! left its indentation, so a fresh scanner over the same text always yields
//! the same sequence.

use crate::buffer::TextBuffer;
use std::ops::Range;

/// The tab pattern scanned for tabs -> spaces.
pub const TAB: &str = "\t";

/// Space run equivalent to one tab at `tabstop`.
pub fn space_run(tabstop: usize) -> String {
    " ".repeat(tabstop)
}

/// Lazy forward scan for a pattern within leading indentation.
#[derive(Clone)]
pub struct IndentScanner<'a, B: TextBuffer + ?Sized> {
    buffer: &'a B,
    pattern: &'a str,
    cursor: usize,
    /// Offset up to which the current line has been classified.
    checked: usize,
    /// Non-whitespace was seen on the current line before `checked`.
    past_indent: bool,
}

impl<'a, B: TextBuffer + ?Sized> IndentScanner<'a, B> {
    pub fn new(buffer: &'a B, pattern: &'a str) -> Self {
        Self {
            buffer,
            pattern,
            cursor: 0,
            checked: 0,
            past_indent: false,
        }
    }

    /// Extend the line classification to `offset`. Each byte is examined once
    /// per scan, so long lines full of inline matches stay linear.
    fn classify(&mut self, offset: usize) {
        let buffer = self.buffer;
        let segment = buffer.text(self.checked..offset);
        let line = match segment.rfind('\n') {
            Some(newline) => {
                self.past_indent = false;
                &segment[newline + 1..]
            }
            None => &segment[..],
        };
        if !self.past_indent {
            self.past_indent = !line.chars().all(char::is_whitespace);
        }
        self.checked = offset;
    }
}

impl<B: TextBuffer + ?Sized> Iterator for IndentScanner<'_, B> {
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Range<usize>> {
        if self.pattern.is_empty() {
            return None;
        }
        loop {
            let found = self.buffer.find(self.pattern, self.cursor)?;
            self.classify(found.start);
            let leading = !self.past_indent;

            // Always advance past the match so skipped occurrences make progress.
            self.classify(found.end);
            self.cursor = found.end;
            if leading {
                return Some(found);
            }
        }
    }
}

/// Whether any leading occurrence of `pattern` exists.
pub fn contains_leading<B: TextBuffer + ?Sized>(buffer: &B, pattern: &str) -> bool {
    IndentScanner::new(buffer, pattern).next().is_some()
}
