//! Decisions about when and which way to convert. No side effects.

use crate::{
    buffer::TextBuffer,
    config::{BufferConfig, ConvertOnSave},
    scanner::{self, TAB},
    state::{ConversionState, ConvertedTo},
};

/// Which way a conversion rewrites leading indentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Expand leading tabs into `tabstop` spaces.
    ToSpaces,
    /// Collapse leading `tabstop`-space runs into tabs.
    ToTabs,
}

impl Direction {
    pub fn converted_to(self) -> ConvertedTo {
        match self {
            Direction::ToSpaces => ConvertedTo::Spaces,
            Direction::ToTabs => ConvertedTo::Tabs,
        }
    }
}

pub fn should_convert_on_load(config: &BufferConfig) -> bool {
    config.convert_on_load
}

pub fn should_convert_on_save(config: &BufferConfig, state: &ConversionState) -> bool {
    match config.convert_on_save {
        ConvertOnSave::Always => true,
        ConvertOnSave::Auto => state.converted_to == ConvertedTo::Spaces,
        ConvertOnSave::Never => false,
    }
}

/// Whether `syntax` names one of the configured skip filetypes.
///
/// Matching is case-insensitive and by containment, so a host syntax path such
/// as `Packages/Python/Python.sublime-syntax` matches `Python`.
pub fn is_skipped_syntax(syntax: &str, config: &BufferConfig) -> bool {
    let syntax = syntax.to_lowercase();
    config
        .skip_filetypes
        .iter()
        .filter(|entry| !entry.is_empty())
        .any(|entry| syntax.contains(&entry.to_lowercase()))
}

/// Direction a toggle would take for this text, or `None` when there is nothing
/// to convert.
pub fn toggle_direction<B: TextBuffer + ?Sized>(buffer: &B, tabstop: usize) -> Option<Direction> {
    if scanner::contains_leading(buffer, TAB) {
        return Some(Direction::ToSpaces);
    }
    if tabstop > 0 && scanner::contains_leading(buffer, &scanner::space_run(tabstop)) {
        return Some(Direction::ToTabs);
    }
    None
}
