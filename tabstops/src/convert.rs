//! Rewrites leading indentation between tabs and space runs.
//!
//! The text-level functions ([`expand_leading_tabs`], [`collapse_leading_spaces`])
//! work on any [`TextBuffer`]. The host-level functions ([`tabs_to_spaces`],
//! [`spaces_to_tabs`]) wrap them in a single host edit transaction and apply
//! the side effects a conversion has on a live buffer:
//!
//! - the buffer's [`ConvertedTo`](crate::state::ConvertedTo) is updated
//! - a buffer that was clean before the edit gets a deferred
//!   [`Deferred::EngageScratch`] so the cosmetic edit doesn't read as unsaved work
//! - a failed edit shows a failure notice and the error is returned

use crate::{
    buffer::{BufferId, EditError, TextBuffer},
    host::{Deferred, Host},
    policy::Direction,
    scanner::{self, IndentScanner, TAB},
    state::ConversionState,
};
use std::ops::Range;
use thiserror::Error;

/// Host setting that makes the tab key insert spaces.
pub const TRANSLATE_TABS_TO_SPACES: &str = "translate_tabs_to_spaces";

/// Status message shown when a conversion fails.
pub const FAILURE_NOTICE: &str = "Emacs Tabstops: conversion failed";

#[derive(Debug, Error)]
pub enum ConvertError {
    /// Tabstop of zero columns
    #[error("Tabstop must be a positive integer")]
    ZeroTabstop,

    /// The host rejected or failed the edit
    #[error("Converting {id} failed")]
    Edit {
        id: BufferId,
        #[source]
        source: EditError,
    },
}

/// Replace every leading tab with `tabstop` spaces. Returns the replacement count.
pub fn expand_leading_tabs<B: TextBuffer + ?Sized>(
    buffer: &mut B,
    tabstop: usize,
) -> Result<usize, EditError> {
    rewrite(buffer, TAB, &scanner::space_run(tabstop))
}

/// Replace every leading run of exactly `tabstop` spaces with a tab.
pub fn collapse_leading_spaces<B: TextBuffer + ?Sized>(
    buffer: &mut B,
    tabstop: usize,
) -> Result<usize, EditError> {
    if tabstop == 0 {
        return Ok(0);
    }
    rewrite(buffer, &scanner::space_run(tabstop), TAB)
}

/// Rewrite leading indentation in `direction`. Returns the replacement count.
pub fn rewrite_indentation<B: TextBuffer + ?Sized>(
    buffer: &mut B,
    direction: Direction,
    tabstop: usize,
) -> Result<usize, EditError> {
    match direction {
        Direction::ToSpaces => expand_leading_tabs(buffer, tabstop),
        Direction::ToTabs => collapse_leading_spaces(buffer, tabstop),
    }
}

fn rewrite<B: TextBuffer + ?Sized>(
    buffer: &mut B,
    pattern: &str,
    replacement: &str,
) -> Result<usize, EditError> {
    let matches: Vec<Range<usize>> = IndentScanner::new(&*buffer, pattern).collect();

    // Earlier replacements shift later offsets by the length difference.
    let delta = replacement.len() as isize - pattern.len() as isize;
    let mut shift: isize = 0;
    for found in &matches {
        let start = found.start.saturating_add_signed(shift);
        let end = found.end.saturating_add_signed(shift);
        buffer.replace(start..end, replacement)?;
        shift += delta;
    }

    Ok(matches.len())
}

pub fn tabs_to_spaces<H: Host>(
    host: &mut H,
    id: BufferId,
    tabstop: usize,
) -> Result<usize, ConvertError> {
    convert(host, id, Direction::ToSpaces, tabstop)
}

/// Collapse leading space runs to tabs with the host's tab-to-space
/// translation switched off for the duration.
pub fn spaces_to_tabs<H: Host>(
    host: &mut H,
    id: BufferId,
    tabstop: usize,
) -> Result<usize, ConvertError> {
    convert(host, id, Direction::ToTabs, tabstop)
}

pub fn convert<H: Host>(
    host: &mut H,
    id: BufferId,
    direction: Direction,
    tabstop: usize,
) -> Result<usize, ConvertError> {
    if tabstop == 0 {
        return Err(ConvertError::ZeroTabstop);
    }

    let was_clean = !host.is_dirty(id);
    // Keep the host from re-expanding the tabs being inserted.
    let saved_translate = match direction {
        Direction::ToTabs => {
            let previous = host.setting(id, TRANSLATE_TABS_TO_SPACES);
            host.set_setting(id, TRANSLATE_TABS_TO_SPACES, toml::Value::Boolean(false));
            Some(previous)
        }
        Direction::ToSpaces => None,
    };

    let result = host.transact(id, |buffer| rewrite_indentation(buffer, direction, tabstop));

    match saved_translate {
        Some(Some(value)) => host.set_setting(id, TRANSLATE_TABS_TO_SPACES, value),
        Some(None) => host.erase_setting(id, TRANSLATE_TABS_TO_SPACES),
        None => {}
    }

    let count = match result {
        Ok(count) => count,
        Err(source) => {
            tracing::error!("{direction:?} conversion of {id} failed: {source}");
            host.status_message(id, FAILURE_NOTICE);
            return Err(ConvertError::Edit { id, source });
        }
    };

    tracing::debug!("{direction:?} on {id}: {count} replacements (tabstop {tabstop})");
    if count > 0 {
        ConversionState::update(host, id, |state| {
            state.converted_to = direction.converted_to();
        });
        if was_clean {
            host.schedule(Deferred::EngageScratch(id));
        }
    }

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{state::ConvertedTo, test::TestHost};

    fn expand(text: &str, tabstop: usize) -> (String, usize) {
        let mut buffer = text.to_string();
        let count = expand_leading_tabs(&mut buffer, tabstop).unwrap();
        (buffer, count)
    }

    fn collapse(text: &str, tabstop: usize) -> (String, usize) {
        let mut buffer = text.to_string();
        let count = collapse_leading_spaces(&mut buffer, tabstop).unwrap();
        (buffer, count)
    }

    #[test]
    fn expands_leading_tabs() {
        assert_eq!(
            expand("\tfoo\n\tbar\n", 4),
            ("    foo\n    bar\n".to_string(), 2)
        );
    }

    #[test]
    fn expansion_shifts_later_offsets() {
        let (text, count) = expand("\t\tfoo\n\tbar\tbaz\n", 2);
        insta::assert_debug_snapshot!(text, @r#""    foo\n  bar\tbaz\n""#);
        assert_eq!(count, 3);
    }

    #[test]
    fn expansion_is_idempotent() {
        let (once, _) = expand("\tfoo\n\t\tbar\n", 4);
        let (twice, count) = expand(&once, 4);
        assert_eq!(once, twice);
        assert_eq!(count, 0);
    }

    #[test]
    fn collapses_exact_runs_only() {
        let (text, count) = collapse("        foo\n      bar\n   baz\n", 4);
        insta::assert_debug_snapshot!(text, @r#""\t\tfoo\n\t  bar\n   baz\n""#);
        assert_eq!(count, 3);
    }

    #[test]
    fn inline_whitespace_is_untouched() {
        let line = "x = 1\t# trailing tab";
        assert_eq!(expand(line, 4), (line.to_string(), 0));

        let line = "x =    1";
        assert_eq!(collapse(line, 4), (line.to_string(), 0));
    }

    #[test]
    fn round_trip_restores_tabs() {
        let original = "\tfoo\n\t\tbar\nbaz\tqux\n";
        let (spaces, _) = expand(original, 4);
        let (tabs, _) = collapse(&spaces, 4);
        assert_eq!(tabs, original);
    }

    #[test]
    fn rewrite_follows_direction() {
        let mut buffer = "\tfoo\n".to_string();
        assert_eq!(rewrite_indentation(&mut buffer, Direction::ToSpaces, 2).unwrap(), 1);
        assert_eq!(buffer, "  foo\n");
        assert_eq!(rewrite_indentation(&mut buffer, Direction::ToTabs, 2).unwrap(), 1);
        assert_eq!(buffer, "\tfoo\n");
    }

    #[test]
    fn zero_tabstop_collapse_is_noop() {
        assert_eq!(collapse("    foo", 0), ("    foo".to_string(), 0));
    }

    #[test]
    fn host_conversion_records_direction() {
        let mut host = TestHost::new();
        let id = host.create("\tfoo\n\tbar\n", None);

        let count = tabs_to_spaces(&mut host, id, 4).unwrap();
        assert_eq!(count, 2);
        assert_eq!(host.text(id), "    foo\n    bar\n");
        assert_eq!(
            ConversionState::load(&host, id).converted_to,
            ConvertedTo::Spaces
        );
    }

    #[test]
    fn clean_buffer_schedules_scratch() {
        let mut host = TestHost::new();
        let id = host.create("\tfoo\n", None);

        tabs_to_spaces(&mut host, id, 4).unwrap();
        assert_eq!(host.deferred(), vec![Deferred::EngageScratch(id)]);
    }

    #[test]
    fn dirty_buffer_does_not_schedule_scratch() {
        let mut host = TestHost::new();
        let id = host.create("    foo\n", None);
        host.mark_dirty(id);

        spaces_to_tabs(&mut host, id, 4).unwrap();
        assert!(host.deferred().is_empty());
    }

    #[test]
    fn no_replacements_leave_state_alone() {
        let mut host = TestHost::new();
        let id = host.create("foo\n", None);

        assert_eq!(tabs_to_spaces(&mut host, id, 4).unwrap(), 0);
        assert_eq!(ConversionState::load(&host, id), ConversionState::default());
        assert!(host.deferred().is_empty());
    }

    #[test]
    fn translate_setting_is_restored() {
        let mut host = TestHost::new();
        let id = host.create("    foo\n", None);
        host.set_setting(id, TRANSLATE_TABS_TO_SPACES, toml::Value::Boolean(true));

        spaces_to_tabs(&mut host, id, 4).unwrap();
        assert_eq!(host.text(id), "\tfoo\n");
        assert_eq!(
            host.setting(id, TRANSLATE_TABS_TO_SPACES),
            Some(toml::Value::Boolean(true))
        );
        assert_eq!(host.translate_during_last_edit(), Some(false));
    }

    #[test]
    fn absent_translate_setting_stays_absent() {
        let mut host = TestHost::new();
        let id = host.create("    foo\n", None);

        spaces_to_tabs(&mut host, id, 4).unwrap();
        assert_eq!(host.setting(id, TRANSLATE_TABS_TO_SPACES), None);
    }

    #[test]
    fn failed_edit_notifies_and_propagates() {
        let mut host = TestHost::new();
        let id = host.create("\tfoo\n", None);
        host.fail_next_edit();

        let err = tabs_to_spaces(&mut host, id, 4).unwrap_err();
        assert!(matches!(err, ConvertError::Edit { .. }));
        assert_eq!(host.text(id), "\tfoo\n");
        assert_eq!(host.messages(), [(id, FAILURE_NOTICE.to_string())]);
        assert_eq!(ConversionState::load(&host, id), ConversionState::default());
    }

    #[test]
    fn zero_tabstop_is_rejected() {
        let mut host = TestHost::new();
        let id = host.create("\tfoo\n", None);
        assert!(matches!(
            tabs_to_spaces(&mut host, id, 0),
            Err(ConvertError::ZeroTabstop)
        ));
    }
}
