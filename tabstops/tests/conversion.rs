//! Text-level conversion behaviour over `String` buffers.

use tabstops::{
    convert::{collapse_leading_spaces, expand_leading_tabs},
    policy::toggle_direction,
    Direction,
};

const SAMPLES: &[&str] = &[
    "",
    "foo\n",
    "\tfoo\n",
    "\t\tfoo\n\tbar\n\n\tbaz",
    "fn main() {\n\tlet x = 1;\t// one\n\tif x {\n\t\treturn;\n\t}\n}\n",
    "\tfoo\r\n\tbar\r\n",
    "\t\n\t\t\n",
];

fn expanded(text: &str, tabstop: usize) -> String {
    let mut buffer = text.to_string();
    expand_leading_tabs(&mut buffer, tabstop).unwrap();
    buffer
}

fn collapsed(text: &str, tabstop: usize) -> String {
    let mut buffer = text.to_string();
    collapse_leading_spaces(&mut buffer, tabstop).unwrap();
    buffer
}

#[test]
fn expansion_is_idempotent() {
    for tabstop in [1, 2, 4, 8] {
        for sample in SAMPLES {
            let mut once = expanded(sample, tabstop);
            let again = expand_leading_tabs(&mut once, tabstop).unwrap();
            assert_eq!(again, 0, "{sample:?} at tabstop {tabstop}");
        }
    }
}

#[test]
fn collapse_restores_tab_indented_text() {
    for tabstop in [2, 4, 8] {
        for sample in SAMPLES {
            let round_trip = collapsed(&expanded(sample, tabstop), tabstop);
            assert_eq!(&round_trip, sample, "tabstop {tabstop}");
        }
    }
}

#[test]
fn inline_whitespace_is_preserved() {
    let text = "\tlet x = 1;\t// one\n\tcall(a,    b);\n";

    let spaces = expanded(text, 4);
    assert_eq!(spaces, "    let x = 1;\t// one\n    call(a,    b);\n");

    let tabs = collapsed(&spaces, 4);
    assert_eq!(tabs, text);
}

#[test]
fn mixed_indentation_expands_every_leading_tab() {
    assert_eq!(expanded("  \tfoo\n", 4), "      foo\n");
    assert_eq!(collapsed("      foo\n", 4), "\t  foo\n");
}

#[test]
fn partial_runs_are_left_alone() {
    let mut buffer = "   foo\n  bar\n".to_string();
    let count = collapse_leading_spaces(&mut buffer, 4).unwrap();
    assert_eq!(count, 0);
    assert_eq!(buffer, "   foo\n  bar\n");
}

#[test]
fn counts_every_replacement() {
    let mut buffer = "\t\tfoo\n\tbar\nbaz\t\n".to_string();
    assert_eq!(expand_leading_tabs(&mut buffer, 2).unwrap(), 3);
    assert_eq!(collapse_leading_spaces(&mut buffer, 2).unwrap(), 3);
    assert_eq!(buffer, "\t\tfoo\n\tbar\nbaz\t\n");
}

#[test]
fn toggle_prefers_tabs() {
    let direction = |text: &str| toggle_direction(&text.to_string(), 4);
    assert_eq!(direction("\tfoo\n    bar\n"), Some(Direction::ToSpaces));
    assert_eq!(direction("    bar\n"), Some(Direction::ToTabs));
    assert_eq!(direction("foo\tbar    baz\n"), None);
}
