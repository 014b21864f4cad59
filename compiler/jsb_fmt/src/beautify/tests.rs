#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]

use jsb_lexer::{lex, spawn_tokenizer};
use pretty_assertions::assert_eq;

use super::*;
use crate::{assemble, spawn_line_assembler};

fn first_line(source: &str) -> Line {
    assemble(lex(source.as_bytes()).unwrap())
        .into_iter()
        .next()
        .unwrap()
}

#[test]
fn plain_statement_is_simple() {
    let beautifier = LineBeautifier::from_config(&FormatConfig::default());
    assert!(beautifier.is_simple(&first_line("a = b(c, d);")));
}

#[test]
fn loop_headers_are_complex() {
    let beautifier = LineBeautifier::from_config(&FormatConfig::default());
    assert!(!beautifier.is_simple(&first_line("for (;;) {}")));
    assert!(!beautifier.is_simple(&first_line("while (x) {}")));
    assert!(beautifier.is_simple(&first_line("if (x) {}")));
}

#[test]
fn long_lines_are_complex() {
    let config = FormatConfig::default().with_complex_line_len(10);
    let beautifier = LineBeautifier::from_config(&config);
    assert!(beautifier.is_simple(&first_line("abc = 1;")));
    assert!(!beautifier.is_simple(&first_line("abcdefgh = 1;")));
}

#[test]
fn dense_lines_are_complex() {
    let beautifier = LineBeautifier::from_config(&FormatConfig::default());
    // Three marks: at the threshold.
    assert!(beautifier.is_simple(&first_line("f(a, b) && c ? d : e;")));
    // Four marks: over it.
    assert!(!beautifier.is_simple(&first_line("f(a, b, c) && d ? e : g;")));
}

#[test]
fn beautify_keeps_lines_and_counts() {
    let mut beautifier = LineBeautifier::from_config(&FormatConfig::default());
    for line in assemble(lex(b"for (;;) {\nx;\n}").unwrap()) {
        let text = line.text();
        assert_eq!(beautifier.beautify(line).text(), text);
    }
    assert_eq!(beautifier.complex_count(), 1);
    assert_eq!(beautifier.simple_count(), 2);
}

#[test]
fn stage_passes_lines_through_in_order() {
    let config = FormatConfig::default().with_queue_limit(Some(1));
    let tokens = spawn_tokenizer(&b"a;\nwhile (b) c;\nd;"[..], 128, Some(4)).unwrap();
    let lines = spawn_line_assembler(tokens, Some(1)).unwrap();
    let mut stage = spawn_beautifier(lines, &config).unwrap();
    let texts: Vec<String> = stage.by_ref().map(|l| l.text()).collect();
    assert_eq!(texts, vec!["a;", "while (b)", "c;", "d;"]);
    assert_eq!(stage.finish(), Ok(()));
}
