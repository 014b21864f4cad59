#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]

use jsb_lexer::lex;
use pretty_assertions::assert_eq;

use super::*;

const SOURCE: &[u8] = b"for (;;) {\n  if (a) b = c ? d : e;\n}\n@";

#[test]
fn counts() {
    let stats = TokenStats::collect(&lex(SOURCE).unwrap());
    assert_eq!(stats.lines, 4);
    assert_eq!(stats.chars, SOURCE.len() as u64);
    assert_eq!(stats.loops, 1);
    assert_eq!(stats.ifs, 1);
    assert_eq!(stats.identifiers, 5);
    assert_eq!(stats.ternaries, 1);
    assert_eq!(stats.unknown, 1);
    assert_eq!(stats.count(TokenKind::Semicolon), 3);
    assert_eq!(stats.count(TokenKind::Newline), 3);
    assert_eq!(stats.count(TokenKind::Eof), 1);
    assert_eq!(stats.count(TokenKind::While), 0);
}

#[test]
fn token_total_excludes_eof() {
    let tokens = lex(b"a;").unwrap();
    assert_eq!(TokenStats::collect(&tokens).tokens, tokens.len() - 1);
}

#[test]
fn empty_input() {
    let stats = TokenStats::collect(&lex(b"").unwrap());
    assert_eq!(stats.tokens, 0);
    assert_eq!(stats.lines, 1);
    assert_eq!(stats.chars, 0);
}

#[test]
fn report_lists_histogram_in_kind_order() {
    let mut out = Vec::new();
    TokenStats::collect(&lex(b"x = y;").unwrap())
        .write(&mut out)
        .unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("tokens:      6\n"));
    let histogram: Vec<&str> = text
        .split("\n\n")
        .nth(1)
        .unwrap()
        .lines()
        .map(|l| l.split_whitespace().next().unwrap())
        .collect();
    assert_eq!(
        histogram,
        vec!["SEMICOLON", "EQUAL", "IDENTIFIER", "SPACE", "EOF"]
    );
}
