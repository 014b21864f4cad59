use pretty_assertions::assert_eq;

use super::*;

#[test]
fn owned_token_keeps_bytes_and_offset() {
    let tok = Token::owned(TokenKind::Identifier, b"foo".to_vec(), 7);
    assert_eq!(tok.kind(), TokenKind::Identifier);
    assert_eq!(tok.bytes(), b"foo");
    assert_eq!(tok.len(), 3);
    assert_eq!(tok.offset(), Some(7));
    assert!(tok.is_owned());
    assert!(!tok.is_synthetic());
}

#[test]
fn fixed_token_shares_lexeme() {
    let tok = Token::fixed(TokenKind::BitshiftLeftAssign, 3);
    assert_eq!(tok.bytes(), b"<<=");
    assert!(matches!(tok.value(), TokenValue::Static(_)));
    assert!(!tok.is_owned());
}

#[test]
fn fixed_without_lexeme_is_empty() {
    let tok = Token::fixed(TokenKind::Identifier, 0);
    assert!(tok.is_empty());
}

#[test]
fn synthetic_tokens_have_no_offset() {
    let space = Token::synthetic_space();
    assert_eq!(space.kind(), TokenKind::Space);
    assert_eq!(space.bytes(), b" ");
    assert_eq!(space.offset(), None);
    assert!(space.is_synthetic());

    let newline = Token::synthetic_newline();
    assert_eq!(newline.kind(), TokenKind::Newline);
    assert_eq!(newline.offset(), None);
}

#[test]
fn eof_is_empty_at_offset() {
    let tok = Token::eof(42);
    assert_eq!(tok.kind(), TokenKind::Eof);
    assert!(tok.is_empty());
    assert_eq!(tok.offset(), Some(42));
}

#[test]
fn with_value_replaces_bytes_only() {
    let tok = Token::owned(TokenKind::SingleQuoteString, b"'aGk='".to_vec(), 10)
        .with_value(b"btoa('hi')".to_vec());
    assert_eq!(tok.kind(), TokenKind::SingleQuoteString);
    assert_eq!(tok.offset(), Some(10));
    assert_eq!(tok.bytes(), b"btoa('hi')");
}

#[test]
fn debug_shows_kind_offset_and_text() {
    let tok = Token::owned(TokenKind::Numeric, b"12".to_vec(), 4);
    assert_eq!(format!("{tok:?}"), "NUMERIC@4 \"12\"");
    assert_eq!(
        format!("{:?}", Token::synthetic_space()),
        "SPACE@synthetic \" \""
    );
}
