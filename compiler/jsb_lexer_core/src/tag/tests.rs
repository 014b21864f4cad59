use pretty_assertions::assert_eq;

use super::*;

// === Registry ===

#[test]
fn tag_is_one_byte() {
    assert_eq!(std::mem::size_of::<TokenKind>(), 1);
}

#[test]
fn discriminants_follow_table_order() {
    for (i, kind) in TokenKind::ALL.iter().enumerate() {
        assert_eq!(*kind as usize, i);
    }
    assert_eq!(TokenKind::OpenParen as u8, 0);
    assert_eq!(TokenKind::ALL.last(), Some(&TokenKind::Eof));
}

#[test]
fn from_u8_round_trips() {
    for &kind in TokenKind::ALL {
        assert_eq!(TokenKind::from_u8(kind as u8), Some(kind));
    }
    assert_eq!(TokenKind::from_u8(u8::MAX), None);
}

#[test]
fn names_are_unique() {
    let mut names: Vec<_> = TokenKind::ALL.iter().map(|k| k.name()).collect();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), TokenKind::ALL.len());
}

#[test]
fn display_uses_name() {
    assert_eq!(TokenKind::ZeroFillRightShiftAssign.to_string(), "ZERO_FILL_RIGHT_SHIFT_ASSIGN");
    assert_eq!(TokenKind::Eof.to_string(), "EOF");
}

// === Lexemes ===

#[test]
fn fixed_lexemes() {
    assert_eq!(TokenKind::OpenCurly.lexeme(), Some(&b"{"[..]));
    assert_eq!(TokenKind::ZeroFillRightShiftAssign.lexeme(), Some(&b">>>="[..]));
    assert_eq!(TokenKind::Typeof.lexeme(), Some(&b"typeof"[..]));
    assert_eq!(TokenKind::Newline.lexeme(), Some(&b"\n"[..]));
}

#[test]
fn variable_kinds_have_no_lexeme() {
    for kind in [
        TokenKind::Numeric,
        TokenKind::Identifier,
        TokenKind::Regex,
        TokenKind::Space,
        TokenKind::LineComment,
        TokenKind::Error,
        TokenKind::Eof,
    ] {
        assert_eq!(kind.lexeme(), None, "{kind}");
    }
}

#[test]
fn keywords_match_their_lexemes() {
    for &kind in TokenKind::ALL.iter().filter(|k| k.is_keyword()) {
        let lexeme = kind.lexeme().unwrap_or_default();
        assert_eq!(TokenKind::keyword(lexeme), Some(kind));
    }
    assert_eq!(TokenKind::keyword(b"iff"), None);
    assert_eq!(TokenKind::keyword(b"If"), None);
}

// === Predicates ===

#[test]
fn whitespace_is_not_significant() {
    assert!(TokenKind::Space.is_whitespace());
    assert!(TokenKind::CarriageReturn.is_whitespace());
    assert!(!TokenKind::LineComment.is_whitespace());
    assert!(TokenKind::LineComment.is_significant());
}

#[test]
fn only_values_precede_division() {
    assert!(TokenKind::Identifier.produces_value());
    assert!(TokenKind::CloseBracket.produces_value());
    assert!(!TokenKind::Return.produces_value());
    assert!(!TokenKind::Equal.produces_value());
    assert!(!TokenKind::OpenParen.produces_value());
}

#[test]
fn unary_operators_are_not_spaced() {
    assert!(TokenKind::Equal.is_spaced_operator());
    assert!(TokenKind::FatArrow.is_spaced_operator());
    assert!(!TokenKind::Not.is_spaced_operator());
    assert!(!TokenKind::BitwiseNot.is_spaced_operator());
    assert!(!TokenKind::Increment.is_spaced_operator());
    assert!(!TokenKind::Dot.is_spaced_operator());
}

#[test]
fn value_like_kinds() {
    assert!(TokenKind::SingleQuoteString.is_value_like());
    assert!(TokenKind::MultiLineComment.is_value_like());
    assert!(!TokenKind::OpenParen.is_value_like());
    assert!(!TokenKind::Space.is_value_like());
}
