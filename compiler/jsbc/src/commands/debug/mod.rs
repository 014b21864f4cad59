//! Token introspection: `tokens`, `unknown` and `kinds`.

use std::borrow::Cow;
use std::io::{self, Write};

use jsb_lexer_core::{Token, TokenKind};

/// Cap on how many unknown bytes `jsb unknown` lists.
pub const MAX_UNKNOWN_REPORTED: usize = 30;

/// One row per token: index, line, offset, length, kind and value.
pub fn write_tokens(tokens: &[Token], out: &mut impl Write) -> io::Result<()> {
    let mut line = 1u64;
    let mut eof_offset = 0;
    for (index, token) in tokens.iter().enumerate() {
        let offset = token.offset().unwrap_or_default();
        write!(
            out,
            "{index:>6} {line:>5} {offset:>8} {len:>4} {kind:<28} {value}",
            len = token.len(),
            kind = token.kind().name(),
            value = printable(token),
        )?;
        if token.kind() == TokenKind::Error {
            write!(out, " -> ERROR")?;
        }
        writeln!(out)?;
        match token.kind() {
            TokenKind::Newline => line += 1,
            TokenKind::Eof => eof_offset = offset,
            _ => {}
        }
    }
    writeln!(out, "lines: {line}, EOF at byte {eof_offset}")
}

fn printable(token: &Token) -> Cow<'_, str> {
    match token.kind() {
        TokenKind::Space => Cow::Borrowed("<<space>>"),
        TokenKind::Tab => Cow::Borrowed("\\t"),
        TokenKind::Newline => Cow::Borrowed("\\n"),
        TokenKind::CarriageReturn => Cow::Borrowed("\\r"),
        TokenKind::Eof => Cow::Borrowed("EOF"),
        TokenKind::Error => Cow::Owned(format!("0x{:02x}", first_byte(token))),
        _ => token.text(),
    }
}

fn first_byte(token: &Token) -> u8 {
    token.bytes().first().copied().unwrap_or_default()
}

/// List unknown bytes with their offsets, at most [`MAX_UNKNOWN_REPORTED`].
pub fn write_unknown(tokens: &[Token], out: &mut impl Write) -> io::Result<()> {
    let unknown: Vec<&Token> = tokens
        .iter()
        .filter(|t| t.kind() == TokenKind::Error)
        .collect();
    for token in unknown.iter().take(MAX_UNKNOWN_REPORTED) {
        writeln!(
            out,
            "offset {:>8}: 0x{:02x}",
            token.offset().unwrap_or_default(),
            first_byte(token)
        )?;
    }
    if unknown.len() > MAX_UNKNOWN_REPORTED {
        writeln!(out, "... and {} more", unknown.len() - MAX_UNKNOWN_REPORTED)?;
    }
    writeln!(out, "{} unknown byte(s)", unknown.len())
}

/// Every token kind's numeric id and name.
pub fn write_kinds(out: &mut impl Write) -> io::Result<()> {
    for &kind in TokenKind::ALL {
        writeln!(out, "{:>3} {}", kind as u8, kind.name())?;
    }
    Ok(())
}
