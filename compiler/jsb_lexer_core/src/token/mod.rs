//! Scanned tokens.
//!
//! A [`Token`] is immutable once built. Its bytes live in a [`TokenValue`],
//! which records who owns them: a heap buffer copied out of the source, a
//! shared static lexeme, or a synthetic filler the line assembler inserted.

use std::borrow::Cow;
use std::fmt;

use crate::TokenKind;

/// Storage for a token's bytes.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum TokenValue {
    /// Bytes copied from the source.
    Owned(Box<[u8]>),
    /// A fixed lexeme shared by every token of the kind.
    Static(&'static [u8]),
    /// Filler with no source position (inserted spacing).
    Synthetic(&'static [u8]),
}

impl TokenValue {
    /// The bytes, whichever variant holds them.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Owned(bytes) => bytes,
            Self::Static(bytes) | Self::Synthetic(bytes) => bytes,
        }
    }
}

/// A classified, byte-exact lexical unit.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Token {
    kind: TokenKind,
    value: TokenValue,
    offset: u64,
}

impl Token {
    /// Token whose bytes were read from the source starting at `offset`.
    pub fn owned(kind: TokenKind, bytes: Vec<u8>, offset: u64) -> Self {
        Self {
            kind,
            value: TokenValue::Owned(bytes.into_boxed_slice()),
            offset,
        }
    }

    /// Token for a fixed-spelling kind; shares the kind's static lexeme.
    ///
    /// Kinds without a fixed lexeme get an empty value.
    pub fn fixed(kind: TokenKind, offset: u64) -> Self {
        Self {
            kind,
            value: TokenValue::Static(kind.lexeme().unwrap_or_default()),
            offset,
        }
    }

    /// Inserted single space.
    pub fn synthetic_space() -> Self {
        Self {
            kind: TokenKind::Space,
            value: TokenValue::Synthetic(b" "),
            offset: 0,
        }
    }

    /// Inserted line break.
    pub fn synthetic_newline() -> Self {
        Self {
            kind: TokenKind::Newline,
            value: TokenValue::Synthetic(b"\n"),
            offset: 0,
        }
    }

    /// End-of-input marker at the final source offset.
    pub fn eof(offset: u64) -> Self {
        Self {
            kind: TokenKind::Eof,
            value: TokenValue::Static(b""),
            offset,
        }
    }

    /// Replace the value with new owned bytes, keeping kind and offset.
    #[must_use]
    pub fn with_value(self, bytes: Vec<u8>) -> Self {
        Self {
            value: TokenValue::Owned(bytes.into_boxed_slice()),
            ..self
        }
    }

    /// Token kind.
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// The value, with its ownership variant.
    pub fn value(&self) -> &TokenValue {
        &self.value
    }

    /// Raw value bytes, exactly as emitted.
    pub fn bytes(&self) -> &[u8] {
        self.value.as_bytes()
    }

    /// Length of the value in bytes.
    pub fn len(&self) -> usize {
        self.bytes().len()
    }

    /// Whether the value has no bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes().is_empty()
    }

    /// Source offset of the first byte; `None` for synthetic tokens.
    pub fn offset(&self) -> Option<u64> {
        match self.value {
            TokenValue::Synthetic(_) => None,
            _ => Some(self.offset),
        }
    }

    /// Whether the token was inserted for formatting.
    pub fn is_synthetic(&self) -> bool {
        matches!(self.value, TokenValue::Synthetic(_))
    }

    /// Whether the value is heap-owned.
    pub fn is_owned(&self) -> bool {
        matches!(self.value, TokenValue::Owned(_))
    }

    /// Value as text, replacing invalid UTF-8.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.bytes())
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.offset() {
            Some(offset) => write!(f, "{}@{} {:?}", self.kind, offset, self.text()),
            None => write!(f, "{}@synthetic {:?}", self.kind, self.text()),
        }
    }
}

#[cfg(test)]
mod tests;
