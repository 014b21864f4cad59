//! Single-token scanner over a [`ByteCache`].
//!
//! [`scan_token`] reads exactly one token and leaves the cache positioned at
//! the first byte it did not use. Multi-byte operators are resolved greedily
//! with [`ByteCache::match_literal`]; every other construct reads ahead one
//! byte and steps back when that byte belongs to the next token.
//!
//! The scanner is heuristic by nature. It never fails on malformed input:
//! unterminated strings, comments and regexes end at end of input (regexes
//! also at a raw newline), and unknown bytes become [`TokenKind::Error`]
//! tokens. Only cache failures (I/O or a broken backtrack) are errors.

use std::io::Read;

use thiserror::Error;

use crate::{ByteCache, CacheError, Token, TokenKind};

/// A cache failure while scanning the token that starts at `offset`.
#[derive(Debug, Error)]
#[error("scan failed at byte {offset}")]
pub struct ScanError {
    pub offset: u64,
    #[source]
    pub source: CacheError,
}

/// Suffixes probed after an operator's first byte, longest first.
type OperatorTable = &'static [(&'static [u8], TokenKind)];

const EQUAL: OperatorTable = &[
    (b"==", TokenKind::EqualEqualEqual),
    (b"=", TokenKind::EqualEqual),
    (b">", TokenKind::FatArrow),
];
const NOT: OperatorTable = &[
    (b"==", TokenKind::NotEqualEqual),
    (b"=", TokenKind::NotEqual),
];
const ADD: OperatorTable = &[
    (b"+", TokenKind::Increment),
    (b"=", TokenKind::PlusEqual),
];
const SUBTRACT: OperatorTable = &[
    (b"-", TokenKind::Decrement),
    (b"=", TokenKind::MinusEqual),
];
const MULTIPLY: OperatorTable = &[
    (b"*=", TokenKind::ExponentAssign),
    (b"*", TokenKind::Exponent),
    (b"=", TokenKind::MultiplyAssign),
];
const MOD: OperatorTable = &[(b"=", TokenKind::ModEqual)];
const AND: OperatorTable = &[
    (b"&", TokenKind::LogicalAnd),
    (b"=", TokenKind::BitwiseAndAssign),
];
const OR: OperatorTable = &[
    (b"|", TokenKind::LogicalOr),
    (b"=", TokenKind::BitwiseOrAssign),
];
const XOR: OperatorTable = &[(b"=", TokenKind::BitwiseXorAssign)];
const QUESTION: OperatorTable = &[(b"?", TokenKind::NullCoalescing)];
const LESS: OperatorTable = &[
    (b"<=", TokenKind::BitshiftLeftAssign),
    (b"<", TokenKind::BitshiftLeft),
    (b"=", TokenKind::LessThanOrEqual),
];
const GREATER: OperatorTable = &[
    (b">>=", TokenKind::ZeroFillRightShiftAssign),
    (b">>", TokenKind::ZeroFillRightShift),
    (b">=", TokenKind::BitshiftRightAssign),
    (b">", TokenKind::SignedBitshiftRight),
    (b"=", TokenKind::GreaterThanOrEqual),
];

/// Scan one token.
///
/// `prev` is the kind of the previous significant token, which decides
/// whether `/` starts a regex. At end of input an [`TokenKind::Eof`] token
/// with an empty value is returned (and keeps being returned).
pub fn scan_token<R: Read>(
    cache: &mut ByteCache<R>,
    prev: Option<TokenKind>,
) -> Result<Token, ScanError> {
    let offset = cache.charnum();
    let mut lexer = Lexer {
        cache,
        start: offset,
    };
    lexer
        .next_token(prev)
        .map_err(|source| ScanError { offset, source })
}

/// Per-call scanning state: the cache and where the token started.
struct Lexer<'c, R> {
    cache: &'c mut ByteCache<R>,
    start: u64,
}

impl<R: Read> Lexer<'_, R> {
    fn next_token(&mut self, prev: Option<TokenKind>) -> Result<Token, CacheError> {
        let Some(b) = self.cache.getc()? else {
            return Ok(Token::eof(self.start));
        };
        match b {
            b'a'..=b'z' | b'A'..=b'Z' | b'_' | b'$' => self.identifier(b),
            b'0'..=b'9' => self.number(b),
            b'.' => self.dot(),
            b' ' | b'\t' => self.blank_run(b),
            b'\n' => Ok(self.fixed(TokenKind::Newline)),
            b'\r' => Ok(self.fixed(TokenKind::CarriageReturn)),
            b'"' => self.string(b, TokenKind::DoubleQuoteString),
            b'\'' => self.string(b, TokenKind::SingleQuoteString),
            b'`' => self.string(b, TokenKind::TemplateString),
            b'/' => self.slash(prev),
            b'(' => Ok(self.fixed(TokenKind::OpenParen)),
            b')' => Ok(self.fixed(TokenKind::CloseParen)),
            b'[' => Ok(self.fixed(TokenKind::OpenBracket)),
            b']' => Ok(self.fixed(TokenKind::CloseBracket)),
            b'{' => Ok(self.fixed(TokenKind::OpenCurly)),
            b'}' => Ok(self.fixed(TokenKind::CloseCurly)),
            b',' => Ok(self.fixed(TokenKind::Comma)),
            b':' => Ok(self.fixed(TokenKind::Colon)),
            b';' => Ok(self.fixed(TokenKind::Semicolon)),
            b'~' => Ok(self.fixed(TokenKind::BitwiseNot)),
            b'=' => self.operator(EQUAL, TokenKind::Equal),
            b'!' => self.operator(NOT, TokenKind::Not),
            b'+' => self.operator(ADD, TokenKind::Add),
            b'-' => self.operator(SUBTRACT, TokenKind::Subtract),
            b'*' => self.operator(MULTIPLY, TokenKind::Multiply),
            b'%' => self.operator(MOD, TokenKind::Mod),
            b'&' => self.operator(AND, TokenKind::BitwiseAnd),
            b'|' => self.operator(OR, TokenKind::BitwiseOr),
            b'^' => self.operator(XOR, TokenKind::BitwiseXor),
            b'?' => self.operator(QUESTION, TokenKind::QuestionMark),
            b'<' => self.operator(LESS, TokenKind::LessThan),
            b'>' => self.operator(GREATER, TokenKind::GreaterThan),
            _ => Ok(self.owned(TokenKind::Error, vec![b])),
        }
    }

    // === Helpers ===

    fn fixed(&self, kind: TokenKind) -> Token {
        Token::fixed(kind, self.start)
    }

    fn owned(&self, kind: TokenKind, bytes: Vec<u8>) -> Token {
        Token::owned(kind, bytes, self.start)
    }

    /// Look at the next byte without consuming it.
    fn peek(&mut self) -> Result<Option<u8>, CacheError> {
        let next = self.cache.getc()?;
        if next.is_some() {
            self.cache.step_back()?;
        }
        Ok(next)
    }

    /// Consume bytes into `buf` while `pred` holds.
    fn eat_while(&mut self, buf: &mut Vec<u8>, pred: impl Fn(u8) -> bool) -> Result<(), CacheError> {
        while let Some(b) = self.cache.getc()? {
            if !pred(b) {
                self.cache.step_back()?;
                break;
            }
            buf.push(b);
        }
        Ok(())
    }

    fn operator(&mut self, table: OperatorTable, single: TokenKind) -> Result<Token, CacheError> {
        for &(suffix, kind) in table {
            if self.cache.match_literal(suffix)? == suffix.len() {
                self.cache.skip(suffix.len())?;
                return Ok(self.fixed(kind));
            }
        }
        Ok(self.fixed(single))
    }

    // === Words ===

    fn identifier(&mut self, first: u8) -> Result<Token, CacheError> {
        let mut buf = vec![first];
        self.eat_while(&mut buf, is_ident_continue)?;
        Ok(match TokenKind::keyword(&buf) {
            Some(kind) => self.fixed(kind),
            None => self.owned(TokenKind::Identifier, buf),
        })
    }

    /// Decimal with optional fraction and exponent, or a `0x`/`0b`/`0o`
    /// literal; `_` separators and a BigInt `n` suffix are included.
    fn number(&mut self, first: u8) -> Result<Token, CacheError> {
        let mut buf = vec![first];
        if first == b'0' {
            if let Some(radix @ (b'x' | b'X' | b'b' | b'B' | b'o' | b'O')) = self.peek()? {
                self.cache.skip(1)?;
                buf.push(radix);
                self.eat_while(&mut buf, |b| b.is_ascii_alphanumeric() || b == b'_')?;
                return Ok(self.owned(TokenKind::Numeric, buf));
            }
        }
        self.eat_while(&mut buf, is_digit)?;
        if self.peek()? == Some(b'.') {
            self.cache.skip(1)?;
            buf.push(b'.');
            self.eat_while(&mut buf, is_digit)?;
        }
        self.exponent(&mut buf)?;
        if self.peek()? == Some(b'n') {
            self.cache.skip(1)?;
            buf.push(b'n');
        }
        Ok(self.owned(TokenKind::Numeric, buf))
    }

    /// `.5` is a number; any other `.` is member access.
    fn dot(&mut self) -> Result<Token, CacheError> {
        if !self.peek()?.is_some_and(|b| b.is_ascii_digit()) {
            return Ok(self.fixed(TokenKind::Dot));
        }
        let mut buf = vec![b'.'];
        self.eat_while(&mut buf, is_digit)?;
        self.exponent(&mut buf)?;
        Ok(self.owned(TokenKind::Numeric, buf))
    }

    /// Append `e[+-]digits` when present; leaves a bare `e` for the next token.
    fn exponent(&mut self, buf: &mut Vec<u8>) -> Result<(), CacheError> {
        let Some(e @ (b'e' | b'E')) = self.peek()? else {
            return Ok(());
        };
        self.cache.skip(1)?;
        let mut taken = vec![e];
        if let Some(sign @ (b'+' | b'-')) = self.peek()? {
            self.cache.skip(1)?;
            taken.push(sign);
        }
        if self.peek()?.is_some_and(|b| b.is_ascii_digit()) {
            buf.extend_from_slice(&taken);
            self.eat_while(buf, is_digit)
        } else {
            self.cache.step_back_count(taken.len())
        }
    }

    fn blank_run(&mut self, first: u8) -> Result<Token, CacheError> {
        let kind = if first == b' ' {
            TokenKind::Space
        } else {
            TokenKind::Tab
        };
        let mut buf = vec![first];
        self.eat_while(&mut buf, |b| b == first)?;
        Ok(self.owned(kind, buf))
    }

    // === Delimited ===

    fn string(&mut self, quote: u8, kind: TokenKind) -> Result<Token, CacheError> {
        let mut buf = vec![quote];
        let mut escaped = false;
        while let Some(b) = self.cache.getc()? {
            buf.push(b);
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == quote {
                break;
            }
        }
        Ok(self.owned(kind, buf))
    }

    fn slash(&mut self, prev: Option<TokenKind>) -> Result<Token, CacheError> {
        match self.peek()? {
            Some(b'/') => return self.line_comment(),
            Some(b'*') => return self.block_comment(),
            _ => {}
        }
        if !prev.is_some_and(TokenKind::produces_value) {
            return self.regex();
        }
        if self.peek()? == Some(b'=') {
            self.cache.skip(1)?;
            return Ok(self.fixed(TokenKind::DivideAssign));
        }
        Ok(self.fixed(TokenKind::Divide))
    }

    fn line_comment(&mut self) -> Result<Token, CacheError> {
        let mut buf = vec![b'/'];
        self.eat_while(&mut buf, |b| b != b'\n')?;
        Ok(self.owned(TokenKind::LineComment, buf))
    }

    fn block_comment(&mut self) -> Result<Token, CacheError> {
        let mut buf = vec![b'/'];
        self.cache.skip(1)?;
        buf.push(b'*');
        let mut last = 0;
        while let Some(b) = self.cache.getc()? {
            buf.push(b);
            if last == b'*' && b == b'/' {
                break;
            }
            last = b;
        }
        Ok(self.owned(TokenKind::MultiLineComment, buf))
    }

    fn regex(&mut self) -> Result<Token, CacheError> {
        let mut buf = vec![b'/'];
        let mut in_class = false;
        let mut escaped = false;
        while let Some(b) = self.cache.getc()? {
            if b == b'\n' {
                self.cache.step_back()?;
                break;
            }
            buf.push(b);
            if escaped {
                escaped = false;
                continue;
            }
            match b {
                b'\\' => escaped = true,
                b'[' => in_class = true,
                b']' => in_class = false,
                b'/' if !in_class => {
                    self.eat_while(&mut buf, |f| f.is_ascii_alphabetic())?;
                    break;
                }
                _ => {}
            }
        }
        Ok(self.owned(TokenKind::Regex, buf))
    }
}

fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

fn is_digit(b: u8) -> bool {
    b.is_ascii_digit() || b == b'_'
}

/// Token iterator that tracks the previous significant kind.
///
/// Yields every token through [`TokenKind::Eof`] inclusive, or up to and
/// including the first error, then stops.
pub struct Scanner<R> {
    cache: ByteCache<R>,
    prev: Option<TokenKind>,
    done: bool,
}

impl<R: Read> Scanner<R> {
    pub fn new(cache: ByteCache<R>) -> Self {
        Self {
            cache,
            prev: None,
            done: false,
        }
    }

    /// Scanner over `source` with a ring of `capacity` bytes.
    pub fn with_capacity(capacity: usize, source: R) -> Self {
        Self::new(ByteCache::new(capacity, source))
    }

    /// Scan the next token, updating the previous-significant kind.
    pub fn next_token(&mut self) -> Result<Token, ScanError> {
        let token = scan_token(&mut self.cache, self.prev)?;
        if token.kind().is_significant() {
            self.prev = Some(token.kind());
        }
        Ok(token)
    }

    pub fn previous_significant(&self) -> Option<TokenKind> {
        self.prev
    }

    /// 1-based line of the next unread byte.
    pub fn line_number(&self) -> u64 {
        self.cache.line_number()
    }

    pub fn cache(&self) -> &ByteCache<R> {
        &self.cache
    }
}

impl<R: Read> Iterator for Scanner<R> {
    type Item = Result<Token, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let result = self.next_token();
        self.done = match &result {
            Ok(token) => token.kind() == TokenKind::Eof,
            Err(_) => true,
        };
        Some(result)
    }
}
