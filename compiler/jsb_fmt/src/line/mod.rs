//! One formatted output row.

use std::collections::VecDeque;

use jsb_lexer_core::{Token, TokenKind};
use jsb_queue::Queue;

/// What construct a line starts with.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LineKind {
    Plain,
    For,
    If,
    While,
    Else,
    /// A control keyword not followed by a parenthesised condition.
    Invalid,
}

/// Tokens of one output row plus indentation and running statistics.
///
/// The token list is an unthreaded [`Queue`] so trailing whitespace can be
/// trimmed from the tail. Counters are kept in step on every push and pop.
pub struct Line {
    tokens: Queue<Token>,
    kind: LineKind,
    number: u64,
    indent: usize,
    commas: usize,
    logic: usize,
    ternaries: usize,
    char_len: usize,
}

impl Line {
    pub fn new(number: u64, indent: usize) -> Self {
        Self {
            tokens: Queue::unthreaded(),
            kind: LineKind::Plain,
            number,
            indent,
            commas: 0,
            logic: 0,
            ternaries: 0,
            char_len: 0,
        }
    }

    pub fn push(&mut self, token: Token) {
        self.count(&token, true);
        self.tokens.push_tail(token);
    }

    /// Append a synthetic space unless the line is empty or already ends
    /// in whitespace.
    pub fn push_space(&mut self) {
        if self.last_kind().is_some_and(TokenKind::is_significant) {
            self.push(Token::synthetic_space());
        }
    }

    pub fn push_newline(&mut self) {
        self.push(Token::synthetic_newline());
    }

    pub fn pop_tail(&mut self) -> Option<Token> {
        let token = self.tokens.pop_tail()?;
        self.count(&token, false);
        Some(token)
    }

    pub fn pop_head(&mut self) -> Option<Token> {
        let token = self.tokens.pop_head()?;
        self.count(&token, false);
        Some(token)
    }

    /// Remove whitespace tokens from the end. Returns how many were removed.
    pub fn trim_trailing_whitespace(&mut self) -> usize {
        let mut removed = Vec::new();
        let count = self
            .tokens
            .consume_tail_until(|t| t.kind().is_significant(), |t| removed.push(t));
        for token in &removed {
            self.count(token, false);
        }
        count
    }

    pub fn last_kind(&mut self) -> Option<TokenKind> {
        self.tokens.peek_tail().map(Token::kind)
    }

    pub fn first_kind(&mut self) -> Option<TokenKind> {
        self.tokens.peek_head().map(Token::kind)
    }

    /// Kind of the last non-whitespace token.
    pub fn last_significant_kind(&mut self) -> Option<TokenKind> {
        self.tokens
            .items()
            .rev()
            .map(Token::kind)
            .find(|k| k.is_significant())
    }

    pub fn tokens(&mut self) -> impl Iterator<Item = &Token> {
        self.tokens.items()
    }

    pub fn into_tokens(self) -> VecDeque<Token> {
        self.tokens.into_items()
    }

    /// The line's bytes, lossily decoded, without indentation.
    pub fn text(&self) -> String {
        let bytes: Vec<u8> = self
            .tokens
            .snapshot()
            .iter()
            .flat_map(|t| t.bytes().iter().copied())
            .collect();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn kind(&self) -> LineKind {
        self.kind
    }

    pub fn set_kind(&mut self, kind: LineKind) {
        self.kind = kind;
    }

    /// 0-based position of the line in the output.
    pub fn number(&self) -> u64 {
        self.number
    }

    /// Depth the line is printed at.
    pub fn indent(&self) -> usize {
        self.indent
    }

    pub fn set_indent(&mut self, indent: usize) {
        self.indent = indent;
    }

    pub fn comma_count(&self) -> usize {
        self.commas
    }

    /// `&&`, `||` and `??` operators.
    pub fn logic_count(&self) -> usize {
        self.logic
    }

    pub fn ternary_count(&self) -> usize {
        self.ternaries
    }

    /// Total bytes of all tokens.
    pub fn char_len(&self) -> usize {
        self.char_len
    }

    fn count(&mut self, token: &Token, added: bool) {
        let counter = match token.kind() {
            TokenKind::Comma => Some(&mut self.commas),
            kind if kind.is_logic() => Some(&mut self.logic),
            TokenKind::QuestionMark => Some(&mut self.ternaries),
            _ => None,
        };
        if added {
            if let Some(counter) = counter {
                *counter += 1;
            }
            self.char_len += token.len();
        } else {
            if let Some(counter) = counter {
                *counter = counter.saturating_sub(1);
            }
            self.char_len = self.char_len.saturating_sub(token.len());
        }
    }
}

impl std::fmt::Debug for Line {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Line")
            .field("number", &self.number)
            .field("kind", &self.kind)
            .field("indent", &self.indent)
            .field("text", &self.text())
            .finish()
    }
}
