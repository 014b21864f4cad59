//! Groups a token stream into indented lines.
//!
//! Each call to [`LineAssembler::next_line`] starts a fresh [`Line`] at the
//! carried-over depth, looks at the first significant token, and fills the
//! line with one of three routines:
//!
//! - `for` / `if` / `while`: keyword, space, the balanced condition, and an
//!   opening `{` if one follows.
//! - `else`: the keyword plus `{`, or a chained `if (...)`.
//! - anything else: tokens up to `;`, a top-level `,`, a newline, or a
//!   block boundary.
//!
//! Whitespace runs collapse to one synthetic space and binary operators get
//! a single space on each side where the neighbour is a value. A `}` always
//! leads its own line, which is printed one level shallower; `else`,
//! `while` and `catch` after it stay on that line.
//!
//! Running out of tokens mid-construct (an unbalanced `(` at end of input,
//! or an upstream stage that died) still yields the partial line, after
//! which the assembler stops.

use std::collections::VecDeque;

use jsb_lexer_core::{Token, TokenKind};
use jsb_queue::{spawn_stage, Stage, StageError};
use tracing::debug;

use crate::{Line, LineKind};

const STAGE: &str = "lines";

/// Where the assembler pulls tokens from.
pub trait TokenSource {
    /// Take the next token; `None` when the stream has ended.
    fn next_token(&mut self) -> Option<Token>;

    /// Kind of the next token without taking it.
    fn peek_kind(&mut self) -> Option<TokenKind>;

    /// Drop whitespace tokens, then peek.
    fn skip_whitespace_peek(&mut self) -> Option<TokenKind> {
        loop {
            match self.peek_kind() {
                Some(kind) if kind.is_whitespace() => drop(self.next_token()),
                other => return other,
            }
        }
    }
}

impl TokenSource for Stage<Token> {
    fn next_token(&mut self) -> Option<Token> {
        self.recv()
    }

    fn peek_kind(&mut self) -> Option<TokenKind> {
        self.peek_with(Token::kind)
    }

    fn skip_whitespace_peek(&mut self) -> Option<TokenKind> {
        if self.consume_until(|t| t.kind().is_significant()) {
            self.peek_kind()
        } else {
            None
        }
    }
}

impl TokenSource for VecDeque<Token> {
    fn next_token(&mut self) -> Option<Token> {
        self.pop_front()
    }

    fn peek_kind(&mut self) -> Option<TokenKind> {
        self.front().map(Token::kind)
    }
}

/// How filling a line ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Flow {
    /// The line is complete; more may follow.
    Done,
    /// Input ran out mid-line; emit what we have and stop.
    Truncated,
}

/// Turns tokens into [`Line`]s.
pub struct LineAssembler<S> {
    source: S,
    depth: usize,
    /// Extra levels for the single statement under a braceless
    /// `if`/`for`/`while`/`else`.
    pending: usize,
    number: u64,
    halted: bool,
}

impl<S: TokenSource> LineAssembler<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            depth: 0,
            pending: 0,
            number: 0,
            halted: false,
        }
    }

    /// Lines produced so far.
    pub fn lines_built(&self) -> u64 {
        self.number
    }

    /// Current block depth.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn into_source(self) -> S {
        self.source
    }

    /// Build the next line, or `None` at end of input.
    pub fn next_line(&mut self) -> Option<Line> {
        if self.halted {
            return None;
        }
        let Some(first) = self.source.skip_whitespace_peek() else {
            self.halted = true;
            return None;
        };
        if first == TokenKind::Eof {
            drop(self.source.next_token());
            self.halted = true;
            return None;
        }

        let mut line = Line::new(self.number, self.depth);
        let flow = match first {
            TokenKind::For => self.logic_line(&mut line, LineKind::For),
            TokenKind::If => self.logic_line(&mut line, LineKind::If),
            TokenKind::While => self.logic_line(&mut line, LineKind::While),
            TokenKind::Else => self.else_line(&mut line),
            _ => self.plain_line(&mut line),
        };
        if flow == Flow::Truncated {
            debug!(line = self.number, "input ended mid-line");
            self.halted = true;
        }
        if line.is_empty() {
            self.halted = true;
            return None;
        }
        self.number += 1;
        self.place(&mut line);
        Some(line)
    }

    /// Set the line's printed depth and carry the running depth forward.
    fn place(&mut self, line: &mut Line) {
        if line.first_kind() == Some(TokenKind::CloseCurly) {
            self.depth = self.depth.saturating_sub(1);
            line.set_indent(self.depth);
            self.pending = 0;
        } else {
            line.set_indent(self.depth + self.pending);
            self.pending = if Self::is_braceless(line) {
                self.pending + 1
            } else {
                0
            };
        }
        if line.last_kind() == Some(TokenKind::OpenCurly) {
            self.depth += 1;
        }
    }

    /// A control line whose body is the next single statement.
    fn is_braceless(line: &mut Line) -> bool {
        match line.kind() {
            LineKind::For | LineKind::If | LineKind::While => {
                line.last_kind() == Some(TokenKind::CloseParen)
            }
            LineKind::Else => matches!(
                line.last_kind(),
                Some(TokenKind::Else | TokenKind::CloseParen)
            ),
            LineKind::Plain | LineKind::Invalid => false,
        }
    }

    // === Line shapes ===

    fn logic_line(&mut self, line: &mut Line, kind: LineKind) -> Flow {
        line.set_kind(kind);
        self.take_into(line);
        match self.source.skip_whitespace_peek() {
            None => return Flow::Truncated,
            Some(TokenKind::OpenParen) => {}
            Some(_) => {
                line.set_kind(LineKind::Invalid);
                line.push_space();
                return self.plain_line(line);
            }
        }
        line.push_space();
        if self.paren_group(line) == Flow::Truncated {
            return Flow::Truncated;
        }
        match self.source.skip_whitespace_peek() {
            Some(TokenKind::OpenCurly) => {
                line.push_space();
                self.take_into(line);
            }
            Some(TokenKind::Semicolon) => self.take_into(line),
            _ => {}
        }
        Flow::Done
    }

    fn else_line(&mut self, line: &mut Line) -> Flow {
        line.set_kind(LineKind::Else);
        self.take_into(line);
        match self.source.skip_whitespace_peek() {
            Some(TokenKind::OpenCurly) => {
                line.push_space();
                self.take_into(line);
                Flow::Done
            }
            Some(TokenKind::If) => {
                line.push_space();
                let flow = self.logic_line(line, LineKind::If);
                line.set_kind(LineKind::Else);
                flow
            }
            _ => Flow::Done,
        }
    }

    fn plain_line(&mut self, line: &mut Line) -> Flow {
        loop {
            let Some(kind) = self.source.peek_kind() else {
                line.trim_trailing_whitespace();
                return Flow::Truncated;
            };
            match kind {
                TokenKind::Eof => {
                    line.trim_trailing_whitespace();
                    return Flow::Done;
                }
                TokenKind::Newline | TokenKind::CarriageReturn => {
                    self.source.skip_whitespace_peek();
                    return Flow::Done;
                }
                TokenKind::Space | TokenKind::Tab => {
                    let next = self.skip_blanks();
                    if !matches!(
                        next,
                        None | Some(TokenKind::Newline | TokenKind::CarriageReturn | TokenKind::Eof)
                    ) {
                        line.push_space();
                    }
                }
                TokenKind::OpenParen => {
                    if self.paren_group(line) == Flow::Truncated {
                        return Flow::Truncated;
                    }
                }
                TokenKind::Semicolon | TokenKind::Comma => {
                    self.take_into(line);
                    return Flow::Done;
                }
                TokenKind::OpenCurly => {
                    if line
                        .last_kind()
                        .is_some_and(|k| k.is_significant() && k != TokenKind::OpenBracket)
                    {
                        line.push_space();
                    }
                    self.take_into(line);
                    if self.source.skip_whitespace_peek() != Some(TokenKind::CloseCurly) {
                        return Flow::Done;
                    }
                    self.take_into(line);
                }
                TokenKind::CloseCurly => {
                    if !line.is_empty() {
                        line.trim_trailing_whitespace();
                        return Flow::Done;
                    }
                    self.take_into(line);
                    match self.source.skip_whitespace_peek() {
                        Some(TokenKind::Comma | TokenKind::Semicolon) => {
                            self.take_into(line);
                            return Flow::Done;
                        }
                        Some(TokenKind::Else | TokenKind::While | TokenKind::Catch) => {
                            line.push_space();
                        }
                        Some(TokenKind::CloseParen | TokenKind::CloseBracket | TokenKind::Dot) => {}
                        _ => return Flow::Done,
                    }
                }
                kind if kind.is_spaced_operator() => self.operator(line, kind),
                _ => self.take_into(line),
            }
        }
    }

    /// Copy a balanced `( ... )` group onto the line. The head must be `(`.
    fn paren_group(&mut self, line: &mut Line) -> Flow {
        let mut depth = 0usize;
        loop {
            let Some(kind) = self.source.peek_kind() else {
                return Flow::Truncated;
            };
            match kind {
                TokenKind::Eof => return Flow::Truncated,
                kind if kind.is_whitespace() => {
                    let after_comment = line.last_kind() == Some(TokenKind::LineComment);
                    self.source.skip_whitespace_peek();
                    if after_comment {
                        line.push_newline();
                    } else {
                        line.push_space();
                    }
                }
                TokenKind::OpenParen => {
                    depth += 1;
                    self.take_into(line);
                }
                TokenKind::CloseParen => {
                    self.take_into(line);
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return Flow::Done;
                    }
                }
                kind if kind.is_spaced_operator() => self.operator(line, kind),
                _ => self.take_into(line),
            }
        }
    }

    /// Append a binary operator with a space on each side that borders a
    /// value. A `+`/`-` not preceded by a value is a sign and stays tight.
    fn operator(&mut self, line: &mut Line, kind: TokenKind) {
        let before = line.last_significant_kind();
        if kind.is_sign() && !before.is_some_and(is_operand_end) {
            self.take_into(line);
            return;
        }
        if line.last_kind().is_some_and(is_operand_end) {
            line.push_space();
        }
        self.take_into(line);
        if self.source.peek_kind().is_some_and(is_operand_start) {
            line.push_space();
        }
    }

    // === Helpers ===

    fn take_into(&mut self, line: &mut Line) {
        if let Some(token) = self.source.next_token() {
            line.push(token);
        }
    }

    /// Drop a run of spaces and tabs (not newlines), then peek.
    fn skip_blanks(&mut self) -> Option<TokenKind> {
        loop {
            match self.source.peek_kind() {
                Some(TokenKind::Space | TokenKind::Tab) => drop(self.source.next_token()),
                other => return other,
            }
        }
    }
}

/// Kinds an operator may follow with a space in between.
fn is_operand_end(kind: TokenKind) -> bool {
    kind.is_value_like() || matches!(kind, TokenKind::Increment | TokenKind::Decrement)
}

/// Kinds an operator may precede with a space in between.
fn is_operand_start(kind: TokenKind) -> bool {
    kind.is_value_like()
        || kind.is_keyword()
        || matches!(
            kind,
            TokenKind::OpenParen
                | TokenKind::OpenBracket
                | TokenKind::OpenCurly
                | TokenKind::Not
                | TokenKind::BitwiseNot
                | TokenKind::Increment
                | TokenKind::Decrement
        )
}

impl<S: TokenSource> Iterator for LineAssembler<S> {
    type Item = Line;

    fn next(&mut self) -> Option<Line> {
        self.next_line()
    }
}

/// Assemble an in-memory token list.
pub fn assemble(tokens: impl IntoIterator<Item = Token>) -> Vec<Line> {
    LineAssembler::new(tokens.into_iter().collect::<VecDeque<_>>()).collect()
}

/// Run the line assembler over `input` on a `jsb-lines` thread.
///
/// An upstream failure is re-raised once the partial output is published.
pub fn spawn_line_assembler(
    input: Stage<Token>,
    queue_limit: Option<usize>,
) -> Result<Stage<Line>, StageError> {
    spawn_stage(STAGE, queue_limit, move |out| {
        let mut assembler = LineAssembler::new(input);
        for line in &mut assembler {
            if !out.send(line) {
                return Ok(());
            }
        }
        debug!(
            lines = assembler.lines_built(),
            depth = assembler.depth(),
            "line assembly finished"
        );
        assembler.into_source().finish()
    })
}
