//! The `stats` command: token counts for one input.

use std::io::{self, Write};

use jsb_lexer_core::{Token, TokenKind};
use rustc_hash::FxHashMap;

/// Counts gathered from a token list.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TokenStats {
    pub tokens: usize,
    pub lines: u64,
    /// Input length in bytes.
    pub chars: u64,
    pub loops: usize,
    pub identifiers: usize,
    pub ifs: usize,
    pub ternaries: usize,
    pub unknown: usize,
    histogram: FxHashMap<TokenKind, usize>,
}

impl TokenStats {
    pub fn collect(tokens: &[Token]) -> Self {
        let mut stats = Self {
            lines: 1,
            ..Self::default()
        };
        for token in tokens {
            let kind = token.kind();
            *stats.histogram.entry(kind).or_default() += 1;
            match kind {
                TokenKind::Eof => {
                    stats.chars = token.offset().unwrap_or_default();
                    continue;
                }
                TokenKind::Newline => stats.lines += 1,
                TokenKind::For => stats.loops += 1,
                TokenKind::Identifier => stats.identifiers += 1,
                TokenKind::If => stats.ifs += 1,
                TokenKind::QuestionMark => stats.ternaries += 1,
                TokenKind::Error => stats.unknown += 1,
                _ => {}
            }
            stats.tokens += 1;
        }
        stats
    }

    /// How many tokens of `kind` were seen.
    pub fn count(&self, kind: TokenKind) -> usize {
        self.histogram.get(&kind).copied().unwrap_or_default()
    }

    pub fn write(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "tokens:      {}", self.tokens)?;
        writeln!(out, "lines:       {}", self.lines)?;
        writeln!(out, "characters:  {}", self.chars)?;
        writeln!(out, "loops:       {}", self.loops)?;
        writeln!(out, "identifiers: {}", self.identifiers)?;
        writeln!(out, "ifs:         {}", self.ifs)?;
        writeln!(out, "ternaries:   {}", self.ternaries)?;
        writeln!(out, "unknown:     {}", self.unknown)?;
        writeln!(out)?;

        let mut kinds: Vec<(TokenKind, usize)> =
            self.histogram.iter().map(|(&k, &n)| (k, n)).collect();
        kinds.sort_unstable();
        for (kind, n) in kinds {
            writeln!(out, "{:<28} {n}", kind.name())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
