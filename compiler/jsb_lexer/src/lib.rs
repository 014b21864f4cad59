//! Tokenizer stage for the jsb pipeline.
//!
//! [`spawn_tokenizer`] runs a [`Scanner`] over any byte source on its own
//! thread and publishes every token, through the final EOF, into a
//! [`Stage`]. [`lex`] does the same synchronously for in-memory input.

use std::io::Read;

use jsb_lexer_core::{ScanError, Scanner, Token, TokenKind};
use jsb_queue::{spawn_stage, Stage, StageError};
use tracing::debug;

pub use jsb_lexer_core::MIN_CAPACITY;

const STAGE: &str = "tokenizer";

/// Tokenize `source` on a `jsb-tokenizer` thread.
///
/// `cache_capacity` sizes the scanner's ring buffer; `queue_limit` caps the
/// output queue. A read failure ends the stage with a stored
/// [`StageError`] after every token scanned before it was published.
pub fn spawn_tokenizer<R>(
    source: R,
    cache_capacity: usize,
    queue_limit: Option<usize>,
) -> Result<Stage<Token>, StageError>
where
    R: Read + Send + 'static,
{
    spawn_stage(STAGE, queue_limit, move |out| {
        let mut scanner = Scanner::with_capacity(cache_capacity, source);
        let mut unknown = 0u64;
        for result in &mut scanner {
            let token = result.map_err(|err| StageError::from_error(STAGE, &err))?;
            if token.kind() == TokenKind::Error {
                unknown += 1;
            }
            if !out.send(token) {
                debug!("consumer stopped the tokenizer early");
                return Ok(());
            }
        }
        debug!(
            unknown,
            lines = scanner.line_number(),
            bytes = scanner.cache().charnum(),
            "end of input"
        );
        Ok(())
    })
}

/// Tokenize an in-memory buffer, EOF token included.
pub fn lex(source: &[u8]) -> Result<Vec<Token>, ScanError> {
    Scanner::with_capacity(MIN_CAPACITY, source).collect()
}
