//! Wiring the stages together.

use std::io::Read;

use jsb_decode::spawn_decoder;
use jsb_lexer::spawn_tokenizer;
use jsb_queue::{Stage, StageError};
use tracing::debug;

use crate::{
    emit_lines, spawn_beautifier, spawn_line_assembler, Emitter, FormatConfig, FormatError, Line,
    StringEmitter,
};

/// Start every stage `config` asks for and return the last one.
///
/// Dropping the returned stage tears the whole chain down.
pub fn spawn_pipeline<R>(source: R, config: &FormatConfig) -> Result<Stage<Line>, StageError>
where
    R: Read + Send + 'static,
{
    let limit = config.queue_limit;
    let mut tokens = spawn_tokenizer(source, config.cache_capacity, limit)?;
    if config.decode_strings {
        tokens = spawn_decoder(tokens, limit)?;
    }
    let lines = spawn_line_assembler(tokens, limit)?;
    if config.beautify {
        return spawn_beautifier(lines, config);
    }
    Ok(lines)
}

/// Format everything `source` yields into `emitter`.
///
/// Lines produced before a stage failure are still written; the failure is
/// returned after them.
pub fn format_reader<R, E>(source: R, emitter: &mut E, config: &FormatConfig) -> Result<(), FormatError>
where
    R: Read + Send + 'static,
    E: Emitter + ?Sized,
{
    let mut stage = spawn_pipeline(source, config)?;
    let written = emit_lines(stage.by_ref(), emitter, config)?;
    debug!(lines = written, "format finished");
    stage.finish()?;
    Ok(())
}

/// Format an in-memory buffer.
pub fn format_bytes(source: &[u8], config: &FormatConfig) -> Result<String, FormatError> {
    let mut out = StringEmitter::new();
    format_reader(std::io::Cursor::new(source.to_vec()), &mut out, config)?;
    Ok(out.output())
}

#[cfg(test)]
mod tests;
