//! Output sinks for formatted lines.
//!
//! A line is written as its indentation, the raw bytes of every token, and
//! one newline. The first failed write stops emission.

use std::io::{self, BufWriter, Write};

use thiserror::Error;
use tracing::debug;

use crate::{FormatConfig, Line};

/// Failure writing formatted output.
#[derive(Debug, Error)]
pub enum EmitError {
    #[error("failed to write line {line}")]
    Write {
        line: u64,
        #[source]
        source: io::Error,
    },
    #[error("failed to flush output")]
    Flush(#[source] io::Error),
}

/// Destination for formatted bytes.
pub trait Emitter {
    fn emit(&mut self, bytes: &[u8]) -> io::Result<()>;

    fn emit_newline(&mut self) -> io::Result<()> {
        self.emit(b"\n")
    }

    /// Write `unit` `level` times.
    fn emit_indent(&mut self, unit: &[u8], level: usize) -> io::Result<()> {
        for _ in 0..level {
            self.emit(unit)?;
        }
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Collects output in memory.
#[derive(Debug, Default)]
pub struct StringEmitter {
    buf: Vec<u8>,
}

impl StringEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// The collected output, lossily decoded.
    pub fn output(&self) -> String {
        String::from_utf8_lossy(&self.buf).into_owned()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

impl Emitter for StringEmitter {
    fn emit(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.buf.extend_from_slice(bytes);
        Ok(())
    }
}

/// Writes through a buffer to any [`Write`].
pub struct WriterEmitter<W: Write> {
    out: BufWriter<W>,
}

impl<W: Write> WriterEmitter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: BufWriter::new(out),
        }
    }

    /// Flush and hand back the inner writer.
    pub fn finish(self) -> io::Result<W> {
        self.out.into_inner().map_err(io::IntoInnerError::into_error)
    }
}

impl<W: Write> Emitter for WriterEmitter<W> {
    fn emit(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.out.write_all(bytes)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// Write one line at its capped indentation.
pub fn emit_line<E: Emitter + ?Sized>(
    emitter: &mut E,
    line: Line,
    config: &FormatConfig,
) -> Result<(), EmitError> {
    let number = line.number();
    write_line(emitter, line, config).map_err(|source| EmitError::Write {
        line: number,
        source,
    })
}

fn write_line<E: Emitter + ?Sized>(
    emitter: &mut E,
    line: Line,
    config: &FormatConfig,
) -> io::Result<()> {
    let level = config.effective_indent(line.indent());
    emitter.emit_indent(config.indent.as_bytes(), level)?;
    for token in line.into_tokens() {
        emitter.emit(token.bytes())?;
    }
    emitter.emit_newline()
}

/// Write every line, then flush. Returns the number of lines written.
pub fn emit_lines<E: Emitter + ?Sized>(
    lines: impl IntoIterator<Item = Line>,
    emitter: &mut E,
    config: &FormatConfig,
) -> Result<u64, EmitError> {
    let mut written = 0u64;
    for line in lines {
        emit_line(emitter, line, config)?;
        written += 1;
    }
    emitter.flush().map_err(EmitError::Flush)?;
    debug!(lines = written, "emitted");
    Ok(written)
}
