//! Line-oriented beautifier for jsb.
//!
//! # Pipeline
//!
//! ```text
//! bytes ─► tokenizer ─► [decoder] ─► line assembler ─► [beautifier] ─► emitter
//!          jsb-tokenizer jsb-decoder  jsb-lines         jsb-beautify    caller's thread
//! ```
//!
//! Each bracketed stage is optional ([`FormatConfig::decode_strings`],
//! [`FormatConfig::beautify`]). Every stage runs on its own thread and hands
//! items downstream through a bounded [`jsb_queue::Queue`]; the emitter runs
//! on the calling thread and writes each [`Line`] as indentation, token
//! bytes, then a newline.
//!
//! # Usage
//!
//! ```text
//! let out = jsb_fmt::format_bytes(b"if(x){y;}", &FormatConfig::default())?;
//! assert_eq!(out, "if (x) {\n\ty;\n}\n");
//! ```

mod assembler;
mod beautify;
mod config;
mod emitter;
mod line;
mod pipeline;

use thiserror::Error;

pub use assembler::{assemble, spawn_line_assembler, LineAssembler, TokenSource};
pub use beautify::{spawn_beautifier, LineBeautifier};
pub use config::FormatConfig;
pub use emitter::{emit_line, emit_lines, EmitError, Emitter, StringEmitter, WriterEmitter};
pub use line::{Line, LineKind};
pub use pipeline::{format_bytes, format_reader, spawn_pipeline};

/// Failure of a whole formatting run.
#[derive(Debug, Error)]
pub enum FormatError {
    /// A pipeline stage failed; output up to that point was emitted.
    #[error(transparent)]
    Stage(#[from] jsb_queue::StageError),
    /// Writing the output failed.
    #[error(transparent)]
    Emit(#[from] EmitError),
}
