//! Command handlers for the `jsb` CLI.
//!
//! Each submodule implements one command. Reading input and the shared
//! error type live here in the module root.

use std::fs::File;
use std::io::{self, Read};

use jsb_fmt::FormatError;
use jsb_lexer::lex;
use jsb_lexer_core::{ScanError, Token};
use thiserror::Error;

mod debug;
mod fmt;
mod stats;

pub use debug::{write_kinds, write_tokens, write_unknown, MAX_UNKNOWN_REPORTED};
pub use fmt::{format_files, parse_fmt_args, run_format, FmtOptions};
pub use stats::TokenStats;

/// Path that means standard input.
pub const STDIN_PATH: &str = "-";

/// Failure of a CLI command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("cannot read '{path}'")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("cannot tokenize '{path}'")]
    Lex {
        path: String,
        #[source]
        source: ScanError,
    },
    #[error("formatting '{path}' failed")]
    Format {
        path: String,
        #[source]
        source: FormatError,
    },
    #[error("failed to write output")]
    Output(#[from] io::Error),
}

/// Print `err` and its causes to stderr.
pub fn report(err: &CliError) {
    eprintln!("error: {}", error_chain(err));
}

/// `err` followed by each of its sources, `: `-separated.
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Open `path` for streaming, `-` being stdin.
pub fn open_source(path: &str) -> Result<Box<dyn Read + Send>, CliError> {
    if path == STDIN_PATH {
        return Ok(Box::new(io::stdin()));
    }
    File::open(path)
        .map(|file| Box::new(file) as Box<dyn Read + Send>)
        .map_err(|source| CliError::Read {
            path: path.to_owned(),
            source,
        })
}

/// Read all of `path`, `-` being stdin.
pub fn read_source(path: &str) -> Result<Vec<u8>, CliError> {
    let mut buf = Vec::new();
    open_source(path)?
        .read_to_end(&mut buf)
        .map_err(|source| CliError::Read {
            path: path.to_owned(),
            source,
        })?;
    Ok(buf)
}

/// Tokenize all of `path`.
pub fn load_tokens(path: &str) -> Result<Vec<Token>, CliError> {
    let source = read_source(path)?;
    lex(&source).map_err(|source| CliError::Lex {
        path: path.to_owned(),
        source,
    })
}
