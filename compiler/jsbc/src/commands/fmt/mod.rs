//! The `fmt` command: beautify files or stdin to stdout.
//!
//! A single input streams straight through the pipeline. Several inputs are
//! formatted in parallel into memory and printed in argument order.

use std::io::{self, Write};

use jsb_fmt::{format_reader, Emitter, FormatConfig, StringEmitter, WriterEmitter};
use rayon::prelude::*;
use tracing::debug;

use super::{open_source, CliError, STDIN_PATH};

/// Parsed `fmt` arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FmtOptions {
    pub config: FormatConfig,
    /// Inputs in argument order; stdin when none were given.
    pub paths: Vec<String>,
}

/// Parse `fmt` flags and paths.
pub fn parse_fmt_args(args: &[String]) -> Result<FmtOptions, CliError> {
    let mut config = FormatConfig::default();
    let mut paths = Vec::new();

    for arg in args {
        if arg == "--decode" {
            config.decode_strings = true;
        } else if arg == "--no-beautify" {
            config.beautify = false;
        } else if let Some(indent) = arg.strip_prefix("--indent=") {
            config = if indent == "tab" {
                config.with_indent("\t")
            } else {
                config.with_space_indent(parse_number("--indent", indent)?)
            };
        } else if let Some(bytes) = arg.strip_prefix("--cache=") {
            config.cache_capacity = parse_number("--cache", bytes)?;
        } else if let Some(limit) = arg.strip_prefix("--queue-limit=") {
            config.queue_limit = Some(parse_number("--queue-limit", limit)?);
        } else if arg == STDIN_PATH || !arg.starts_with('-') {
            paths.push(arg.clone());
        } else {
            return Err(CliError::Usage(format!("unknown option '{arg}'")));
        }
    }

    if paths.is_empty() {
        paths.push(STDIN_PATH.to_owned());
    }
    Ok(FmtOptions { config, paths })
}

fn parse_number(flag: &str, value: &str) -> Result<usize, CliError> {
    value
        .parse()
        .map_err(|_| CliError::Usage(format!("{flag} expects a number, got '{value}'")))
}

/// Format every path in parallel. Results come back in input order, as
/// the exact output bytes.
pub fn format_files(paths: &[String], config: &FormatConfig) -> Vec<Result<Vec<u8>, CliError>> {
    paths
        .par_iter()
        .map(|path| -> Result<Vec<u8>, CliError> {
            let mut out = StringEmitter::new();
            format_into(path, &mut out, config)?;
            Ok(out.into_bytes())
        })
        .collect()
}

fn format_into(
    path: &str,
    emitter: &mut impl Emitter,
    config: &FormatConfig,
) -> Result<(), CliError> {
    debug!(path, "formatting");
    let source = open_source(path)?;
    format_reader(source, emitter, config).map_err(|source| CliError::Format {
        path: path.to_owned(),
        source,
    })
}

/// Run `jsb fmt`. Returns how many inputs failed.
pub fn run_format(args: &[String]) -> Result<usize, CliError> {
    let options = parse_fmt_args(args)?;

    if let [path] = options.paths.as_slice() {
        let mut emitter = WriterEmitter::new(io::stdout().lock());
        let result = format_into(path, &mut emitter, &options.config);
        drop(emitter.finish()?);
        return result.map(|()| 0);
    }

    let mut failures = 0;
    let mut stdout = io::stdout().lock();
    for result in format_files(&options.paths, &options.config) {
        match result {
            Ok(bytes) => stdout.write_all(&bytes)?,
            Err(err) => {
                failures += 1;
                super::report(&err);
            }
        }
    }
    stdout.flush()?;
    Ok(failures)
}
