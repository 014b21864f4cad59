//! jsb: a streaming JavaScript beautifier.

use std::io::{self, Write};
use std::process::ExitCode;

use jsbc::commands::{
    load_tokens, report, run_format, write_kinds, write_tokens, write_unknown, CliError,
    TokenStats,
};

fn main() -> ExitCode {
    jsbc::init_tracing();

    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map_or("fmt", String::as_str);
    let rest = args.get(2..).unwrap_or_default();

    let result = match command {
        "fmt" => run_format(rest).map(|failures| failures == 0),
        "tokens" => with_file(command, rest, |path, out| {
            write_tokens(&load_tokens(path)?, out)?;
            Ok(())
        }),
        "unknown" => with_file(command, rest, |path, out| {
            write_unknown(&load_tokens(path)?, out)?;
            Ok(())
        }),
        "stats" => with_file(command, rest, |path, out| {
            TokenStats::collect(&load_tokens(path)?).write(out)?;
            Ok(())
        }),
        "kinds" => write_kinds(&mut io::stdout().lock())
            .map(|()| true)
            .map_err(CliError::from),
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(true)
        }
        "version" | "--version" | "-V" => {
            println!("jsb {}", env!("CARGO_PKG_VERSION"));
            Ok(true)
        }
        // Bare paths and fmt flags format by default.
        _ if command == "-" || !command.starts_with('-') || command.starts_with("--") => {
            run_format(&args[1..]).map(|failures| failures == 0)
        }
        _ => Err(CliError::Usage(format!("unknown command '{command}'"))),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            report(&err);
            if matches!(err, CliError::Usage(_)) {
                eprintln!();
                eprintln!("Run `jsb help` for usage.");
            }
            ExitCode::FAILURE
        }
    }
}

/// Run a single-file command, writing to a locked stdout.
fn with_file(
    command: &str,
    args: &[String],
    run: impl FnOnce(&str, &mut io::StdoutLock<'static>) -> Result<(), CliError>,
) -> Result<bool, CliError> {
    let [path] = args else {
        return Err(CliError::Usage(format!("usage: jsb {command} <file>")));
    };
    let mut out = io::stdout().lock();
    run(path, &mut out)?;
    out.flush()?;
    Ok(true)
}

fn print_usage() {
    println!("jsb: streaming JavaScript beautifier");
    println!();
    println!("Usage: jsb [command] [options] [files...]");
    println!();
    println!("Commands:");
    println!("  fmt [files...]     Beautify files (or stdin, also `-`) to stdout (default)");
    println!("  tokens <file>      Print every token with line, offset and length");
    println!("  unknown <file>     List bytes the tokenizer does not recognise");
    println!("  stats <file>       Token counts and a per-kind histogram");
    println!("  kinds              List token kind ids and names");
    println!("  help               Show this help message");
    println!("  version            Show version information");
    println!();
    println!("Format options:");
    println!("  --decode           Rewrite base64 string literals as btoa('...')");
    println!("  --no-beautify      Skip the line beautifier stage");
    println!("  --indent=<n|tab>   Indent with n spaces or a tab (default: tab)");
    println!("  --cache=<bytes>    Tokenizer ring buffer size (default: 4096)");
    println!("  --queue-limit=<n>  Cap each inter-stage queue at n items");
    println!();
    println!("Logging:");
    println!("  JSB_LOG=<filter>   Diagnostics to stderr (falls back to RUST_LOG)");
    println!("  JSB_LOG_TREE=1     Hierarchical span output");
    println!();
    println!("Examples:");
    println!("  jsb app.min.js");
    println!("  jsb fmt --indent=2 a.js b.js");
    println!("  cat app.js | jsb fmt --decode -");
    println!("  jsb tokens app.js");
}
