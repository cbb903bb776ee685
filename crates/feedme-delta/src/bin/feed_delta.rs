//! `feed-delta` - replay Feedme deltas against a feed-data document.
//!
//! Usage:
//!   feed-delta --deltas '<delta-array-or-message-json>' [--doc base.json]
//!   feed-delta --deltas @revelation.json --hash < base.json
//!
//! The base document is read from `--doc` or stdin. Set `RUST_LOG` for
//! diagnostics on stderr.

use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use feedme_delta::cli::{load_arg, render, replay, CliError, Output};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "feed-delta", version, about = "Replay Feedme deltas against feed data")]
struct Args {
    /// Delta array or revelation message, inline JSON or `@file`.
    #[arg(short, long)]
    deltas: String,

    /// Base document file. Read from stdin when omitted.
    #[arg(long)]
    doc: Option<PathBuf>,

    /// Print the canonical hash of the result instead of the document.
    #[arg(long, conflicts_with = "pretty")]
    hash: bool,

    /// Fail unless the result has this canonical hash.
    #[arg(long)]
    expect_hash: Option<String>,

    /// Pretty-print the resulting document.
    #[arg(long)]
    pretty: bool,
}

fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_doc(doc: Option<&PathBuf>) -> Result<String, CliError> {
    match doc {
        Some(path) => std::fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.display().to_string(),
            source,
        }),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .map_err(|source| CliError::Read { path: "stdin".into(), source })?;
            Ok(buf)
        }
    }
}

fn run(args: &Args) -> Result<String, CliError> {
    let deltas = load_arg(&args.deltas)?;
    let doc = read_doc(args.doc.as_ref())?;
    let result = replay(doc.trim(), deltas.trim(), args.expect_hash.as_deref())?;
    debug!("replay succeeded");
    let output = match (args.hash, args.pretty) {
        (true, _) => Output::Hash,
        (false, true) => Output::Pretty,
        (false, false) => Output::Compact,
    };
    render(&result, output)
}

fn main() -> ExitCode {
    setup_tracing();
    let args = Args::parse();
    match run(&args) {
        Ok(out) => {
            let mut stdout = io::stdout().lock();
            if writeln!(stdout, "{out}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
