//! CLI entry point for timed-json
//!
//! Reads one Json document, times a single decode of it and prints
//! `Parsing time: <N> microseconds`.

use std::{env, io, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use timed_json::{Config, Decoder};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Looked up next to the executable when no path is given.
const DEFAULT_DOCUMENT: &str = "really-big-json-file.json";

/// Time how long a Json document takes to decode
#[derive(Parser)]
#[command(name = "timed-json")]
#[command(version, about, long_about = None)]
struct Args {
    /// Json document to decode [default: really-big-json-file.json next to the executable]
    #[arg(env = "TIMED_JSON_FILE", value_name = "PATH")]
    path: Option<PathBuf>,

    /// Decoder to time
    #[arg(short, long, value_enum, default_value_t = ParserArg::Serde)]
    parser: ParserArg,
}

#[derive(Clone, Copy, ValueEnum)]
enum ParserArg {
    /// serde_json into a serde_json::Value
    Serde,
    /// timed_json's own parser, keeping line and column spans
    Spanned,
}

impl From<ParserArg> for Decoder {
    fn from(arg: ParserArg) -> Self {
        match arg {
            ParserArg::Serde => Decoder::Serde,
            ParserArg::Spanned => Decoder::Spanned,
        }
    }
}

fn default_document() -> Result<PathBuf> {
    let exe = env::current_exe().context("Failed to locate the running executable")?;

    Ok(exe
        .parent()
        .map(|dir| dir.join(DEFAULT_DOCUMENT))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DOCUMENT)))
}

/// Logs go to stderr, stdout only carries the report line.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();

    let path = match args.path {
        Some(path) => path,
        None => default_document()?,
    };
    debug!(path = %path.display(), "resolved input document");

    let config = Config::new(path).with_decoder(args.parser.into());

    let stdout = io::stdout();
    timed_json::run(&config, &mut stdout.lock())?;

    Ok(())
}
