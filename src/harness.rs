//! Single-shot timing of a Json decode.
//!
//! The document is read fully before the clock starts, decoded once, and the
//! elapsed microseconds are written as one line:
//!
//! ```text
//! Parsing time: 1234 microseconds
//! ```
//!
//! Nothing is written when the read or the decode fails.

use std::{
    fmt::{self, Display},
    fs,
    hint::black_box,
    io::{self, Write},
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::{bench::Clock, error, parser::parse, value::SpannedValue};

#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("failed to read {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("failed to write the report")]
    Write(#[source] io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
    #[error(transparent)]
    Spanned(#[from] error::Error),
}

/// The Json decoder being timed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Decoder {
    /// `serde_json` into a `serde_json::Value`.
    #[default]
    Serde,
    /// [`crate::parse`], keeping spans.
    Spanned,
}

impl Decoder {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Serde => "serde",
            Self::Spanned => "spanned",
        }
    }

    pub fn decode(&self, text: &str) -> Result<Decoded, DecodeError> {
        Ok(match self {
            Self::Serde => Decoded::Serde(serde_json::from_str(text)?),
            Self::Spanned => Decoded::Spanned(parse(text)?),
        })
    }
}

impl Display for Decoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whatever the decoder produced. Only kept around so that dropping it happens
/// outside of the measured interval.
#[derive(Debug)]
pub enum Decoded {
    Serde(serde_json::Value),
    Spanned(SpannedValue),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub path: PathBuf,
    pub decoder: Decoder,
}

impl Config {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            decoder: Decoder::default(),
        }
    }

    pub fn with_decoder(mut self, decoder: Decoder) -> Self {
        self.decoder = decoder;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub decoder: Decoder,
    /// Size of the document in bytes.
    pub bytes: usize,
    pub micros: u64,
}

impl Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Parsing time: {} microseconds", self.micros)
    }
}

/// Reads the whole file as UTF-8 text.
pub fn read_document(path: &Path) -> Result<String, HarnessError> {
    fs::read_to_string(path).map_err(|source| HarnessError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads and parses a file with [`crate::parse`].
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<SpannedValue, HarnessError> {
    let document = read_document(path.as_ref())?;

    parse(&document).map_err(|e| HarnessError::Decode(e.into()))
}

/// Times one decode of `text`.
pub fn measure(text: &str, decoder: Decoder) -> Result<Report, HarnessError> {
    let clock = Clock::new();

    let start = clock.now_us();
    let decoded = decoder.decode(text)?;
    let end = clock.now_us();

    drop(black_box(decoded));

    Ok(Report {
        decoder,
        bytes: text.len(),
        micros: end.saturating_sub(start),
    })
}

/// Reads the configured document, times its decode and writes the report
/// line to `out`.
pub fn run<W: Write>(config: &Config, out: &mut W) -> Result<Report, HarnessError> {
    let document = read_document(&config.path)?;

    debug!(
        path = %config.path.display(),
        bytes = document.len(),
        decoder = %config.decoder,
        "document loaded"
    );

    let report = measure(&document, config.decoder)?;

    debug!(micros = report.micros, "document decoded");

    writeln!(out, "{}", report).map_err(HarnessError::Write)?;

    Ok(report)
}
