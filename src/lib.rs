#![forbid(unsafe_code)]
#![warn(clippy::all)]
#![allow(clippy::needless_doctest_main)]
//! This crate times how long a Json document takes to decode, and ships the
//! decoder it was written around: a Json parser that keeps the line and
//! column of every value.
//!
//! ## Timing a document
//!
//! The harness reads the file, takes a microsecond timestamp, decodes the
//! text once, takes another timestamp and writes a single line:
//!
//! ```text
//! Parsing time: 1234 microseconds
//! ```
//!
//! ```rust,no_run
//! use timed_json::{Config, Decoder};
//!
//! fn main() -> Result<(), timed_json::harness::HarnessError> {
//!     let config = Config::new("really-big-json-file.json").with_decoder(Decoder::Spanned);
//!
//!     let report = timed_json::run(&config, &mut std::io::stdout())?;
//!
//!     eprintln!("{} bytes decoded by {}", report.bytes, report.decoder);
//!     Ok(())
//! }
//! ```
//!
//! There is no warm-up and no repeated trials: one run, one measure.
//!
//! ## Parsing
//!
//! [`parse`] turns the text into a [`value::SpannedValue`]: the
//! [`value::Value`] itself plus the [`value::Position`] (1-based line and
//! column) of its first and last char. Errors carry the same positions.
//!
//! ```rust
//! use timed_json::parse;
//!
//! let parsed = parse("{\n  \"hello\": [1, 2.5, -3]\n}").unwrap();
//!
//! assert_eq!(parsed.get_f64("hello[1]"), Some(2.5));
//! assert_eq!(parsed.get("hello").unwrap().start.line, 2);
//!
//! let error = parse(r#"{"a":}"#).unwrap_err();
//! assert_eq!(error.to_string(), "missing value at line 1, column 6");
//! ```
//!
//! Parsed documents implement `serde::Serialize`, and [`writer`] prints them
//! back with any indentation:
//!
//! ```rust
//! let parsed = timed_json::parse(r#"{"hello": "world"}"#).unwrap();
//!
//! assert_eq!(serde_json::to_value(&parsed).unwrap()["hello"], "world");
//! assert_eq!(parsed.to_json_string(0), r#"{"hello":"world"}"#);
//! ```

mod input;
mod parser;
mod query;
mod ser;

pub mod bench;
pub mod error;
pub mod harness;
pub mod value;
pub mod writer;

pub use harness::{parse_file, run, Config, Decoder, Report};
pub use parser::{parse, RECURSION_LIMIT};
pub use query::Query;
