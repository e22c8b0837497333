use std::{fs, path::PathBuf};

use tempfile::TempDir;
use timed_json::{
    harness::{self, DecodeError, HarnessError},
    run, Config, Decoder,
};

const DECODERS: [Decoder; 2] = [Decoder::Serde, Decoder::Spanned];

fn document(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Returns the reported microseconds when `line` has the expected shape.
fn parse_report_line(line: &str) -> Option<u64> {
    line.strip_prefix("Parsing time: ")?
        .strip_suffix(" microseconds")?
        .parse()
        .ok()
}

#[test]
fn reports_a_single_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = document(
        &dir,
        "doc.json",
        r#"{"users": [{"name": "a", "age": 3}, {"name": "b", "age": 4.5}]}"#,
    );

    for decoder in DECODERS {
        let mut out = Vec::new();
        let report = run(&Config::new(&path).with_decoder(decoder), &mut out).unwrap();

        let out = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines.len(), 1, "{decoder}");
        assert!(out.ends_with('\n'));
        assert_eq!(parse_report_line(lines[0]), Some(report.micros));
        assert_eq!(report.decoder, decoder);
        assert_eq!(report.bytes, fs::metadata(&path).unwrap().len() as usize);
    }
}

#[test]
fn empty_object_still_reports_a_duration() {
    let dir = tempfile::tempdir().unwrap();
    let path = document(&dir, "empty.json", "{}");

    for decoder in DECODERS {
        let mut out = Vec::new();
        run(&Config::new(&path).with_decoder(decoder), &mut out).unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(parse_report_line(out.trim_end()).is_some(), "{out}");
    }
}

#[test]
fn missing_file_fails_before_any_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.json");

    let mut out = Vec::new();
    let error = run(&Config::new(&path), &mut out).unwrap_err();

    assert!(out.is_empty());
    match error {
        HarnessError::Read { path: failed, source } => {
            assert_eq!(failed, path);
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn malformed_document_fails_before_any_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = document(&dir, "malformed.json", r#"{"a":}"#);

    for decoder in DECODERS {
        let mut out = Vec::new();
        let error = run(&Config::new(&path).with_decoder(decoder), &mut out).unwrap_err();

        assert!(out.is_empty());
        match (decoder, error) {
            (Decoder::Serde, HarnessError::Decode(DecodeError::Serde(_))) => {}
            (Decoder::Spanned, HarnessError::Decode(DecodeError::Spanned(e))) => {
                assert_eq!(e.to_string(), "missing value at line 1, column 6");
            }
            (decoder, other) => panic!("unexpected error for {decoder}: {other}"),
        }
    }
}

#[test]
fn non_utf8_files_are_read_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("latin1.json");
    fs::write(&path, b"[\"caf\xe9\"]").unwrap();

    let mut out = Vec::new();
    let error = run(&Config::new(&path), &mut out).unwrap_err();

    assert!(out.is_empty());
    assert!(matches!(error, HarnessError::Read { .. }));
}

#[test]
fn repeated_runs_produce_identical_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = document(&dir, "doc.json", "[1, 2, 3]");
    let config = Config::new(&path);

    let mut first = Vec::new();
    let mut second = Vec::new();
    run(&config, &mut first).unwrap();
    run(&config, &mut second).unwrap();

    let first = String::from_utf8(first).unwrap();
    let second = String::from_utf8(second).unwrap();

    assert!(parse_report_line(first.trim_end()).is_some());
    assert!(parse_report_line(second.trim_end()).is_some());
}

#[test]
fn measure_only_times_the_decode() {
    let report = harness::measure("[true, false, null]", Decoder::Spanned).unwrap();

    assert_eq!(report.bytes, 19);
    assert_eq!(
        report.to_string(),
        format!("Parsing time: {} microseconds", report.micros)
    );
}

#[test]
fn serde_is_the_default_decoder() {
    assert_eq!(Config::new("doc.json").decoder, Decoder::Serde);
    assert_eq!(Decoder::default().to_string(), "serde");
    assert_eq!(Decoder::Spanned.name(), "spanned");
}

#[test]
fn deeply_nested_documents_are_decode_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = document(&dir, "deep.json", &"[".repeat(100_000));

    // Same stack as the CLI main thread
    let results = std::thread::Builder::new()
        .stack_size(8 << 20)
        .spawn(move || {
            DECODERS.map(|decoder| {
                let mut out = Vec::new();
                let result = run(&Config::new(&path).with_decoder(decoder), &mut out);
                (decoder, result, out)
            })
        })
        .unwrap()
        .join()
        .unwrap();

    for (decoder, result, out) in results {
        assert!(out.is_empty(), "{decoder}");
        assert!(
            matches!(result, Err(HarnessError::Decode(_))),
            "{decoder}: {result:?}"
        );
    }
}

#[test]
fn parse_file_reads_and_parses() {
    let dir = tempfile::tempdir().unwrap();
    let path = document(&dir, "doc.json", "{\n  \"list\": [1, 2]\n}");

    let root = timed_json::parse_file(&path).unwrap();
    assert_eq!(root.get_u64("list[1]"), Some(2));
    assert_eq!(root.get("list").unwrap().start.line, 2);

    let missing = timed_json::parse_file(dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(missing, HarnessError::Read { .. }));

    let malformed = document(&dir, "malformed.json", "[1 2]");
    match timed_json::parse_file(&malformed).unwrap_err() {
        HarnessError::Decode(DecodeError::Spanned(e)) => {
            assert_eq!(e.to_string(), "missing comma or closing bracket at line 1, column 4");
        }
        other => panic!("unexpected error: {other}"),
    }
}
