//! Turns values back into Json text.
//!
//! An indentation of `0` produces compact output, anything else puts every
//! member on its own line, indented by that many spaces per level.

use std::{fmt::Write as _, fs, io, path::Path};

use crate::{
    error::Error,
    parser::parse,
    value::{Number, SpannedValue, Value},
};

pub fn to_string(value: &Value, indent: usize) -> String {
    let mut out = String::new();
    write_value(&mut out, value, indent, 0);
    out
}

/// Parses `text` and writes it back with the given indentation.
///
/// ```rust
/// let pretty = timed_json::writer::format(r#"{"key": [1, {}]}"#, 2).unwrap();
///
/// assert_eq!(pretty, "{\n  \"key\": [\n    1,\n    {}\n  ]\n}");
/// ```
pub fn format(text: &str, indent: usize) -> Result<String, Error> {
    parse(text).map(|root| to_string(&root.value, indent))
}

pub fn to_file<P: AsRef<Path>>(value: &Value, path: P, indent: usize) -> io::Result<()> {
    fs::write(path, to_string(value, indent))
}

impl SpannedValue {
    pub fn to_json_string(&self, indent: usize) -> String {
        to_string(&self.value, indent)
    }
}

fn write_value(out: &mut String, value: &Value, indent: usize, depth: usize) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(bool) => out.push_str(if *bool { "true" } else { "false" }),
        Value::Number(num) => write_number(out, num),
        Value::String(str) => write_string(out, str),
        Value::Array(array) => {
            if array.is_empty() {
                out.push_str("[]");
                return;
            }

            out.push('[');
            for (n, item) in array.iter().enumerate() {
                if n > 0 {
                    out.push(',');
                }
                newline(out, indent, depth + 1);
                write_value(out, &item.value, indent, depth + 1);
            }
            newline(out, indent, depth);
            out.push(']');
        }
        Value::Object(obj) => {
            if obj.is_empty() {
                out.push_str("{}");
                return;
            }

            out.push('{');
            for (n, (key, item)) in obj.iter().enumerate() {
                if n > 0 {
                    out.push(',');
                }
                newline(out, indent, depth + 1);
                write_string(out, key);
                out.push_str(if indent == 0 { ":" } else { ": " });
                write_value(out, &item.value, indent, depth + 1);
            }
            newline(out, indent, depth);
            out.push('}');
        }
    }
}

fn newline(out: &mut String, indent: usize, depth: usize) {
    if indent == 0 {
        return;
    }

    out.push('\n');
    out.extend(std::iter::repeat(' ').take(indent * depth));
}

fn write_number(out: &mut String, num: &Number) {
    // Writing into a String cannot fail
    let _ = write!(out, "{}", num);
}

fn write_string(out: &mut String, str: &str) {
    out.push('"');
    for c in str.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\x08' => out.push_str("\\b"),
            '\x0C' => out.push_str("\\f"),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}
