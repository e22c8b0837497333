use std::fmt::{self, Display};

use indexmap::IndexMap;

use crate::input::Input;

pub type Object = IndexMap<String, SpannedValue>;
pub type Array = Vec<SpannedValue>;

#[derive(Debug, PartialEq, Clone)]
pub enum Number {
    PosInt(u64),
    NegInt(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(&self) -> f64 {
        match *self {
            Self::PosInt(num) => num as f64,
            Self::NegInt(num) => num as f64,
            Self::Float(num) => num,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Self::PosInt(num) => i64::try_from(num).ok(),
            Self::NegInt(num) => Some(num),
            Self::Float(_) => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            Self::PosInt(num) => Some(num),
            _ => None,
        }
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PosInt(num) => write!(f, "{}", num),
            Self::NegInt(num) => write!(f, "{}", num),
            Self::Float(num) if num.is_finite() => write!(f, "{}", num),
            Self::Float(_) => f.write_str("null"),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum Value {
    Null,
    Number(Number),
    String(String),
    Bool(bool),
    Array(Array),
    Object(Object),
}

impl Display for Value {
    /// Compact Json, see [`crate::writer::to_string`] for indented output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::writer::to_string(self, 0))
    }
}

impl Value {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Bool(_) => "bool",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(str) => Some(str),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Self::Number(num) => Some(num),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.as_number().map(Number::as_f64)
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_number().and_then(Number::as_i64)
    }

    pub fn as_u64(&self) -> Option<u64> {
        self.as_number().and_then(Number::as_u64)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(bool) => Some(*bool),
            _ => None,
        }
    }

    pub fn as_null(&self) -> Option<()> {
        match self {
            Self::Null => Some(()),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Self::Array(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Self::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn unwrap_null(&self) {
        self.as_null().unwrap_or_else(|| self.mismatch("null"))
    }

    pub fn unwrap_string(&self) -> &str {
        self.as_str().unwrap_or_else(|| self.mismatch("string"))
    }

    pub fn unwrap_number(&self) -> &Number {
        self.as_number().unwrap_or_else(|| self.mismatch("number"))
    }

    pub fn unwrap_bool(&self) -> bool {
        self.as_bool().unwrap_or_else(|| self.mismatch("bool"))
    }

    pub fn unwrap_array(&self) -> &Array {
        self.as_array().unwrap_or_else(|| self.mismatch("array"))
    }

    pub fn unwrap_object(&self) -> &Object {
        self.as_object().unwrap_or_else(|| self.mismatch("object"))
    }

    fn mismatch(&self, expected: &str) -> ! {
        panic!(
            "Try to get {}, but value is a {}: {}",
            expected,
            self.kind_name(),
            self
        )
    }
}

/// 1-based line and column (in chars) inside the parsed document.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct Position {
    pub col: usize,
    pub line: usize,
}

impl Position {
    /// Position of the char right before the input, which is where a value
    /// that was just consumed ends.
    pub(crate) fn end_of(input: Input) -> Self {
        Self {
            col: input.column().saturating_sub(1).max(1),
            line: input.line(),
        }
    }
}

impl<'a> From<Input<'a>> for Position {
    fn from(input: Input<'a>) -> Self {
        Self {
            col: input.column(),
            line: input.line(),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct SpannedValue {
    pub value: Value,
    pub start: Position,
    pub end: Position,
}

impl Display for SpannedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}
