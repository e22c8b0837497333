use crate::{input::Input, value::Position};
use nom::error::{ErrorKind, ParseError};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Kind {
    #[error("the document is empty")]
    EmptyDocument,
    #[error("missing closing quote")]
    MissingQuote,
    /// An unknown escape or a raw control char.
    #[error("invalid string content '{0}'")]
    InvalidString(String),
    #[error("invalid unicode escape '{0}'")]
    InvalidHex(String),
    #[error("missing closing array bracket")]
    MissingArrayBracket,
    #[error("missing closing object bracket")]
    MissingObjectBracket,
    #[error("invalid key '{0}'")]
    InvalidKey(String),
    #[error("missing colon after key")]
    MissingColon,
    #[error("missing value")]
    MissingValue,
    #[error("trailing comma")]
    TrailingComma,
    #[error("missing comma or closing bracket")]
    MissingComma,
    #[error("nesting deeper than {0} levels")]
    TooDeep(usize),
    #[error("invalid number '{0}'")]
    InvalidNumber(String),
    #[error("invalid value '{0}'")]
    InvalidValue(String),
    #[error("unexpected characters after the root value: '{0}'")]
    CharsAfterRoot(String),
    #[error("unexpected input ({0:?})")]
    NomError(ErrorKind),
}

/// A parse failure and the part of the document it covers.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{kind} at line {}, column {}", .start.line, .start.col)]
pub struct Error {
    pub start: Position,
    pub end: Position,
    pub kind: Kind,
}

impl Error {
    pub fn new(start: Position, end: Position, kind: Kind) -> Self {
        Self { start, end, kind }
    }

    pub(crate) fn at(position: Position, kind: Kind) -> Self {
        Self::new(position.clone(), position, kind)
    }

    /// Errors produced by nom itself, before they are given a meaning.
    pub(crate) fn is_unmapped(&self) -> bool {
        matches!(self.kind, Kind::NomError(_))
    }
}

impl<'a> ParseError<Input<'a>> for Error {
    fn from_error_kind(input: Input<'a>, kind: ErrorKind) -> Self {
        Self::at(Position::from(input), Kind::NomError(kind))
    }

    fn append(_input: Input<'a>, _kind: ErrorKind, other: Self) -> Self {
        other
    }
}
