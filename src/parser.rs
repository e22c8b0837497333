use crate::error::{Error, Kind};
use crate::input::Input;
use crate::value::{Array, Number, Object, Position, SpannedValue, Value};
use nom::{
    branch::alt,
    bytes::complete::{tag, take_till, take_while_m_n},
    character::complete::{anychar, char, digit0, digit1, multispace0, none_of, one_of, satisfy},
    combinator::{all_consuming, cut, opt, recognize},
    error::{ErrorKind, ParseError},
    multi::{fold_many0, separated_list1},
    sequence::{pair, preceded, terminated, tuple},
    Err, IResult,
};
use tracing::trace;

pub type Span<'a> = Input<'a>;

pub type Result<'a, R> = IResult<Span<'a>, R, Error>;
pub type ParseResult = std::result::Result<SpannedValue, Error>;

/// How many chars of unexpected input are quoted back in an error.
const EXCERPT_LEN: usize = 32;

/// Arrays and objects nested deeper than this are rejected.
pub const RECURSION_LIMIT: usize = 128;

fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

fn is_delimiter(c: char, is_key: bool) -> bool {
    is_space(c) || matches!(c, ',' | ']' | '}') || (is_key && c == ':')
}

fn take_until_delimiter(i: Span<'_>, is_key: bool) -> Result<'_, &str> {
    take_till(move |c| is_delimiter(c, is_key))(i).map(|(i, found)| (i, found.fragment()))
}

fn excerpt(s: &str) -> String {
    s.chars().take(EXCERPT_LEN).collect()
}

/// Gives a meaning to errors nom raised while looking for a closing char.
fn unclosed(e: Err<Error>, start: &Position, kind: Kind) -> Err<Error> {
    match e {
        Err::Error(mut e) | Err::Failure(mut e) if e.is_unmapped() => {
            e.start = start.clone();
            e.kind = kind;
            Err::Failure(e)
        }
        e => e,
    }
}

/// `true`, `false` and `null`, the first char being already consumed.
fn literal<'a>(
    i: Span<'a>,
    start: &Position,
    first: char,
    rest: &str,
    parsed: Value,
) -> Result<'a, Value> {
    match tag::<_, _, Error>(rest)(i) {
        Ok((i, _)) => Ok((i, parsed)),
        Err(_) => {
            let (i, tail) = take_until_delimiter(i, false)?;

            Err(Err::Failure(Error::new(
                start.clone(),
                Position::end_of(i),
                Kind::InvalidValue(format!("{}{}", first, tail)),
            )))
        }
    }
}

fn u16_hex(i: Span<'_>) -> Result<'_, u16> {
    let invalid = || {
        let start = Position::from(i);
        let mut end = start.clone();
        end.col += 3;

        Err::Failure(Error::new(
            start,
            end,
            Kind::InvalidHex(i.fragment().chars().take(4).collect()),
        ))
    };

    let (rest, digits) = take_while_m_n::<_, _, Error>(4, 4, |c: char| c.is_ascii_hexdigit())(i)
        .map_err(|_| invalid())?;
    let code = u16::from_str_radix(digits.fragment(), 16).map_err(|_| invalid())?;

    Ok((rest, code))
}

fn unicode_escape(i: Span<'_>) -> Result<'_, char> {
    let start = Position::from(i);
    let (rest, high) = u16_hex(i)?;

    let unpaired = |at: Span| {
        Err::Failure(Error::new(
            start.clone(),
            Position::end_of(at),
            Kind::InvalidHex(format!("{:04X}", high)),
        ))
    };

    let (rest, code) = match high {
        // See https://en.wikipedia.org/wiki/UTF-16#Code_points_from_U+010000_to_U+10FFFF for details
        0xD800..=0xDBFF => {
            let (rest, low) =
                preceded(tag("\\u"), u16_hex)(rest).map_err(|_: Err<Error>| unpaired(rest))?;
            if !(0xDC00..=0xDFFF).contains(&low) {
                return Err(unpaired(rest));
            }
            let high_ten = (high as u32) - 0xD800;
            let low_ten = (low as u32) - 0xDC00;
            (rest, (high_ten << 10) + low_ten + 0x10000)
        }
        _ => (rest, high as u32),
    };

    match std::char::from_u32(code) {
        Some(c) => Ok((rest, c)),
        // Lone low surrogate
        None => Err(unpaired(rest)),
    }
}

fn parse_char(i: Span<'_>) -> Result<'_, char> {
    let (rest, c) = none_of("\"")(i)?;
    let start = Position::from(i);

    if c < '\u{20}' {
        return Err(Err::Failure(Error::at(
            start,
            Kind::InvalidString(c.escape_default().to_string()),
        )));
    }

    if c != '\\' {
        return Ok((rest, c));
    }

    let (after, escaped) = anychar(rest)?;

    let c = match escaped {
        '"' | '\\' | '/' => escaped,
        'b' => '\x08',
        'f' => '\x0C',
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        'u' => return cut(unicode_escape)(after),
        other => {
            return Err(Err::Failure(Error::new(
                start,
                Position::end_of(after),
                Kind::InvalidString(format!("\\{}", other)),
            )))
        }
    };

    Ok((after, c))
}

/// The content of a string, the opening quote being already consumed.
fn string<'a>(i: Span<'a>, start: &Position) -> Result<'a, String> {
    terminated(
        fold_many0(parse_char, String::new, |mut string, c| {
            string.push(c);
            string
        }),
        cut(char('"')),
    )(i)
    .map_err(|e| unclosed(e, start, Kind::MissingQuote))
}

fn number_literal(s: &str) -> IResult<&str, &str> {
    recognize(tuple((
        opt(char('-')),
        alt((
            tag("0"),
            recognize(pair(satisfy(|c| ('1'..='9').contains(&c)), digit0)),
        )),
        opt(pair(char('.'), digit1)),
        opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
    )))(s)
}

/// Exponent notation without a fraction stays an integer when it can.
fn integral(float: f64, negative: bool) -> Option<Number> {
    if !float.is_finite() || float.fract() != 0.0 {
        return None;
    }

    if negative {
        (float >= i64::MIN as f64 && float < i64::MAX as f64).then(|| Number::NegInt(float as i64))
    } else {
        (float >= 0.0 && float < u64::MAX as f64).then(|| Number::PosInt(float as u64))
    }
}

fn to_number(literal: &str) -> Option<Number> {
    all_consuming(number_literal)(literal).ok()?;

    let negative = literal.starts_with('-');
    let fraction = literal.contains('.');
    let exponent = literal.contains(|c: char| c == 'e' || c == 'E');

    if !fraction && !exponent {
        let int = if negative {
            literal.parse().map(Number::NegInt).ok()
        } else {
            literal.parse().map(Number::PosInt).ok()
        };

        if int.is_some() {
            return int;
        }
    }

    // Too big integers end up as floats, values out of the f64 range are rejected
    let float = literal.parse::<f64>().ok().filter(|float| float.is_finite())?;

    if exponent && !fraction {
        if let Some(int) = integral(float, negative) {
            return Some(int);
        }
    }

    Some(Number::Float(float))
}

fn number<'a>(i: Span<'a>, start: &Position, first: char) -> Result<'a, Number> {
    let (i, tail) = take_until_delimiter(i, false)?;
    let literal = format!("{}{}", first, tail);

    match to_number(&literal) {
        Some(number) => Ok((i, number)),
        None => Err(Err::Failure(Error::new(
            start.clone(),
            Position::end_of(i),
            Kind::InvalidNumber(literal),
        ))),
    }
}

/// Consumes the closing char of a container whose members were all parsed.
fn close<'a>(i: Span<'a>, start: &Position, closing: char, missing: Kind) -> Result<'a, ()> {
    let (i, _) = multispace0(i)?;

    // A comma is only left behind when the input ends right after it
    if i.is_empty() || i.starts_with(',') {
        return Err(Err::Failure(Error::at(start.clone(), missing)));
    }

    if !i.starts_with(closing) {
        return Err(Err::Failure(Error::at(Position::from(i), Kind::MissingComma)));
    }

    let (i, _) = anychar(i)?;

    Ok((i, ()))
}

fn array<'a>(i: Span<'a>, start: &Position, depth: usize) -> Result<'a, Array> {
    let (i, _) = multispace0(i)?;

    if i.starts_with(']') {
        let (i, _) = anychar(i)?;
        return Ok((i, Array::new()));
    }

    let (i, items) = separated_list1(preceded(multispace0, char(',')), |i: Span<'a>| {
        json_value(i, depth)
    })(i)
    .map_err(|e| unclosed(e, start, Kind::MissingArrayBracket))?;

    let (i, _) = close(i, start, ']', Kind::MissingArrayBracket)?;

    Ok((i, items))
}

fn key_value(i: Span<'_>, depth: usize) -> Result<'_, (String, SpannedValue)> {
    let (i, _) = multispace0(i)?;
    let key_start = Position::from(i);

    if i.is_empty() {
        // Lets the object report its missing bracket
        return Err(Err::Error(Error::from_error_kind(i, ErrorKind::Eof)));
    }

    let (i, key) = match char::<_, Error>('"')(i) {
        Ok((i, _)) => string(i, &key_start)?,
        Err(_) if i.starts_with('}') => {
            return Err(Err::Failure(Error::at(key_start, Kind::TrailingComma)));
        }
        Err(_) => {
            let (rest, key) = take_until_delimiter(i, true)?;

            return Err(Err::Failure(Error::new(
                key_start,
                Position::end_of(rest),
                Kind::InvalidKey(excerpt(key)),
            )));
        }
    };

    let (i, _) = cut(preceded(multispace0, char(':')))(i).map_err(|e: Err<Error>| match e {
        Err::Failure(e) => Err::Failure(Error::at(e.start, Kind::MissingColon)),
        e => e,
    })?;

    let (i, value) = json_value(i, depth)?;

    Ok((i, (key, value)))
}

fn object<'a>(i: Span<'a>, start: &Position, depth: usize) -> Result<'a, Object> {
    let (i, _) = multispace0(i)?;

    if i.starts_with('}') {
        let (i, _) = anychar(i)?;
        return Ok((i, Object::new()));
    }

    let (i, members) = separated_list1(preceded(multispace0, char(',')), |i: Span<'a>| {
        key_value(i, depth)
    })(i)
    .map_err(|e| unclosed(e, start, Kind::MissingObjectBracket))?;

    let (i, _) = close(i, start, '}', Kind::MissingObjectBracket)?;

    // On duplicated keys the last value wins
    Ok((i, members.into_iter().collect()))
}

/// `depth` is the number of containers around the value.
fn json_value(i: Span<'_>, depth: usize) -> Result<'_, SpannedValue> {
    let (i, _) = multispace0(i)?;

    let start = Position::from(i);

    let (i, first_char) = anychar(i)?;

    if matches!(first_char, '{' | '[') && depth >= RECURSION_LIMIT {
        return Err(Err::Failure(Error::at(start, Kind::TooDeep(RECURSION_LIMIT))));
    }

    let (i, value) = match first_char {
        '{' => object(i, &start, depth + 1).map(|(i, object)| (i, Value::Object(object))),
        '[' => array(i, &start, depth + 1).map(|(i, array)| (i, Value::Array(array))),
        '"' => string(i, &start).map(|(i, string)| (i, Value::String(string))),
        '-' | '0'..='9' => {
            number(i, &start, first_char).map(|(i, number)| (i, Value::Number(number)))
        }
        't' => literal(i, &start, 't', "rue", Value::Bool(true)),
        'f' => literal(i, &start, 'f', "alse", Value::Bool(false)),
        'n' => literal(i, &start, 'n', "ull", Value::Null),
        ',' | ']' | '}' | ':' => Err(Err::Failure(Error::at(start.clone(), Kind::MissingValue))),
        c => {
            let (i, tail) = take_until_delimiter(i, false)?;

            Err(Err::Failure(Error::new(
                start.clone(),
                Position::end_of(i),
                Kind::InvalidValue(excerpt(&format!("{}{}", c, tail))),
            )))
        }
    }?;

    let end = Position::end_of(i);

    Ok((i, SpannedValue { start, end, value }))
}

fn end_chars(i: Span<'_>) -> std::result::Result<(), Error> {
    let (rest, _) = unwrap_nom_error(multispace0(i))?;

    if rest.is_empty() {
        return Ok(());
    }

    let (end, _) = unwrap_nom_error(take_till(|_: char| false)(rest))?;

    Err(Error::new(
        Position::from(rest),
        Position::end_of(end),
        Kind::CharsAfterRoot(excerpt(rest.fragment())),
    ))
}

fn unwrap_nom_error<T>(value: Result<'_, T>) -> std::result::Result<(Span<'_>, T), Error> {
    match value {
        Ok(v) => Ok(v),
        Err(Err::Error(e)) | Err(Err::Failure(e)) => Err(e),
        // Only complete combinators are used
        Err(Err::Incomplete(_)) => Err(Error::at(
            Position::default(),
            Kind::NomError(ErrorKind::Complete),
        )),
    }
}

/// Parses a whole document into a [`SpannedValue`].
///
/// Any Json value is accepted at the root, surrounded by optional
/// whitespace. Containers nest at most [`RECURSION_LIMIT`] levels deep.
pub fn parse(s: &str) -> ParseResult {
    trace!(bytes = s.len(), "parsing json document");

    let span = Span::new(s);

    if s.chars().all(is_space) {
        return Err(Error::at(Position::from(span), Kind::EmptyDocument));
    }

    let (i, value) = unwrap_nom_error(json_value(span, 0))?;

    end_chars(i)?;

    Ok(value)
}
