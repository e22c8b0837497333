//! Path lookups into a parsed document.
//!
//! A query is a chain of object keys and array indices, for instance
//! `.key1.innerKey`, `[0]` or `users[3].name`. The leading `.` is optional,
//! so `key` and `.key` are the same query. Keys can't be empty nor contain
//! `.` or `[`; [`Query`] reaches those.

use nom::{
    branch::alt,
    bytes::complete::take_till1,
    character::complete::{char, digit1},
    combinator::{all_consuming, map, map_res},
    multi::many1,
    sequence::{delimited, preceded},
    IResult,
};

use crate::value::{Array, Number, Object, SpannedValue, Value};

#[derive(Debug, PartialEq, Clone, Copy)]
enum Segment<'q> {
    Key(&'q str),
    Index(usize),
}

fn index(q: &str) -> IResult<&str, Segment<'_>> {
    map(
        delimited(
            char('['),
            map_res(digit1, |digits: &str| digits.parse::<usize>()),
            char(']'),
        ),
        Segment::Index,
    )(q)
}

fn is_separator(c: char) -> bool {
    c == '.' || c == '['
}

/// Keys are never empty, so `a.` and `a..b` are malformed.
fn key(q: &str) -> IResult<&str, Segment<'_>> {
    map(
        alt((
            preceded(char('.'), take_till1(is_separator)),
            take_till1(is_separator),
        )),
        Segment::Key,
    )(q)
}

/// `None` when the query is empty or malformed.
fn segments(query: &str) -> Option<Vec<Segment<'_>>> {
    all_consuming(many1(alt((index, key))))(query)
        .ok()
        .map(|(_, segments)| segments)
}

/// Step by step lookup, for keys the query syntax can't spell.
///
/// ```rust
/// let root = timed_json::parse(r#"{"a.b": [{"": true}]}"#).unwrap();
///
/// let found = root.query().key("a.b").index(0).key("").get();
/// assert_eq!(found.and_then(|v| v.value.as_bool()), Some(true));
/// assert!(root.query().index(0).get().is_none());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Query<'v> {
    node: Option<&'v SpannedValue>,
}

impl<'v> Query<'v> {
    /// Nothing is found past a value that is not an object.
    pub fn key(self, key: &str) -> Self {
        Self {
            node: self.node.and_then(|node| node.value.as_object()?.get(key)),
        }
    }

    /// Nothing is found past a value that is not an array.
    pub fn index(self, index: usize) -> Self {
        Self {
            node: self.node.and_then(|node| node.value.as_array()?.get(index)),
        }
    }

    pub fn get(self) -> Option<&'v SpannedValue> {
        self.node
    }
}

impl SpannedValue {
    pub fn query(&self) -> Query<'_> {
        Query { node: Some(self) }
    }

    /// Follows `query` from this value.
    ///
    /// Returns `None` when the query is malformed or when a step does not
    /// exist: a missing key, an index out of bounds, a key on something that
    /// is not an object or an index on something that is not an array.
    ///
    /// ```rust
    /// let root = timed_json::parse(r#"{"key1": {"inner": [1, 2]}}"#).unwrap();
    ///
    /// assert_eq!(root.get_u64(".key1.inner[1]"), Some(2));
    /// assert!(root.get("key1.missing").is_none());
    /// ```
    pub fn get(&self, query: &str) -> Option<&SpannedValue> {
        segments(query)?
            .into_iter()
            .try_fold(self, |node, segment| match (segment, &node.value) {
                (Segment::Key(key), Value::Object(object)) => object.get(key),
                (Segment::Index(index), Value::Array(array)) => array.get(index),
                _ => None,
            })
    }

    pub fn get_mut(&mut self, query: &str) -> Option<&mut SpannedValue> {
        segments(query)?
            .into_iter()
            .try_fold(self, |node, segment| match (segment, &mut node.value) {
                (Segment::Key(key), Value::Object(object)) => object.get_mut(key),
                (Segment::Index(index), Value::Array(array)) => array.get_mut(index),
                _ => None,
            })
    }

    pub fn get_str(&self, query: &str) -> Option<&str> {
        self.get(query)?.value.as_str()
    }

    pub fn get_number(&self, query: &str) -> Option<&Number> {
        self.get(query)?.value.as_number()
    }

    pub fn get_f64(&self, query: &str) -> Option<f64> {
        self.get(query)?.value.as_f64()
    }

    pub fn get_i64(&self, query: &str) -> Option<i64> {
        self.get(query)?.value.as_i64()
    }

    pub fn get_u64(&self, query: &str) -> Option<u64> {
        self.get(query)?.value.as_u64()
    }

    pub fn get_bool(&self, query: &str) -> Option<bool> {
        self.get(query)?.value.as_bool()
    }

    pub fn get_null(&self, query: &str) -> Option<()> {
        self.get(query)?.value.as_null()
    }

    pub fn get_array(&self, query: &str) -> Option<&Array> {
        self.get(query)?.value.as_array()
    }

    pub fn get_object(&self, query: &str) -> Option<&Object> {
        self.get(query)?.value.as_object()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_keys_and_indices() {
        assert_eq!(
            segments(".a.b[2][0].c"),
            Some(vec![
                Segment::Key("a"),
                Segment::Key("b"),
                Segment::Index(2),
                Segment::Index(0),
                Segment::Key("c"),
            ])
        );
        assert_eq!(segments("a"), segments(".a"));
        assert_eq!(segments("[7]"), Some(vec![Segment::Index(7)]));
    }

    #[test]
    fn rejects_malformed_queries() {
        assert_eq!(segments(""), None);
        assert_eq!(segments("[x]"), None);
        assert_eq!(segments("[1"), None);
        assert_eq!(segments("a[-1]"), None);
        assert_eq!(segments("a."), None);
        assert_eq!(segments("a..b"), None);
        assert_eq!(segments("."), None);
    }
}
