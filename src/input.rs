use bytecount::num_chars;
use memchr::Memchr;
use nom::{
    error::{ErrorKind, ParseError},
    AsBytes, Compare, CompareResult, Err, IResult, InputIter, InputLength, InputTake,
    InputTakeAtPosition, Needed, Offset, Slice,
};
use std::{
    ops::{Range, RangeFrom, RangeFull, RangeTo},
    str::{CharIndices, Chars},
};

/// The text that is left to parse, along with where it starts in the
/// original document.
///
/// Lines and columns are 1-based, columns count chars rather than bytes.
#[derive(Clone, Debug, Copy)]
pub struct Input<'a> {
    data: &'a str,
    offset: usize,
    line: usize,
    col: usize,
}

impl<'a> Input<'a> {
    pub fn new(data: &'a str) -> Self {
        Self {
            data,
            offset: 0,
            line: 1,
            col: 1,
        }
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.col
    }

    /// Byte offset from the start of the document.
    pub fn byte_offset(&self) -> usize {
        self.offset
    }

    pub fn fragment(&self) -> &'a str {
        self.data
    }

    pub fn starts_with(&self, c: char) -> bool {
        self.data.starts_with(c)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Skips `count` bytes, moving the line/column counters over them.
    fn advance(&self, count: usize) -> Self {
        if count == 0 {
            return *self;
        }

        let consumed = &self.data.as_bytes()[..count];

        let mut lines = 0;
        let mut last_newline = None;
        for index in Memchr::new(b'\n', consumed) {
            lines += 1;
            last_newline = Some(index);
        }

        let col = match last_newline {
            None => self.col + num_chars(consumed),
            // A new line starts at column 1
            Some(index) => num_chars(&consumed[index + 1..]) + 1,
        };

        Self {
            data: &self.data[count..],
            offset: self.offset + count,
            line: self.line + lines,
            col,
        }
    }

    /// Keeps the same starting point but only the first `len` bytes.
    fn truncate(&self, len: usize) -> Self {
        Self {
            data: &self.data[..len],
            ..*self
        }
    }
}

impl<'a> AsBytes for Input<'a> {
    fn as_bytes(&self) -> &[u8] {
        self.data.as_bytes()
    }
}

impl<'a, 'b> Compare<&'b str> for Input<'a> {
    fn compare(&self, t: &'b str) -> CompareResult {
        self.data.compare(t)
    }

    fn compare_no_case(&self, t: &'b str) -> CompareResult {
        self.data.compare_no_case(t)
    }
}

impl<'a> InputIter for Input<'a> {
    type Item = char;
    type Iter = CharIndices<'a>;
    type IterElem = Chars<'a>;

    fn iter_indices(&self) -> Self::Iter {
        self.data.char_indices()
    }

    fn iter_elements(&self) -> Self::IterElem {
        self.data.chars()
    }

    fn position<P>(&self, predicate: P) -> Option<usize>
    where
        P: Fn(Self::Item) -> bool,
    {
        self.data.position(predicate)
    }

    fn slice_index(&self, count: usize) -> Result<usize, Needed> {
        self.data.slice_index(count)
    }
}

impl<'a> InputLength for Input<'a> {
    fn input_len(&self) -> usize {
        self.data.len()
    }
}

impl<'a> InputTake for Input<'a> {
    fn take(&self, count: usize) -> Self {
        self.truncate(count)
    }

    fn take_split(&self, count: usize) -> (Self, Self) {
        (self.advance(count), self.truncate(count))
    }
}

impl<'a> InputTakeAtPosition for Input<'a> {
    type Item = char;

    fn split_at_position<P, E: ParseError<Self>>(&self, predicate: P) -> IResult<Self, Self, E>
    where
        P: Fn(Self::Item) -> bool,
    {
        match self.data.position(predicate) {
            Some(n) => Ok(self.take_split(n)),
            None => Err(Err::Incomplete(Needed::new(1))),
        }
    }

    fn split_at_position1<P, E: ParseError<Self>>(
        &self,
        predicate: P,
        e: ErrorKind,
    ) -> IResult<Self, Self, E>
    where
        P: Fn(Self::Item) -> bool,
    {
        match self.data.position(predicate) {
            Some(0) => Err(Err::Error(E::from_error_kind(*self, e))),
            Some(n) => Ok(self.take_split(n)),
            None => Err(Err::Incomplete(Needed::new(1))),
        }
    }

    fn split_at_position_complete<P, E: ParseError<Self>>(
        &self,
        predicate: P,
    ) -> IResult<Self, Self, E>
    where
        P: Fn(Self::Item) -> bool,
    {
        match self.data.position(predicate) {
            Some(n) => Ok(self.take_split(n)),
            None => Ok(self.take_split(self.input_len())),
        }
    }

    fn split_at_position1_complete<P, E: ParseError<Self>>(
        &self,
        predicate: P,
        e: ErrorKind,
    ) -> IResult<Self, Self, E>
    where
        P: Fn(Self::Item) -> bool,
    {
        match self.data.position(predicate) {
            Some(0) => Err(Err::Error(E::from_error_kind(*self, e))),
            Some(n) => Ok(self.take_split(n)),
            None if self.data.is_empty() => Err(Err::Error(E::from_error_kind(*self, e))),
            None => Ok(self.take_split(self.input_len())),
        }
    }
}

impl<'a> Offset for Input<'a> {
    fn offset(&self, second: &Self) -> usize {
        second.byte_offset() - self.byte_offset()
    }
}

impl<'a> Slice<Range<usize>> for Input<'a> {
    fn slice(&self, range: Range<usize>) -> Self {
        self.advance(range.start).truncate(range.end - range.start)
    }
}

impl<'a> Slice<RangeTo<usize>> for Input<'a> {
    fn slice(&self, range: RangeTo<usize>) -> Self {
        self.truncate(range.end)
    }
}

impl<'a> Slice<RangeFrom<usize>> for Input<'a> {
    fn slice(&self, range: RangeFrom<usize>) -> Self {
        self.advance(range.start)
    }
}

impl<'a> Slice<RangeFull> for Input<'a> {
    fn slice(&self, _range: RangeFull) -> Self {
        *self
    }
}
