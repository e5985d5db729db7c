//! Range primitives over an immutable expression string.
//!
//! Every production works on a half-open `[start, end)` byte range of the
//! same input. The grammar's delimiters are all ASCII, so any offset found by
//! searching for a delimiter is also a `char` boundary.

/// A half-open `[start, end)` byte range of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The span with one byte removed from each end.
    pub fn inner(&self) -> Span {
        if self.len() < 2 {
            return Span::new(self.start, self.start);
        }
        Span::new(self.start + 1, self.end - 1)
    }
}

pub struct Text<'q> {
    query: &'q str,
}

impl<'q> Text<'q> {
    pub fn new(query: &'q str) -> Self {
        Text { query }
    }

    pub fn full(&self) -> Span {
        Span::new(0, self.query.len())
    }

    /// The text of `span`, or `None` when the span is out of bounds or not on
    /// `char` boundaries.
    pub fn slice(&self, span: Span) -> Option<&'q str> {
        if span.start > span.end {
            return None;
        }
        self.query.get(span.start..span.end)
    }

    pub fn byte_at(&self, position: usize) -> Option<u8> {
        self.query.as_bytes().get(position).copied()
    }

    /// Move `start` past spaces, stopping at the last byte of the span.
    pub fn trim_left(&self, span: Span) -> Span {
        let mut start = span.start;
        while start + 1 < span.end && self.byte_at(start) == Some(b' ') {
            start += 1;
        }
        Span::new(start, span.end)
    }

    /// Move `end` back past spaces, never leaving fewer than one byte.
    pub fn trim_right(&self, span: Span) -> Span {
        let mut end = span.end;
        while span.start + 1 < end && self.byte_at(end - 1) == Some(b' ') {
            end -= 1;
        }
        Span::new(span.start, end)
    }

    pub fn trim(&self, span: Span) -> Span {
        self.trim_right(self.trim_left(span))
    }

    /// Every offset in `span` where `delimiter` starts and fits entirely
    /// inside the span, in ascending order. Candidate starts may overlap.
    pub fn find_all(&self, span: Span, delimiter: &str) -> Vec<usize> {
        let bytes = self.query.as_bytes();
        let needle = delimiter.as_bytes();
        let end = span.end.min(bytes.len());

        if needle.is_empty() || span.start >= end || end - span.start < needle.len() {
            return Vec::new();
        }

        (span.start..=end - needle.len())
            .filter(|&i| &bytes[i..i + needle.len()] == needle)
            .collect()
    }

    /// The first offset of `ch` inside `span`.
    pub fn find(&self, span: Span, ch: u8) -> Option<usize> {
        let end = span.end.min(self.query.len());
        (span.start..end).find(|&i| self.byte_at(i) == Some(ch))
    }

    pub fn starts_with(&self, span: Span, ch: u8) -> bool {
        !span.is_empty() && self.byte_at(span.start) == Some(ch)
    }

    pub fn ends_with(&self, span: Span, ch: u8) -> bool {
        !span.is_empty() && self.byte_at(span.end - 1) == Some(ch)
    }

    pub fn starts_and_ends_with(&self, span: Span, first: u8, last: u8) -> bool {
        span.len() >= 2 && self.starts_with(span, first) && self.ends_with(span, last)
    }
}
