use crate::{Col, Cursor, Line, Offset};

/// The span of source text a token was scanned from.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRange<'a> {
    start: Cursor<'a>,
    end: Cursor<'a>,
}

impl<'a> From<(Cursor<'a>, Cursor<'a>)> for SourceRange<'a> {
    fn from((start, end): (Cursor<'a>, Cursor<'a>)) -> Self {
        Self::new(start, end)
    }
}

impl<'a> SourceRange<'a> {
    pub fn new(start: Cursor<'a>, end: Cursor<'a>) -> Self {
        assert!(std::ptr::eq(start.source, end.source));
        assert!(start.offset.0 <= end.offset.0);
        Self { start, end }
    }

    pub fn lexeme(&self) -> &'a str {
        self.start.slice_until(&self.end)
    }

    pub fn start(&self) -> &Cursor<'a> {
        &self.start
    }

    pub fn end(&self) -> &Cursor<'a> {
        &self.end
    }

    pub fn source(&self) -> &'a str {
        self.start.source
    }

    pub fn line(&self) -> Line {
        self.start.line()
    }

    pub fn col(&self) -> Col {
        self.start.col()
    }

    pub fn offset(&self) -> Offset {
        self.start.offset()
    }
}
