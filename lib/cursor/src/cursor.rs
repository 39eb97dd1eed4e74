use std::{fmt::Formatter, str::Chars};

mod source_range;
pub use source_range::*;

/// Char-level cursor over a source buffer. Cheap to clone, so the scanner
/// can remember the start of a lexeme and later slice it out with
/// [`Cursor::slice_until`].
#[derive(Clone)]
pub struct Cursor<'a> {
    source: &'a str,
    chars: Chars<'a>,
    line: Line,
    offset: Offset,
}

impl<'a> std::fmt::Debug for Cursor<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // The full source is usually too verbose, only print it with {:#?}
        if f.alternate() {
            f.debug_struct("Cursor")
                .field("line", &self.line)
                .field("col", &self.col())
                .field("offset", &self.offset)
                .field("source", &self.source)
                .finish()
        } else {
            f.debug_struct("Cursor")
                .field("line", &self.line)
                .field("col", &self.col())
                .finish()
        }
    }
}

impl<'a> PartialEq for Cursor<'a> {
    fn eq(&self, other: &Self) -> bool {
        (self.source, self.chars.as_str()) == (other.source, other.chars.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display)]
#[display(fmt = "{}", _0)]
pub struct Line(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display)]
#[display(fmt = "{}", _0)]
pub struct Col(pub usize);

/// Byte offset from the start of the source.
#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display)]
#[display(fmt = "{}", _0)]
pub struct Offset(pub usize);

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source, chars: source.chars(), line: Line(1), offset: Offset(0) }
    }

    pub fn line(&self) -> Line {
        self.line
    }

    pub fn offset(&self) -> Offset {
        self.offset
    }

    // O(n), only meant for error reporting.
    pub fn col(&self) -> Col {
        let consumed = &self.source[..self.offset.0];
        let col = match consumed.rfind('\n') {
            Some(newline) => consumed[newline + 1..].chars().count() + 1,
            None => consumed.chars().count() + 1,
        };
        Col(col)
    }

    pub fn peek(&self) -> Option<char> {
        self.chars.clone().next()
    }

    pub fn peek_next(&self) -> Option<char> {
        self.chars.clone().nth(1)
    }

    pub fn slice_until(&self, end: &Cursor<'a>) -> &'a str {
        assert!(std::ptr::eq(self.source, end.source));
        assert!(self.offset.0 <= end.offset.0);
        &self.source[self.offset.0..end.offset.0]
    }
}

impl<'a> From<&'a str> for Cursor<'a> {
    fn from(source: &'a str) -> Self {
        Self::new(source)
    }
}

impl<'a> Iterator for Cursor<'a> {
    type Item = char;

    fn next(&mut self) -> Option<Self::Item> {
        let c = self.chars.next()?;
        self.offset.0 += c.len_utf8();
        if c == '\n' {
            self.line.0 += 1;
        }
        Some(c)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn slice_until() {
        let mut cursor: Cursor = "ab\ncd\n\n".into();

        cursor.next(); // 'a'

        let start = cursor.clone();

        cursor.next(); // 'b'
        cursor.next(); // '\n'
        cursor.next(); // 'c'

        assert_eq!(start.slice_until(&cursor), "b\nc");
    }

    #[test]
    fn line_col_offset_accounting() {
        let mut cursor = Cursor::new("ab\ncd");

        assert_eq!((cursor.line(), cursor.col(), cursor.offset()), (Line(1), Col(1), Offset(0)));
        assert_eq!(cursor.peek(), Some('a'));
        assert_eq!(cursor.peek_next(), Some('b'));

        assert_eq!(cursor.next(), Some('a'));
        assert_eq!((cursor.line(), cursor.col(), cursor.offset()), (Line(1), Col(2), Offset(1)));

        assert_eq!(cursor.next(), Some('b'));
        assert_eq!(cursor.next(), Some('\n'));
        assert_eq!((cursor.line(), cursor.col(), cursor.offset()), (Line(2), Col(1), Offset(3)));

        assert_eq!(cursor.next(), Some('c'));
        assert_eq!((cursor.line(), cursor.col(), cursor.offset()), (Line(2), Col(2), Offset(4)));

        assert_eq!(cursor.next(), Some('d'));
        assert_eq!(cursor.peek(), None);
        assert_eq!(cursor.next(), None);
        assert_eq!((cursor.line(), cursor.col(), cursor.offset()), (Line(2), Col(3), Offset(5)));
    }

    #[test]
    fn empty_source() {
        let mut cursor: Cursor = "".into();
        assert_eq!(cursor.peek(), None);
        assert_eq!(cursor.peek_next(), None);
        assert_eq!(cursor.next(), None);
        assert_eq!((cursor.line(), cursor.col()), (Line(1), Col(1)));
    }

    #[test]
    fn multibyte_chars_advance_by_utf8_len() {
        let mut cursor = Cursor::new("é=1");
        assert_eq!(cursor.next(), Some('é'));
        assert_eq!(cursor.offset(), Offset(2));
        // Columns count chars, not bytes
        assert_eq!(cursor.col(), Col(2));

        let start = cursor.clone();
        cursor.next();
        assert_eq!(start.slice_until(&cursor), "=");
    }
}
