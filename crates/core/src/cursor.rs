//! Byte cursor over the raw source buffer.
//!
//! Line breaks are counted as two independent tallies, one for `\n` and one
//! for `\r`; the reported line is the larger tally plus one. A `\r\n` pair
//! therefore counts once on each tally and still yields a single line.

/// Position in the source: byte offset plus the two line-break tallies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub offset: usize,
    pub newlines: u32,
    pub returns: u32,
}

impl Cursor {
    /// 1-based line of the current offset.
    pub fn line(&self) -> u32 {
        self.newlines.max(self.returns) + 1
    }

    fn record(&mut self, byte: u8) {
        match byte {
            b'\n' => self.newlines += 1,
            b'\r' => self.returns += 1,
            _ => {}
        }
    }
}

/// Read primitives over a source buffer. Offsets are byte offsets; the
/// grammar only ever stops on ASCII bytes so slices stay on char boundaries.
#[derive(Debug, Clone)]
pub struct Scanner<'src> {
    src: &'src str,
    pub(crate) cursor: Cursor,
}

impl<'src> Scanner<'src> {
    pub fn new(src: &'src str) -> Self {
        Scanner {
            src,
            cursor: Cursor::default(),
        }
    }

    pub fn source(&self) -> &'src str {
        self.src
    }

    pub fn offset(&self) -> usize {
        self.cursor.offset
    }

    pub fn line(&self) -> u32 {
        self.cursor.line()
    }

    pub fn at_end(&self) -> bool {
        self.cursor.offset >= self.src.len()
    }

    /// Byte at `offset + ahead`, if any.
    pub fn peek_at(&self, ahead: usize) -> Option<u8> {
        self.src.as_bytes().get(self.cursor.offset + ahead).copied()
    }

    pub fn peek(&self) -> Option<u8> {
        self.peek_at(0)
    }

    /// True when the remaining input starts with `text`.
    pub fn starts_with(&self, text: &str) -> bool {
        self.rest().starts_with(text)
    }

    pub fn rest(&self) -> &'src str {
        self.src.get(self.cursor.offset..).unwrap_or("")
    }

    /// Advance by `n` bytes (clamped to the end), recording line breaks.
    pub fn advance(&mut self, n: usize) {
        let end = (self.cursor.offset + n).min(self.src.len());
        for &byte in &self.src.as_bytes()[self.cursor.offset..end] {
            self.cursor.record(byte);
        }
        self.cursor.offset = end;
    }

    /// Advance while `pred` holds and return the consumed slice.
    pub fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> &'src str {
        let start = self.cursor.offset;
        let mut len = 0;
        while self.peek_at(len).is_some_and(&pred) {
            len += 1;
        }
        self.advance(len);
        &self.src[start..start + len]
    }

    /// Source slice between two byte offsets.
    pub fn slice(&self, start: usize, end: usize) -> &'src str {
        self.src.get(start..end).unwrap_or("")
    }

    /// Up to `width` characters starting at `offset`.
    pub fn excerpt(&self, offset: usize, width: usize) -> String {
        self.src
            .get(offset..)
            .unwrap_or("")
            .chars()
            .take(width)
            .collect()
    }

    /// Restore a previously saved position.
    pub fn reset(&mut self, cursor: Cursor) {
        self.cursor = cursor;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_uses_larger_tally() {
        let mut s = Scanner::new("a\r\nb\r\nc");
        s.advance(6);
        assert_eq!(s.cursor.newlines, 2);
        assert_eq!(s.cursor.returns, 2);
        assert_eq!(s.line(), 3);
    }

    #[test]
    fn lone_carriage_returns_count_as_breaks() {
        let mut s = Scanner::new("a\rb\rc");
        s.advance(4);
        assert_eq!(s.line(), 3);
    }

    #[test]
    fn mixed_endings_undercount() {
        // One '\n' and one '\r' on separate lines read as a single break.
        let mut s = Scanner::new("a\nb\rc");
        s.advance(4);
        assert_eq!(s.line(), 2);
    }

    #[test]
    fn advance_clamps_to_end() {
        let mut s = Scanner::new("ab");
        s.advance(10);
        assert!(s.at_end());
        assert_eq!(s.offset(), 2);
        assert_eq!(s.peek(), None);
    }

    #[test]
    fn take_while_returns_consumed_slice() {
        let mut s = Scanner::new("abc123 rest");
        let word = s.take_while(|b| b.is_ascii_alphanumeric());
        assert_eq!(word, "abc123");
        assert_eq!(s.peek(), Some(b' '));
    }

    #[test]
    fn excerpt_counts_characters_not_bytes() {
        let s = Scanner::new("é1234");
        assert_eq!(s.excerpt(0, 2), "é1");
    }
}
