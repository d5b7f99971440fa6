//! Character cursor over the decoded text.
//!
//! Wraps the source string with a byte position plus line/column counters.
//! Unlike a generic text cursor, line accounting here follows the KDL
//! newline class: CR, LF, NEL, LS, PS, and FF all open a new line, and a
//! CRLF pair opens exactly one.

use crate::unicode::is_newline;

/// A UTF-8 cursor with KDL-aware line/column tracking.
///
/// Lines and columns are 1-based; columns count code points and reset
/// after every newline-class scalar.
pub struct Cursor<'a> {
    source: &'a str,
    /// Byte offset of the next character.
    position: usize,
    line: u32,
    column: u32,
    /// Set after consuming a CR, so a following LF completes the CRLF
    /// pair instead of opening another line.
    pending_crlf: bool,
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            position: 0,
            line: 1,
            column: 1,
            pending_crlf: false,
        }
    }

    /// The character under the cursor, or `'\0'` at end of input.
    pub fn current_char(&self) -> char {
        self.source[self.position..].chars().next().unwrap_or('\0')
    }

    /// The character `offset` code points ahead, or `'\0'` past the end.
    ///
    /// # Example
    ///
    /// ```
    /// use kudl_lex::cursor::Cursor;
    ///
    /// let cursor = Cursor::new("/-x");
    /// assert_eq!(cursor.peek_char(1), '-');
    /// assert_eq!(cursor.peek_char(9), '\0');
    /// ```
    pub fn peek_char(&self, offset: usize) -> char {
        self.source[self.position..]
            .chars()
            .nth(offset)
            .unwrap_or('\0')
    }

    /// True when the unconsumed input begins with `pat`.
    pub fn starts_with(&self, pat: &str) -> bool {
        self.source[self.position..].starts_with(pat)
    }

    /// Consumes one character, updating the line/column counters.
    #[inline]
    pub fn advance(&mut self) {
        let Some(c) = self.source[self.position..].chars().next() else {
            return;
        };
        self.position += c.len_utf8();
        if is_newline(c) {
            if !(c == '\n' && self.pending_crlf) {
                self.line += 1;
            }
            self.column = 1;
            self.pending_crlf = c == '\r';
        } else {
            self.column += 1;
            self.pending_crlf = false;
        }
    }

    /// Consumes up to `count` characters.
    pub fn advance_n(&mut self, count: usize) {
        for _ in 0..count {
            if self.is_at_end() {
                break;
            }
            self.advance();
        }
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.source.len()
    }

    /// Consumes `expected` if it is the current character.
    pub fn match_char(&mut self, expected: char) -> bool {
        if !self.is_at_end() && self.current_char() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// The source text between `start` and the cursor.
    pub fn slice_from(&self, start: usize) -> &'a str {
        &self.source[start..self.position]
    }

    /// The unconsumed tail of the source.
    pub fn remaining(&self) -> &'a str {
        &self.source[self.position..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_tracks_columns_per_code_point() {
        let mut cursor = Cursor::new("αβc");
        cursor.advance();
        cursor.advance();
        assert_eq!(cursor.current_char(), 'c');
        assert_eq!(cursor.position(), 4);
        assert_eq!(cursor.column(), 3);
    }

    #[test]
    fn test_crlf_opens_one_line() {
        let mut cursor = Cursor::new("a\r\nb");
        cursor.advance_n(3);
        assert_eq!(cursor.line(), 2);
        assert_eq!(cursor.column(), 1);
        cursor.advance();
        assert_eq!((cursor.line(), cursor.column()), (2, 2));
    }

    #[test]
    fn test_cr_cr_lf_opens_two_lines() {
        let mut cursor = Cursor::new("\r\r\n\n");
        cursor.advance();
        assert_eq!(cursor.line(), 2);
        cursor.advance();
        assert_eq!(cursor.line(), 3);
        cursor.advance(); // pairs with the second CR
        assert_eq!(cursor.line(), 3);
        cursor.advance();
        assert_eq!(cursor.line(), 4);
    }

    #[test]
    fn test_unicode_newline_class_advances_lines() {
        let mut cursor = Cursor::new("a\u{2028}b\u{0C}c\u{85}");
        cursor.advance_n(6);
        assert_eq!(cursor.line(), 4);
        assert!(cursor.is_at_end());
    }

    #[test]
    fn test_vertical_tab_is_not_a_newline() {
        let mut cursor = Cursor::new("a\u{0B}b");
        cursor.advance_n(2);
        assert_eq!(cursor.line(), 1);
        assert_eq!(cursor.column(), 3);
    }

    #[test]
    fn test_match_char_consumes_only_on_match() {
        let mut cursor = Cursor::new("u{");
        assert!(!cursor.match_char('{'));
        assert!(cursor.match_char('u'));
        assert!(cursor.match_char('{'));
        assert!(!cursor.match_char('{'));
    }

    #[test]
    fn test_slice_and_remaining() {
        let mut cursor = Cursor::new("node 1");
        let start = cursor.position();
        cursor.advance_n(4);
        assert_eq!(cursor.slice_from(start), "node");
        assert_eq!(cursor.remaining(), " 1");
    }

    #[test]
    fn test_empty_input() {
        let mut cursor = Cursor::new("");
        assert!(cursor.is_at_end());
        assert_eq!(cursor.current_char(), '\0');
        cursor.advance();
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_starts_with_and_peek() {
        let cursor = Cursor::new("\"\"\"#");
        assert!(cursor.starts_with("\"\"\""));
        assert_eq!(cursor.peek_char(3), '#');
    }
}
