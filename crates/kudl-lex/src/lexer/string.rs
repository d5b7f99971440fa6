//! String lexing.
//!
//! This module handles dquote strings (single and multi-line, with escape
//! sequences) and raw strings delimited by `#` runs (no escapes). Both
//! multi-line forms share the dedent post-processor in `dedent.rs`.

use crate::error::{LexError, LexErrorKind};
use crate::lexer::dedent::{dedent, MultilineKind, StrChunk};
use crate::token::{Token, TokenWithSpan};
use crate::unicode::{is_bom, is_direction_control, is_newline, is_space};
use crate::Tokenizer;

/// Scalars that may not appear literally inside any string body. Tabs and
/// other space-like controls are fine; newlines are judged by the caller
/// (legal in multi-line bodies only).
fn is_string_banned(c: char) -> bool {
    ((c as u32) < 0x20 && !is_space(c) && !is_newline(c))
        || c == '\u{7F}'
        || is_direction_control(c)
        || is_bom(c)
}

impl<'a> Tokenizer<'a> {
    /// Lexes a dquote string, single or multi-line.
    ///
    /// `"""` followed by a newline opens a multi-line string; a lone `"`
    /// opens a single-line string. `"""` not followed by a newline is
    /// malformed.
    pub(super) fn lex_dquote_string(&mut self) -> Result<Option<TokenWithSpan>, LexError> {
        if self.cursor.starts_with("\"\"\"") {
            self.cursor.advance_n(3);
            let text = self.lex_multiline_body(0)?;
            self.emit(Token::DquoteString(text))
        } else {
            self.cursor.advance();
            let text = self.lex_single_line_dquote()?;
            self.emit(Token::DquoteString(text))
        }
    }

    /// Lexes a raw string opened by a run of `#` characters.
    ///
    /// `N` leading hashes demand exactly `N` trailing hashes after the
    /// closing quote; a closer with a different hash count is ordinary
    /// content.
    pub(super) fn lex_raw_string(&mut self) -> Result<Option<TokenWithSpan>, LexError> {
        let mut hashes = 0usize;
        while self.cursor.current_char() == '#' && !self.cursor.is_at_end() {
            hashes += 1;
            self.cursor.advance();
        }
        if self.cursor.current_char() != '"' || self.cursor.is_at_end() {
            return Err(self.error(LexErrorKind::UnexpectedCharacter));
        }

        if self.cursor.starts_with("\"\"\"") {
            self.cursor.advance_n(3);
            let text = self.lex_multiline_raw_body(hashes)?;
            self.emit(Token::RawString(text))
        } else {
            self.cursor.advance();
            let text = self.lex_single_line_raw(hashes)?;
            self.emit(Token::RawString(text))
        }
    }

    /// Single-line dquote body, after the opening quote.
    fn lex_single_line_dquote(&mut self) -> Result<String, LexError> {
        let mut text = String::new();
        loop {
            if self.cursor.is_at_end() {
                return Err(self.error(LexErrorKind::UnterminatedDquoteString));
            }
            let c = self.cursor.current_char();
            match c {
                '"' => {
                    self.cursor.advance();
                    return Ok(text);
                }
                '\\' => {
                    self.cursor.advance();
                    if let Some(escaped) = self.lex_escape()? {
                        text.push(escaped);
                    }
                }
                c if is_newline(c) => {
                    return Err(self.error(LexErrorKind::UnexpectedNewlineInSingleLineString))
                }
                c if is_string_banned(c) => return Err(self.error(LexErrorKind::DisallowedChar)),
                c => {
                    text.push(c);
                    self.cursor.advance();
                }
            }
        }
    }

    /// Multi-line dquote body, after the opening `"""`.
    fn lex_multiline_body(&mut self, hashes: usize) -> Result<String, LexError> {
        if self.cursor.is_at_end() {
            return Err(self.error(LexErrorKind::UnterminatedDquoteString));
        }
        if !is_newline(self.cursor.current_char()) {
            return Err(self.error(LexErrorKind::InvalidMultilineString));
        }
        self.consume_newline();

        let mut chunks: Vec<StrChunk> = Vec::new();
        loop {
            if self.cursor.is_at_end() {
                return Err(self.error(LexErrorKind::UnterminatedDquoteString));
            }
            let c = self.cursor.current_char();
            if c == '"' && self.closes_multiline(hashes) {
                self.cursor.advance_n(3 + hashes);
                break;
            }
            match c {
                '\\' => {
                    self.cursor.advance();
                    if let Some(escaped) = self.lex_escape()? {
                        chunks.push(StrChunk {
                            ch: escaped,
                            escaped: true,
                        });
                    }
                }
                c if is_string_banned(c) => return Err(self.error(LexErrorKind::DisallowedChar)),
                c => {
                    chunks.push(StrChunk { ch: c, escaped: false });
                    self.cursor.advance();
                }
            }
        }

        dedent(&chunks, MultilineKind::Dquote).map_err(|kind| self.error(kind))
    }

    /// Single-line raw body, after `#…#"`.
    fn lex_single_line_raw(&mut self, hashes: usize) -> Result<String, LexError> {
        let mut text = String::new();
        loop {
            if self.cursor.is_at_end() {
                return Err(self.error(LexErrorKind::UnterminatedRawString));
            }
            let c = self.cursor.current_char();
            if c == '"' && self.closing_hashes_match(1, hashes) {
                self.cursor.advance_n(1 + hashes);
                return Ok(text);
            }
            if is_newline(c) {
                return Err(self.error(LexErrorKind::UnexpectedNewlineInSingleLineString));
            }
            if is_string_banned(c) {
                return Err(self.error(LexErrorKind::InvalidRawStringBody));
            }
            text.push(c);
            self.cursor.advance();
        }
    }

    /// Multi-line raw body, after `#…#"""`.
    fn lex_multiline_raw_body(&mut self, hashes: usize) -> Result<String, LexError> {
        if self.cursor.is_at_end() {
            return Err(self.error(LexErrorKind::UnterminatedRawString));
        }
        if !is_newline(self.cursor.current_char()) {
            return Err(self.error(LexErrorKind::InvalidMultilineRawString));
        }
        self.consume_newline();

        let mut chunks: Vec<StrChunk> = Vec::new();
        loop {
            if self.cursor.is_at_end() {
                return Err(self.error(LexErrorKind::UnterminatedRawString));
            }
            let c = self.cursor.current_char();
            if c == '"' && self.closes_multiline(hashes) {
                self.cursor.advance_n(3 + hashes);
                break;
            }
            if !is_newline(c) && is_string_banned(c) {
                return Err(self.error(LexErrorKind::InvalidRawStringBody));
            }
            chunks.push(StrChunk { ch: c, escaped: false });
            self.cursor.advance();
        }

        dedent(&chunks, MultilineKind::Raw).map_err(|kind| self.error(kind))
    }

    /// True if the cursor sits on `"""` followed by exactly `hashes` `#`s.
    fn closes_multiline(&self, hashes: usize) -> bool {
        self.cursor.starts_with("\"\"\"") && self.closing_hashes_match(3, hashes)
    }

    /// True if the `hashes` characters after `quotes` quote characters are
    /// all `#`.
    fn closing_hashes_match(&self, quotes: usize, hashes: usize) -> bool {
        (0..hashes).all(|i| self.cursor.peek_char(quotes + i) == '#')
    }

    /// Parses one escape sequence, after the backslash.
    ///
    /// Returns `None` for a whitespace escape, which consumes the entire
    /// following run of space-like and newline-like scalars and produces
    /// nothing.
    fn lex_escape(&mut self) -> Result<Option<char>, LexError> {
        if self.cursor.is_at_end() {
            return Err(self.error(LexErrorKind::UnterminatedDquoteString));
        }

        let c = self.cursor.current_char();
        match c {
            '"' | '\\' => {
                self.cursor.advance();
                Ok(Some(c))
            }
            'r' => {
                self.cursor.advance();
                Ok(Some('\r'))
            }
            'n' => {
                self.cursor.advance();
                Ok(Some('\n'))
            }
            'b' => {
                self.cursor.advance();
                Ok(Some('\u{08}'))
            }
            'f' => {
                self.cursor.advance();
                Ok(Some('\u{0C}'))
            }
            't' => {
                self.cursor.advance();
                Ok(Some('\t'))
            }
            's' => {
                self.cursor.advance();
                Ok(Some(' '))
            }
            'v' => {
                self.cursor.advance();
                Ok(Some('\u{0B}'))
            }
            'u' => {
                self.cursor.advance();
                self.lex_unicode_escape().map(Some)
            }
            c if is_space(c) || is_newline(c) => {
                while !self.cursor.is_at_end()
                    && (is_space(self.cursor.current_char())
                        || is_newline(self.cursor.current_char()))
                {
                    self.cursor.advance();
                }
                Ok(None)
            }
            _ => Err(self.error(LexErrorKind::InvalidDquoteStringEscape)),
        }
    }

    /// Parses `{HHHH}` after `\u`: one to six hex digits naming a Unicode
    /// scalar value.
    fn lex_unicode_escape(&mut self) -> Result<char, LexError> {
        if !self.cursor.match_char('{') {
            return Err(self.error(LexErrorKind::InvalidDquoteStringEscape));
        }

        let mut value: u32 = 0;
        let mut digits = 0;
        while digits < 6 {
            let c = self.cursor.current_char();
            if let Some(digit) = c.to_digit(16) {
                value = value * 16 + digit;
                digits += 1;
                self.cursor.advance();
            } else {
                break;
            }
        }
        if digits == 0 || !self.cursor.match_char('}') {
            return Err(self.error(LexErrorKind::InvalidDquoteStringEscape));
        }

        char::from_u32(value).ok_or_else(|| self.error(LexErrorKind::InvalidUnicodeScalar))
    }
}

#[cfg(test)]
mod tests {
    use crate::error::LexErrorKind;
    use crate::token::Token;
    use crate::tokenize;

    fn lex_string(source: &str) -> String {
        let (tokens, _) = tokenize(source).expect(source);
        match tokens.into_iter().next().unwrap().token {
            Token::DquoteString(s) | Token::RawString(s) => s,
            other => panic!("expected string token, got {other:?}"),
        }
    }

    fn lex_err(source: &str) -> LexErrorKind {
        tokenize(source).expect_err(source).kind
    }

    #[test]
    fn test_simple_string() {
        assert_eq!(lex_string("\"hello\""), "hello");
        assert_eq!(lex_string("\"\""), "");
    }

    #[test]
    fn test_escapes() {
        assert_eq!(lex_string(r#""a\nb""#), "a\nb");
        assert_eq!(lex_string(r#""a\tb""#), "a\tb");
        assert_eq!(lex_string(r#""a\\b""#), "a\\b");
        assert_eq!(lex_string(r#""say \"hi\"""#), "say \"hi\"");
        assert_eq!(lex_string(r#""\s""#), " ");
        assert_eq!(lex_string(r#""\b\f\r\v""#), "\u{08}\u{0C}\r\u{0B}");
    }

    #[test]
    fn test_unicode_escape() {
        assert_eq!(lex_string(r#""\u{41}""#), "A");
        assert_eq!(lex_string(r#""\u{1F600}""#), "\u{1F600}");
        assert_eq!(lex_string(r#""\u{0}""#), "\0");
    }

    #[test]
    fn test_unicode_escape_rejects_surrogates() {
        assert_eq!(lex_err(r#""\u{D800}""#), LexErrorKind::InvalidUnicodeScalar);
    }

    #[test]
    fn test_malformed_unicode_escape() {
        assert_eq!(lex_err(r#""\u41""#), LexErrorKind::InvalidDquoteStringEscape);
        assert_eq!(lex_err(r#""\u{}""#), LexErrorKind::InvalidDquoteStringEscape);
        assert_eq!(
            lex_err(r#""\u{1234567}""#),
            LexErrorKind::InvalidDquoteStringEscape
        );
    }

    #[test]
    fn test_unknown_escape_fails() {
        assert_eq!(lex_err(r#""\q""#), LexErrorKind::InvalidDquoteStringEscape);
    }

    #[test]
    fn test_whitespace_escape_consumes_run() {
        assert_eq!(lex_string("\"a\\   \t b\""), "ab");
        assert_eq!(lex_string("\"a\\\n   b\""), "ab");
    }

    #[test]
    fn test_unterminated_string() {
        assert_eq!(lex_err("\"abc"), LexErrorKind::UnterminatedDquoteString);
    }

    #[test]
    fn test_newline_in_single_line_string() {
        assert_eq!(
            lex_err("\"a\nb\""),
            LexErrorKind::UnexpectedNewlineInSingleLineString
        );
    }

    #[test]
    fn test_multiline_string_dedent() {
        let source = "\"\"\"\n  Hello\n  World\n  \"\"\"";
        assert_eq!(lex_string(source), "Hello\nWorld");
    }

    #[test]
    fn test_multiline_string_empty() {
        assert_eq!(lex_string("\"\"\"\n\"\"\""), "");
    }

    #[test]
    fn test_multiline_string_blank_interior_line() {
        let source = "\"\"\"\n  a\n\n  b\n  \"\"\"";
        assert_eq!(lex_string(source), "a\n\nb");
    }

    #[test]
    fn test_multiline_requires_newline_after_quotes() {
        assert_eq!(
            lex_err("\"\"\"no newline\"\"\""),
            LexErrorKind::InvalidMultilineString
        );
    }

    #[test]
    fn test_incomplete_dedentation() {
        let source = "\"\"\"\n  Hello\n World\n  \"\"\"";
        assert_eq!(lex_err(source), LexErrorKind::IncompleteDedentation);
    }

    #[test]
    fn test_escape_on_closing_line_fails() {
        let source = "\"\"\"\n  Hello\n\\s \"\"\"";
        assert_eq!(lex_err(source), LexErrorKind::InvalidEndLine);
    }

    #[test]
    fn test_raw_string_single_hash() {
        assert_eq!(lex_string("#\"hello\"#"), "hello");
        assert_eq!(lex_string(r##"#"no \n escape"#"##), "no \\n escape");
    }

    #[test]
    fn test_raw_string_keeps_quotes() {
        assert_eq!(lex_string("##\"say \"hi\"#!\"##"), "say \"hi\"#!");
    }

    #[test]
    fn test_raw_string_mismatched_hashes_is_content() {
        assert_eq!(lex_string("##\"a\"# b\"##"), "a\"# b");
    }

    #[test]
    fn test_unterminated_raw_string() {
        assert_eq!(lex_err("#\"abc"), LexErrorKind::UnterminatedRawString);
        assert_eq!(lex_err("##\"abc\"#"), LexErrorKind::UnterminatedRawString);
    }

    #[test]
    fn test_multiline_raw_string() {
        let source = "#\"\"\"\n  line \"one\"\n  line two\n  \"\"\"#";
        assert_eq!(lex_string(source), "line \"one\"\nline two");
    }

    #[test]
    fn test_multiline_raw_requires_newline() {
        assert_eq!(
            lex_err("#\"\"\"oops\"\"\"#"),
            LexErrorKind::InvalidMultilineRawString
        );
    }

    #[test]
    fn test_newline_in_single_line_raw_string() {
        assert_eq!(
            lex_err("#\"a\nb\"#"),
            LexErrorKind::UnexpectedNewlineInSingleLineString
        );
    }

    #[test]
    fn test_direction_control_in_string_fails() {
        assert_eq!(lex_err("\"a\u{202A}\""), LexErrorKind::DisallowedChar);
        assert_eq!(lex_err("#\"a\u{202A}\"#"), LexErrorKind::InvalidRawStringBody);
    }
}
