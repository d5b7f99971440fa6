//! Core tokenizer implementation.
//!
//! This module contains the main Tokenizer struct and its dispatch loop.

use kudl_util::Span;

use crate::cursor::Cursor;
use crate::error::{LexError, LexErrorKind};
use crate::token::{Token, TokenWithSpan};
use crate::unicode::{
    is_bom, is_direction_control, is_equals, is_identifier_forbidden, is_newline, is_space,
};

/// Tokenizer for KDL v2 documents.
///
/// The tokenizer transforms source text into a stream of [`TokenWithSpan`].
/// It is fail-fast: the first lexical error aborts the stream. Whitespace,
/// newlines, and comments are real tokens rather than trivia, because the
/// parser's state machine is sensitive to them (node terminators, the
/// space-before-attribute rule, line folds).
pub struct Tokenizer<'a> {
    /// Character cursor for source traversal.
    pub(crate) cursor: Cursor<'a>,

    /// Starting byte offset of the current token.
    token_start: usize,

    /// Line number where the current token starts (1-based).
    token_start_line: u32,

    /// Column number where the current token starts (1-based).
    token_start_column: u32,

    /// Whether the leading BOM has been checked.
    bom_checked: bool,
}

impl<'a> Tokenizer<'a> {
    /// Creates a new tokenizer for the given source text.
    pub fn new(source: &'a str) -> Self {
        Self {
            cursor: Cursor::new(source),
            token_start: 0,
            token_start_line: 1,
            token_start_column: 1,
            bom_checked: false,
        }
    }

    /// Returns the next token, or `None` at end of input.
    ///
    /// This is the main entry point for tokenization. It dispatches to the
    /// appropriate lexing method based on the current character.
    pub fn next_token(&mut self) -> Result<Option<TokenWithSpan>, LexError> {
        if !self.bom_checked {
            self.bom_checked = true;
            if self.cursor.current_char() == '\u{FEFF}' && !self.cursor.is_at_end() {
                self.cursor.advance();
            }
        }

        self.token_start = self.cursor.position();
        self.token_start_line = self.cursor.line();
        self.token_start_column = self.cursor.column();

        if self.cursor.is_at_end() {
            return Ok(None);
        }

        match self.cursor.current_char() {
            '(' => {
                self.cursor.advance();
                self.emit(Token::OpenAnnotation)
            }
            ')' => {
                self.cursor.advance();
                self.emit(Token::CloseAnnotation)
            }
            '{' => {
                self.cursor.advance();
                self.emit(Token::OpenBlock)
            }
            '}' => {
                self.cursor.advance();
                self.emit(Token::CloseBlock)
            }
            ';' => {
                self.cursor.advance();
                self.emit(Token::Semicolon)
            }
            '/' => match self.cursor.peek_char(1) {
                '-' => {
                    self.cursor.advance_n(2);
                    self.emit(Token::SlashDash)
                }
                '/' => self.lex_line_comment(),
                '*' => self.lex_block_comment(),
                _ => Err(self.error(LexErrorKind::UnexpectedCharacter)),
            },
            '\\' => {
                self.cursor.advance();
                self.emit(Token::Fold)
            }
            '"' => self.lex_dquote_string(),
            '#' => self.lex_hash(),
            c if is_newline(c) => {
                self.consume_newline();
                self.emit(Token::Newline)
            }
            c if is_space(c) => self.lex_space(),
            c if is_equals(c) => {
                self.cursor.advance();
                self.emit(Token::Equal)
            }
            c if (c as u32) < 0x20 || c == '\u{7F}' || is_direction_control(c) || is_bom(c) => {
                Err(self.error(LexErrorKind::BadTokenize))
            }
            c if !is_identifier_forbidden(c) => self.lex_term(),
            // Only the reserved brackets '[' and ']' reach this arm.
            _ => Err(self.error(LexErrorKind::UnexpectedCharacter)),
        }
    }

    /// Returns the portion of the input that has not been consumed yet.
    pub fn rest(&self) -> &'a str {
        self.cursor.remaining()
    }

    /// Dispatches `#`-prefixed input: raw strings (`#"`, `##"..."##`) and
    /// keyword terms (`#true`).
    fn lex_hash(&mut self) -> Result<Option<TokenWithSpan>, LexError> {
        if self.cursor.remaining().len() == 1 {
            return Err(self.error(LexErrorKind::IncompleteTokenize));
        }
        match self.cursor.peek_char(1) {
            '#' | '"' => self.lex_raw_string(),
            c if !is_identifier_forbidden(c) => self.lex_keyword_term(),
            _ => Err(self.error(LexErrorKind::UnexpectedCharacter)),
        }
    }

    /// Lexes a keyword term such as `#true` or `#nan`.
    ///
    /// The leading `#` is kept in the lexeme; the value decoder recognizes
    /// the keyword set and treats unknown names as generic keywords.
    fn lex_keyword_term(&mut self) -> Result<Option<TokenWithSpan>, LexError> {
        self.cursor.advance();
        let start = self.cursor.position();

        while !self.cursor.is_at_end() && !is_identifier_forbidden(self.cursor.current_char()) {
            self.cursor.advance();
        }
        if self.cursor.current_char() == '#' && !self.cursor.is_at_end() {
            return Err(self.error(LexErrorKind::InvalidIdentifier));
        }

        let lexeme = format!("#{}", self.cursor.slice_from(start));
        self.emit(Token::Term(lexeme))
    }

    /// Lexes a bare term: everything up to the next identifier-forbidden
    /// scalar. The parser's value decoder later classifies the lexeme as a
    /// number, keyword, or identifier.
    fn lex_term(&mut self) -> Result<Option<TokenWithSpan>, LexError> {
        while !self.cursor.is_at_end() && !is_identifier_forbidden(self.cursor.current_char()) {
            self.cursor.advance();
        }
        // `#` may open a term (`#true`) but never continue one.
        if self.cursor.current_char() == '#' && !self.cursor.is_at_end() {
            return Err(self.error(LexErrorKind::InvalidIdentifier));
        }

        let lexeme = self.cursor.slice_from(self.token_start).to_string();
        self.emit(Token::Term(lexeme))
    }

    /// Lexes a run of horizontal whitespace into one Space token.
    fn lex_space(&mut self) -> Result<Option<TokenWithSpan>, LexError> {
        let mut text = String::new();
        let mut len = 0;
        while !self.cursor.is_at_end() && is_space(self.cursor.current_char()) {
            text.push(self.cursor.current_char());
            len += 1;
            self.cursor.advance();
        }
        self.emit(Token::Space { text, len })
    }

    /// Consumes a single newline, treating CRLF as one unit.
    pub(crate) fn consume_newline(&mut self) {
        let c = self.cursor.current_char();
        self.cursor.advance();
        if c == '\r' && self.cursor.current_char() == '\n' {
            self.cursor.advance();
        }
    }

    /// The span from the start of the current token to the cursor.
    pub(crate) fn token_span(&self) -> Span {
        Span::new(
            self.token_start,
            self.cursor.position(),
            self.token_start_line,
            self.token_start_column,
        )
    }

    /// Builds an error at the current token.
    pub(crate) fn error(&self, kind: LexErrorKind) -> LexError {
        LexError::new(kind, self.token_span())
    }

    /// Wraps a token with the span of the current lexeme.
    pub(crate) fn emit(&self, token: Token) -> Result<Option<TokenWithSpan>, LexError> {
        Ok(Some(TokenWithSpan::new(token, self.token_span())))
    }
}

/// The tokenizer yields tokens until end of input or the first error.
impl<'a> Iterator for Tokenizer<'a> {
    type Item = Result<TokenWithSpan, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_token() {
            Ok(Some(token)) => Some(Ok(token)),
            Ok(None) => None,
            Err(err) => Some(Err(err)),
        }
    }
}
