//! Comment lexing.
//!
//! Comments are emitted as real tokens (the parser treats them as
//! whitespace-equivalent), so both forms buffer their full text including
//! the delimiters.

use crate::error::{LexError, LexErrorKind};
use crate::token::{CommentKind, Token, TokenWithSpan};
use crate::unicode::{is_bom, is_direction_control, is_newline, is_space};
use crate::Tokenizer;

/// Scalars that may not appear literally inside a comment: everything that
/// is banned outside strings.
fn is_comment_banned(c: char) -> bool {
    ((c as u32) < 0x20 && !is_space(c) && !is_newline(c))
        || c == '\u{7F}'
        || is_direction_control(c)
        || is_bom(c)
}

impl<'a> Tokenizer<'a> {
    /// Lexes a `//` comment up to (and not including) the next newline.
    pub(super) fn lex_line_comment(&mut self) -> Result<Option<TokenWithSpan>, LexError> {
        let mut text = String::from("//");
        self.cursor.advance_n(2);

        while !self.cursor.is_at_end() {
            let c = self.cursor.current_char();
            if is_newline(c) {
                break;
            }
            if is_comment_banned(c) {
                return Err(self.error(LexErrorKind::BadTokenize));
            }
            text.push(c);
            self.cursor.advance();
        }

        self.emit(Token::Comment {
            kind: CommentKind::Line,
            text,
        })
    }

    /// Lexes a `/* ... */` comment, handling nesting with a depth counter.
    ///
    /// The kind upgrades from `Span` to `Multiline` as soon as a newline is
    /// buffered.
    pub(super) fn lex_block_comment(&mut self) -> Result<Option<TokenWithSpan>, LexError> {
        let mut text = String::from("/*");
        self.cursor.advance_n(2);

        let mut depth = 1u32;
        let mut saw_newline = false;

        loop {
            if self.cursor.is_at_end() {
                return Err(self.error(LexErrorKind::PrematureTermination));
            }

            if self.cursor.starts_with("*/") {
                text.push_str("*/");
                self.cursor.advance_n(2);
                depth -= 1;
                if depth == 0 {
                    break;
                }
            } else if self.cursor.starts_with("/*") {
                text.push_str("/*");
                self.cursor.advance_n(2);
                depth += 1;
            } else {
                let c = self.cursor.current_char();
                if is_newline(c) {
                    saw_newline = true;
                } else if is_comment_banned(c) {
                    return Err(self.error(LexErrorKind::BadTokenize));
                }
                text.push(c);
                self.cursor.advance();
            }
        }

        let kind = if saw_newline {
            CommentKind::Multiline
        } else {
            CommentKind::Span
        };
        self.emit(Token::Comment { kind, text })
    }
}
