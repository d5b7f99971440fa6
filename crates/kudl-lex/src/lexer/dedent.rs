//! Multi-line string post-processing.
//!
//! The raw body of a multi-line string (dquote or raw) is collected as a
//! sequence of escape-flagged chunks, so the final-line rule ("the
//! indent-defining line must be literal whitespace") is decidable without
//! re-scanning source text. The final line's characters form the indent
//! prefix, which is stripped code-point-wise from every preceding line;
//! lines are then rejoined with LF and no trailing newline.

use crate::error::LexErrorKind;
use crate::unicode::{is_newline, is_space};

/// One character of a multi-line string body, remembering whether it was
/// produced by an escape sequence.
#[derive(Clone, Copy, Debug)]
pub(super) struct StrChunk {
    pub ch: char,
    pub escaped: bool,
}

/// Which string form is being dedented; only the error kinds differ.
#[derive(Clone, Copy, Debug)]
pub(super) enum MultilineKind {
    Dquote,
    Raw,
}

/// Applies the dedent rule to a collected multi-line body.
pub(super) fn dedent(chunks: &[StrChunk], kind: MultilineKind) -> Result<String, LexErrorKind> {
    let lines = split_lines(chunks);
    let Some((last, body)) = lines.split_last() else {
        return Ok(String::new());
    };

    // The final line defines the indent. Escaped content cannot define
    // indentation, and anything that is not horizontal whitespace means the
    // closer is not alone on its line.
    for chunk in *last {
        if chunk.escaped {
            return Err(LexErrorKind::InvalidEndLine);
        }
        if !is_space(chunk.ch) {
            return Err(match kind {
                MultilineKind::Dquote => LexErrorKind::InvalidMultilineString,
                MultilineKind::Raw => LexErrorKind::InvalidMultilineRawString,
            });
        }
    }
    let prefix: Vec<char> = last.iter().map(|chunk| chunk.ch).collect();

    let mut out = Vec::with_capacity(body.len());
    for line in body {
        // Whitespace-only lines dedent to empty regardless of the prefix.
        if line.iter().all(|c| !c.escaped && is_space(c.ch)) {
            out.push(String::new());
            continue;
        }
        let matches_prefix = line.len() >= prefix.len()
            && line[..prefix.len()]
                .iter()
                .zip(&prefix)
                .all(|(c, p)| !c.escaped && c.ch == *p);
        if !matches_prefix {
            return Err(LexErrorKind::IncompleteDedentation);
        }
        out.push(line[prefix.len()..].iter().map(|c| c.ch).collect());
    }

    Ok(out.join("\n"))
}

/// Splits a chunk sequence at literal newlines. An escaped newline (from
/// `\n` or `\u{A}`) is content, not a line boundary, and a literal CRLF
/// pair is a single boundary.
fn split_lines(chunks: &[StrChunk]) -> Vec<&[StrChunk]> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < chunks.len() {
        let chunk = chunks[i];
        if !chunk.escaped && is_newline(chunk.ch) {
            lines.push(&chunks[start..i]);
            i += 1;
            if chunk.ch == '\r' && i < chunks.len() && !chunks[i].escaped && chunks[i].ch == '\n' {
                i += 1;
            }
            start = i;
        } else {
            i += 1;
        }
    }
    lines.push(&chunks[start..]);
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal(text: &str) -> Vec<StrChunk> {
        text.chars()
            .map(|ch| StrChunk { ch, escaped: false })
            .collect()
    }

    #[test]
    fn test_basic_dedent() {
        let chunks = literal("  Hello\n  World\n  ");
        assert_eq!(dedent(&chunks, MultilineKind::Dquote).unwrap(), "Hello\nWorld");
    }

    #[test]
    fn test_empty_body() {
        assert_eq!(dedent(&[], MultilineKind::Dquote).unwrap(), "");
    }

    #[test]
    fn test_no_indent() {
        let chunks = literal("a\nb\n");
        assert_eq!(dedent(&chunks, MultilineKind::Dquote).unwrap(), "a\nb");
    }

    #[test]
    fn test_crlf_boundary() {
        let chunks = literal("  a\r\n  b\r\n  ");
        assert_eq!(dedent(&chunks, MultilineKind::Dquote).unwrap(), "a\nb");
    }

    #[test]
    fn test_tab_indent() {
        let chunks = literal("\tx\n\t");
        assert_eq!(dedent(&chunks, MultilineKind::Dquote).unwrap(), "x");
    }

    #[test]
    fn test_prefix_mismatch() {
        let chunks = literal("  a\n b\n  ");
        assert_eq!(
            dedent(&chunks, MultilineKind::Dquote),
            Err(LexErrorKind::IncompleteDedentation)
        );
    }

    #[test]
    fn test_tab_does_not_match_space() {
        let chunks = literal("\ta\n  ");
        assert_eq!(
            dedent(&chunks, MultilineKind::Dquote),
            Err(LexErrorKind::IncompleteDedentation)
        );
    }

    #[test]
    fn test_blank_lines_pass() {
        let chunks = literal("  a\n\n   \n  b\n  ");
        assert_eq!(dedent(&chunks, MultilineKind::Dquote).unwrap(), "a\n\n\nb");
    }

    #[test]
    fn test_escaped_final_line() {
        let mut chunks = literal("a\n");
        chunks.push(StrChunk {
            ch: ' ',
            escaped: true,
        });
        assert_eq!(
            dedent(&chunks, MultilineKind::Dquote),
            Err(LexErrorKind::InvalidEndLine)
        );
    }

    #[test]
    fn test_content_on_final_line() {
        let chunks = literal("a\n x");
        assert_eq!(
            dedent(&chunks, MultilineKind::Dquote),
            Err(LexErrorKind::InvalidMultilineString)
        );
        assert_eq!(
            dedent(&chunks, MultilineKind::Raw),
            Err(LexErrorKind::InvalidMultilineRawString)
        );
    }

    #[test]
    fn test_escaped_newline_is_not_a_boundary() {
        // "a" + escaped \n + "b" on one literal line, prefix empty.
        let mut chunks = literal("a");
        chunks.push(StrChunk {
            ch: '\n',
            escaped: true,
        });
        chunks.extend(literal("b\n"));
        assert_eq!(dedent(&chunks, MultilineKind::Dquote).unwrap(), "a\nb");
    }

    #[test]
    fn test_escaped_char_cannot_satisfy_prefix() {
        let mut chunks = Vec::new();
        chunks.push(StrChunk {
            ch: ' ',
            escaped: true,
        });
        chunks.extend(literal("a\n "));
        assert_eq!(
            dedent(&chunks, MultilineKind::Dquote),
            Err(LexErrorKind::IncompleteDedentation)
        );
    }
}
