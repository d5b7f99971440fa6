//! Error surface tests over the public API: each failure arrives as a
//! typed kind with a source position, and nothing partial is returned.

use kudl::{decode, decode_strict, DecodeError, LexErrorKind, ParseErrorKind};

fn lex_kind(source: &str) -> LexErrorKind {
    match decode(source).expect_err(source) {
        DecodeError::Lex(err) => err.kind,
        other => panic!("expected lex error for {source:?}, got {other:?}"),
    }
}

fn parse_kind(source: &str) -> ParseErrorKind {
    match decode(source).expect_err(source) {
        DecodeError::Parse(err) => err.kind,
        other => panic!("expected parse error for {source:?}, got {other:?}"),
    }
}

#[test]
fn tokenize_errors_surface_through_decode() {
    assert_eq!(lex_kind("node \"open"), LexErrorKind::UnterminatedDquoteString);
    assert_eq!(lex_kind("node #\"open"), LexErrorKind::UnterminatedRawString);
    assert_eq!(lex_kind("node \"\\q\""), LexErrorKind::InvalidDquoteStringEscape);
    assert_eq!(lex_kind("node \"\\u{D800}\""), LexErrorKind::InvalidUnicodeScalar);
    assert_eq!(lex_kind("node \"a\nb\""), LexErrorKind::UnexpectedNewlineInSingleLineString);
    assert_eq!(lex_kind("node \u{202E}"), LexErrorKind::BadTokenize);
    assert_eq!(lex_kind("na#me"), LexErrorKind::InvalidIdentifier);
    assert_eq!(lex_kind("/* never closed"), LexErrorKind::PrematureTermination);
    assert_eq!(lex_kind("node ["), LexErrorKind::UnexpectedCharacter);
    assert_eq!(lex_kind("s \"\"\"inline\"\"\""), LexErrorKind::InvalidMultilineString);
}

#[test]
fn parse_errors_surface_through_decode() {
    assert_eq!(parse_kind("}"), ParseErrorKind::InvalidParseState);
    assert_eq!(parse_kind("node {"), ParseErrorKind::UnexpectedEndOfDocument);
    assert_eq!(parse_kind("{ orphan }"), ParseErrorKind::RawBlockInDocument);
    assert_eq!(parse_kind("/-"), ParseErrorKind::SlashdashNothing);
    assert_eq!(parse_kind("(dangling)"), ParseErrorKind::UnresolvedAnnotation);
    assert_eq!(parse_kind("(a) /- node"), ParseErrorKind::UnexpectedSlashdashOrigin);
    assert_eq!(parse_kind("node (u8)k=1"), ParseErrorKind::KeyAnnotationsNotAllowed);
    assert_eq!(parse_kind("node 1=2"), ParseErrorKind::InvalidAttributeToken);
    assert_eq!(parse_kind("node k="), ParseErrorKind::InvalidAttributeValue);
    assert_eq!(parse_kind("node nan"), ParseErrorKind::InvalidBareIdentifier);
    assert_eq!(parse_kind("node\"glued\""), ParseErrorKind::UnexpectedTokenAfterNodeName);
}

#[test]
fn value_errors_surface_through_decode() {
    assert_eq!(parse_kind("n 0b2"), ParseErrorKind::InvalidBinIntegerFormat);
    assert_eq!(parse_kind("n 0o9"), ParseErrorKind::InvalidOctIntegerFormat);
    assert_eq!(parse_kind("n 0xQ"), ParseErrorKind::InvalidHexIntegerFormat);
    assert_eq!(parse_kind("n 1x2"), ParseErrorKind::InvalidIntegerFormat);
    assert_eq!(parse_kind("n 1.2.3"), ParseErrorKind::InvalidFloatFormat);
    assert_eq!(parse_kind("n 1."), ParseErrorKind::InvalidFloatFormat);
}

#[test]
fn errors_carry_source_positions() {
    match decode("node \"open").unwrap_err() {
        DecodeError::Lex(err) => {
            assert_eq!(err.span.line, 1);
            assert_eq!(err.span.column, 6);
        }
        other => panic!("unexpected {other:?}"),
    }

    match decode("good\nbad {").unwrap_err() {
        DecodeError::Parse(err) => assert_eq!(err.span.line, 2),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn strict_decode_equals_decode_on_errors() {
    for source in ["node \"open", "}", "n 0b2"] {
        assert_eq!(
            decode(source).unwrap_err(),
            decode_strict(source).unwrap_err(),
            "{source}"
        );
    }
}
