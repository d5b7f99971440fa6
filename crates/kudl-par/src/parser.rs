//! Token-stream parser.
//!
//! A recursive-descent state machine over the token stream. At any moment
//! the parser is either between nodes (skipping line space, collecting
//! pending annotations and slashdash markers) or inside a node (collecting
//! attributes until a terminator). Children blocks recurse with an
//! explicit depth.
//!
//! Slashdash discarding is resolved when an accumulator is finalized: each
//! marker drops the single following item, which must be a node, a value,
//! a property pair, or a children block. Property pairs then de-duplicate
//! by key, keeping only the latest occurrence.

use std::hash::BuildHasherDefault;

use indexmap::IndexMap;
use rustc_hash::FxHasher;

use kudl_lex::token::{Token, TokenWithSpan};
use kudl_lex::unicode::valid_identifier;
use kudl_util::Span;

use crate::ast::{Attribute, Document, Node, Payload, Value, ValueType};
use crate::error::{ParseError, ParseErrorKind};
use crate::value::decode_term;

type FxIndexMap<K, V> = IndexMap<K, V, BuildHasherDefault<FxHasher>>;

/// Accumulator item for a document or children block.
#[derive(Debug)]
enum DocItem {
    SlashDash(Span),
    Annotation(String, Span),
    Node(Node),
    RawBlock(Span),
}

/// Accumulator item for a node's attributes.
#[derive(Debug)]
enum AttrItem {
    SlashDash(Span),
    Annotation(String, Span),
    Positional(Value),
    Property(Value, Value),
    Block(Vec<Node>, Span),
}

/// What a node may still accept: attributes, or (after a slashdashed
/// children block) only further children blocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SubState {
    Attributes,
    Children,
}

/// Parser over a buffered token stream.
///
/// Consumes the tokens produced by `kudl-lex` and builds the immutable
/// document model. Errors abort at the first failure; no partial document
/// is returned.
pub struct Parser {
    /// Token stream from the tokenizer
    tokens: Vec<TokenWithSpan>,

    /// Current position in the token stream
    position: usize,
}

impl Parser {
    /// Create a new parser from tokens
    pub fn new(tokens: Vec<TokenWithSpan>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    /// Parse a complete document.
    ///
    /// On success returns the document and the unconsumed remainder of the
    /// token stream (empty when the whole stream was parsed).
    pub fn parse(mut self) -> Result<(Document, Vec<TokenWithSpan>), ParseError> {
        let document = self.parse_nodes(0)?;
        let rest = self.tokens.split_off(self.position);
        Ok((document, rest))
    }

    /// Parse nodes until end of input (depth 0) or the matching `}`
    /// (depth > 0).
    fn parse_nodes(&mut self, depth: u32) -> Result<Vec<Node>, ParseError> {
        let mut items: Vec<DocItem> = Vec::new();

        loop {
            let Some(TokenWithSpan { token, span }) = self.current().cloned() else {
                if depth > 0 {
                    return Err(self.err(ParseErrorKind::UnexpectedEndOfDocument));
                }
                return finalize_nodes(items);
            };

            match token {
                Token::Space { .. } | Token::Comment { .. } | Token::Newline | Token::Semicolon => {
                    self.bump();
                }
                Token::Fold => {
                    self.bump();
                    self.consume_fold_newline()?;
                }
                Token::SlashDash => {
                    if matches!(items.last(), Some(DocItem::Annotation(..))) {
                        return Err(ParseError::new(
                            ParseErrorKind::UnexpectedSlashdashOrigin,
                            span,
                        ));
                    }
                    self.bump();
                    items.push(DocItem::SlashDash(span));
                }
                Token::OpenAnnotation => {
                    self.bump();
                    let annotation = self.parse_annotation()?;
                    items.push(DocItem::Annotation(annotation, span));
                }
                Token::Term(_) | Token::DquoteString(_) | Token::RawString(_) => {
                    let name = self.take_node_name()?;
                    let annotations = drain_annotations(&mut items);
                    let node = self.parse_node(depth, name, annotations)?;
                    items.push(DocItem::Node(node));
                }
                Token::OpenBlock => {
                    // A block with no owning node. It parses (and may be
                    // discarded by a preceding slashdash) but can never
                    // survive into the document.
                    self.bump();
                    self.parse_nodes(depth + 1)?;
                    items.push(DocItem::RawBlock(span));
                }
                Token::CloseBlock => {
                    if matches!(items.last(), Some(DocItem::SlashDash(_))) {
                        return Err(ParseError::new(
                            ParseErrorKind::UnexpectedSlashdashStopToken,
                            span,
                        ));
                    }
                    self.bump();
                    if depth == 0 {
                        return Err(ParseError::new(ParseErrorKind::InvalidParseState, span));
                    }
                    return finalize_nodes(items);
                }
                Token::CloseAnnotation | Token::Equal => {
                    return Err(ParseError::new(ParseErrorKind::InvalidParseState, span));
                }
            }
        }
    }

    /// Parse one node after its name, through its terminator.
    ///
    /// Consumes a terminating newline or semicolon; leaves a terminating
    /// `}` for the enclosing block. A real children block emits the node
    /// immediately; a slashdashed block keeps the node open but attributes
    /// are no longer accepted.
    fn parse_node(
        &mut self,
        depth: u32,
        name: String,
        annotations: Vec<String>,
    ) -> Result<Node, ParseError> {
        let mut items: Vec<AttrItem> = Vec::new();
        let mut spaces: u32 = 0;
        let mut sub = SubState::Attributes;

        loop {
            let Some(TokenWithSpan { token, span }) = self.current().cloned() else {
                return build_node(name, annotations, items, None);
            };

            match token {
                Token::Space { .. } => {
                    self.bump();
                    spaces += 1;
                }
                Token::Comment { .. } => {
                    self.bump();
                }
                Token::Fold => {
                    self.bump();
                    self.consume_fold_newline()?;
                    spaces += 1;
                }
                Token::Newline => {
                    if matches!(items.last(), Some(AttrItem::SlashDash(_))) {
                        // A slashdash may reach across lines for its target.
                        self.bump();
                        spaces += 1;
                    } else {
                        self.bump();
                        return build_node(name, annotations, items, None);
                    }
                }
                Token::Semicolon => {
                    if matches!(items.last(), Some(AttrItem::SlashDash(_))) {
                        return Err(ParseError::new(
                            ParseErrorKind::UnexpectedSlashdashStopToken,
                            span,
                        ));
                    }
                    self.bump();
                    return build_node(name, annotations, items, None);
                }
                Token::CloseBlock => {
                    if matches!(items.last(), Some(AttrItem::SlashDash(_))) {
                        return Err(ParseError::new(
                            ParseErrorKind::UnexpectedSlashdashStopToken,
                            span,
                        ));
                    }
                    // Left for the enclosing block to consume.
                    return build_node(name, annotations, items, None);
                }
                Token::SlashDash => {
                    if matches!(items.last(), Some(AttrItem::Annotation(..))) {
                        return Err(ParseError::new(
                            ParseErrorKind::UnexpectedSlashdashOrigin,
                            span,
                        ));
                    }
                    self.bump();
                    items.push(AttrItem::SlashDash(span));
                }
                Token::OpenAnnotation => {
                    if spaces == 0 {
                        return Err(ParseError::new(
                            ParseErrorKind::UnexpectedTokenAfterNodeName,
                            span,
                        ));
                    }
                    if sub != SubState::Attributes {
                        return Err(ParseError::new(ParseErrorKind::InvalidNodeAttributes, span));
                    }
                    self.bump();
                    let annotation = self.parse_annotation()?;
                    items.push(AttrItem::Annotation(annotation, span));
                }
                Token::OpenBlock => {
                    if spaces == 0 {
                        return Err(ParseError::new(
                            ParseErrorKind::UnexpectedTokenAfterNodeName,
                            span,
                        ));
                    }
                    self.bump();
                    let children = self.parse_nodes(depth + 1)?;
                    if matches!(items.last(), Some(AttrItem::SlashDash(_))) {
                        items.push(AttrItem::Block(children, span));
                        sub = SubState::Children;
                        spaces = 0;
                    } else {
                        return build_node(name, annotations, items, Some(children));
                    }
                }
                Token::Term(_) | Token::DquoteString(_) | Token::RawString(_) => {
                    if spaces == 0 {
                        return Err(ParseError::new(
                            ParseErrorKind::UnexpectedTokenAfterNodeName,
                            span,
                        ));
                    }
                    if sub != SubState::Attributes {
                        return Err(ParseError::new(ParseErrorKind::InvalidNodeAttributes, span));
                    }
                    self.parse_attribute(&mut items)?;
                    spaces = 0;
                }
                Token::Equal | Token::CloseAnnotation => {
                    if matches!(items.last(), Some(AttrItem::SlashDash(_))) {
                        return Err(ParseError::new(
                            ParseErrorKind::UnexpectedSlashdashTarget,
                            span,
                        ));
                    }
                    return Err(ParseError::new(
                        ParseErrorKind::UnexpectedTokenAfterNodeName,
                        span,
                    ));
                }
            }
        }
    }

    /// Parse one attribute: a positional value, or a `key=value` property
    /// when an `=` follows the first value.
    fn parse_attribute(&mut self, items: &mut Vec<AttrItem>) -> Result<(), ParseError> {
        let Some(TokenWithSpan { token, span }) = self.current().cloned() else {
            return Err(self.err(ParseErrorKind::NoTerm));
        };
        self.bump();
        let mut key = decode_value_token(token, span)?;

        // Attach the most recent pending annotation, if any.
        if matches!(items.last(), Some(AttrItem::Annotation(..))) {
            if let Some(AttrItem::Annotation(text, _)) = items.pop() {
                key.annotations.push(text);
            }
        }

        // Peek past spaces for an equals sign.
        let mut look = self.position;
        while matches!(
            self.tokens.get(look).map(|t| &t.token),
            Some(Token::Space { .. })
        ) {
            look += 1;
        }
        let is_property = matches!(
            self.tokens.get(look).map(|t| &t.token),
            Some(Token::Equal)
        );

        if !is_property {
            if key.ty == ValueType::Id {
                match key.as_str() {
                    Some(lexeme) if valid_identifier(lexeme) => {}
                    _ => {
                        return Err(ParseError::new(ParseErrorKind::InvalidBareIdentifier, span))
                    }
                }
            }
            items.push(AttrItem::Positional(key));
            return Ok(());
        }

        self.position = look + 1;
        if !key.annotations.is_empty() {
            return Err(ParseError::new(
                ParseErrorKind::KeyAnnotationsNotAllowed,
                span,
            ));
        }
        if key.ty == ValueType::Id {
            match key.as_str() {
                Some(lexeme) if valid_identifier(lexeme) => {}
                _ => return Err(ParseError::new(ParseErrorKind::InvalidBareIdentifier, span)),
            }
        }
        let key = normalize_key(key, span)?;

        self.skip_spaces();

        let mut value_annotation = None;
        if matches!(self.peek_kind(), Some(Token::OpenAnnotation)) {
            self.bump();
            let annotation = self.parse_annotation().map_err(|err| {
                ParseError::new(ParseErrorKind::InvalidAttributeValueAnnotation, err.span)
            })?;
            value_annotation = Some(annotation);
        }

        let Some(TokenWithSpan {
            token,
            span: value_span,
        }) = self.current().cloned()
        else {
            return Err(self.err(ParseErrorKind::InvalidAttributeValue));
        };
        if !token.is_value_bearing() {
            return Err(ParseError::new(
                ParseErrorKind::InvalidAttributeValue,
                value_span,
            ));
        }
        self.bump();
        let mut value = decode_value_token(token, value_span)?;
        if let Some(annotation) = value_annotation {
            value.annotations.push(annotation);
        }
        items.push(AttrItem::Property(key, value));
        Ok(())
    }

    /// Parse the inside of `( )`: exactly one identifier or string value.
    /// The opening parenthesis has already been consumed.
    fn parse_annotation(&mut self) -> Result<String, ParseError> {
        self.skip_spaces();

        let Some(TokenWithSpan { token, span }) = self.current().cloned() else {
            return Err(self.err(ParseErrorKind::UnexpectedEndOfDocument));
        };
        if !token.is_value_bearing() {
            return Err(ParseError::new(ParseErrorKind::InvalidAnnotation, span));
        }
        self.bump();
        let value = decode_value_token(token, span)?;
        let text = match (&value.ty, value.as_str()) {
            (ValueType::Id, Some(lexeme)) if valid_identifier(lexeme) => lexeme.to_string(),
            (ValueType::String, Some(text)) => text.to_string(),
            _ => return Err(ParseError::new(ParseErrorKind::InvalidAnnotation, span)),
        };

        self.skip_spaces();
        if matches!(self.peek_kind(), Some(Token::CloseAnnotation)) {
            self.bump();
            Ok(text)
        } else if self.peek_kind().is_none() {
            Err(self.err(ParseErrorKind::UnexpectedEndOfDocument))
        } else {
            Err(self.err(ParseErrorKind::InvalidAnnotationParseState))
        }
    }

    /// Consume the node name token, validating bare terms against the
    /// identifier rules.
    fn take_node_name(&mut self) -> Result<String, ParseError> {
        let Some(TokenWithSpan { token, span }) = self.current().cloned() else {
            return Err(self.err(ParseErrorKind::InvalidParseState));
        };
        self.bump();
        match token {
            Token::Term(lexeme) => {
                if !valid_identifier(&lexeme) {
                    return Err(ParseError::new(ParseErrorKind::InvalidIdentifier, span));
                }
                Ok(lexeme)
            }
            Token::DquoteString(text) | Token::RawString(text) => {
                if text.is_empty() {
                    return Err(ParseError::new(ParseErrorKind::InvalidIdentifier, span));
                }
                Ok(text)
            }
            _ => Err(ParseError::new(ParseErrorKind::InvalidParseState, span)),
        }
    }

    /// After a fold, consume trailing space and comments up to and
    /// including one newline (or end of input).
    fn consume_fold_newline(&mut self) -> Result<(), ParseError> {
        loop {
            if matches!(
                self.peek_kind(),
                Some(Token::Space { .. } | Token::Comment { .. })
            ) {
                self.bump();
            } else if matches!(self.peek_kind(), Some(Token::Newline)) {
                self.bump();
                return Ok(());
            } else if self.peek_kind().is_none() {
                return Ok(());
            } else {
                return Err(self.err(ParseErrorKind::InvalidParseState));
            }
        }
    }

    fn current(&self) -> Option<&TokenWithSpan> {
        self.tokens.get(self.position)
    }

    fn peek_kind(&self) -> Option<&Token> {
        self.current().map(|t| &t.token)
    }

    fn bump(&mut self) {
        self.position += 1;
    }

    fn skip_spaces(&mut self) {
        while matches!(self.peek_kind(), Some(Token::Space { .. })) {
            self.bump();
        }
    }

    /// The span of the current token, falling back to the last consumed
    /// token at end of input.
    fn here(&self) -> Span {
        self.current()
            .map(|t| t.span)
            .or_else(|| self.tokens.last().map(|t| t.span))
            .unwrap_or(Span::DUMMY)
    }

    fn err(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::new(kind, self.here())
    }
}

/// Decode a value-bearing token into a typed value.
fn decode_value_token(token: Token, span: Span) -> Result<Value, ParseError> {
    match token {
        Token::Term(lexeme) => {
            decode_term(&lexeme).map_err(|kind| ParseError::new(kind, span))
        }
        Token::DquoteString(text) | Token::RawString(text) => Ok(Value::string(text)),
        _ => Err(ParseError::new(ParseErrorKind::NoTerm, span)),
    }
}

/// Pop the run of pending annotations off the end of the accumulator, in
/// their original order.
fn drain_annotations(items: &mut Vec<DocItem>) -> Vec<String> {
    let mut annotations = Vec::new();
    while matches!(items.last(), Some(DocItem::Annotation(..))) {
        if let Some(DocItem::Annotation(text, _)) = items.pop() {
            annotations.push(text);
        }
    }
    annotations.reverse();
    annotations
}

/// Property keys must be identifiers; a quoted key is normalized to an
/// id-typed value, anything else is rejected.
fn normalize_key(key: Value, span: Span) -> Result<Value, ParseError> {
    match key.ty {
        ValueType::Id => Ok(key),
        ValueType::String => match key.value {
            Payload::Str(text) => Ok(Value::id(text)),
            _ => Err(ParseError::new(ParseErrorKind::InvalidAttributeToken, span)),
        },
        _ => Err(ParseError::new(ParseErrorKind::InvalidAttributeToken, span)),
    }
}

fn build_node(
    name: String,
    annotations: Vec<String>,
    items: Vec<AttrItem>,
    children: Option<Vec<Node>>,
) -> Result<Node, ParseError> {
    let attributes = finalize_attributes(items)?;
    Ok(Node {
        name,
        annotations,
        attributes,
        children,
    })
}

/// Resolve slashdash markers and de-duplicate properties for a finished
/// attribute accumulator.
fn finalize_attributes(items: Vec<AttrItem>) -> Result<Vec<Attribute>, ParseError> {
    let mut kept: Vec<Attribute> = Vec::new();
    let mut iter = items.into_iter();
    while let Some(item) = iter.next() {
        match item {
            AttrItem::SlashDash(span) => match iter.next() {
                None => return Err(ParseError::new(ParseErrorKind::SlashdashNothing, span)),
                Some(AttrItem::Positional(_) | AttrItem::Property(..) | AttrItem::Block(..)) => {}
                Some(_) => {
                    return Err(ParseError::new(
                        ParseErrorKind::UnexpectedSlashdashTarget,
                        span,
                    ))
                }
            },
            AttrItem::Annotation(_, span) => {
                return Err(ParseError::new(ParseErrorKind::UnresolvedAnnotation, span))
            }
            AttrItem::Positional(value) => kept.push(Attribute::Positional(value)),
            AttrItem::Property(key, value) => kept.push(Attribute::Property(key, value)),
            // Children blocks are only pushed behind a slashdash marker, so
            // one surviving here means the accumulator is inconsistent.
            AttrItem::Block(_, span) => {
                return Err(ParseError::new(ParseErrorKind::InvalidNodeAttributes, span))
            }
        }
    }
    Ok(dedup_properties(kept))
}

/// Keep only the last occurrence of each property key, at its latest
/// position, with positional arguments untouched.
fn dedup_properties(attributes: Vec<Attribute>) -> Vec<Attribute> {
    let mut last: FxIndexMap<String, usize> = FxIndexMap::default();
    for (index, attribute) in attributes.iter().enumerate() {
        if let Some(key) = attribute.key() {
            last.insert(key.to_string(), index);
        }
    }

    attributes
        .into_iter()
        .enumerate()
        .filter_map(|(index, attribute)| {
            let keep = match attribute.key() {
                Some(key) => last.get(key) == Some(&index),
                None => true,
            };
            keep.then_some(attribute)
        })
        .collect()
}

/// Resolve slashdash markers for a finished document accumulator.
fn finalize_nodes(items: Vec<DocItem>) -> Result<Vec<Node>, ParseError> {
    let mut nodes = Vec::new();
    let mut iter = items.into_iter();
    while let Some(item) = iter.next() {
        match item {
            DocItem::SlashDash(span) => match iter.next() {
                None => return Err(ParseError::new(ParseErrorKind::SlashdashNothing, span)),
                Some(DocItem::Node(_) | DocItem::RawBlock(_)) => {}
                Some(_) => {
                    return Err(ParseError::new(
                        ParseErrorKind::UnexpectedSlashdashTarget,
                        span,
                    ))
                }
            },
            DocItem::Annotation(_, span) => {
                return Err(ParseError::new(ParseErrorKind::UnresolvedAnnotation, span))
            }
            DocItem::Node(node) => nodes.push(node),
            DocItem::RawBlock(span) => {
                return Err(ParseError::new(ParseErrorKind::RawBlockInDocument, span))
            }
        }
    }
    Ok(nodes)
}
