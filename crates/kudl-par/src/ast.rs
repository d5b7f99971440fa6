//! kudl-par - Document model definitions
//!
//! This module contains the immutable document model produced by the
//! parser and consumed by the encoder and selector.

use kudl_util::Decimal;
use num_bigint::BigInt;

/// Document root - an ordered sequence of top-level nodes
pub type Document = Vec<Node>;

/// The semantic type of a [`Value`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueType {
    /// A bare identifier, stored verbatim
    Id,
    /// A signed arbitrary-precision integer
    Integer,
    /// An arbitrary-precision decimal
    Float,
    /// `#true` or `#false`
    Boolean,
    /// A quoted or raw string
    String,
    /// `#null`
    Null,
    /// Any `#name` outside the recognized keyword set
    Keyword,
    /// `#inf` or `#-inf`
    Infinity,
    /// `#nan`
    Nan,
}

/// The radix a decoded integer was written in, preserved so the encoder
/// can reproduce the original lexeme
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntegerFormat {
    /// Not an integer
    Plain,
    /// `0b...`
    Bin,
    /// `0o...`
    Oct,
    /// Plain decimal digits
    Dec,
    /// `0x...`
    Hex,
}

/// The payload carried by a [`Value`]
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    /// Signed arbitrary-precision integer
    Integer(BigInt),
    /// Arbitrary-precision decimal
    Float(Decimal),
    /// Boolean; also carries the sign of an infinity value
    Bool(bool),
    /// No payload (`#null`, `#nan`)
    Nil,
    /// Identifier lexeme, string content, or keyword name
    Str(String),
}

/// An atomic attribute value
///
/// Invariants: `ty == Integer` implies an `Integer` payload and a concrete
/// radix format; `ty == Float` implies a `Float` payload; `ty == Null`
/// implies `Nil`. Annotation strings are fully unescaped.
#[derive(Clone, Debug, PartialEq)]
pub struct Value {
    pub value: Payload,
    pub ty: ValueType,
    pub format: IntegerFormat,
    pub annotations: Vec<String>,
}

impl Value {
    fn plain(value: Payload, ty: ValueType) -> Self {
        Self {
            value,
            ty,
            format: IntegerFormat::Plain,
            annotations: Vec::new(),
        }
    }

    /// A bare identifier value
    pub fn id(lexeme: impl Into<String>) -> Self {
        Self::plain(Payload::Str(lexeme.into()), ValueType::Id)
    }

    /// A string value
    pub fn string(text: impl Into<String>) -> Self {
        Self::plain(Payload::Str(text.into()), ValueType::String)
    }

    /// An integer value with its source radix
    pub fn integer(value: impl Into<BigInt>, format: IntegerFormat) -> Self {
        Self {
            value: Payload::Integer(value.into()),
            ty: ValueType::Integer,
            format,
            annotations: Vec::new(),
        }
    }

    /// A float value
    pub fn float(value: Decimal) -> Self {
        Self::plain(Payload::Float(value), ValueType::Float)
    }

    /// `#true` / `#false`
    pub fn boolean(value: bool) -> Self {
        Self::plain(Payload::Bool(value), ValueType::Boolean)
    }

    /// `#null`
    pub fn null() -> Self {
        Self::plain(Payload::Nil, ValueType::Null)
    }

    /// A generic `#name` keyword
    pub fn keyword(name: impl Into<String>) -> Self {
        Self::plain(Payload::Str(name.into()), ValueType::Keyword)
    }

    /// `#inf` (positive) or `#-inf` (negative)
    pub fn infinity(positive: bool) -> Self {
        Self::plain(Payload::Bool(positive), ValueType::Infinity)
    }

    /// `#nan`
    pub fn nan() -> Self {
        Self::plain(Payload::Nil, ValueType::Nan)
    }

    /// Attach an annotation, builder style
    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotations.push(annotation.into());
        self
    }

    /// The first annotation, if any
    pub fn annotation(&self) -> Option<&str> {
        self.annotations.first().map(String::as_str)
    }

    /// The string payload of an id, string, or keyword value
    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            Payload::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The integer payload, if this is an integer value
    pub fn as_integer(&self) -> Option<&BigInt> {
        match &self.value {
            Payload::Integer(i) => Some(i),
            _ => None,
        }
    }

    /// Structural equality for selector matching: compares type and
    /// payload, ignoring annotations and radix format
    pub fn matches(&self, other: &Value) -> bool {
        self.ty == other.ty && self.value == other.value
    }
}

/// One attribute of a node: a positional argument or a `key=value`
/// property
///
/// Property keys are id-typed values with no annotations; within one node
/// the most recent occurrence of a property key wins.
#[derive(Clone, Debug, PartialEq)]
pub enum Attribute {
    Positional(Value),
    Property(Value, Value),
}

impl Attribute {
    /// The property key string, for property attributes
    pub fn key(&self) -> Option<&str> {
        match self {
            Attribute::Property(key, _) => key.as_str(),
            Attribute::Positional(_) => None,
        }
    }

    /// The attribute's value (the property value for properties)
    pub fn value(&self) -> &Value {
        match self {
            Attribute::Positional(value) => value,
            Attribute::Property(_, value) => value,
        }
    }
}

/// A document element: named, optionally annotated, with ordered
/// attributes and an optional children block
///
/// `children` distinguishes "no brace block" (`None`) from "an empty brace
/// block" (`Some(vec![])`); the encoder elides the latter.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub name: String,
    pub annotations: Vec<String>,
    pub attributes: Vec<Attribute>,
    pub children: Option<Vec<Node>>,
}

impl Node {
    /// A bare node with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            annotations: Vec::new(),
            attributes: Vec::new(),
            children: None,
        }
    }

    /// Attach an annotation, builder style
    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotations.push(annotation.into());
        self
    }

    /// Append a positional argument, builder style
    pub fn with_argument(mut self, value: Value) -> Self {
        self.attributes.push(Attribute::Positional(value));
        self
    }

    /// Append a property, builder style
    pub fn with_property(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attributes
            .push(Attribute::Property(Value::id(key), value));
        self
    }

    /// Attach a children block, builder style
    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = Some(children);
        self
    }

    /// Iterate the positional arguments in order
    pub fn arguments(&self) -> impl Iterator<Item = &Value> {
        self.attributes.iter().filter_map(|attr| match attr {
            Attribute::Positional(value) => Some(value),
            Attribute::Property(..) => None,
        })
    }

    /// Iterate the properties in order
    pub fn properties(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.attributes.iter().filter_map(|attr| match attr {
            Attribute::Property(key, value) => key.as_str().map(|k| (k, value)),
            Attribute::Positional(_) => None,
        })
    }

    /// Look up a property by key
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties()
            .find_map(|(k, value)| (k == key).then_some(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_constructors_uphold_invariants() {
        let int = Value::integer(255, IntegerFormat::Hex);
        assert_eq!(int.ty, ValueType::Integer);
        assert_eq!(int.format, IntegerFormat::Hex);
        assert_eq!(int.as_integer(), Some(&BigInt::from(255)));

        let null = Value::null();
        assert_eq!(null.ty, ValueType::Null);
        assert_eq!(null.value, Payload::Nil);
        assert_eq!(null.format, IntegerFormat::Plain);
    }

    #[test]
    fn test_value_matches_ignores_annotations_and_format() {
        let a = Value::integer(10, IntegerFormat::Dec).with_annotation("u8");
        let b = Value::integer(10, IntegerFormat::Hex);
        assert!(a.matches(&b));
        assert!(!a.matches(&Value::integer(11, IntegerFormat::Dec)));
        assert!(!Value::id("x").matches(&Value::string("x")));
    }

    #[test]
    fn test_node_builders_and_accessors() {
        let node = Node::new("server")
            .with_annotation("config")
            .with_argument(Value::integer(1, IntegerFormat::Dec))
            .with_property("host", Value::string("localhost"))
            .with_argument(Value::boolean(true));

        assert_eq!(node.arguments().count(), 2);
        assert_eq!(node.properties().count(), 1);
        assert_eq!(
            node.property("host").and_then(Value::as_str),
            Some("localhost")
        );
        assert!(node.property("port").is_none());
        assert!(node.children.is_none());
    }

    #[test]
    fn test_empty_children_is_distinct_from_none() {
        let bare = Node::new("a");
        let braced = Node::new("a").with_children(vec![]);
        assert_ne!(bare, braced);
    }
}
