//! kudl-enc - Canonical KDL v2 Encoder
//!
//! The encoder is the reverse pipeline phase: it renders a document model
//! back into canonical KDL v2 text.
//!
//! ```text
//! Document
//!     |
//!     v
//! [Encoder] --> canonical UTF-8 text
//! ```
//!
//! The canonical form always re-parses, and re-encoding the result is a
//! fixed point: names and string values are written bare exactly when the
//! identifier rules allow it, integers keep their source radix (unless
//! overridden), floats print in uppercase scientific notation, children
//! are indented by four spaces, and every node ends with a newline.
//! Comments and original spacing are not preserved; that is by
//! construction, the model never holds them.
//!
//! # Example
//!
//! ```
//! use kudl_enc::{encode, EncodeOptions};
//! use kudl_par::{IntegerFormat, Node, Value};
//!
//! let document = vec![Node::new("node").with_argument(Value::integer(255, IntegerFormat::Hex))];
//! let text = encode(&document, EncodeOptions::default()).unwrap();
//! assert_eq!(text, "node 0xff\n");
//! ```

mod error;
mod escape;

pub use error::EncodeError;

use num_bigint::{BigInt, Sign};

use escape::push_name;
use kudl_par::{Attribute, Document, IntegerFormat, Node, Payload, Value, ValueType};

/// Encoding options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Render every integer in this radix instead of its source radix.
    pub integer_format: Option<IntegerFormat>,
}

/// Renders a document as canonical KDL v2 text.
///
/// Each top-level node is emitted followed by a newline; the empty
/// document encodes to a single newline.
pub fn encode(document: &Document, options: EncodeOptions) -> Result<String, EncodeError> {
    let mut out = String::new();
    if document.is_empty() {
        out.push('\n');
        return Ok(out);
    }
    for node in document {
        encode_node(node, 0, options, &mut out)?;
    }
    Ok(out)
}

fn encode_node(
    node: &Node,
    depth: usize,
    options: EncodeOptions,
    out: &mut String,
) -> Result<(), EncodeError> {
    push_indent(depth, out);
    for annotation in &node.annotations {
        out.push('(');
        push_name(annotation, out);
        out.push(')');
    }
    push_name(&node.name, out);

    for attribute in &node.attributes {
        out.push(' ');
        match attribute {
            Attribute::Positional(value) => encode_value(value, options, out)?,
            Attribute::Property(key, value) => {
                match key.as_str() {
                    Some(key) => push_name(key, out),
                    None => return Err(EncodeError::MismatchedPayload),
                }
                out.push('=');
                encode_value(value, options, out)?;
            }
        }
    }

    // Empty children blocks are elided rather than printed as `{ }`.
    if let Some(children) = node.children.as_ref().filter(|children| !children.is_empty()) {
        out.push_str(" {\n");
        for child in children {
            encode_node(child, depth + 1, options, out)?;
        }
        push_indent(depth, out);
        out.push('}');
    }

    out.push('\n');
    Ok(())
}

fn encode_value(
    value: &Value,
    options: EncodeOptions,
    out: &mut String,
) -> Result<(), EncodeError> {
    for annotation in &value.annotations {
        out.push('(');
        push_name(annotation, out);
        out.push(')');
    }

    match (value.ty, &value.value) {
        (ValueType::Null, Payload::Nil) => out.push_str("#null"),
        (ValueType::Nan, Payload::Nil) => out.push_str("#nan"),
        (ValueType::Boolean, Payload::Bool(true)) => out.push_str("#true"),
        (ValueType::Boolean, Payload::Bool(false)) => out.push_str("#false"),
        (ValueType::Infinity, Payload::Bool(positive)) => {
            out.push_str(if *positive { "#inf" } else { "#-inf" })
        }
        (ValueType::Keyword, Payload::Str(name)) => {
            if !kudl_lex::valid_identifier(name) {
                return Err(EncodeError::InvalidKeyword {
                    keyword: name.clone(),
                });
            }
            out.push('#');
            out.push_str(name);
        }
        (ValueType::String, Payload::Str(text)) => push_name(text, out),
        (ValueType::Id, Payload::Str(lexeme)) => out.push_str(lexeme),
        (ValueType::Integer, Payload::Integer(int)) => {
            push_integer(int, options.integer_format.unwrap_or(value.format), out)
        }
        (ValueType::Float, Payload::Float(decimal)) => out.push_str(&decimal.to_string()),
        _ => return Err(EncodeError::MismatchedPayload),
    }
    Ok(())
}

/// Appends an integer in the given radix, sign first, hex digits in
/// lowercase.
fn push_integer(value: &BigInt, format: IntegerFormat, out: &mut String) {
    if value.sign() == Sign::Minus {
        out.push('-');
    }
    let magnitude = value.magnitude();
    match format {
        IntegerFormat::Bin => {
            out.push_str("0b");
            out.push_str(&magnitude.to_str_radix(2));
        }
        IntegerFormat::Oct => {
            out.push_str("0o");
            out.push_str(&magnitude.to_str_radix(8));
        }
        IntegerFormat::Hex => {
            out.push_str("0x");
            out.push_str(&magnitude.to_str_radix(16));
        }
        IntegerFormat::Dec | IntegerFormat::Plain => out.push_str(&magnitude.to_str_radix(10)),
    }
}

fn push_indent(depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push_str("    ");
    }
}
