//! kudl-sel - Path-based node selection
//!
//! A read-only query layer over the document model. A path is an ordered
//! sequence of selectors; matching is recursive, so a path finds its
//! pattern at any depth of the tree:
//!
//! - the head of the path is tried against each node; when the whole path
//!   is satisfied the node is included in the result
//! - a node matching the head continues the remaining path against its
//!   children
//! - independently, the full path is retried inside every node's children
//!
//! An empty path selects the sibling run it is applied to.
//!
//! # Example
//!
//! ```
//! use kudl_par::parse;
//! use kudl_sel::{select, Selector};
//!
//! let (document, _) = parse("a { b { c } }\nb").unwrap();
//! let matches = select(&document, &[Selector::name("b")]);
//! assert_eq!(matches.len(), 2);
//! ```

use kudl_par::{Document, Node, Value};

/// A predicate over one node's attributes, used inside [`Selector::Node`].
#[derive(Clone, Debug, PartialEq)]
pub enum AttrSelector {
    /// Some property has this key
    Key(String),
    /// Some property has this key and value
    KeyValue(String, Value),
    /// Some positional argument equals this value
    Value(Value),
}

impl AttrSelector {
    /// `(attr, key)` — any property with the key
    pub fn key(key: impl Into<String>) -> Self {
        AttrSelector::Key(key.into())
    }

    /// `(k, v)` shorthand — a property with the key and value
    pub fn key_value(key: impl Into<String>, value: Value) -> Self {
        AttrSelector::KeyValue(key.into(), value)
    }

    /// Bare `v` shorthand — a positional argument with the value
    pub fn value(value: Value) -> Self {
        AttrSelector::Value(value)
    }
}

/// One step of a selection path.
#[derive(Clone, Debug, PartialEq)]
pub enum Selector {
    /// Matches nodes by name
    Name(String),
    /// Matches nodes by name plus attribute predicates, all of which must
    /// hold
    Node {
        name: String,
        attrs: Vec<AttrSelector>,
    },
    /// Matches nodes carrying a property with the key (and value, when
    /// given)
    Attr {
        key: String,
        value: Option<Value>,
    },
    /// Matches nodes carrying a positional argument equal to the value
    Value(Value),
}

impl Selector {
    /// Select by node name
    pub fn name(name: impl Into<String>) -> Self {
        Selector::Name(name.into())
    }

    /// Select by node name and attribute predicates
    pub fn node(name: impl Into<String>, attrs: Vec<AttrSelector>) -> Self {
        Selector::Node {
            name: name.into(),
            attrs,
        }
    }

    /// Select nodes that have a property with the key
    pub fn attr(key: impl Into<String>) -> Self {
        Selector::Attr {
            key: key.into(),
            value: None,
        }
    }

    /// Select nodes that have a property with the key and value
    pub fn attr_eq(key: impl Into<String>, value: Value) -> Self {
        Selector::Attr {
            key: key.into(),
            value: Some(value),
        }
    }

    /// Select nodes that have a positional argument equal to the value
    pub fn value(value: Value) -> Self {
        Selector::Value(value)
    }
}

/// Returns every node in the document matched by the path, in document
/// order, outer matches before the matches found inside their children.
pub fn select(document: &Document, path: &[Selector]) -> Vec<Node> {
    select_nodes(document, path)
}

fn select_nodes(nodes: &[Node], path: &[Selector]) -> Vec<Node> {
    let Some((head, tail)) = path.split_first() else {
        // End of path: the remaining sibling run is the result.
        return nodes.to_vec();
    };

    let mut matches = Vec::new();
    for node in nodes {
        if node_matches(node, head) {
            if tail.is_empty() {
                matches.push(node.clone());
            } else if let Some(children) = &node.children {
                matches.extend(select_nodes(children, tail));
            }
        }
        // The full path is also tried deeper in the tree.
        if let Some(children) = &node.children {
            matches.extend(select_nodes(children, path));
        }
    }
    matches
}

fn node_matches(node: &Node, selector: &Selector) -> bool {
    match selector {
        Selector::Name(name) => node.name == *name,
        Selector::Node { name, attrs } => {
            node.name == *name && attrs.iter().all(|attr| attr_matches(node, attr))
        }
        Selector::Attr { key, value } => node.properties().any(|(k, v)| {
            k == key && value.as_ref().map_or(true, |want| v.matches(want))
        }),
        Selector::Value(want) => node.arguments().any(|v| v.matches(want)),
    }
}

fn attr_matches(node: &Node, selector: &AttrSelector) -> bool {
    match selector {
        AttrSelector::Key(key) => node.properties().any(|(k, _)| k == key),
        AttrSelector::KeyValue(key, want) => {
            node.properties().any(|(k, v)| k == key && v.matches(want))
        }
        AttrSelector::Value(want) => node.arguments().any(|v| v.matches(want)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kudl_par::{parse, IntegerFormat};

    fn doc(source: &str) -> Document {
        parse(source).expect(source).0
    }

    #[test]
    fn test_select_by_name_finds_nested() {
        let document = doc("node1 {\n  node2 {\n    node3\n  }\n}");
        let matches = select(&document, &[Selector::name("node2")]);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name, "node2");
        assert_eq!(matches[0].children.as_ref().unwrap()[0].name, "node3");
    }

    #[test]
    fn test_select_finds_all_occurrences() {
        let document = doc("item 1\ngroup { item 2; item 3 }");
        let matches = select(&document, &[Selector::name("item")]);
        assert_eq!(matches.len(), 3);
    }

    #[test]
    fn test_select_two_step_path() {
        let document = doc("a { b 1 }\nb 2\nc { a { b 3 } }");
        let matches = select(&document, &[Selector::name("a"), Selector::name("b")]);
        assert_eq!(matches.len(), 2);
        let firsts: Vec<_> = matches
            .iter()
            .map(|node| node.arguments().next().unwrap().as_integer().unwrap().to_string())
            .collect();
        assert_eq!(firsts, ["1", "3"]);
    }

    #[test]
    fn test_empty_path_returns_siblings() {
        let document = doc("a\nb\nc");
        let matches = select(&document, &[]);
        assert_eq!(matches.len(), 3);
    }

    #[test]
    fn test_select_by_attr_key() {
        let document = doc("a port=80\nb host=\"x\"\nc port=443");
        let matches = select(&document, &[Selector::attr("port")]);
        let names: Vec<_> = matches.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, ["a", "c"]);
    }

    #[test]
    fn test_select_by_attr_key_and_value() {
        let document = doc("a port=80\nb port=443");
        let matches = select(
            &document,
            &[Selector::attr_eq("port", Value::integer(443, IntegerFormat::Dec))],
        );
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name, "b");
    }

    #[test]
    fn test_select_by_positional_value() {
        let document = doc("a 1\nb 2\nc 1 2");
        let matches = select(
            &document,
            &[Selector::value(Value::integer(2, IntegerFormat::Dec))],
        );
        let names: Vec<_> = matches.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, ["b", "c"]);
    }

    #[test]
    fn test_select_node_with_attr_predicates() {
        let document = doc("svc port=80 tls\nsvc port=8080");
        let matches = select(
            &document,
            &[Selector::node(
                "svc",
                vec![AttrSelector::key_value(
                    "port",
                    Value::integer(8080, IntegerFormat::Dec),
                )],
            )],
        );
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].arguments().count(), 0);
    }

    #[test]
    fn test_node_attr_value_shorthand() {
        let document = doc("svc tls port=1\nsvc plain port=2");
        let matches = select(
            &document,
            &[Selector::node("svc", vec![AttrSelector::value(Value::id("tls"))])],
        );
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].property("port").unwrap().as_integer().unwrap().to_string(), "1");
    }

    #[test]
    fn test_value_match_ignores_radix_format() {
        let document = doc("n 0xFF");
        let matches = select(
            &document,
            &[Selector::value(Value::integer(255, IntegerFormat::Dec))],
        );
        assert_eq!(matches.len(), 1);
    }

    #[test]
    fn test_no_match_returns_empty() {
        let document = doc("a\nb");
        assert!(select(&document, &[Selector::name("zzz")]).is_empty());
    }
}
