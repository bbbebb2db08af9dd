//! Tree model
//!
//!     A [`Node`] is a tagged value: a `type` discriminator, a bag of ad hoc attributes (`depth`
//!     for headings, `name` for directives, `value` for text and metadata blocks...) and, for
//!     containers, an ordered list of children. Leaves have no children at all, which is different
//!     from a container that happens to be empty.
//!
//!     The serde shape is the usual unist/mdast JSON one:
//!
//!         { "type": "heading", "depth": 1, "children": [ { "type": "text", "value": "Hi" } ] }
//!
//!     so fixtures can be written as JSON.

pub mod builder;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::fmt;

/// Source location of the first character of a node (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Node>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl Node {
    /// A node with no children.
    pub fn leaf(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            attributes: Map::new(),
            children: None,
            position: None,
        }
    }

    /// A container node.
    pub fn parent(kind: impl Into<String>, children: Vec<Node>) -> Self {
        Self {
            kind: kind.into(),
            attributes: Map::new(),
            children: Some(children),
            position: None,
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn is(&self, kind: &str) -> bool {
        self.kind == kind
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Children in source order; empty for leaves.
    pub fn children(&self) -> &[Node] {
        self.children.as_deref().unwrap_or(&[])
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        self.children.as_mut()
    }

    pub fn attr(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn str_attr(&self, key: &str) -> Option<&str> {
        self.attr(key).and_then(Value::as_str)
    }

    pub fn u64_attr(&self, key: &str) -> Option<u64> {
        self.attr(key).and_then(Value::as_u64)
    }

    /// Heading level, for nodes that carry one.
    pub fn depth(&self) -> Option<u64> {
        self.u64_attr("depth")
    }

    /// The `value` attribute of text-like nodes (`text`, `code`, `yaml`, ...).
    pub fn value(&self) -> Option<&str> {
        self.str_attr("value")
    }

    /// Looks up a field the way partial matching sees it: `type` is the discriminator,
    /// `children` is the serialized child list, anything else is an attribute.
    pub fn field(&self, key: &str) -> Option<Cow<'_, Value>> {
        match key {
            "type" => Some(Cow::Owned(Value::String(self.kind.clone()))),
            "children" => self
                .children
                .as_ref()
                .and_then(|children| serde_json::to_value(children).ok())
                .map(Cow::Owned),
            _ => self.attr(key).map(Cow::Borrowed),
        }
    }

    /// Concatenated `value` of every descendant text-like leaf, in document order.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    /// Number of nodes in the subtree, this one included.
    pub fn size(&self) -> usize {
        1 + self.children().iter().map(Node::size).sum::<usize>()
    }

    /// Copy of the subtree with every position dropped. Handy when comparing parser output
    /// against hand-built trees.
    pub fn without_positions(&self) -> Node {
        Node {
            kind: self.kind.clone(),
            attributes: self.attributes.clone(),
            children: self
                .children
                .as_ref()
                .map(|children| children.iter().map(Node::without_positions).collect()),
            position: None,
        }
    }
}

fn collect_text(node: &Node, out: &mut String) {
    if node.is_leaf() {
        if let Some(value) = node.value() {
            out.push_str(value);
        }
        return;
    }
    for child in node.children() {
        collect_text(child, out);
    }
}
