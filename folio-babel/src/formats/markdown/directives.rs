//! Directive recognition on top of comrak's inline text.
//!
//!     Leaf:   `::name[label]{key=value}` filling a whole line (label and attributes optional)
//!     Text:   `:name[label]` anywhere in running text, not glued to a word or another colon
//!
//!     A backslash before the colon keeps the text literal. Attributes are kept as a string map
//!     under the `attributes` key of the directive node.

use folio_core::ast::builder::{leaf_directive, text, text_directive};
use folio_core::Node;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

static LEAF_DIRECTIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^::([A-Za-z][\w-]*)(?:\[([^\]]*)\])?(\{[^}]*\})?\s*$")
        .expect("leaf directive pattern is valid")
});

static TEXT_DIRECTIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(^|[^\w:\\]):([A-Za-z][\w-]*)\[([^\]]*)\](\{[^}]*\})?")
        .expect("text directive pattern is valid")
});

static ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([A-Za-z_][\w-]*)=(?:"([^"]*)"|([^\s"}]+))"#)
        .expect("attribute pattern is valid")
});

/// Reads a whole line as a leaf directive.
pub(super) fn leaf(line: &str) -> Option<Node> {
    let caps = LEAF_DIRECTIVE.captures(line.trim())?;
    let name = caps.get(1)?.as_str();
    let node = leaf_directive(name, label_children(caps.get(2).map(|m| m.as_str())));
    Some(with_attributes(node, caps.get(3).map(|m| m.as_str())))
}

/// Splits a text value around the text directives it contains.
///
/// Returns the value as a single text node when there are none.
pub(super) fn split_text(value: &str) -> Vec<Node> {
    let mut nodes = Vec::new();
    let mut pending = String::new();
    let mut cursor = 0;

    for caps in TEXT_DIRECTIVE.captures_iter(value) {
        let (Some(whole), Some(prefix), Some(name)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };
        pending.push_str(&value[cursor..whole.start()]);
        pending.push_str(prefix.as_str());
        if !pending.is_empty() {
            nodes.push(text(std::mem::take(&mut pending)));
        }
        let directive = text_directive(
            name.as_str(),
            label_children(caps.get(3).map(|m| m.as_str())),
        );
        nodes.push(with_attributes(directive, caps.get(4).map(|m| m.as_str())));
        cursor = whole.end();
    }

    pending.push_str(&value[cursor..]);
    if !pending.is_empty() {
        nodes.push(text(pending));
    }
    nodes
}

fn label_children(label: Option<&str>) -> Vec<Node> {
    match label {
        Some(label) if !label.is_empty() => vec![text(label)],
        _ => Vec::new(),
    }
}

fn with_attributes(node: Node, raw: Option<&str>) -> Node {
    let Some(raw) = raw else {
        return node;
    };
    let attributes: Map<String, Value> = ATTRIBUTE
        .captures_iter(raw)
        .filter_map(|caps| {
            let key = caps.get(1)?.as_str().to_string();
            let value = caps.get(2).or_else(|| caps.get(3))?.as_str().to_string();
            Some((key, Value::String(value)))
        })
        .collect();
    if attributes.is_empty() {
        node
    } else {
        node.with_attr("attributes", Value::Object(attributes))
    }
}
