//! Shorthand constructors for the node types folio works with.
//!
//! Used by the markdown parser and throughout the tests to spell trees inline.

use super::Node;

pub fn root(children: Vec<Node>) -> Node {
    Node::parent("root", children)
}

pub fn heading(depth: u64, children: Vec<Node>) -> Node {
    Node::parent("heading", children).with_attr("depth", depth)
}

pub fn paragraph(children: Vec<Node>) -> Node {
    Node::parent("paragraph", children)
}

pub fn text(value: impl Into<String>) -> Node {
    Node::leaf("text").with_attr("value", value.into())
}

pub fn emphasis(children: Vec<Node>) -> Node {
    Node::parent("emphasis", children)
}

pub fn strong(children: Vec<Node>) -> Node {
    Node::parent("strong", children)
}

pub fn inline_code(value: impl Into<String>) -> Node {
    Node::leaf("inlineCode").with_attr("value", value.into())
}

pub fn code(lang: Option<&str>, value: impl Into<String>) -> Node {
    let node = Node::leaf("code").with_attr("value", value.into());
    match lang {
        Some(lang) => node.with_attr("lang", lang),
        None => node,
    }
}

pub fn blockquote(children: Vec<Node>) -> Node {
    Node::parent("blockquote", children)
}

pub fn list(ordered: bool, children: Vec<Node>) -> Node {
    Node::parent("list", children).with_attr("ordered", ordered)
}

pub fn list_item(children: Vec<Node>) -> Node {
    Node::parent("listItem", children)
}

pub fn link(url: impl Into<String>, children: Vec<Node>) -> Node {
    Node::parent("link", children).with_attr("url", url.into())
}

pub fn thematic_break() -> Node {
    Node::leaf("thematicBreak")
}

/// A front-matter block holding its raw, undelimited payload.
pub fn yaml(value: impl Into<String>) -> Node {
    Node::leaf("yaml").with_attr("value", value.into())
}

/// `::name[label]` on a line of its own.
pub fn leaf_directive(name: impl Into<String>, children: Vec<Node>) -> Node {
    Node::parent("leafDirective", children).with_attr("name", name.into())
}

/// `:name[label]` inside running text.
pub fn text_directive(name: impl Into<String>, children: Vec<Node>) -> Node {
    Node::parent("textDirective", children).with_attr("name", name.into())
}
