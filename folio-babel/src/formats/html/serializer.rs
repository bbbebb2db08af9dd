//! HTML serialization (folio tree → HTML export)
//!
//! Pipeline: folio tree → RcDom (HTML DOM tree) → HTML string, optionally wrapped in a document.

use crate::error::FormatError;
use crate::formats::heading_depth;
use folio_core::Node as TreeNode;
use html5ever::{
    ns, serialize, serialize::SerializeOpts, serialize::TraversalScope, Attribute, LocalName,
    QualName,
};
use markup5ever_rcdom::{Handle, Node, NodeData, SerializableHandle};
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::default::Default;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HtmlOptions {
    /// Wrap the fragment in a full HTML document
    pub document: bool,
}

/// Serialize a tree to HTML
pub fn serialize_to_html(tree: &TreeNode, options: HtmlOptions) -> Result<String, FormatError> {
    let container = create_element("div", vec![]);
    append_block(&container, tree, false)?;

    let body = serialize_children(&container, "\n")?;
    if options.document {
        wrap_in_document(&body, &document_title(tree)?)
    } else {
        Ok(body)
    }
}

fn append_blocks(parent: &Handle, nodes: &[TreeNode], tight: bool) -> Result<(), FormatError> {
    for node in nodes {
        append_block(parent, node, tight)?;
    }
    Ok(())
}

fn append_block(parent: &Handle, node: &TreeNode, tight: bool) -> Result<(), FormatError> {
    let element = match node.kind.as_str() {
        "root" => return append_blocks(parent, node.children(), tight),
        "heading" => {
            let tag = format!("h{}", heading_depth(node)?);
            with_inline(create_element(&tag, vec![]), node)?
        }
        "paragraph" if tight => return append_inline(parent, node.children()),
        "paragraph" => with_inline(create_element("p", vec![]), node)?,
        "blockquote" => {
            let quote = create_element("blockquote", vec![]);
            append_blocks(&quote, node.children(), false)?;
            quote
        }
        "list" => list_element(node)?,
        "code" => {
            let class = node.str_attr("lang").map(|lang| format!("language-{lang}"));
            let attrs = match &class {
                Some(class) => vec![("class", class.as_str())],
                None => vec![],
            };
            let pre = create_element("pre", vec![]);
            let code = create_element("code", attrs);
            append(&code, create_text(node.value().unwrap_or_default()));
            append(&pre, code);
            pre
        }
        "thematicBreak" => create_element("hr", vec![]),
        "yaml" | "html" => return Ok(()),
        "leafDirective" => with_inline(create_element("p", vec![]), node)?,
        kind if is_inline(kind) => {
            return append_inline(parent, std::slice::from_ref(node));
        }
        _ => return append_blocks(parent, node.children(), tight),
    };
    append(parent, element);
    Ok(())
}

fn list_element(node: &TreeNode) -> Result<Handle, FormatError> {
    let ordered = node.attr("ordered").and_then(Value::as_bool).unwrap_or(false);
    let tight = !node.attr("spread").and_then(Value::as_bool).unwrap_or(false);

    let start = node.u64_attr("start").filter(|start| *start != 1).map(|s| s.to_string());
    let list = match (ordered, &start) {
        (true, Some(start)) => create_element("ol", vec![("start", start.as_str())]),
        (true, None) => create_element("ol", vec![]),
        (false, _) => create_element("ul", vec![]),
    };

    for item in node.children() {
        let li = create_element("li", vec![]);
        append_blocks(&li, item.children(), tight)?;
        append(&list, li);
    }
    Ok(list)
}

fn is_inline(kind: &str) -> bool {
    matches!(
        kind,
        "text"
            | "emphasis"
            | "strong"
            | "delete"
            | "inlineCode"
            | "break"
            | "link"
            | "image"
            | "textDirective"
    )
}

fn with_inline(element: Handle, node: &TreeNode) -> Result<Handle, FormatError> {
    append_inline(&element, node.children())?;
    Ok(element)
}

fn append_inline(parent: &Handle, nodes: &[TreeNode]) -> Result<(), FormatError> {
    for node in nodes {
        let element = match node.kind.as_str() {
            "text" => create_text(node.value().unwrap_or_default()),
            "emphasis" => with_inline(create_element("em", vec![]), node)?,
            "strong" => with_inline(create_element("strong", vec![]), node)?,
            "delete" => with_inline(create_element("del", vec![]), node)?,
            "inlineCode" => {
                let code = create_element("code", vec![]);
                append(&code, create_text(node.value().unwrap_or_default()));
                code
            }
            "break" => create_element("br", vec![]),
            "link" => {
                let mut attrs = vec![("href", node.str_attr("url").unwrap_or_default())];
                if let Some(title) = node.str_attr("title") {
                    attrs.push(("title", title));
                }
                with_inline(create_element("a", attrs), node)?
            }
            "image" => {
                let mut attrs = vec![
                    ("src", node.str_attr("url").unwrap_or_default()),
                    ("alt", node.str_attr("alt").unwrap_or_default()),
                ];
                if let Some(title) = node.str_attr("title") {
                    attrs.push(("title", title));
                }
                create_element("img", attrs)
            }
            "html" | "yaml" => continue,
            _ if node.is_leaf() => create_text(node.value().unwrap_or_default()),
            _ => {
                append_inline(parent, node.children())?;
                continue;
            }
        };
        append(parent, element);
    }
    Ok(())
}

fn document_title(tree: &TreeNode) -> Result<String, FormatError> {
    let heading = tree
        .children()
        .iter()
        .find(|node| node.is("heading"))
        .map(TreeNode::text_content)
        .unwrap_or_else(|| "folio".to_string());
    let title = create_element("title", vec![]);
    append(&title, create_text(&heading));
    let holder = create_element("head", vec![]);
    append(&holder, title);
    serialize_children(&holder, "")
}

fn append(parent: &Handle, child: Handle) {
    parent.children.borrow_mut().push(child);
}

/// Create an HTML element with attributes
fn create_element(tag: &str, attrs: Vec<(&str, &str)>) -> Handle {
    let qual_name = QualName::new(None, ns!(html), LocalName::from(tag));
    let attributes = attrs
        .into_iter()
        .map(|(name, value)| Attribute {
            name: QualName::new(None, ns!(), LocalName::from(name)),
            value: value.to_string().into(),
        })
        .collect();

    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Element {
            name: qual_name,
            attrs: RefCell::new(attributes),
            template_contents: Default::default(),
            mathml_annotation_xml_integration_point: false,
        },
    })
}

/// Create a text node
fn create_text(text: &str) -> Handle {
    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Text {
            contents: RefCell::new(text.to_string().into()),
        },
    })
}

/// Serialize the children of `container`, joined by `separator`
fn serialize_children(container: &Handle, separator: &str) -> Result<String, FormatError> {
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::IncludeNode,
        ..Default::default()
    };

    let mut parts = Vec::new();
    for child in container.children.borrow().iter() {
        let mut output = Vec::new();
        let serializable = SerializableHandle::from(child.clone());
        serialize(&mut output, &serializable, opts.clone()).map_err(|e| {
            FormatError::SerializationError(format!("HTML serialization failed: {}", e))
        })?;
        parts.push(String::from_utf8(output).map_err(|e| {
            FormatError::SerializationError(format!("UTF-8 conversion failed: {}", e))
        })?);
    }
    Ok(parts.join(separator))
}

/// Wrap the content in a complete HTML document
fn wrap_in_document(body_html: &str, title_html: &str) -> Result<String, FormatError> {
    let html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <meta name="generator" content="folio">
  {}
</head>
<body>
{}
</body>
</html>"#,
        title_html, body_html
    );

    Ok(html)
}
