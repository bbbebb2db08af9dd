//! Markdown parsing (Markdown → folio tree)
//!
//! Pipeline: Markdown string → Comrak AST → folio `Node` tree, with directives recognized on the
//! way (see directives.rs).

use super::directives;
use crate::error::FormatError;
use comrak::nodes::{AstNode, ListType, NodeValue};
use comrak::{parse_document, Arena, ComrakOptions};
use folio_core::ast::builder::{code, heading, inline_code, paragraph, root, text, yaml};
use folio_core::{Node, Position};

const FRONT_MATTER_DELIMITER: &str = "---";

/// Parse a Markdown string into a `root` node
pub fn parse_from_markdown(source: &str) -> Result<Node, FormatError> {
    let arena = Arena::new();
    let options = default_comrak_options();
    let document = parse_document(&arena, source, &options);

    let children = document.children().flat_map(convert_block).collect();
    Ok(root(children))
}

fn default_comrak_options() -> ComrakOptions<'static> {
    let mut options = ComrakOptions::default();
    options.extension.strikethrough = true;
    options.extension.front_matter_delimiter = Some(FRONT_MATTER_DELIMITER.to_string());
    options
}

fn position_of<'a>(node: &'a AstNode<'a>) -> Position {
    let start = node.data.borrow().sourcepos.start;
    Position::new(start.line, start.column)
}

/// Convert a block-level comrak node. Paragraphs can split into several blocks when some of
/// their lines are leaf directives, and unsupported containers dissolve into their children.
fn convert_block<'a>(node: &'a AstNode<'a>) -> Vec<Node> {
    let position = position_of(node);
    let value = node.data.borrow().value.clone();

    let converted = match value {
        // Front-matter only ever opens the document.
        NodeValue::FrontMatter(raw) => {
            return vec![yaml(front_matter_payload(&raw)).with_position(Position::new(1, 1))]
        }
        NodeValue::Heading(h) => heading(u64::from(h.level), inline_children(node)),
        NodeValue::Paragraph => return paragraph_blocks(node, position),
        NodeValue::BlockQuote => Node::parent("blockquote", block_children(node)),
        NodeValue::List(list) => {
            let ordered = matches!(list.list_type, ListType::Ordered);
            let mut converted = Node::parent("list", block_children(node))
                .with_attr("ordered", ordered)
                .with_attr("spread", !list.tight);
            if ordered {
                converted = converted.with_attr("start", list.start as u64);
            }
            converted
        }
        NodeValue::Item(_) => Node::parent("listItem", block_children(node)),
        NodeValue::CodeBlock(block) => {
            let mut info = block.info.splitn(2, char::is_whitespace);
            let lang = info.next().filter(|lang| !lang.is_empty());
            let literal = block.literal.strip_suffix('\n').unwrap_or(&block.literal);
            let mut converted = code(lang, literal);
            if let Some(meta) = info.next().map(str::trim).filter(|meta| !meta.is_empty()) {
                converted = converted.with_attr("meta", meta);
            }
            converted
        }
        NodeValue::HtmlBlock(html) => {
            Node::leaf("html").with_attr("value", html.literal.trim_end_matches('\n'))
        }
        NodeValue::ThematicBreak => Node::leaf("thematicBreak"),
        _ => return block_children(node),
    };

    vec![converted.with_position(position)]
}

fn block_children<'a>(node: &'a AstNode<'a>) -> Vec<Node> {
    node.children().flat_map(convert_block).collect()
}

/// Comrak keeps the delimiters and trailing blank lines; the tree only keeps the payload.
fn front_matter_payload(raw: &str) -> String {
    let inner = raw.trim_end();
    let inner = inner.strip_prefix(FRONT_MATTER_DELIMITER).unwrap_or(inner);
    let inner = inner.strip_suffix(FRONT_MATTER_DELIMITER).unwrap_or(inner);
    // Only the fence's own line break goes, so payload lines keep their document offsets.
    let inner = inner
        .strip_prefix("\r\n")
        .or_else(|| inner.strip_prefix('\n'))
        .unwrap_or(inner);
    inner.trim_end_matches(['\n', '\r']).to_string()
}

fn paragraph_blocks<'a>(node: &'a AstNode<'a>, position: Position) -> Vec<Node> {
    let mut blocks = Vec::new();
    let mut pending: Vec<Node> = Vec::new();
    let mut pending_line = position.line;

    for (offset, line) in paragraph_lines(node).into_iter().enumerate() {
        let line = merge_text(line);
        let line_position = Position::new(position.line + offset, position.column);

        match as_leaf_directive(&line) {
            Some(directive) => {
                flush_paragraph(&mut pending, pending_line, position.column, &mut blocks);
                blocks.push(directive.with_position(line_position));
            }
            None => {
                if pending.is_empty() {
                    pending_line = line_position.line;
                } else {
                    pending.push(text("\n"));
                }
                pending.extend(line);
            }
        }
    }

    flush_paragraph(&mut pending, pending_line, position.column, &mut blocks);
    blocks
}

/// Inline content split at soft line breaks.
fn paragraph_lines<'a>(node: &'a AstNode<'a>) -> Vec<Vec<Node>> {
    let mut lines = vec![Vec::new()];
    for child in node.children() {
        if matches!(child.data.borrow().value, NodeValue::SoftBreak) {
            lines.push(Vec::new());
        } else if let Some(line) = lines.last_mut() {
            line.extend(convert_inline(child));
        }
    }
    lines
}

fn as_leaf_directive(line: &[Node]) -> Option<Node> {
    match line {
        [only] if only.is("text") => directives::leaf(only.value()?),
        _ => None,
    }
}

fn flush_paragraph(pending: &mut Vec<Node>, line: usize, column: usize, blocks: &mut Vec<Node>) {
    if pending.is_empty() {
        return;
    }
    let children = expand_text_directives(merge_text(std::mem::take(pending)));
    blocks.push(paragraph(children).with_position(Position::new(line, column)));
}

fn inline_children<'a>(node: &'a AstNode<'a>) -> Vec<Node> {
    let converted = node.children().flat_map(convert_inline).collect();
    expand_text_directives(merge_text(converted))
}

fn convert_inline<'a>(node: &'a AstNode<'a>) -> Vec<Node> {
    let value = node.data.borrow().value.clone();

    let converted = match value {
        NodeValue::Text(value) => text(value),
        NodeValue::SoftBreak => text("\n"),
        NodeValue::LineBreak => Node::leaf("break"),
        NodeValue::Code(c) => inline_code(c.literal),
        NodeValue::HtmlInline(raw) => Node::leaf("html").with_attr("value", raw),
        NodeValue::Emph => Node::parent("emphasis", inline_children(node)),
        NodeValue::Strong => Node::parent("strong", inline_children(node)),
        NodeValue::Strikethrough => Node::parent("delete", inline_children(node)),
        NodeValue::Link(link) => {
            let converted = Node::parent("link", inline_children(node)).with_attr("url", link.url);
            with_title(converted, link.title)
        }
        NodeValue::Image(link) => {
            let alt: String = inline_children(node).iter().map(Node::text_content).collect();
            let converted = Node::leaf("image")
                .with_attr("url", link.url)
                .with_attr("alt", alt);
            with_title(converted, link.title)
        }
        _ => return node.children().flat_map(convert_inline).collect(),
    };

    vec![converted]
}

fn with_title(node: Node, title: String) -> Node {
    if title.is_empty() {
        node
    } else {
        node.with_attr("title", title)
    }
}

/// Comrak splits text at every bracket and delimiter run; directives need it whole again.
fn merge_text(nodes: Vec<Node>) -> Vec<Node> {
    let mut merged: Vec<Node> = Vec::with_capacity(nodes.len());
    for node in nodes {
        if let (Some(previous), true) = (merged.last_mut(), node.is("text")) {
            if previous.is("text") {
                let joined = format!(
                    "{}{}",
                    previous.value().unwrap_or_default(),
                    node.value().unwrap_or_default()
                );
                *previous = text(joined);
                continue;
            }
        }
        merged.push(node);
    }
    merged
}

fn expand_text_directives(nodes: Vec<Node>) -> Vec<Node> {
    nodes
        .into_iter()
        .flat_map(|node| match node.value() {
            Some(value) if node.is("text") => directives::split_text(value),
            _ => vec![node],
        })
        .collect()
}
