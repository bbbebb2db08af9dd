//! Markdown serialization (folio tree → Markdown export)
//!
//! Blocks are separated by a blank line, container content is indented or prefixed line by
//! line, and text is escaped only as far as needed to read back the same tree.

use super::escape::{calculate_fence_length, calculate_inline_code_ticks, escape_markdown};
use crate::error::FormatError;
use crate::formats::heading_depth;
use folio_core::Node;
use serde_json::Value;

const BLOCK_KINDS: &[&str] = &[
    "root",
    "heading",
    "paragraph",
    "blockquote",
    "list",
    "listItem",
    "code",
    "thematicBreak",
    "yaml",
    "html",
    "leafDirective",
];

/// Serialize a tree to Markdown
pub fn serialize_to_markdown(node: &Node) -> Result<String, FormatError> {
    if BLOCK_KINDS.contains(&node.kind.as_str()) {
        block(node)
    } else {
        inline(std::slice::from_ref(node))
    }
}

fn blocks(nodes: &[Node]) -> Result<String, FormatError> {
    let mut rendered = Vec::with_capacity(nodes.len());
    for node in nodes {
        let out = if BLOCK_KINDS.contains(&node.kind.as_str()) {
            block(node)?
        } else {
            inline(std::slice::from_ref(node))?
        };
        if !out.is_empty() {
            rendered.push(out);
        }
    }
    Ok(rendered.join("\n\n"))
}

fn block(node: &Node) -> Result<String, FormatError> {
    match node.kind.as_str() {
        "root" | "listItem" => blocks(node.children()),
        "heading" => {
            let depth = heading_depth(node)?;
            Ok(format!("{} {}", "#".repeat(depth), inline(node.children())?))
        }
        "paragraph" => inline(node.children()),
        "blockquote" => {
            let content = blocks(node.children())?;
            Ok(prefix_lines(&content, "> ", ">"))
        }
        "list" => list_block(node),
        "code" => {
            let value = node.value().unwrap_or_default();
            let fence = "`".repeat(calculate_fence_length(value, '`'));
            let mut info = node.str_attr("lang").unwrap_or_default().to_string();
            if let Some(meta) = node.str_attr("meta") {
                info.push(' ');
                info.push_str(meta);
            }
            Ok(format!("{fence}{info}\n{value}\n{fence}"))
        }
        "thematicBreak" => Ok("***".to_string()),
        "yaml" => Ok(format!("---\n{}\n---", node.value().unwrap_or_default())),
        "html" => Ok(node.value().unwrap_or_default().to_string()),
        "leafDirective" => directive("::", node),
        _ => blocks(node.children()),
    }
}

fn list_block(node: &Node) -> Result<String, FormatError> {
    let ordered = node.attr("ordered").and_then(Value::as_bool).unwrap_or(false);
    let spread = node.attr("spread").and_then(Value::as_bool).unwrap_or(false);
    let start = node.u64_attr("start").unwrap_or(1);

    let mut items = Vec::with_capacity(node.children().len());
    for (index, item) in node.children().iter().enumerate() {
        let marker = if ordered {
            format!("{}.", start + index as u64)
        } else {
            "-".to_string()
        };
        let content = blocks(item.children())?;
        let indent = " ".repeat(marker.len() + 1);
        let mut lines = content.lines();
        let first = lines.next().unwrap_or_default();
        let mut rendered = format!("{marker} {first}").trim_end().to_string();
        for line in lines {
            rendered.push('\n');
            if !line.is_empty() {
                rendered.push_str(&indent);
                rendered.push_str(line);
            }
        }
        items.push(rendered);
    }

    Ok(items.join(if spread { "\n\n" } else { "\n" }))
}

fn prefix_lines(content: &str, prefix: &str, blank: &str) -> String {
    content
        .lines()
        .map(|line| {
            if line.is_empty() {
                blank.to_string()
            } else {
                format!("{prefix}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn directive(marker: &str, node: &Node) -> Result<String, FormatError> {
    let name = node.str_attr("name").unwrap_or_default();
    let mut out = format!("{marker}{name}");
    if !node.children().is_empty() {
        out.push_str(&format!("[{}]", inline(node.children())?));
    }
    if let Some(Value::Object(attributes)) = node.attr("attributes") {
        let pairs: Vec<String> = attributes
            .iter()
            .map(|(key, value)| match value {
                Value::String(value) => format!("{key}=\"{value}\""),
                other => format!("{key}={other}"),
            })
            .collect();
        out.push_str(&format!("{{{}}}", pairs.join(" ")));
    }
    Ok(out)
}

fn inline(nodes: &[Node]) -> Result<String, FormatError> {
    let mut out = String::new();
    for node in nodes {
        match node.kind.as_str() {
            "text" => out.push_str(&escape_markdown(node.value().unwrap_or_default())),
            "emphasis" => out.push_str(&format!("*{}*", inline(node.children())?)),
            "strong" => out.push_str(&format!("**{}**", inline(node.children())?)),
            "delete" => out.push_str(&format!("~~{}~~", inline(node.children())?)),
            "inlineCode" => {
                let value = node.value().unwrap_or_default();
                let ticks = "`".repeat(calculate_inline_code_ticks(value));
                let pad = if value.starts_with('`') || value.ends_with('`') {
                    " "
                } else {
                    ""
                };
                out.push_str(&format!("{ticks}{pad}{value}{pad}{ticks}"));
            }
            "break" => out.push_str("\\\n"),
            "link" => out.push_str(&format!(
                "[{}]({}{})",
                inline(node.children())?,
                node.str_attr("url").unwrap_or_default(),
                title_suffix(node)
            )),
            "image" => out.push_str(&format!(
                "![{}]({}{})",
                escape_markdown(node.str_attr("alt").unwrap_or_default()),
                node.str_attr("url").unwrap_or_default(),
                title_suffix(node)
            )),
            "html" => out.push_str(node.value().unwrap_or_default()),
            "textDirective" => out.push_str(&directive(":", node)?),
            _ if node.is_leaf() => {
                out.push_str(&escape_markdown(node.value().unwrap_or_default()))
            }
            _ => out.push_str(&inline(node.children())?),
        }
    }
    Ok(out)
}

fn title_suffix(node: &Node) -> String {
    match node.str_attr("title") {
        Some(title) => format!(" \"{}\"", title.replace('"', "\\\"")),
        None => String::new(),
    }
}
