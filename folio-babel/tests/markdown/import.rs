//! Import tests for Markdown format (Markdown → tree)
//!
//! These tests check the tree shapes the paging engine relies on: front-matter blocks, leaf
//! and text directives, heading depths and source positions.

use folio_babel::format::Format;
use folio_babel::formats::markdown::MarkdownFormat;
use folio_core::ast::builder::*;
use folio_core::{Node, Position};
use pretty_assertions::assert_eq;
use serde_json::json;

/// Helper to parse Markdown without positions
fn md_to_tree(md: &str) -> Node {
    MarkdownFormat
        .parse(md)
        .expect("Should parse markdown")
        .without_positions()
}

#[test]
fn test_empty_document() {
    assert_eq!(md_to_tree(""), root(vec![]));
}

#[test]
fn test_scenario_document() {
    assert_eq!(
        md_to_tree("# Hello\n\n## World!\n\nHow are you?"),
        root(vec![
            heading(1, vec![text("Hello")]),
            heading(2, vec![text("World!")]),
            paragraph(vec![text("How are you?")]),
        ])
    );
}

#[test]
fn test_front_matter_only_at_start() {
    let tree = md_to_tree("# Title\n\n---\n\ntext\n");
    assert!(tree.children().iter().all(|node| !node.is("yaml")));
    assert!(tree.children().iter().any(|node| node.is("thematicBreak")));
}

#[test]
fn test_directive_with_attributes() {
    let tree = md_to_tree("::layout[wide]{columns=2}\n");
    let directive = &tree.children()[0];

    assert!(directive.is("leafDirective"));
    assert_eq!(directive.str_attr("name"), Some("layout"));
    assert_eq!(directive.attr("attributes"), Some(&json!({"columns": "2"})));
    assert_eq!(directive.text_content(), "wide");
}

#[test]
fn test_colon_after_digit_stays_text() {
    let tree = md_to_tree("A ratio of 16:9[x] here\n");
    assert_eq!(
        tree,
        root(vec![paragraph(vec![text("A ratio of 16:9[x] here")])])
    );
}

#[test]
fn test_text_directive_inside_emphasis() {
    assert_eq!(
        md_to_tree("*see :ref[intro]*\n"),
        root(vec![paragraph(vec![emphasis(vec![
            text("see "),
            text_directive("ref", vec![text("intro")]),
        ])])])
    );
}

#[test]
fn test_directive_in_list_item() {
    let tree = md_to_tree("- ::draft\n- item\n");
    let list = &tree.children()[0];
    assert_eq!(
        list.children()[0],
        list_item(vec![leaf_directive("draft", vec![])])
    );
}

#[test]
fn test_block_positions() {
    let tree = MarkdownFormat.parse("# Hello\n\ntext\n\n::title[x]\n").unwrap();
    let positions: Vec<_> = tree.children().iter().map(|node| node.position).collect();
    assert_eq!(
        positions,
        vec![
            Some(Position::new(1, 1)),
            Some(Position::new(3, 1)),
            Some(Position::new(5, 1)),
        ]
    );
}
