//! Export tests for Markdown format (tree → Markdown)

use folio_babel::format::Format;
use folio_babel::formats::markdown::MarkdownFormat;
use folio_core::ast::builder::*;
use pretty_assertions::assert_eq;

fn round_trip(md: &str) -> String {
    let tree = MarkdownFormat.parse(md).expect("Should parse markdown");
    MarkdownFormat.serialize(&tree).expect("Should serialize")
}

#[test]
fn test_page_contents() {
    let tree = root(vec![
        heading(2, vec![text("World!")]),
        heading(3, vec![text("How are you?")]),
    ]);
    assert_eq!(
        MarkdownFormat.serialize(&tree).unwrap(),
        "## World!\n\n### How are you?"
    );
}

#[test]
fn test_round_trip_is_stable() {
    let source = "---\ntitle: Hi\n---\n\n# Hello\n\nSome *em* and **strong** text.\n\n::title[Custom]\n\n- one\n- two\n\n```rust\nfn main() {}\n```";
    assert_eq!(round_trip(source), source);
}

#[test]
fn test_special_characters_are_escaped() {
    let tree = root(vec![paragraph(vec![text("2 * 3 = [six]")])]);
    assert_eq!(MarkdownFormat.serialize(&tree).unwrap(), "2 \\* 3 = \\[six\\]");
}

#[test]
fn test_nested_structure() {
    let tree = root(vec![blockquote(vec![list(
        true,
        vec![
            list_item(vec![paragraph(vec![text("first")])]),
            list_item(vec![paragraph(vec![text("second")])]),
        ],
    )])]);

    insta::assert_snapshot!(MarkdownFormat.serialize(&tree).unwrap(), @r###"
    > 1. first
    > 2. second
    "###);
}
