use super::{
    parse_directive, FrontmatterParser, Metadata, PageCollection, PageRecord, PagingOptions,
};
use crate::ast::Node;
use crate::cursor::{find_all, AncestorStep, Cursor, TreePath};
use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::error::{CompileError, TreeError};
use crate::scanning::{scan, ScannedKind};

/// A page opened by a boundary, before its content is known.
struct OpenPage {
    boundary: TreePath,
    metadata: Metadata,
    /// Directives were taken out of the boundary node itself.
    retitled: bool,
}

/// A metadata node to take out of the tree once the scan is over.
struct Removal {
    path: TreePath,
    prune_empty_ancestor: bool,
}

/// Split `tree` into pages and hoist its metadata.
///
/// Front-matter payloads go through `frontmatter` and are merged into the global metadata,
/// later blocks overriding earlier ones. Directives are merged into the page opened by the
/// closest preceding boundary. A directive with no preceding boundary is reported in
/// `diagnostics` and dropped.
pub fn paginate(
    tree: &Node,
    options: &PagingOptions,
    frontmatter: &dyn FrontmatterParser,
    diagnostics: &mut Diagnostics,
) -> Result<PageCollection, CompileError> {
    let rules = &options.rules;
    let mut global_metadata = Metadata::new();
    let mut pages: Vec<OpenPage> = Vec::new();
    let mut removals: Vec<Removal> = Vec::new();

    for scanned in scan(tree, rules) {
        let node = scanned.node();
        let path = scanned.path();
        match scanned.kind {
            ScannedKind::Frontmatter => {
                let parsed = frontmatter
                    .parse(node.value().unwrap_or_default())
                    .map_err(|err| err.within_document(node.position))?;
                log::debug!("front-matter at {} set {} keys", path, parsed.len());
                global_metadata.extend(parsed);
                removals.push(Removal {
                    path,
                    prune_empty_ancestor: true,
                });
            }
            ScannedKind::Boundary => {
                if path.len() > 1 {
                    diagnostics.push(
                        Diagnostic::info(
                            DiagnosticKind::NestedBoundary,
                            format!("`{}` opens a page but is not a top-level node", node.kind),
                        )
                        .with_path(path.clone())
                        .with_position(node.position),
                    );
                }
                log::debug!("page {} opens at {}", pages.len(), path);
                let mut page = OpenPage {
                    boundary: path.clone(),
                    metadata: Metadata::new(),
                    retitled: false,
                };
                // The scan does not look inside boundaries; directives written in a heading
                // still belong to the page it opens. As in the scan, a directive nested in
                // another one goes out with it.
                let mut taken: Vec<TreePath> = Vec::new();
                for inner in find_all(node, &rules.directive).filter(|c| !c.is_root()) {
                    let relative = inner.path();
                    if taken.iter().any(|outer| relative.starts_with(outer)) {
                        continue;
                    }
                    let inner_path =
                        TreePath([path.0.as_slice(), relative.0.as_slice()].concat());
                    hoist(inner.node(), &inner_path, Some(&mut page), diagnostics);
                    removals.push(Removal {
                        prune_empty_ancestor: inner.ancestors().len() > 1,
                        path: inner_path,
                    });
                    taken.push(relative);
                }
                page.retitled = !taken.is_empty();
                pages.push(page);
            }
            ScannedKind::Directive => {
                hoist(node, &path, pages.last_mut(), diagnostics);
                removals.push(Removal {
                    path,
                    prune_empty_ancestor: true,
                });
            }
        }
    }

    let mut pruned = tree.clone();
    removals.sort_by(|a, b| a.path.cmp(&b.path));
    for removal in removals.iter().rev() {
        let removed = removal
            .path
            .remove_from(&mut pruned, removal.prune_empty_ancestor)?;
        for page in &mut pages {
            page.boundary = page
                .boundary
                .adjust_for_removal(&removed)
                .ok_or_else(|| TreeError::InvalidPath(page.boundary.clone()))?;
        }
    }

    for page in pages.iter().filter(|page| page.retitled) {
        if let Some(heading) = page.boundary.resolve_mut(&mut pruned) {
            tidy_heading(heading);
        }
    }

    Ok(PageCollection {
        global_metadata,
        pages: attach_bodies(pruned, pages)?,
    })
}

/// Close the gaps directives leave in a heading's text: adjacent text nodes are joined with
/// at most one space between them, and the text is trimmed at both ends.
fn tidy_heading(heading: &mut Node) {
    let Some(children) = heading.children_mut() else {
        return;
    };
    let mut tidied: Vec<Node> = Vec::with_capacity(children.len());
    for child in children.drain(..) {
        match tidied.last_mut() {
            Some(previous) if previous.is("text") && child.is("text") => {
                let left = previous.value().unwrap_or_default();
                let right = child.value().unwrap_or_default();
                let joined = if left.ends_with(char::is_whitespace) {
                    format!("{}{}", left, right.trim_start())
                } else {
                    format!("{}{}", left, right)
                };
                set_text(previous, joined);
            }
            _ => tidied.push(child),
        }
    }

    if let Some(first) = tidied.first_mut().filter(|node| node.is("text")) {
        let trimmed = first.value().unwrap_or_default().trim_start().to_string();
        set_text(first, trimmed);
    }
    if let Some(last) = tidied.last_mut().filter(|node| node.is("text")) {
        let trimmed = last.value().unwrap_or_default().trim_end().to_string();
        set_text(last, trimmed);
    }
    tidied.retain(|node| !(node.is("text") && node.value().unwrap_or_default().is_empty()));
    *children = tidied;
}

fn set_text(node: &mut Node, value: String) {
    node.attributes.insert("value".to_string(), value.into());
}

fn hoist(
    node: &Node,
    path: &TreePath,
    page: Option<&mut OpenPage>,
    diagnostics: &mut Diagnostics,
) {
    let Some((name, value)) = parse_directive(node) else {
        diagnostics.push(
            Diagnostic::warning(
                DiagnosticKind::MalformedDirective,
                format!("`{}` has no name and was dropped", node.kind),
            )
            .with_path(path.clone())
            .with_position(node.position),
        );
        return;
    };
    match page {
        Some(page) => {
            log::debug!("directive `{}` attached to page at {}", name, page.boundary);
            page.metadata.insert(name, value);
        }
        None => diagnostics.push(
            Diagnostic::warning(
                DiagnosticKind::OrphanDirective,
                format!("directive `{}` appears before any page and was dropped", name),
            )
            .with_path(path.clone())
            .with_position(node.position),
        ),
    }
}

fn attach_bodies(pruned: Node, pages: Vec<OpenPage>) -> Result<Vec<PageRecord>, TreeError> {
    if pages.is_empty() {
        return Ok(vec![PageRecord {
            heading: None,
            content: pruned,
            metadata: Metadata::new(),
        }]);
    }

    if let Some(carried) = pages[0].boundary.0.first().filter(|&&index| index > 0) {
        log::debug!("{} preamble nodes carried into the first page", carried);
    }

    let ends: Vec<Option<TreePath>> = pages
        .iter()
        .skip(1)
        .map(|page| Some(page.boundary.clone()))
        .chain(std::iter::once(None))
        .collect();

    pages
        .into_iter()
        .zip(ends)
        .enumerate()
        .map(|(index, (page, end))| {
            let heading = page
                .boundary
                .resolve(&pruned)
                .cloned()
                .ok_or_else(|| TreeError::InvalidPath(page.boundary.clone()))?;
            let start = (index > 0).then_some(&page.boundary);
            let mut content = Vec::new();
            collect_range(
                Cursor::at_root(&pruned),
                start,
                end.as_ref(),
                &mut content,
            );
            Ok(PageRecord {
                heading: Some(heading),
                content: Node::parent("root", content),
                metadata: page.metadata,
            })
        })
        .collect()
}

/// Push the largest subtrees lying entirely in the document range `[start, end)`.
///
/// A `None` start is the beginning of the document, a `None` end its end. Containers only
/// partially in range are not copied; their in-range descendants are.
fn collect_range(
    container: Cursor<'_>,
    start: Option<&TreePath>,
    end: Option<&TreePath>,
    out: &mut Vec<Node>,
) {
    let base = container.path();
    for (index, child) in container.node().children().iter().enumerate() {
        let path = base.child(index);
        let contains = |other: Option<&TreePath>| {
            other.is_some_and(|other| other.len() > path.len() && other.starts_with(&path))
        };

        if end.is_some_and(|end| path >= *end) {
            break;
        }
        if contains(start) || contains(end) {
            let mut ancestors = container.ancestors().to_vec();
            ancestors.push(AncestorStep {
                container: container.node(),
                index,
            });
            collect_range(
                Cursor::new(container.root(), ancestors, child),
                start,
                end,
                out,
            );
            continue;
        }
        if start.is_some_and(|start| path < *start) {
            continue;
        }
        out.push(child.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builder::*;
    use crate::ast::Position;
    use crate::error::FrontmatterError;
    use pretty_assertions::assert_eq;

    fn no_frontmatter(_: &str) -> Result<Metadata, FrontmatterError> {
        Ok(Metadata::new())
    }

    fn run(tree: &Node) -> (PageCollection, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let pages = paginate(
            tree,
            &PagingOptions::default(),
            &no_frontmatter,
            &mut diagnostics,
        )
        .unwrap();
        (pages, diagnostics)
    }

    #[test]
    fn test_two_pages_at_root_level() {
        let tree = root(vec![
            heading(1, vec![text("Hello")]),
            heading(2, vec![text("World!")]),
            paragraph(vec![text("How are you?")]),
        ]);
        let (pages, diagnostics) = run(&tree);

        assert!(diagnostics.is_empty());
        assert_eq!(pages.len(), 2);
        assert_eq!(
            pages.pages[0].content,
            root(vec![heading(1, vec![text("Hello")])])
        );
        assert_eq!(
            pages.pages[1].content,
            root(vec![
                heading(2, vec![text("World!")]),
                paragraph(vec![text("How are you?")]),
            ])
        );
        assert_eq!(pages.pages[1].title().as_deref(), Some("World!"));
    }

    #[test]
    fn test_deep_headings_stay_inside_pages() {
        let tree = root(vec![
            heading(1, vec![text("A")]),
            heading(3, vec![text("a.1")]),
            heading(2, vec![text("B")]),
        ]);
        let (pages, _) = run(&tree);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages.pages[0].content.children().len(), 2);
    }

    #[test]
    fn test_text_directive_in_paragraph_is_pruned_with_wrapper() {
        let tree = root(vec![
            heading(1, vec![text("Hello")]),
            paragraph(vec![text_directive("mood", vec![text("calm")])]),
            paragraph(vec![text("Body")]),
        ]);
        let (pages, _) = run(&tree);
        assert_eq!(pages.pages[0].metadata.get("mood").map(String::as_str), Some("calm"));
        assert_eq!(
            pages.pages[0].content,
            root(vec![
                heading(1, vec![text("Hello")]),
                paragraph(vec![text("Body")]),
            ])
        );
    }

    #[test]
    fn test_directive_inside_heading_is_hoisted() {
        let tree = root(vec![heading(
            1,
            vec![text("Intro "), text_directive("slug", vec![text("intro")])],
        )]);
        let (pages, _) = run(&tree);
        assert_eq!(pages.pages[0].metadata.get("slug").map(String::as_str), Some("intro"));
        assert_eq!(
            pages.pages[0].content,
            root(vec![heading(1, vec![text("Intro")])])
        );
        assert_eq!(pages.pages[0].heading, Some(heading(1, vec![text("Intro")])));
        assert_eq!(pages.pages[0].title().as_deref(), Some("Intro"));
    }

    #[test]
    fn test_directive_between_heading_words_leaves_one_space() {
        let tree = root(vec![heading(
            2,
            vec![
                text("Getting "),
                text_directive("slug", vec![text("start")]),
                text(" started"),
            ],
        )]);
        let (pages, _) = run(&tree);
        assert_eq!(
            pages.pages[0].content,
            root(vec![heading(2, vec![text("Getting started")])])
        );
    }

    #[test]
    fn test_heading_without_directives_is_untouched() {
        let tree = root(vec![heading(1, vec![text("A"), text(" "), emphasis(vec![])])]);
        let (pages, _) = run(&tree);
        assert_eq!(pages.pages[0].content, tree);
    }

    #[test]
    fn test_directive_nested_in_heading_directive() {
        let tree = root(vec![
            heading(
                1,
                vec![
                    text("Title "),
                    text_directive("a", vec![text_directive("b", vec![text("x")])]),
                ],
            ),
            paragraph(vec![text("Body")]),
        ]);
        let (pages, diagnostics) = run(&tree);

        assert_eq!(pages.len(), 1);
        assert_eq!(pages.pages[0].metadata.get("a").map(String::as_str), Some(""));
        assert!(!pages.pages[0].metadata.contains_key("b"));
        assert!(diagnostics.is_empty());
        assert_eq!(
            pages.pages[0].content,
            root(vec![
                heading(1, vec![text("Title")]),
                paragraph(vec![text("Body")]),
            ])
        );
    }

    #[test]
    fn test_heading_made_only_of_a_directive_survives() {
        let tree = root(vec![heading(1, vec![text_directive("slug", vec![])])]);
        let (pages, _) = run(&tree);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages.pages[0].content, root(vec![heading(1, vec![])]));
    }

    #[test]
    fn test_preamble_is_carried_into_first_page() {
        let tree = root(vec![
            paragraph(vec![text("Preamble")]),
            heading(1, vec![text("Hello")]),
        ]);
        let (pages, _) = run(&tree);
        assert_eq!(
            pages.pages[0].content,
            root(vec![
                paragraph(vec![text("Preamble")]),
                heading(1, vec![text("Hello")]),
            ])
        );
    }

    #[test]
    fn test_nested_boundary() {
        let tree = root(vec![
            heading(1, vec![text("A")]),
            paragraph(vec![text("a")]),
            blockquote(vec![
                paragraph(vec![text("quoted")]),
                heading(2, vec![text("B")]),
                paragraph(vec![text("b")]),
            ]),
            paragraph(vec![text("tail")]),
        ]);
        let (pages, diagnostics) = run(&tree);

        assert_eq!(pages.len(), 2);
        assert_eq!(
            pages.pages[0].content,
            root(vec![
                heading(1, vec![text("A")]),
                paragraph(vec![text("a")]),
                paragraph(vec![text("quoted")]),
            ])
        );
        assert_eq!(
            pages.pages[1].content,
            root(vec![
                heading(2, vec![text("B")]),
                paragraph(vec![text("b")]),
                paragraph(vec![text("tail")]),
            ])
        );
        assert_eq!(
            diagnostics.of_kind(DiagnosticKind::NestedBoundary).count(),
            1
        );
    }

    #[test]
    fn test_malformed_directive_is_reported() {
        let tree = root(vec![
            heading(1, vec![text("A")]),
            Node::parent("leafDirective", vec![text("x")]),
        ]);
        let (pages, diagnostics) = run(&tree);
        assert!(pages.pages[0].metadata.is_empty());
        assert_eq!(
            diagnostics
                .of_kind(DiagnosticKind::MalformedDirective)
                .count(),
            1
        );
        assert_eq!(pages.pages[0].content, root(vec![heading(1, vec![text("A")])]));
    }

    #[test]
    fn test_frontmatter_error_aborts() {
        let tree = root(vec![yaml(": :"), heading(1, vec![])]);
        let failing = |raw: &str| -> Result<Metadata, FrontmatterError> {
            Err(FrontmatterError::Syntax {
                message: "bad".to_string(),
                text: raw.to_string(),
                line: None,
                column: None,
            })
        };
        let result = paginate(
            &tree,
            &PagingOptions::default(),
            &failing,
            &mut Diagnostics::new(),
        );
        assert!(matches!(
            result,
            Err(CompileError::Frontmatter(FrontmatterError::Syntax { ref text, .. })) if text == ": :"
        ));
    }

    #[test]
    fn test_frontmatter_error_line_is_document_relative() {
        let tree = root(vec![
            yaml("title: x\nbad: [").with_position(Position::new(1, 1)),
            heading(1, vec![]),
        ]);
        let failing = |_: &str| -> Result<Metadata, FrontmatterError> {
            Err(FrontmatterError::Syntax {
                message: "bad".to_string(),
                text: String::new(),
                line: Some(2),
                column: Some(6),
            })
        };
        let err = paginate(
            &tree,
            &PagingOptions::default(),
            &failing,
            &mut Diagnostics::new(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CompileError::Frontmatter(FrontmatterError::Syntax {
                line: Some(3),
                column: Some(6),
                ..
            })
        ));
    }
}
