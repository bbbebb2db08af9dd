//! Metadata scanner
//!
//! One pre-order pass over a tree that records, in document order, every node that is a
//! front-matter block, a directive or a section boundary, together with its ancestor chain.
//! The scanner does not descend into a recorded node: metadata and boundary subtrees are
//! assumed not to contain further nodes of interest.

use crate::ast::Node;
use crate::cursor::{AncestorStep, Cursor, TreePath};
use crate::matcher::Matcher;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScannedKind {
    Frontmatter,
    Directive,
    Boundary,
}

/// The three predicates the scanner classifies nodes with.
#[derive(Debug, Clone)]
pub struct ScanRules {
    pub frontmatter: Matcher,
    pub directive: Matcher,
    pub boundary: Matcher,
}

impl ScanRules {
    /// First rule that matches wins: front-matter, then directive, then boundary.
    pub fn classify(&self, node: &Node) -> Option<ScannedKind> {
        if self.frontmatter.matches(node) {
            Some(ScannedKind::Frontmatter)
        } else if self.directive.matches(node) {
            Some(ScannedKind::Directive)
        } else if self.boundary.matches(node) {
            Some(ScannedKind::Boundary)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScannedNode<'a> {
    pub kind: ScannedKind,
    pub cursor: Cursor<'a>,
}

impl<'a> ScannedNode<'a> {
    pub fn node(&self) -> &'a Node {
        self.cursor.node()
    }

    pub fn path(&self) -> TreePath {
        self.cursor.path()
    }
}

pub fn scan<'a>(tree: &'a Node, rules: &ScanRules) -> Vec<ScannedNode<'a>> {
    let mut found = Vec::new();
    let mut ancestors = Vec::new();
    visit(tree, tree, &mut ancestors, rules, &mut found);
    log::trace!("scan found {} nodes of interest", found.len());
    found
}

fn visit<'a>(
    root: &'a Node,
    node: &'a Node,
    ancestors: &mut Vec<AncestorStep<'a>>,
    rules: &ScanRules,
    found: &mut Vec<ScannedNode<'a>>,
) {
    if let Some(kind) = rules.classify(node) {
        log::trace!("{:?} `{}` at {}", kind, node.kind, path_of(ancestors));
        found.push(ScannedNode {
            kind,
            cursor: Cursor::new(root, ancestors.clone(), node),
        });
        return;
    }
    for (index, child) in node.children().iter().enumerate() {
        ancestors.push(AncestorStep {
            container: node,
            index,
        });
        visit(root, child, ancestors, rules, found);
        ancestors.pop();
    }
}

fn path_of(ancestors: &[AncestorStep<'_>]) -> TreePath {
    TreePath(ancestors.iter().map(|step| step.index).collect())
}
