//! Tree cursor / path engine
//!
//!     Every structural read and write on a tree goes through here, so traversal order and
//!     mutation semantics are defined once.
//!
//!     Traversal order is pre-order depth-first: a node is visited before its children, and
//!     children are visited in source order. The root itself is a candidate.
//!
//!     A [`Cursor`] is a located node plus the chain of [`AncestorStep`]s leading to it from the
//!     root it was found in. Cursors borrow the tree. [`Cursor::replace`] and [`Cursor::remove`]
//!     consume the cursor and return a new root (clone-on-write), which makes "reuse a cursor
//!     after a mutation" impossible to express: to keep editing, search the returned root again.
//!
//!     [`TreePath`] is the index-only projection of a cursor. It does not borrow the tree, which
//!     lets a caller record locations during a read pass and then edit an owned tree in place.
//!     After a removal, recorded paths that follow it must be shifted with
//!     [`TreePath::adjust_for_removal`]. Removing in reverse document order avoids that entirely.

use crate::ast::Node;
use crate::error::TreeError;
use crate::matcher::Matcher;
use std::fmt;

/// One level of the path from the root to a located node: the container and the index of the
/// child taken within it.
#[derive(Debug, Clone, Copy)]
pub struct AncestorStep<'a> {
    pub container: &'a Node,
    pub index: usize,
}

#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    root: &'a Node,
    ancestors: Vec<AncestorStep<'a>>,
    node: &'a Node,
}

/// First match in pre-order, the root included.
pub fn find<'a>(root: &'a Node, matcher: &Matcher) -> Option<Cursor<'a>> {
    find_all(root, matcher).next()
}

/// Every match in pre-order, lazily.
///
/// The iterator borrows the tree, so the tree cannot change underneath it. To search again
/// after editing, call `find_all` on the new root.
pub fn find_all<'a>(root: &'a Node, matcher: &Matcher) -> FindAll<'a> {
    FindAll {
        root,
        matcher: matcher.clone(),
        root_visited: false,
        frames: Vec::new(),
    }
}

impl<'a> Cursor<'a> {
    /// A cursor on the root of `tree`.
    pub fn at_root(tree: &'a Node) -> Self {
        Self {
            root: tree,
            ancestors: Vec::new(),
            node: tree,
        }
    }

    pub(crate) fn new(root: &'a Node, ancestors: Vec<AncestorStep<'a>>, node: &'a Node) -> Self {
        Self {
            root,
            ancestors,
            node,
        }
    }

    pub fn node(&self) -> &'a Node {
        self.node
    }

    pub fn root(&self) -> &'a Node {
        self.root
    }

    /// Ancestor steps, root first.
    pub fn ancestors(&self) -> &[AncestorStep<'a>] {
        &self.ancestors
    }

    pub fn is_root(&self) -> bool {
        self.ancestors.is_empty()
    }

    /// Index of the node within its parent, `None` for the root.
    pub fn index(&self) -> Option<usize> {
        self.ancestors.last().map(|step| step.index)
    }

    pub fn path(&self) -> TreePath {
        TreePath(self.ancestors.iter().map(|step| step.index).collect())
    }

    /// Returns a new root with `node` in place of the cursor's node. Sibling order is kept.
    pub fn replace(self, node: Node) -> Result<Node, TreeError> {
        if self.is_root() {
            return Err(TreeError::RootMutation);
        }
        let mut tree = self.root.clone();
        self.path().replace_in(&mut tree, node)?;
        Ok(tree)
    }

    /// Returns a new root without the cursor's node.
    ///
    /// With `prune_empty_ancestor`, a parent left without children is removed from its own
    /// parent as well. This cascades one level only, and never removes the root.
    pub fn remove(self, prune_empty_ancestor: bool) -> Result<Node, TreeError> {
        if self.is_root() {
            return Err(TreeError::RootMutation);
        }
        let mut tree = self.root.clone();
        self.path().remove_from(&mut tree, prune_empty_ancestor)?;
        Ok(tree)
    }

    /// The immediate parent, or with a matcher the nearest ancestor satisfying it.
    pub fn find_parent(&self, matcher: Option<&Matcher>) -> Option<Cursor<'a>> {
        let level = match matcher {
            None => self.ancestors.len().checked_sub(1)?,
            Some(matcher) => self
                .ancestors
                .iter()
                .rposition(|step| matcher.matches(step.container))?,
        };
        Some(self.ancestor_at(level))
    }

    /// Nearest preceding landmark in reverse document order.
    ///
    /// At each level, from the cursor outwards: preceding siblings are tested from nearest to
    /// farthest (without looking inside them), then the containing node itself.
    pub fn find_before(&self, matcher: &Matcher) -> Option<Cursor<'a>> {
        for level in (0..self.ancestors.len()).rev() {
            let step = self.ancestors[level];
            let siblings = step.container.children();
            for index in (0..step.index).rev() {
                let sibling = &siblings[index];
                if matcher.matches(sibling) {
                    let mut ancestors = self.ancestors[..level].to_vec();
                    ancestors.push(AncestorStep {
                        container: step.container,
                        index,
                    });
                    return Some(Cursor::new(self.root, ancestors, sibling));
                }
            }
            if matcher.matches(step.container) {
                return Some(self.ancestor_at(level));
            }
        }
        None
    }

    fn ancestor_at(&self, level: usize) -> Cursor<'a> {
        Cursor::new(
            self.root,
            self.ancestors[..level].to_vec(),
            self.ancestors[level].container,
        )
    }
}

/// Lazy pre-order search, see [`find_all`].
pub struct FindAll<'a> {
    root: &'a Node,
    matcher: Matcher,
    root_visited: bool,
    // (container, next child to visit); the child currently being explored is `next - 1`
    frames: Vec<(&'a Node, usize)>,
}

impl<'a> FindAll<'a> {
    fn enter(&mut self, node: &'a Node) {
        if !node.children().is_empty() {
            self.frames.push((node, 0));
        }
    }

    fn current_ancestors(&self) -> Vec<AncestorStep<'a>> {
        self.frames
            .iter()
            .map(|&(container, next)| AncestorStep {
                container,
                index: next - 1,
            })
            .collect()
    }
}

impl<'a> Iterator for FindAll<'a> {
    type Item = Cursor<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.root_visited {
            self.root_visited = true;
            let root = self.root;
            self.enter(root);
            if self.matcher.matches(root) {
                return Some(Cursor::at_root(root));
            }
        }

        loop {
            let (container, next) = self.frames.last_mut()?;
            let container: &'a Node = *container;
            let Some(child) = container.children().get(*next) else {
                self.frames.pop();
                continue;
            };
            *next += 1;

            let ancestors = self.current_ancestors();
            self.enter(child);
            if self.matcher.matches(child) {
                return Some(Cursor::new(self.root, ancestors, child));
            }
        }
    }
}

/// Child indices from the root to a node. The empty path is the root.
///
/// Paths order lexicographically, which is document (pre-order) order.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TreePath(pub Vec<usize>);

impl TreePath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<usize> {
        self.0.last().copied()
    }

    pub fn parent(&self) -> Option<TreePath> {
        let (_, rest) = self.0.split_last()?;
        Some(TreePath(rest.to_vec()))
    }

    pub fn child(&self, index: usize) -> TreePath {
        let mut indices = self.0.clone();
        indices.push(index);
        TreePath(indices)
    }

    /// True if `self` is `other` or lies inside it.
    pub fn starts_with(&self, other: &TreePath) -> bool {
        self.0.starts_with(&other.0)
    }

    pub fn resolve<'a>(&self, root: &'a Node) -> Option<&'a Node> {
        self.0
            .iter()
            .try_fold(root, |node, &index| node.children().get(index))
    }

    pub fn resolve_mut<'a>(&self, root: &'a mut Node) -> Option<&'a mut Node> {
        self.0.iter().try_fold(root, |node, &index| {
            node.children_mut().and_then(|children| children.get_mut(index))
        })
    }

    /// Swap the node at this path for `node`, returning the old one.
    pub fn replace_in(&self, root: &mut Node, node: Node) -> Result<Node, TreeError> {
        if self.is_root() {
            return Err(TreeError::RootMutation);
        }
        let target = self
            .resolve_mut(root)
            .ok_or_else(|| TreeError::InvalidPath(self.clone()))?;
        Ok(std::mem::replace(target, node))
    }

    /// Remove the node at this path from `root`, in place.
    ///
    /// Returns the path that was actually removed: this one, or its parent's when
    /// `prune_empty_ancestor` cascaded.
    pub fn remove_from(
        &self,
        root: &mut Node,
        prune_empty_ancestor: bool,
    ) -> Result<TreePath, TreeError> {
        let (&index, _) = self.0.split_last().ok_or(TreeError::RootMutation)?;
        let parent_path = self.parent().ok_or(TreeError::RootMutation)?;

        let parent = parent_path
            .resolve_mut(root)
            .ok_or_else(|| TreeError::InvalidPath(self.clone()))?;
        let siblings = parent
            .children_mut()
            .filter(|children| index < children.len())
            .ok_or_else(|| TreeError::InvalidPath(self.clone()))?;
        siblings.remove(index);

        if prune_empty_ancestor && siblings.is_empty() && !parent_path.is_root() {
            parent_path.remove_from(root, false)?;
            return Ok(parent_path);
        }
        Ok(self.clone())
    }

    /// Where this path points after the node at `removed` was taken out of the tree.
    ///
    /// `None` if this path was inside the removed subtree.
    pub fn adjust_for_removal(&self, removed: &TreePath) -> Option<TreePath> {
        if self.starts_with(removed) {
            return None;
        }
        let Some((&removed_index, removed_parent)) = removed.0.split_last() else {
            return Some(self.clone());
        };
        let level = removed_parent.len();
        let mut adjusted = self.clone();
        if self.0.len() > level
            && self.0[..level] == *removed_parent
            && self.0[level] > removed_index
        {
            adjusted.0[level] -= 1;
        }
        Some(adjusted)
    }
}

impl fmt::Display for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "/");
        }
        for index in &self.0 {
            write!(f, "/{}", index)?;
        }
        Ok(())
    }
}

impl From<Vec<usize>> for TreePath {
    fn from(indices: Vec<usize>) -> Self {
        TreePath(indices)
    }
}
