use crate::ast::Node;
use crate::cursor::{find_all, TreePath};
use crate::error::TreeError;
use crate::matcher::Matcher;

/// Copy of `tree` without any node matching `matcher` (the root excepted).
///
/// Wrappers left empty by a removal go too, one level up, as with
/// [`Cursor::remove`](crate::cursor::Cursor::remove). Running it again on its own output
/// changes nothing.
pub fn prune(tree: &Node, matcher: &Matcher) -> Result<Node, TreeError> {
    let targets: Vec<TreePath> = find_all(tree, matcher)
        .filter(|cursor| !cursor.is_root())
        .map(|cursor| cursor.path())
        .collect();

    let mut pruned = tree.clone();
    let mut removed: Vec<TreePath> = Vec::new();
    for path in targets.iter().rev() {
        if removed.iter().any(|gone| path.starts_with(gone)) {
            continue;
        }
        removed.push(path.remove_from(&mut pruned, true)?);
    }
    Ok(pruned)
}
