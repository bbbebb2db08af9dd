use crate::ast::Node;

/// Read a directive as one metadata pair.
///
/// The key is the directive's `name`, the value its direct `text` children joined by a single
/// space: `::title[Hi]` gives `("title", "Hi")`. `None` when the name is missing or blank.
pub fn parse_directive(node: &Node) -> Option<(String, String)> {
    let name = node.str_attr("name").map(str::trim).filter(|n| !n.is_empty())?;
    let value = node
        .children()
        .iter()
        .filter(|child| child.is("text"))
        .filter_map(Node::value)
        .collect::<Vec<_>>()
        .join(" ");
    Some((name.to_string(), value))
}
