//! Locating ERROR and MISSING nodes in a tree-sitter tree.

use tree_sitter::Node;

/// Count ERROR/MISSING nodes under `root`.
pub fn count_errors(root: Node) -> u32 {
    let mut count = 0u32;
    if !root.has_error() {
        return count;
    }
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            count += 1;
        }
        if node.has_error() {
            let mut cursor = node.walk();
            stack.extend(node.children(&mut cursor));
        }
    }
    count
}

/// First ERROR or MISSING node in document order, if any.
pub fn first_error<'t>(root: Node<'t>) -> Option<Node<'t>> {
    if !root.has_error() {
        return None;
    }
    if root.is_error() || root.is_missing() {
        return Some(root);
    }
    let mut cursor = root.walk();
    let children: Vec<Node<'t>> = root.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}
