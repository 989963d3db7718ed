//! Pre-order syntax tree traversal.

use tree_sitter::Node;

/// Per-node callback for [`walk`].
pub trait Visitor<'t> {
    type Error;

    /// Called for every node before its children. Returning `Ok(false)`
    /// skips the node's subtree; siblings are still visited.
    fn visit(&mut self, node: Node<'t>, source: &'t [u8]) -> Result<bool, Self::Error>;
}

/// Walk `root` and its descendants in document order, stopping at the first error.
pub fn walk<'t, V>(visitor: &mut V, root: Node<'t>, source: &'t [u8]) -> Result<(), V::Error>
where
    V: Visitor<'t> + ?Sized,
{
    let mut cursor = root.walk();
    loop {
        let descend = visitor.visit(cursor.node(), source)?;
        if descend && cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return Ok(());
            }
        }
    }
}
