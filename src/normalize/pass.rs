//! Tree traversal utilities for normalization passes.

use crate::dom::{NodeId, Tree};

/// Snapshot, in document order, of the nodes under the root matching `pred`.
///
/// Passes mutate the tree while working through the list, so they take the
/// snapshot first and re-check attachment before touching each node.
pub fn collect<F>(tree: &Tree, pred: F) -> Vec<NodeId>
where
    F: Fn(&Tree, NodeId) -> bool,
{
    tree.traverse()
        .filter(|&id| id != NodeId::ROOT && pred(tree, id))
        .collect()
}

/// Walk the tree bottom-up and call visitor at each parent.
///
/// This allows passes to process children before parents, enabling
/// cascading effects (e.g. an emptied wrapper is pruned by its own parent's
/// visit).
pub fn walk_bottom_up<F>(tree: &mut Tree, mut visitor: F)
where
    F: FnMut(&mut Tree, NodeId),
{
    walk_children(tree, NodeId::ROOT, &mut visitor);
}

fn walk_children<F>(tree: &mut Tree, parent_id: NodeId, visitor: &mut F)
where
    F: FnMut(&mut Tree, NodeId),
{
    // 1. Recurse into children first (bottom-up)
    let mut child_opt = tree.first_child(parent_id);
    while let Some(child_id) = child_opt {
        // The visitor may detach the child, so read its successor first
        let next = tree.next_sibling(child_id);
        walk_children(tree, child_id, visitor);
        child_opt = next;
    }
    // 2. Visit this parent after children
    visitor(tree, parent_id);
}
