//! Pass 6: Trailing Break Removal and Empty Wrapper Pruning

use crate::dom::{NodeId, TagKind, Tree};

use super::pass::walk_bottom_up;
use super::predicates::is_prunable;

/// Remove trailing line breaks and empty inline wrappers in post-order.
///
/// A `<br>` that ends its parent is an artifact of the native surface, not
/// content. Both removals run in the same post-order walk because each can
/// expose the other:
///
/// ```text
/// <p>a<br><b><br></b></p>
///   visit b: trailing br removed, b is now empty
///   visit p: b pruned, the first br now trails and is removed
///   -> <p>a</p>
/// ```
pub fn prune(tree: &mut Tree) {
    walk_bottom_up(tree, |tree, parent_id| {
        prune_children(tree, parent_id);
    });
}

fn prune_children(tree: &mut Tree, parent_id: NodeId) {
    for child in tree.child_ids(parent_id) {
        if is_empty_wrapper(tree, child) || tree.text(child) == Some("") {
            let _ = tree.detach(child);
        }
    }

    while let Some(last) = tree.last_child(parent_id) {
        if !tree.is_kind(last, TagKind::LineBreak) {
            break;
        }
        tracing::trace!(target: "markwell::normalize", node = ?last, "drop trailing break");
        let _ = tree.detach(last);
    }
}

fn is_empty_wrapper(tree: &Tree, id: NodeId) -> bool {
    is_prunable(tree, id) && tree.first_child(id).is_none()
}
