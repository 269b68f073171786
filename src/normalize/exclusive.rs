//! Annotation exclusivity.
//!
//! Shared by the semantifier and the paste sanitizer: the outermost member
//! of a group wins and every group member below it is unwrapped.

use crate::dom::{NodeId, Tree};

use super::pass::collect;
use super::predicates::{is_annotation, is_exclusive_format};

/// Which tags count as members of one exclusivity group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    /// Emphasis, strong, code and heading levels, in either vocabulary.
    Formatting,
    /// Every inline annotation, links included.
    Annotations,
}

impl Group {
    fn contains(self, tree: &Tree, id: NodeId) -> bool {
        match self {
            Group::Formatting => is_exclusive_format(tree, id),
            Group::Annotations => is_annotation(tree, id),
        }
    }
}

/// Unwrap every group member that has a group member above it.
///
/// ```text
/// <strong><strong>x</strong></strong>  ->  <strong>x</strong>
/// <em>a<b>b</b></em>                   ->  <em>ab</em>
/// <h1><em>t</em></h1>                  ->  <h1>t</h1>
/// ```
pub fn collapse_nested(tree: &mut Tree, group: Group) {
    for outer in collect(tree, |t, id| group.contains(t, id)) {
        if !tree.is_attached(outer) {
            continue;
        }
        let nested: Vec<NodeId> = tree
            .descendants(outer)
            .skip(1)
            .filter(|&id| group.contains(tree, id))
            .collect();
        for inner in nested {
            tracing::trace!(target: "markwell::normalize", node = ?inner, "collapse nested annotation");
            let _ = tree.unwrap(inner);
        }
    }
}

/// Check that no group member has another member as an ancestor.
pub fn is_exclusive(tree: &Tree, group: Group) -> bool {
    tree.traverse()
        .filter(|&id| group.contains(tree, id))
        .all(|id| !tree.ancestors(id).any(|a| group.contains(tree, a)))
}
