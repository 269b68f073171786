//! Passes 2 and 7: Span Unwrapping

use crate::dom::{TagKind, Tree};

use super::pass::collect;

/// Unwrap every `span`, hoisting all of its children into the parent.
///
/// Spans carry no meaning in the semantic form. Empty spans are removed.
/// Run once right after substitution and once more at the end of the
/// pipeline for spans that earlier passes may have surfaced.
pub fn unwrap_spans(tree: &mut Tree) {
    for id in collect(tree, |t, id| t.is_kind(id, TagKind::Span)) {
        if !tree.is_attached(id) {
            continue;
        }
        let _ = if tree.first_child(id).is_none() {
            tree.detach(id)
        } else {
            tree.unwrap(id)
        };
    }
}
