//! Pass 4: List Nesting Repair

use crate::dom::{TagKind, Tree};

use super::pass::collect;
use super::predicates::is_list;

/// Re-parent lists that sit directly inside another list.
///
/// Indenting a list item natively produces `ul > ul`, which is not valid
/// nesting. The stray list moves into the preceding list item when there is
/// one, otherwise it gets a list item of its own:
///
/// ```text
/// <ul><li>a</li><ul><li>b</li></ul></ul>
///   -> <ul><li>a<ul><li>b</li></ul></li></ul>
/// <ul><ul><li>b</li></ul></ul>
///   -> <ul><li><ul><li>b</li></ul></li></ul>
/// ```
pub fn repair_list_nesting(tree: &mut Tree) {
    let targets = collect(tree, |t, id| {
        is_list(t, id) && t.parent(id).is_some_and(|p| is_list(t, p))
    });

    for id in targets {
        if !tree.is_attached(id) {
            continue;
        }
        let previous = tree
            .prev_element_sibling(id)
            .filter(|&prev| tree.is_kind(prev, TagKind::ListItem));
        let _ = match previous {
            Some(item) => tree.append(item, id),
            None => tree.wrap(id, TagKind::ListItem, Vec::new()).map(|_| ()),
        };
    }
}
