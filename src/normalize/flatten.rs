//! Pass 3: Paragraph Flattening

use crate::dom::{TagKind, Tree};

use super::pass::collect;
use super::predicates::is_paragraph_or_list;

/// Unwrap paragraphs that directly contain a paragraph or a list.
///
/// Native surfaces nest blocks when a line is turned into a list or when a
/// `div` lands inside a `div`:
///
/// ```text
/// <p><ul><li>a</li></ul></p>  ->  <ul><li>a</li></ul>
/// <p><p>a</p></p>             ->  <p>a</p>
/// ```
///
/// The outer paragraph goes; the inner block keeps its structure. Repeats
/// until no paragraph has a block child.
pub fn flatten_paragraphs(tree: &mut Tree) {
    loop {
        let targets = collect(tree, |t, id| {
            t.is_kind(id, TagKind::Paragraph) && t.children(id).any(|c| is_paragraph_or_list(t, c))
        });
        if targets.is_empty() {
            break;
        }
        for id in targets {
            tracing::trace!(target: "markwell::normalize", node = ?id, "flatten paragraph");
            let _ = tree.unwrap(id);
        }
    }
}
