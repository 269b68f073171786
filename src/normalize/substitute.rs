//! Pass 1: Tag Substitution

use crate::dom::{MONOSPACE_CLASS, NodeId, TagKind, Tree};

use super::pass::collect;
use super::predicates::{is_script_or_style, is_unknown_element};

/// Rewrite presentational tags to their semantic counterparts.
///
/// ```text
/// i -> em    b -> strong    div -> p    [.markwell-code] -> code
/// ```
///
/// Elements are replaced by fresh ones (see [`Tree::retag`]), so text nodes
/// keep their identity. Comments and `script`/`style` subtrees are dropped;
/// any other foreign element is unwrapped so its text survives.
pub fn substitute_tags(tree: &mut Tree) {
    let targets = collect(tree, |t, id| t.is_element(id) || t.is_comment(id));

    for id in targets {
        if !tree.is_attached(id) {
            continue;
        }
        if tree.is_comment(id) || is_script_or_style(tree, id) {
            let _ = tree.detach(id);
            continue;
        }
        if is_unknown_element(tree, id) && !tree.has_class(id, MONOSPACE_CLASS) {
            let _ = tree.unwrap(id);
            continue;
        }
        if let Some(target) = semantic_target(tree, id) {
            tracing::trace!(target: "markwell::normalize", node = ?id, to = %target, "substitute");
            let _ = tree.retag(id, target, Vec::new());
        }
    }
}

/// Semantic replacement for an element, if it needs one.
fn semantic_target(tree: &Tree, id: NodeId) -> Option<TagKind> {
    let kind = tree.kind(id);
    if kind != Some(TagKind::Code) && tree.has_class(id, MONOSPACE_CLASS) {
        return Some(TagKind::Code);
    }
    let kind = kind?;
    let target = kind.semantic();
    (target != kind).then_some(target)
}

/// Strip attributes from the semantic output. Only a link's `href` is
/// meaningful in the persisted form.
pub fn scrub_attributes(tree: &mut Tree) {
    for id in collect(tree, |t, id| t.is_element(id) && !t.attrs(id).is_empty()) {
        let is_link = tree.is_kind(id, TagKind::Link);
        let _ = tree.retain_attrs(id, |a| is_link && a.name.eq_ignore_ascii_case("href"));
    }
}

/// Rewrite semantic inline tags to the presentational form a native
/// editing surface toggles. Code becomes a marked `font` carrying the
/// configured face.
pub fn substitute_presentational(tree: &mut Tree, code_font_family: &str) {
    let targets = collect(tree, |t, id| {
        t.kind(id).is_some_and(|k| k.presentational() != k)
    });

    for id in targets {
        let Some(kind) = tree.kind(id) else {
            continue;
        };
        let target = kind.presentational();
        let attrs = if target == TagKind::MonospaceSpan {
            vec![
                crate::dom::Attribute::new("class", MONOSPACE_CLASS),
                crate::dom::Attribute::new("face", code_font_family),
            ]
        } else {
            Vec::new()
        };
        let _ = tree.retag(id, target, attrs);
    }
}
