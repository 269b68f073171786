//! Paste sanitizer.
//!
//! Restricts an untrusted fragment to an [`AllowList`]:
//!
//! 1. Comments are removed
//! 2. `script` and `style` subtrees are removed
//! 3. Nested annotations collapse to the outermost one
//! 4. Monospace carriers keep only their marker and font face, allowed
//!    elements keep only their allowed attributes, everything else is
//!    unwrapped
//!
//! Text is never dropped outside of step 2.

mod allow_list;

pub use allow_list::AllowList;

/// Attributes a monospace carrier keeps, whatever the allow-list says.
pub const CARRIER_ATTRIBUTES: [&str; 2] = ["class", "face"];

use crate::dom::{MONOSPACE_CLASS, Tag, TagKind, Tree, parse_fragment};
use crate::error::Error;
use crate::normalize::{Group, collapse_nested, collect};

/// Sanitize a copy of `tree`.
pub fn sanitize(tree: &Tree, allow_list: &AllowList) -> Tree {
    let mut out = tree.clone();
    sanitize_in_place(&mut out, allow_list);
    out
}

/// Parse and sanitize a pasted HTML fragment.
pub fn sanitize_html(html: &str, allow_list: &AllowList) -> Tree {
    let mut tree = parse_fragment(html);
    sanitize_in_place(&mut tree, allow_list);
    tree
}

pub fn sanitize_in_place(tree: &mut Tree, allow_list: &AllowList) {
    remove_comments(tree);
    remove_scripts(tree);
    collapse_nested(tree, Group::Annotations);
    filter_elements(tree, allow_list);
}

fn remove_comments(tree: &mut Tree) {
    for id in collect(tree, |t, id| t.is_comment(id)) {
        let _ = tree.detach(id);
    }
}

fn remove_scripts(tree: &mut Tree) {
    let targets = collect(tree, |t, id| {
        matches!(t.tag(id), Some(Tag::Unknown(name)) if name == "script" || name == "style")
    });
    for id in targets {
        tracing::debug!(target: "markwell::sanitize", node = ?id, "drop script/style subtree");
        let _ = tree.detach(id);
    }
}

fn filter_elements(tree: &mut Tree, allow_list: &AllowList) {
    for id in collect(tree, |t, id| t.is_element(id)) {
        let Some(tag) = tree.tag(id).cloned() else {
            continue;
        };

        // Carriers before the table: `code` would otherwise claim them
        if tag.kind() == Some(TagKind::MonospaceSpan) {
            let _ = tree.retain_attrs(id, |a| {
                CARRIER_ATTRIBUTES.contains(&a.name.to_ascii_lowercase().as_str())
            });
            let _ = tree.set_attr(id, "class", MONOSPACE_CLASS);
            continue;
        }
        if let Some(allowed) = allow_list.attributes(&tag) {
            let _ = tree.retain_attrs(id, |a| allowed.contains(&a.name.to_ascii_lowercase()));
            continue;
        }
        if let Tag::Unknown(name) = &tag {
            let err = Error::UnsupportedPasteContent(name.clone());
            tracing::warn!(target: "markwell::sanitize", %err, "unwrapping");
        }
        let _ = tree.unwrap(id);
    }
}

/// Unwrap emphasis, strong and code (in either vocabulary, carriers
/// included) anywhere in a fragment.
///
/// Used when the insertion point already carries one of these formats: the
/// ambient format applies to the pasted run, so a second one would stack.
/// Blocks and links stay.
pub fn strip_annotations(tree: &mut Tree) {
    let formats = collect(tree, |t, id| {
        t.kind(id)
            .is_some_and(|k| !k.is_heading() && k.is_exclusive_format())
    });
    for id in formats {
        let _ = tree.unwrap(id);
    }
}
