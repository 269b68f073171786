//! Conversion between the presentational and semantic document forms.
//!
//! Both directions are ordered rewrite passes over the arena. Each pass
//! walks the tree once (some repeat to a fixpoint), mutates in place and
//! leaves the identity of the nodes it does not rewrite untouched.
//!
//! ## Semantify Pipeline Order
//!
//! 1. **Substitute** - `i`/`b`/`div`/marked carriers to `em`/`strong`/`p`/`code`
//! 2. **Span Unwrap** - Hoist span content into the parent
//! 3. **Flatten** - Unwrap paragraphs holding paragraphs or lists
//! 4. **List Repair** - Move `ul > ul` into the preceding list item
//! 5. **Wrap** - Put top-level inline runs in paragraphs
//! 6. **Prune** - Drop trailing breaks and empty wrappers (cascading)
//! 7. **Span Unwrap** - Residual spans
//!
//! Exclusivity is enforced between 5 and 6 so that wrappers emptied by it
//! are pruned, and attributes are scrubbed last.
//!
//! The public functions never touch their input; the `_in_place` variants
//! are for the live surface, where node identity must survive.

pub mod exclusive;
mod flatten;
mod lists;
mod pass;
mod predicates;
mod prune;
mod spans;
mod substitute;
mod wrap;

pub use exclusive::{Group, collapse_nested, is_exclusive};
pub use pass::collect;

use crate::dom::Tree;

/// Presentational tree -> new semantic tree.
pub fn semantify(tree: &Tree) -> Tree {
    let mut out = tree.clone();
    semantify_in_place(&mut out);
    out
}

/// Run the semantify pipeline on `tree` itself.
pub fn semantify_in_place(tree: &mut Tree) {
    substitute::substitute_tags(tree);
    spans::unwrap_spans(tree);
    flatten::flatten_paragraphs(tree);
    lists::repair_list_nesting(tree);
    wrap::wrap_orphan_runs(tree);
    exclusive::collapse_nested(tree, Group::Formatting);
    prune::prune(tree);
    spans::unwrap_spans(tree);
    substitute::scrub_attributes(tree);
}

/// Semantic (or mixed) tree -> new presentational tree.
///
/// Emphasis, strong and code become `i`, `b` and a marked `font` with the
/// given face. Headings, lists, links and paragraphs pass through.
pub fn desemantify(tree: &Tree, code_font_family: &str) -> Tree {
    let mut out = tree.clone();
    desemantify_in_place(&mut out, code_font_family);
    out
}

/// Run the desemantify substitution on `tree` itself.
pub fn desemantify_in_place(tree: &mut Tree, code_font_family: &str) {
    substitute::substitute_presentational(tree, code_font_family);
}
