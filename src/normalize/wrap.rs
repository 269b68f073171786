//! Pass 5: Orphan Run Wrapping

use crate::dom::{NodeId, TagKind, Tree};

use super::predicates::{is_top_level_block, is_whitespace_text};

/// Wrap top-level inline content in paragraphs.
///
/// Typing into an empty surface leaves bare text and inline markup directly
/// under the root. Each maximal run of such children becomes one paragraph
/// at the position of the run's first member:
///
/// ```text
/// a <b>b</b><p>c</p>d  ->  <p>a <b>b</b></p><p>c</p><p>d</p>
/// ```
///
/// Blocks and whitespace-only text break runs and stay where they are.
pub fn wrap_orphan_runs(tree: &mut Tree) {
    let mut run: Option<(NodeId, NodeId)> = None;

    for child in tree.child_ids(NodeId::ROOT) {
        if is_top_level_block(tree, child) || is_whitespace_text(tree, child) {
            flush(tree, run.take());
            continue;
        }
        run = match run {
            Some((first, _)) => Some((first, child)),
            None => Some((child, child)),
        };
    }
    flush(tree, run);
}

fn flush(tree: &mut Tree, run: Option<(NodeId, NodeId)>) {
    if let Some((first, last)) = run {
        let _ = tree.wrap_run(first, last, TagKind::Paragraph, Vec::new());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{parse_fragment, to_html};

    #[test]
    fn test_wraps_runs_between_blocks() {
        let mut tree = parse_fragment("a <b>b</b><p>c</p>d<br>e");
        wrap_orphan_runs(&mut tree);
        assert_eq!(
            to_html(&tree, NodeId::ROOT),
            "<p>a <b>b</b></p><p>c</p><p>d<br>e</p>"
        );
    }

    #[test]
    fn test_whitespace_breaks_runs() {
        let mut tree = parse_fragment("<b>x</b> <i>y</i>");
        wrap_orphan_runs(&mut tree);
        assert_eq!(to_html(&tree, NodeId::ROOT), "<p><b>x</b></p> <p><i>y</i></p>");
    }

    #[test]
    fn test_blocks_only_untouched() {
        let mut tree = parse_fragment("<h1>t</h1>\n<ul><li>a</li></ul>");
        wrap_orphan_runs(&mut tree);
        assert_eq!(to_html(&tree, NodeId::ROOT), "<h1>t</h1>\n<ul><li>a</li></ul>");
    }
}
