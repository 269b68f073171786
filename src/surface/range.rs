//! Range primitives for in-memory editing.
//!
//! These mirror what a browser does underneath its editing commands:
//! splitting text at a boundary, cutting inline ancestors around a node and
//! finding the line block a node belongs to.

use crate::dom::{NodeId, TagKind, Tree};
use crate::error::{Result, invalid_reference};
use crate::selection::{Position, Selection, covered_text};

/// Split a text node at a character offset.
///
/// The node keeps the prefix; the returned new sibling holds the suffix.
/// Selection endpoints past the split point follow the suffix, the way a
/// live range does.
pub fn split_text(
    tree: &mut Tree,
    text: NodeId,
    offset: usize,
    selection: &mut Option<Selection>,
) -> Result<NodeId> {
    let content = tree.text(text).ok_or_else(|| invalid_reference(text))?;
    let byte = content
        .char_indices()
        .nth(offset)
        .map(|(b, _)| b)
        .unwrap_or(content.len());
    let (head, tail) = content.split_at(byte);
    let (head, tail) = (head.to_string(), tail.to_string());

    let suffix = tree.create_text(tail);
    tree.insert_after(text, suffix)?;
    tree.set_text(text, head)?;

    if let Some(sel) = selection.as_mut() {
        for pos in [&mut sel.start, &mut sel.end] {
            if pos.node == text && pos.offset > offset {
                *pos = Position::new(suffix, pos.offset - offset);
            }
        }
    }
    Ok(suffix)
}

/// Split boundary text nodes so the selection covers whole text nodes.
///
/// Returns the covered text nodes in document order and moves the
/// selection to span exactly those nodes. A caret covers nothing.
pub fn isolate(tree: &mut Tree, selection: &mut Option<Selection>) -> Result<Vec<NodeId>> {
    let Some(sel) = *selection else {
        return Ok(Vec::new());
    };
    if sel.is_collapsed() {
        return Ok(Vec::new());
    }

    // End first, so a start split in the same node sees the shortened text
    let end = sel.end;
    if tree.is_text(end.node) && end.offset > 0 && end.offset < tree.node_length(end.node) {
        split_text(tree, end.node, end.offset, selection)?;
    }
    if let Some(start) = selection.map(|s| s.start)
        && tree.is_text(start.node)
        && start.offset > 0
        && start.offset < tree.node_length(start.node)
    {
        split_text(tree, start.node, start.offset, selection)?;
    }

    let Some(sel) = *selection else {
        return Ok(Vec::new());
    };
    let covered = covered_text(tree, sel);
    if let (Some(&first), Some(&last)) = (covered.first(), covered.last()) {
        *selection = Some(Selection::new(
            Position::new(first, 0),
            Position::new(last, tree.node_length(last)),
        ));
    }
    Ok(covered)
}

/// Split every element between `node` and `top` so that `node` starts a
/// fresh copy of that chain.
///
/// Returns the element (a shallow copy of `top`, or `top` itself when
/// nothing precedes `node` in it) whose first descendants lead to `node`.
/// No empty copies are created.
pub fn split_before(tree: &mut Tree, top: NodeId, node: NodeId) -> Result<NodeId> {
    if !tree.is_inclusive_ancestor(top, node) || top == node {
        return Err(invalid_reference(node));
    }

    let mut child = node;
    loop {
        let parent = tree.parent(child).ok_or_else(|| invalid_reference(child))?;
        let holder = if tree.prev_sibling(child).is_some() {
            let copy = tree.shallow_clone(parent)?;
            tree.insert_after(parent, copy)?;
            let mut cursor = Some(child);
            while let Some(current) = cursor {
                cursor = tree.next_sibling(current);
                tree.append(copy, current)?;
            }
            copy
        } else {
            parent
        };
        if parent == top {
            return Ok(holder);
        }
        child = holder;
    }
}

/// Move `node` out of `ancestor`, splitting the ancestor chain around it.
///
/// ```text
/// <b>ab<i>cd</i>ef</b>   lift "cd" out of b   <b>ab</b><i>cd</i><b>ef</b>
/// ```
pub fn lift_out(tree: &mut Tree, node: NodeId, ancestor: NodeId) -> Result<()> {
    let holder = split_before(tree, ancestor, node)?;
    if let Some(next) = next_within(tree, holder, node) {
        split_before(tree, holder, next)?;
    }
    tree.unwrap(holder)
}

/// The node following `node` inside `top`, skipping into no subtree.
fn next_within(tree: &Tree, top: NodeId, node: NodeId) -> Option<NodeId> {
    let mut current = node;
    loop {
        if let Some(next) = tree.next_sibling(current) {
            return Some(next);
        }
        current = tree.parent(current)?;
        if current == top {
            return None;
        }
    }
}

fn is_line_block(kind: TagKind) -> bool {
    matches!(
        kind,
        TagKind::Paragraph
            | TagKind::Div
            | TagKind::Heading1
            | TagKind::Heading2
            | TagKind::Heading3
            | TagKind::ListItem
    )
}

fn ends_line(tree: &Tree, id: NodeId) -> bool {
    tree.kind(id)
        .is_some_and(|k| is_line_block(k) || k.is_list() || k == TagKind::LineBreak)
}

/// Nearest line block (paragraph, div, heading or list item) around `node`.
pub fn line_block(tree: &Tree, node: NodeId) -> Option<NodeId> {
    std::iter::once(node)
        .chain(tree.ancestors(node))
        .take_while(|&id| id != NodeId::ROOT)
        .find(|&id| tree.kind(id).is_some_and(is_line_block))
}

/// Line block around `node`, creating a `div` for bare top-level content.
///
/// A line typed straight into the root has no block of its own; the run of
/// inline siblings it belongs to (up to a block or a `<br>`) becomes one.
/// The root itself stands for its first line, and an empty root gets a
/// fresh empty `div`.
pub fn ensure_line_block(tree: &mut Tree, node: NodeId) -> Result<NodeId> {
    if node == NodeId::ROOT {
        return match tree.first_child(NodeId::ROOT) {
            Some(first) => ensure_line_block(tree, first),
            None => {
                let block = tree.create_element(TagKind::Div, Vec::new());
                tree.append(NodeId::ROOT, block)?;
                Ok(block)
            }
        };
    }
    if let Some(block) = line_block(tree, node) {
        return Ok(block);
    }

    let top = std::iter::once(node)
        .chain(tree.ancestors(node))
        .find(|&id| tree.parent(id) == Some(NodeId::ROOT))
        .ok_or_else(|| invalid_reference(node))?;

    let mut first = top;
    while let Some(prev) = tree.prev_sibling(first) {
        if ends_line(tree, prev) {
            break;
        }
        first = prev;
    }
    let mut last = top;
    while let Some(next) = tree.next_sibling(last) {
        if ends_line(tree, next) {
            break;
        }
        last = next;
    }
    tree.wrap_run(first, last, TagKind::Div, Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{parse_fragment, to_html};

    fn find_text(tree: &Tree, content: &str) -> NodeId {
        tree.traverse()
            .find(|&id| tree.text(id) == Some(content))
            .unwrap()
    }

    #[test]
    fn test_split_text_moves_endpoints() {
        let mut tree = parse_fragment("<p>héllo</p>");
        let t = find_text(&tree, "héllo");
        let mut sel = Some(Selection::new(Position::new(t, 1), Position::new(t, 4)));

        let suffix = split_text(&mut tree, t, 2, &mut sel).unwrap();

        assert_eq!(tree.text(t), Some("hé"));
        assert_eq!(tree.text(suffix), Some("llo"));
        assert_eq!(sel.unwrap().start, Position::new(t, 1));
        assert_eq!(sel.unwrap().end, Position::new(suffix, 2));
    }

    #[test]
    fn test_isolate_middle() {
        let mut tree = parse_fragment("<p>abcdef</p>");
        let t = find_text(&tree, "abcdef");
        let mut sel = Some(Selection::new(Position::new(t, 2), Position::new(t, 4)));

        let covered = isolate(&mut tree, &mut sel).unwrap();

        assert_eq!(covered.len(), 1);
        assert_eq!(tree.text(covered[0]), Some("cd"));
        assert_eq!(sel.unwrap(), Selection::contents(&tree, covered[0]));
        assert_eq!(to_html(&tree, NodeId::ROOT), "<p>abcdef</p>");
        assert_eq!(tree.child_ids(tree.parent(t).unwrap()).len(), 3);
    }

    #[test]
    fn test_lift_out() {
        let mut tree = parse_fragment("<p><b>ab<i>cd</i>ef</b></p>");
        let cd = find_text(&tree, "cd");
        let b = tree
            .traverse()
            .find(|&id| tree.is_kind(id, TagKind::Bold))
            .unwrap();

        lift_out(&mut tree, cd, b).unwrap();

        assert_eq!(
            to_html(&tree, NodeId::ROOT),
            "<p><b>ab</b><i>cd</i><b>ef</b></p>"
        );
        assert!(tree.is_attached(cd));
    }

    #[test]
    fn test_lift_out_edges() {
        let mut tree = parse_fragment("<p><b>ab</b></p>");
        let ab = find_text(&tree, "ab");
        let b = tree.parent(ab).unwrap();
        lift_out(&mut tree, ab, b).unwrap();
        assert_eq!(to_html(&tree, NodeId::ROOT), "<p>ab</p>");
    }

    #[test]
    fn test_ensure_line_block() {
        let mut tree = parse_fragment("one <b>two</b><br>three<p>four</p>");
        let two = find_text(&tree, "two");
        let block = ensure_line_block(&mut tree, two).unwrap();
        assert!(tree.is_kind(block, TagKind::Div));
        assert_eq!(
            to_html(&tree, NodeId::ROOT),
            "<div>one <b>two</b></div><br>three<p>four</p>"
        );

        let four = find_text(&tree, "four");
        let p = ensure_line_block(&mut tree, four).unwrap();
        assert!(tree.is_kind(p, TagKind::Paragraph));
    }

    #[test]
    fn test_ensure_line_block_on_root() {
        let mut tree = parse_fragment("<p>title</p><p>body</p>");
        let block = ensure_line_block(&mut tree, NodeId::ROOT).unwrap();
        assert_eq!(tree.text_content(block), "title");

        let mut bare = parse_fragment("one<br>two");
        let block = ensure_line_block(&mut bare, NodeId::ROOT).unwrap();
        assert!(bare.is_kind(block, TagKind::Div));
        assert_eq!(to_html(&bare, NodeId::ROOT), "<div>one</div><br>two");
    }

    #[test]
    fn test_ensure_line_block_on_empty_root() {
        let mut tree = Tree::new();
        let block = ensure_line_block(&mut tree, NodeId::ROOT).unwrap();
        assert!(tree.is_kind(block, TagKind::Div));
        assert_eq!(tree.first_child(NodeId::ROOT), Some(block));
        assert_eq!(to_html(&tree, NodeId::ROOT), "<div></div>");
    }
}
