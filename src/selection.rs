//! Selection positions and the selection-preserving mutation wrapper.
//!
//! A [`Position`] is a (node, offset) pair into one specific tree: a
//! character offset inside a text node, or a child index inside any other
//! node. Positions are captured right before a mutation and consumed right
//! after it; they are never stored.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::dom::{NodeId, Tree};
use crate::error::Error;
use crate::surface::Surface;

/// One selection endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub node: NodeId,
    pub offset: usize,
}

impl Position {
    pub fn new(node: NodeId, offset: usize) -> Self {
        Self { node, offset }
    }

    /// Start of the document.
    pub fn document_start() -> Self {
        Self::new(NodeId::ROOT, 0)
    }

    /// Usable in `tree`: the node is reachable and the offset in range.
    pub fn is_valid(&self, tree: &Tree) -> bool {
        tree.is_attached(self.node) && self.offset <= tree.node_length(self.node)
    }

    /// Same node, offset clamped to its length.
    pub fn clamped(self, tree: &Tree) -> Self {
        Self::new(self.node, self.offset.min(tree.node_length(self.node)))
    }
}

/// Start and end of a selection. Collapsed when both are equal (a caret).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    pub start: Position,
    pub end: Position,
}

impl Selection {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    pub fn caret(position: Position) -> Self {
        Self::new(position, position)
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Select the whole of a text node, or all children of an element.
    pub fn contents(tree: &Tree, node: NodeId) -> Self {
        Self::new(
            Position::new(node, 0),
            Position::new(node, tree.node_length(node)),
        )
    }
}

/// Run `mutation` on the surface and restore the selection afterwards.
///
/// Endpoints whose node is still reachable (and whose offset still fits the
/// node) come back exactly. A stale endpoint falls back to where the surface
/// itself left that endpoint, then to the other endpoint, then to the start
/// of the document. Nothing here fails: a lost selection only moves the
/// caret.
pub fn preserve<S, F, R>(surface: &mut S, mutation: F) -> R
where
    S: Surface + ?Sized,
    F: FnOnce(&mut S) -> R,
{
    let captured = surface.selection();
    let result = mutation(surface);

    if let Some(captured) = captured {
        let current = surface.selection();
        let restored = restore(surface.tree(), captured, current);
        surface.set_selection(Some(restored));
    }
    result
}

/// Resolve a captured selection against the mutated tree.
pub fn restore(tree: &Tree, captured: Selection, current: Option<Selection>) -> Selection {
    let start = resolve(tree, captured.start, current.map(|s| s.start));
    let end = resolve(tree, captured.end, current.map(|s| s.end));

    let selection = match (start, end) {
        (Some(start), Some(end)) => Selection::new(start, end),
        (Some(only), None) | (None, Some(only)) => Selection::caret(only),
        (None, None) => Selection::caret(Position::document_start()),
    };

    // Mixing captured and surface endpoints can invert the range
    if compare(tree, selection.start, selection.end) == Ordering::Greater {
        return Selection::caret(selection.start);
    }
    selection
}

fn resolve(tree: &Tree, captured: Position, current: Option<Position>) -> Option<Position> {
    if captured.is_valid(tree) {
        return Some(captured);
    }
    tracing::warn!(
        target: "markwell::selection",
        err = %Error::StaleSelection,
        node = ?captured.node,
        "falling back"
    );
    current.filter(|p| p.is_valid(tree))
}

/// Document order of nodes under the root.
pub(crate) fn document_order(tree: &Tree) -> HashMap<NodeId, usize> {
    tree.traverse().enumerate().map(|(i, id)| (id, i)).collect()
}

/// Sort key of a boundary point: (node index, sub-offset).
///
/// A point inside a text node sits at its character offset; a point before
/// child `i` of an element sits just before that child; a point after the
/// last child sits after the element's last descendant.
pub(crate) fn point_key(tree: &Tree, order: &HashMap<NodeId, usize>, pos: Position) -> (usize, i64) {
    let index = |id: NodeId| order.get(&id).copied().unwrap_or(0);

    if tree.is_text(pos.node) {
        return (index(pos.node), pos.offset as i64);
    }
    match tree.children(pos.node).nth(pos.offset) {
        Some(child) => (index(child), -1),
        None => {
            let last = tree.descendants(pos.node).last().unwrap_or(pos.node);
            (index(last), i64::MAX)
        }
    }
}

/// Order two positions in document order.
pub fn compare(tree: &Tree, a: Position, b: Position) -> Ordering {
    let order = document_order(tree);
    point_key(tree, &order, a).cmp(&point_key(tree, &order, b))
}

/// Non-empty text nodes that overlap the selection, in document order.
pub fn covered_text(tree: &Tree, selection: Selection) -> Vec<NodeId> {
    if selection.is_collapsed() {
        return Vec::new();
    }
    let order = document_order(tree);
    let start = point_key(tree, &order, selection.start);
    let end = point_key(tree, &order, selection.end);

    tree.traverse()
        .filter(|&id| tree.text(id).is_some_and(|t| !t.is_empty()))
        .filter(|&id| {
            let from = point_key(tree, &order, Position::new(id, 0));
            let to = point_key(tree, &order, Position::new(id, tree.node_length(id)));
            start.max(from) < end.min(to)
        })
        .collect()
}

/// Node whose ancestors describe the formatting at the selection.
///
/// For a range this is the first covered text node (a range that starts at
/// the very end of one text node is really about the next one); for a
/// caret it is the caret's own node, see [`caret_node`].
pub fn focus_node(tree: &Tree, selection: Selection) -> Option<NodeId> {
    if !selection.start.is_valid(tree) {
        return None;
    }
    covered_text(tree, selection)
        .first()
        .copied()
        .or_else(|| Some(caret_node(tree, selection.start)))
}

/// Node a caret sits in.
///
/// A caret between the root's children belongs to the first leaf of the
/// child after it, or to the last leaf at the very end of the document.
/// Only an empty root stays the root.
pub fn caret_node(tree: &Tree, position: Position) -> NodeId {
    if position.node != NodeId::ROOT {
        return position.node;
    }
    let at_end = position.offset >= tree.node_length(NodeId::ROOT);
    let step = |id: NodeId| {
        if at_end {
            tree.last_child(id)
        } else {
            tree.first_child(id)
        }
    };
    let child = tree
        .children(NodeId::ROOT)
        .nth(position.offset)
        .or_else(|| tree.last_child(NodeId::ROOT));
    let Some(mut node) = child else {
        return NodeId::ROOT;
    };
    while let Some(child) = step(node) {
        node = child;
    }
    node
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Node, TagKind};

    fn sample() -> (Tree, NodeId, NodeId) {
        let tree = Tree::from_nodes(&[
            Node::element(TagKind::Paragraph, vec![Node::text("hello")]),
            Node::element(TagKind::Paragraph, vec![Node::text("world")]),
        ]);
        let texts: Vec<_> = tree.traverse().filter(|&id| tree.is_text(id)).collect();
        (tree, texts[0], texts[1])
    }

    #[test]
    fn test_restore_exact_when_reachable() {
        let (tree, hello, world) = sample();
        let captured = Selection::new(Position::new(hello, 2), Position::new(world, 3));
        assert_eq!(restore(&tree, captured, None), captured);
    }

    #[test]
    fn test_stale_endpoint_collapses() {
        let (mut tree, hello, world) = sample();
        let captured = Selection::new(Position::new(hello, 2), Position::new(world, 3));
        let p2 = tree.parent(world).unwrap();
        tree.detach(p2).unwrap();

        let restored = restore(&tree, captured, None);
        assert_eq!(restored, Selection::caret(Position::new(hello, 2)));
    }

    #[test]
    fn test_fully_stale_goes_to_start() {
        let (mut tree, hello, _) = sample();
        let captured = Selection::caret(Position::new(hello, 1));
        tree.clear_children(NodeId::ROOT).unwrap();

        assert_eq!(
            restore(&tree, captured, None),
            Selection::caret(Position::document_start())
        );
    }

    #[test]
    fn test_out_of_range_offset_uses_surface_endpoint() {
        let (mut tree, hello, world) = sample();
        let captured = Selection::new(Position::new(hello, 1), Position::new(hello, 5));
        tree.set_text(hello, "he").unwrap();
        let current = Selection::new(Position::new(hello, 0), Position::new(world, 2));

        let restored = restore(&tree, captured, Some(current));
        assert_eq!(restored.start, Position::new(hello, 1));
        assert_eq!(restored.end, Position::new(world, 2));
    }

    #[test]
    fn test_compare_and_cover() {
        let (tree, hello, world) = sample();
        let p1 = tree.parent(hello).unwrap();

        assert_eq!(
            compare(&tree, Position::new(hello, 5), Position::new(world, 0)),
            Ordering::Less
        );
        assert_eq!(
            compare(&tree, Position::new(NodeId::ROOT, 1), Position::new(hello, 5)),
            Ordering::Greater
        );
        assert_eq!(
            compare(&tree, Position::new(p1, 0), Position::new(hello, 0)),
            Ordering::Less
        );

        let sel = Selection::new(Position::new(hello, 5), Position::new(world, 2));
        assert_eq!(covered_text(&tree, sel), vec![world]);
        assert_eq!(focus_node(&tree, sel), Some(world));

        let all = Selection::contents(&tree, NodeId::ROOT);
        assert_eq!(covered_text(&tree, all), vec![hello, world]);
    }

    #[test]
    fn test_selection_json() {
        let sel = Selection::new(Position::new(NodeId(3), 1), Position::new(NodeId(5), 0));
        let json = serde_json::to_string(&sel).unwrap();
        assert_eq!(json, r#"{"start":{"node":3,"offset":1},"end":{"node":5,"offset":0}}"#);
        assert_eq!(serde_json::from_str::<Selection>(&json).unwrap(), sel);
    }

    #[test]
    fn test_root_caret_resolves_to_child() {
        let (tree, hello, world) = sample();

        let start = Selection::caret(Position::document_start());
        assert_eq!(focus_node(&tree, start), Some(hello));
        assert_eq!(caret_node(&tree, Position::new(NodeId::ROOT, 1)), world);
        assert_eq!(caret_node(&tree, Position::new(NodeId::ROOT, 2)), world);
        assert_eq!(caret_node(&Tree::new(), Position::document_start()), NodeId::ROOT);

        let p = tree.parent(hello).unwrap();
        assert_eq!(caret_node(&tree, Position::new(p, 0)), p);
    }
}
