//! Arena-based document tree.
//!
//! All nodes live in one vector and refer to each other by index, so moving
//! a subtree is a re-link rather than a copy and node identities stay stable
//! across rewrites. Detached nodes stay in the arena; they are simply no
//! longer reachable from the root.

use serde::{Deserialize, Serialize};

use crate::error::{Result, invalid_reference};

use super::node::Node;
use super::tag::{Tag, TagKind, has_class};

/// Unique identifier for a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// The root node ID (always 0).
    pub const ROOT: NodeId = NodeId(0);
}

/// Node payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    /// Editing root.
    Root,
    /// Element with tag and attributes.
    Element { tag: Tag, attrs: Vec<Attribute> },
    /// Text content.
    Text(String),
    /// Comment (only ever present in parsed, unsanitized input).
    Comment(String),
}

/// HTML attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A node in the arena.
#[derive(Debug, Clone)]
pub struct ArenaNode {
    pub data: NodeData,
    pub parent: Option<NodeId>,
    pub first_child: Option<NodeId>,
    pub last_child: Option<NodeId>,
    pub prev_sibling: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
}

impl ArenaNode {
    fn new(data: NodeData) -> Self {
        Self {
            data,
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
        }
    }
}

/// Document tree.
///
/// Index 0 is always the root. Cloning a tree keeps every `NodeId` valid in
/// the clone, which is what the transforms rely on when they rewrite a
/// throwaway copy.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<ArenaNode>,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// Create an empty tree with just a root.
    pub fn new() -> Self {
        Self {
            nodes: vec![ArenaNode::new(NodeData::Root)],
        }
    }

    /// Build a tree whose root holds the given nodes.
    pub fn from_nodes<'a>(nodes: impl IntoIterator<Item = &'a Node>) -> Self {
        let mut tree = Tree::new();
        for node in nodes {
            let id = tree.build(node);
            tree.link_last(NodeId::ROOT, id);
        }
        tree
    }

    /// Build a tree whose root holds a single node.
    pub fn from_node(node: &Node) -> Self {
        Self::from_nodes(std::iter::once(node))
    }

    fn build(&mut self, node: &Node) -> NodeId {
        match node {
            Node::Text { content } => self.create_text(content.clone()),
            Node::Element {
                tag,
                attributes,
                children,
            } => {
                let attrs = attributes
                    .iter()
                    .map(|(name, value)| Attribute::new(name.clone(), value.clone()))
                    .collect();
                let id = self.create_element(tag.clone(), attrs);
                for child in children {
                    let child_id = self.build(child);
                    self.link_last(id, child_id);
                }
                id
            }
        }
    }

    /// Get the root node ID.
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Number of nodes ever allocated (attached or not).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree has no content under the root.
    pub fn is_empty(&self) -> bool {
        self.first_child(NodeId::ROOT).is_none()
    }

    pub fn get(&self, id: NodeId) -> Option<&ArenaNode> {
        self.nodes.get(id.0 as usize)
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut ArenaNode> {
        self.nodes.get_mut(id.0 as usize)
    }

    fn check(&self, id: NodeId) -> Result<()> {
        if self.get(id).is_some() {
            Ok(())
        } else {
            Err(invalid_reference(id))
        }
    }

    fn alloc(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(ArenaNode::new(data));
        id
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: impl Into<Tag>, attrs: Vec<Attribute>) -> NodeId {
        self.alloc(NodeData::Element {
            tag: tag.into(),
            attrs,
        })
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(NodeData::Text(text.into()))
    }

    /// Create a detached comment node.
    pub fn create_comment(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(NodeData::Comment(text.into()))
    }

    /// Create an element with the same tag and attributes, but no children.
    pub fn shallow_clone(&mut self, id: NodeId) -> Result<NodeId> {
        let data = self.get(id).ok_or_else(|| invalid_reference(id))?.data.clone();
        Ok(self.alloc(data))
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.first_child)
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.last_child)
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.next_sibling)
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.prev_sibling)
    }

    /// Previous sibling that is an element, skipping text and comments.
    pub fn prev_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let mut cursor = self.prev_sibling(id);
        while let Some(sibling) = cursor {
            if self.is_element(sibling) {
                return Some(sibling);
            }
            cursor = self.prev_sibling(sibling);
        }
        None
    }

    /// Iterate over the children of a node.
    pub fn children(&self, parent: NodeId) -> ChildrenIter<'_> {
        ChildrenIter {
            tree: self,
            current: self.first_child(parent),
        }
    }

    /// Snapshot of the children, safe to hold across mutations.
    pub fn child_ids(&self, parent: NodeId) -> Vec<NodeId> {
        self.children(parent).collect()
    }

    /// Depth-first pre-order walk of `id` and everything below it.
    ///
    /// The iterator is lazy and `Clone`; cloning it before consuming gives a
    /// fresh walk from the same start.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            start: id,
            next: self.get(id).map(|_| id),
        }
    }

    /// Depth-first pre-order walk of the whole document.
    pub fn traverse(&self) -> Descendants<'_> {
        self.descendants(NodeId::ROOT)
    }

    /// Iterate over the ancestors of a node, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&n| self.parent(n))
    }

    /// Check whether `id` is reachable from the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        if id == NodeId::ROOT {
            return true;
        }
        if self.get(id).is_none() {
            return false;
        }
        self.ancestors(id).any(|a| a == NodeId::ROOT)
    }

    /// Check whether `ancestor` contains `id` (or is `id`).
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        id == ancestor || self.ancestors(id).any(|a| a == ancestor)
    }

    /// Position of `id` among its parent's children.
    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).position(|c| c == id)
    }

    // ------------------------------------------------------------------
    // Data access
    // ------------------------------------------------------------------

    pub fn data(&self, id: NodeId) -> Option<&NodeData> {
        self.get(id).map(|n| &n.data)
    }

    pub fn tag(&self, id: NodeId) -> Option<&Tag> {
        match self.data(id) {
            Some(NodeData::Element { tag, .. }) => Some(tag),
            _ => None,
        }
    }

    /// Known tag kind of an element.
    pub fn kind(&self, id: NodeId) -> Option<TagKind> {
        self.tag(id).and_then(Tag::kind)
    }

    pub fn is_kind(&self, id: NodeId, kind: TagKind) -> bool {
        self.kind(id) == Some(kind)
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.data(id), Some(NodeData::Element { .. }))
    }

    pub fn is_text(&self, id: NodeId) -> bool {
        matches!(self.data(id), Some(NodeData::Text(_)))
    }

    pub fn is_comment(&self, id: NodeId) -> bool {
        matches!(self.data(id), Some(NodeData::Comment(_)))
    }

    /// Text of a text node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.data(id) {
            Some(NodeData::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Replace the content of a text node.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) -> Result<()> {
        match self.get_mut(id).map(|n| &mut n.data) {
            Some(NodeData::Text(existing)) => {
                *existing = text.into();
                Ok(())
            }
            _ => Err(invalid_reference(id)),
        }
    }

    pub fn attrs(&self, id: NodeId) -> &[Attribute] {
        match self.data(id) {
            Some(NodeData::Element { attrs, .. }) => attrs,
            _ => &[],
        }
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.attrs(id)
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| a.value.as_str())
    }

    /// Set or overwrite an attribute on an element.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) -> Result<()> {
        match self.get_mut(id).map(|n| &mut n.data) {
            Some(NodeData::Element { attrs, .. }) => {
                let value = value.into();
                match attrs.iter_mut().find(|a| a.name.eq_ignore_ascii_case(name)) {
                    Some(existing) => existing.value = value,
                    None => attrs.push(Attribute::new(name, value)),
                }
                Ok(())
            }
            _ => Err(invalid_reference(id)),
        }
    }

    /// Keep only the attributes accepted by `keep`.
    pub fn retain_attrs<F>(&mut self, id: NodeId, mut keep: F) -> Result<()>
    where
        F: FnMut(&Attribute) -> bool,
    {
        match self.get_mut(id).map(|n| &mut n.data) {
            Some(NodeData::Element { attrs, .. }) => {
                attrs.retain(|a| keep(a));
                Ok(())
            }
            _ => Err(invalid_reference(id)),
        }
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.attr(id, "class").is_some_and(|c| has_class(c, class))
    }

    /// Concatenated text of `id` and everything below it.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        for node in self.descendants(id) {
            if let Some(text) = self.text(node) {
                out.push_str(text);
            }
        }
        out
    }

    /// Number of offsets a position inside `id` can take: characters for text,
    /// children for everything else.
    pub fn node_length(&self, id: NodeId) -> usize {
        match self.text(id) {
            Some(text) => text.chars().count(),
            None => self.children(id).count(),
        }
    }

    // ------------------------------------------------------------------
    // Structural mutation
    // ------------------------------------------------------------------

    /// Unlink a node from its current parent (no-op when detached).
    fn unlink(&mut self, id: NodeId) {
        let (parent, prev, next) = match self.get(id) {
            Some(n) => (n.parent, n.prev_sibling, n.next_sibling),
            None => return,
        };

        match prev {
            Some(prev) => {
                if let Some(p) = self.get_mut(prev) {
                    p.next_sibling = next;
                }
            }
            None => {
                if let Some(p) = parent.and_then(|p| self.get_mut(p)) {
                    p.first_child = next;
                }
            }
        }

        match next {
            Some(next) => {
                if let Some(n) = self.get_mut(next) {
                    n.prev_sibling = prev;
                }
            }
            None => {
                if let Some(p) = parent.and_then(|p| self.get_mut(p)) {
                    p.last_child = prev;
                }
            }
        }

        if let Some(node) = self.get_mut(id) {
            node.parent = None;
            node.prev_sibling = None;
            node.next_sibling = None;
        }
    }

    fn link_last(&mut self, parent: NodeId, child: NodeId) {
        let last = self.last_child(parent);

        if let Some(node) = self.get_mut(child) {
            node.parent = Some(parent);
            node.prev_sibling = last;
            node.next_sibling = None;
        }

        match last {
            Some(last) => {
                if let Some(node) = self.get_mut(last) {
                    node.next_sibling = Some(child);
                }
            }
            None => {
                if let Some(node) = self.get_mut(parent) {
                    node.first_child = Some(child);
                }
            }
        }

        if let Some(node) = self.get_mut(parent) {
            node.last_child = Some(child);
        }
    }

    fn link_before(&mut self, sibling: NodeId, new_node: NodeId) {
        let parent = self.parent(sibling);
        let prev = self.prev_sibling(sibling);

        if let Some(node) = self.get_mut(new_node) {
            node.parent = parent;
            node.prev_sibling = prev;
            node.next_sibling = Some(sibling);
        }

        if let Some(node) = self.get_mut(sibling) {
            node.prev_sibling = Some(new_node);
        }

        match prev {
            Some(prev) => {
                if let Some(node) = self.get_mut(prev) {
                    node.next_sibling = Some(new_node);
                }
            }
            None => {
                if let Some(node) = parent.and_then(|p| self.get_mut(p)) {
                    node.first_child = Some(new_node);
                }
            }
        }
    }

    /// Refuse moves that would make a node its own ancestor.
    fn check_move(&self, target: NodeId, moved: NodeId) -> Result<()> {
        self.check(target)?;
        self.check(moved)?;
        if moved == NodeId::ROOT || self.is_inclusive_ancestor(moved, target) {
            return Err(invalid_reference(moved));
        }
        Ok(())
    }

    /// Append `child` as the last child of `parent`, moving it if needed.
    pub fn append(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.check_move(parent, child)?;
        self.unlink(child);
        self.link_last(parent, child);
        Ok(())
    }

    /// Insert `new_node` right before `sibling`.
    pub fn insert_before(&mut self, sibling: NodeId, new_node: NodeId) -> Result<()> {
        if sibling == new_node {
            return self.check(sibling);
        }
        self.check_move(sibling, new_node)?;
        if self.parent(sibling).is_none() {
            return Err(invalid_reference(sibling));
        }
        self.unlink(new_node);
        self.link_before(sibling, new_node);
        Ok(())
    }

    /// Insert `new_node` right after `sibling`.
    pub fn insert_after(&mut self, sibling: NodeId, new_node: NodeId) -> Result<()> {
        match self.next_sibling(sibling) {
            Some(next) if next == new_node => Ok(()),
            Some(next) => self.insert_before(next, new_node),
            None => {
                let parent = self.parent(sibling).ok_or_else(|| invalid_reference(sibling))?;
                self.append(parent, new_node)
            }
        }
    }

    /// Insert `child` at `index` among the children of `parent`.
    pub fn insert_at(&mut self, parent: NodeId, index: usize, child: NodeId) -> Result<()> {
        match self.children(parent).nth(index) {
            Some(sibling) => self.insert_before(sibling, child),
            None => self.append(parent, child),
        }
    }

    /// Detach a node (and its subtree) from the tree.
    pub fn detach(&mut self, id: NodeId) -> Result<()> {
        self.check(id)?;
        if id == NodeId::ROOT {
            return Err(invalid_reference(id));
        }
        self.unlink(id);
        Ok(())
    }

    /// Put `replacement` where `target` is, keeping sibling order.
    pub fn replace(&mut self, target: NodeId, replacement: NodeId) -> Result<()> {
        if target == replacement {
            return self.check(target);
        }
        self.insert_before(target, replacement)?;
        self.unlink(target);
        Ok(())
    }

    /// Remove an element, splicing its children into its place.
    pub fn unwrap(&mut self, id: NodeId) -> Result<()> {
        self.check(id)?;
        if self.parent(id).is_none() {
            return Err(invalid_reference(id));
        }
        for child in self.child_ids(id) {
            self.unlink(child);
            self.link_before(id, child);
        }
        self.unlink(id);
        Ok(())
    }

    /// Wrap `id` in a new element, returning the wrapper.
    pub fn wrap(&mut self, id: NodeId, tag: impl Into<Tag>, attrs: Vec<Attribute>) -> Result<NodeId> {
        self.wrap_run(id, id, tag, attrs)
    }

    /// Wrap the siblings `first..=last` in a new element.
    pub fn wrap_run(
        &mut self,
        first: NodeId,
        last: NodeId,
        tag: impl Into<Tag>,
        attrs: Vec<Attribute>,
    ) -> Result<NodeId> {
        self.check(first)?;
        self.check(last)?;
        if self.parent(first).is_none() || self.parent(first) != self.parent(last) {
            return Err(invalid_reference(last));
        }
        let wrapper = self.create_element(tag, attrs);
        self.link_before(first, wrapper);

        let mut cursor = Some(first);
        while let Some(current) = cursor {
            cursor = self.next_sibling(current);
            self.unlink(current);
            self.link_last(wrapper, current);
            if current == last {
                break;
            }
        }
        Ok(wrapper)
    }

    /// Move all children of `from` to the end of `to`.
    pub fn move_children(&mut self, from: NodeId, to: NodeId) -> Result<()> {
        self.check(from)?;
        self.check(to)?;
        if self.is_inclusive_ancestor(from, to) && from != to {
            return Err(invalid_reference(to));
        }
        if from == to {
            return Ok(());
        }
        for child in self.child_ids(from) {
            self.unlink(child);
            self.link_last(to, child);
        }
        Ok(())
    }

    /// Replace an element by a fresh one with another tag, moving the
    /// children over. The old node is detached, so positions inside the
    /// element itself go stale while positions in its descendants survive.
    pub fn retag(&mut self, id: NodeId, tag: impl Into<Tag>, attrs: Vec<Attribute>) -> Result<NodeId> {
        self.check(id)?;
        let replacement = self.create_element(tag, attrs);
        self.replace(id, replacement)?;
        self.move_children(id, replacement)?;
        Ok(replacement)
    }

    /// Append text to the last child if it is a text node, otherwise add one.
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> Result<()> {
        self.check(parent)?;
        if let Some(last) = self.last_child(parent)
            && let Some(NodeData::Text(existing)) = self.get_mut(last).map(|n| &mut n.data)
        {
            existing.push_str(text);
            return Ok(());
        }
        let node = self.create_text(text);
        self.link_last(parent, node);
        Ok(())
    }

    /// Deep-copy a node from another tree into this one (detached).
    pub fn import(&mut self, other: &Tree, id: NodeId) -> Result<NodeId> {
        let data = other.data(id).ok_or_else(|| invalid_reference(id))?.clone();
        let data = match data {
            NodeData::Root => NodeData::Element {
                tag: Tag::Known(TagKind::Div),
                attrs: Vec::new(),
            },
            other => other,
        };
        let copy = self.alloc(data);
        for child in other.children(id) {
            let child_copy = self.import(other, child)?;
            self.link_last(copy, child_copy);
        }
        Ok(copy)
    }

    /// Copy the children of `id` into a new tree, under its root.
    pub fn subtree(&self, id: NodeId) -> Result<Tree> {
        self.check(id)?;
        let mut tree = Tree::new();
        for child in self.children(id) {
            let copy = tree.import(self, child)?;
            tree.link_last(NodeId::ROOT, copy);
        }
        Ok(tree)
    }

    /// Remove every child of `id`.
    pub fn clear_children(&mut self, id: NodeId) -> Result<()> {
        self.check(id)?;
        for child in self.child_ids(id) {
            self.unlink(child);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Owned conversion and equality
    // ------------------------------------------------------------------

    /// Convert a node and its subtree to an owned value. Comments and the
    /// root itself have no owned form.
    pub fn to_node(&self, id: NodeId) -> Option<Node> {
        match self.data(id)? {
            NodeData::Text(text) => Some(Node::Text {
                content: text.clone(),
            }),
            NodeData::Element { tag, attrs } => Some(Node::Element {
                tag: tag.clone(),
                attributes: attrs
                    .iter()
                    .map(|a| (a.name.clone(), a.value.clone()))
                    .collect(),
                children: self.to_nodes(id),
            }),
            NodeData::Root | NodeData::Comment(_) => None,
        }
    }

    /// Owned form of the children of `id`.
    pub fn to_nodes(&self, id: NodeId) -> Vec<Node> {
        self.children(id).filter_map(|c| self.to_node(c)).collect()
    }

    /// Structural equality of the two documents (ignores node identity).
    pub fn structurally_eq(&self, other: &Tree) -> bool {
        self.to_nodes(NodeId::ROOT) == other.to_nodes(NodeId::ROOT)
    }
}

/// Iterator over children of a node.
pub struct ChildrenIter<'a> {
    tree: &'a Tree,
    current: Option<NodeId>,
}

impl Iterator for ChildrenIter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.next_sibling(id);
        Some(id)
    }
}

/// Depth-first pre-order iterator bounded by its start node.
#[derive(Clone)]
pub struct Descendants<'a> {
    tree: &'a Tree,
    start: NodeId,
    next: Option<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;

        self.next = if let Some(child) = self.tree.first_child(current) {
            Some(child)
        } else {
            let mut cursor = current;
            loop {
                if cursor == self.start {
                    break None;
                }
                if let Some(sibling) = self.tree.next_sibling(cursor) {
                    break Some(sibling);
                }
                match self.tree.parent(cursor) {
                    Some(parent) => cursor = parent,
                    None => break None,
                }
            }
        };

        Some(current)
    }
}
