//! html5ever TreeSink implementation for the document arena.

use std::cell::RefCell;
use std::collections::HashMap;

use html5ever::tendril::StrTendril;
use html5ever::tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{Attribute as Html5Attribute, QualName};

use super::arena::{Attribute, NodeData, NodeId, Tree};
use super::tag::Tag;

/// Handle used by TreeSink to reference nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeHandle(pub NodeId);

/// TreeSink implementation that builds a [`Tree`].
///
/// Uses interior mutability (RefCell) because html5ever's TreeSink trait
/// requires methods to take `&self` but we need to mutate the tree.
pub struct TreeBuilderSink {
    tree: RefCell<Tree>,
    /// Parsed element names; the tree itself only keeps the mapped [`Tag`].
    /// Boxed so the names never move once handed out by `elem_name`.
    names: RefCell<HashMap<NodeId, Box<QualName>>>,
    quirks_mode: RefCell<QuirksMode>,
}

impl Default for TreeBuilderSink {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilderSink {
    pub fn new() -> Self {
        Self {
            tree: RefCell::new(Tree::new()),
            names: RefCell::new(HashMap::new()),
            quirks_mode: RefCell::new(QuirksMode::NoQuirks),
        }
    }

    /// Consume the sink and return the tree.
    pub fn into_tree(self) -> Tree {
        self.tree.into_inner()
    }

    fn insert_text_before(&self, sibling: NodeId, text: &str) {
        let mut tree = self.tree.borrow_mut();
        if let Some(prev) = tree.prev_sibling(sibling)
            && let Some(existing) = tree.text(prev)
        {
            let merged = format!("{existing}{text}");
            let _ = tree.set_text(prev, merged);
            return;
        }
        let node = tree.create_text(text);
        let _ = tree.insert_before(sibling, node);
    }
}

impl TreeSink for TreeBuilderSink {
    type Handle = NodeHandle;
    type Output = Self;
    type ElemName<'a>
        = &'a QualName
    where
        Self: 'a;

    fn finish(self) -> Self::Output {
        self
    }

    fn parse_error(&self, msg: std::borrow::Cow<'static, str>) {
        // Lenient like browsers; clipboard HTML is rarely well-formed
        tracing::trace!(target: "markwell::dom", %msg, "html parse error");
    }

    fn get_document(&self) -> Self::Handle {
        NodeHandle(NodeId::ROOT)
    }

    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> Self::ElemName<'a> {
        static EMPTY: QualName = QualName {
            prefix: None,
            ns: html5ever::ns!(),
            local: html5ever::local_name!(""),
        };

        let names = self.names.borrow();
        match names.get(&target.0) {
            // SAFETY: names are boxed and never removed while the sink lives,
            // so the pointee outlives the RefCell borrow. The trait forces a
            // reference tied to `self`, which the RefCell cannot express.
            Some(name) => unsafe { std::mem::transmute::<&QualName, &'a QualName>(name.as_ref()) },
            None => &EMPTY,
        }
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<Html5Attribute>,
        _flags: ElementFlags,
    ) -> Self::Handle {
        let converted: Vec<Attribute> = attrs
            .into_iter()
            .map(|a| Attribute::new(a.name.local.to_string(), a.value.to_string()))
            .collect();
        let classes = converted
            .iter()
            .find(|a| a.name == "class")
            .map(|a| a.value.as_str())
            .unwrap_or("");
        let tag = Tag::from_html(name.local.as_ref(), classes);

        let id = self.tree.borrow_mut().create_element(tag, converted);
        self.names.borrow_mut().insert(id, Box::new(name));
        NodeHandle(id)
    }

    fn create_comment(&self, text: StrTendril) -> Self::Handle {
        NodeHandle(self.tree.borrow_mut().create_comment(text.to_string()))
    }

    fn create_pi(&self, _target: StrTendril, _data: StrTendril) -> Self::Handle {
        // Processing instructions - create as comment
        NodeHandle(self.tree.borrow_mut().create_comment(String::new()))
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        let mut tree = self.tree.borrow_mut();
        let _ = match child {
            NodeOrText::AppendNode(node) => tree.append(parent.0, node.0),
            NodeOrText::AppendText(text) => tree.append_text(parent.0, &text),
        };
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        let has_parent = self.tree.borrow().parent(element.0).is_some();
        if has_parent {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &self,
        _name: StrTendril,
        _public_id: StrTendril,
        _system_id: StrTendril,
    ) {
        // Fragments carry no doctype
    }

    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        // For templates, just return the target itself
        *target
    }

    fn same_node(&self, x: &Self::Handle, y: &Self::Handle) -> bool {
        x.0 == y.0
    }

    fn set_quirks_mode(&self, mode: QuirksMode) {
        *self.quirks_mode.borrow_mut() = mode;
    }

    fn append_before_sibling(&self, sibling: &Self::Handle, new_node: NodeOrText<Self::Handle>) {
        match new_node {
            NodeOrText::AppendNode(node) => {
                let _ = self.tree.borrow_mut().insert_before(sibling.0, node.0);
            }
            NodeOrText::AppendText(text) => self.insert_text_before(sibling.0, &text),
        }
    }

    fn add_attrs_if_missing(&self, target: &Self::Handle, attrs: Vec<Html5Attribute>) {
        let mut tree = self.tree.borrow_mut();
        for attr in attrs {
            let name = attr.name.local.to_string();
            if tree.attr(target.0, &name).is_none() {
                let _ = tree.set_attr(target.0, &name, attr.value.to_string());
            }
        }
    }

    fn remove_from_parent(&self, target: &Self::Handle) {
        let _ = self.tree.borrow_mut().detach(target.0);
    }

    fn reparent_children(&self, node: &Self::Handle, new_parent: &Self::Handle) {
        let _ = self.tree.borrow_mut().move_children(node.0, new_parent.0);
    }
}

/// Locate an element by HTML name anywhere under `id`.
pub(crate) fn find_by_html_name(tree: &Tree, id: NodeId, name: &str) -> Option<NodeId> {
    tree.descendants(id).find(|&n| match tree.data(n) {
        Some(NodeData::Element { tag, .. }) => tag.html_name() == name,
        _ => false,
    })
}
