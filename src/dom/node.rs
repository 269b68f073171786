//! Owned tree values.
//!
//! [`Node`] is the plain recursive form of a document: easy to build in
//! tests, compared structurally, and serialized to JSON. The editing code
//! itself works on the arena [`Tree`](super::Tree).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::tag::{Tag, TagKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    Text {
        content: String,
    },
    Element {
        tag: Tag,
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        attributes: BTreeMap<String, String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        children: Vec<Node>,
    },
}

impl Node {
    pub fn text(content: impl Into<String>) -> Self {
        Node::Text {
            content: content.into(),
        }
    }

    pub fn element(tag: impl Into<Tag>, children: Vec<Node>) -> Self {
        Node::Element {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            children,
        }
    }

    /// Builder-style attribute setter; no-op on text nodes.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        if let Node::Element { attributes, .. } = &mut self {
            attributes.insert(name.into(), value.into());
        }
        self
    }

    pub fn kind(&self) -> Option<TagKind> {
        match self {
            Node::Element { tag, .. } => tag.kind(),
            Node::Text { .. } => None,
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Element { children, .. } => children,
            Node::Text { .. } => &[],
        }
    }

    /// Concatenated text of this node and its descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text { content } => out.push_str(content),
            Node::Element { children, .. } => {
                for child in children {
                    child.collect_text(out);
                }
            }
        }
    }
}
