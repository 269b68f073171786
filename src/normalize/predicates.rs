//! Shared predicates for normalization passes.

use crate::dom::{NodeData, NodeId, TagKind, Tree};

/// Text node holding only whitespace.
pub fn is_whitespace_text(tree: &Tree, id: NodeId) -> bool {
    tree.text(id).is_some_and(|t| t.trim().is_empty())
}

/// Block that may stand at the top level of a semantic document.
pub fn is_top_level_block(tree: &Tree, id: NodeId) -> bool {
    tree.kind(id).is_some_and(TagKind::is_top_level_block)
}

/// Paragraphs and lists: the blocks a paragraph may not contain.
pub fn is_paragraph_or_list(tree: &Tree, id: NodeId) -> bool {
    tree.kind(id)
        .is_some_and(|k| k == TagKind::Paragraph || k.is_list())
}

pub fn is_list(tree: &Tree, id: NodeId) -> bool {
    tree.kind(id).is_some_and(TagKind::is_list)
}

/// Member of the formatting exclusivity group (either vocabulary).
pub fn is_exclusive_format(tree: &Tree, id: NodeId) -> bool {
    tree.kind(id).is_some_and(TagKind::is_exclusive_format)
}

/// Inline annotation, links included (either vocabulary).
pub fn is_annotation(tree: &Tree, id: NodeId) -> bool {
    tree.kind(id).is_some_and(|k| k.annotation().is_some())
}

/// Check if an element can be pruned when empty.
///
/// Inline wrappers and lists carry nothing once their content is gone.
/// Paragraphs, headings and list items are kept: an empty block is a blank
/// line the user typed.
pub fn is_prunable(tree: &Tree, id: NodeId) -> bool {
    let Some(NodeData::Element { tag, .. }) = tree.data(id) else {
        return false;
    };
    match tag.kind() {
        Some(kind) => matches!(
            kind,
            TagKind::Emphasis
                | TagKind::Strong
                | TagKind::Code
                | TagKind::Italic
                | TagKind::Bold
                | TagKind::MonospaceSpan
                | TagKind::Span
                | TagKind::Link
                | TagKind::UnorderedList
                | TagKind::OrderedList
        ),
        None => false,
    }
}

/// Foreign element whose whole subtree is dropped rather than unwrapped.
pub fn is_script_or_style(tree: &Tree, id: NodeId) -> bool {
    tree.tag(id)
        .is_some_and(|t| t.kind().is_none() && matches!(t.html_name(), "script" | "style"))
}

/// Element outside the known vocabulary.
pub fn is_unknown_element(tree: &Tree, id: NodeId) -> bool {
    tree.is_element(id) && tree.kind(id).is_none()
}
