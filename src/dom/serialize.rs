//! HTML serialization of tree content.
//!
//! Emits compact HTML for the children of a node, escaping text and
//! attribute values. Comments are never written out.

use std::fmt::Write;

use super::arena::{NodeData, NodeId, Tree};
use super::tag::TagKind;

/// Serialize the children of `id` as HTML.
pub fn to_html(tree: &Tree, id: NodeId) -> String {
    let mut out = String::new();
    for child in tree.children(id) {
        write_node(tree, child, &mut out);
    }
    out
}

/// Serialize `id` itself (including its own tag) as HTML.
pub fn outer_html(tree: &Tree, id: NodeId) -> String {
    let mut out = String::new();
    write_node(tree, id, &mut out);
    out
}

fn write_node(tree: &Tree, id: NodeId, out: &mut String) {
    let Some(data) = tree.data(id) else {
        return;
    };

    match data {
        NodeData::Text(text) => out.push_str(&escape_text(text)),
        NodeData::Comment(_) => {}
        NodeData::Root => {
            for child in tree.children(id) {
                write_node(tree, child, out);
            }
        }
        NodeData::Element { tag, attrs } => {
            let name = tag.html_name();
            out.push('<');
            out.push_str(name);
            for attr in attrs {
                let _ = write!(out, " {}=\"{}\"", attr.name, escape_attr(&attr.value));
            }
            out.push('>');

            if tag.kind().is_some_and(TagKind::is_void) {
                return;
            }

            for child in tree.children(id) {
                write_node(tree, child, out);
            }
            let _ = write!(out, "</{name}>");
        }
    }
}

/// Escape text content.
pub fn escape_text(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    result
}

/// Escape an attribute value (double-quoted).
pub fn escape_attr(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            _ => result.push(c),
        }
    }
    result
}

/// Plain text of a document: block boundaries become newlines, `<br>`
/// becomes a newline, inline markup disappears.
pub fn block_text(tree: &Tree, id: NodeId) -> String {
    let mut out = String::new();
    collect_block_text(tree, id, &mut out);
    out.trim().to_string()
}

fn collect_block_text(tree: &Tree, id: NodeId, out: &mut String) {
    for child in tree.children(id) {
        match tree.data(child) {
            Some(NodeData::Text(text)) => out.push_str(text),
            Some(NodeData::Element { tag, .. }) => {
                let kind = tag.kind();
                if kind == Some(TagKind::LineBreak) {
                    out.push('\n');
                    continue;
                }
                let is_block = kind.is_some_and(|k| {
                    k.is_top_level_block() || matches!(k, TagKind::Div | TagKind::ListItem)
                });
                if is_block && !out.is_empty() && !out.ends_with('\n') {
                    out.push('\n');
                }
                collect_block_text(tree, child, out);
                if is_block && !out.ends_with('\n') {
                    out.push('\n');
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Attribute, Node};

    #[test]
    fn test_serialize_with_attributes() {
        let node = Node::element(
            TagKind::Paragraph,
            vec![
                Node::text("1 < 2 & "),
                Node::element(TagKind::Link, vec![Node::text("go")]).with_attr("href", "a\"b"),
                Node::element(TagKind::LineBreak, vec![]),
            ],
        );
        let tree = Tree::from_node(&node);

        assert_eq!(
            to_html(&tree, NodeId::ROOT),
            "<p>1 &lt; 2 &amp; <a href=\"a&quot;b\">go</a><br></p>"
        );
    }

    #[test]
    fn test_comments_are_not_written() {
        let mut tree = Tree::new();
        let p = tree.create_element(TagKind::Paragraph, vec![Attribute::new("class", "x")]);
        tree.append(NodeId::ROOT, p).unwrap();
        let c = tree.create_comment("hidden");
        tree.append(p, c).unwrap();

        assert_eq!(outer_html(&tree, p), "<p class=\"x\"></p>");
    }

    #[test]
    fn test_block_text() {
        let nodes = [
            Node::element(TagKind::Paragraph, vec![Node::text("one")]),
            Node::element(
                TagKind::UnorderedList,
                vec![
                    Node::element(TagKind::ListItem, vec![Node::text("a")]),
                    Node::element(TagKind::ListItem, vec![Node::text("b")]),
                ],
            ),
        ];
        let tree = Tree::from_nodes(&nodes);

        assert_eq!(block_text(&tree, NodeId::ROOT), "one\na\nb");
    }
}
