use std::collections::VecDeque;

use crate::dom::{Attribute, MONOSPACE_CLASS, NodeId, TagKind, Tree, parse_fragment, to_html};
use crate::error::Result;
use crate::selection::{Position, Selection, caret_node};

use super::range::{ensure_line_block, isolate, lift_out, split_before, split_text};
use super::{NativeCommand, Surface};

/// In-memory editing surface.
///
/// Behaves like a browser's editable element closely enough to drive the
/// engine without one: inline formats wrap or lift the selected text, list
/// commands turn line blocks into list items and back, and prompts are
/// answered from a script.
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    tree: Tree,
    selection: Option<Selection>,
    editable: bool,
    focused: bool,
    answers: VecDeque<Option<String>>,
}

impl MemorySurface {
    pub fn new(tree: Tree) -> Self {
        Self {
            tree,
            ..Self::default()
        }
    }

    pub fn from_html(html: &str) -> Self {
        Self::new(parse_fragment(html))
    }

    /// Current content as HTML.
    pub fn html(&self) -> String {
        to_html(&self.tree, NodeId::ROOT)
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn into_tree(self) -> Tree {
        self.tree
    }

    /// Queue the answer to the next prompt.
    pub fn answer_prompt(&mut self, answer: Option<&str>) {
        self.answers.push_back(answer.map(str::to_string));
    }

    /// Select the first occurrence of `needle` inside a single text node.
    pub fn select_text(&mut self, needle: &str) -> bool {
        let found = self.tree.traverse().find_map(|id| {
            let text = self.tree.text(id)?;
            let byte = text.find(needle)?;
            let start = text[..byte].chars().count();
            Some((id, start, start + needle.chars().count()))
        });
        match found {
            Some((id, start, end)) => {
                self.selection = Some(Selection::new(Position::new(id, start), Position::new(id, end)));
                true
            }
            None => false,
        }
    }

    /// Put a caret at a character offset of the first text node containing
    /// `needle`.
    pub fn place_caret(&mut self, needle: &str, offset: usize) -> bool {
        let found = self
            .tree
            .traverse()
            .find(|&id| self.tree.text(id).is_some_and(|t| t.contains(needle)));
        match found {
            Some(id) => {
                let offset = offset.min(self.tree.node_length(id));
                self.selection = Some(Selection::caret(Position::new(id, offset)));
                true
            }
            None => false,
        }
    }

    /// Select everything.
    pub fn select_all(&mut self) {
        self.selection = Some(Selection::contents(&self.tree, NodeId::ROOT));
    }

    fn toggle_inline(&mut self, kind: TagKind, attrs: Vec<Attribute>) -> Result<()> {
        let covered = isolate(&mut self.tree, &mut self.selection)?;
        if covered.is_empty() {
            tracing::debug!(target: "markwell::surface", ?kind, "no text selected");
            return Ok(());
        }

        let annotation = kind.annotation();
        let formatted = |tree: &Tree, id: NodeId| -> Option<NodeId> {
            tree.ancestors(id)
                .find(|&a| tree.kind(a).and_then(TagKind::annotation) == annotation)
        };

        if covered.iter().all(|&t| formatted(&self.tree, t).is_some()) {
            for &text in &covered {
                while let Some(wrapper) = formatted(&self.tree, text) {
                    lift_out(&mut self.tree, text, wrapper)?;
                }
            }
        } else {
            for &text in &covered {
                if formatted(&self.tree, text).is_none() {
                    self.tree.wrap(text, kind, attrs.clone())?;
                }
            }
        }
        Ok(())
    }

    fn remove_format(&mut self) -> Result<()> {
        let covered = isolate(&mut self.tree, &mut self.selection)?;
        let is_format = |tree: &Tree, id: NodeId| {
            tree.kind(id)
                .is_some_and(|k| k != TagKind::Link && k.annotation().is_some())
        };
        for &text in &covered {
            loop {
                let wrapper = self.tree.ancestors(text).find(|&a| is_format(&self.tree, a));
                let Some(wrapper) = wrapper else {
                    break;
                };
                lift_out(&mut self.tree, text, wrapper)?;
            }
        }
        Ok(())
    }

    fn toggle_list(&mut self, kind: TagKind) -> Result<()> {
        let Some(selection) = self.selection else {
            return Ok(());
        };
        let mut nodes = isolate(&mut self.tree, &mut self.selection)?;
        if nodes.is_empty() {
            nodes.push(caret_node(&self.tree, selection.start));
        }

        let item_of = |tree: &Tree, id: NodeId| {
            std::iter::once(id)
                .chain(tree.ancestors(id))
                .find(|&a| tree.is_kind(a, TagKind::ListItem))
        };

        if let Some(item) = item_of(&self.tree, nodes[0])
            && let Some(list) = self.tree.parent(item)
        {
            if !self.tree.is_kind(list, kind) {
                self.tree.retag(list, kind, Vec::new())?;
                return Ok(());
            }
            for &node in &nodes {
                if let Some(item) = item_of(&self.tree, node) {
                    unlist(&mut self.tree, item)?;
                }
            }
            return Ok(());
        }

        let mut blocks: Vec<NodeId> = Vec::new();
        for &node in &nodes {
            let block = ensure_line_block(&mut self.tree, node)?;
            if !blocks.contains(&block) {
                blocks.push(block);
            }
        }
        let parent = self.tree.parent(blocks[0]);
        blocks.retain(|&b| self.tree.parent(b) == parent);
        for pair in blocks.windows(2) {
            drop_separators(&mut self.tree, pair[0], pair[1])?;
        }

        let list = self.tree.create_element(kind, Vec::new());
        self.tree.insert_before(blocks[0], list)?;
        for block in blocks {
            let item = self.tree.retag(block, TagKind::ListItem, Vec::new())?;
            self.tree.append(list, item)?;
        }
        Ok(())
    }

    fn create_link(&mut self, url: &str) -> Result<()> {
        let href = || vec![Attribute::new("href", url)];
        let covered = isolate(&mut self.tree, &mut self.selection)?;

        if covered.is_empty() {
            let text = self.tree.create_text(url);
            let link = self.tree.create_element(TagKind::Link, href());
            self.tree.append(link, text)?;
            self.insert_at_caret(&[link])?;
            return Ok(());
        }

        for &text in &covered {
            let existing = self
                .tree
                .ancestors(text)
                .find(|&a| self.tree.is_kind(a, TagKind::Link));
            match existing {
                Some(link) => self.tree.set_attr(link, "href", url)?,
                None => {
                    self.tree.wrap(text, TagKind::Link, href())?;
                }
            }
        }
        Ok(())
    }

    /// Remove the selected text and collapse the selection where it began.
    fn delete_selection(&mut self) -> Result<()> {
        let covered = isolate(&mut self.tree, &mut self.selection)?;
        let Some(&first) = covered.first() else {
            return Ok(());
        };
        let caret = match (self.tree.parent(first), self.tree.index_in_parent(first)) {
            (Some(parent), Some(index)) => Position::new(parent, index),
            _ => Position::document_start(),
        };
        for text in covered {
            self.tree.detach(text)?;
        }
        self.selection = Some(Selection::caret(caret));
        Ok(())
    }

    /// Insert detached nodes at the caret and move the caret after them.
    fn insert_at_caret(&mut self, nodes: &[NodeId]) -> Result<()> {
        let caret = self
            .selection
            .map(|s| s.start)
            .filter(|p| p.is_valid(&self.tree))
            .unwrap_or_else(|| Position::new(NodeId::ROOT, self.tree.node_length(NodeId::ROOT)));

        let (parent, index) = if self.tree.is_text(caret.node) {
            let parent = self.tree.parent(caret.node).unwrap_or(NodeId::ROOT);
            let index = self.tree.index_in_parent(caret.node).unwrap_or(0);
            if caret.offset == 0 {
                (parent, index)
            } else {
                if caret.offset < self.tree.node_length(caret.node) {
                    split_text(&mut self.tree, caret.node, caret.offset, &mut self.selection)?;
                }
                (parent, index + 1)
            }
        } else {
            (caret.node, caret.offset)
        };

        for (i, &node) in nodes.iter().enumerate() {
            self.tree.insert_at(parent, index + i, node)?;
        }
        self.selection = Some(Selection::caret(Position::new(parent, index + nodes.len())));
        Ok(())
    }
}

/// Remove the line breaks and blank text between two sibling blocks that
/// are about to become items of one list.
fn drop_separators(tree: &mut Tree, first: NodeId, second: NodeId) -> Result<()> {
    let mut between = Vec::new();
    let mut cursor = tree.next_sibling(first);
    while let Some(node) = cursor {
        if node == second {
            break;
        }
        let separator = tree.is_kind(node, TagKind::LineBreak)
            || tree.text(node).is_some_and(|t| t.trim().is_empty());
        if !separator {
            return Ok(());
        }
        between.push(node);
        cursor = tree.next_sibling(node);
    }
    for node in between {
        tree.detach(node)?;
    }
    Ok(())
}

/// Turn a list item back into a paragraph, splitting its list around it.
fn unlist(tree: &mut Tree, item: NodeId) -> Result<()> {
    let Some(list) = tree.parent(item) else {
        return Ok(());
    };
    let holder = split_before(tree, list, item)?;
    if let Some(next) = tree.next_sibling(item) {
        split_before(tree, holder, next)?;
    }
    tree.retag(item, TagKind::Paragraph, Vec::new())?;
    tree.unwrap(holder)
}

impl Surface for MemorySurface {
    fn tree(&self) -> &Tree {
        &self.tree
    }

    fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    fn selection(&self) -> Option<Selection> {
        self.selection
    }

    fn set_selection(&mut self, selection: Option<Selection>) {
        self.selection = selection;
    }

    fn set_editable(&mut self, editable: bool) {
        self.editable = editable;
        if !editable {
            self.focused = false;
        }
    }

    fn focus(&mut self) {
        self.focused = true;
        if self.selection.is_none() {
            let first_text = self.tree.traverse().find(|&id| self.tree.is_text(id));
            let caret = match first_text {
                Some(text) => Position::new(text, 0),
                None => Position::document_start(),
            };
            self.selection = Some(Selection::caret(caret));
        }
    }

    fn exec(&mut self, command: NativeCommand) -> Result<()> {
        tracing::trace!(target: "markwell::surface", ?command, "exec");
        match command {
            NativeCommand::Bold => self.toggle_inline(TagKind::Bold, Vec::new()),
            NativeCommand::Italic => self.toggle_inline(TagKind::Italic, Vec::new()),
            NativeCommand::Monospace(family) => self.toggle_inline(
                TagKind::MonospaceSpan,
                vec![
                    Attribute::new("class", MONOSPACE_CLASS),
                    Attribute::new("face", family),
                ],
            ),
            NativeCommand::InsertUnorderedList => self.toggle_list(TagKind::UnorderedList),
            NativeCommand::InsertOrderedList => self.toggle_list(TagKind::OrderedList),
            NativeCommand::CreateLink(url) => self.create_link(&url),
            NativeCommand::RemoveFormat => self.remove_format(),
        }
    }

    fn insert_fragment(&mut self, fragment: &Tree) -> Result<()> {
        self.delete_selection()?;
        let nodes = fragment
            .children(NodeId::ROOT)
            .map(|child| self.tree.import(fragment, child))
            .collect::<Result<Vec<_>>>()?;
        self.insert_at_caret(&nodes)
    }

    fn prompt(&mut self, message: &str, default: &str) -> Option<String> {
        let answer = self.answers.pop_front().flatten();
        tracing::debug!(target: "markwell::surface", message, default, ?answer, "prompt");
        answer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bold_toggles() {
        let mut surface = MemorySurface::from_html("<p>hello world</p>");
        assert!(surface.select_text("world"));

        surface.exec(NativeCommand::Bold).unwrap();
        assert_eq!(surface.html(), "<p>hello <b>world</b></p>");

        surface.exec(NativeCommand::Bold).unwrap();
        assert_eq!(surface.html(), "<p>hello world</p>");
    }

    #[test]
    fn test_monospace_carrier() {
        let mut surface = MemorySurface::from_html("<p>x = 1</p>");
        surface.select_all();
        surface.exec(NativeCommand::Monospace("monospace".into())).unwrap();
        assert_eq!(
            surface.html(),
            r#"<p><font class="markwell-code" face="monospace">x = 1</font></p>"#
        );
    }

    #[test]
    fn test_partial_unformat() {
        let mut surface = MemorySurface::from_html("<p><i>abcdef</i></p>");
        surface.select_text("cd");
        surface.exec(NativeCommand::Italic).unwrap();
        assert_eq!(surface.html(), "<p><i>ab</i>cd<i>ef</i></p>");
    }

    #[test]
    fn test_remove_format_keeps_links() {
        let mut surface = MemorySurface::from_html(r#"<p><b>a<i>b</i></b><a href="/">c</a></p>"#);
        surface.select_all();
        surface.exec(NativeCommand::RemoveFormat).unwrap();
        assert_eq!(surface.html(), r#"<p>ab<a href="/">c</a></p>"#);
    }

    #[test]
    fn test_list_toggle() {
        let mut surface = MemorySurface::from_html("<p>one</p><p>two</p>");
        surface.place_caret("two", 1);

        surface.exec(NativeCommand::InsertUnorderedList).unwrap();
        assert_eq!(surface.html(), "<p>one</p><ul><li>two</li></ul>");

        surface.exec(NativeCommand::InsertOrderedList).unwrap();
        assert_eq!(surface.html(), "<p>one</p><ol><li>two</li></ol>");

        surface.exec(NativeCommand::InsertOrderedList).unwrap();
        assert_eq!(surface.html(), "<p>one</p><p>two</p>");
    }

    #[test]
    fn test_list_over_bare_lines() {
        let mut surface = MemorySurface::from_html("first<br>second");
        surface.select_all();
        surface.exec(NativeCommand::InsertOrderedList).unwrap();
        assert_eq!(surface.html(), "<ol><li>first</li><li>second</li></ol>");
    }

    #[test]
    fn test_unlist_middle_item() {
        let mut surface = MemorySurface::from_html("<ul><li>a</li><li>b</li><li>c</li></ul>");
        surface.place_caret("b", 0);
        surface.exec(NativeCommand::InsertUnorderedList).unwrap();
        assert_eq!(
            surface.html(),
            "<ul><li>a</li></ul><p>b</p><ul><li>c</li></ul>"
        );
    }

    #[test]
    fn test_create_link() {
        let mut surface = MemorySurface::from_html("<p>see docs</p>");
        surface.select_text("docs");
        surface.exec(NativeCommand::CreateLink("https://example.com".into())).unwrap();
        assert_eq!(
            surface.html(),
            r#"<p>see <a href="https://example.com">docs</a></p>"#
        );

        surface.place_caret("see", 4);
        surface.exec(NativeCommand::CreateLink("/x".into())).unwrap();
        assert_eq!(
            surface.html(),
            r#"<p>see <a href="/x">/x</a><a href="https://example.com">docs</a></p>"#
        );
    }

    #[test]
    fn test_insert_fragment_replaces_selection() {
        let mut surface = MemorySurface::from_html("<p>hello world</p>");
        surface.select_text("world");
        let fragment = parse_fragment("<b>there</b>");

        surface.insert_fragment(&fragment).unwrap();

        assert_eq!(surface.html(), "<p>hello <b>there</b></p>");
        let caret = surface.selection().unwrap();
        assert!(caret.is_collapsed());
        assert_eq!(caret.start.offset, 2);
    }

    #[test]
    fn test_prompt_script() {
        let mut surface = MemorySurface::default();
        surface.answer_prompt(Some("http://a"));
        surface.answer_prompt(None);
        assert_eq!(surface.prompt("URL:", "http://"), Some("http://a".to_string()));
        assert_eq!(surface.prompt("URL:", "http://"), None);
        assert_eq!(surface.prompt("URL:", "http://"), None);
    }
}
