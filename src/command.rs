//! Formatting commands and their state.
//!
//! Commands read their state from the live (presentational) tree and change
//! it through the surface's native primitives. Emphasis, strong, code and
//! the heading levels form one exclusivity group: turning any of them on
//! first turns off the others.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dom::{Annotation, NodeId, TagKind, Tree};
use crate::error::{Error, Result};
use crate::selection::{Selection, covered_text, focus_node};
use crate::surface::range::{ensure_line_block, line_block};
use crate::surface::{NativeCommand, Surface};

/// A formatting command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    Heading1,
    Heading2,
    Heading3,
    Emphasis,
    Strong,
    Code,
    Link,
    UnorderedList,
    OrderedList,
}

/// How a command is invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// Has an active state; invoking flips it.
    Toggle,
    /// Runs once, no state.
    Immediate,
}

impl Command {
    pub const ALL: [Command; 9] = [
        Command::Heading1,
        Command::Heading2,
        Command::Heading3,
        Command::Emphasis,
        Command::Strong,
        Command::Code,
        Command::Link,
        Command::UnorderedList,
        Command::OrderedList,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Command::Heading1 => "heading1",
            Command::Heading2 => "heading2",
            Command::Heading3 => "heading3",
            Command::Emphasis => "emphasis",
            Command::Strong => "strong",
            Command::Code => "code",
            Command::Link => "link",
            Command::UnorderedList => "unordered_list",
            Command::OrderedList => "ordered_list",
        }
    }

    pub fn kind(self) -> CommandKind {
        match self {
            Command::Link => CommandKind::Immediate,
            _ => CommandKind::Toggle,
        }
    }

    /// Member of the formatting exclusivity group.
    pub fn is_exclusive(self) -> bool {
        self.heading_level().is_some() || self.annotation().is_some()
    }

    fn heading_level(self) -> Option<u8> {
        match self {
            Command::Heading1 => Some(1),
            Command::Heading2 => Some(2),
            Command::Heading3 => Some(3),
            _ => None,
        }
    }

    /// Inline annotation toggled by this command.
    fn annotation(self) -> Option<Annotation> {
        match self {
            Command::Emphasis => Some(Annotation::Emphasis),
            Command::Strong => Some(Annotation::Strong),
            Command::Code => Some(Annotation::Code),
            _ => None,
        }
    }

    fn list_kind(self) -> Option<TagKind> {
        match self {
            Command::UnorderedList => Some(TagKind::UnorderedList),
            Command::OrderedList => Some(TagKind::OrderedList),
            _ => None,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Command {
    type Err = Error;

    /// Accepts the command names and the short HTML-style aliases
    /// (`h1`, `em`, `ul`, ...).
    fn from_str(s: &str) -> Result<Self> {
        let alias = match s {
            "h1" => Some(Command::Heading1),
            "h2" => Some(Command::Heading2),
            "h3" => Some(Command::Heading3),
            "em" => Some(Command::Emphasis),
            "a" => Some(Command::Link),
            "ul" => Some(Command::UnorderedList),
            "ol" => Some(Command::OrderedList),
            _ => None,
        };
        alias
            .or_else(|| Command::ALL.into_iter().find(|c| c.name() == s))
            .ok_or_else(|| Error::Config(format!("unknown command `{s}`")))
    }
}

/// Resolves command state and applies commands to a surface.
#[derive(Debug, Clone)]
pub struct CommandRegistry {
    code_font_family: String,
}

impl CommandRegistry {
    pub fn new(code_font_family: impl Into<String>) -> Self {
        Self {
            code_font_family: code_font_family.into(),
        }
    }

    /// Whether `command` is active at the selection.
    ///
    /// Never fails: a missing or detached selection reads as inactive.
    pub fn is_active<S: Surface + ?Sized>(&self, surface: &S, command: Command) -> bool {
        match query(surface.tree(), surface.selection(), command) {
            Ok(active) => active,
            Err(err) => {
                tracing::warn!(target: "markwell::command", %command, %err, "treating as inactive");
                false
            }
        }
    }

    /// Active state of every command.
    pub fn states<S: Surface + ?Sized>(&self, surface: &S) -> BTreeMap<Command, bool> {
        Command::ALL
            .into_iter()
            .map(|c| (c, self.is_active(surface, c)))
            .collect()
    }

    /// Run a command: immediates run, toggles flip.
    pub fn invoke<S: Surface + ?Sized>(&self, surface: &mut S, command: Command) -> Result<()> {
        tracing::debug!(target: "markwell::command", %command, "invoke");
        match command.kind() {
            CommandKind::Immediate => self.create_link(surface),
            CommandKind::Toggle if self.is_active(surface, command) => self.toggle_off(surface, command),
            CommandKind::Toggle => self.toggle_on(surface, command),
        }
    }

    pub fn toggle_on<S: Surface + ?Sized>(&self, surface: &mut S, command: Command) -> Result<()> {
        if command.is_exclusive() {
            self.remove_format(surface)?;
        }
        if let Some(level) = command.heading_level() {
            return set_heading(surface, Some(level));
        }
        match self.native(command) {
            Some(native) => surface.exec(native),
            None => Ok(()),
        }
    }

    pub fn toggle_off<S: Surface + ?Sized>(&self, surface: &mut S, command: Command) -> Result<()> {
        if command.heading_level().is_some() {
            return set_heading(surface, None);
        }
        match self.native(command) {
            Some(native) => surface.exec(native),
            None => Ok(()),
        }
    }

    /// Turn off every active member of the exclusivity group.
    ///
    /// Inline formats are stripped from the whole selection, not just where
    /// they are active, so no partial format survives underneath the next
    /// one.
    pub fn remove_format<S: Surface + ?Sized>(&self, surface: &mut S) -> Result<()> {
        surface.exec(NativeCommand::RemoveFormat)?;
        for command in Command::ALL {
            if command.is_exclusive() && self.is_active(surface, command) {
                self.toggle_off(surface, command)?;
            }
        }
        Ok(())
    }

    /// Ask for a target and link the selection to it.
    fn create_link<S: Surface + ?Sized>(&self, surface: &mut S) -> Result<()> {
        self.remove_format(surface)?;
        match surface.prompt("URL:", "http://") {
            Some(url) if !url.trim().is_empty() => surface.exec(NativeCommand::CreateLink(url)),
            _ => {
                tracing::debug!(target: "markwell::command", "link prompt dismissed");
                Ok(())
            }
        }
    }

    fn native(&self, command: Command) -> Option<NativeCommand> {
        match command {
            Command::Emphasis => Some(NativeCommand::Italic),
            Command::Strong => Some(NativeCommand::Bold),
            Command::Code => Some(NativeCommand::Monospace(self.code_font_family.clone())),
            Command::UnorderedList => Some(NativeCommand::InsertUnorderedList),
            Command::OrderedList => Some(NativeCommand::InsertOrderedList),
            Command::Heading1 | Command::Heading2 | Command::Heading3 | Command::Link => None,
        }
    }
}

/// Resolve a command's state on the live tree.
pub fn query(tree: &Tree, selection: Option<Selection>, command: Command) -> Result<bool> {
    let selection =
        selection.ok_or_else(|| Error::CommandQueryFailure("no selection".into()))?;
    let focus = focus_node(tree, selection)
        .ok_or_else(|| Error::CommandQueryFailure("selection is detached".into()))?;

    if let Some(level) = command.heading_level() {
        let block = line_block(tree, focus);
        return Ok(block.and_then(|b| tree.kind(b)).and_then(TagKind::heading_level) == Some(level));
    }

    if let Some(annotation) = command.annotation() {
        let annotated = |id: NodeId| {
            std::iter::once(id)
                .chain(tree.ancestors(id))
                .any(|a| tree.kind(a).and_then(TagKind::annotation) == Some(annotation))
        };
        let covered = covered_text(tree, selection);
        if covered.is_empty() {
            return Ok(annotated(focus));
        }
        return Ok(covered.into_iter().all(annotated));
    }

    if let Some(list) = command.list_kind() {
        let item = std::iter::once(focus)
            .chain(tree.ancestors(focus))
            .find(|&a| tree.is_kind(a, TagKind::ListItem));
        return Ok(item.and_then(|i| tree.parent(i)).is_some_and(|p| tree.is_kind(p, list)));
    }

    Ok(false)
}

/// Make the line block at the selection a heading (or a paragraph again).
///
/// The block element is replaced; the text inside keeps its identity so
/// the selection survives.
fn set_heading<S: Surface + ?Sized>(surface: &mut S, level: Option<u8>) -> Result<()> {
    let Some(selection) = surface.selection() else {
        return Ok(());
    };
    let Some(focus) = focus_node(surface.tree(), selection) else {
        return Ok(());
    };
    let target = match level {
        Some(level) => TagKind::heading(level).unwrap_or(TagKind::Heading1),
        None => TagKind::Paragraph,
    };

    let tree = surface.tree_mut();
    let block = ensure_line_block(tree, focus)?;
    if tree.is_kind(block, target) {
        return Ok(());
    }
    if tree.is_kind(block, TagKind::ListItem) {
        // Keep the list; the heading goes inside the item
        if level.is_some() {
            let first = tree.first_child(block);
            let last = tree.last_child(block);
            if let (Some(first), Some(last)) = (first, last) {
                tree.wrap_run(first, last, target, Vec::new())?;
            }
        }
        return Ok(());
    }
    tree.retag(block, target, Vec::new())?;
    Ok(())
}
