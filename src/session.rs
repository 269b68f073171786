//! Editing sessions.
//!
//! An [`Editor`] owns at most one active surface at a time together with
//! everything bound to it: the event listeners, the pending timers and the
//! cached command state. Activating another surface tears all of that down
//! first, so two sessions never overlap.
//!
//! Time is supplied by the host. Every entry point that can start a timer
//! takes `now`, and [`Editor::tick`] fires whatever has come due.
//!
//! ```
//! use markwell::{EditorConfig, Editor, MemorySurface};
//!
//! let surface = MemorySurface::from_html("<p>Hello <strong>World</strong></p>");
//! let mut editor = Editor::new();
//! editor.activate(surface, EditorConfig::default()).unwrap();
//!
//! // The live surface edits presentational markup...
//! assert_eq!(editor.surface().unwrap().html(), "<p>Hello <b>World</b></p>");
//! // ...while the output stays semantic.
//! assert_eq!(editor.content(), "<p>Hello <strong>World</strong></p>");
//! ```

use std::collections::BTreeMap;

use serde_json::Value;

use crate::command::{Command, CommandRegistry};
use crate::config::EditorConfig;
use crate::dom::{Attribute, MONOSPACE_CLASS, NodeId, Tag, TagKind, Tree, block_text, to_html};
use crate::error::Result;
use crate::events::{CHANGED, Event, EventBus, SubscriptionId};
use crate::normalize::{desemantify_in_place, semantify};
use crate::sanitize::{sanitize_html, strip_annotations};
use crate::schedule::{Debouncer, Scheduler, Time, TimerToken};
use crate::selection::{Position, Selection, preserve};
use crate::surface::Surface;

/// Keys the editor reacts to before the surface handles them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Backspace,
    Other,
}

/// What the host should do with a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDisposition {
    /// Let the surface handle the key.
    Default,
    /// Swallow the key.
    Suppress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Task {
    PasteGrace,
    Changed,
}

/// A paste waiting for the host to deliver its content.
#[derive(Debug)]
struct PendingPaste {
    token: TimerToken,
    /// Strong, emphasis or code was active where the paste started.
    ambient: bool,
    selection: Option<Selection>,
    buffer: String,
}

#[derive(Debug)]
struct Session<S> {
    surface: S,
    config: EditorConfig,
    registry: CommandRegistry,
    states: BTreeMap<Command, bool>,
    /// The surface shows the placeholder, not content.
    placeholder: bool,
    paste: Option<PendingPaste>,
    changes: Debouncer,
}

impl<S: Surface> Session<S> {
    fn refresh_states(&mut self) {
        self.states = self.registry.states(&self.surface);
    }

    /// The surface is reserved for a pending paste.
    fn is_pasting(&self) -> bool {
        self.paste.is_some()
    }

    fn is_blank(&self) -> bool {
        let tree = self.surface.tree();
        tree.text_content(NodeId::ROOT).trim().is_empty()
    }

    fn insert_placeholder(&mut self) -> Result<()> {
        if !self.is_blank() {
            return Ok(());
        }
        let text = self.config.placeholder_text.clone();
        let formatted = self.config.enable_formatting;

        let tree = self.surface.tree_mut();
        tree.clear_children(NodeId::ROOT)?;
        let content = tree.create_text(text);
        if formatted {
            let p = tree.create_element(TagKind::Paragraph, Vec::new());
            tree.append(p, content)?;
            tree.append(NodeId::ROOT, p)?;
        } else {
            tree.append(NodeId::ROOT, content)?;
        }
        self.surface.set_selection(None);
        self.placeholder = true;
        tracing::debug!(target: "markwell::session", "placeholder shown");
        Ok(())
    }

    fn remove_placeholder(&mut self) -> Result<()> {
        if !self.placeholder {
            return Ok(());
        }
        self.surface.tree_mut().clear_children(NodeId::ROOT)?;
        self.surface.set_selection(Some(Selection::caret(Position::document_start())));
        self.placeholder = false;
        tracing::debug!(target: "markwell::session", "placeholder removed");
        Ok(())
    }
}

/// Give every `font` element on the surface the monospace marker, so that
/// carriers created by the host outside of the code command count as code.
fn mark_code_carriers(tree: &mut Tree) -> Result<()> {
    let fonts: Vec<NodeId> = tree
        .traverse()
        .filter(|&id| matches!(tree.tag(id), Some(Tag::Unknown(name)) if name == "font"))
        .collect();

    for font in fonts {
        let mut attrs = tree.attrs(font).to_vec();
        match attrs.iter_mut().find(|a| a.name == "class") {
            Some(class) => class.value = format!("{} {MONOSPACE_CLASS}", class.value).trim().to_string(),
            None => attrs.push(Attribute::new("class", MONOSPACE_CLASS)),
        }
        tree.retag(font, TagKind::MonospaceSpan, attrs)?;
    }
    Ok(())
}

/// An editing session manager.
#[derive(Debug)]
pub struct Editor<S: Surface> {
    session: Option<Session<S>>,
    bus: EventBus,
    scheduler: Scheduler<Task>,
}

impl<S: Surface> Default for Editor<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Surface> Editor<S> {
    pub fn new() -> Self {
        Self {
            session: None,
            bus: EventBus::new(),
            scheduler: Scheduler::new(),
        }
    }

    /// Start editing `surface`.
    ///
    /// Any current session is deactivated first. The surface's content is
    /// converted to presentational markup, then the surface is focused, or
    /// shows the placeholder when `start_empty` is set.
    pub fn activate(&mut self, mut surface: S, config: EditorConfig) -> Result<()> {
        self.deactivate();

        surface.set_editable(true);
        let font = config.code_font_family.clone();
        preserve(&mut surface, |s| desemantify_in_place(s.tree_mut(), &font));

        let mut session = Session {
            surface,
            registry: CommandRegistry::new(config.code_font_family.clone()),
            changes: Debouncer::new(config.change_debounce),
            config,
            states: BTreeMap::new(),
            placeholder: false,
            paste: None,
        };
        if session.config.start_empty {
            session.insert_placeholder()?;
        } else {
            session.surface.focus();
        }
        session.refresh_states();

        tracing::debug!(
            target: "markwell::session",
            formatting = session.config.enable_formatting,
            multiline = session.config.multiline,
            "activated"
        );
        self.session = Some(session);
        Ok(())
    }

    /// End the current session and hand the surface back.
    ///
    /// Listeners and pending timers are dropped. Calling this without an
    /// active session does nothing.
    pub fn deactivate(&mut self) -> Option<S> {
        let mut session = self.session.take()?;
        session.surface.set_editable(false);
        self.bus.clear();
        self.scheduler.clear();
        tracing::debug!(target: "markwell::session", "deactivated");
        Some(session.surface)
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn surface(&self) -> Option<&S> {
        self.session.as_ref().map(|s| &s.surface)
    }

    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.session.as_mut().map(|s| &mut s.surface)
    }

    pub fn config(&self) -> Option<&EditorConfig> {
        self.session.as_ref().map(|s| &s.config)
    }

    /// The surface shows the placeholder.
    pub fn shows_placeholder(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.placeholder)
    }

    pub fn subscribe<F>(&mut self, name: &str, callback: F) -> SubscriptionId
    where
        F: FnMut(&Event) + 'static,
    {
        self.bus.subscribe(name, callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    pub fn notify(&mut self, name: &str, args: Vec<Value>) {
        self.bus.notify(name, args);
    }

    /// Earliest time [`tick`](Self::tick) has work to do.
    pub fn next_deadline(&self) -> Option<Time> {
        self.scheduler.next_deadline()
    }

    /// Key pressed, before the surface sees it.
    pub fn key_down(&mut self, key: Key) -> KeyDisposition {
        let Some(session) = self.session.as_ref() else {
            return KeyDisposition::Default;
        };
        match key {
            Key::Enter if !session.config.multiline => KeyDisposition::Suppress,
            Key::Backspace if session.is_blank() => {
                // Keep the last empty block so typing has somewhere to go
                let tree = session.surface.tree();
                let blocks = tree
                    .traverse()
                    .filter(|&id| tree.is_kind(id, TagKind::Paragraph) || tree.is_kind(id, TagKind::ListItem))
                    .count();
                if blocks == 1 {
                    KeyDisposition::Suppress
                } else {
                    KeyDisposition::Default
                }
            }
            _ => KeyDisposition::Default,
        }
    }

    /// Key released: the surface has applied the key.
    pub fn key_up(&mut self, now: Time) -> Result<()> {
        let Some(session) = self.session.as_mut() else {
            return Ok(());
        };
        session.refresh_states();
        if !session.is_pasting() {
            preserve(&mut session.surface, |s| mark_code_carriers(s.tree_mut()))?;
        }
        session.changes.trigger(&mut self.scheduler, now, Task::Changed);
        Ok(())
    }

    /// The surface gained focus. The placeholder stays while a paste is
    /// pending; completing the paste removes it.
    pub fn focus(&mut self) -> Result<()> {
        match self.session.as_mut() {
            Some(session) if !session.is_pasting() => session.remove_placeholder(),
            _ => Ok(()),
        }
    }

    /// The surface lost focus.
    pub fn blur(&mut self) -> Result<()> {
        match self.session.as_mut() {
            Some(session) if !session.is_pasting() => session.insert_placeholder(),
            _ => Ok(()),
        }
    }

    /// The user clicked into the surface; the selection may have moved.
    pub fn click(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.refresh_states();
        }
    }

    /// A paste started. The host now collects the clipboard content and
    /// hands it over through [`capture`](Self::capture) within the grace
    /// period.
    pub fn begin_paste(&mut self, now: Time) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if let Some(previous) = session.paste.take() {
            self.scheduler.cancel(previous.token);
        }

        let ambient = [Command::Strong, Command::Emphasis, Command::Code]
            .into_iter()
            .any(|c| session.registry.is_active(&session.surface, c));
        let token = self
            .scheduler
            .schedule(now.saturating_add(session.config.paste_grace), Task::PasteGrace);
        session.paste = Some(PendingPaste {
            token,
            ambient,
            selection: session.surface.selection(),
            buffer: String::new(),
        });
        tracing::debug!(target: "markwell::session", ambient, "paste pending");
    }

    /// Pasted HTML delivered by the host. Returns false when no paste is
    /// pending.
    pub fn capture(&mut self, html: &str) -> bool {
        match self.session.as_mut().and_then(|s| s.paste.as_mut()) {
            Some(paste) => {
                paste.buffer.push_str(html);
                true
            }
            None => false,
        }
    }

    /// A paste is waiting for its grace period to end.
    pub fn is_paste_pending(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.paste.is_some())
    }

    /// Fire every timer due at `now`.
    pub fn tick(&mut self, now: Time) -> Result<()> {
        for (token, task) in self.scheduler.due(now) {
            match task {
                Task::PasteGrace => self.finish_paste(token, now)?,
                Task::Changed => {
                    let settled = self.session.as_mut().is_some_and(|s| s.changes.settle(token));
                    if settled {
                        self.bus.notify(CHANGED, Vec::new());
                    }
                }
            }
        }
        Ok(())
    }

    fn finish_paste(&mut self, token: TimerToken, now: Time) -> Result<()> {
        let Some(session) = self.session.as_mut() else {
            return Ok(());
        };
        let Some(paste) = session.paste.take_if(|p| p.token == token) else {
            return Ok(());
        };

        session.surface.set_selection(paste.selection);
        session.surface.focus();
        session.remove_placeholder()?;

        let mut fragment = sanitize_html(&paste.buffer, &session.config.allow_list);
        desemantify_in_place(&mut fragment, &session.config.code_font_family);
        if paste.ambient {
            strip_annotations(&mut fragment);
        }
        session.surface.insert_fragment(&fragment)?;
        tracing::debug!(target: "markwell::session", bytes = paste.buffer.len(), "paste inserted");

        session.refresh_states();
        session.changes.trigger(&mut self.scheduler, now, Task::Changed);
        Ok(())
    }

    /// Run a command at the current selection.
    ///
    /// Ignored without an active session, while a paste is pending, and
    /// when formatting is disabled.
    pub fn invoke_command(&mut self, command: Command, now: Time) -> Result<()> {
        self.edit(now, |registry, surface| registry.invoke(surface, command))
    }

    /// Turn off emphasis, strong, code and headings at the selection.
    pub fn remove_format(&mut self, now: Time) -> Result<()> {
        self.edit(now, |registry, surface| registry.remove_format(surface))
    }

    fn edit<F>(&mut self, now: Time, apply: F) -> Result<()>
    where
        F: FnOnce(&CommandRegistry, &mut S) -> Result<()>,
    {
        let Some(session) = self.session.as_mut() else {
            return Ok(());
        };
        if session.paste.is_some() || !session.config.enable_formatting {
            tracing::debug!(target: "markwell::session", "command ignored");
            return Ok(());
        }

        let registry = &session.registry;
        preserve(&mut session.surface, |s| apply(registry, s))?;
        session.refresh_states();
        session.changes.trigger(&mut self.scheduler, now, Task::Changed);
        Ok(())
    }

    /// Active state of `command` as of the last refresh.
    pub fn command_state(&self, command: Command) -> bool {
        self.session
            .as_ref()
            .and_then(|s| s.states.get(&command).copied())
            .unwrap_or(false)
    }

    pub fn command_states(&self) -> BTreeMap<Command, bool> {
        self.session
            .as_ref()
            .map(|s| s.states.clone())
            .unwrap_or_default()
    }

    /// The semantic form of the content. Empty while the placeholder shows.
    pub fn semantic_output(&self) -> Tree {
        match self.session.as_ref() {
            Some(session) if !session.placeholder => semantify(session.surface.tree()),
            _ => Tree::new(),
        }
    }

    /// Content for saving: semantic HTML, or plain text when formatting is
    /// disabled.
    pub fn content(&self) -> String {
        let Some(session) = self.session.as_ref() else {
            return String::new();
        };
        if session.placeholder {
            return String::new();
        }
        if session.config.enable_formatting {
            let output = self.semantic_output();
            return to_html(&output, NodeId::ROOT);
        }
        let tree = session.surface.tree();
        if session.config.multiline {
            block_text(tree, NodeId::ROOT)
        } else {
            tree.text_content(NodeId::ROOT).trim().to_string()
        }
    }

    /// Content without any markup.
    pub fn plain_text(&self) -> String {
        match self.session.as_ref() {
            Some(session) if session.config.enable_formatting => {
                self.semantic_output().text_content(NodeId::ROOT)
            }
            _ => self.content(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{Group, is_exclusive};
    use crate::surface::MemorySurface;
    use std::cell::Cell;
    use std::rc::Rc;

    fn config() -> EditorConfig {
        EditorConfig {
            code_font_family: "monospace".to_string(),
            ..EditorConfig::default()
        }
    }

    fn editor(html: &str, config: EditorConfig) -> Editor<MemorySurface> {
        let mut editor = Editor::new();
        editor.activate(MemorySurface::from_html(html), config).unwrap();
        editor
    }

    fn live_html(editor: &Editor<MemorySurface>) -> String {
        editor.surface().unwrap().html()
    }

    #[test]
    fn test_activate_desemantifies() {
        let editor = editor("<p>hi <strong>there</strong> <code>x</code></p>", config());
        let surface = editor.surface().unwrap();

        assert!(surface.is_editable());
        assert!(surface.is_focused());
        assert!(surface.html().contains("<b>there</b>"));
        assert_eq!(editor.content(), "<p>hi <strong>there</strong> <code>x</code></p>");
        assert_eq!(editor.plain_text(), "hi there x");
    }

    #[test]
    fn test_placeholder_cycle() {
        let mut editor = editor("", EditorConfig { start_empty: true, ..config() });
        assert!(editor.shows_placeholder());
        assert_eq!(live_html(&editor), "<p>Enter Text</p>");
        assert_eq!(editor.content(), "");
        assert!(editor.semantic_output().children(NodeId::ROOT).next().is_none());

        editor.focus().unwrap();
        assert!(!editor.shows_placeholder());
        assert_eq!(live_html(&editor), "");

        editor.blur().unwrap();
        assert!(editor.shows_placeholder());
    }

    #[test]
    fn test_plain_placeholder() {
        let config = EditorConfig {
            start_empty: true,
            enable_formatting: false,
            placeholder_text: "Title".to_string(),
            ..config()
        };
        let editor = editor("", config);
        assert_eq!(live_html(&editor), "Title");
        assert_eq!(editor.plain_text(), "");
    }

    #[test]
    fn test_blur_keeps_content() {
        let mut editor = editor("<p>text</p>", config());
        editor.blur().unwrap();
        assert!(!editor.shows_placeholder());
        assert_eq!(editor.content(), "<p>text</p>");
    }

    #[test]
    fn test_key_down() {
        let mut single = editor("<p>x</p>", EditorConfig { multiline: false, ..config() });
        assert_eq!(single.key_down(Key::Enter), KeyDisposition::Suppress);
        assert_eq!(single.key_down(Key::Backspace), KeyDisposition::Default);

        let mut empty = editor("<p></p>", config());
        assert_eq!(empty.key_down(Key::Enter), KeyDisposition::Default);
        assert_eq!(empty.key_down(Key::Backspace), KeyDisposition::Suppress);
        assert_eq!(empty.key_down(Key::Other), KeyDisposition::Default);
    }

    #[test]
    fn test_key_up_marks_fonts() {
        let mut editor = editor(r#"<p><font face="Courier">x</font></p>"#, config());
        assert_eq!(editor.content(), "<p>x</p>");

        editor.key_up(0).unwrap();
        assert_eq!(editor.content(), "<p><code>x</code></p>");
    }

    #[test]
    fn test_changed_is_debounced() {
        let mut editor = editor("<p>x</p>", config());
        let fired = Rc::new(Cell::new(0));
        let counter = fired.clone();
        editor.subscribe(CHANGED, move |_| counter.set(counter.get() + 1));

        editor.key_up(0).unwrap();
        editor.key_up(100).unwrap();
        editor.tick(250).unwrap();
        assert_eq!(fired.get(), 0);
        assert_eq!(editor.next_deadline(), Some(300));

        editor.tick(300).unwrap();
        assert_eq!(fired.get(), 1);
        editor.tick(1000).unwrap();
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn test_paste_after_grace() {
        let mut editor = editor("<p>hello world</p>", config());
        editor.surface_mut().unwrap().select_text("world");

        editor.begin_paste(100);
        assert!(editor.capture(r#"<div onclick="x"><strong>big</strong><script>evil()</script></div>"#));
        editor.tick(105).unwrap();
        assert!(editor.is_paste_pending());
        assert_eq!(live_html(&editor), "<p>hello world</p>");

        editor.tick(110).unwrap();
        assert!(!editor.is_paste_pending());
        assert_eq!(live_html(&editor), "<p>hello <b>big</b></p>");
        assert_eq!(editor.content(), "<p>hello <strong>big</strong></p>");
        assert_eq!(editor.next_deadline(), Some(310));
    }

    #[test]
    fn test_paste_into_ambient_format() {
        let mut editor = editor("<p><b>bold</b></p>", config());
        editor.surface_mut().unwrap().place_caret("bold", 2);

        editor.begin_paste(0);
        editor.capture("<b>more</b>");
        editor.tick(10).unwrap();

        assert_eq!(editor.content(), "<p><strong>bomoreld</strong></p>");
    }

    #[test]
    fn test_block_paste_into_ambient_format() {
        let mut editor = editor("<p><b>bold</b></p>", config());
        editor.surface_mut().unwrap().place_caret("bold", 2);

        editor.begin_paste(0);
        editor.capture("<p><b>more</b> <i>text</i></p>");
        editor.tick(10).unwrap();

        let tree = editor.surface().unwrap().tree();
        assert!(is_exclusive(tree, Group::Formatting));
        assert_eq!(live_html(&editor), "<p><b>bo<p>more text</p>ld</b></p>");
    }

    #[test]
    fn test_no_mutation_while_paste_pending() {
        let mut pasting = editor(r#"<p><font face="Courier">x</font></p>"#, config());
        pasting.surface_mut().unwrap().place_caret("x", 1);

        pasting.begin_paste(0);
        pasting.key_up(1).unwrap();
        assert_eq!(live_html(&pasting), r#"<p><font face="Courier">x</font></p>"#);

        let mut empty = editor("", EditorConfig { start_empty: true, ..config() });
        empty.begin_paste(0);
        empty.focus().unwrap();
        assert!(empty.shows_placeholder());
        assert_eq!(live_html(&empty), "<p>Enter Text</p>");

        empty.tick(10).unwrap();
        assert!(!empty.shows_placeholder());
        empty.blur().unwrap();
        assert!(empty.shows_placeholder());
    }

    #[test]
    fn test_block_command_after_placeholder() {
        let mut heading = editor("", EditorConfig { start_empty: true, ..config() });
        heading.focus().unwrap();
        heading.invoke_command(Command::Heading1, 0).unwrap();
        assert_eq!(live_html(&heading), "<h1></h1>");
        assert!(heading.command_state(Command::Heading1));

        let mut list = editor("", EditorConfig { start_empty: true, ..config() });
        list.focus().unwrap();
        list.invoke_command(Command::UnorderedList, 0).unwrap();
        assert_eq!(live_html(&list), "<ul><li></li></ul>");
        assert!(list.command_state(Command::UnorderedList));
    }

    #[test]
    fn test_commands_wait_for_paste() {
        let mut editor = editor("<p>word</p>", config());
        editor.surface_mut().unwrap().select_text("word");

        editor.begin_paste(0);
        editor.invoke_command(Command::Strong, 1).unwrap();
        assert_eq!(live_html(&editor), "<p>word</p>");
        assert!(editor.is_paste_pending());
    }

    #[test]
    fn test_invoke_command() {
        let mut editor = editor("<p>word</p>", config());
        editor.surface_mut().unwrap().select_text("word");

        editor.invoke_command(Command::Emphasis, 0).unwrap();
        assert!(editor.command_state(Command::Emphasis));
        editor.invoke_command(Command::Code, 0).unwrap();
        assert!(editor.command_state(Command::Code));
        assert!(!editor.command_state(Command::Emphasis));
        assert_eq!(editor.content(), "<p><code>word</code></p>");

        editor.remove_format(0).unwrap();
        assert_eq!(editor.content(), "<p>word</p>");
        assert!(editor.command_states().values().all(|active| !active));

        // The selection survived every rewrite
        let selection = editor.surface().unwrap().selection().unwrap();
        let tree = editor.surface().unwrap().tree();
        assert_eq!(tree.text(selection.start.node), Some("word"));
    }

    #[test]
    fn test_formatting_disabled() {
        let mut editor = editor("<p>word</p>", EditorConfig { enable_formatting: false, ..config() });
        editor.surface_mut().unwrap().select_text("word");
        editor.invoke_command(Command::Strong, 0).unwrap();
        assert_eq!(live_html(&editor), "<p>word</p>");
        assert_eq!(editor.content(), "word");
    }

    #[test]
    fn test_plain_multiline_content() {
        let config = EditorConfig { enable_formatting: false, ..config() };
        let multi = editor("<div>one</div><div>two</div>", config.clone());
        assert_eq!(multi.content(), "one\ntwo");

        let single = editor("<div>one</div><div>two</div>", EditorConfig { multiline: false, ..config });
        assert_eq!(single.content(), "onetwo");
    }

    #[test]
    fn test_deactivate_tears_down() {
        let mut editor = editor("<p>x</p>", config());
        let fired = Rc::new(Cell::new(0));
        let counter = fired.clone();
        editor.subscribe(CHANGED, move |_| counter.set(counter.get() + 1));
        editor.key_up(0).unwrap();

        let surface = editor.deactivate().unwrap();
        assert!(!surface.is_editable());
        assert!(editor.deactivate().is_none());
        assert_eq!(editor.next_deadline(), None);

        editor.activate(surface, config()).unwrap();
        editor.notify(CHANGED, Vec::new());
        editor.tick(1000).unwrap();
        assert_eq!(fired.get(), 0);
    }
}
