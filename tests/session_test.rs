//! Editing session tests: commands, paste and change notifications driven
//! through an in-memory surface.

use std::cell::RefCell;
use std::rc::Rc;

use markwell::events::{CHANGED, WILDCARD};
use markwell::selection::covered_text;
use markwell::{Command, Editor, EditorConfig, MemorySurface, Position, Selection, Surface};

fn start(html: &str) -> Editor<MemorySurface> {
    let mut editor = Editor::new();
    editor
        .activate(MemorySurface::from_html(html), EditorConfig::default())
        .expect("activation failed");
    editor
}

fn record(editor: &mut Editor<MemorySurface>, name: &str) -> Rc<RefCell<Vec<String>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    editor.subscribe(name, move |event| sink.borrow_mut().push(event.name.clone()));
    seen
}

// ============================================================================
// Commands
// ============================================================================

#[test]
fn test_strong_over_emphasis() {
    let mut editor = start("<p>some <em>text</em></p>");
    editor.surface_mut().unwrap().select_text("text");
    assert!(editor.command_states().get(&Command::Emphasis).is_some());

    editor.click();
    assert!(editor.command_state(Command::Emphasis));

    editor.invoke_command(Command::Strong, 0).unwrap();

    assert_eq!(editor.content(), "<p>some <strong>text</strong></p>");
    assert!(editor.command_state(Command::Strong));
    assert!(!editor.command_state(Command::Emphasis));
}

#[test]
fn test_heading_then_list() {
    let mut editor = start("<p>title</p><p>item</p>");
    editor.surface_mut().unwrap().place_caret("title", 0);
    editor.invoke_command(Command::Heading1, 0).unwrap();

    editor.surface_mut().unwrap().place_caret("item", 0);
    editor.click();
    assert!(!editor.command_state(Command::Heading1));
    editor.invoke_command(Command::UnorderedList, 0).unwrap();

    assert_eq!(editor.content(), "<h1>title</h1><ul><li>item</li></ul>");
    assert!(editor.command_state(Command::UnorderedList));
}

#[test]
fn test_block_commands_from_document_start() {
    let mut editor = start("<p>title</p><p>body</p>");
    editor
        .surface_mut()
        .unwrap()
        .set_selection(Some(Selection::caret(Position::document_start())));

    editor.invoke_command(Command::Heading2, 0).unwrap();
    assert_eq!(editor.content(), "<h2>title</h2><p>body</p>");
    assert!(editor.command_state(Command::Heading2));

    editor.invoke_command(Command::Heading2, 0).unwrap();
    editor.invoke_command(Command::OrderedList, 0).unwrap();
    assert_eq!(editor.content(), "<ol><li>title</li></ol><p>body</p>");
}

#[test]
fn test_link_uses_prompt_answer() {
    let mut editor = start("<p>read the <em>manual</em></p>");
    let surface = editor.surface_mut().unwrap();
    surface.select_text("manual");
    surface.answer_prompt(Some("https://example.com/manual"));

    editor.invoke_command(Command::Link, 0).unwrap();

    assert_eq!(
        editor.content(),
        r#"<p>read the <a href="https://example.com/manual">manual</a></p>"#
    );
}

#[test]
fn test_selection_survives_heading_swap() {
    let mut editor = start("<p>keep me</p>");
    editor.surface_mut().unwrap().select_text("me");
    editor.invoke_command(Command::Heading2, 0).unwrap();
    editor.invoke_command(Command::Heading3, 0).unwrap();

    // The selected word was split off its text node but is still selected
    let surface = editor.surface().unwrap();
    let tree = surface.tree();
    let covered = covered_text(tree, surface.selection().unwrap());
    let text: Vec<_> = covered.iter().filter_map(|&id| tree.text(id)).collect();
    assert_eq!(text, vec!["me"]);
    assert_eq!(editor.content(), "<h3>keep me</h3>");
}

// ============================================================================
// Change notifications
// ============================================================================

#[test]
fn test_rapid_edits_fire_once() {
    let mut editor = start("<p>typing</p>");
    let seen = record(&mut editor, CHANGED);

    for now in [0, 10, 20, 30, 40] {
        editor.key_up(now).unwrap();
        editor.tick(now).unwrap();
    }
    editor.tick(239).unwrap();
    assert!(seen.borrow().is_empty());

    editor.tick(240).unwrap();
    assert_eq!(seen.borrow().len(), 1);

    editor.tick(10_000).unwrap();
    assert_eq!(seen.borrow().len(), 1);
}

#[test]
fn test_wildcard_listener() {
    let mut editor = start("<p>x</p>");
    let all = record(&mut editor, WILDCARD);
    let changed = record(&mut editor, CHANGED);

    editor.notify("saved", vec![serde_json::json!(42)]);
    editor.key_up(0).unwrap();
    editor.tick(200).unwrap();

    assert_eq!(*all.borrow(), vec!["saved".to_string(), CHANGED.to_string()]);
    assert_eq!(*changed.borrow(), vec![CHANGED.to_string()]);
}

#[test]
fn test_unsubscribe() {
    let mut editor = start("<p>x</p>");
    let seen = Rc::new(RefCell::new(0));
    let sink = seen.clone();
    let id = editor.subscribe(CHANGED, move |_| *sink.borrow_mut() += 1);

    assert!(editor.unsubscribe(id));
    assert!(!editor.unsubscribe(id));
    editor.notify(CHANGED, Vec::new());
    assert_eq!(*seen.borrow(), 0);
}

// ============================================================================
// Paste
// ============================================================================

#[test]
fn test_paste_round_trip() {
    let mut editor = start("<p>before after</p>");
    let seen = record(&mut editor, CHANGED);
    editor.surface_mut().unwrap().place_caret("before after", 7);

    editor.begin_paste(0);
    editor.capture(r#"<span style="color:red">pasted <code>code</code> </span>"#);
    editor.tick(10).unwrap();

    assert_eq!(
        editor.content(),
        "<p>before pasted <code>code</code> after</p>"
    );
    editor.tick(210).unwrap();
    assert_eq!(seen.borrow().len(), 1);
}

#[test]
fn test_paste_clears_placeholder() {
    let config = EditorConfig {
        start_empty: true,
        ..EditorConfig::default()
    };
    let mut editor = Editor::new();
    editor.activate(MemorySurface::default(), config).unwrap();
    assert!(editor.shows_placeholder());

    editor.begin_paste(0);
    editor.capture("<p>fresh</p>");
    editor.tick(10).unwrap();

    assert!(!editor.shows_placeholder());
    assert_eq!(editor.content(), "<p>fresh</p>");
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn test_handover_tears_down_listeners() {
    let mut editor = start("<p>first</p>");
    let seen = record(&mut editor, CHANGED);
    editor.key_up(0).unwrap();

    editor
        .activate(MemorySurface::from_html("<p>second</p>"), EditorConfig::default())
        .unwrap();
    editor.key_up(0).unwrap();
    editor.tick(1_000).unwrap();

    assert!(seen.borrow().is_empty());
    assert_eq!(editor.content(), "<p>second</p>");
}

#[test]
fn test_deactivate_without_session() {
    let mut editor: Editor<MemorySurface> = Editor::new();
    assert!(editor.deactivate().is_none());
    assert_eq!(editor.content(), "");
    assert!(!editor.command_state(Command::Strong));
    editor.invoke_command(Command::Strong, 0).unwrap();
    editor.tick(100).unwrap();
}

#[test]
fn test_config_from_file_drives_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("editor.json");
    std::fs::write(&path, r#"{"multiline": false, "enable_formatting": false}"#).unwrap();

    let config = EditorConfig::from_json_file(&path).unwrap();
    let mut editor = Editor::new();
    editor
        .activate(MemorySurface::from_html("<div>one</div><div>two</div>"), config)
        .unwrap();

    assert_eq!(editor.key_down(markwell::Key::Enter), markwell::KeyDisposition::Suppress);
    assert_eq!(editor.content(), "onetwo");
}
