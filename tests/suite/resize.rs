//! Terminal resizes resume the active view without losing state.

use crossterm::event::{Event, KeyCode};

use pst_config::ConfigStore;
use pst_engine::views::FieldValue;
use pst_engine::{App, CONFIG_VIEW, MAIN_VIEW, Termination, View, ViewRegistry};
use pst_tui::supervise;

use crate::common::{ScriptedScreen, chr, ctrl, key, load, seeded_config};

const SEED: &str = r#"{"a": "1", "b": true, "main_frame_name": "main"}"#;

#[test]
fn resize_resumes_same_view_with_unsaved_edits() {
    let (_dir, path) = seeded_config(SEED);
    let mut app = App::new(load(&path), ViewRegistry::builtin()).expect("app");
    let keys_before = app.store().keys();
    let mut screen = ScriptedScreen::new([
        key(KeyCode::Down),
        key(KeyCode::Enter),
        chr('z'),
        Event::Resize(80, 24),
        ctrl('q'),
    ]);

    assert_eq!(
        supervise(&mut screen, &mut app),
        Ok(Termination::UserRequested)
    );

    assert_eq!(screen.reopened(), 1);
    assert_eq!(screen.size(), (80, 24));
    assert!(screen.last_frame().contains("Configuration [pst]"));

    assert_eq!(app.current_view_name(), CONFIG_VIEW);
    let View::ConfigEditor(editor) = app.view() else {
        panic!("expected config editor");
    };
    assert!(editor.is_dirty());
    let FieldValue::Text(input) = editor.field("a").expect("field a").value() else {
        panic!("expected text field");
    };
    assert_eq!(input.text(), "1z");

    assert_eq!(app.store().keys(), keys_before);
    let on_disk = ConfigStore::load(&path, None).expect("reload");
    assert_eq!(on_disk.get_str("a", ""), "1", "unsaved edits stay in memory");
}

#[test]
fn repeated_resizes_on_main_keep_selection() {
    let (_dir, path) = seeded_config(SEED);
    let mut app = App::new(load(&path), ViewRegistry::builtin()).expect("app");
    let mut screen = ScriptedScreen::new([
        key(KeyCode::Down),
        Event::Resize(120, 40),
        Event::Resize(60, 20),
        ctrl('q'),
    ]);

    supervise(&mut screen, &mut app).expect("clean exit");

    assert_eq!(screen.reopened(), 2);
    assert_eq!(app.current_view_name(), MAIN_VIEW);
    let View::Directory(directory) = app.view() else {
        panic!("expected main directory");
    };
    assert_eq!(directory.selected(), 1);
}

#[test]
fn resize_on_exception_view_keeps_it_open() {
    let (_dir, path) = seeded_config(SEED);
    let mut app = App::new(load(&path), ViewRegistry::builtin()).expect("app");
    let mut screen = ScriptedScreen::new([
        ctrl('e'),
        Event::Resize(90, 30),
        key(KeyCode::Esc),
    ]);

    assert_eq!(supervise(&mut screen, &mut app), Ok(Termination::Close));
    assert_eq!(screen.reopened(), 1);
    assert!(screen.last_frame().contains("ERROR: [SyntheticError]"));
}
