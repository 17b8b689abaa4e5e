//! Directory and config editor flows through the real control loop.

use crossterm::event::KeyCode;

use pst_config::ConfigStore;
use pst_engine::{App, CONFIG_VIEW, MAIN_VIEW, Termination, ViewRegistry};
use pst_tui::supervise;

use crate::common::{ScriptedScreen, chr, ctrl, key, load, seeded_config};

#[test]
fn settings_round_trip_persists_edits() {
    let (_dir, path) =
        seeded_config(r#"{"flag": true, "label": "x", "main_frame_name": "main"}"#);
    let mut app = App::new(load(&path), ViewRegistry::builtin()).expect("app");
    let mut screen = ScriptedScreen::new([
        key(KeyCode::Down),
        key(KeyCode::Enter),
        chr(' '),
        key(KeyCode::Tab),
        chr('y'),
        ctrl('s'),
        key(KeyCode::Esc),
        ctrl('q'),
    ]);

    assert_eq!(
        supervise(&mut screen, &mut app),
        Ok(Termination::UserRequested)
    );

    assert!(screen.frame_with("Configuration [pst]").is_some());
    assert!(screen.frame_with("(modified)").is_some());
    assert!(screen.frame_with("Saved to ").is_some());
    assert_eq!(app.current_view_name(), MAIN_VIEW);

    let on_disk = ConfigStore::load(&path, None).expect("reload");
    assert!(!on_disk.get_bool("flag", true));
    assert_eq!(on_disk.get_str("label", ""), "xy");
    assert_eq!(on_disk.get_str("main_frame_name", ""), "main");
}

#[test]
fn back_follows_configured_main_frame_name() {
    let (_dir, path) = seeded_config(r#"{"main_frame_name": "config"}"#);
    let mut app = App::new(load(&path), ViewRegistry::builtin()).expect("app");
    let mut screen = ScriptedScreen::new([chr('2'), key(KeyCode::Esc), ctrl('q')]);

    supervise(&mut screen, &mut app).expect("clean exit");

    assert_eq!(app.current_view_name(), CONFIG_VIEW);
}

#[test]
fn placeholder_entry_shows_notice_and_stays() {
    let (_dir, path) = seeded_config("{}");
    let mut app = App::new(load(&path), ViewRegistry::builtin()).expect("app");
    let mut screen = ScriptedScreen::new([key(KeyCode::Enter), ctrl('q')]);

    supervise(&mut screen, &mut app).expect("clean exit");

    assert_eq!(app.current_view_name(), MAIN_VIEW);
    assert!(
        screen
            .last_frame()
            .contains("View Profile Database is not implemented yet")
    );
}

#[test]
fn open_uses_current_selection_not_history() {
    let (_dir, path) = seeded_config("{}");
    let mut app = App::new(load(&path), ViewRegistry::builtin()).expect("app");
    let mut screen = ScriptedScreen::new([
        key(KeyCode::Down),
        key(KeyCode::Up),
        key(KeyCode::Down),
        key(KeyCode::Tab),
        key(KeyCode::Enter),
        ctrl('q'),
    ]);

    supervise(&mut screen, &mut app).expect("clean exit");

    assert_eq!(app.current_view_name(), CONFIG_VIEW);
}
