//! Error recovery through the exception view.

use crossterm::event::KeyCode;

use pst_engine::views::DirectoryView;
use pst_engine::{App, MAIN_VIEW, Termination, View, ViewRegistry};
use pst_tui::supervise;
use pst_types::FatalError;

use crate::common::{ScriptedScreen, chr, ctrl, key, load, seeded_config};

const SEED: &str = r#"{"main_frame_name": "main", "flag": true}"#;

fn builtin_app(seed: &str) -> (tempfile::TempDir, App) {
    let (dir, path) = seeded_config(seed);
    let app = App::new(load(&path), ViewRegistry::builtin()).expect("app");
    (dir, app)
}

/// Line number shown in "Exception on line N (...)".
fn reported_line(frame: &str) -> Option<u32> {
    let rest = &frame[frame.find("Exception on line ")? + "Exception on line ".len()..];
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

#[test]
fn error_shows_type_and_line_then_returns_to_fresh_main() {
    let (_dir, mut app) = builtin_app(SEED);
    let mut screen = ScriptedScreen::new([
        key(KeyCode::Down),
        ctrl('e'),
        key(KeyCode::Enter),
        ctrl('q'),
    ]);

    let outcome = supervise(&mut screen, &mut app);

    assert_eq!(outcome, Ok(Termination::UserRequested));
    let exception = screen
        .frame_with("ERROR: [SyntheticError]")
        .expect("exception view was shown");
    let frame = &screen.frames()[exception];
    assert!(reported_line(frame).is_some_and(|line| line > 0), "{frame}");
    assert!(frame.contains("input.rs"));
    assert!(frame.contains("Return to Main"));

    assert!(screen.frames()[exception + 1].contains("PST Main Directory"));
    assert_eq!(app.current_view_name(), MAIN_VIEW);
    let View::Directory(directory) = app.view() else {
        panic!("expected main directory");
    };
    assert_eq!(directory.selected(), 0, "entry view is rebuilt fresh");
}

#[test]
fn close_exits_successfully_regardless_of_error() {
    let (_dir, mut app) = builtin_app(SEED);
    let mut screen = ScriptedScreen::new([
        ctrl('e'),
        key(KeyCode::Right),
        key(KeyCode::Right),
        key(KeyCode::Enter),
    ]);

    assert_eq!(supervise(&mut screen, &mut app), Ok(Termination::Close));
}

#[test]
fn trace_reraises_the_original_error() {
    let (_dir, mut app) = builtin_app(SEED);
    let mut screen = ScriptedScreen::new([ctrl('e'), chr('t')]);

    let fault = supervise(&mut screen, &mut app).expect_err("trace is fatal");

    assert_eq!(fault.kind(), "SyntheticError");
    let report = FatalError(fault).to_string();
    assert!(
        report.starts_with("SyntheticError: diagnostic error raised from view \"main\""),
        "{report}"
    );
}

#[test]
fn error_inside_exception_view_is_fatal() {
    let (_dir, mut app) = builtin_app(SEED);
    let mut screen = ScriptedScreen::new([ctrl('e'), ctrl('e')]);

    let fault = supervise(&mut screen, &mut app).expect_err("second error is fatal");

    assert_eq!(
        fault.message(),
        "diagnostic error raised from view \"exception\""
    );
}

#[test]
fn quit_shortcut_works_on_exception_view() {
    let (_dir, mut app) = builtin_app(SEED);
    let mut screen = ScriptedScreen::new([ctrl('e'), ctrl('c')]);

    assert_eq!(
        supervise(&mut screen, &mut app),
        Ok(Termination::UserRequested)
    );
}

#[test]
fn unknown_view_is_reported_not_crashed() {
    let (_dir, path) = seeded_config(SEED);
    let mut registry = ViewRegistry::builtin();
    registry.register(MAIN_VIEW, |_| {
        DirectoryView::new(
            [("Profiles", "profiles"), ("Settings", "config")],
            "Custom Directory",
            None,
        )
        .into()
    });
    let mut app = App::new(load(&path), registry).expect("app");
    let mut screen = ScriptedScreen::new([key(KeyCode::Enter), key(KeyCode::Esc)]);

    assert_eq!(supervise(&mut screen, &mut app), Ok(Termination::Close));
    let frame = screen.last_frame();
    assert!(frame.contains("ERROR: [UnknownViewError]"), "{frame}");
    assert!(frame.contains("no view registered under \"profiles\""));
}
