//! Input handling for the PST TUI.
//!
//! Every event passes the global intercept first, then the active view's key
//! map. Handlers never navigate themselves; they return the
//! [`NavigationSignal`] the control loop should dispatch.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use thiserror::Error;
use tracing::debug;

use pst_engine::views::{
    ConfigEditorView, ConfigField, DirectoryFocus, DirectoryView, EditorFocus, ExceptionButton,
    ExceptionView, FieldValue, TextInput,
};
use pst_engine::{App, Fault, NavigationSignal, Termination, View};

/// Rows moved per PageUp/PageDown in the exception trace.
const TRACE_PAGE: u16 = 10;

/// Raised on demand by the diagnostic shortcut to exercise error recovery.
#[derive(Debug, Error)]
#[error("diagnostic error raised from view \"{view}\"")]
pub struct SyntheticError {
    view: String,
}

impl SyntheticError {
    pub fn new(view: impl Into<String>) -> Self {
        Self { view: view.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shortcut {
    Quit,
    RaiseError,
}

fn global_shortcut(key: &KeyEvent) -> Option<Shortcut> {
    if !key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }
    match key.code {
        KeyCode::Char('c' | 'q') => Some(Shortcut::Quit),
        KeyCode::Char('e') => Some(Shortcut::RaiseError),
        _ => None,
    }
}

/// Press and repeat only; Windows also reports releases.
fn pressed_key(event: &Event) -> Option<KeyEvent> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => Some(*key),
        _ => None,
    }
}

/// Translate one terminal event against the active scene.
pub fn handle_event(app: &mut App, event: Event) -> Result<Option<NavigationSignal>, Fault> {
    if let Event::Resize(width, height) = event {
        debug!(width, height, view = %app.current_view_name(), "Terminal resized");
        return Ok(Some(NavigationSignal::Resize(
            app.current_view_name().to_string(),
        )));
    }
    let Some(key) = pressed_key(&event) else {
        return Ok(None);
    };

    match global_shortcut(&key) {
        Some(Shortcut::Quit) => {
            return Ok(Some(NavigationSignal::Terminate(Termination::UserRequested)));
        }
        Some(Shortcut::RaiseError) => {
            return Err(Fault::new(SyntheticError::new(app.current_view_name())));
        }
        None => {}
    }

    // Any keypress dismisses a stale notice.
    app.clear_notice();

    match app.view_mut() {
        View::Directory(directory) => Ok(directory_key(directory, key)),
        View::Exception(view) => Ok(handle_exception_key(view, key)),
        View::ConfigEditor(_) => handle_config_editor(app, key),
    }
}

fn directory_key(directory: &mut DirectoryView, key: KeyEvent) -> Option<NavigationSignal> {
    match key.code {
        KeyCode::Char('k') | KeyCode::Up => directory.select_prev(),
        KeyCode::Char('j') | KeyCode::Down => directory.select_next(),
        KeyCode::Char('g') | KeyCode::Home => directory.select_first(),
        KeyCode::Char('G') | KeyCode::End => directory.select_last(),
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Left | KeyCode::Right => {
            directory.toggle_focus();
        }
        KeyCode::Enter | KeyCode::Char(' ') => return directory.open(),
        KeyCode::Char('o') if directory.focus() == DirectoryFocus::List => {
            return directory.open();
        }
        KeyCode::Char('q') | KeyCode::Esc => {
            return Some(NavigationSignal::Terminate(Termination::UserRequested));
        }
        KeyCode::Char(digit @ '1'..='9') => {
            let index = digit as usize - '1' as usize;
            if directory.select(index) {
                return directory.open();
            }
        }
        _ => {}
    }
    None
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditorCommand {
    None,
    Save,
    Back,
}

fn handle_config_editor(app: &mut App, key: KeyEvent) -> Result<Option<NavigationSignal>, Fault> {
    let command = {
        let View::ConfigEditor(editor) = app.view_mut() else {
            return Ok(None);
        };
        editor_key(editor, key)
    };

    match command {
        EditorCommand::None => Ok(None),
        EditorCommand::Save => {
            app.save_config()?;
            Ok(None)
        }
        EditorCommand::Back => match app.view() {
            View::ConfigEditor(editor) => Ok(Some(editor.back(app.store()))),
            _ => Ok(None),
        },
    }
}

fn editor_key(editor: &mut ConfigEditorView, key: KeyEvent) -> EditorCommand {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('s') => EditorCommand::Save,
            _ => EditorCommand::None,
        };
    }

    let on_text = matches!(
        editor.focus(),
        EditorFocus::Field(index)
            if matches!(editor.fields().get(index).map(ConfigField::value), Some(FieldValue::Text(_)))
    );

    match key.code {
        KeyCode::Tab | KeyCode::Down => editor.focus_next(),
        KeyCode::BackTab | KeyCode::Up => editor.focus_prev(),
        KeyCode::Esc => return EditorCommand::Back,
        KeyCode::Enter => match editor.focus() {
            EditorFocus::SaveButton => return EditorCommand::Save,
            EditorFocus::BackButton => return EditorCommand::Back,
            EditorFocus::Field(_) if on_text => editor.focus_next(),
            EditorFocus::Field(_) => {
                editor.toggle_focused();
            }
        },
        KeyCode::Char(' ') if !on_text => match editor.focus() {
            EditorFocus::SaveButton => return EditorCommand::Save,
            EditorFocus::BackButton => return EditorCommand::Back,
            EditorFocus::Field(_) => {
                editor.toggle_focused();
            }
        },
        KeyCode::Char(c) => {
            editor.insert_char(c);
        }
        KeyCode::Backspace => {
            editor.backspace();
        }
        KeyCode::Delete => {
            editor.edit_text(TextInput::delete);
        }
        KeyCode::Left => {
            editor.edit_text(TextInput::move_left);
        }
        KeyCode::Right => {
            editor.edit_text(TextInput::move_right);
        }
        KeyCode::Home => {
            editor.edit_text(TextInput::move_home);
        }
        KeyCode::End => {
            editor.edit_text(TextInput::move_end);
        }
        _ => {}
    }
    EditorCommand::None
}

/// Translate one event while the exception view owns the screen.
///
/// The diagnostic shortcut still raises here; the caller treats that as a
/// second, fatal error.
pub fn handle_exception_event(
    view: &mut ExceptionView,
    event: Event,
) -> Result<Option<NavigationSignal>, Fault> {
    if let Event::Resize(width, height) = event {
        debug!(width, height, "Terminal resized on exception view");
        return Ok(Some(NavigationSignal::Resize(
            view.resume_target().unwrap_or_default().to_string(),
        )));
    }
    let Some(key) = pressed_key(&event) else {
        return Ok(None);
    };

    match global_shortcut(&key) {
        Some(Shortcut::Quit) => Ok(Some(NavigationSignal::Terminate(
            Termination::UserRequested,
        ))),
        Some(Shortcut::RaiseError) => Err(Fault::new(SyntheticError::new("exception"))),
        None => Ok(handle_exception_key(view, key)),
    }
}

fn handle_exception_key(view: &mut ExceptionView, key: KeyEvent) -> Option<NavigationSignal> {
    match key.code {
        KeyCode::Tab | KeyCode::Right => view.focus_next(),
        KeyCode::BackTab | KeyCode::Left => view.focus_prev(),
        KeyCode::Char('k') | KeyCode::Up => view.scroll_up(1),
        KeyCode::Char('j') | KeyCode::Down => view.scroll_down(1),
        KeyCode::PageUp => view.scroll_up(TRACE_PAGE),
        KeyCode::PageDown => view.scroll_down(TRACE_PAGE),
        KeyCode::Enter | KeyCode::Char(' ') => return Some(view.activate()),
        KeyCode::Char('r') => {
            view.focus(ExceptionButton::ReturnToMain);
            return Some(view.activate());
        }
        KeyCode::Char('t') => {
            view.focus(ExceptionButton::Trace);
            return Some(view.activate());
        }
        KeyCode::Char('c') | KeyCode::Esc => {
            view.focus(ExceptionButton::Close);
            return Some(view.activate());
        }
        _ => {}
    }
    None
}

#[cfg(test)]
mod tests {
    use std::fs;

    use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

    use pst_engine::views::ExceptionView;
    use pst_engine::{
        App, CONFIG_VIEW, ConfigStore, Fault, NavigationSignal, Termination, View, ViewRegistry,
    };

    use super::{handle_event, handle_exception_event};

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    fn app(dir: &tempfile::TempDir) -> App {
        let path = dir.path().join("current_config.json");
        fs::write(&path, r#"{"flag": true, "label": "x", "main_frame_name": "main"}"#).unwrap();
        let store = ConfigStore::load(path, None).unwrap();
        App::new(store, ViewRegistry::builtin()).unwrap()
    }

    #[test]
    fn global_quit_wins_over_view_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);
        for c in ['c', 'q'] {
            assert_eq!(
                handle_event(&mut app, ctrl(c)).unwrap(),
                Some(NavigationSignal::Terminate(Termination::UserRequested))
            );
        }
    }

    #[test]
    fn diagnostic_shortcut_raises_synthetic_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);
        let fault = handle_event(&mut app, ctrl('e')).unwrap_err();
        assert_eq!(fault.kind(), "SyntheticError");
        assert!(fault.location().unwrap().file().ends_with("input.rs"));
    }

    #[test]
    fn resize_names_the_active_view() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);
        assert_eq!(
            handle_event(&mut app, Event::Resize(80, 24)).unwrap(),
            Some(NavigationSignal::Resize("main".into()))
        );
    }

    #[test]
    fn release_events_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);
        let mut release = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert_eq!(handle_event(&mut app, Event::Key(release)).unwrap(), None);
    }

    #[test]
    fn directory_arrows_then_enter_opens_selection() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);
        assert_eq!(handle_event(&mut app, key(KeyCode::Down)).unwrap(), None);
        assert_eq!(
            handle_event(&mut app, key(KeyCode::Enter)).unwrap(),
            Some(NavigationSignal::go_to(CONFIG_VIEW))
        );
        assert_eq!(
            handle_event(&mut app, key(KeyCode::Char('1'))).unwrap(),
            Some(NavigationSignal::go_to(""))
        );
    }

    #[test]
    fn editor_toggle_save_and_back() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);
        app.navigate(CONFIG_VIEW).unwrap();

        // Focus starts on "flag" (sorted first).
        handle_event(&mut app, key(KeyCode::Char(' '))).unwrap();
        handle_event(&mut app, ctrl('s')).unwrap();
        assert!(!app.store().get_bool("flag", true));

        // label: append a character through the text input.
        handle_event(&mut app, key(KeyCode::Tab)).unwrap();
        handle_event(&mut app, key(KeyCode::Char('y'))).unwrap();
        let View::ConfigEditor(editor) = app.view() else {
            panic!("expected config editor");
        };
        assert!(editor.is_dirty());

        assert_eq!(
            handle_event(&mut app, key(KeyCode::Esc)).unwrap(),
            Some(NavigationSignal::go_to("main"))
        );
    }

    #[test]
    fn exception_keys_map_to_buttons() {
        let fault = Fault::new(std::io::Error::other("boom"));
        let mut view = ExceptionView::new(fault.clone(), Some("main".into()));

        assert_eq!(
            handle_exception_event(&mut view, key(KeyCode::Enter)).unwrap(),
            Some(NavigationSignal::Terminate(Termination::Resume))
        );
        assert_eq!(
            handle_exception_event(&mut view, key(KeyCode::Char('t'))).unwrap(),
            Some(NavigationSignal::Fatal(fault))
        );
        assert_eq!(
            handle_exception_event(&mut view, key(KeyCode::Esc)).unwrap(),
            Some(NavigationSignal::Terminate(Termination::Close))
        );
        assert_eq!(
            handle_exception_event(&mut view, Event::Resize(10, 10)).unwrap(),
            Some(NavigationSignal::Resize("main".into()))
        );
        assert!(handle_exception_event(&mut view, ctrl('e')).is_err());
    }
}
