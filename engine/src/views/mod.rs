//! The renderable screens of the scene graph.

mod config_editor;
mod directory;
mod exception;

pub use config_editor::{ConfigEditorView, ConfigField, EditorFocus, FieldValue, TextInput};
pub use directory::{DirectoryEntry, DirectoryFocus, DirectoryView};
pub use exception::{ExceptionButton, ExceptionView};

#[derive(Debug, Clone)]
pub enum View {
    Directory(DirectoryView),
    ConfigEditor(ConfigEditorView),
    Exception(ExceptionView),
}

impl View {
    #[must_use]
    pub fn title(&self) -> String {
        match self {
            View::Directory(view) => view.title().to_string(),
            View::ConfigEditor(view) => view.title().to_string(),
            View::Exception(view) => view.title(),
        }
    }
}

impl From<DirectoryView> for View {
    fn from(view: DirectoryView) -> Self {
        View::Directory(view)
    }
}

impl From<ConfigEditorView> for View {
    fn from(view: ConfigEditorView) -> Self {
        View::ConfigEditor(view)
    }
}

impl From<ExceptionView> for View {
    fn from(view: ExceptionView) -> Self {
        View::Exception(view)
    }
}
