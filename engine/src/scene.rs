//! Scene state: which view is active and how navigation signals move it.

use pst_config::{ConfigError, ConfigStore};
use pst_types::{Fault, NavigationSignal, Termination, UiOptions};

use crate::registry::{UnknownViewError, ViewRegistry};
use crate::views::View;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
}

/// One-line transient message shown under the active view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    text: String,
    level: NoticeLevel,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: NoticeLevel::Info,
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: NoticeLevel::Warning,
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn level(&self) -> NoticeLevel {
        self.level
    }
}

/// Why `run_scenes` handed control back to its caller without an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneExit {
    Terminated(Termination),
    /// The surface changed size; re-open it and resume at `last_view`.
    Resized { last_view: String },
}

/// Result of dispatching one signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit(SceneExit),
}

/// Owns the store, the registry and the active view.
#[derive(Debug)]
pub struct App {
    store: ConfigStore,
    registry: ViewRegistry,
    current: String,
    view: View,
    notice: Option<Notice>,
    options: UiOptions,
}

impl App {
    /// Enter the registry's default entry view.
    pub fn new(store: ConfigStore, registry: ViewRegistry) -> Result<Self, UnknownViewError> {
        let current = registry.entry_view().to_string();
        let view = registry.resolve(&current, &store)?;
        let options = store.ui_options();
        tracing::debug!(view = %current, "Entered initial view");
        Ok(Self {
            store,
            registry,
            current,
            view,
            notice: None,
            options,
        })
    }

    #[must_use]
    pub fn current_view_name(&self) -> &str {
        &self.current
    }

    #[must_use]
    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut View {
        &mut self.view
    }

    #[must_use]
    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    /// Split borrow for actions that touch both the view and the store.
    pub fn parts_mut(&mut self) -> (&mut View, &mut ConfigStore) {
        (&mut self.view, &mut self.store)
    }

    #[must_use]
    pub fn registry(&self) -> &ViewRegistry {
        &self.registry
    }

    #[must_use]
    pub fn ui_options(&self) -> UiOptions {
        self.options
    }

    #[must_use]
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    /// Enter the view registered as `name`, building a fresh instance.
    ///
    /// The empty name is the placeholder target: nothing is entered and a
    /// "not implemented" notice is shown instead.
    pub fn navigate(&mut self, name: &str) -> Result<(), UnknownViewError> {
        if name.is_empty() {
            let label = match &self.view {
                View::Directory(directory) => directory
                    .selected_entry()
                    .map_or("This option", |entry| entry.label())
                    .to_string(),
                _ => "This option".to_string(),
            };
            tracing::debug!(%label, "Placeholder entry opened");
            self.notice = Some(Notice::warning(format!("{label} is not implemented yet")));
            return Ok(());
        }

        let view = self.registry.resolve(name, &self.store).inspect_err(|err| {
            tracing::warn!(view = %err.name(), "Navigation to unregistered view");
        })?;
        tracing::debug!(from = %self.current, to = %name, "Navigating");
        self.current = name.to_string();
        self.view = view;
        self.notice = None;
        self.options = self.store.ui_options();
        Ok(())
    }

    /// Re-enter `name` after the surface was re-opened.
    ///
    /// When `name` is already active the existing instance is kept, so
    /// selection and unsaved edits survive.
    pub fn resume(&mut self, name: &str) -> Result<(), UnknownViewError> {
        if name == self.current {
            tracing::debug!(view = %name, "Resuming active view");
            return Ok(());
        }
        self.navigate(name)
    }

    /// Start over at the default entry view with a fresh instance.
    pub fn reset(&mut self) -> Result<(), UnknownViewError> {
        let entry = self.registry.entry_view().to_string();
        let view = self.registry.resolve(&entry, &self.store)?;
        tracing::info!(view = %entry, "Scene graph reset");
        self.current = entry;
        self.view = view;
        self.notice = None;
        self.options = self.store.ui_options();
        Ok(())
    }

    /// "Save" on the config editor. No-op on other views.
    pub fn save_config(&mut self) -> Result<(), ConfigError> {
        if let View::ConfigEditor(editor) = &mut self.view {
            editor.save(&mut self.store)?;
            self.options = self.store.ui_options();
            self.notice = Some(Notice::info(format!(
                "Saved to {}",
                self.store.path().display()
            )));
        }
        Ok(())
    }

    /// Apply a signal emitted by a view action.
    pub fn dispatch(&mut self, signal: NavigationSignal) -> Result<Flow, Fault> {
        match signal {
            NavigationSignal::GoTo(name) => {
                self.navigate(&name)?;
                Ok(Flow::Continue)
            }
            NavigationSignal::Terminate(reason) => {
                tracing::info!(reason = reason.message(), "Scene terminated");
                Ok(Flow::Exit(SceneExit::Terminated(reason)))
            }
            NavigationSignal::Resize(last_view) => Ok(Flow::Exit(SceneExit::Resized { last_view })),
            NavigationSignal::Fatal(fault) => Err(fault),
        }
    }
}
