//! Name-to-view lookup for navigation targets.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use pst_config::ConfigStore;

use crate::views::{ConfigEditorView, DirectoryView, View};

/// Builds a fresh view instance each time its name is entered.
pub type ViewFactory = Box<dyn Fn(&ConfigStore) -> View>;

pub const MAIN_VIEW: &str = "main";
pub const CONFIG_VIEW: &str = "config";

const MAIN_DESCRIPTION: &str = "The PST project is a system designed for tracking profiles \
     and managing information regarding personnel";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no view registered under \"{name}\"")]
pub struct UnknownViewError {
    name: String,
}

impl UnknownViewError {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

pub struct ViewRegistry {
    factories: BTreeMap<String, ViewFactory>,
    entry_view: String,
}

impl ViewRegistry {
    /// Empty registry whose default entry point is `entry_view`.
    pub fn new(entry_view: impl Into<String>) -> Self {
        Self {
            factories: BTreeMap::new(),
            entry_view: entry_view.into(),
        }
    }

    /// The stock PST scene graph: main directory and config editor.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::new(MAIN_VIEW);
        registry
            .register(MAIN_VIEW, |_| {
                DirectoryView::new(
                    [("View Profile Database", ""), ("Settings", CONFIG_VIEW)],
                    "PST Main Directory",
                    Some(MAIN_DESCRIPTION),
                )
                .into()
            })
            .register(CONFIG_VIEW, |store| ConfigEditorView::new(store).into());
        registry
    }

    /// Register (or replace) the factory for `name`.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(&ConfigStore) -> View + 'static,
    {
        self.factories.insert(name.into(), Box::new(factory));
        self
    }

    pub fn resolve(&self, name: &str, store: &ConfigStore) -> Result<View, UnknownViewError> {
        let factory = self.factories.get(name).ok_or_else(|| UnknownViewError {
            name: name.to_string(),
        })?;
        Ok(factory(store))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    #[must_use]
    pub fn entry_view(&self) -> &str {
        &self.entry_view
    }
}

// Factories are closures; list names only.
impl fmt::Debug for ViewRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewRegistry")
            .field("views", &self.factories.keys().collect::<Vec<_>>())
            .field("entry_view", &self.entry_view)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pst_config::ConfigStore;

    use super::{CONFIG_VIEW, MAIN_VIEW, ViewRegistry};
    use crate::views::View;

    #[test]
    fn builtin_registry_resolves_known_views() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c.json");
        fs::write(&path, r#"{"flag": true}"#).unwrap();
        let store = ConfigStore::load(path, None).unwrap();
        let registry = ViewRegistry::builtin();

        assert!(matches!(
            registry.resolve(MAIN_VIEW, &store),
            Ok(View::Directory(_))
        ));
        assert!(matches!(
            registry.resolve(CONFIG_VIEW, &store),
            Ok(View::ConfigEditor(_))
        ));
        assert_eq!(registry.names().collect::<Vec<_>>(), vec![CONFIG_VIEW, MAIN_VIEW]);
        assert_eq!(registry.entry_view(), MAIN_VIEW);
        assert!(registry.contains(CONFIG_VIEW));
        assert!(!registry.contains("profiles"));
    }

    #[test]
    fn unknown_names_fail_explicitly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c.json");
        fs::write(&path, "{}").unwrap();
        let store = ConfigStore::load(path, None).unwrap();

        let err = ViewRegistry::builtin()
            .resolve("profiles", &store)
            .unwrap_err();
        assert_eq!(err.name(), "profiles");
        assert_eq!(err.to_string(), "no view registered under \"profiles\"");
    }

    #[test]
    fn debug_lists_names_only() {
        let rendered = format!("{:?}", ViewRegistry::builtin());
        assert!(rendered.contains("\"main\""));
        assert!(rendered.contains("\"config\""));
    }
}
