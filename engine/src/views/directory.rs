//! Selectable list of named destinations.

use pst_types::NavigationSignal;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    label: String,
    target: String,
}

impl DirectoryEntry {
    pub fn new(label: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            target: target.into(),
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Entries with an empty target stand in for features that do not exist yet.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.target.is_empty()
    }
}

/// Which control has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DirectoryFocus {
    #[default]
    List,
    OpenButton,
}

#[derive(Debug, Clone)]
pub struct DirectoryView {
    title: String,
    description: Option<String>,
    entries: Vec<DirectoryEntry>,
    selected: usize,
    focus: DirectoryFocus,
}

impl DirectoryView {
    pub fn new<I, L, T>(entries: I, title: impl Into<String>, description: Option<&str>) -> Self
    where
        I: IntoIterator<Item = (L, T)>,
        L: Into<String>,
        T: Into<String>,
    {
        Self {
            title: title.into(),
            description: description.map(str::to_string),
            entries: entries
                .into_iter()
                .map(|(label, target)| DirectoryEntry::new(label, target))
                .collect(),
            selected: 0,
            focus: DirectoryFocus::List,
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn entries(&self) -> &[DirectoryEntry] {
        &self.entries
    }

    #[must_use]
    pub fn selected(&self) -> usize {
        self.selected
    }

    #[must_use]
    pub fn selected_entry(&self) -> Option<&DirectoryEntry> {
        self.entries.get(self.selected)
    }

    #[must_use]
    pub fn focus(&self) -> DirectoryFocus {
        self.focus
    }

    /// Select `index`; out-of-range indices are ignored.
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.entries.len() {
            self.selected = index;
            true
        } else {
            false
        }
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.entries.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.entries.len().saturating_sub(1);
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            DirectoryFocus::List => DirectoryFocus::OpenButton,
            DirectoryFocus::OpenButton => DirectoryFocus::List,
        };
    }

    /// "Open": navigate to the selected entry's target.
    ///
    /// `None` only when the directory has no entries.
    #[must_use]
    pub fn open(&self) -> Option<NavigationSignal> {
        self.selected_entry()
            .map(|entry| NavigationSignal::go_to(entry.target()))
    }
}
