//! Editable form over the configuration store.
//!
//! One field per store entry. Booleans become toggles, strings become text
//! inputs, and anything else is shown read-only with its JSON type so the
//! editor never fails on entries it cannot represent. Unsupported fields are
//! skipped by focus traversal and never written back.

use unicode_segmentation::UnicodeSegmentation;

use pst_config::{ConfigError, ConfigStore, DEFAULT_MAIN_FRAME, keys};
use pst_types::{ConfigValue, NavigationSignal};

/// Single-line text buffer with a grapheme-aligned byte cursor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextInput {
    text: String,
    cursor: usize,
}

impl TextInput {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.len();
        Self { text, cursor }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Byte offset of the cursor.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn insert_char(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn backspace(&mut self) {
        if let Some((start, _)) = self.text[..self.cursor].grapheme_indices(true).next_back() {
            self.text.replace_range(start..self.cursor, "");
            self.cursor = start;
        }
    }

    pub fn delete(&mut self) {
        if let Some(grapheme) = self.text[self.cursor..].graphemes(true).next() {
            let end = self.cursor + grapheme.len();
            self.text.replace_range(self.cursor..end, "");
        }
    }

    pub fn move_left(&mut self) {
        if let Some((start, _)) = self.text[..self.cursor].grapheme_indices(true).next_back() {
            self.cursor = start;
        }
    }

    pub fn move_right(&mut self) {
        if let Some(grapheme) = self.text[self.cursor..].graphemes(true).next() {
            self.cursor += grapheme.len();
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.len();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Toggle(bool),
    Text(TextInput),
    /// Present in the store but not editable here.
    Unsupported { type_name: &'static str },
}

impl FieldValue {
    fn from_config(value: &ConfigValue) -> Self {
        match value {
            ConfigValue::Bool(flag) => Self::Toggle(*flag),
            ConfigValue::Text(text) => Self::Text(TextInput::new(text.clone())),
            other @ ConfigValue::Other(_) => Self::Unsupported {
                type_name: other.type_name(),
            },
        }
    }

    fn to_config(&self) -> Option<ConfigValue> {
        match self {
            Self::Toggle(flag) => Some(ConfigValue::Bool(*flag)),
            Self::Text(input) => Some(ConfigValue::Text(input.text().to_string())),
            Self::Unsupported { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigField {
    key: String,
    value: FieldValue,
}

impl ConfigField {
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    #[must_use]
    pub fn is_editable(&self) -> bool {
        !matches!(self.value, FieldValue::Unsupported { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorFocus {
    Field(usize),
    SaveButton,
    BackButton,
}

#[derive(Debug, Clone)]
pub struct ConfigEditorView {
    title: String,
    fields: Vec<ConfigField>,
    focus: EditorFocus,
    dirty: bool,
}

impl ConfigEditorView {
    #[must_use]
    pub fn new(store: &ConfigStore) -> Self {
        let fields: Vec<ConfigField> = store
            .iter()
            .map(|(key, value)| ConfigField {
                key: key.to_string(),
                value: FieldValue::from_config(value),
            })
            .collect();

        let focus = fields
            .iter()
            .position(ConfigField::is_editable)
            .map_or(EditorFocus::SaveButton, EditorFocus::Field);

        Self {
            title: format!("Configuration [{}]", store.name()),
            fields,
            focus,
            dirty: false,
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn fields(&self) -> &[ConfigField] {
        &self.fields
    }

    #[must_use]
    pub fn field(&self, key: &str) -> Option<&ConfigField> {
        self.fields.iter().find(|field| field.key == key)
    }

    #[must_use]
    pub fn focus(&self) -> EditorFocus {
        self.focus
    }

    /// Unsaved edits exist.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Focus order: editable fields top to bottom, then Save, then Back.
    fn focus_order(&self) -> Vec<EditorFocus> {
        self.fields
            .iter()
            .enumerate()
            .filter(|(_, field)| field.is_editable())
            .map(|(index, _)| EditorFocus::Field(index))
            .chain([EditorFocus::SaveButton, EditorFocus::BackButton])
            .collect()
    }

    pub fn focus_next(&mut self) {
        let order = self.focus_order();
        let current = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = order[(current + 1) % order.len()];
    }

    pub fn focus_prev(&mut self) {
        let order = self.focus_order();
        let current = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = order[(current + order.len() - 1) % order.len()];
    }

    /// Move focus to the field bound to `key`; false if absent or read-only.
    pub fn focus_key(&mut self, key: &str) -> bool {
        match self.fields.iter().position(|field| field.key == key) {
            Some(index) if self.fields[index].is_editable() => {
                self.focus = EditorFocus::Field(index);
                true
            }
            _ => false,
        }
    }

    fn focused_value_mut(&mut self) -> Option<&mut FieldValue> {
        match self.focus {
            EditorFocus::Field(index) => self.fields.get_mut(index).map(|field| &mut field.value),
            EditorFocus::SaveButton | EditorFocus::BackButton => None,
        }
    }

    /// Flip the focused toggle. Returns false when focus is not on a toggle.
    pub fn toggle_focused(&mut self) -> bool {
        if let Some(FieldValue::Toggle(flag)) = self.focused_value_mut() {
            *flag = !*flag;
            self.dirty = true;
            true
        } else {
            false
        }
    }

    /// Apply `edit` to the focused text input, if any.
    pub fn edit_text(&mut self, edit: impl FnOnce(&mut TextInput)) -> bool {
        if let Some(FieldValue::Text(input)) = self.focused_value_mut() {
            let snapshot = input.text().to_string();
            edit(input);
            if input.text() != snapshot {
                self.dirty = true;
            }
            true
        } else {
            false
        }
    }

    pub fn insert_char(&mut self, c: char) -> bool {
        self.edit_text(|input| input.insert_char(c))
    }

    pub fn backspace(&mut self) -> bool {
        self.edit_text(TextInput::backspace)
    }

    /// Current value of every bound field.
    #[must_use]
    pub fn values(&self) -> Vec<(String, ConfigValue)> {
        self.fields
            .iter()
            .filter_map(|field| {
                field
                    .value
                    .to_config()
                    .map(|value| (field.key.clone(), value))
            })
            .collect()
    }

    /// "Save": merge every bound field into the store and persist.
    pub fn save(&mut self, store: &mut ConfigStore) -> Result<(), ConfigError> {
        store.update_many(self.values(), true)?;
        self.dirty = false;
        tracing::info!(fields = self.fields.len(), "Config editor saved");
        Ok(())
    }

    /// "Back": return to the view named by `main_frame_name`.
    ///
    /// Read from the store at action time so a just-saved change applies.
    #[must_use]
    pub fn back(&self, store: &ConfigStore) -> NavigationSignal {
        NavigationSignal::go_to(store.get_str(keys::MAIN_FRAME_NAME, DEFAULT_MAIN_FRAME))
    }
}
