use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use pst_types::{ConfigValue, UiOptions};

use crate::{SCHEMA_VERSION, keys};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("config at {} is not valid JSON: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("config at {} must be a JSON object at the top level", path.display())]
    NotAnObject { path: PathBuf },
    #[error("bundled config template is invalid: {0}")]
    Template(#[source] serde_json::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to write config to {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ConfigError {
    /// Backing file involved, when there is one.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::NotAnObject { path }
            | ConfigError::Write { path, .. } => Some(path),
            ConfigError::Template(_) | ConfigError::Serialize(_) => None,
        }
    }
}

/// Persisted key-value settings.
///
/// Every mutating call persists the whole map by default. Pass
/// `persist = false` to batch changes and call [`ConfigStore::save`] later.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    name: String,
    path: PathBuf,
    entries: BTreeMap<String, ConfigValue>,
}

impl ConfigStore {
    /// Load an existing backing file, restoring a `.bak` left by an interrupted save.
    pub fn load(path: impl Into<PathBuf>, name: Option<&str>) -> Result<Self, ConfigError> {
        let path = path.into();
        pst_utils::recover_bak_file(&path);
        let entries = read_entries(&path)?;
        let store = Self {
            name: name.map_or_else(|| default_name(&path), str::to_string),
            path,
            entries,
        };
        store.check_schema_version();
        tracing::info!(path = %store.path.display(), entries = store.len(), "Config loaded");
        Ok(store)
    }

    /// Load the working file, creating it from `template` if it does not exist yet.
    pub fn open_or_init(
        path: impl Into<PathBuf>,
        template: &str,
        name: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let path = path.into();
        // A `.bak` must win over the template, so recover before the existence check.
        pst_utils::recover_bak_file(&path);

        if path.exists() {
            return Self::load(path, name);
        }

        let entries = parse_object(template)
            .map_err(ConfigError::Template)?
            .ok_or_else(|| {
                ConfigError::Template(serde::de::Error::custom("template must be a JSON object"))
            })?;

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: path.clone(),
                source,
            })?;
        }

        let store = Self {
            name: name.map_or_else(|| default_name(&path), str::to_string),
            path,
            entries,
        };
        store.save()?;
        tracing::info!(path = %store.path.display(), "Created config from template");
        Ok(store)
    }

    /// Re-read the backing file, replacing all in-memory entries.
    pub fn reload(&mut self) -> Result<(), ConfigError> {
        pst_utils::recover_bak_file(&self.path);
        self.entries = read_entries(&self.path)?;
        tracing::debug!(path = %self.path.display(), "Config reloaded");
        Ok(())
    }

    /// Value at `key`, or `default` when absent.
    pub fn get(&self, key: &str, default: impl Into<ConfigValue>) -> ConfigValue {
        match self.entries.get(key) {
            Some(value) => value.clone(),
            None => default.into(),
        }
    }

    /// Borrowing lookup without a default.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&ConfigValue> {
        self.entries.get(key)
    }

    /// Boolean at `key`; `default` when absent or not a boolean.
    #[must_use]
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.entries
            .get(key)
            .and_then(ConfigValue::as_bool)
            .unwrap_or(default)
    }

    /// String at `key`; `default` when absent or not a string.
    #[must_use]
    pub fn get_str<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.entries
            .get(key)
            .and_then(ConfigValue::as_str)
            .unwrap_or(default)
    }

    pub fn set(
        &mut self,
        key: impl Into<String>,
        value: impl Into<ConfigValue>,
        persist: bool,
    ) -> Result<ConfigValue, ConfigError> {
        let key = key.into();
        let value = value.into();
        tracing::debug!(key = %key, "Config set");
        self.entries.insert(key, value.clone());
        if persist {
            self.save()?;
        }
        Ok(value)
    }

    /// Merge `entries` over the current map; incoming keys win.
    pub fn update_many<I>(&mut self, entries: I, persist: bool) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = (String, ConfigValue)>,
    {
        let mut changed = 0usize;
        for (key, value) in entries {
            self.entries.insert(key, value);
            changed += 1;
        }
        tracing::debug!(changed, "Config updated");
        if persist {
            self.save()?;
        }
        Ok(())
    }

    /// Overwrite the backing file with the full map.
    pub fn save(&self) -> Result<(), ConfigError> {
        let bytes = self.to_json_bytes()?;
        pst_utils::atomic_write(&self.path, &bytes).map_err(|source| ConfigError::Write {
            path: self.path.clone(),
            source,
        })?;
        tracing::info!(path = %self.path.display(), "Config saved");
        Ok(())
    }

    /// Snapshot of all keys, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Display options read from the store, falling back to defaults.
    #[must_use]
    pub fn ui_options(&self) -> UiOptions {
        let max_frame_width = self
            .get_str(keys::MAX_FRAME_WIDTH, "")
            .trim()
            .parse::<u16>()
            .ok()
            .filter(|width| *width > 0)
            .unwrap_or(UiOptions::DEFAULT_MAX_FRAME_WIDTH);

        UiOptions {
            ascii_only: self.get_bool(keys::ASCII_ONLY, false),
            high_contrast: self.get_bool(keys::HIGH_CONTRAST, false),
            max_frame_width,
        }
    }

    fn to_json_bytes(&self) -> Result<Vec<u8>, ConfigError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.entries
            .serialize(&mut serializer)
            .map_err(ConfigError::Serialize)?;
        buf.push(b'\n');
        Ok(buf)
    }

    fn check_schema_version(&self) {
        match self.value(keys::SCHEMA_VERSION) {
            Some(ConfigValue::Text(version)) if version == SCHEMA_VERSION => {}
            Some(other) => tracing::warn!(
                path = %self.path.display(),
                found = %other,
                expected = SCHEMA_VERSION,
                "Config schema version mismatch; loading anyway"
            ),
            None => tracing::warn!(
                path = %self.path.display(),
                "Config has no schema version; assuming {SCHEMA_VERSION}"
            ),
        }
    }
}

fn default_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "config".to_string())
}

fn read_entries(path: &Path) -> Result<BTreeMap<String, ConfigValue>, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| {
        tracing::warn!("Failed to read config at {}: {source}", path.display());
        ConfigError::Read {
            path: path.to_path_buf(),
            source,
        }
    })?;

    match parse_object(&content) {
        Ok(Some(entries)) => Ok(entries),
        Ok(None) => Err(ConfigError::NotAnObject {
            path: path.to_path_buf(),
        }),
        Err(source) => {
            tracing::warn!("Failed to parse config at {}: {source}", path.display());
            Err(ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })
        }
    }
}

/// `Ok(None)` when the text is valid JSON but not an object.
fn parse_object(content: &str) -> Result<Option<BTreeMap<String, ConfigValue>>, serde_json::Error> {
    match serde_json::from_str::<Value>(content)? {
        Value::Object(map) => Ok(Some(
            map.into_iter()
                .map(|(key, value)| (key, ConfigValue::from(value)))
                .collect(),
        )),
        _ => Ok(None),
    }
}
