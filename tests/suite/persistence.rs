//! Store persistence as seen from a fresh load.

use std::fs;

use pst_config::{BASE_CONFIG, ConfigStore, SCHEMA_VERSION, keys};
use pst_types::ConfigValue;

use crate::common::seeded_config;

#[test]
fn first_run_writes_template_with_four_space_indent() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("current_config.json");

    let store = ConfigStore::open_or_init(&path, BASE_CONFIG, Some("pst")).expect("init");

    assert_eq!(store.name(), "pst");
    assert_eq!(store.get_str(keys::SCHEMA_VERSION, ""), SCHEMA_VERSION);
    assert_eq!(store.get_str(keys::MAIN_FRAME_NAME, ""), "main");

    let text = fs::read_to_string(&path).expect("written");
    assert!(text.contains("\n    \"schema_version\": \"1\""), "{text}");
    assert!(text.ends_with("}\n"));
}

#[test]
fn existing_file_is_not_overwritten_by_template() {
    let (_dir, path) = seeded_config(r#"{"operator_name": "grace"}"#);

    let store = ConfigStore::open_or_init(&path, BASE_CONFIG, None).expect("open");

    assert_eq!(store.len(), 1);
    assert_eq!(store.get_str("operator_name", ""), "grace");
}

#[test]
fn persisted_writes_merge_over_prior_state() {
    let (_dir, path) = seeded_config(r#"{"keep": "me", "flag": false, "label": "old"}"#);
    let mut store = ConfigStore::load(&path, None).expect("load");

    store.set("label", "new", true).expect("set");
    store
        .update_many(
            [
                ("flag".to_string(), ConfigValue::Bool(true)),
                ("added".to_string(), ConfigValue::from("yes")),
            ],
            true,
        )
        .expect("update");

    let fresh = ConfigStore::load(&path, None).expect("reload");
    let entries: Vec<(String, ConfigValue)> = fresh
        .iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect();
    assert_eq!(
        entries,
        vec![
            ("added".to_string(), ConfigValue::from("yes")),
            ("flag".to_string(), ConfigValue::Bool(true)),
            ("keep".to_string(), ConfigValue::from("me")),
            ("label".to_string(), ConfigValue::from("new")),
        ]
    );
}

#[test]
fn unpersisted_writes_stay_in_memory() {
    let (_dir, path) = seeded_config(r#"{"label": "old"}"#);
    let mut store = ConfigStore::load(&path, None).expect("load");

    store.set("label", "draft", false).expect("set");

    assert_eq!(store.get_str("label", ""), "draft");
    let fresh = ConfigStore::load(&path, None).expect("reload");
    assert_eq!(fresh.get_str("label", ""), "old");
}

#[test]
fn get_returns_default_only_when_absent() {
    let (_dir, path) = seeded_config(r#"{"flag": false}"#);
    let store = ConfigStore::load(&path, None).expect("load");

    assert_eq!(store.get("flag", true), ConfigValue::Bool(false));
    assert_eq!(store.get("missing", "fallback"), ConfigValue::from("fallback"));
}

#[test]
fn malformed_file_fails_to_load() {
    let (_dir, path) = seeded_config("{ not json");

    let err = ConfigStore::load(&path, None).expect_err("parse error");

    assert_eq!(err.path(), Some(path.as_path()));
}
