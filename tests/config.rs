use std::fs;
use std::path::PathBuf;

use aideon_contacts::SyncError;
use aideon_contacts::config::{SyncConfig, UpdateMode};
use tempfile::tempdir;

#[test]
fn defaults_match_the_people_api() {
    let config = SyncConfig::default();

    assert_eq!(config.api_base_url, "https://people.googleapis.com/v1");
    assert_eq!(config.page_size, 1000);
    assert_eq!(config.update_mode, UpdateMode::Replace);
    assert_eq!(config.erase.group_name, "temp");
    assert!(config.timeout().is_none());
    config.validate().expect("defaults are valid");
}

#[test]
fn partial_toml_keeps_remaining_defaults() {
    let config = SyncConfig::from_toml(
        r#"
        input = "export/address-book.csv"
        update_mode = "in_place"
        timeout_secs = 15

        [erase]
        grace_secs = 2
        "#,
    )
    .expect("configuration parsed");

    assert_eq!(config.input, PathBuf::from("export/address-book.csv"));
    assert_eq!(config.update_mode, UpdateMode::InPlace);
    assert_eq!(config.timeout_secs, Some(15));
    assert_eq!(config.erase.grace_secs, 2);
    assert_eq!(config.erase.max_attempts, 5);
    assert_eq!(config.token, PathBuf::from("token.json"));
}

#[test]
fn invalid_values_are_rejected() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("contacts-sync.toml");
    fs::write(&path, "page_size = 5000\n").expect("config written");

    let error = SyncConfig::load(Some(&path)).expect_err("page size too large");
    assert!(matches!(error, SyncError::Config(_)));

    fs::write(&path, "update_mode = \"merge\"\n").expect("config written");
    let error = SyncConfig::load(Some(&path)).expect_err("unknown mode");
    assert!(matches!(error, SyncError::ConfigParse(_)));
}

#[test]
fn explicit_config_path_must_exist() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("absent.toml");

    let error = SyncConfig::load(Some(&path)).expect_err("missing file");
    assert!(matches!(error, SyncError::MissingInput(_)));
}
