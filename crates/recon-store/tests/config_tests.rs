//! Tests for format-agnostic loading and saving

use pretty_assertions::assert_eq;
use recon_store::{ConfigStore, Error};
use rstest::rstest;
use serde::{Deserialize, Serialize};
use std::fs;
use tempfile::TempDir;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Settings {
    name: String,
    retries: u32,
}

#[rstest]
#[case("settings.toml", "name = \"recon\"\nretries = 3\n")]
#[case("settings.json", r#"{"name": "recon", "retries": 3}"#)]
#[case("settings.yaml", "name: recon\nretries: 3\n")]
#[case("settings.YML", "name: recon\nretries: 3\n")]
fn test_load_by_extension(#[case] file: &str, #[case] content: &str) {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join(file);
    fs::write(&path, content).unwrap();

    let settings: Settings = ConfigStore::new().load(&path).unwrap();

    assert_eq!(
        settings,
        Settings {
            name: "recon".into(),
            retries: 3
        }
    );
}

#[rstest]
#[case("out.toml")]
#[case("out.json")]
#[case("out.yaml")]
fn test_save_then_load(#[case] file: &str) {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join(file);
    let store = ConfigStore::new();
    let settings = Settings {
        name: "recon".into(),
        retries: 5,
    };

    store.save(&path, &settings).unwrap();

    assert_eq!(store.load::<Settings>(&path).unwrap(), settings);
}

#[test]
fn test_unsupported_extension() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("settings.ini");
    fs::write(&path, "name=recon").unwrap();

    let err = ConfigStore::new().load::<Settings>(&path).unwrap_err();

    assert!(matches!(err, Error::UnsupportedFormat { ref extension } if extension == "ini"));
}

#[test]
fn test_load_optional_missing() {
    let temp = TempDir::new().unwrap();
    let loaded: Option<Settings> = ConfigStore::new()
        .load_optional(&temp.path().join("absent.toml"))
        .unwrap();

    assert!(loaded.is_none());
}

#[test]
fn test_parse_error_names_format() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("bad.toml");
    fs::write(&path, "name = ").unwrap();

    let err = ConfigStore::new().load::<Settings>(&path).unwrap_err();

    assert!(err.to_string().contains("TOML"));
}
