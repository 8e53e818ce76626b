//! Tests for migrations.rs: reading the migrations file.

use pretty_assertions::assert_eq;
use satellite_client::{read_migrations, ClientError, ConfigError};
use serde_json::json;
use std::fs;

#[test]
fn returns_migrations_array_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("migrations.json");
    fs::write(&path, r#"{"migrations":[{"version":1}]}"#).unwrap();

    let migrations = read_migrations(&path).unwrap();
    assert_eq!(migrations.len(), 1);
    assert_eq!(migrations[0].as_value(), &json!({"version": 1}));
}

#[test]
fn keeps_order_and_unknown_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("migrations.json");
    let document = json!({
        "other": true,
        "migrations": [
            {"version": "2", "encoding": "escaped", "satellite_body": []},
            {"version": "1", "extra": {"nested": [1, 2]}}
        ]
    });
    fs::write(&path, document.to_string()).unwrap();

    let migrations = read_migrations(&path).unwrap();
    let values: Vec<_> = migrations.iter().map(|m| m.as_value().clone()).collect();
    assert_eq!(values, document["migrations"].as_array().unwrap().clone());
}

#[test]
fn empty_array_is_allowed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("migrations.json");
    fs::write(&path, r#"{"migrations":[]}"#).unwrap();

    assert!(read_migrations(&path).unwrap().is_empty());
}

#[test]
fn missing_file_is_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_migrations(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(
        err,
        ClientError::Configuration(ConfigError::ReadMigrations { .. })
    ));
}

#[test]
fn invalid_json_is_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("migrations.json");
    fs::write(&path, "{not json").unwrap();

    let err = read_migrations(&path).unwrap_err();
    assert!(matches!(
        err,
        ClientError::Configuration(ConfigError::ParseMigrations { .. })
    ));
    assert!(err.to_string().contains("migrations.json"));
}

#[test]
fn missing_field_is_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("migrations.json");
    fs::write(&path, r#"{"version":1}"#).unwrap();

    let err = read_migrations(&path).unwrap_err();
    assert!(matches!(
        err,
        ClientError::Configuration(ConfigError::MissingMigrations { .. })
    ));
}

#[test]
fn non_array_field_is_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("migrations.json");
    fs::write(&path, r#"{"migrations":{"version":1}}"#).unwrap();

    assert!(matches!(
        read_migrations(&path).unwrap_err(),
        ClientError::Configuration(ConfigError::MissingMigrations { .. })
    ));
}
