//! Schema Registry Tests
//!
//! - Schema files load from a directory in file-name order
//! - A registered (name, version) cannot be replaced
//! - Structurally broken schemas are rejected at load
//! - Loaded schemas drive the codec exactly like built ones

use std::fs;
use std::path::Path;

use databag::{decode, encode, EncodeMode, Record, SchemaError, SchemaRegistry};
use serde_json::json;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn write_schema(dir: &Path, file: &str, body: serde_json::Value) {
    fs::write(dir.join(file), serde_json::to_string_pretty(&body).unwrap()).unwrap();
}

fn cluster_schema(version: &str) -> serde_json::Value {
    json!({
        "name": "cluster",
        "version": version,
        "encode_mode": "exhaustive",
        "fields": [
            {"name": "worker_config", "alias": "worker-config", "type": "string", "required": true},
            {"name": "replicas", "type": "int", "default": 1},
            {"name": "tls", "type": "nullable", "inner": {
                "type": "object",
                "fields": [
                    {"name": "ca_cert", "alias": "ca-cert", "type": "string", "required": true}
                ]
            }, "default": null}
        ]
    })
}

fn setup_registry() -> (TempDir, SchemaRegistry) {
    let tmp = TempDir::new().unwrap();
    write_schema(tmp.path(), "cluster-1.json", cluster_schema("1"));
    write_schema(tmp.path(), "cluster-2.json", cluster_schema("2"));
    write_schema(
        tmp.path(),
        "person.json",
        json!({
            "name": "person",
            "fields": [
                {"name": "name", "type": "string", "required": true},
                {"name": "age", "type": "int", "default": 0}
            ]
        }),
    );
    fs::write(tmp.path().join("README.md"), "not a schema").unwrap();

    let registry = SchemaRegistry::load_dir(tmp.path()).unwrap();
    (tmp, registry)
}

// =============================================================================
// Loading Tests
// =============================================================================

#[test]
fn test_load_dir_skips_non_json() {
    let (_tmp, registry) = setup_registry();
    assert_eq!(registry.len(), 3);
    assert!(registry.contains("cluster"));
    assert!(registry.contains("person"));
}

#[test]
fn test_missing_dir_is_empty() {
    let tmp = TempDir::new().unwrap();
    let registry = SchemaRegistry::load_dir(&tmp.path().join("absent")).unwrap();
    assert!(registry.is_empty());
}

#[test]
fn test_file_defaults_applied() {
    let (_tmp, registry) = setup_registry();
    let person = registry.get("person", "1").unwrap();
    assert_eq!(person.version, "1");
    assert_eq!(person.encode_mode, EncodeMode::Sparse);
}

#[test]
fn test_latest_version() {
    let (_tmp, registry) = setup_registry();
    assert_eq!(registry.latest("cluster").unwrap().version, "2");
    assert!(registry.latest("ingress").is_none());
}

// =============================================================================
// Rejection Tests
// =============================================================================

#[test]
fn test_duplicate_version_rejected() {
    let tmp = TempDir::new().unwrap();
    write_schema(tmp.path(), "a.json", cluster_schema("1"));
    write_schema(tmp.path(), "b.json", cluster_schema("1"));

    let err = SchemaRegistry::load_dir(tmp.path()).unwrap_err();
    assert!(matches!(err, SchemaError::Immutable { .. }));
    assert_eq!(err.code(), "DATABAG_SCHEMA_IMMUTABLE");
}

#[test]
fn test_duplicate_alias_rejected() {
    let tmp = TempDir::new().unwrap();
    write_schema(
        tmp.path(),
        "clash.json",
        json!({
            "name": "clash",
            "fields": [
                {"name": "a", "alias": "key", "type": "string", "required": true},
                {"name": "b", "alias": "key", "type": "string", "required": true}
            ]
        }),
    );

    let err = SchemaRegistry::load_dir(tmp.path()).unwrap_err();
    assert!(matches!(err, SchemaError::DuplicateAlias { .. }));
}

#[test]
fn test_bad_default_rejected() {
    let tmp = TempDir::new().unwrap();
    write_schema(
        tmp.path(),
        "bad.json",
        json!({
            "name": "bad",
            "fields": [{"name": "port", "type": "int", "default": "http"}]
        }),
    );

    let err = SchemaRegistry::load_dir(tmp.path()).unwrap_err();
    assert!(matches!(err, SchemaError::InvalidDefault { .. }));
}

#[test]
fn test_unparseable_file_rejected() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("broken.json"), "{ not json").unwrap();

    let err = SchemaRegistry::load_dir(tmp.path()).unwrap_err();
    assert_eq!(err.code(), "DATABAG_SCHEMA_MALFORMED");
}

// =============================================================================
// Codec Integration Tests
// =============================================================================

#[test]
fn test_loaded_schema_round_trip() {
    let (_tmp, registry) = setup_registry();
    let schema = registry.latest("cluster").unwrap();

    let values = json!({
        "worker_config": "target: all",
        "replicas": 3,
        "tls": {"ca_cert": "PEM"}
    });
    let record = Record::new(schema.clone(), values.as_object().cloned().unwrap()).unwrap();

    let out = encode(&record);
    assert_eq!(out["worker-config"], "\"target: all\"");
    assert_eq!(out["replicas"], "3");
    assert_eq!(out["tls"], r#"{"ca-cert":"PEM"}"#);

    assert_eq!(decode(&schema, &out).unwrap(), record);
}

#[test]
fn test_loaded_schema_decodes_defaults() {
    let (_tmp, registry) = setup_registry();
    let schema = registry.get("cluster", "1").unwrap();

    let mut bag = databag::RawBag::new();
    bag.insert("worker-config".into(), "\"x\"".into());

    let record = decode(&schema, &bag).unwrap();
    assert_eq!(
        record.to_json(),
        json!({"worker_config": "x", "replicas": 1, "tls": null})
    );
}
