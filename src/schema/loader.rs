//! Schema registry backed by schema files on disk
//!
//! - One JSON schema per file, `*.json` in a single directory
//! - Files are loaded in sorted file-name order
//! - A registered (name, version) is immutable
//! - `latest` compares versions numerically per dotted segment
//! - A missing directory is an empty registry, not an error

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use super::errors::{SchemaError, SchemaResult};
use super::types::Schema;

/// In-memory registry of immutable schemas indexed by (name, version).
#[derive(Debug, Default, Clone)]
pub struct SchemaRegistry {
    schemas: BTreeMap<(String, String), Arc<Schema>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads all schema files from `dir` into a fresh registry.
    pub fn load_dir(dir: &Path) -> SchemaResult<Self> {
        let mut registry = Self::new();

        if !dir.exists() {
            return Ok(registry);
        }

        let entries = fs::read_dir(dir).map_err(|e| {
            SchemaError::malformed(
                dir.display().to_string(),
                format!("Failed to read schema directory: {}", e),
            )
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                SchemaError::malformed(
                    dir.display().to_string(),
                    format!("Failed to read directory entry: {}", e),
                )
            })?;

            let path = entry.path();

            // Skip non-JSON files
            if path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }
            paths.push(path);
        }
        paths.sort();

        for path in paths {
            registry.load_file(&path)?;
        }

        Ok(registry)
    }

    /// Loads a single schema file.
    pub fn load_file(&mut self, path: &Path) -> SchemaResult<()> {
        let content = fs::read_to_string(path).map_err(|e| {
            SchemaError::malformed(
                path.display().to_string(),
                format!("Failed to read file: {}", e),
            )
        })?;

        let schema: Schema = serde_json::from_str(&content).map_err(|e| {
            SchemaError::malformed(path.display().to_string(), format!("Invalid JSON: {}", e))
        })?;

        self.register(schema)
    }

    /// Registers a schema directly.
    pub fn register(&mut self, schema: Schema) -> SchemaResult<()> {
        schema.validate_structure()?;

        let key = (schema.name.clone(), schema.version.clone());
        if self.schemas.contains_key(&key) {
            return Err(SchemaError::Immutable {
                name: key.0,
                version: key.1,
            });
        }

        self.schemas.insert(key, Arc::new(schema));
        Ok(())
    }

    /// Gets a schema by name and version.
    pub fn get(&self, name: &str, version: &str) -> Option<Arc<Schema>> {
        self.schemas
            .get(&(name.to_string(), version.to_string()))
            .cloned()
    }

    /// Gets the highest registered version of `name`, by [`compare_versions`].
    pub fn latest(&self, name: &str) -> Option<Arc<Schema>> {
        self.schemas
            .iter()
            .filter(|((n, _), _)| n == name)
            .max_by(|((_, a), _), ((_, b), _)| compare_versions(a, b))
            .map(|(_, schema)| Arc::clone(schema))
    }

    /// Returns true if any version of `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.schemas.keys().any(|(n, _)| n == name)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// All schemas, ordered by (name, version)
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Schema>> {
        self.schemas.values()
    }
}

/// Orders versions by dot-separated segment, numerically where both
/// segments are numbers (`"9" < "10"`, `"1.2" < "1.10"`), as text otherwise.
/// Versions equal segment by segment (`"1"` and `"01"`) fall back to text.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let mut left = a.split('.');
    let mut right = b.split('.');
    loop {
        let ord = match (left.next(), right.next()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => match (x.parse::<u64>(), y.parse::<u64>()) {
                (Ok(x), Ok(y)) => x.cmp(&y),
                _ => x.cmp(y),
            },
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldSpec, FieldType};
    use tempfile::TempDir;

    fn schema(name: &str, version: &str) -> Schema {
        Schema::builder(name)
            .version(version)
            .field(FieldSpec::required("url", FieldType::String))
            .build()
            .unwrap()
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = SchemaRegistry::new();
        registry.register(schema("ingress", "1")).unwrap();

        assert!(registry.contains("ingress"));
        assert!(registry.get("ingress", "1").is_some());
        assert!(registry.get("ingress", "2").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_is_immutable() {
        let mut registry = SchemaRegistry::new();
        registry.register(schema("ingress", "1")).unwrap();
        let err = registry.register(schema("ingress", "1")).unwrap_err();
        assert_eq!(err.code(), "DATABAG_SCHEMA_IMMUTABLE");
    }

    #[test]
    fn test_latest_version() {
        let mut registry = SchemaRegistry::new();
        registry.register(schema("ingress", "2")).unwrap();
        registry.register(schema("ingress", "1")).unwrap();
        registry.register(schema("tracing", "9")).unwrap();

        assert_eq!(registry.latest("ingress").unwrap().version, "2");
        assert!(registry.latest("missing").is_none());
    }

    #[test]
    fn test_latest_is_numeric() {
        let mut registry = SchemaRegistry::new();
        registry.register(schema("ingress", "9")).unwrap();
        registry.register(schema("ingress", "10")).unwrap();
        registry.register(schema("tracing", "1.2")).unwrap();
        registry.register(schema("tracing", "1.10")).unwrap();

        assert_eq!(registry.latest("ingress").unwrap().version, "10");
        assert_eq!(registry.latest("tracing").unwrap().version, "1.10");
    }

    #[test]
    fn test_compare_versions() {
        assert_eq!(compare_versions("9", "10"), Ordering::Less);
        assert_eq!(compare_versions("1.0", "1"), Ordering::Greater);
        assert_eq!(compare_versions("2.0", "2.0"), Ordering::Equal);
        assert_eq!(compare_versions("1.beta", "1.alpha"), Ordering::Greater);
        assert_eq!(compare_versions("01", "1"), Ordering::Less);
    }

    #[test]
    fn test_missing_dir_is_empty() {
        let tmp = TempDir::new().unwrap();
        let registry = SchemaRegistry::load_dir(&tmp.path().join("nope")).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_load_dir_skips_non_json() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("ingress.json"),
            serde_json::to_string(&schema("ingress", "1")).unwrap(),
        )
        .unwrap();
        fs::write(tmp.path().join("README.md"), "not a schema").unwrap();

        let registry = SchemaRegistry::load_dir(tmp.path()).unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_malformed_file_fails() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("broken.json"), "{ not json").unwrap();

        let err = SchemaRegistry::load_dir(tmp.path()).unwrap_err();
        assert_eq!(err.code(), "DATABAG_SCHEMA_MALFORMED");
        assert!(err.to_string().contains("broken.json"));
    }
}
