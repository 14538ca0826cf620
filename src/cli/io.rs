//! JSON I/O handling for CLI
//!
//! - Input: one JSON document on stdin, or a JSON file
//! - Output: one JSON object per line on stdout
//! - UTF-8 only

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use serde_json::{Map, Value};

use super::errors::{CliError, CliResult};
use crate::codec::RawBag;

/// Read a JSON document from stdin
pub fn read_request() -> CliResult<Value> {
    let mut input = String::new();
    io::stdin().lock().read_to_string(&mut input)?;
    parse_request(&input)
}

fn parse_request(input: &str) -> CliResult<Value> {
    if input.trim().is_empty() {
        return Err(CliError::input_error("Empty input"));
    }
    Ok(serde_json::from_str(input)?)
}

/// Interpret a JSON value as a databag (object of string values)
pub fn as_databag(value: Value) -> CliResult<RawBag> {
    serde_json::from_value(value)
        .map_err(|e| CliError::input_error(format!("Databag must be an object of strings: {}", e)))
}

/// Interpret a JSON value as a record (object keyed by field name)
pub fn as_record(value: Value) -> CliResult<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(CliError::input_error("Record must be a JSON object")),
    }
}

/// Read a databag from a JSON file
pub fn read_databag_file(path: &Path) -> CliResult<RawBag> {
    let content = fs::read_to_string(path).map_err(|e| {
        CliError::io_error(format!("Failed to read {}: {}", path.display(), e))
    })?;
    as_databag(parse_request(&content)?)
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    write_value(&serde_json::json!({
        "status": "ok",
        "data": data
    }))
}

/// Write an error response to stdout
pub fn write_error(code: &str, message: &str, extra: Map<String, Value>) -> CliResult<()> {
    let mut response = Map::new();
    response.insert("status".into(), "error".into());
    response.insert("code".into(), code.into());
    response.insert("message".into(), message.into());
    response.extend(extra);
    write_value(&Value::Object(response))
}

fn write_value(value: &Value) -> CliResult<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, value)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_empty_input_rejected() {
        let err = parse_request("  \n").unwrap_err();
        assert_eq!(err.code_str(), "DATABAG_CLI_INPUT_ERROR");
    }

    #[test]
    fn test_as_databag() {
        let bag = as_databag(json!({"name": "\"Alice\""})).unwrap();
        assert_eq!(bag.get("name").map(String::as_str), Some("\"Alice\""));

        // values must already be JSON-encoded strings
        assert!(as_databag(json!({"age": 5})).is_err());
    }

    #[test]
    fn test_as_record() {
        assert!(as_record(json!({"name": "Alice"})).is_ok());
        assert!(as_record(json!(["Alice"])).is_err());
    }

    #[test]
    fn test_read_databag_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bag.json");
        fs::write(&path, r#"{"stale": "1"}"#).unwrap();

        let bag = read_databag_file(&path).unwrap();
        assert_eq!(bag.len(), 1);
        assert!(read_databag_file(&tmp.path().join("missing.json")).is_err());
    }
}
