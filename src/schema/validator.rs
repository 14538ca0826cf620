//! Value validation against field types
//!
//! Validation semantics:
//! - Required fields must be present
//! - Absent optional fields take their default, if any
//! - Undeclared keys are ignored, never rejected
//! - Types match without coercion (an int field never accepts 1.5 or "1")
//! - Null is a value, not an absence; only nullable/any fields accept it
//! - Float values and defaults come back normalized (f64, nested defaults
//!   filled in), so equal values compare equal whatever their JSON spelling
//! - Fields are checked in declaration order; the first failure is reported
//!
//! Input objects are keyed by alias. Output objects are keyed by field name,
//! recursively through nested objects.

use serde_json::{Map, Value};

use super::errors::ValidationDetails;
use super::types::{FieldSpec, FieldType};

/// Validates an alias-keyed object and returns it keyed by field name,
/// with defaults filled in.
pub fn validate_fields(
    fields: &[FieldSpec],
    obj: &Map<String, Value>,
    path_prefix: &str,
) -> Result<Map<String, Value>, ValidationDetails> {
    let mut out = Map::new();

    for field in fields {
        let field_path = make_path(path_prefix, &field.name);

        match obj.get(field.key()) {
            Some(value) => {
                let value = validate_value(value, &field.field_type, &field_path)?;
                out.insert(field.name.clone(), value);
            }
            None if field.required => {
                return Err(ValidationDetails::missing_field(field_path));
            }
            None => {
                if let Some(default) = default_value(field, &field_path)? {
                    out.insert(field.name.clone(), default);
                }
            }
        }
    }

    Ok(out)
}

/// The field's default in decoded form: nested defaults filled in and
/// numbers normalized, so it compares equal to the same value read back.
pub fn default_value(
    field: &FieldSpec,
    field_path: &str,
) -> Result<Option<Value>, ValidationDetails> {
    field
        .default
        .as_ref()
        .map(|default| {
            let external = to_external(default, &field.field_type);
            validate_value(&external, &field.field_type, field_path)
        })
        .transpose()
}

/// Validates a single value and returns its normalized (name-keyed) form.
pub fn validate_value(
    value: &Value,
    expected_type: &FieldType,
    field_path: &str,
) -> Result<Value, ValidationDetails> {
    match expected_type {
        FieldType::Any => return Ok(value.clone()),
        FieldType::Nullable { inner } => {
            if value.is_null() {
                return Ok(Value::Null);
            }
            return validate_value(value, inner, field_path);
        }
        _ => {}
    }

    if value.is_null() {
        return Err(ValidationDetails::null_value(field_path));
    }

    match expected_type {
        FieldType::String if value.is_string() => Ok(value.clone()),
        FieldType::Int if value.is_i64() || value.is_u64() => Ok(value.clone()),
        FieldType::Bool if value.is_boolean() => Ok(value.clone()),
        // floats are held as f64 whatever their JSON spelling (`0` or `0.0`)
        FieldType::Float => value
            .as_f64()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| type_error(field_path, "float", value)),
        FieldType::Literal { values } => {
            if values.contains(value) {
                Ok(value.clone())
            } else {
                Err(ValidationDetails::not_allowed(field_path, values, value))
            }
        }
        FieldType::Object { fields } => {
            let obj = value
                .as_object()
                .ok_or_else(|| type_error(field_path, "object", value))?;
            Ok(Value::Object(validate_fields(fields, obj, field_path)?))
        }
        FieldType::Array { element_type } => {
            let arr = value
                .as_array()
                .ok_or_else(|| type_error(field_path, "array", value))?;
            let mut out = Vec::with_capacity(arr.len());
            for (i, elem) in arr.iter().enumerate() {
                let elem_path = format!("{}[{}]", field_path, i);
                out.push(validate_value(elem, element_type, &elem_path)?);
            }
            Ok(Value::Array(out))
        }
        FieldType::Map { value_type } => {
            let obj = value
                .as_object()
                .ok_or_else(|| type_error(field_path, "map", value))?;
            let mut out = Map::new();
            for (key, elem) in obj {
                let elem_path = make_path(field_path, key);
                out.insert(key.clone(), validate_value(elem, value_type, &elem_path)?);
            }
            Ok(Value::Object(out))
        }
        other => Err(type_error(field_path, other.type_name(), value)),
    }
}

/// Re-keys a name-keyed object to aliases, recursively. Keys with no
/// matching field are dropped.
pub fn to_external_fields(fields: &[FieldSpec], obj: &Map<String, Value>) -> Map<String, Value> {
    let mut out = Map::new();
    for field in fields {
        if let Some(value) = obj.get(&field.name) {
            out.insert(field.key().to_string(), to_external(value, &field.field_type));
        }
    }
    out
}

/// Re-keys a name-keyed value to its external form.
pub fn to_external(value: &Value, field_type: &FieldType) -> Value {
    match (field_type, value) {
        (FieldType::Object { fields }, Value::Object(obj)) => {
            Value::Object(to_external_fields(fields, obj))
        }
        (FieldType::Array { element_type }, Value::Array(arr)) => {
            Value::Array(arr.iter().map(|v| to_external(v, element_type)).collect())
        }
        (FieldType::Map { value_type }, Value::Object(obj)) => Value::Object(
            obj.iter()
                .map(|(k, v)| (k.clone(), to_external(v, value_type)))
                .collect(),
        ),
        (FieldType::Nullable { inner }, v) if !v.is_null() => to_external(v, inner),
        _ => value.clone(),
    }
}

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "int"
            } else {
                "float"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Creates a field path from prefix and field name.
pub(crate) fn make_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", prefix, field)
    }
}

fn type_error(field_path: &str, expected: &str, actual: &Value) -> ValidationDetails {
    ValidationDetails::type_mismatch(field_path, expected, json_type_name(actual))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::required("name", FieldType::String),
            FieldSpec::with_default("age", FieldType::Int, 0),
            FieldSpec::optional("nickname", FieldType::String).alias("nick"),
        ]
    }

    fn obj(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_valid_object_passes() {
        let out = validate_fields(&fields(), &obj(json!({"name": "Alice", "age": 5})), "").unwrap();
        assert_eq!(Value::Object(out), json!({"name": "Alice", "age": 5}));
    }

    #[test]
    fn test_default_filled_for_absent_optional() {
        let out = validate_fields(&fields(), &obj(json!({"name": "Bob"})), "").unwrap();
        assert_eq!(out.get("age"), Some(&json!(0)));
        // optional without default stays absent
        assert!(!out.contains_key("nickname"));
    }

    #[test]
    fn test_alias_rekeyed_to_name() {
        let input = obj(json!({"name": "Bob", "nick": "b"}));
        let out = validate_fields(&fields(), &input, "").unwrap();
        assert_eq!(out.get("nickname"), Some(&json!("b")));
        assert!(!out.contains_key("nick"));
    }

    #[test]
    fn test_name_is_not_an_alias() {
        let input = obj(json!({"name": "Bob", "nickname": "b"}));
        let out = validate_fields(&fields(), &input, "").unwrap();
        assert!(!out.contains_key("nickname"));
    }

    #[test]
    fn test_missing_required_field_fails() {
        let err = validate_fields(&fields(), &obj(json!({"age": 3})), "").unwrap_err();
        assert_eq!(err, ValidationDetails::missing_field("name"));
    }

    #[test]
    fn test_extra_field_ignored() {
        let out = validate_fields(&fields(), &obj(json!({"name": "A", "unknown": 1})), "").unwrap();
        assert!(!out.contains_key("unknown"));
    }

    #[test]
    fn test_type_mismatch_fails() {
        let err = validate_fields(&fields(), &obj(json!({"name": 123})), "").unwrap_err();
        assert_eq!(err.field, "name");
        assert_eq!(err.expected, "string");
        assert_eq!(err.actual, "int");
    }

    #[test]
    fn test_int_rejects_float() {
        let err = validate_value(&json!(1.5), &FieldType::Int, "age").unwrap_err();
        assert_eq!(err.actual, "float");
    }

    #[test]
    fn test_float_accepts_integers() {
        assert!(validate_value(&json!(100), &FieldType::Float, "score").is_ok());
        assert!(validate_value(&json!(99.5), &FieldType::Float, "score").is_ok());
        assert!(validate_value(&json!("1.5"), &FieldType::Float, "score").is_err());
    }

    #[test]
    fn test_float_normalized_to_f64() {
        let out = validate_value(&json!(0), &FieldType::Float, "ratio").unwrap();
        assert_eq!(out, json!(0.0));
        assert_eq!(out.to_string(), "0.0");
    }

    #[test]
    fn test_nested_default_filled_in() {
        let tls = FieldType::object(vec![FieldSpec::with_default("port", FieldType::Int, 443)]);
        let fields = vec![FieldSpec::with_default("tls", tls, json!({}))];

        let out = validate_fields(&fields, &Map::new(), "").unwrap();
        assert_eq!(out.get("tls"), Some(&json!({"port": 443})));
    }

    #[test]
    fn test_default_value_normalized() {
        let field = FieldSpec::with_default("ratio", FieldType::Float, 0);
        assert_eq!(default_value(&field, "ratio").unwrap(), Some(json!(0.0)));

        let field = FieldSpec::optional("ratio", FieldType::Float);
        assert_eq!(default_value(&field, "ratio").unwrap(), None);
    }

    #[test]
    fn test_null_only_for_nullable() {
        let err = validate_value(&Value::Null, &FieldType::Int, "age").unwrap_err();
        assert_eq!(err.actual, "null");

        let nullable = FieldType::nullable(FieldType::Int);
        assert_eq!(validate_value(&Value::Null, &nullable, "age").unwrap(), Value::Null);
        assert_eq!(validate_value(&json!(4), &nullable, "age").unwrap(), json!(4));
        assert!(validate_value(&json!("4"), &nullable, "age").is_err());
        assert!(validate_value(&Value::Null, &FieldType::Any, "x").is_ok());
    }

    #[test]
    fn test_literal_membership() {
        let role = FieldType::literal(["read", "write", "all"]);
        assert!(validate_value(&json!("read"), &role, "role").is_ok());
        let err = validate_value(&json!("backend"), &role, "role").unwrap_err();
        assert!(err.expected.starts_with("one of"));
    }

    #[test]
    fn test_nested_object_validation() {
        let s3 = FieldType::object(vec![
            FieldSpec::required("bucket", FieldType::String),
            FieldSpec::required("access_key", FieldType::String).alias("access-key"),
        ]);

        let out = validate_value(&json!({"bucket": "b", "access-key": "k"}), &s3, "s3").unwrap();
        assert_eq!(out, json!({"bucket": "b", "access_key": "k"}));

        let err = validate_value(&json!({"bucket": "b"}), &s3, "s3").unwrap_err();
        assert_eq!(err.field, "s3.access_key");
    }

    #[test]
    fn test_array_element_validation() {
        let tags = FieldType::array_of(FieldType::String);
        assert!(validate_value(&json!(["rust", "db"]), &tags, "tags").is_ok());
        let err = validate_value(&json!(["rust", 123]), &tags, "tags").unwrap_err();
        assert_eq!(err.field, "tags[1]");
    }

    #[test]
    fn test_map_value_validation() {
        let ports = FieldType::map_of(FieldType::Int);
        assert!(validate_value(&json!({"http": 80, "grpc": 9095}), &ports, "ports").is_ok());
        let err = validate_value(&json!({"http": "80"}), &ports, "ports").unwrap_err();
        assert_eq!(err.field, "ports.http");
    }

    #[test]
    fn test_to_external_rekeys_nested() {
        let s3 = FieldType::object(vec![
            FieldSpec::required("access_key", FieldType::String).alias("access-key"),
        ]);
        let external = to_external(&json!({"access_key": "k", "stray": 1}), &s3);
        assert_eq!(external, json!({"access-key": "k"}));
    }

    #[test]
    fn test_json_type_names() {
        assert_eq!(json_type_name(&json!(null)), "null");
        assert_eq!(json_type_name(&json!(1)), "int");
        assert_eq!(json_type_name(&json!(1.5)), "float");
        assert_eq!(json_type_name(&json!([])), "array");
        assert_eq!(json_type_name(&json!({})), "object");
    }
}
