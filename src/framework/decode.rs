//! Schema-directed decoding of configuration payloads
//!
//! The host hands each Read a JSON object of configured attribute values.
//! Before the payload is deserialized into the data source's record it is
//! checked against the schema, and every violation is reported as its own
//! `ConfigDecodeError` diagnostic.

use super::diag::{Diagnostic, Diagnostics};
use super::schema::{Model, Role, Schema};
use crate::error::DataSourceError;
use serde_json::Value;

static NULL: Value = Value::Null;

/// Decode `payload` into `M`, validating it against `schema` first
pub fn decode_config<M: Model>(schema: &Schema, payload: &Value) -> Result<M, Diagnostics> {
    let mut diags = Diagnostics::new();

    let object = match payload {
        Value::Object(map) => map,
        Value::Null => {
            // An absent block behaves like an empty one; required checks still apply
            return decode_config(schema, &Value::Object(Default::default()));
        }
        other => {
            diags.push(DataSourceError::ConfigDecode(format!(
                "expected a configuration object, got {}",
                json_type(other)
            )));
            return Err(diags);
        }
    };

    for key in object.keys() {
        if schema.attribute(key).is_none() {
            diags.push(DataSourceError::ConfigDecode(format!(
                "unsupported attribute {:?}",
                key
            )));
        }
    }

    for attr in &schema.attributes {
        let value = object.get(attr.name).unwrap_or(&NULL);
        match (attr.role, value) {
            (Role::Required, Value::Null) => {
                diags.push(DataSourceError::ConfigDecode(format!(
                    "the attribute {:?} is required, but no definition was found",
                    attr.name
                )));
            }
            (Role::Computed, v) if !v.is_null() => {
                diags.push(DataSourceError::ConfigDecode(format!(
                    "the attribute {:?} is computed and cannot be configured",
                    attr.name
                )));
            }
            (_, Value::Null) => {}
            (_, v) if !attr.kind.accepts(v) => {
                diags.push(DataSourceError::ConfigDecode(format!(
                    "the attribute {:?} must be a {}, got {}",
                    attr.name,
                    attr.kind.type_name(),
                    json_type(v)
                )));
            }
            _ => {}
        }
    }

    if diags.has_error() {
        return Err(diags);
    }

    serde_json::from_value(Value::Object(object.clone())).map_err(|e| {
        Diagnostics::from(Diagnostic::from(DataSourceError::ConfigDecode(
            e.to_string(),
        )))
    })
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_i64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}
