use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::error::ApiError;

/// A stored kitten record, keyed by `name`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Kitten {
    pub name: String,
    /// Stored as given; no type or range check is applied
    pub age: serde_json::Value,
}

/// Validated body of a create request
#[derive(Debug, Clone, PartialEq, utoipa::ToSchema)]
pub struct CreateKittenRequest {
    pub name: String,
    pub age: serde_json::Value,
}

/// Validated body of an update request
#[derive(Debug, Clone, PartialEq, utoipa::ToSchema)]
pub struct UpdateKittenRequest {
    pub age: serde_json::Value,
}

impl CreateKittenRequest {
    pub fn from_body(raw: &[u8]) -> Result<Self, ApiError> {
        let mut body = parse_object(raw)?;
        let name = match take_field(&mut body, "name")? {
            JsonValue::String(name) => name,
            other => {
                return Err(ApiError::InvalidBody(format!(
                    "field 'name' must be a string, got {}",
                    other
                )));
            }
        };
        let age = take_field(&mut body, "age")?;
        Ok(Self { name, age })
    }

    pub fn into_kitten(self) -> Kitten {
        Kitten {
            name: self.name,
            age: self.age,
        }
    }
}

impl UpdateKittenRequest {
    pub fn from_body(raw: &[u8]) -> Result<Self, ApiError> {
        let mut body = parse_object(raw)?;
        let age = take_field(&mut body, "age")?;
        Ok(Self { age })
    }
}

/// Parse raw request bytes into a JSON object; bytes that are not UTF-8 are invalid JSON.
fn parse_object(raw: &[u8]) -> Result<Map<String, JsonValue>, ApiError> {
    match serde_json::from_slice::<JsonValue>(raw)? {
        JsonValue::Object(map) => Ok(map),
        other => Err(ApiError::InvalidBody(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

/// Presence check only: `0`, `""`, `false` and `null` all count as present.
fn take_field(body: &mut Map<String, JsonValue>, field: &'static str) -> Result<JsonValue, ApiError> {
    body.remove(field).ok_or(ApiError::MissingField(field))
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
