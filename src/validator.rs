// src/validator.rs
//! Structural checks on a raw JSON request body.
//!
//! Runs against `serde_json::Value` so problems are reported by key, before
//! any typed deserialization happens.

use serde_json::{Map, Value};

use crate::error::PayloadError;
use crate::message::{Coordinate, MessageRole, RequestPayload};

pub const USER_LOCATION_KEY: &str = "userLocation";
pub const MESSAGES_KEY: &str = "messages";

pub fn validate_payload(value: &Value) -> Result<(), PayloadError> {
    let obj = value
        .as_object()
        .ok_or_else(|| PayloadError::SchemaMismatch("payload must be a JSON object".into()))?;

    validate_messages(obj)?;

    match obj.get(USER_LOCATION_KEY) {
        None => Err(PayloadError::SchemaMismatch(format!(
            "`{USER_LOCATION_KEY}` key is missing"
        ))),
        Some(Value::Null) => Ok(()),
        Some(Value::Object(location)) => validate_location(location),
        Some(other) => Err(PayloadError::SchemaMismatch(format!(
            "`{USER_LOCATION_KEY}` must be an object or null, got {}",
            type_name(other)
        ))),
    }
}

fn validate_messages(obj: &Map<String, Value>) -> Result<(), PayloadError> {
    let messages = obj
        .get(MESSAGES_KEY)
        .and_then(Value::as_array)
        .ok_or_else(|| {
            PayloadError::SchemaMismatch(format!("`{MESSAGES_KEY}` must be an array"))
        })?;

    for (i, msg) in messages.iter().enumerate() {
        for field in ["role", "content"] {
            if !msg.get(field).is_some_and(Value::is_string) {
                return Err(PayloadError::SchemaMismatch(format!(
                    "messages[{i}].{field} must be a string"
                )));
            }
        }

        let role = msg.get("role").and_then(Value::as_str).unwrap_or_default();
        if MessageRole::from_wire(role).is_none() {
            return Err(PayloadError::SchemaMismatch(format!(
                "messages[{i}].role `{role}` is not one of user, assistant, system"
            )));
        }
    }
    Ok(())
}

fn validate_location(location: &Map<String, Value>) -> Result<(), PayloadError> {
    let mut components = [0.0; 2];
    for (slot, key) in components.iter_mut().zip(["lat", "lng"]) {
        match location.get(key) {
            Some(Value::Number(n)) => {
                *slot = n.as_f64().ok_or_else(|| {
                    PayloadError::MalformedCoordinate(format!(
                        "`{USER_LOCATION_KEY}.{key}` is not representable as f64"
                    ))
                })?;
            }
            Some(v) => {
                return Err(PayloadError::SchemaMismatch(format!(
                    "`{USER_LOCATION_KEY}.{key}` must be a number, got {}",
                    type_name(v)
                )));
            }
            None => {
                return Err(PayloadError::MalformedCoordinate(format!(
                    "`{USER_LOCATION_KEY}.{key}` is missing"
                )));
            }
        }
    }

    let extra = location.keys().find(|k| k.as_str() != "lat" && k.as_str() != "lng");
    if let Some(extra) = extra {
        return Err(PayloadError::SchemaMismatch(format!(
            "unexpected key `{USER_LOCATION_KEY}.{extra}`"
        )));
    }

    let [lat, lng] = components;
    Coordinate::new(lat, lng).map(|_| ())
}

/// Validate a request body, then decode it into a [`RequestPayload`].
pub fn parse_payload(bytes: &[u8]) -> Result<RequestPayload, PayloadError> {
    let value: Value = serde_json::from_slice(bytes)?;
    validate_payload(&value)?;
    Ok(serde_json::from_value(value)?)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
