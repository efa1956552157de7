// src/message.rs
//! Wire schema shared by the messaging client and the chat endpoint.
//!
//! Both sides serialize through these types, so the shape of a request body
//! is defined in exactly one place.

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::PayloadError;

pub const LAT_RANGE: std::ops::RangeInclusive<f64> = -90.0..=90.0;
pub const LNG_RANGE: std::ops::RangeInclusive<f64> = -180.0..=180.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

impl MessageRole {
    /// Look up a role by its wire name.
    pub fn from_wire(name: &str) -> Option<Self> {
        match name {
            "user" => Some(MessageRole::User),
            "assistant" => Some(MessageRole::Assistant),
            "system" => Some(MessageRole::System),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }
}

/// A validated geolocation point.
///
/// Always carries both components as finite numbers within the usual
/// latitude/longitude bounds. Serializes to exactly `{"lat": .., "lng": ..}`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CoordinateRepr")]
pub struct Coordinate {
    lat: f64,
    lng: f64,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct CoordinateRepr {
    lat: f64,
    lng: f64,
}

impl TryFrom<CoordinateRepr> for Coordinate {
    type Error = PayloadError;

    fn try_from(repr: CoordinateRepr) -> Result<Self, Self::Error> {
        Coordinate::new(repr.lat, repr.lng)
    }
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Result<Self, PayloadError> {
        if !lat.is_finite() || !lng.is_finite() {
            return Err(PayloadError::MalformedCoordinate(format!(
                "components must be finite numbers (lat={lat}, lng={lng})"
            )));
        }
        if !LAT_RANGE.contains(&lat) || !LNG_RANGE.contains(&lng) {
            return Err(PayloadError::CoordinateOutOfRange { lat, lng });
        }
        Ok(Self { lat, lng })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }
}

/// Body of `POST /chat`.
///
/// `user_location` is written as an explicit `null` when no location is
/// known, and the key is required when reading a payload back.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RequestPayload {
    pub messages: Vec<ChatMessage>,
    #[serde(rename = "userLocation", deserialize_with = "required_nullable")]
    pub user_location: Option<Coordinate>,
}

// Using `deserialize_with` turns off serde's implicit `None` for a missing
// `Option` field, so an absent key fails with "missing field".
fn required_nullable<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)
}

impl RequestPayload {
    pub fn last_user_message(&self) -> Option<&ChatMessage> {
        self.messages.iter().rev().find(|m| m.role == MessageRole::User)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub request_id: Uuid,
    pub reply: String,
    pub location_applied: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn role_is_lowercase_on_the_wire() {
        let msg = ChatMessage::assistant("hi");
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({"role": "assistant", "content": "hi"})
        );
    }

    #[test]
    fn unknown_role_is_rejected() {
        let result: Result<ChatMessage, _> =
            serde_json::from_value(json!({"role": "tool", "content": "x"}));
        assert!(result.is_err());
        assert_eq!(MessageRole::from_wire("tool"), None);
        assert_eq!(MessageRole::from_wire("system"), Some(MessageRole::System));
    }

    #[test]
    fn coordinate_rejects_non_finite() {
        assert!(matches!(
            Coordinate::new(f64::NAN, 1.0),
            Err(PayloadError::MalformedCoordinate(_))
        ));
        assert!(matches!(
            Coordinate::new(1.0, f64::INFINITY),
            Err(PayloadError::MalformedCoordinate(_))
        ));
    }

    #[test]
    fn coordinate_rejects_out_of_range() {
        assert!(matches!(
            Coordinate::new(90.5, 0.0),
            Err(PayloadError::CoordinateOutOfRange { .. })
        ));
        assert!(matches!(
            Coordinate::new(0.0, -180.1),
            Err(PayloadError::CoordinateOutOfRange { .. })
        ));
        assert!(Coordinate::new(-90.0, 180.0).is_ok());
    }

    #[test]
    fn coordinate_deserialize_requires_both_keys() {
        let partial: Result<Coordinate, _> = serde_json::from_value(json!({"lat": 10.0}));
        assert!(partial.is_err());

        let extra: Result<Coordinate, _> =
            serde_json::from_value(json!({"lat": 1.0, "lng": 2.0, "alt": 3.0}));
        assert!(extra.is_err());
    }

    #[test]
    fn coordinate_accepts_integer_components() {
        let coord: Coordinate = serde_json::from_value(json!({"lat": 40, "lng": -74})).unwrap();
        assert_eq!(coord.lat(), 40.0);
        assert_eq!(coord.lng(), -74.0);
    }

    #[test]
    fn missing_user_location_key_is_an_error() {
        let result: Result<RequestPayload, _> =
            serde_json::from_value(json!({"messages": [{"role": "user", "content": "hi"}]}));
        let err = result.unwrap_err().to_string();
        assert!(err.contains("userLocation"), "unexpected error: {err}");
    }

    #[test]
    fn null_user_location_reads_as_none() {
        let payload: RequestPayload =
            serde_json::from_value(json!({"messages": [], "userLocation": null})).unwrap();
        assert_eq!(payload.user_location, None);
    }

    #[test]
    fn last_user_message_skips_assistant_turns() {
        let payload = RequestPayload {
            messages: vec![ChatMessage::user("first"), ChatMessage::assistant("reply")],
            user_location: None,
        };
        assert_eq!(
            payload.last_user_message().map(|m| m.content.as_str()),
            Some("first")
        );
    }

    #[test]
    fn chat_response_uses_camel_case() {
        let resp = ChatResponse {
            request_id: Uuid::nil(),
            reply: "ok".into(),
            location_applied: true,
        };
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["locationApplied"], true);
        assert!(value.get("requestId").is_some());
    }
}
