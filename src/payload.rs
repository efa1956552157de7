// src/payload.rs
//! Builds the request body for one outbound chat turn.

use crate::error::PayloadError;
use crate::message::{ChatMessage, Coordinate, RequestPayload};

/// An unvalidated reading handed over by the location subsystem.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RawCoordinate {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl RawCoordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat: Some(lat),
            lng: Some(lng),
        }
    }
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = PayloadError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        match (raw.lat, raw.lng) {
            (Some(lat), Some(lng)) => Coordinate::new(lat, lng),
            (Some(_), None) => Err(PayloadError::MalformedCoordinate("lng is missing".into())),
            (None, Some(_)) => Err(PayloadError::MalformedCoordinate("lat is missing".into())),
            (None, None) => Err(PayloadError::MalformedCoordinate(
                "lat and lng are missing".into(),
            )),
        }
    }
}

/// What location acquisition resolved to by the time a message is sent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LocationFix {
    Available(RawCoordinate),
    Denied,
    Unavailable,
    Pending,
}

impl From<Option<Coordinate>> for LocationFix {
    fn from(value: Option<Coordinate>) -> Self {
        match value {
            Some(c) => LocationFix::Available(RawCoordinate::new(c.lat(), c.lng())),
            None => LocationFix::Unavailable,
        }
    }
}

impl From<Coordinate> for LocationFix {
    fn from(value: Coordinate) -> Self {
        Some(value).into()
    }
}

/// Assemble a [`RequestPayload`] from the conversation and a location fix.
///
/// Messages are copied in order. A fix that is not `Available` yields an
/// explicit `null` location; an `Available` fix with a missing component is
/// rejected instead of being dropped.
pub fn build_payload(
    messages: &[ChatMessage],
    fix: LocationFix,
) -> Result<RequestPayload, PayloadError> {
    let user_location = match fix {
        LocationFix::Available(raw) => Some(Coordinate::try_from(raw)?),
        LocationFix::Denied | LocationFix::Unavailable | LocationFix::Pending => None,
    };

    tracing::debug!(
        messages = messages.len(),
        location = user_location.is_some(),
        ?fix,
        "built chat request payload"
    );

    Ok(RequestPayload {
        messages: messages.to_vec(),
        user_location,
    })
}
