// src/error.rs
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;
use thiserror::Error;

/// Violations of the chat request payload contract.
#[derive(Debug, Error)]
pub enum PayloadError {
    /// A coordinate with a missing or non-finite component.
    #[error("malformed coordinate: {0}")]
    MalformedCoordinate(String),

    #[error("coordinate out of range: lat={lat}, lng={lng}")]
    CoordinateOutOfRange { lat: f64, lng: f64 },

    /// The JSON document does not have the shape the contract requires.
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Payload(#[from] PayloadError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match self {
            AppError::BadRequest(_) | AppError::Payload(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, "request rejected");
        }

        let body = Json(json!({
            "message": self.to_string()
        }));

        (status, body).into_response()
    }
}

/// Errors surfaced by [`crate::client::MessagingClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Payload(#[from] PayloadError),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("messaging API returned status {status}: {body}")]
    Status { status: u16, body: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value}")]
    InvalidValue { var: String, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn payload_errors_map_to_bad_request() {
        let err = AppError::from(PayloadError::SchemaMismatch("missing key".into()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["message"], "schema mismatch: missing key");
    }

    #[test]
    fn internal_error_is_500() {
        let response = AppError::Internal("boom".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
