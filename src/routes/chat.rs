use axum::{Json, body::Bytes};
use uuid::Uuid;

use crate::{
    error::AppError,
    message::ChatResponse,
    services::chatbot::generate_reply,
    validator::parse_payload,
};

/// `POST /chat`: validates the body against the payload contract and replies.
pub async fn chat_handler(body: Bytes) -> Result<Json<ChatResponse>, AppError> {
    let payload = parse_payload(&body)?;

    let last = payload
        .messages
        .last()
        .ok_or_else(|| AppError::BadRequest("messages cannot be empty".to_string()))?;

    if last.content.trim().is_empty() {
        return Err(AppError::BadRequest("Message cannot be empty".to_string()));
    }

    let request_id = Uuid::new_v4();
    let location_applied = payload.user_location.is_some();
    tracing::info!(
        %request_id,
        messages = payload.messages.len(),
        location_applied,
        "chat request"
    );

    let reply = generate_reply(&payload);

    Ok(Json(ChatResponse {
        request_id,
        reply,
        location_applied,
    }))
}
