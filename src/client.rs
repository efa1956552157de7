// src/client.rs
use reqwest::Client;

use crate::config::AppConfig;
use crate::error::ClientError;
use crate::message::{ChatMessage, ChatResponse};
use crate::payload::{LocationFix, build_payload};

/// Sends chat turns to the messaging API's `POST /chat` endpoint.
#[derive(Debug, Clone)]
pub struct MessagingClient {
    http: Client,
    base_url: String,
}

impl MessagingClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http(Client::new(), base_url)
    }

    pub fn with_http(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self::with_http(http, config.messaging_api_url.clone()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the payload for this turn and post it as JSON.
    ///
    /// A malformed location fails before anything is sent.
    pub async fn send(
        &self,
        messages: &[ChatMessage],
        fix: LocationFix,
    ) -> Result<ChatResponse, ClientError> {
        let payload = build_payload(messages, fix)?;
        let url = format!("{}/chat", self.base_url);

        tracing::debug!(%url, location = payload.user_location.is_some(), "sending chat request");

        let response = self.http.post(&url).json(&payload).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), %body, "messaging API rejected request");
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<ChatResponse>().await?)
    }
}
