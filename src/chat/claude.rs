//! Claude web API client.
//!
//! Talks to the claude.ai web endpoints with a session cookie: look up the
//! organization, open a conversation, and stream a completion. The reply
//! arrives as server-sent events; we accumulate the `completion` fragments
//! into one string.

use super::{ChatProvider, Session};
use crate::config::ChatSettings;
use crate::credentials::Credentials;
use crate::error::{OmtaleError, Result};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, instrument};
use uuid::Uuid;

/// Browser user agent; the web endpoints reject unknown clients.
const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:124.0) Gecko/20100101 Firefox/124.0";

/// Client for the Claude web chat API.
pub struct ClaudeWebClient {
    client: reqwest::Client,
    base_url: String,
    credentials: Credentials,
}

impl ClaudeWebClient {
    /// Create a client with the configured timeout.
    pub fn new(settings: &ChatSettings, credentials: Credentials) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .user_agent(USER_AGENT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            credentials,
        }
    }

    /// Look up the organization the session token belongs to.
    async fn organization_id(&self) -> Result<String> {
        let url = format!("{}/organizations", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("Cookie", self.credentials.cookie())
            .send()
            .await?;

        let response = check_status(response)?;
        let json: serde_json::Value = response.json().await?;

        json.as_array()
            .and_then(|orgs| orgs.first())
            .and_then(|org| org["uuid"].as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| {
                OmtaleError::Chat("No organization for this session token".to_string())
            })
    }

    /// Pull the accumulated completion text out of an SSE body.
    fn parse_sse_reply(body: &str) -> String {
        let mut reply = String::new();
        for line in body.lines() {
            let Some(data) = line.strip_prefix("data:") else {
                continue;
            };
            if let Ok(json) = serde_json::from_str::<serde_json::Value>(data.trim()) {
                if let Some(fragment) = json["completion"].as_str() {
                    reply.push_str(fragment);
                }
            }
        }
        reply
    }
}

#[async_trait]
impl ChatProvider for ClaudeWebClient {
    #[instrument(skip(self))]
    async fn create_session(&self) -> Result<Session> {
        let organization_id = self.organization_id().await?;
        let conversation_id = Uuid::new_v4().to_string();

        let url = format!(
            "{}/organizations/{}/chat_conversations",
            self.base_url, organization_id
        );

        let response = self
            .client
            .post(&url)
            .header("Cookie", self.credentials.cookie())
            .json(&serde_json::json!({
                "uuid": conversation_id,
                "name": "",
            }))
            .send()
            .await?;

        check_status(response)?;
        debug!("Created conversation {}", conversation_id);

        Ok(Session {
            organization_id,
            conversation_id,
        })
    }

    #[instrument(skip(self, text), fields(chars = text.len()))]
    async fn send_message(&self, session: &Session, text: &str) -> Result<String> {
        let url = format!(
            "{}/organizations/{}/chat_conversations/{}/completion",
            self.base_url, session.organization_id, session.conversation_id
        );

        let response = self
            .client
            .post(&url)
            .header("Cookie", self.credentials.cookie())
            .header("Accept", "text/event-stream")
            .json(&serde_json::json!({
                "prompt": text,
                "timezone": "UTC",
                "attachments": [],
            }))
            .send()
            .await?;

        let response = check_status(response)?;

        // Stream the SSE body to completion before parsing; the reply can be
        // long and arrives in many chunks.
        let mut body = String::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            body.push_str(&String::from_utf8_lossy(&chunk));
        }

        let reply = Self::parse_sse_reply(&body);
        if reply.is_empty() {
            return Err(OmtaleError::Chat("Empty reply from chat service".to_string()));
        }

        Ok(reply)
    }
}

/// Map non-success statuses to errors, keeping quota exhaustion distinct.
fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    match response.status() {
        status if status.is_success() => Ok(response),
        StatusCode::TOO_MANY_REQUESTS => Err(OmtaleError::MessageLimit),
        status => Err(OmtaleError::Chat(format!(
            "Request failed with status {}",
            status
        ))),
    }
}
