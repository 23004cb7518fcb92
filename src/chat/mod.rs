//! Conversational AI abstraction for Omtale.
//!
//! Provides a trait-based interface for the chat service that turns the
//! assembled review prompt into a summary.

mod claude;

pub use claude::ClaudeWebClient;

use crate::error::Result;
use async_trait::async_trait;

/// A single conversation context with the chat service.
///
/// Sessions are created fresh per pipeline run and never reused.
#[derive(Debug, Clone)]
pub struct Session {
    /// Account/organization the conversation belongs to.
    pub organization_id: String,
    /// Conversation identifier within the organization.
    pub conversation_id: String,
}

/// Trait for conversational AI providers.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Create a fresh conversation session.
    async fn create_session(&self) -> Result<Session>;

    /// Send a message within a session and return the reply text.
    async fn send_message(&self, session: &Session, text: &str) -> Result<String>;
}
