//! Error types for Omtale.

use thiserror::Error;

/// Library-level error type for Omtale operations.
#[derive(Error, Debug)]
pub enum OmtaleError {
    /// A pipeline operation was invoked before its predecessor populated the
    /// state it needs. Never auto-recovered; callers either follow the
    /// documented sequence or catch and report this.
    #[error("{0}")]
    Precondition(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Credential error: {0}")]
    Credential(String),

    #[error("Prompt template error: {0}")]
    Template(String),

    #[error("Video search failed: {0}")]
    Search(String),

    #[error("Transcript retrieval failed: {0}")]
    Transcript(String),

    #[error("Chat service error: {0}")]
    Chat(String),

    /// The chat account's message quota is exhausted (HTTP 429). Surfaced as
    /// its own variant so drivers can message the user distinctly; the
    /// pipeline itself never catches it.
    #[error("Chat message limit reached; try again later")]
    MessageLimit,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("External tool not found: {0}. Please install it and ensure it's in your PATH.")]
    ToolNotFound(String),

    #[error("External tool failed: {0}")]
    ToolFailed(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for Omtale operations.
pub type Result<T> = std::result::Result<T, OmtaleError>;
