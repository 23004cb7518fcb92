//! Chat service credential acquisition.
//!
//! The chat client authenticates with a session token kept in a plain-text
//! file. The token is acquired once, up front, with a scoped read (open,
//! read in full, release) and injected into the client so tests can supply
//! a token without touching the filesystem.

use crate::error::{OmtaleError, Result};
use std::path::Path;

/// A session token for the conversational AI service.
#[derive(Debug, Clone)]
pub struct Credentials {
    token: String,
}

impl Credentials {
    /// Read the token file in full and hold its contents for the instance's
    /// lifetime. Surrounding whitespace (trailing newline, usually) is
    /// stripped.
    pub fn acquire(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            OmtaleError::Credential(format!(
                "Failed to read token file {}: {}",
                path.display(),
                e
            ))
        })?;

        let token = raw.trim().to_string();
        if token.is_empty() {
            return Err(OmtaleError::Credential(format!(
                "Token file {} is empty",
                path.display()
            )));
        }

        Ok(Self { token })
    }

    /// Build credentials directly from a token string.
    pub fn from_token(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Cookie header value for the chat service.
    ///
    /// Token files may hold either a bare session key or a full cookie
    /// string copied from a browser.
    pub fn cookie(&self) -> String {
        if self.token.contains('=') {
            self.token.clone()
        } else {
            format!("sessionKey={}", self.token)
        }
    }
}
