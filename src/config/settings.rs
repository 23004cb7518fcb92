//! Configuration settings for Omtale.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub search: SearchSettings,
    pub chat: ChatSettings,
    pub prompt: PromptSettings,
}


/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for storing application data.
    pub data_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: "~/.omtale".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Video search settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Default number of review videos to collect when the caller does not
    /// say otherwise.
    pub default_reviews: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self { default_reviews: 5 }
    }
}

/// Chat service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatSettings {
    /// Base URL of the chat API.
    pub base_url: String,
    /// Request timeout in seconds. Summaries of many long transcripts can
    /// take a while to generate.
    pub timeout_seconds: u64,
    /// Path to the session token file.
    pub credential_path: String,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            base_url: "https://claude.ai/api".to_string(),
            timeout_seconds: 300,
            credential_path: "~/.omtale/cookie.txt".to_string(),
        }
    }
}

/// Prompt template settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Path to a custom prompt template file. When unset, the bundled
    /// default template is used.
    pub template_path: Option<String>,
}


impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("omtale")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded data directory path.
    pub fn data_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.data_dir)
    }

    /// Get the expanded session token file path.
    pub fn credential_path(&self) -> PathBuf {
        Self::expand_path(&self.chat.credential_path)
    }

    /// Get the expanded custom template path, if configured.
    pub fn template_path(&self) -> Option<PathBuf> {
        self.prompt
            .template_path
            .as_deref()
            .map(Self::expand_path)
    }
}
