//! Pre-flight checks before expensive operations.
//!
//! Validates that required tools and configuration are available before
//! starting operations that would otherwise fail midway.

use crate::config::Settings;
use crate::error::{OmtaleError, Result};
use std::process::Command;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Full summarization requires yt-dlp and the chat credential.
    Summarize,
    /// Prompt assembly only requires yt-dlp.
    Prompt,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Summarize => {
            check_tool("yt-dlp")?;
            check_credential(settings)?;
        }
        Operation::Prompt => {
            check_tool("yt-dlp")?;
        }
    }
    Ok(())
}

/// Check if the chat credential file exists and is non-empty.
pub fn check_credential(settings: &Settings) -> Result<()> {
    let path = settings.credential_path();
    crate::credentials::Credentials::acquire(&path).map(|_| ()).map_err(|_| {
        OmtaleError::Config(format!(
            "Chat session token not found. Put your claude.ai session cookie in {}",
            path.display()
        ))
    })
}

/// Check if an external tool is available on PATH.
pub fn check_tool(name: &str) -> Result<()> {
    match Command::new(name).arg("--version").output() {
        Ok(output) if output.status.success() => Ok(()),
        Ok(_) => Err(OmtaleError::ToolFailed(format!(
            "{} is installed but not working",
            name
        ))),
        Err(_) => Err(OmtaleError::ToolNotFound(name.to_string())),
    }
}

/// Get an external tool's version string, if available.
pub fn tool_version(name: &str) -> Option<String> {
    let output = Command::new(name).arg("--version").output().ok()?;
    if !output.status.success() {
        return None;
    }
    let version = String::from_utf8_lossy(&output.stdout);
    version.lines().next().map(|l| l.trim().to_string())
}
