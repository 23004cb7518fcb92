//! YouTube search implementation.

use super::{SearchHit, VideoSearch};
use crate::error::{OmtaleError, Result};
use async_trait::async_trait;
use tracing::debug;

/// YouTube video search backed by yt-dlp's `ytsearch` pseudo-URL.
pub struct YoutubeSearch;

impl YoutubeSearch {
    pub fn new() -> Self {
        Self
    }

    /// Parse one line of `--dump-json --flat-playlist` output into a hit.
    ///
    /// Lines without a video id are skipped (presence check only; no further
    /// validation of the platform response).
    fn parse_hit(line: &str) -> Option<SearchHit> {
        let json: serde_json::Value = serde_json::from_str(line).ok()?;

        let id = json["id"].as_str()?.to_string();

        let channel = json["channel"]
            .as_str()
            .or_else(|| json["uploader"].as_str())
            .unwrap_or("Unknown Channel")
            .to_string();

        let title = json["title"]
            .as_str()
            .unwrap_or("Unknown Title")
            .to_string();

        Some(SearchHit { id, channel, title })
    }
}

impl Default for YoutubeSearch {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VideoSearch for YoutubeSearch {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>> {
        let search_url = format!("ytsearch{}:{}", max_results, query);

        let output = tokio::process::Command::new("yt-dlp")
            .args([
                "--dump-json",
                "--no-download",
                "--no-warnings",
                "--flat-playlist",
                &search_url,
            ])
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    OmtaleError::ToolNotFound("yt-dlp".to_string())
                } else {
                    OmtaleError::Search(format!("Failed to run yt-dlp: {}", e))
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OmtaleError::Search(format!(
                "Search for '{}' failed: {}",
                query, stderr
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let hits: Vec<SearchHit> = stdout
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(Self::parse_hit)
            .collect();

        debug!("Search for '{}' returned {} hits", query, hits.len());

        Ok(hits)
    }
}
