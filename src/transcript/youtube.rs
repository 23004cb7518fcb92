//! YouTube transcript retrieval.
//!
//! YouTube serves captions as separate tracks listed in the video metadata.
//! We resolve the track list with yt-dlp, pick an English track (manual
//! captions preferred over auto-generated ones), and fetch it in the json3
//! timed-text format.

use super::{Transcript, TranscriptLine, TranscriptProvider};
use crate::error::{OmtaleError, Result};
use async_trait::async_trait;
use regex::Regex;
use tracing::debug;
use url::Url;

/// Caption languages we accept, in preference order.
const LANGUAGES: &[&str] = &["en", "en-US", "en-GB", "en-orig"];

/// YouTube transcript provider.
pub struct YoutubeTranscripts {
    client: reqwest::Client,
    video_id_regex: Regex,
}

impl YoutubeTranscripts {
    pub fn new() -> Self {
        let video_id_regex = Regex::new(r"^[a-zA-Z0-9_-]{11}$").expect("Invalid regex");

        Self {
            client: reqwest::Client::new(),
            video_id_regex,
        }
    }

    /// Resolve the caption track URL for a video from its yt-dlp metadata.
    ///
    /// Manual subtitles win over automatic captions; within each, the first
    /// matching language from `LANGUAGES` wins.
    fn select_track(metadata: &serde_json::Value) -> Option<String> {
        for field in ["subtitles", "automatic_captions"] {
            let Some(tracks) = metadata[field].as_object() else {
                continue;
            };
            for lang in LANGUAGES {
                if let Some(formats) = tracks.get(*lang).and_then(|v| v.as_array()) {
                    // Prefer a native json3 URL, else take any and re-request
                    // it as json3 below.
                    let track = formats
                        .iter()
                        .find(|f| f["ext"].as_str() == Some("json3"))
                        .or_else(|| formats.first());
                    if let Some(url) = track.and_then(|t| t["url"].as_str()) {
                        return Some(url.to_string());
                    }
                }
            }
        }
        None
    }

    /// Parse a json3 timed-text document into transcript lines.
    fn parse_json3(video_id: &str, body: &str) -> Result<Transcript> {
        let json: serde_json::Value = serde_json::from_str(body)?;

        let events = json["events"].as_array().ok_or_else(|| {
            OmtaleError::Transcript(format!("Malformed caption data for video {}", video_id))
        })?;

        let mut lines = Vec::new();
        for event in events {
            let Some(segs) = event["segs"].as_array() else {
                continue;
            };

            let text: String = segs
                .iter()
                .filter_map(|s| s["utf8"].as_str())
                .collect::<Vec<_>>()
                .join("")
                .trim()
                .to_string();

            if text.is_empty() {
                continue;
            }

            let start_seconds = event["tStartMs"].as_f64().unwrap_or(0.0) / 1000.0;

            lines.push(TranscriptLine {
                text,
                start_seconds,
            });
        }

        Ok(Transcript {
            video_id: video_id.to_string(),
            lines,
        })
    }

    /// Fetch video metadata (including caption track lists) via yt-dlp.
    async fn fetch_metadata(&self, video_id: &str) -> Result<serde_json::Value> {
        let url = format!("https://www.youtube.com/watch?v={}", video_id);

        let output = tokio::process::Command::new("yt-dlp")
            .args(["--dump-json", "--no-download", "--no-warnings", &url])
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    OmtaleError::ToolNotFound("yt-dlp".to_string())
                } else {
                    OmtaleError::Transcript(format!("Failed to run yt-dlp: {}", e))
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OmtaleError::Transcript(format!(
                "Video {} not found or unavailable: {}",
                video_id, stderr
            )));
        }

        let json_str = String::from_utf8_lossy(&output.stdout);
        serde_json::from_str(&json_str).map_err(|e| {
            OmtaleError::Transcript(format!("Failed to parse yt-dlp output: {}", e))
        })
    }
}

impl Default for YoutubeTranscripts {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TranscriptProvider for YoutubeTranscripts {
    async fn fetch(&self, video_id: &str) -> Result<Transcript> {
        if !self.video_id_regex.is_match(video_id) {
            return Err(OmtaleError::InvalidInput(format!(
                "Invalid YouTube video ID: {}",
                video_id
            )));
        }

        let metadata = self.fetch_metadata(video_id).await?;

        let track_url = Self::select_track(&metadata).ok_or_else(|| {
            OmtaleError::Transcript(format!(
                "Video {} has no English transcript (captions disabled or missing)",
                video_id
            ))
        })?;

        // Force the json3 format regardless of what the track list offered.
        let mut track_url = Url::parse(&track_url)
            .map_err(|e| OmtaleError::Transcript(format!("Bad caption URL: {}", e)))?;
        let query: Vec<(String, String)> = track_url
            .query_pairs()
            .filter(|(k, _)| k != "fmt")
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        track_url
            .query_pairs_mut()
            .clear()
            .extend_pairs(query)
            .append_pair("fmt", "json3");

        debug!("Fetching caption track for {}", video_id);

        let response = self.client.get(track_url).send().await?;
        if !response.status().is_success() {
            return Err(OmtaleError::Transcript(format!(
                "Caption fetch for {} failed with status {}",
                video_id,
                response.status()
            )));
        }

        let body = response.text().await?;
        Self::parse_json3(video_id, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json3() {
        let body = r#"{
            "events": [
                {"tStartMs": 0, "segs": [{"utf8": "Great "}, {"utf8": "product"}]},
                {"tStartMs": 1200},
                {"tStartMs": 2500, "segs": [{"utf8": "Really liked it"}]},
                {"tStartMs": 4000, "segs": [{"utf8": "\n"}]}
            ]
        }"#;

        let transcript = YoutubeTranscripts::parse_json3("abc12345678", body).unwrap();
        assert_eq!(transcript.lines.len(), 2);
        assert_eq!(transcript.lines[0].text, "Great product");
        assert_eq!(transcript.lines[0].start_seconds, 0.0);
        assert_eq!(transcript.lines[1].text, "Really liked it");
        assert_eq!(transcript.lines[1].start_seconds, 2.5);
    }

    #[test]
    fn test_parse_json3_rejects_malformed_body() {
        let result = YoutubeTranscripts::parse_json3("abc12345678", r#"{"no_events": true}"#);
        assert!(matches!(result, Err(OmtaleError::Transcript(_))));
    }

    #[test]
    fn test_select_track_prefers_manual_subtitles() {
        let metadata = serde_json::json!({
            "subtitles": {
                "en": [{"ext": "json3", "url": "https://example.com/manual"}]
            },
            "automatic_captions": {
                "en": [{"ext": "json3", "url": "https://example.com/auto"}]
            }
        });
        assert_eq!(
            YoutubeTranscripts::select_track(&metadata).as_deref(),
            Some("https://example.com/manual")
        );
    }

    #[test]
    fn test_select_track_falls_back_to_auto_captions() {
        let metadata = serde_json::json!({
            "subtitles": {},
            "automatic_captions": {
                "en": [{"ext": "vtt", "url": "https://example.com/auto"}]
            }
        });
        assert_eq!(
            YoutubeTranscripts::select_track(&metadata).as_deref(),
            Some("https://example.com/auto")
        );
    }

    #[test]
    fn test_select_track_none_without_tracks() {
        let metadata = serde_json::json!({"subtitles": {}, "automatic_captions": {}});
        assert_eq!(YoutubeTranscripts::select_track(&metadata), None);
    }
}
