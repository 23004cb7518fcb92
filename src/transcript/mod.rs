//! Transcript retrieval and normalization for Omtale.
//!
//! Provides a trait-based interface for fetching video transcripts, plus the
//! formatting helpers that turn a structured transcript into the single-line
//! text the prompt assembly expects.

mod youtube;

pub use youtube::YoutubeTranscripts;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One timed line of spoken text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptLine {
    /// Spoken text for this line.
    pub text: String,
    /// Start time in seconds.
    pub start_seconds: f64,
}

/// The full spoken-text content of a video, as structured timed lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    /// Video this transcript belongs to.
    pub video_id: String,
    /// Timed lines in playback order.
    pub lines: Vec<TranscriptLine>,
}

impl Transcript {
    /// Format the structured transcript as a newline-delimited text blob.
    pub fn to_text(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Replace every line-break character with a single space.
///
/// This is the entire normalization rule: repeated spaces are not collapsed
/// and nothing is trimmed, so the output has the same length as the input.
pub fn flatten_lines(transcript: &str) -> String {
    transcript.replace(['\n', '\r'], " ")
}

/// Trait for transcript providers.
#[async_trait]
pub trait TranscriptProvider: Send + Sync {
    /// Fetch the transcript for a video by id.
    ///
    /// Videos without transcripts (captions disabled, private, removed)
    /// produce an error; the pipeline propagates it unhandled.
    async fn fetch(&self, video_id: &str) -> Result<Transcript>;
}

/// Mapping from channel display name to normalized transcript text.
///
/// Keeps insertion order for prompt assembly. Channel names are not
/// guaranteed unique: inserting an existing channel overwrites its text in
/// place (last write wins, original position retained), matching how the
/// review blocks should read when two hits come from the same channel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranscriptMap {
    entries: Vec<(String, String)>,
}

impl TranscriptMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the transcript for a channel.
    pub fn insert(&mut self, channel: impl Into<String>, text: impl Into<String>) {
        let channel = channel.into();
        let text = text.into();
        match self.entries.iter_mut().find(|(c, _)| *c == channel) {
            Some(entry) => entry.1 = text,
            None => self.entries.push((channel, text)),
        }
    }

    /// Look up the transcript for a channel.
    pub fn get(&self, channel: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(c, _)| c == channel)
            .map(|(_, t)| t.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate (channel, transcript) pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries.iter().map(|(c, t)| (c.as_str(), t.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_text_joins_lines_with_newlines() {
        let transcript = Transcript {
            video_id: "abc".to_string(),
            lines: vec![
                TranscriptLine {
                    text: "Great product".to_string(),
                    start_seconds: 0.0,
                },
                TranscriptLine {
                    text: "Really liked it".to_string(),
                    start_seconds: 2.5,
                },
            ],
        };
        assert_eq!(transcript.to_text(), "Great product\nReally liked it");
    }

    #[test]
    fn test_flatten_lines_replaces_breaks_with_spaces() {
        assert_eq!(flatten_lines("a\nb\nc"), "a b c");
        assert_eq!(flatten_lines("a\r\nb"), "a  b");
    }

    #[test]
    fn test_flatten_lines_idempotent_without_breaks() {
        let flat = "already  one line, spaces kept ";
        assert_eq!(flatten_lines(flat), flat);
    }

    #[test]
    fn test_flatten_lines_preserves_length() {
        let input = "first\nsecond\n\nfourth";
        let output = flatten_lines(input);
        assert_eq!(output.len(), input.len());
        assert!(!output.contains('\n'));
        assert!(!output.contains('\r'));
    }

    #[test]
    fn test_map_keeps_insertion_order() {
        let mut map = TranscriptMap::new();
        map.insert("Zeta", "z");
        map.insert("Alpha", "a");
        let channels: Vec<&str> = map.iter().map(|(c, _)| c).collect();
        assert_eq!(channels, vec!["Zeta", "Alpha"]);
    }

    #[test]
    fn test_map_overwrites_duplicate_channel_in_place() {
        let mut map = TranscriptMap::new();
        map.insert("ReviewGuy", "first take");
        map.insert("OtherChannel", "other");
        map.insert("ReviewGuy", "second take");

        assert_eq!(map.len(), 2);
        assert_eq!(map.get("ReviewGuy"), Some("second take"));

        let channels: Vec<&str> = map.iter().map(|(c, _)| c).collect();
        assert_eq!(channels, vec!["ReviewGuy", "OtherChannel"]);
    }
}
