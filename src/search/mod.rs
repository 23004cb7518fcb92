//! Video search abstraction for Omtale.
//!
//! Provides a trait-based interface for searching a video platform for
//! review videos.

mod youtube;

pub use youtube::YoutubeSearch;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One entry in a video search result sequence.
///
/// Hits are immutable once produced and live for a single pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    /// Opaque video identifier.
    pub id: String,
    /// Display name of the publishing channel.
    pub channel: String,
    /// Video title.
    pub title: String,
}

impl SearchHit {
    /// Watch URL for this hit.
    pub fn url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.id)
    }
}

/// Trait for video search providers.
#[async_trait]
pub trait VideoSearch: Send + Sync {
    /// Search for videos matching `query`, returning at most `max_results`
    /// hits in the platform's ranking order. `max_results` must be >= 1.
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>>;
}
