//! Omtale - Product Review Summarization
//!
//! A CLI tool that gathers opinions about a product by collecting YouTube
//! review transcripts and asking a conversational AI to synthesize them.
//!
//! The name "Omtale" comes from the Norwegian word for "review."
//!
//! # Overview
//!
//! Omtale allows you to:
//! - Search YouTube for review videos of a product
//! - Collect and normalize the transcripts of those videos
//! - Assemble a single prompt from a template and the collected reviews
//! - Send the prompt to a conversational AI and get back a summary
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management and prompt templates
//! - `credentials` - Chat service credential acquisition
//! - `search` - Video search abstraction
//! - `transcript` - Transcript retrieval and normalization
//! - `chat` - Conversational AI client
//! - `summarizer` - Pipeline coordination
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use omtale::chat::ClaudeWebClient;
//! use omtale::config::{FileTemplate, Settings};
//! use omtale::credentials::Credentials;
//! use omtale::search::YoutubeSearch;
//! use omtale::summarizer::ReviewSummarizer;
//! use omtale::transcript::YoutubeTranscripts;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let credentials = Credentials::acquire(&settings.credential_path())?;
//!
//!     let mut summarizer = ReviewSummarizer::new(
//!         5,
//!         "robot vacuum",
//!         "Xiaomi Robot Vacuum E10",
//!         Arc::new(YoutubeSearch::new()),
//!         Arc::new(YoutubeTranscripts::new()),
//!         Arc::new(ClaudeWebClient::new(&settings.chat, credentials)),
//!         Arc::new(FileTemplate::new(settings.template_path())),
//!     );
//!
//!     let summary = summarizer.run().await?;
//!     println!("{}", summary);
//!
//!     Ok(())
//! }
//! ```

pub mod chat;
pub mod cli;
pub mod config;
pub mod credentials;
pub mod error;
pub mod search;
pub mod summarizer;
pub mod transcript;

pub use error::{OmtaleError, Result};
