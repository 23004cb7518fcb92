//! Prompt command implementation.
//!
//! Runs the pipeline up to prompt assembly and prints the result, useful for
//! inspecting what would be sent to the AI or for pasting into another chat.

use super::spinner_sink;
use crate::chat::ClaudeWebClient;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::{FileTemplate, Settings};
use crate::credentials::Credentials;
use crate::search::YoutubeSearch;
use crate::summarizer::ReviewSummarizer;
use crate::transcript::YoutubeTranscripts;
use anyhow::Result;
use std::sync::Arc;

/// Run the prompt command.
pub async fn run_prompt(
    name: &str,
    product_type: &str,
    reviews: Option<usize>,
    settings: Settings,
) -> Result<()> {
    // Pre-flight checks
    if let Err(e) = preflight::check(Operation::Prompt, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'omtale doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    // The chat service is never queried by this command; a configured
    // credential is used when present but not required.
    let credentials = match Credentials::acquire(&settings.credential_path()) {
        Ok(credentials) => credentials,
        Err(_) => {
            Output::warning("No chat session token found; continuing without one.");
            Credentials::from_token("unused")
        }
    };

    let num_reviews = reviews.unwrap_or(settings.search.default_reviews);

    let spinner = Output::spinner("Starting...");

    let mut summarizer = ReviewSummarizer::new(
        num_reviews,
        product_type,
        name,
        Arc::new(YoutubeSearch::new()),
        Arc::new(YoutubeTranscripts::new()),
        Arc::new(ClaudeWebClient::new(&settings.chat, credentials)),
        Arc::new(FileTemplate::new(settings.template_path())),
    )
    .with_progress(spinner_sink(spinner.clone()));

    match summarizer.prompt().await {
        Ok(prompt) => {
            spinner.finish_and_clear();
            println!("{}", prompt);
            Ok(())
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Prompt assembly failed: {}", e));
            Err(e.into())
        }
    }
}
