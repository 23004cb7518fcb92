//! Summarize command implementation.

use super::spinner_sink;
use crate::chat::ClaudeWebClient;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::{FileTemplate, Settings};
use crate::credentials::Credentials;
use crate::error::OmtaleError;
use crate::search::YoutubeSearch;
use crate::summarizer::ReviewSummarizer;
use crate::transcript::YoutubeTranscripts;
use anyhow::Result;
use std::sync::Arc;

/// Run the summarize command.
pub async fn run_summarize(
    name: &str,
    product_type: &str,
    reviews: Option<usize>,
    settings: Settings,
) -> Result<()> {
    // Pre-flight checks
    if let Err(e) = preflight::check(Operation::Summarize, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'omtale doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let credentials = Credentials::acquire(&settings.credential_path())?;
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

    match summarizer.run().await {
        Ok(summary) => {
            spinner.finish_and_clear();
            println!("\n{}\n", summary);
            Ok(())
        }
        Err(OmtaleError::MessageLimit) => {
            spinner.finish_and_clear();
            Output::error("You have reached your limit of chat messages. Try again later.");
            Err(OmtaleError::MessageLimit.into())
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Summarization failed: {}", e));
            Err(e.into())
        }
    }
}
