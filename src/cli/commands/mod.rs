//! CLI command implementations.

mod doctor;
mod prompt;
mod summarize;

pub use doctor::run_doctor;
pub use prompt::run_prompt;
pub use summarize::run_summarize;

use crate::summarizer::{Progress, ProgressSink};
use indicatif::ProgressBar;

/// Render pipeline progress events on a spinner.
///
/// The pipeline knows nothing about the terminal; the CLI subscribes here.
pub(crate) fn spinner_sink(spinner: ProgressBar) -> ProgressSink {
    Box::new(move |event| match event {
        Progress::Searching { query } => {
            spinner.set_message(format!("Searching YouTube for '{}'...", query));
        }
        Progress::SearchComplete { hits } => {
            spinner.set_message(format!("Found {} review videos", hits));
        }
        Progress::FetchingTranscript {
            channel,
            current,
            total,
        } => {
            spinner.set_message(format!(
                "Fetching transcript {}/{} ({})...",
                current, total, channel
            ));
        }
        Progress::AssemblingPrompt => {
            spinner.set_message("Assembling prompt...");
        }
        Progress::Querying => {
            spinner.set_message("Waiting for the AI summary...");
        }
    })
}
