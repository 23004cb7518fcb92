//! CLI module for Omtale.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Omtale - Product Review Summarization
///
/// A CLI tool that collects YouTube review transcripts for a product and asks
/// a conversational AI to synthesize them into one summary.
/// The name "Omtale" comes from the Norwegian word for "review."
#[derive(Parser, Debug)]
#[command(name = "omtale")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Summarize reviews of a product with AI
    Summarize {
        /// Name of the product (e.g. "Xiaomi Robot Vacuum E10")
        name: String,

        /// Type of product (e.g. "robot vacuum", "video game")
        #[arg(short = 't', long = "type")]
        product_type: String,

        /// Number of review videos to collect
        #[arg(short, long, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
        reviews: Option<usize>,
    },

    /// Build and print the summary prompt without querying the AI
    Prompt {
        /// Name of the product
        name: String,

        /// Type of product
        #[arg(short = 't', long = "type")]
        product_type: String,

        /// Number of review videos to collect
        #[arg(short, long, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
        reviews: Option<usize>,
    },

    /// Check system requirements and configuration
    Doctor,
}
