use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Extractive text summarizer.
///
/// Picks the sentences that best represent each topic cluster of the input
/// and returns them in their original order.
#[derive(Parser, Debug)]
#[command(name = "gist", version, about = "Extractive text summarizer")]
pub struct CliArgs {
    /// Config profile; keys are read as {PROFILE}_{KEY} before {KEY}
    #[arg(long, global = true, env = "GIST_PROFILE")]
    pub profile: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Summarize text from a file or stdin
    Summarize {
        /// Read the text from this file instead of stdin
        #[arg(long, short)]
        file: Option<PathBuf>,

        /// Number of sentences to keep (default: SUMMARY_DEFAULT_SENTENCES)
        #[arg(long, short = 'n')]
        sentences: Option<usize>,

        /// extractive, abstractive or hybrid (default: SUMMARY_DEFAULT_METHOD)
        #[arg(long, short)]
        method: Option<String>,
    },

    /// Report which models are loaded and the active configuration
    Health,

    /// List summarization methods and their backends
    Models,
}
