//! CLI module for Lektor.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use crate::summary::SummaryMode;
use clap::{Parser, Subcommand};

/// Lektor - knowledge-base answers and lecture analysis
///
/// Ask questions against a pre-built knowledge base, or analyse the
/// transcript of a YouTube lecture with one of several summary modes.
#[derive(Parser, Debug)]
#[command(name = "lektor")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
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
    /// Ask a question and get an answer from the knowledge base
    Ask {
        /// The question to ask
        query: String,

        /// Number of fragments to retrieve
        #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..=50))]
        k: Option<u16>,

        /// Model to use (overrides config)
        #[arg(long)]
        model: Option<String>,

        /// Split the answer into knowledge-base and additional parts
        #[arg(long)]
        sections: bool,

        /// Do not print the retrieved fragments
        #[arg(long)]
        no_fragments: bool,
    },

    /// Analyse a YouTube video's transcript
    Summarize {
        /// YouTube URL (watch?v=... or youtu.be/...)
        url: String,

        /// Summary mode
        #[arg(short, long, value_enum, default_value_t = SummaryMode::Timeline)]
        mode: SummaryMode,

        /// Send the transcript with [MM:SS] markers
        #[arg(long)]
        timestamps: bool,

        /// Print the transcript before the analysis
        #[arg(long)]
        show_transcript: bool,
    },

    /// Print a YouTube video's transcript
    Transcript {
        /// YouTube URL (watch?v=... or youtu.be/...)
        url: String,

        /// Prefix every caption with [MM:SS]
        #[arg(long)]
        timestamps: bool,
    },

    /// List the available summary modes
    Modes,

    /// Start HTTP API server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_summarize() {
        let cli = Cli::parse_from([
            "lektor",
            "summarize",
            "https://youtu.be/abc",
            "--mode",
            "self-check",
            "--timestamps",
        ]);
        match cli.command {
            Commands::Summarize { url, mode, timestamps, show_transcript } => {
                assert_eq!(url, "https://youtu.be/abc");
                assert_eq!(mode, SummaryMode::SelfCheck);
                assert!(timestamps);
                assert!(!show_transcript);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_ask_limits_k() {
        let cli = Cli::parse_from(["lektor", "-vv", "ask", "Что такое PCA?", "-k", "20"]);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Ask { k: Some(20), .. }));

        assert!(Cli::try_parse_from(["lektor", "ask", "q", "-k", "0"]).is_err());
        assert!(Cli::try_parse_from(["lektor", "ask", "q", "-k", "51"]).is_err());
    }

    #[test]
    fn test_unknown_mode_rejected() {
        assert!(Cli::try_parse_from(["lektor", "summarize", "u", "--mode", "poem"]).is_err());
    }
}
