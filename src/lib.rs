//! Lektor - lecture companion over a knowledge base and YouTube transcripts
//!
//! # Overview
//!
//! Lektor allows you to:
//! - Ask questions answered from a pre-built vector index of course material
//! - Fetch the captions of a YouTube lecture
//! - Analyse a transcript with one of seven fixed summary modes
//!
//! # Architecture
//!
//! - `config` - Settings and prompt templates
//! - `embedding` - Query embeddings
//! - `vector_store` - Read access to the fragment index
//! - `llm` - Chat model clients (Anthropic Messages API, OpenAI)
//! - `rag` - Question answering over the index
//! - `video` - Video ID extraction and caption fetching
//! - `summary` - Summary modes and the summarizer
//! - `markup` - Splitting model output into prose, code and sections
//! - `app` - Process-lifetime context shared by the CLI and the server
//!
//! # Example
//!
//! ```rust,no_run
//! use lektor::app::{App, Capabilities};
//! use lektor::config::Settings;
//! use lektor::summary::SummaryMode;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let app = App::init(Settings::load()?, Capabilities::TRANSCRIPTS)?;
//!
//!     let transcript = app.fetch_transcript("https://youtu.be/dQw4w9WgXcQ").await?;
//!     let summary = app
//!         .summarizer()
//!         .summarize(&transcript.text(), SummaryMode::KeyStatements)
//!         .await?;
//!     println!("{}", summary);
//!
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod llm;
pub mod markup;
pub mod openai;
pub mod rag;
pub mod summary;
pub mod vector_store;
pub mod video;

pub use error::{LektorError, Result};
