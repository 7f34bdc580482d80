//! Configuration module for Lektor.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{Prompts, RagPrompts, SummaryPrompts};
pub use settings::{
    EmbeddingSettings, GeneralSettings, IndexSettings, LlmProvider, LlmSettings,
    PromptSettings, RagSettings, Settings, SummarySettings, YoutubeSettings,
};
