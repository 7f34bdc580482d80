//! Transcript analysis with a fixed set of summary modes.

mod modes;

pub use modes::SummaryMode;

use crate::config::{Prompts, SummarySettings};
use crate::error::{LektorError, Result};
use crate::llm::{ChatModel, ChatRequest, PromptBlock};
use std::sync::Arc;
use tracing::{info, instrument};

/// Wrap a transcript the way the summary prompts refer to it.
fn book_block(transcript: &str) -> String {
    format!("<book>{}</book>", transcript)
}

/// Runs one summary mode over a transcript.
pub struct Summarizer {
    chat: Arc<dyn ChatModel>,
    prompts: Prompts,
    max_tokens: u32,
    temperature: f32,
}

impl Summarizer {
    pub fn new(chat: Arc<dyn ChatModel>, settings: &SummarySettings) -> Self {
        Self {
            chat,
            prompts: Prompts::default(),
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
        }
    }

    /// Set custom prompts (per-mode overrides).
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// The request sent for a transcript and mode.
    ///
    /// The transcript block comes first and is cacheable, so running several
    /// modes over one transcript reuses the provider's prompt cache.
    pub fn build_request(&self, transcript: &str, mode: SummaryMode) -> ChatRequest {
        ChatRequest {
            blocks: vec![
                PromptBlock::cached(book_block(transcript)),
                PromptBlock::text(self.prompts.summary_prompt(mode)),
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }

    /// Analyse a transcript and return the model's text.
    #[instrument(skip(self, transcript), fields(mode = %mode, chars = transcript.len()))]
    pub async fn summarize(&self, transcript: &str, mode: SummaryMode) -> Result<String> {
        if transcript.trim().is_empty() {
            return Err(LektorError::InvalidInput("Transcript is empty.".to_string()));
        }

        info!("Running '{}' with {}", mode.label(), self.chat.model());

        let response = self.chat.complete(self.build_request(transcript, mode)).await?;
        let text = response.text();

        if text.trim().is_empty() {
            return Err(LektorError::Llm("Model returned no text".to_string()));
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::ScriptedChat;

    #[tokio::test]
    async fn test_summarize_sends_cached_transcript_then_prompt() {
        let chat = Arc::new(ScriptedChat::replying("1. Введение (00:00, 2 мин)"));
        let summarizer = Summarizer::new(chat.clone(), &SummarySettings::default());

        let result = summarizer
            .summarize("Сегодня поговорим про деревья решений", SummaryMode::Timeline)
            .await
            .unwrap();

        assert_eq!(result, "1. Введение (00:00, 2 мин)");

        let requests = chat.requests.lock().unwrap();
        let request = &requests[0];
        assert_eq!(request.max_tokens, 1500);
        assert!((request.temperature - 0.05).abs() < f32::EPSILON);
        assert_eq!(request.blocks.len(), 2);
        assert_eq!(request.blocks[0].text, "<book>Сегодня поговорим про деревья решений</book>");
        assert!(request.blocks[0].cacheable);
        assert_eq!(request.blocks[1].text, SummaryMode::Timeline.prompt());
        assert!(!request.blocks[1].cacheable);
    }

    #[test]
    fn test_same_transcript_prefix_across_modes() {
        let summarizer = Summarizer::new(
            Arc::new(ScriptedChat::replying("ok")),
            &SummarySettings::default(),
        );
        let a = summarizer.build_request("lecture", SummaryMode::Critique);
        let b = summarizer.build_request("lecture", SummaryMode::SelfCheck);
        assert_eq!(a.blocks[0], b.blocks[0]);
        assert_ne!(a.blocks[1], b.blocks[1]);
    }

    #[tokio::test]
    async fn test_model_error_propagates() {
        let chat = Arc::new(ScriptedChat::failing("invalid x-api-key"));
        let summarizer = Summarizer::new(chat, &SummarySettings::default());

        let err = summarizer
            .summarize("transcript", SummaryMode::DetailedSummary)
            .await
            .unwrap_err();
        assert!(matches!(err, LektorError::Llm(_)));
    }

    #[test]
    fn test_empty_transcript_rejected() {
        let chat = Arc::new(ScriptedChat::replying("unused"));
        let summarizer = Summarizer::new(chat.clone(), &SummarySettings::default());

        let err = tokio_test::block_on(summarizer.summarize("  ", SummaryMode::Timeline)).unwrap_err();
        assert!(err.is_input_error());
        assert_eq!(chat.request_count(), 0);
    }

    #[test]
    fn test_override_used_in_request() {
        let mut prompts = Prompts::default();
        prompts
            .summary
            .overrides
            .insert("critique".to_string(), "Find mistakes only.".to_string());
        let summarizer = Summarizer::new(
            Arc::new(ScriptedChat::replying("ok")),
            &SummarySettings::default(),
        )
        .with_prompts(prompts);

        let request = summarizer.build_request("t", SummaryMode::Critique);
        assert_eq!(request.blocks[1].text, "Find mistakes only.");
    }
}
