//! Process-lifetime application context.
//!
//! Everything expensive (prompt files, the index handle, HTTP clients) is
//! built once here and shared by every request. Nothing is reloaded.

use crate::config::{Prompts, Settings};
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::error::{LektorError, Result};
use crate::llm::{create_chat_model, ChatModel};
use crate::rag::RagEngine;
use crate::summary::Summarizer;
use crate::vector_store::{SqliteVectorStore, VectorStore};
use crate::video::{extract_video_id, Transcript, TranscriptSource, YtDlpTranscriptSource};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Which flows the context must be able to serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Open the knowledge base index.
    pub knowledge_base: bool,
    /// Set up transcript fetching.
    pub transcripts: bool,
}

impl Capabilities {
    pub const ALL: Capabilities = Capabilities {
        knowledge_base: true,
        transcripts: true,
    };
    pub const KNOWLEDGE_BASE: Capabilities = Capabilities {
        knowledge_base: true,
        transcripts: false,
    };
    pub const TRANSCRIPTS: Capabilities = Capabilities {
        knowledge_base: false,
        transcripts: true,
    };
}

/// Components shared for the life of the process.
pub struct App {
    settings: Settings,
    prompts: Prompts,
    chat: Arc<dyn ChatModel>,
    knowledge_base: Option<(Arc<dyn VectorStore>, Arc<dyn Embedder>)>,
    transcripts: Option<Arc<dyn TranscriptSource>>,
}

impl App {
    /// Build the context for the requested flows.
    ///
    /// The chat model is always created; the index and transcript source only
    /// when asked for, so summaries work without a knowledge base on disk.
    pub fn init(settings: Settings, capabilities: Capabilities) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let chat = create_chat_model(&settings.llm)?;
        info!("Using {} model {}", settings.llm.provider, chat.model());

        let knowledge_base = if capabilities.knowledge_base {
            let store: Arc<dyn VectorStore> =
                Arc::new(SqliteVectorStore::open_read_only(&settings.index_path())?);
            let embedder: Arc<dyn Embedder> =
                Arc::new(OpenAIEmbedder::from_settings(&settings.embedding)?);
            Some((store, embedder))
        } else {
            None
        };

        let transcripts = if capabilities.transcripts {
            let source: Arc<dyn TranscriptSource> = Arc::new(YtDlpTranscriptSource::new(
                settings.summary.languages.clone(),
                Duration::from_secs(settings.llm.timeout_secs),
            )?);
            Some(source)
        } else {
            None
        };

        Ok(Self {
            settings,
            prompts,
            chat,
            knowledge_base,
            transcripts,
        })
    }

    /// Build a context from already-constructed components.
    pub fn with_components(
        settings: Settings,
        prompts: Prompts,
        chat: Arc<dyn ChatModel>,
        knowledge_base: Option<(Arc<dyn VectorStore>, Arc<dyn Embedder>)>,
        transcripts: Option<Arc<dyn TranscriptSource>>,
    ) -> Self {
        Self {
            settings,
            prompts,
            chat,
            knowledge_base,
            transcripts,
        }
    }

    /// Whether the knowledge base index is loaded.
    pub fn has_knowledge_base(&self) -> bool {
        self.knowledge_base.is_some()
    }

    /// The transcript source.
    pub fn transcripts(&self) -> Result<Arc<dyn TranscriptSource>> {
        self.transcripts
            .clone()
            .ok_or_else(|| LektorError::Config("Transcript fetching is not initialized".to_string()))
    }

    /// Resolve a video URL and fetch its transcript.
    ///
    /// An unrecognised URL is rejected before anything is fetched.
    pub async fn fetch_transcript(&self, url: &str) -> Result<Transcript> {
        let video_id = extract_video_id(url).ok_or_else(|| {
            LektorError::InvalidInput(format!("Could not extract a video ID from '{}'", url.trim()))
        })?;
        self.transcripts()?.fetch(&video_id).await
    }

    /// A QA engine over the knowledge base.
    pub fn rag_engine(&self) -> Result<RagEngine> {
        let (store, embedder) = self.knowledge_base.clone().ok_or_else(not_loaded)?;
        Ok(RagEngine::new(store, embedder, self.chat.clone(), &self.settings.rag)
            .with_prompts(self.prompts.clone()))
    }

    /// A summarizer using the configured model.
    pub fn summarizer(&self) -> Summarizer {
        Summarizer::new(self.chat.clone(), &self.settings.summary).with_prompts(self.prompts.clone())
    }
}

fn not_loaded() -> LektorError {
    LektorError::Config("Knowledge base index is not loaded".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::ScriptedChat;
    use crate::video::TranscriptSegment;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records requested IDs and returns a one-cue transcript.
    #[derive(Default)]
    struct RecordingSource {
        fetched: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl TranscriptSource for RecordingSource {
        async fn fetch(&self, video_id: &str) -> Result<Transcript> {
            self.fetched.lock().unwrap().push(video_id.to_string());
            Ok(Transcript {
                video_id: video_id.to_string(),
                language: "ru".to_string(),
                segments: vec![TranscriptSegment {
                    start_seconds: 0.0,
                    duration_seconds: 2.0,
                    text: "Привет".to_string(),
                }],
            })
        }
    }

    fn app(source: Arc<RecordingSource>) -> App {
        App::with_components(
            Settings::default(),
            Prompts::default(),
            Arc::new(ScriptedChat::replying("ok")),
            None,
            Some(source as Arc<dyn TranscriptSource>),
        )
    }

    #[tokio::test]
    async fn test_fetch_transcript_resolves_id() {
        let source = Arc::new(RecordingSource::default());
        let transcript = app(source.clone())
            .fetch_transcript("https://youtu.be/abc123?t=5")
            .await
            .unwrap();

        assert_eq!(transcript.text(), "Привет");
        assert_eq!(*source.fetched.lock().unwrap(), vec!["abc123".to_string()]);
    }

    #[tokio::test]
    async fn test_unrecognised_url_fetches_nothing() {
        let source = Arc::new(RecordingSource::default());
        let err = app(source.clone())
            .fetch_transcript("https://example.com/video")
            .await
            .unwrap_err();

        assert!(err.is_input_error());
        assert!(source.fetched.lock().unwrap().is_empty());
    }

    #[test]
    fn test_rag_engine_requires_index() {
        let app = app(Arc::new(RecordingSource::default()));
        assert!(matches!(app.rag_engine(), Err(LektorError::Config(_))));
        assert!(!app.has_knowledge_base());
    }
}
