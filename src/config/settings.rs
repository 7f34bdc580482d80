//! Configuration settings for Lektor.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub embedding: EmbeddingSettings,
    pub index: IndexSettings,
    pub llm: LlmSettings,
    pub rag: RagSettings,
    pub summary: SummarySettings,
    pub youtube: YoutubeSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for storing application data.
    pub data_dir: String,
    /// Log level used when no `-v` flag is given (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: "~/.lektor".to_string(),
            log_level: "warn".to_string(),
        }
    }
}

/// Embedding generation settings.
///
/// Any OpenAI-compatible embeddings endpoint works; point `base_url` at a
/// local server to query an index built with an open model such as
/// `intfloat/multilingual-e5-base`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Embedding model to use.
    pub model: String,
    /// Requested embedding dimensions. Unset by default, so the model's native
    /// size is used; set it only for models that support shortening.
    pub dimensions: Option<u32>,
    /// Base URL of an OpenAI-compatible embeddings API.
    pub base_url: Option<String>,
    /// Prefix prepended to every query before embedding (e.g. "query: " for e5 models).
    pub query_prefix: String,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            model: "text-embedding-3-small".to_string(),
            dimensions: None,
            base_url: None,
            query_prefix: String::new(),
        }
    }
}

/// Knowledge base index settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexSettings {
    /// Path to the SQLite index file.
    pub path: String,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            path: "~/.lektor/index.db".to_string(),
        }
    }
}

/// Hosted language model provider.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// Anthropic Messages API (supports prompt caching).
    #[default]
    Anthropic,
    /// OpenAI chat completions.
    OpenAI,
}

impl std::str::FromStr for LlmProvider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "anthropic" | "claude" => Ok(LlmProvider::Anthropic),
            "openai" => Ok(LlmProvider::OpenAI),
            _ => Err(format!("Unknown LLM provider: {}", s)),
        }
    }
}

impl std::fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LlmProvider::Anthropic => write!(f, "anthropic"),
            LlmProvider::OpenAI => write!(f, "openai"),
        }
    }
}

/// Language model settings shared by both flows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub provider: LlmProvider,
    /// Model identifier sent to the provider.
    pub model: String,
    /// Override of the provider's API base URL.
    pub base_url: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: LlmProvider::Anthropic,
            model: "claude-sonnet-4-5".to_string(),
            base_url: None,
            timeout_secs: 300,
        }
    }
}

impl LlmSettings {
    /// Read the API key for the configured provider from the environment.
    pub fn api_key(&self) -> Option<String> {
        let vars: &[&str] = match self.provider {
            LlmProvider::Anthropic => &["CLAUDE_API_KEY", "ANTHROPIC_API_KEY"],
            LlmProvider::OpenAI => &["OPENAI_API_KEY"],
        };
        vars.iter()
            .filter_map(|v| std::env::var(v).ok())
            .find(|k| !k.is_empty())
    }
}

/// Knowledge-base question answering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagSettings {
    /// Number of fragments to retrieve.
    pub k: usize,
    /// Minimum similarity score for a fragment to be used.
    pub min_score: f32,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for RagSettings {
    fn default() -> Self {
        Self {
            k: 10,
            min_score: 0.0,
            max_tokens: 300,
            temperature: 0.7,
        }
    }
}

/// Video summary settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarySettings {
    pub max_tokens: u32,
    pub temperature: f32,
    /// Caption languages in order of preference.
    pub languages: Vec<String>,
}

impl Default for SummarySettings {
    fn default() -> Self {
        Self {
            max_tokens: 1500,
            temperature: 0.05,
            languages: vec!["ru".to_string(), "en".to_string()],
        }
    }
}

/// YouTube-specific settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct YoutubeSettings {
    /// YouTube Data API key. Captions are fetched without it.
    pub api_key: Option<String>,
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        let mut settings = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str::<Settings>(&content)?
        } else {
            Settings::default()
        };

        if settings.youtube.api_key.is_none() {
            settings.youtube.api_key = std::env::var("YOUTUBE_API_KEY").ok();
        }

        Ok(settings)
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lektor")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded data directory path.
    pub fn data_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.data_dir)
    }

    /// Get the expanded index path.
    pub fn index_path(&self) -> PathBuf {
        Self::expand_path(&self.index.path)
    }

    /// Tracing filter directive: `-v` flags win over the configured level.
    pub fn log_directive(&self, verbose: u8) -> String {
        let level = match verbose {
            0 => self.general.log_level.as_str(),
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        format!("lektor={}", level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.rag.k, 10);
        assert_eq!(settings.rag.max_tokens, 300);
        assert_eq!(settings.summary.max_tokens, 1500);
        assert_eq!(settings.summary.languages, vec!["ru", "en"]);
        assert_eq!(settings.llm.provider, LlmProvider::Anthropic);
    }

    #[test]
    fn test_partial_toml() {
        let settings: Settings = toml::from_str(
            r#"
            [rag]
            k = 20

            [llm]
            provider = "openai"
            model = "gpt-4o-mini"
            "#,
        )
        .unwrap();

        assert_eq!(settings.rag.k, 20);
        assert_eq!(settings.rag.max_tokens, 300);
        assert_eq!(settings.llm.provider, LlmProvider::OpenAI);
        assert_eq!(settings.llm.timeout_secs, 300);
        assert_eq!(settings.index.path, "~/.lektor/index.db");
    }

    #[test]
    fn test_local_embedding_server_omits_dimensions() {
        let settings: Settings = toml::from_str(
            r#"
            [embedding]
            model = "intfloat/multilingual-e5-base"
            base_url = "http://localhost:8080/v1"
            query_prefix = "query: "
            "#,
        )
        .unwrap();

        assert_eq!(settings.embedding.dimensions, None);
        assert_eq!(settings.embedding.base_url.as_deref(), Some("http://localhost:8080/v1"));
        assert_eq!(Settings::default().embedding.dimensions, None);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[embedding]\nquery_prefix = \"query: \"\ndimensions = 768\n").unwrap();

        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.embedding.query_prefix, "query: ");
        assert_eq!(loaded.embedding.dimensions, Some(768));
        assert_eq!(loaded.rag.k, 10);
    }

    #[test]
    fn test_log_directive() {
        let mut settings = Settings::default();
        assert_eq!(settings.log_directive(0), "lektor=warn");

        settings.general.log_level = "debug".to_string();
        assert_eq!(settings.log_directive(0), "lektor=debug");
        assert_eq!(settings.log_directive(1), "lektor=info");
        assert_eq!(settings.log_directive(3), "lektor=trace");
    }

    #[test]
    fn test_provider_from_str() {
        assert_eq!("claude".parse::<LlmProvider>().unwrap(), LlmProvider::Anthropic);
        assert_eq!("OpenAI".parse::<LlmProvider>().unwrap(), LlmProvider::OpenAI);
        assert!("gemini".parse::<LlmProvider>().is_err());
    }
}
