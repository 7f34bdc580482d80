//! OpenAI client configuration with sensible defaults.

use crate::error::{LektorError, Result};
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Default timeout for OpenAI API requests (5 minutes).
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Create an OpenAI client with the default timeout.
pub fn create_client(base_url: Option<&str>) -> Result<Client<OpenAIConfig>> {
    create_client_with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
}

/// Create an OpenAI client with a custom timeout.
///
/// The API key is read from `OPENAI_API_KEY`. A `base_url` targets any
/// OpenAI-compatible server (e.g. a local embeddings server).
pub fn create_client_with_timeout(
    base_url: Option<&str>,
    timeout: Duration,
) -> Result<Client<OpenAIConfig>> {
    let http_client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| LektorError::Config(format!("Failed to create HTTP client: {}", e)))?;

    let mut config = OpenAIConfig::default();
    if let Some(url) = base_url {
        config = config.with_api_base(url);
    }

    Ok(Client::with_config(config).with_http_client(http_client))
}
