//! Pre-flight checks before expensive operations.
//!
//! Validates that required tools and configuration are available
//! before starting operations that would otherwise fail midway.

use crate::config::{LlmProvider, Settings};
use crate::error::{LektorError, Result};
use std::process::Command;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Knowledge-base questions need the chat key, embedding access and the index.
    Ask,
    /// Summaries need the chat key and yt-dlp.
    Summarize,
    /// Fetching a transcript only needs yt-dlp.
    Transcript,
    /// The server always serves summaries; questions only when the index exists.
    Serve,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Ask => {
            check_llm_key(settings)?;
            check_embedding_key(settings, env_key("OPENAI_API_KEY").as_deref())?;
            check_index(settings)?;
        }
        Operation::Summarize => {
            check_llm_key(settings)?;
            check_tool("yt-dlp")?;
        }
        Operation::Transcript => {
            check_tool("yt-dlp")?;
        }
        Operation::Serve => {
            check_llm_key(settings)?;
            check_tool("yt-dlp")?;
            if settings.index_path().exists() {
                check_embedding_key(settings, env_key("OPENAI_API_KEY").as_deref())?;
            }
        }
    }
    Ok(())
}

/// Check that the configured chat provider has a key.
fn check_llm_key(settings: &Settings) -> Result<()> {
    if settings.llm.api_key().is_some() {
        return Ok(());
    }
    match settings.llm.provider {
        LlmProvider::Anthropic => Err(LektorError::Config(
            "CLAUDE_API_KEY not set. Set it with: export CLAUDE_API_KEY='sk-ant-...'".to_string(),
        )),
        LlmProvider::OpenAI => check_env_key("OPENAI_API_KEY"),
    }
}

/// Check embedding access.
///
/// A custom `base_url` points at an OpenAI-compatible server that may not
/// need a key, so the key is only required for the hosted API.
fn check_embedding_key(settings: &Settings, openai_key: Option<&str>) -> Result<()> {
    if settings.embedding.base_url.is_some() {
        return Ok(());
    }
    match openai_key {
        Some(key) if !key.is_empty() => Ok(()),
        _ => Err(LektorError::Config(
            "OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...', \
             or point [embedding] base_url at a local embeddings server"
                .to_string(),
        )),
    }
}

fn env_key(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn check_env_key(name: &str) -> Result<()> {
    match std::env::var(name) {
        Ok(key) if !key.is_empty() => Ok(()),
        Ok(_) => Err(LektorError::Config(format!(
            "{} is empty. Set it with: export {}='...'",
            name, name
        ))),
        Err(_) => Err(LektorError::Config(format!(
            "{} not set. Set it with: export {}='...'",
            name, name
        ))),
    }
}

/// Check that the index file exists.
fn check_index(settings: &Settings) -> Result<()> {
    let path = settings.index_path();
    if path.exists() {
        Ok(())
    } else {
        Err(LektorError::Config(format!(
            "Knowledge base index not found at {}. Set [index] path in the config file.",
            path.display()
        )))
    }
}

/// Check if an external tool is available.
fn check_tool(name: &str) -> Result<()> {
    match Command::new(name).arg("--version").output() {
        Ok(output) if output.status.success() => Ok(()),
        Ok(_) => Err(LektorError::ToolNotFound(format!(
            "{} is installed but not working correctly",
            name
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(LektorError::ToolNotFound(name.to_string()))
        }
        Err(e) => Err(LektorError::ToolNotFound(format!("{}: {}", name, e))),
    }
}
