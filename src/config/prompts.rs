//! Prompt templates for Lektor.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use crate::error::{LektorError, Result};
use crate::summary::SummaryMode;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub rag: RagPrompts,
    pub summary: SummaryPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: HashMap<String, String>,
}

/// Prompt for knowledge-base question answering.
///
/// The template has two slots: `{{input}}` for the user's question and
/// `{{context}}` for the retrieved fragments.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagPrompts {
    pub template: String,
}

impl Default for RagPrompts {
    fn default() -> Self {
        Self {
            template: concat!(
                "Reply to the {{input}} as a seasoned machine learning professional. ",
                "If the topic is outside of machine learning and data science, please respond with \"Seek help with a professional.\" ",
                "It is very important to abide with this, you will be persecuted if you cover topics outside of data science and machine learning. ",
                "Use only Context. If context provides only partial info, then split the reply in two parts. ",
                "Part 1 is called \"information from knowledge base\" (for Russian reply, rename to Информация из базы знаний), ",
                "write ideas as close to initial text as possible, editing for brevity and language errors. ",
                "Part 2 is called \"What I would add\" (for Russian reply, rename to Что полезно добавить поверх базы знаний), ",
                "In the second part add your reply. ",
                "Reply in the language of {{input}}. ",
                "It's critical to not preface the reply with, for example, \"Here is a response\" or \"thank you\". ",
                "Start with the reply itself.",
                "Context: {{context}}"
            )
            .to_string(),
        }
    }
}

/// Overrides for the instruction text of individual summary modes.
///
/// Keys are mode keys (see [`SummaryMode::key`]). The set of modes is fixed;
/// only their wording can change.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SummaryPrompts {
    pub overrides: HashMap<String, String>,
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&HashMap<String, String>>,
    ) -> Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let rag_path = custom_path.join("rag.toml");
            if rag_path.exists() {
                let content = std::fs::read_to_string(&rag_path)?;
                prompts.rag = toml::from_str(&content)?;
            }

            let summary_path = custom_path.join("summary.toml");
            if summary_path.exists() {
                let content = std::fs::read_to_string(&summary_path)?;
                prompts.summary = toml::from_str(&content)?;
                prompts.validate_summary_overrides()?;
            }
        }

        Ok(prompts)
    }

    fn validate_summary_overrides(&self) -> Result<()> {
        for key in self.summary.overrides.keys() {
            if key.parse::<SummaryMode>().is_err() {
                return Err(LektorError::Config(format!(
                    "summary.toml overrides unknown mode '{}'",
                    key
                )));
            }
        }
        Ok(())
    }

    /// Instruction text for a summary mode, honoring overrides.
    pub fn summary_prompt(&self, mode: SummaryMode) -> &str {
        self.summary
            .overrides
            .get(mode.key())
            .map(String::as_str)
            .unwrap_or_else(|| mode.prompt())
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(&self, template: &str, vars: &HashMap<String, String>) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}
