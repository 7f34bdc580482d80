//! Ask command implementation.

use crate::app::{App, Capabilities};
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::markup::split_sections;
use crate::rag::Answer;
use anyhow::Result;

/// Run the ask command.
pub async fn run_ask(
    query: &str,
    k: Option<usize>,
    model: Option<String>,
    sections: bool,
    show_fragments: bool,
    mut settings: Settings,
) -> Result<()> {
    if query.trim().is_empty() {
        Output::warning("Please enter a question.");
        anyhow::bail!("empty question");
    }

    if let Some(model) = model {
        settings.llm.model = model;
    }

    if let Err(e) = preflight::check(Operation::Ask, &settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let app = App::init(settings, Capabilities::KNOWLEDGE_BASE)?;
    let mut engine = app.rag_engine()?;
    if let Some(k) = k {
        engine = engine.with_k(k);
    }

    let spinner = Output::spinner("Searching knowledge base...");
    let result = engine.ask(query).await;
    spinner.finish_and_clear();

    let response = match result {
        Ok(response) => response,
        Err(e) => {
            Output::error(&format!("Failed to answer: {}", e));
            return Err(e.into());
        }
    };

    match &response.answer {
        Answer::Text(text) if sections => {
            let parts = split_sections(text);
            Output::header("Информация из базы знаний");
            Output::markup(&parts.knowledge_base);
            if let Some(additional) = &parts.additional {
                Output::header("Что полезно добавить поверх базы знаний");
                Output::markup(additional);
            }
        }
        Answer::Text(text) => {
            println!();
            Output::markup(text);
        }
        Answer::Failed(message) => {
            Output::error(&format!("The model call failed: {}", message));
        }
    }

    if show_fragments && !response.fragments.is_empty() {
        Output::header("Fragments");
        Output::fragments(&response.fragments);
    }

    if let Answer::Failed(message) = response.answer {
        anyhow::bail!(message);
    }

    Ok(())
}
