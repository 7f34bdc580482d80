//! Transcript command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::video::{extract_video_id, TranscriptSource, YtDlpTranscriptSource};
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

/// Run the transcript command.
pub async fn run_transcript(url: &str, timestamps: bool, settings: Settings) -> Result<()> {
    let Some(video_id) = extract_video_id(url) else {
        Output::warning("Could not extract a video ID. Use a youtube.com/watch?v=... or youtu.be/... link.");
        anyhow::bail!("unrecognised video URL: {}", url);
    };

    if let Err(e) = preflight::check(Operation::Transcript, &settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    // Captions only: no chat model or API key involved.
    let source: Arc<dyn TranscriptSource> = Arc::new(YtDlpTranscriptSource::new(
        settings.summary.languages.clone(),
        Duration::from_secs(settings.llm.timeout_secs),
    )?);

    let spinner = Output::spinner(&format!("Fetching transcript for {}...", video_id));
    let result = source.fetch(&video_id).await;
    spinner.finish_and_clear();

    let transcript = match result {
        Ok(transcript) => transcript,
        Err(e) => {
            Output::error(&format!("Failed to fetch transcript: {}", e));
            return Err(e.into());
        }
    };

    if timestamps {
        println!("{}", transcript.timestamped_text());
    } else {
        println!("{}", transcript.text());
    }

    Ok(())
}
