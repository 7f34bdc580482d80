//! Summarize command implementation.

use crate::app::{App, Capabilities};
use crate::cli::output::format_duration;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::summary::SummaryMode;
use crate::video::extract_video_id;
use anyhow::Result;

/// Run the summarize command.
pub async fn run_summarize(
    url: &str,
    mode: SummaryMode,
    timestamps: bool,
    show_transcript: bool,
    settings: Settings,
) -> Result<()> {
    let Some(video_id) = extract_video_id(url) else {
        Output::warning("Could not extract a video ID. Use a youtube.com/watch?v=... or youtu.be/... link.");
        anyhow::bail!("unrecognised video URL: {}", url);
    };

    if let Err(e) = preflight::check(Operation::Summarize, &settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let app = App::init(settings, Capabilities::TRANSCRIPTS)?;

    let spinner = Output::spinner(&format!("Fetching transcript for {}...", video_id));
    let transcript = app.fetch_transcript(url).await;
    spinner.finish_and_clear();

    let transcript = match transcript {
        Ok(transcript) => transcript,
        Err(e) => {
            Output::error(&format!("Failed to fetch transcript: {}", e));
            return Err(e.into());
        }
    };

    Output::success(&format!(
        "Transcript loaded ({}, {} captions, {})",
        transcript.language,
        transcript.segments.len(),
        format_duration(transcript.duration_seconds())
    ));

    let text = if timestamps {
        transcript.timestamped_text()
    } else {
        transcript.text()
    };

    if show_transcript {
        Output::header("Transcript");
        println!("{}", text);
    }

    let spinner = Output::spinner(&format!("{}...", mode.label()));
    let result = app.summarizer().summarize(&text, mode).await;
    spinner.finish_and_clear();

    match result {
        Ok(summary) => {
            Output::header(mode.label());
            Output::markup(&summary);
            Ok(())
        }
        Err(e) => {
            Output::error(&format!("Failed to analyse transcript: {}", e));
            Err(e.into())
        }
    }
}
