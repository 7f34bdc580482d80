//! Caption fetching via yt-dlp.

use crate::error::{LektorError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// One caption cue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub start_seconds: f64,
    pub duration_seconds: f64,
    pub text: String,
}

/// The captions of one video in one language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub video_id: String,
    /// Language code of the track that was used.
    pub language: String,
    pub segments: Vec<TranscriptSegment>,
}

impl Transcript {
    /// All caption text joined with single spaces.
    pub fn text(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Caption text with a `[MM:SS]` marker before every cue, one cue per line.
    pub fn timestamped_text(&self) -> String {
        self.segments
            .iter()
            .map(|s| format!("[{}] {}", format_timestamp(s.start_seconds), s.text))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Approximate length of the video covered by the captions.
    pub fn duration_seconds(&self) -> f64 {
        self.segments
            .iter()
            .map(|s| s.start_seconds + s.duration_seconds)
            .fold(0.0, f64::max)
    }
}

/// Format seconds as MM:SS or HH:MM:SS.
pub fn format_timestamp(seconds: f64) -> String {
    let total_seconds = seconds as u32;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

/// Trait for transcript providers.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Fetch the transcript of a video.
    async fn fetch(&self, video_id: &str) -> Result<Transcript>;
}

// === yt-dlp metadata ===

#[derive(Debug, Default, Deserialize)]
struct VideoInfo {
    #[serde(default)]
    subtitles: HashMap<String, Vec<CaptionFormat>>,
    #[serde(default)]
    automatic_captions: HashMap<String, Vec<CaptionFormat>>,
}

#[derive(Debug, Deserialize)]
struct CaptionFormat {
    ext: String,
    url: String,
}

/// Pick the caption track to download: for each preferred language, an
/// uploaded track first, then YouTube's own speech recognition for that
/// language. Machine translations (`tlang=`) are never used.
fn select_track<'a>(info: &'a VideoInfo, languages: &[String]) -> Option<(&'a str, &'a str)> {
    fn json3(formats: &[CaptionFormat], allow_translated: bool) -> Option<&str> {
        formats
            .iter()
            .find(|f| f.ext == "json3" && (allow_translated || !f.url.contains("tlang=")))
            .map(|f| f.url.as_str())
    }

    languages.iter().find_map(|lang| {
        let manual = info
            .subtitles
            .get_key_value(lang.as_str())
            .and_then(|(code, formats)| json3(formats, true).map(|url| (code.as_str(), url)));

        manual.or_else(|| {
            info.automatic_captions
                .get_key_value(lang.as_str())
                .and_then(|(code, formats)| json3(formats, false).map(|url| (code.as_str(), url)))
        })
    })
}

// === json3 caption format ===

#[derive(Debug, Deserialize)]
struct Json3 {
    #[serde(default)]
    events: Vec<Json3Event>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Json3Event {
    #[serde(default)]
    t_start_ms: u64,
    #[serde(default)]
    d_duration_ms: u64,
    #[serde(default)]
    segs: Vec<Json3Seg>,
}

#[derive(Debug, Deserialize)]
struct Json3Seg {
    #[serde(default)]
    utf8: String,
}

/// Parse YouTube's `json3` caption format into cues.
///
/// Cues with no visible text (line-break events, empty windows) are dropped
/// and whitespace inside a cue is collapsed.
pub fn parse_json3(video_id: &str, language: &str, raw: &str) -> Result<Transcript> {
    let parsed: Json3 = serde_json::from_str(raw)
        .map_err(|e| LektorError::Transcript(format!("Malformed caption data: {}", e)))?;

    let segments = parsed
        .events
        .into_iter()
        .filter_map(|event| {
            let joined: String = event.segs.iter().map(|s| s.utf8.as_str()).collect();
            let text = joined.split_whitespace().collect::<Vec<_>>().join(" ");
            (!text.is_empty()).then(|| TranscriptSegment {
                start_seconds: event.t_start_ms as f64 / 1000.0,
                duration_seconds: event.d_duration_ms as f64 / 1000.0,
                text,
            })
        })
        .collect();

    Ok(Transcript {
        video_id: video_id.to_string(),
        language: language.to_string(),
        segments,
    })
}

/// Fetches captions with `yt-dlp`, no API key required.
pub struct YtDlpTranscriptSource {
    languages: Vec<String>,
    http: reqwest::Client,
}

impl YtDlpTranscriptSource {
    pub fn new(languages: Vec<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LektorError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { languages, http })
    }

    /// Fetch video metadata (including caption track URLs) using yt-dlp.
    async fn fetch_info(&self, video_id: &str) -> Result<VideoInfo> {
        let url = format!("https://www.youtube.com/watch?v={}", video_id);

        let output = tokio::process::Command::new("yt-dlp")
            .args(["--dump-json", "--skip-download", "--no-warnings", "--no-playlist", &url])
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    LektorError::ToolNotFound("yt-dlp".to_string())
                } else {
                    LektorError::Transcript(format!("Failed to run yt-dlp: {}", e))
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(LektorError::Transcript(format!(
                "Video {} not found or unavailable: {}",
                video_id,
                stderr.trim()
            )));
        }

        serde_json::from_slice(&output.stdout)
            .map_err(|e| LektorError::Transcript(format!("Failed to parse yt-dlp output: {}", e)))
    }
}

#[async_trait]
impl TranscriptSource for YtDlpTranscriptSource {
    #[instrument(skip(self))]
    async fn fetch(&self, video_id: &str) -> Result<Transcript> {
        let info = self.fetch_info(video_id).await?;

        let (language, url) = select_track(&info, &self.languages).ok_or_else(|| {
            LektorError::Transcript(format!(
                "No captions in {} for video {}",
                self.languages.join("/"),
                video_id
            ))
        })?;

        debug!("Downloading {} captions", language);
        let raw = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let transcript = parse_json3(video_id, language, &raw)?;
        if transcript.segments.is_empty() {
            return Err(LektorError::Transcript(format!(
                "Captions for video {} are empty",
                video_id
            )));
        }

        info!(
            "Fetched {} caption cues ({}) for {}",
            transcript.segments.len(),
            language,
            video_id
        );
        Ok(transcript)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "wireMagic": "pb3",
        "events": [
            {"tStartMs": 0, "dDurationMs": 4000, "id": 1, "wWinId": 1},
            {"tStartMs": 1200, "dDurationMs": 3100, "wWinId": 1,
             "segs": [{"utf8": "Сегодня"}, {"utf8": " поговорим", "tOffsetMs": 400}]},
            {"tStartMs": 4300, "dDurationMs": 10, "aAppend": 1, "segs": [{"utf8": "\n"}]},
            {"tStartMs": 65000, "dDurationMs": 2500,
             "segs": [{"utf8": "про  градиентный\nспуск"}]}
        ]
    }"#;

    fn langs() -> Vec<String> {
        vec!["ru".to_string(), "en".to_string()]
    }

    #[test]
    fn test_parse_json3() {
        let transcript = parse_json3("abc", "ru", SAMPLE).unwrap();
        assert_eq!(transcript.segments.len(), 2);
        assert_eq!(transcript.segments[0].text, "Сегодня поговорим");
        assert!((transcript.segments[0].start_seconds - 1.2).abs() < 1e-9);
        assert_eq!(transcript.text(), "Сегодня поговорим про градиентный спуск");
        assert!((transcript.duration_seconds() - 67.5).abs() < 1e-9);
    }

    #[test]
    fn test_timestamped_text() {
        let transcript = parse_json3("abc", "ru", SAMPLE).unwrap();
        assert_eq!(
            transcript.timestamped_text(),
            "[00:01] Сегодня поговорим\n[01:05] про градиентный спуск"
        );
    }

    #[test]
    fn test_parse_json3_malformed() {
        let err = parse_json3("abc", "ru", "<transcript/>").unwrap_err();
        assert!(matches!(err, LektorError::Transcript(_)));
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(125.0), "02:05");
        assert_eq!(format_timestamp(3725.9), "01:02:05");
    }

    fn info(json: &str) -> VideoInfo {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_select_prefers_russian() {
        let info = info(
            r#"{
                "subtitles": {
                    "en": [{"ext": "json3", "url": "https://x/en"}],
                    "ru": [{"ext": "vtt", "url": "https://x/ru.vtt"}, {"ext": "json3", "url": "https://x/ru"}]
                }
            }"#,
        );
        assert_eq!(select_track(&info, &langs()), Some(("ru", "https://x/ru")));
    }

    #[test]
    fn test_select_falls_back_to_generated_then_english() {
        let generated = info(
            r#"{"automatic_captions": {"ru": [{"ext": "json3", "url": "https://x/asr-ru"}]}}"#,
        );
        assert_eq!(select_track(&generated, &langs()), Some(("ru", "https://x/asr-ru")));

        let english = info(
            r#"{
                "subtitles": {"en": [{"ext": "json3", "url": "https://x/en"}]},
                "automatic_captions": {"ru": [{"ext": "json3", "url": "https://x/tt?lang=en&tlang=ru"}]}
            }"#,
        );
        assert_eq!(select_track(&english, &langs()), Some(("en", "https://x/en")));
    }

    #[test]
    fn test_select_none_available() {
        let info = info(r#"{"subtitles": {"de": [{"ext": "json3", "url": "https://x/de"}]}}"#);
        assert_eq!(select_track(&info, &langs()), None);
        assert_eq!(select_track(&VideoInfo::default(), &langs()), None);
    }
}
