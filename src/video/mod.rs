//! YouTube video identifiers and transcripts.

mod transcript;

pub use transcript::{
    format_timestamp, parse_json3, Transcript, TranscriptSegment, TranscriptSource,
    YtDlpTranscriptSource,
};

const SHORT_LINK_HOST: &str = "youtu.be/";

/// Extract a video identifier from a YouTube URL.
///
/// Two shapes are recognised:
/// - a `v=` query parameter (`.../watch?v=ID&...`): the value up to the next `&`;
/// - a short link (`https://youtu.be/ID?...`): the path segment after the host
///   up to the next `?`.
///
/// Returns `None` for anything else, including an empty identifier.
pub fn extract_video_id(url: &str) -> Option<String> {
    let url = url.trim();

    let id = if let Some(value) = query_param_v(url) {
        value
    } else if let Some(pos) = url.find(SHORT_LINK_HOST) {
        let rest = &url[pos + SHORT_LINK_HOST.len()..];
        let end = rest.find(['?', '#', '/']).unwrap_or(rest.len());
        &rest[..end]
    } else {
        return None;
    };

    (!id.is_empty()).then(|| id.to_string())
}

/// The value of the first `v` query parameter, if present.
fn query_param_v(url: &str) -> Option<&str> {
    let query_start = url.find('?')?;
    let query = &url[query_start + 1..];
    let query = query.split('#').next().unwrap_or(query);

    query
        .split('&')
        .find_map(|pair| pair.strip_prefix("v="))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_watch_url_with_more_params() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s&list=PL1"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?feature=share&v=abc123"),
            Some("abc123".to_string())
        );
    }

    #[test]
    fn test_short_link() {
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ?si=xyz&t=10"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            extract_video_id("  youtu.be/shortId  "),
            Some("shortId".to_string())
        );
    }

    #[test]
    fn test_unrecognised_urls() {
        assert_eq!(extract_video_id("https://vimeo.com/123456"), None);
        assert_eq!(extract_video_id("https://example.com/page?nav=1"), None);
        assert_eq!(extract_video_id("dQw4w9WgXcQ"), None);
        assert_eq!(extract_video_id(""), None);
    }

    #[test]
    fn test_empty_identifier() {
        assert_eq!(extract_video_id("https://www.youtube.com/watch?v=&t=1"), None);
        assert_eq!(extract_video_id("https://youtu.be/?si=abc"), None);
    }
}
