/// Video identifier parsing.
///
/// Accepts a bare 11-character video id or any of the common YouTube URL
/// shapes ('watch?v=', 'youtu.be/', '/embed/', '/v/', '/shorts/') and returns
/// the id. Malformed input is rejected before any network call.
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::error::{ExplorerError, Result};

static VIDEO_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").expect("valid video id regex"));

/// Parses user input into a YouTube video id.
///
/// Supported formats:
/// - "dQw4w9WgXcQ" → bare id
/// - "https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=10s"
/// - "https://youtu.be/dQw4w9WgXcQ"
/// - "https://www.youtube.com/embed/dQw4w9WgXcQ"
/// - "youtube.com/shorts/dQw4w9WgXcQ" (scheme optional)
pub fn extract_video_id(input: &str) -> Result<String> {
    let input = input.trim();

    if input.is_empty() {
        return Err(ExplorerError::Validation("Video ID is required".to_string()));
    }

    if VIDEO_ID_RE.is_match(input) {
        return Ok(input.to_string());
    }

    let url = url_from_candidate(input)?;
    let host = url.host_str().unwrap_or_default().to_ascii_lowercase();

    let candidate = if host == "youtu.be" || host.ends_with(".youtu.be") {
        url.path_segments().and_then(|mut s| s.next()).map(str::to_string)
    } else if host == "youtube.com" || host.ends_with(".youtube.com") {
        let from_query = url
            .query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.into_owned());

        from_query.or_else(|| {
            let segments: Vec<&str> = url.path_segments()?.collect();
            match segments.as_slice() {
                [prefix, id, ..] if matches!(*prefix, "embed" | "e" | "v" | "shorts" | "live") => {
                    Some((*id).to_string())
                }
                _ => None,
            }
        })
    } else {
        return Err(ExplorerError::Validation(format!(
            "Not a YouTube URL: '{}'",
            input
        )));
    };

    match candidate {
        Some(id) if VIDEO_ID_RE.is_match(&id) => Ok(id),
        _ => Err(ExplorerError::Validation(format!(
            "Invalid YouTube URL: '{}'. Expected a video link such as https://www.youtube.com/watch?v=...",
            input
        ))),
    }
}

fn url_from_candidate(candidate: &str) -> Result<Url> {
    if let Ok(url) = Url::parse(candidate) {
        if url.has_host() {
            return Ok(url);
        }
    }
    Url::parse(&format!("https://{}", candidate))
        .map_err(|e| ExplorerError::Validation(format!("Malformed URL '{}': {}", candidate, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_id() {
        assert_eq!(extract_video_id("dQw4w9WgXcQ").unwrap(), "dQw4w9WgXcQ");
        assert_eq!(extract_video_id("  dQw4w9WgXcQ \n").unwrap(), "dQw4w9WgXcQ");
    }

    #[test]
    fn test_watch_url() {
        let id = extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s").unwrap();
        assert_eq!(id, "dQw4w9WgXcQ");
    }

    #[test]
    fn test_watch_url_with_leading_params() {
        let id =
            extract_video_id("https://m.youtube.com/watch?feature=share&v=dQw4w9WgXcQ").unwrap();
        assert_eq!(id, "dQw4w9WgXcQ");
    }

    #[test]
    fn test_short_url() {
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ?si=abc").unwrap(),
            "dQw4w9WgXcQ"
        );
    }

    #[test]
    fn test_embed_and_shorts() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/embed/dQw4w9WgXcQ").unwrap(),
            "dQw4w9WgXcQ"
        );
        assert_eq!(
            extract_video_id("youtube.com/shorts/dQw4w9WgXcQ").unwrap(),
            "dQw4w9WgXcQ"
        );
    }

    #[test]
    fn test_missing_id() {
        let err = extract_video_id("   ").unwrap_err();
        assert!(matches!(err, ExplorerError::Validation(_)));
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(extract_video_id("https://vimeo.com/123456").is_err());
        assert!(extract_video_id("https://www.youtube.com/watch?v=short").is_err());
        assert!(extract_video_id("https://www.youtube.com/feed/trending").is_err());
        assert!(extract_video_id("not a url at all").is_err());
    }
}
