use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use yt_transcript_rs::api::YouTubeTranscriptApi;

static VIDEO_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:v=|/)([0-9A-Za-z_-]{11})").expect("video id pattern is valid")
});

/// One caption entry of a transcript, in seconds from the start of the video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionSegment {
    pub text: String,
    pub start: f64,
    pub duration: Option<f64>,
}

impl CaptionSegment {
    #[allow(dead_code)]
    pub fn new(text: impl Into<String>, start: f64) -> Self {
        Self {
            text: text.into(),
            start,
            duration: None,
        }
    }

    /// Builds a segment from raw caption text, decoding HTML entities.
    /// Returns `None` for captions that carry no words.
    pub fn from_caption(raw_text: &str, start: f64, duration: f64) -> Option<Self> {
        let text = html_escape::decode_html_entities(raw_text);
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        Some(Self {
            text: text.to_string(),
            start: start.max(0.0),
            duration: Some(duration.max(0.0)),
        })
    }
}

#[derive(Clone)]
pub struct TranscriptService {
    api: YouTubeTranscriptApi,
    languages: Vec<String>,
}

impl TranscriptService {
    pub fn new(languages: Vec<String>) -> Result<Self> {
        let api = YouTubeTranscriptApi::new(None, None, None)
            .map_err(|e| Error::custom(format!("Failed to initialise transcript client: {e}")))?;
        Ok(Self { api, languages })
    }

    #[tracing::instrument(skip(self), fields(languages = ?self.languages))]
    pub async fn fetch_transcript(&self, video_id: &str) -> Result<Vec<CaptionSegment>> {
        let languages: Vec<&str> = self.languages.iter().map(|s| s.as_str()).collect();

        let transcript = self
            .api
            .fetch_transcript(video_id, &languages, false)
            .await
            .map_err(|e| Error::TranscriptUnavailable {
                video_id: video_id.to_string(),
                reason: e.to_string(),
            })?;

        tracing::debug!(
            language = %transcript.language_code,
            generated = transcript.is_generated,
            snippets = transcript.snippets.len(),
            "Fetched transcript"
        );

        Ok(transcript
            .snippets
            .iter()
            .filter_map(|snippet| {
                CaptionSegment::from_caption(&snippet.text, snippet.start, snippet.duration)
            })
            .collect())
    }
}

/// Formats seconds as `H:MM:SS`, dropping the fractional part.
pub fn format_timestamp(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    format!("{hours}:{minutes:02}:{secs:02}")
}

/// Pulls the 11 character video id out of a watch, short or embed URL.
pub fn extract_video_id(url: &str) -> Option<String> {
    VIDEO_ID_PATTERN
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::{CaptionSegment, extract_video_id, format_timestamp};

    #[test]
    fn extracts_id_from_watch_url() {
        let id = extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s");
        assert_eq!(id.as_deref(), Some("dQw4w9WgXcQ"));
    }

    #[test]
    fn extracts_id_from_short_url() {
        let id = extract_video_id("https://youtu.be/5_EJwYeQusM?feature=shared");
        assert_eq!(id.as_deref(), Some("5_EJwYeQusM"));
    }

    #[test]
    fn extracts_id_from_embed_url() {
        let id = extract_video_id("https://www.youtube.com/embed/wXVvfFMTyzY");
        assert_eq!(id.as_deref(), Some("wXVvfFMTyzY"));
    }

    #[test]
    fn rejects_url_without_id() {
        assert_eq!(extract_video_id("https://example.com/abc"), None);
        assert_eq!(extract_video_id("not a url"), None);
        assert_eq!(extract_video_id(""), None);
    }

    #[test]
    fn bare_id_does_not_match() {
        assert_eq!(extract_video_id("dQw4w9WgXcQ"), None);
    }

    #[test]
    fn formats_timestamps_like_timedelta() {
        assert_eq!(format_timestamp(0.0), "0:00:00");
        assert_eq!(format_timestamp(5.9), "0:00:05");
        assert_eq!(format_timestamp(754.2), "0:12:34");
        assert_eq!(format_timestamp(3725.0), "1:02:05");
        assert_eq!(format_timestamp(36_000.0), "10:00:00");
    }

    #[test]
    fn caption_text_is_decoded_and_trimmed() {
        let segment = CaptionSegment::from_caption("  it&#39;s &amp; done ", 1.5, 2.0)
            .expect("segment with words");
        assert_eq!(segment.text, "it's & done");
        assert_eq!(segment.start, 1.5);
        assert_eq!(segment.duration, Some(2.0));
    }

    #[test]
    fn blank_captions_are_skipped() {
        assert!(CaptionSegment::from_caption("   \n", 0.0, 1.0).is_none());
    }
}
