use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const YOUTUBE_API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub title: String,
    pub channel: String,
    pub published: DateTime<Utc>,
    pub thumbnail_url: Option<String>,
}

/// Looks up video snippets through the YouTube Data API.
#[derive(Clone)]
pub struct MetadataService {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl MetadataService {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, YOUTUBE_API_BASE_URL)
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn fetch_metadata(&self, video_id: &str) -> Result<VideoMetadata> {
        let resp = self
            .client
            .get(format!("{}/videos", self.base_url))
            .query(&[
                ("part", "snippet"),
                ("id", video_id),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(Error::YouTubeApi { status, message });
        }

        let body = resp.text().await?;
        parse_video_list(video_id, &body)
    }
}

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    title: String,
    channel_title: String,
    published_at: DateTime<Utc>,
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    high: Option<Thumbnail>,
    medium: Option<Thumbnail>,
    default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

fn parse_video_list(video_id: &str, body: &str) -> Result<VideoMetadata> {
    let response: VideoListResponse = serde_json::from_str(body)?;

    let item = response
        .items
        .into_iter()
        .next()
        .ok_or_else(|| Error::VideoNotFound(video_id.to_string()))?;

    let Snippet {
        title,
        channel_title,
        published_at,
        thumbnails,
    } = item.snippet;

    let thumbnail_url = thumbnails
        .high
        .or(thumbnails.medium)
        .or(thumbnails.default)
        .map(|t| t.url);

    Ok(VideoMetadata {
        title,
        channel: channel_title,
        published: published_at,
        thumbnail_url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serves a single canned HTTP response and hands back the request line.
    async fn serve_once(status: &str, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request: Vec<u8> = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();

            String::from_utf8_lossy(&request)
                .lines()
                .next()
                .unwrap_or_default()
                .to_string()
        });

        (format!("http://{addr}/youtube/v3"), handle)
    }

    const VIDEO_LIST: &str = r#"{
        "kind": "youtube#videoListResponse",
        "items": [{
            "id": "dQw4w9WgXcQ",
            "snippet": {
                "publishedAt": "2009-10-25T06:57:33Z",
                "channelId": "UCuAXFkgsw1L7xaCfnd5JJOw",
                "title": "Never Gonna Give You Up",
                "channelTitle": "Rick Astley",
                "thumbnails": {
                    "default": { "url": "https://i.ytimg.com/vi/dQw4w9WgXcQ/default.jpg", "width": 120, "height": 90 },
                    "high": { "url": "https://i.ytimg.com/vi/dQw4w9WgXcQ/hqdefault.jpg", "width": 480, "height": 360 }
                }
            }
        }]
    }"#;

    #[test]
    fn parses_snippet_fields() {
        let metadata = parse_video_list("dQw4w9WgXcQ", VIDEO_LIST).unwrap();

        assert_eq!(metadata.title, "Never Gonna Give You Up");
        assert_eq!(metadata.channel, "Rick Astley");
        assert_eq!(
            metadata.published,
            Utc.with_ymd_and_hms(2009, 10, 25, 6, 57, 33).unwrap()
        );
        assert_eq!(
            metadata.thumbnail_url.as_deref(),
            Some("https://i.ytimg.com/vi/dQw4w9WgXcQ/hqdefault.jpg")
        );
    }

    #[test]
    fn falls_back_to_smaller_thumbnail() {
        let body = VIDEO_LIST.replace("\"high\"", "\"maxres\"");
        let metadata = parse_video_list("dQw4w9WgXcQ", &body).unwrap();

        assert_eq!(
            metadata.thumbnail_url.as_deref(),
            Some("https://i.ytimg.com/vi/dQw4w9WgXcQ/default.jpg")
        );
    }

    #[test]
    fn empty_items_means_not_found() {
        let err = parse_video_list("zzzzzzzzzzz", r#"{"items": []}"#).unwrap_err();
        assert!(matches!(err, Error::VideoNotFound(ref id) if id == "zzzzzzzzzzz"));
    }

    #[test]
    fn malformed_body_is_an_error() {
        assert!(matches!(
            parse_video_list("x", "<html>"),
            Err(Error::Json(_))
        ));
    }

    #[tokio::test]
    async fn fetches_snippet_over_http() {
        let (base_url, server) = serve_once("200 OK", VIDEO_LIST).await;
        let service = MetadataService::with_base_url("test-key", base_url);

        let metadata = service.fetch_metadata("dQw4w9WgXcQ").await.unwrap();
        let request_line = server.await.unwrap();

        assert_eq!(metadata.title, "Never Gonna Give You Up");
        assert!(request_line.starts_with("GET /youtube/v3/videos?"));
        assert!(request_line.contains("part=snippet"));
        assert!(request_line.contains("id=dQw4w9WgXcQ"));
        assert!(request_line.contains("key=test-key"));
    }

    #[tokio::test]
    async fn non_success_status_is_an_api_error() {
        let body = r#"{"error":{"code":403,"message":"API key not valid"}}"#;
        let (base_url, server) = serve_once("403 Forbidden", body).await;
        let service = MetadataService::with_base_url("bad-key", base_url);

        let err = service.fetch_metadata("dQw4w9WgXcQ").await.unwrap_err();
        server.await.unwrap();

        assert!(matches!(
            err,
            Error::YouTubeApi { status: 403, ref message } if message.contains("API key not valid")
        ));
    }
}
