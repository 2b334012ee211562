use derive_more::{Display, From};

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Display, From)]
pub enum Error {
    #[from(String, &String, &str)]
    #[display("{_0}")]
    Custom(String),

    #[display("Could not find a video ID in `{_0}`. Please check the URL.")]
    InvalidUrl(String),

    #[display("No video found for id `{_0}`")]
    VideoNotFound(String),

    #[display("Transcript unavailable for `{video_id}`: {reason}")]
    TranscriptUnavailable { video_id: String, reason: String },

    #[display("Transcript is empty, nothing to summarize")]
    EmptyTranscript,

    #[display("YouTube API error: {status} - {message}")]
    YouTubeApi { status: u16, message: String },

    #[display("An OpenAI API key is required. Set OPENAI_API_KEY or pass --openai-api-key.")]
    MissingApiKey,

    #[display("Model returned no text content")]
    EmptyCompletion,

    // -- Externals
    #[from]
    #[display("OpenAI error: {_0}")]
    OpenAi(async_openai::error::OpenAIError),

    #[from]
    #[display("HTTP error: {_0}")]
    Http(reqwest::Error),

    #[from]
    #[display("JSON error: {_0}")]
    Json(serde_json::Error),

    #[from]
    #[display("IO error: {_0}")]
    Io(std::io::Error),
}

impl Error {
    pub fn custom(val: impl std::fmt::Display) -> Self {
        Self::Custom(val.to_string())
    }
}

impl std::error::Error for Error {}
