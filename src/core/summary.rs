use crate::config::Config;
use crate::core::chunker::{Chunk, chunk_transcript};
use crate::core::completion::{OpenAiCompleter, TextCompleter};
use crate::core::metadata::{MetadataService, VideoMetadata};
use crate::core::pipeline::{PipelineEvent, SummaryPipeline, SummaryResult};
use crate::core::transcript::{TranscriptService, extract_video_id};
use crate::error::{Error, Result};
use serde::Serialize;
use tokio::sync::mpsc::UnboundedSender;

/// A video that has been looked up and chunked but not yet summarized.
#[derive(Debug, Clone, Serialize)]
pub struct PreparedVideo {
    pub video_id: String,
    pub metadata: Option<VideoMetadata>,
    pub chunks: Vec<Chunk>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VideoSummary {
    pub video_id: String,
    pub metadata: Option<VideoMetadata>,
    #[serde(flatten)]
    pub result: SummaryResult,
}

/// Fetches metadata and transcripts, chunks them and runs the pipeline.
#[derive(Clone)]
pub struct SummaryService<C = OpenAiCompleter> {
    transcripts: TranscriptService,
    metadata: Option<MetadataService>,
    pipeline: Option<SummaryPipeline<C>>,
    max_words: usize,
}

impl SummaryService<OpenAiCompleter> {
    pub fn new(config: &Config) -> Result<Self> {
        let pipeline = config.completion.as_ref().map(|completion| {
            SummaryPipeline::new(OpenAiCompleter::new(completion))
                .with_concurrency(config.concurrency)
        });

        Ok(Self {
            transcripts: TranscriptService::new(config.languages.clone())?,
            metadata: config.youtube_api_key.as_deref().map(MetadataService::new),
            pipeline,
            max_words: config.max_words,
        })
    }
}

impl<C: TextCompleter + Sync> SummaryService<C> {
    #[tracing::instrument(skip(self))]
    pub async fn prepare(&self, url: &str) -> Result<PreparedVideo> {
        let video_id = extract_video_id(url).ok_or_else(|| Error::InvalidUrl(url.to_string()))?;

        let metadata = match &self.metadata {
            Some(service) => Some(service.fetch_metadata(&video_id).await?),
            None => {
                tracing::warn!("No YouTube API key configured, skipping metadata lookup");
                None
            }
        };

        let segments = self.transcripts.fetch_transcript(&video_id).await?;
        let chunks = chunk_transcript(&segments, self.max_words)?;
        tracing::info!(
            %video_id,
            segments = segments.len(),
            chunks = chunks.len(),
            "Transcript chunked"
        );

        Ok(PreparedVideo {
            video_id,
            metadata,
            chunks,
        })
    }

    pub async fn summarize(
        &self,
        video: PreparedVideo,
        progress: Option<&UnboundedSender<PipelineEvent>>,
    ) -> Result<VideoSummary> {
        let pipeline = self.pipeline.as_ref().ok_or(Error::MissingApiKey)?;

        let PreparedVideo {
            video_id,
            metadata,
            chunks,
        } = video;
        let result = pipeline.run(chunks, progress).await?;

        Ok(VideoSummary {
            video_id,
            metadata,
            result,
        })
    }

    /// Runs the whole flow for one URL, reporting any failure as one error.
    pub async fn summarize_url(&self, url: &str) -> Result<VideoSummary> {
        let video = self.prepare(url).await?;
        self.summarize(video, None).await
    }
}
