use crate::core::chunker::{Chunk, full_text};
use crate::core::completion::TextCompleter;
use crate::error::Result;
use futures::{StreamExt, TryStreamExt, stream};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionSummary {
    pub chunk: Chunk,
    pub summary: String,
}

/// Output of one pipeline run: a digest of the whole transcript plus one
/// summary per chunk, in chunk order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryResult {
    pub executive: String,
    pub sections: Vec<SectionSummary>,
}

/// Progress notifications emitted while a run is in flight.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    ExecutiveStarted,
    ExecutiveFinished,
    SectionStarted { index: usize, total: usize },
    SectionFinished { index: usize, total: usize },
}

pub fn executive_prompt(full_text: &str) -> String {
    format!(
        "Provide 5-8 concise executive bullet points.\n\
         Do not hallucinate.\n\
         Text:\n\
         {full_text}\n"
    )
}

pub fn section_prompt(chunk_text: &str) -> String {
    format!(
        "Summarize this section clearly in 4-5 lines.\n\
         Stay factual.\n\
         {chunk_text}\n"
    )
}

#[derive(Clone)]
pub struct SummaryPipeline<C> {
    completer: C,
    concurrency: usize,
}

impl<C: TextCompleter + Sync> SummaryPipeline<C> {
    pub fn new(completer: C) -> Self {
        Self {
            completer,
            concurrency: 1,
        }
    }

    /// Allows up to `limit` section summaries in flight at once. Results keep
    /// chunk order whatever the limit.
    pub fn with_concurrency(mut self, limit: usize) -> Self {
        self.concurrency = limit.max(1);
        self
    }

    pub async fn generate_executive_summary(&self, full_text: &str) -> Result<String> {
        self.completer.complete(&executive_prompt(full_text)).await
    }

    pub async fn generate_section_summary(&self, chunk_text: &str) -> Result<String> {
        self.completer.complete(&section_prompt(chunk_text)).await
    }

    #[tracing::instrument(skip_all, fields(chunks = chunks.len(), concurrency = self.concurrency))]
    pub async fn run(
        &self,
        chunks: Vec<Chunk>,
        progress: Option<&UnboundedSender<PipelineEvent>>,
    ) -> Result<SummaryResult> {
        let notify = |event: PipelineEvent| {
            if let Some(tx) = progress {
                let _ = tx.send(event);
            }
        };
        let total = chunks.len();

        notify(PipelineEvent::ExecutiveStarted);
        let executive = self.generate_executive_summary(&full_text(&chunks)).await?;
        notify(PipelineEvent::ExecutiveFinished);
        tracing::info!("Executive summary generated");

        let summaries: Vec<String> = if self.concurrency <= 1 {
            let mut summaries = Vec::with_capacity(total);
            for (index, chunk) in chunks.iter().enumerate() {
                notify(PipelineEvent::SectionStarted { index, total });
                summaries.push(self.generate_section_summary(&chunk.text).await?);
                notify(PipelineEvent::SectionFinished { index, total });
            }
            summaries
        } else {
            // Owned texts keep the stream future `Send` for `tokio::spawn`
            let notify = &notify;
            let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
            stream::iter(texts.into_iter().enumerate())
                .map(|(index, text)| async move {
                    notify(PipelineEvent::SectionStarted { index, total });
                    let summary = self.generate_section_summary(&text).await?;
                    notify(PipelineEvent::SectionFinished { index, total });
                    Ok::<_, crate::error::Error>(summary)
                })
                .buffered(self.concurrency)
                .try_collect()
                .await?
        };
        tracing::info!(sections = summaries.len(), "Section summaries generated");

        let sections = chunks
            .into_iter()
            .zip(summaries)
            .map(|(chunk, summary)| SectionSummary { chunk, summary })
            .collect();

        Ok(SummaryResult {
            executive,
            sections,
        })
    }
}
