pub mod chunker;
pub mod completion;
pub mod metadata;
pub mod pipeline;
pub mod report;
pub mod responder;
pub mod summary;
pub mod transcript;

pub use pipeline::PipelineEvent;
pub use report::{render_chunk_plan, render_markdown, wrap_markdown};
pub use responder::Responder;
pub use summary::{PreparedVideo, SummaryService, VideoSummary};
