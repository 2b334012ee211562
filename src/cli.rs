use crate::config::{DEFAULT_MODEL, DEFAULT_TEMPERATURE};
use crate::core::chunker::DEFAULT_MAX_WORDS;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "vidsum")]
#[command(about = "Summarize YouTube videos section by section")]
#[command(version = "0.1.0")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// OpenAI API key used for summaries
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, global = true)]
    pub openai_api_key: Option<String>,

    /// Model used for summaries
    #[arg(long, env = "VIDSUM_MODEL", default_value = DEFAULT_MODEL, global = true)]
    pub model: String,

    /// Sampling temperature (0-2)
    #[arg(long, env = "VIDSUM_TEMPERATURE", default_value_t = DEFAULT_TEMPERATURE, global = true)]
    pub temperature: f32,

    /// YouTube Data API key used for title, channel and thumbnail lookup
    #[arg(long, env = "YOUTUBE_API_KEY", hide_env_values = true, global = true)]
    pub youtube_api_key: Option<String>,

    /// Preferred transcript languages (comma-separated)
    #[arg(short, long, env = "VIDSUM_LANGUAGES", default_value = "en", global = true)]
    pub languages: String,

    /// Approximate number of words per section
    #[arg(long, env = "VIDSUM_MAX_WORDS", default_value_t = DEFAULT_MAX_WORDS, global = true)]
    pub max_words: usize,

    /// Section summaries requested in parallel
    #[arg(long, env = "VIDSUM_CONCURRENCY", default_value_t = 1, global = true)]
    pub concurrency: usize,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Summarize a video and print the report
    Summarize {
        /// YouTube video URL
        url: String,

        /// Print the result as JSON instead of markdown
        #[arg(long)]
        json: bool,

        /// Wrap report text at this column
        #[arg(short, long, default_value_t = 100)]
        width: usize,
    },

    /// Fetch and split a transcript without calling the model
    Chunks {
        /// YouTube video URL
        url: String,
    },

    /// Chat with the offline canned responder
    Chat,

    /// Open TUI interface
    Tui,
}
