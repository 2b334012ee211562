use crate::cli::Cli;
use crate::core::chunker::DEFAULT_MAX_WORDS;
use crate::error::{Error, Result};

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

/// Settings for the text-completion backend.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionConfig {
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub completion: Option<CompletionConfig>,
    pub youtube_api_key: Option<String>,
    pub languages: Vec<String>,
    pub max_words: usize,
    pub concurrency: usize,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        if !(0.0..=2.0).contains(&cli.temperature) {
            return Err(Error::custom(format!(
                "temperature must be between 0 and 2, got {}",
                cli.temperature
            )));
        }
        if cli.max_words == 0 {
            return Err(Error::custom("max-words must be greater than zero"));
        }
        if cli.concurrency == 0 {
            return Err(Error::custom("concurrency must be greater than zero"));
        }

        let languages: Vec<String> = cli
            .languages
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if languages.is_empty() {
            return Err(Error::custom("at least one transcript language is required"));
        }

        let completion = non_blank(cli.openai_api_key.as_deref()).map(|api_key| CompletionConfig {
            api_key,
            model: cli.model.clone(),
            temperature: cli.temperature,
        });

        Ok(Self {
            completion,
            youtube_api_key: non_blank(cli.youtube_api_key.as_deref()),
            languages,
            max_words: cli.max_words,
            concurrency: cli.concurrency,
        })
    }

    /// Completion settings, required by anything that calls the model.
    pub fn require_completion(&self) -> Result<&CompletionConfig> {
        self.completion.as_ref().ok_or(Error::MissingApiKey)
    }
}

#[allow(dead_code)]
impl Default for Config {
    fn default() -> Self {
        Self {
            completion: None,
            youtube_api_key: None,
            languages: vec!["en".to_string()],
            max_words: DEFAULT_MAX_WORDS,
            concurrency: 1,
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
