use crate::config::CompletionConfig;
use crate::error::{Error, Result};
use async_openai::{
    self,
    config::OpenAIConfig,
    types::responses::{
        CreateResponseArgs, EasyInputMessageArgs, InputItem, InputParam, OutputItem,
        OutputMessageContent, Role,
    },
};
use std::future::Future;

/// Anything that turns a prompt into generated text.
pub trait TextCompleter {
    fn complete(&self, prompt: &str) -> impl Future<Output = Result<String>> + Send;
}

#[derive(Clone)]
pub struct OpenAiCompleter {
    client: async_openai::Client<OpenAIConfig>,
    model: String,
    temperature: f32,
}

impl OpenAiCompleter {
    pub fn new(config: &CompletionConfig) -> Self {
        let openai_config = OpenAIConfig::new().with_api_key(config.api_key.clone());

        Self {
            client: async_openai::Client::with_config(openai_config),
            model: config.model.clone(),
            temperature: config.temperature,
        }
    }
}

impl TextCompleter for OpenAiCompleter {
    #[tracing::instrument(skip_all, fields(model = %self.model, prompt_len = prompt.len()))]
    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = CreateResponseArgs::default()
            .model(self.model.as_str())
            .temperature(self.temperature)
            .input(InputParam::Items(vec![InputItem::EasyMessage(
                EasyInputMessageArgs::default()
                    .role(Role::User)
                    .content(prompt)
                    .build()?,
            )]))
            .build()?;

        let response = self
            .client
            .responses()
            .create(request)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Completion request failed"))?;

        let mut content = String::new();
        for output in response.output {
            if let OutputItem::Message(out) = output {
                for c in out.content {
                    match c {
                        OutputMessageContent::OutputText(text) => content.push_str(&text.text),
                        other => {
                            tracing::warn!(content = ?other, "Unexpected content type");
                        }
                    }
                }
            }
        }

        if content.is_empty() {
            return Err(Error::EmptyCompletion);
        }

        Ok(content)
    }
}
