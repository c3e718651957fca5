use std::time::Duration;

use async_openai::{config::OpenAIConfig, Client};
use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde_json::{json, Value};

use crate::{
    config::Config,
    errors::{AppError, AppResult},
};

/// A chat-completion backend returning the raw assistant text.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionModel: Send + Sync {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> AppResult<String>;
}

pub struct OpenAiCompletionModel {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
    timeout: Duration,
}

impl OpenAiCompletionModel {
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(config.openai_api_key.expose_secret())
            .with_api_base(&config.openai_api_base);

        Self {
            client: Client::with_config(openai_config),
            model: config.llm_model.clone(),
            temperature: config.llm_temperature,
            timeout: Duration::from_secs(config.llm_timeout_seconds),
        }
    }
}

#[async_trait]
impl CompletionModel for OpenAiCompletionModel {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> AppResult<String> {
        let request = json!({
            "model": self.model,
            "temperature": self.temperature,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": user_prompt },
            ],
        });

        log::info!("Requesting completion from model '{}'", self.model);

        let chat = self.client.chat();
        let response: Value = tokio::time::timeout(self.timeout, chat.create_byot(request))
            .await
            .map_err(|_| {
                AppError::UpstreamError(format!(
                    "LLM request timed out after {}s",
                    self.timeout.as_secs()
                ))
            })??;

        extract_message_content(&response)
    }
}

/// Pulls the first choice's message text out of a chat-completion response.
pub fn extract_message_content(response: &Value) -> AppResult<String> {
    let choice = response
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .ok_or_else(|| AppError::UpstreamError("LLM response has no choices".to_string()))?;

    if let Some(reason) = choice.get("finish_reason").and_then(Value::as_str) {
        if reason == "length" {
            log::warn!("LLM response was cut off at the token limit");
        }
    }

    choice
        .get("message")
        .and_then(|message| message.get("content"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| AppError::UpstreamError("LLM response has no message content".to_string()))
}
