//! OpenAI-compatible chat-completions adapter.
//!
//! Implements both [`Responder`] and [`Evaluator`] against any endpoint that
//! speaks the chat-completions API (OpenAI, Gemini's compatibility layer,
//! Ollama, llama.cpp server, ...).

use std::time::Duration;

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessage,
    CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use tracing::debug;

use crate::collaborator::{Evaluator, Responder};
use crate::config::Config;
use crate::error::CollaboratorError;
use crate::participant::Side;
use crate::session::{Turn, format_arguments, format_history};

/// Endpoint and credential for the hosted model.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// OpenAI-compatible API base URL.
    pub api_base: String,
    /// API key for authentication.
    pub api_key: String,
}

impl ApiConfig {
    pub fn new(api_base: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            api_key: api_key.into(),
        }
    }

    pub fn has_credential(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

/// Chat-completions backed debater and coach.
pub struct OpenAiDebater {
    client: Client<OpenAIConfig>,
    has_credential: bool,
    model: String,
    max_tokens: u32,
    config: Config,
}

impl OpenAiDebater {
    pub fn new(api: &ApiConfig, config: Config) -> Result<Self, CollaboratorError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.model.request_timeout_secs))
            .connect_timeout(Duration::from_secs(30))
            .build()?;

        let openai_config = OpenAIConfig::new()
            .with_api_key(&api.api_key)
            .with_api_base(&api.api_base);

        Ok(Self {
            client: Client::with_config(openai_config).with_http_client(http_client),
            has_credential: api.has_credential(),
            model: config.model.chat_model.clone(),
            max_tokens: config.model.max_tokens,
            config,
        })
    }

    /// Single-prompt completion. No retries: failures go back to the caller.
    async fn complete(&self, prompt: String) -> Result<String, CollaboratorError> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .max_completion_tokens(self.max_tokens)
            .messages(vec![ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessage {
                    content: prompt.into(),
                    name: None,
                },
            )])
            .build()?;

        let response = self.client.chat().create(request).await?;
        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();
        Ok(content)
    }

    fn require_credential(&self) -> Result<(), CollaboratorError> {
        if self.has_credential {
            Ok(())
        } else {
            Err(CollaboratorError::MissingCredential(
                "set OPENAI_API_KEY (or GEMINI_API_KEY)".to_string(),
            ))
        }
    }
}

#[async_trait]
impl Responder for OpenAiDebater {
    async fn reply(
        &self,
        topic: &str,
        user_side: Side,
        ai_side: Side,
        history: &[Turn],
        latest_argument: &str,
    ) -> Result<String, CollaboratorError> {
        let prompt = self.config.responder_prompt(
            topic,
            user_side,
            ai_side,
            &format_history(history),
            latest_argument,
        );
        debug!(model = %self.model, prompt_len = prompt.len(), "Sending responder prompt");
        self.complete(prompt).await
    }

    fn check_ready(&self) -> Result<(), CollaboratorError> {
        self.require_credential()
    }
}

#[async_trait]
impl Evaluator for OpenAiDebater {
    async fn evaluate(
        &self,
        topic: &str,
        user_side: Side,
        human_turns: &[Turn],
    ) -> Result<String, CollaboratorError> {
        let prompt =
            self.config
                .evaluator_prompt(topic, user_side, &format_arguments(human_turns));
        debug!(model = %self.model, prompt_len = prompt.len(), "Sending evaluator prompt");
        self.complete(prompt).await
    }

    fn check_ready(&self) -> Result<(), CollaboratorError> {
        self.require_credential()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credential_is_not_ready() {
        let api = ApiConfig::new("https://api.openai.com/v1", "  ");
        let debater = OpenAiDebater::new(&api, Config::default()).unwrap();
        assert!(matches!(
            Responder::check_ready(&debater),
            Err(CollaboratorError::MissingCredential(_))
        ));
        assert!(Evaluator::check_ready(&debater).is_err());
    }

    #[test]
    fn test_credential_present_is_ready() {
        let api = ApiConfig::new("http://localhost:11434/v1", "sk-test");
        let debater = OpenAiDebater::new(&api, Config::default()).unwrap();
        assert!(Responder::check_ready(&debater).is_ok());
        assert!(Evaluator::check_ready(&debater).is_ok());
    }
}
