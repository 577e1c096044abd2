use log::{debug, warn};

use crate::app_config::{ChatConfig, ChatProvider};
use crate::errors::ProviderError;
use crate::providers::azure::{Azure, AzureRequest};
use crate::providers::openai::{OpenAi, OpenAiRequest};

// @module: Answer generation over fetched page content

/// Service that turns cached page content plus a question into a concise answer
pub struct AnswerService {
    // @field: Chat provider configuration
    config: ChatConfig,

    // @field: Resolved API key for the active provider
    api_key: String,
}

impl AnswerService {
    /// Create a new answer service with a resolved credential
    pub fn new(config: ChatConfig, api_key: impl Into<String>) -> Self {
        Self {
            config,
            api_key: api_key.into(),
        }
    }

    /// Whether an API key has been configured for the active provider
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Replace the API key, e.g. after an interactive prompt
    pub fn set_api_key(&mut self, api_key: impl Into<String>) {
        self.api_key = api_key.into();
    }

    /// The active provider type
    pub fn provider(&self) -> &ChatProvider {
        &self.config.provider
    }

    /// Build the user prompt for a question, truncating the content to the
    /// configured character cap so request size stays bounded regardless of
    /// how large the fetched page was.
    pub fn build_user_prompt(&self, content: &str, question: &str) -> String {
        let excerpt = truncate_chars(content, self.config.common.max_content_chars);
        if excerpt.len() < content.len() {
            debug!(
                "Content truncated from {} to {} chars for the prompt",
                content.chars().count(),
                self.config.common.max_content_chars
            );
        }

        self.config
            .common
            .user_prompt_template
            .replace("{content}", excerpt)
            .replace("{question}", question)
    }

    /// Answer a question about the given content
    pub async fn answer_question(
        &self,
        content: &str,
        question: &str,
    ) -> Result<String, ProviderError> {
        let user_prompt = self.build_user_prompt(content, question);
        let system_prompt = self.config.common.system_prompt.clone();

        match self.config.provider {
            ChatProvider::OpenAI => {
                let client = OpenAi::new(
                    &self.api_key,
                    self.config.get_endpoint(),
                    self.config.get_timeout_secs(),
                );

                let mut request =
                    OpenAiRequest::new(self.config.get_model(), self.config.get_max_tokens())
                        .add_message("system", system_prompt)
                        .add_message("user", user_prompt);
                if let Some(temperature) = self.config.get_temperature() {
                    request = request.temperature(temperature);
                }

                let response = client.complete(request).await?;
                let answer = OpenAi::extract_text_from_response(&response);
                if answer.is_empty() {
                    warn!("OpenAI returned a completion with no choices");
                }
                Ok(answer)
            }
            ChatProvider::Azure => {
                let client = Azure::new(
                    &self.api_key,
                    self.config.get_endpoint(),
                    self.config.get_deployment(),
                    self.config.get_timeout_secs(),
                );

                let mut request = AzureRequest::new(self.config.get_max_tokens())
                    .add_message("system", system_prompt)
                    .add_message("user", user_prompt);
                if let Some(temperature) = self.config.get_temperature() {
                    request = request.temperature(temperature);
                }

                let response = client.complete(request).await?;
                let answer = Azure::extract_text_from_response(&response);
                if answer.is_empty() {
                    warn!("Azure OpenAI returned a completion with no choices");
                }
                Ok(answer)
            }
        }
    }

    /// Send a minimal request to verify the credential and endpoint
    pub async fn test_connection(&self) -> Result<(), ProviderError> {
        match self.config.provider {
            ChatProvider::OpenAI => {
                let client = OpenAi::new(
                    &self.api_key,
                    self.config.get_endpoint(),
                    self.config.get_timeout_secs(),
                );
                let request = OpenAiRequest::new(self.config.get_model(), 10)
                    .add_message("user", "Say hello");
                client.complete(request).await?;
            }
            ChatProvider::Azure => {
                let client = Azure::new(
                    &self.api_key,
                    self.config.get_endpoint(),
                    self.config.get_deployment(),
                    self.config.get_timeout_secs(),
                );
                let request = AzureRequest::new(10).add_message("user", "Say hello");
                client.complete(request).await?;
            }
        }
        Ok(())
    }
}

/// Truncate a string to at most `max_chars` characters on a char boundary
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}
