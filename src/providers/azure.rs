use std::time::Duration;

use async_trait::async_trait;
use log::error;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::errors::ProviderError;
use crate::providers::openai::ChatMessage;
use crate::providers::Provider;

/// API version pinned by the Azure chat-completions endpoint
const API_VERSION: &str = "2024-06-01";

/// Azure OpenAI client addressing a model through a deployment name
#[derive(Debug)]
pub struct Azure {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication, sent in the api-key header
    api_key: String,
    /// Resource endpoint, e.g. https://myresource.openai.azure.com
    endpoint: String,
    /// Deployment name that selects the model
    deployment: String,
}

/// Azure chat completion request
#[derive(Debug, Serialize)]
pub struct AzureRequest {
    /// The messages for the conversation
    messages: Vec<ChatMessage>,

    /// Maximum number of tokens to generate
    max_tokens: u32,

    /// Temperature for generation
    temperature: f32,
}

/// Azure chat completion response (same choices shape as OpenAI)
#[derive(Debug, Deserialize)]
pub struct AzureResponse {
    /// The completion choices
    pub choices: Vec<AzureChoice>,
}

/// Individual completion choice in an Azure response
#[derive(Debug, Deserialize)]
pub struct AzureChoice {
    /// The generated message
    pub message: ChatMessage,
}

impl AzureRequest {
    /// Create a new Azure request with a deterministic temperature of 0
    pub fn new(max_tokens: u32) -> Self {
        Self {
            messages: Vec::new(),
            max_tokens,
            temperature: 0.0,
        }
    }

    /// Add a message to the request
    pub fn add_message(mut self, role: impl Into<String>, content: impl Into<String>) -> Self {
        self.messages.push(ChatMessage {
            role: role.into(),
            content: content.into(),
        });
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

impl Azure {
    /// Create a new Azure client
    pub fn new(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        deployment: impl Into<String>,
        timeout_secs: u64,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            deployment: deployment.into(),
        }
    }

    /// Complete a chat request
    pub async fn complete(&self, request: AzureRequest) -> Result<AzureResponse, ProviderError> {
        let api_url = format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint.trim_end_matches('/'),
            self.deployment,
            API_VERSION
        );

        let response = self
            .client
            .post(&api_url)
            .header("Content-Type", "application/json")
            .header("api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    ProviderError::ConnectionError(e.to_string())
                } else {
                    ProviderError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Azure OpenAI API error ({}): {}", status, error_text);
            if status == reqwest::StatusCode::UNAUTHORIZED {
                return Err(ProviderError::AuthenticationError(error_text));
            }
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: error_text,
            });
        }

        response
            .json::<AzureResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))
    }

    /// Extract text from an Azure response
    pub fn extract_text_from_response(response: &AzureResponse) -> String {
        response
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Provider for Azure {
    type Request = AzureRequest;
    type Response = AzureResponse;

    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError> {
        Azure::complete(self, request).await
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let request = AzureRequest::new(10).add_message("user", "Hello");
        Azure::complete(self, request).await?;
        Ok(())
    }

    fn extract_text(response: &Self::Response) -> String {
        Self::extract_text_from_response(response)
    }
}
