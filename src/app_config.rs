use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Reader service config used to turn a URL into plain text
    #[serde(default)]
    pub fetcher: FetcherConfig,

    /// Chat-completion config used to answer questions
    #[serde(default)]
    pub chat: ChatConfig,

    /// Maximum number of questions per fetched URL (None = unbounded)
    #[serde(default)]
    pub question_limit: Option<u32>,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Chat-completion provider type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChatProvider {
    // @provider: OpenAI-compatible /chat/completions endpoint
    #[default]
    OpenAI,
    // @provider: Azure OpenAI deployment endpoint
    Azure,
}

impl ChatProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::OpenAI => "OpenAI",
            Self::Azure => "Azure OpenAI",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::OpenAI => "openai".to_string(),
            Self::Azure => "azure".to_string(),
        }
    }

    /// Environment variable consulted for this provider's API key
    pub fn api_key_env_var(&self) -> &'static str {
        match self {
            Self::OpenAI => "OPENAI_API_KEY",
            Self::Azure => "AZURE_OPENAI_API_KEY",
        }
    }
}

// Implement Display trait for ChatProvider
impl std::fmt::Display for ChatProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

// Implement FromStr trait for ChatProvider
impl std::str::FromStr for ChatProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "azure" => Ok(Self::Azure),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Reader service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FetcherConfig {
    /// Reader proxy endpoint prepended to the target URL
    #[serde(default = "default_reader_endpoint")]
    pub endpoint: String,

    /// API key for the reader service
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            endpoint: default_reader_endpoint(),
            api_key: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl FetcherConfig {
    /// Resolve the reader API key: environment first, then the config value.
    ///
    /// Returns an empty string when neither is set; the caller decides whether
    /// to prompt interactively or surface a missing-credential warning.
    pub fn resolve_api_key(&self) -> String {
        std::env::var("JINA_API_KEY")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| self.api_key.clone())
    }
}

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    // @field: Model name
    #[serde(default = "String::new")]
    pub model: String,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Azure deployment name (unused by other providers)
    #[serde(default = "String::new")]
    pub deployment: String,

    // @field: Max output tokens per answer
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    // @field: Sampling temperature (None = provider default)
    #[serde(default)]
    pub temperature: Option<f32>,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ProviderConfig {
    // @param provider_type: Provider enum
    // @returns: Provider config with defaults
    pub fn new(provider_type: ChatProvider) -> Self {
        match provider_type {
            ChatProvider::OpenAI => Self {
                provider_type: "openai".to_string(),
                model: default_openai_model(),
                api_key: String::new(),
                endpoint: default_openai_endpoint(),
                deployment: String::new(),
                max_tokens: default_max_tokens(),
                temperature: None,
                timeout_secs: default_timeout_secs(),
            },
            ChatProvider::Azure => Self {
                provider_type: "azure".to_string(),
                model: default_azure_model(),
                api_key: String::new(),
                endpoint: String::new(),
                deployment: default_azure_deployment(),
                max_tokens: default_max_tokens(),
                temperature: Some(default_azure_temperature()),
                timeout_secs: default_timeout_secs(),
            },
        }
    }
}

/// Chat-completion service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChatConfig {
    /// Chat provider to use
    #[serde(default)]
    pub provider: ChatProvider,

    /// Available chat providers
    #[serde(default)]
    pub available_providers: Vec<ProviderConfig>,

    /// Common prompt settings
    #[serde(default)]
    pub common: ChatCommonConfig,
}

/// Common prompt settings applicable to all providers
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChatCommonConfig {
    /// System prompt sent with every question
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// User prompt template
    /// Placeholders: {content}, {question}
    #[serde(default = "default_user_prompt_template")]
    pub user_prompt_template: String,

    /// Maximum number of content characters embedded in a prompt
    #[serde(default = "default_max_content_chars")]
    pub max_content_chars: usize,
}

impl Default for ChatCommonConfig {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            user_prompt_template: default_user_prompt_template(),
            max_content_chars: default_max_content_chars(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_tokens() -> u32 {
    700
}

fn default_max_content_chars() -> usize {
    8000
}

fn default_reader_endpoint() -> String {
    "https://r.jina.ai".to_string()
}

fn default_openai_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_openai_model() -> String {
    "gpt-4o".to_string()
}

fn default_azure_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_azure_deployment() -> String {
    "gpt-4o-mini".to_string()
}

fn default_azure_temperature() -> f32 {
    0.0
}

fn default_system_prompt() -> String {
    "You are a helpful assistant.".to_string()
}

fn default_user_prompt_template() -> String {
    "Here's some content:\n\n{content}\n\nBased on this content, please answer the following question and be concise: {question}".to_string()
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.fetcher.endpoint.trim().is_empty() {
            return Err(anyhow!("Reader endpoint must not be empty"));
        }

        if let Some(limit) = self.question_limit {
            if limit == 0 {
                return Err(anyhow!("question_limit must be at least 1 when set"));
            }
        }

        // The Azure shape addresses the model through a deployment name
        if self.chat.provider == ChatProvider::Azure {
            if let Some(provider_config) = self.chat.get_active_provider_config() {
                if provider_config.endpoint.is_empty() {
                    return Err(anyhow!("Endpoint is required for the Azure provider"));
                }
                if provider_config.deployment.is_empty() {
                    return Err(anyhow!("Deployment name is required for the Azure provider"));
                }
            }
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            fetcher: FetcherConfig::default(),
            chat: ChatConfig::default(),
            question_limit: None,
            log_level: LogLevel::default(),
        }
    }
}

impl ChatConfig {
    /// Get the active provider configuration from the available_providers array
    pub fn get_active_provider_config(&self) -> Option<&ProviderConfig> {
        let provider_str = self.provider.to_lowercase_string();
        self.available_providers
            .iter()
            .find(|p| p.provider_type == provider_str)
    }

    /// Get a mutable reference to the active provider configuration
    pub fn get_active_provider_config_mut(&mut self) -> Option<&mut ProviderConfig> {
        let provider_str = self.provider.to_lowercase_string();
        self.available_providers
            .iter_mut()
            .find(|p| p.provider_type == provider_str)
    }

    /// Get the model for the active provider
    pub fn get_model(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.model.is_empty() {
                return provider_config.model.clone();
            }
        }

        // Default fallback based on provider type
        match self.provider {
            ChatProvider::OpenAI => default_openai_model(),
            ChatProvider::Azure => default_azure_model(),
        }
    }

    /// Resolve the API key for the active provider: environment first, then config.
    ///
    /// Returns an empty string when neither is set; the caller decides whether
    /// to prompt interactively or surface a missing-credential warning.
    pub fn resolve_api_key(&self) -> String {
        if let Ok(key) = std::env::var(self.provider.api_key_env_var()) {
            if !key.trim().is_empty() {
                return key;
            }
        }

        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.api_key.is_empty() {
                return provider_config.api_key.clone();
            }
        }

        String::new()
    }

    /// Get the endpoint for the active provider
    pub fn get_endpoint(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.endpoint.is_empty() {
                return provider_config.endpoint.clone();
            }
        }

        // Default fallback based on provider type; Azure has no meaningful default
        match self.provider {
            ChatProvider::OpenAI => default_openai_endpoint(),
            ChatProvider::Azure => String::new(),
        }
    }

    /// Get the max output tokens for the active provider
    pub fn get_max_tokens(&self) -> u32 {
        if let Some(provider_config) = self.get_active_provider_config() {
            if provider_config.max_tokens > 0 {
                return provider_config.max_tokens;
            }
        }

        default_max_tokens()
    }

    /// Get the sampling temperature for the active provider
    pub fn get_temperature(&self) -> Option<f32> {
        if let Some(provider_config) = self.get_active_provider_config() {
            return provider_config.temperature;
        }

        match self.provider {
            ChatProvider::OpenAI => None,
            ChatProvider::Azure => Some(default_azure_temperature()),
        }
    }

    /// Get the request timeout for the active provider
    pub fn get_timeout_secs(&self) -> u64 {
        if let Some(provider_config) = self.get_active_provider_config() {
            if provider_config.timeout_secs > 0 {
                return provider_config.timeout_secs;
            }
        }

        default_timeout_secs()
    }

    /// Get the Azure deployment name for the active provider
    pub fn get_deployment(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.deployment.is_empty() {
                return provider_config.deployment.clone();
            }
        }

        String::new()
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        let mut config = Self {
            provider: ChatProvider::default(),
            available_providers: Vec::new(),
            common: ChatCommonConfig::default(),
        };

        // Add default providers
        config
            .available_providers
            .push(ProviderConfig::new(ChatProvider::OpenAI));
        config
            .available_providers
            .push(ProviderConfig::new(ChatProvider::Azure));

        config
    }
}
