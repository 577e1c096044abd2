/*!
 * Tests for the application configuration
 */

use std::str::FromStr;

use webqa::app_config::{ChatProvider, Config};

use crate::common::env_is_set;

#[test]
fn test_config_default_shouldUseDocumentedDefaults() {
    let config = Config::default();

    assert_eq!(config.fetcher.endpoint, "https://r.jina.ai");
    assert_eq!(config.question_limit, None);
    assert_eq!(config.chat.provider, ChatProvider::OpenAI);
    assert_eq!(config.chat.get_model(), "gpt-4o");
    assert_eq!(config.chat.get_max_tokens(), 700);
    assert_eq!(config.chat.common.max_content_chars, 8000);
    assert_eq!(config.chat.common.system_prompt, "You are a helpful assistant.");
    assert_eq!(config.chat.get_endpoint(), "https://api.openai.com/v1");
}

#[test]
fn test_config_azureProvider_shouldDefaultToTemperatureZero() {
    let mut config = Config::default();
    config.chat.provider = ChatProvider::Azure;

    assert_eq!(config.chat.get_temperature(), Some(0.0));
    assert_eq!(config.chat.get_model(), "gpt-4o-mini");
}

#[test]
fn test_config_roundTrip_shouldPreserveSettings() {
    let mut config = Config::default();
    config.question_limit = Some(3);
    config.fetcher.api_key = "jina-key".to_string();
    if let Some(provider_config) = config.chat.get_active_provider_config_mut() {
        provider_config.model = "gpt-4o-mini".to_string();
    }

    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("conf.json");
    let json = serde_json::to_string_pretty(&config).expect("serialize config");
    std::fs::write(&path, json).expect("write config");

    let loaded: Config =
        serde_json::from_str(&std::fs::read_to_string(&path).expect("read config"))
            .expect("parse config");

    assert_eq!(loaded.question_limit, Some(3));
    assert_eq!(loaded.fetcher.api_key, "jina-key");
    assert_eq!(loaded.chat.get_model(), "gpt-4o-mini");
}

#[test]
fn test_chatProvider_fromStr_shouldParseKnownProviders() {
    assert_eq!(ChatProvider::from_str("openai").unwrap(), ChatProvider::OpenAI);
    assert_eq!(ChatProvider::from_str("Azure").unwrap(), ChatProvider::Azure);
    assert!(ChatProvider::from_str("ollama").is_err());
}

#[test]
fn test_config_validate_withZeroQuestionLimit_shouldFail() {
    let mut config = Config::default();
    config.question_limit = Some(0);
    assert!(config.validate().is_err());
}

#[test]
fn test_config_validate_azureWithoutEndpoint_shouldFail() {
    let mut config = Config::default();
    config.chat.provider = ChatProvider::Azure;
    assert!(config.validate().is_err());

    if let Some(provider_config) = config.chat.get_active_provider_config_mut() {
        provider_config.endpoint = "https://myresource.openai.azure.com".to_string();
    }
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_resolveApiKey_shouldFallBackToConfigValue() {
    // The environment takes precedence; skip when a real key is exported.
    if env_is_set("OPENAI_API_KEY") {
        return;
    }

    let mut config = Config::default();
    assert_eq!(config.chat.resolve_api_key(), "");

    if let Some(provider_config) = config.chat.get_active_provider_config_mut() {
        provider_config.api_key = "sk-from-config".to_string();
    }
    assert_eq!(config.chat.resolve_api_key(), "sk-from-config");
}

#[test]
fn test_config_fetcherResolveApiKey_shouldFallBackToConfigValue() {
    if env_is_set("JINA_API_KEY") {
        return;
    }

    let mut config = Config::default();
    assert_eq!(config.fetcher.resolve_api_key(), "");

    config.fetcher.api_key = "jina-from-config".to_string();
    assert_eq!(config.fetcher.resolve_api_key(), "jina-from-config");
}
