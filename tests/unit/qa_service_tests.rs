/*!
 * Tests for prompt building and content truncation
 */

use webqa::app_config::ChatConfig;
use webqa::providers::Provider;
use webqa::qa_service::{truncate_chars, AnswerService};

use crate::common::mock_providers::{MockChat, MockRequest};

fn service_with_cap(max_content_chars: usize) -> AnswerService {
    let mut config = ChatConfig::default();
    config.common.max_content_chars = max_content_chars;
    AnswerService::new(config, "sk-test-key")
}

#[test]
fn test_buildUserPrompt_shouldEmbedContentAndQuestion() {
    let service = service_with_cap(8000);
    let prompt = service.build_user_prompt("the page text", "What is this?");

    assert!(prompt.contains("Here's some content:"));
    assert!(prompt.contains("the page text"));
    assert!(prompt.contains("be concise: What is this?"));
}

#[test]
fn test_buildUserPrompt_withOversizedContent_shouldTruncateToCap() {
    let service = service_with_cap(100);
    let content = "x".repeat(500);

    let prompt = service.build_user_prompt(&content, "q");

    assert!(prompt.contains(&"x".repeat(100)));
    assert!(!prompt.contains(&"x".repeat(101)));
}

#[test]
fn test_buildUserPrompt_withCustomTemplate_shouldUseIt() {
    let mut config = ChatConfig::default();
    config.common.user_prompt_template = "CONTEXT={content} QUERY={question}".to_string();
    let service = AnswerService::new(config, "sk-test-key");

    let prompt = service.build_user_prompt("abc", "def");
    assert_eq!(prompt, "CONTEXT=abc QUERY=def");
}

#[test]
fn test_truncateChars_shouldCountCharactersNotBytes() {
    // Multibyte content must not be split inside a character.
    let content = "héllo wörld".repeat(10);
    let truncated = truncate_chars(&content, 15);
    assert_eq!(truncated.chars().count(), 15);
}

#[test]
fn test_answerService_hasApiKey_shouldReflectCredential() {
    let mut service = AnswerService::new(ChatConfig::default(), "");
    assert!(!service.has_api_key());

    service.set_api_key("sk-late-key");
    assert!(service.has_api_key());
}

#[tokio::test]
async fn test_mockProvider_working_shouldAnswerThroughTrait() {
    let provider = MockChat::working();

    let response = provider
        .complete(MockRequest {
            question: "what?".to_string(),
        })
        .await
        .expect("mock answer");

    assert_eq!(MockChat::extract_text(&response), "[ANSWER] what?");
    assert_eq!(provider.request_count(), 1);
}

#[tokio::test]
async fn test_mockProvider_failing_shouldSurfaceApiError() {
    let provider = MockChat::failing();

    let result = provider
        .complete(MockRequest {
            question: "what?".to_string(),
        })
        .await;

    assert!(result.is_err());
}

#[test]
fn test_mockProvider_empty_shouldExtractEmptyText() {
    let provider = MockChat::empty();

    let response = tokio_test::block_on(provider.complete(MockRequest {
        question: "what?".to_string(),
    }))
    .expect("mock response");

    assert_eq!(MockChat::extract_text(&response), "");
}
