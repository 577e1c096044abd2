/*!
 * Tests for the session state machine
 */

use webqa::session::{AskDenied, Session};

#[test]
fn test_session_new_shouldStartInInitialState() {
    let session = Session::new();
    assert!(session.is_initial());
    assert_eq!(session.question_limit, None);
}

#[test]
fn test_session_submitUrl_withDifferentUrl_shouldInvalidateCache() {
    let mut session = Session::new();
    session.submit_url("https://example.com");
    session.store_content("content for example.com".to_string());
    session.record_question();
    session.record_question();

    session.submit_url("https://example.org");

    assert!(session.content.is_none());
    assert_eq!(session.question_count, 0);
    assert!(session.needs_fetch());
}

#[test]
fn test_session_emptyQuestion_shouldNeverCount() {
    let mut session = Session::new();
    session.submit_url("https://example.com");
    session.store_content("page".to_string());

    assert_eq!(session.check_ask(""), Err(AskDenied::EmptyQuestion));
    assert_eq!(session.check_ask("\t "), Err(AskDenied::EmptyQuestion));
    assert_eq!(session.question_count, 0);
}

#[test]
fn test_session_limitedVariant_workedExample() {
    // URL with limit 3: ask 3 times, 4th rejected, reset allows asking again.
    let mut session = Session::with_limit(Some(3));
    session.submit_url("https://example.com");
    session.store_content("page".to_string());

    for expected in 1..=3 {
        assert!(session.check_ask("why?").is_ok());
        assert_eq!(session.record_question(), expected);
    }

    assert_eq!(
        session.check_ask("why?"),
        Err(AskDenied::LimitReached { limit: 3 })
    );

    session.clear();
    assert!(session.is_initial());

    session.submit_url("https://example.com");
    session.store_content("page".to_string());
    assert!(session.check_ask("why?").is_ok());
    assert_eq!(session.record_question(), 1);
}

#[test]
fn test_session_reset_shouldEqualInitialState() {
    let mut session = Session::new();
    session.submit_url("https://example.com");
    session.store_content("page".to_string());
    session.record_question();
    session.request_reset();

    session.clear();

    let fresh = Session::new();
    assert_eq!(session.url, fresh.url);
    assert_eq!(session.content, fresh.content);
    assert_eq!(session.question_count, fresh.question_count);
    assert_eq!(session.reset_requested, fresh.reset_requested);
}

#[test]
fn test_session_failedFetch_shouldRetryOnResubmission() {
    let mut session = Session::new();

    // First submission; the fetch fails, nothing is stored.
    session.submit_url("https://example.com");
    assert!(session.needs_fetch());

    // Resubmitting the same URL still wants a fetch (no cached failure).
    let changed = session.submit_url("https://example.com");
    assert!(!changed);
    assert!(session.needs_fetch());
}

#[test]
fn test_askDenied_display_shouldBeUserFacing() {
    assert_eq!(AskDenied::EmptyQuestion.to_string(), "Please enter a question.");
    assert!(AskDenied::LimitReached { limit: 3 }
        .to_string()
        .contains("limit of 3 questions"));
    assert!(AskDenied::LimitReached { limit: 1 }
        .to_string()
        .contains("limit of 1 question "));
}
