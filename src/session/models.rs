/*!
 * Session state record and transitions.
 *
 * One `Session` exists per active user interaction context. Content is cached
 * per URL: changing the URL invalidates the cache and resets the question
 * counter, and a failed fetch leaves the cache empty so the next submission
 * of the same URL retries naturally.
 */

use serde::{Deserialize, Serialize};

/// Reasons an ask event is disallowed (warnings, not errors)
#[derive(Debug, Clone, PartialEq)]
pub enum AskDenied {
    /// The question field was empty
    EmptyQuestion,
    /// No content has been fetched for the current URL
    NoContent,
    /// The per-URL question limit has been reached
    LimitReached {
        /// The configured limit
        limit: u32,
    },
}

impl std::fmt::Display for AskDenied {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyQuestion => write!(f, "Please enter a question."),
            Self::NoContent => write!(f, "Please enter a URL and fetch its content first."),
            Self::LimitReached { limit } => write!(
                f,
                "The limit of {} question{} for this URL has been reached. Reset to ask more.",
                limit,
                if *limit == 1 { "" } else { "s" }
            ),
        }
    }
}

/// Per-session state for the fetch/ask/reset cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Current URL, empty until one is submitted
    pub url: String,
    /// Fetched text for the current URL, present only after a successful fetch
    pub content: Option<String>,
    /// Number of questions answered for the current URL
    pub question_count: u32,
    /// Maximum questions per URL (None = unbounded)
    pub question_limit: Option<u32>,
    /// Deferred reset flag, honored at the start of the next cycle
    pub reset_requested: bool,
}

impl Session {
    /// Create a session with empty defaults and no question limit
    pub fn new() -> Self {
        Self::with_limit(None)
    }

    /// Create a session with an optional per-URL question limit
    pub fn with_limit(question_limit: Option<u32>) -> Self {
        Self {
            url: String::new(),
            content: None,
            question_count: 0,
            question_limit,
            reset_requested: false,
        }
    }

    /// Record a URL submission.
    ///
    /// A changed URL invalidates the cached content and resets the question
    /// counter. Returns true when the URL changed.
    pub fn submit_url(&mut self, url: &str) -> bool {
        if url == self.url {
            return false;
        }
        self.url = url.to_string();
        self.content = None;
        self.question_count = 0;
        true
    }

    /// Whether a fetch is needed: a URL is set but no content is cached
    pub fn needs_fetch(&self) -> bool {
        !self.url.is_empty() && self.content.is_none()
    }

    /// Store successfully fetched content for the current URL
    pub fn store_content(&mut self, content: String) {
        self.content = Some(content);
    }

    /// Check the ask preconditions without mutating state
    pub fn check_ask(&self, question: &str) -> Result<(), AskDenied> {
        if question.trim().is_empty() {
            return Err(AskDenied::EmptyQuestion);
        }
        if self.content.is_none() {
            return Err(AskDenied::NoContent);
        }
        if let Some(limit) = self.question_limit {
            if self.question_count >= limit {
                return Err(AskDenied::LimitReached { limit });
            }
        }
        Ok(())
    }

    /// Record an answered question and return its ordinal (1-based)
    pub fn record_question(&mut self) -> u32 {
        self.question_count += 1;
        self.question_count
    }

    /// Questions still allowed for this URL, when a limit applies
    pub fn remaining_questions(&self) -> Option<u32> {
        self.question_limit
            .map(|limit| limit.saturating_sub(self.question_count))
    }

    /// Ask for a deferred reset, applied at the start of the next cycle
    pub fn request_reset(&mut self) {
        self.reset_requested = true;
    }

    /// Apply a pending deferred reset, if any. Returns true when one fired.
    pub fn take_reset_request(&mut self) -> bool {
        if self.reset_requested {
            self.clear();
            return true;
        }
        false
    }

    /// Restore the session to its initial state, keeping the configured limit
    pub fn clear(&mut self) {
        self.url.clear();
        self.content = None;
        self.question_count = 0;
        self.reset_requested = false;
    }

    /// Whether the session equals its initial state
    pub fn is_initial(&self) -> bool {
        self.url.is_empty()
            && self.content.is_none()
            && self.question_count == 0
            && !self.reset_requested
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
