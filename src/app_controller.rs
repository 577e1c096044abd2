use anyhow::Result;
use log::{debug, info};

use crate::app_config::Config;
use crate::fetcher::ReaderClient;
use crate::qa_service::AnswerService;
use crate::session::Session;

// @module: Application controller for the fetch/ask/reset cycle

/// User-visible feedback produced by a controller operation
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// A completed action, e.g. content fetched or a key set
    Success(String),
    /// Neutral status information
    Info(String),
    /// A disallowed or incomplete action; the session is unchanged
    Warning(String),
    /// A failed external call, already converted to a message
    Error(String),
}

impl Notice {
    /// The message text regardless of kind
    pub fn message(&self) -> &str {
        match self {
            Self::Success(m) | Self::Info(m) | Self::Warning(m) | Self::Error(m) => m,
        }
    }
}

/// Outcome of an ask event
#[derive(Debug)]
pub enum AskOutcome {
    /// The question was answered
    Answered {
        /// 1-based ordinal of the question within the current URL
        ordinal: u32,
        /// Questions still allowed for this URL, when a limit applies
        remaining: Option<u32>,
        /// The generated answer text
        answer: String,
    },
    /// The question was not sent to the provider
    Denied(Notice),
}

/// Main application controller for the question-answering session
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Reader proxy client
    reader: ReaderClient,
    // @field: Chat-completion service
    service: AnswerService,
    // @field: Per-session state
    session: Session,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        // Credentials are resolved once here (environment first, then config);
        // interactive entry can replace them later via the setter events.
        let reader = ReaderClient::new(
            &config.fetcher.endpoint,
            config.fetcher.resolve_api_key(),
            config.fetcher.timeout_secs,
        );
        let service = AnswerService::new(config.chat.clone(), config.chat.resolve_api_key());
        let session = Session::with_limit(config.question_limit);

        Ok(Self {
            config,
            reader,
            service,
            session,
        })
    }

    /// Read-only view of the session state
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Whether the reader credential is available
    pub fn has_fetch_key(&self) -> bool {
        self.reader.has_api_key()
    }

    /// Whether the chat credential is available
    pub fn has_chat_key(&self) -> bool {
        self.service.has_api_key()
    }

    /// Set the reader service credential for the rest of the session
    pub fn set_fetch_api_key(&mut self, api_key: &str) -> Notice {
        if api_key.trim().is_empty() {
            return Notice::Warning("Please enter a Jina API key.".to_string());
        }
        self.reader.set_api_key(api_key);
        Notice::Success("Jina API key is set.".to_string())
    }

    /// Set the chat provider credential for the rest of the session
    pub fn set_chat_api_key(&mut self, api_key: &str) -> Notice {
        let provider = self.service.provider().display_name().to_string();
        if api_key.trim().is_empty() {
            return Notice::Warning(format!("Please enter an {} API key.", provider));
        }
        self.service.set_api_key(api_key);
        Notice::Success(format!("{} API key is set.", provider))
    }

    /// Submit a URL: cache-invalidate on change, then fetch if needed.
    ///
    /// A fetch failure is converted into an error notice referencing the URL
    /// and leaves the cache empty, so submitting the same URL again retries.
    pub async fn submit_url(&mut self, url: &str) -> Vec<Notice> {
        let mut notices = Vec::new();

        if self.session.take_reset_request() {
            debug!("Applied deferred reset before URL submission");
        }

        if self.session.submit_url(url) {
            debug!("URL changed, cached content and question count cleared");
        }

        if !self.session.needs_fetch() {
            return notices;
        }

        if !self.reader.has_api_key() {
            notices.push(Notice::Warning("Please enter your Jina API key.".to_string()));
            return notices;
        }

        match self.reader.fetch_text(url).await {
            Ok(content) => {
                info!("Fetched {} chars from {}", content.chars().count(), url);
                self.session.store_content(content);
                notices.push(Notice::Success("Content fetched successfully!".to_string()));
            }
            Err(e) => {
                notices.push(Notice::Error(format!("{}. URL: {}", e, url)));
            }
        }

        notices
    }

    /// Ask a question about the cached content.
    ///
    /// Denied asks (empty question, missing credential, no content, limit
    /// reached) never reach the provider and never advance the counter; a
    /// provider failure surfaces as an error without consuming a question.
    pub async fn ask(&mut self, question: &str) -> AskOutcome {
        if self.session.take_reset_request() {
            debug!("Applied deferred reset before ask");
        }

        if !self.service.has_api_key() {
            let provider = self.service.provider().display_name();
            return AskOutcome::Denied(Notice::Warning(format!(
                "Please enter your {} API key.",
                provider
            )));
        }

        if let Err(denied) = self.session.check_ask(question) {
            return AskOutcome::Denied(Notice::Warning(denied.to_string()));
        }

        // check_ask guarantees content is present here
        let content = self.session.content.clone().unwrap_or_default();

        match self.service.answer_question(&content, question).await {
            Ok(answer) => {
                let ordinal = self.session.record_question();
                AskOutcome::Answered {
                    ordinal,
                    remaining: self.session.remaining_questions(),
                    answer,
                }
            }
            Err(e) => AskOutcome::Denied(Notice::Error(e.to_string())),
        }
    }

    /// Reset the session to its initial state immediately
    pub fn reset(&mut self) -> Notice {
        self.session.clear();
        info!("Session reset");
        Notice::Info("Session reset. Enter a new URL to start over.".to_string())
    }

    /// Request a reset applied at the start of the next cycle instead of now
    pub fn request_reset(&mut self) {
        self.session.request_reset();
    }

    /// Notice describing how many questions have been asked for this URL
    pub fn question_count_notice(&self) -> Option<Notice> {
        let count = self.session.question_count;
        if count == 0 {
            return None;
        }
        Some(Notice::Info(format!(
            "{} question{} have been asked for this URL.",
            count,
            if count > 1 { "s" } else { "" }
        )))
    }

    /// Verify the chat credential with a minimal provider request
    pub async fn test_chat_connection(&self) -> Result<()> {
        self.service.test_connection().await?;
        Ok(())
    }

    /// The configured question limit, if any
    pub fn question_limit(&self) -> Option<u32> {
        self.config.question_limit
    }
}
