/*!
 * Content fetcher for the reader proxy service.
 *
 * Turns a page URL into a plain-text rendering by routing it through a hosted
 * "reader" endpoint (r.jina.ai by default). No retries: a failed fetch is
 * surfaced to the caller and retried only on the next explicit submission.
 */

use std::time::Duration;

use log::{debug, error};
use reqwest::Client;

use crate::errors::FetchError;

/// Browser-like user agent expected by the reader service
const USER_AGENT: &str = "Mozilla/5.0";

/// Client for the reader proxy service
pub struct ReaderClient {
    /// HTTP client for making requests
    client: Client,
    /// Reader endpoint prepended to the target URL
    endpoint: String,
    /// API key for authentication
    api_key: String,
}

impl ReaderClient {
    /// Create a new reader client
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }

    /// Whether an API key has been configured for the reader service
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Replace the API key, e.g. after an interactive prompt
    pub fn set_api_key(&mut self, api_key: impl Into<String>) {
        self.api_key = api_key.into();
    }

    /// Fetch the plain-text rendering of a page
    pub async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let full_url = format!("{}/{}", self.endpoint.trim_end_matches('/'), url);
        debug!("Fetching content through reader: {}", full_url);

        let response = self
            .client
            .get(&full_url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Bearer {}", self.api_key),
            )
            .send()
            .await
            .map_err(classify_request_error)?;

        let status = response.status();
        if !status.is_success() {
            let reason = status
                .canonical_reason()
                .map(|r| r.to_string())
                .unwrap_or_else(|| status.to_string());
            error!("Reader service error ({}) for {}", status, url);
            return Err(FetchError::Http {
                status_code: status.as_u16(),
                reason,
            });
        }

        response
            .text()
            .await
            .map_err(|e| FetchError::Unexpected(format!("Failed to decode response body: {}", e)))
    }
}

/// Map a reqwest send error onto the fetch taxonomy.
///
/// Connection and timeout failures are transport errors; everything else is
/// unexpected.
fn classify_request_error(error: reqwest::Error) -> FetchError {
    if error.is_connect() || error.is_timeout() {
        FetchError::Transport(error.to_string())
    } else {
        FetchError::Unexpected(error.to_string())
    }
}
