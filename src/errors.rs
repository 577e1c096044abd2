/*!
 * Error types for the webqa application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur when fetching page content through the reader service
#[derive(Error, Debug)]
pub enum FetchError {
    /// The reader service answered with a non-success HTTP status
    #[error("HTTP Error {status_code}: {reason}")]
    Http {
        /// HTTP status code
        status_code: u16,
        /// Reason phrase or response body excerpt
        reason: String,
    },

    /// Error establishing or maintaining the connection
    #[error("URL Error: {0}")]
    Transport(String),

    /// Anything else that went wrong during the fetch
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Errors that can occur when working with chat-completion provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// A required API credential was not configured
    #[error("Missing credential: {0}")]
    CredentialMissing(String),

    /// Error fetching page content
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Error from a chat-completion provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error in the application configuration
    #[error("Config error: {0}")]
    Config(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}
