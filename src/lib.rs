/*!
 * # webqa - Web Content Q&A
 *
 * A Rust library for asking questions about web pages using AI.
 *
 * ## Features
 *
 * - Fetch a plain-text rendering of any URL through a hosted reader proxy
 * - Answer natural-language questions about the fetched text using
 *   chat-completion providers:
 *   - OpenAI API
 *   - Azure OpenAI deployments
 * - Per-session bookkeeping: cached content per URL, question counter,
 *   optional question limit, reset
 * - Configurable prompt, content cap and output token budget
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `fetcher`: Reader proxy client turning URLs into plain text
 * - `qa_service`: Prompt building and answer generation
 * - `providers`: Client implementations for chat-completion APIs:
 *   - `providers::openai`: OpenAI API client
 *   - `providers::azure`: Azure OpenAI API client
 * - `session`: Per-session state and transitions
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod fetcher;
pub mod providers;
pub mod qa_service;
pub mod session;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{AskOutcome, Controller, Notice};
pub use errors::{AppError, FetchError, ProviderError};
pub use fetcher::ReaderClient;
pub use qa_service::AnswerService;
pub use session::Session;
