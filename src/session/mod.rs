/*!
 * Session management module for question-answering sessions.
 *
 * This module provides:
 * - The per-session state record (current URL, cached content, question count)
 * - State transitions for URL submission, asking and resetting
 * - Question-limit bookkeeping
 */

// Allow dead code - session types have extra methods for future use
#![allow(dead_code)]

pub mod models;

// Re-export main types
pub use models::{AskDenied, Session};
