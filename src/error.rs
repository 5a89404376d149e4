//! Error types for the notice board core.

use std::time::Duration;

use thiserror::Error;

/// Common error type for notice board operations.
#[derive(Error, Debug)]
pub enum BoardError {
    /// Post content was rejected by the sanitizer.
    ///
    /// The content is never stored; the offending pattern is reported so the
    /// caller can surface it to the author.
    #[error("invalid content: {0}")]
    InvalidContent(String),

    /// Unrecognized key in post options.
    #[error("invalid key in options: {0}")]
    InvalidOptionKey(String),

    /// A notification for this (post, domain) pair was already sent within
    /// the retry window.
    #[error("notification already sent for post {post_id} (retry after {retry_after:?})")]
    AlreadySent {
        /// Post the duplicate send was attempted for.
        post_id: String,
        /// Domain context of the send.
        domain_id: String,
        /// Remaining guard interval before a re-send is accepted.
        retry_after: Duration,
    },

    /// A required external service (directory, config) failed.
    ///
    /// Fatal to the whole send operation; no partial dispatch happens.
    #[error("dependency error: {0}")]
    Dependency(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for notice board operations.
pub type Result<T> = std::result::Result<T, BoardError>;
