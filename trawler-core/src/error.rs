//! Error types for the crawl pipeline.

use thiserror::Error;
use url::Url;

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the download pipeline and its middlewares.
#[derive(Error, Debug)]
pub enum Error {
    /// A middleware decided this request/response pair should be abandoned.
    /// The pipeline stops processing the pair; nothing reaches later stages.
    #[error("dropping request for {url}: {reason}")]
    DropRequest {
        /// URL of the request being dropped.
        url: Url,
        /// Human-readable reason, logged alongside the drop.
        reason: String,
    },

    /// A response body could not be decoded as its headers declared.
    #[error("failed to decode response body: {0}")]
    DecodeBody(String),

    /// A stage refused installation (disabled in configuration).
    #[error("stage not configured: {0}")]
    NotConfigured(String),

    /// The download handler failed to produce a response.
    #[error("fetch error: {0}")]
    Fetch(String),

    /// JSON deserialization of a response body failed.
    #[error("JSON error: {0}")]
    Json(String),

    /// I/O error from a download handler.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error means "discard the request/response pair and move
    /// on" rather than a pipeline defect.
    pub fn is_drop(&self) -> bool {
        matches!(self, Self::DropRequest { .. })
    }
}
