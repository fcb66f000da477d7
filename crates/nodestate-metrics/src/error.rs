//! Error types for the node state exporter.

use thiserror::Error;

/// Result type alias for exporter operations.
pub type ExporterResult<T> = Result<T, ExporterError>;

/// Errors that can occur while scraping the node or exposing metrics.
#[derive(Debug, Error)]
pub enum ExporterError {
    /// Connection failure, non-2xx response, or unreadable body.
    #[error("fetch failed: {0}")]
    Fetch(String),

    /// The response body is not a usable `getnodestate` envelope.
    #[error("decode failed: {0}")]
    Decode(String),

    #[error("metrics error: {0}")]
    Metrics(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ExporterError {
    /// Whether the failure came from the upstream node rather than this process.
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Fetch(_) | Self::Decode(_))
    }
}

impl From<prometheus::Error> for ExporterError {
    fn from(e: prometheus::Error) -> Self {
        Self::Metrics(e.to_string())
    }
}
