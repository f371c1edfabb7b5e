use thiserror::Error;

/// Errors that can occur during cache operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// A fetch failed after exhausting its automatic retries.
    #[error("Fetch failed: {0}")]
    FetchFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// The shared in-flight result was dropped before resolving.
    #[error("In-flight fetch was abandoned")]
    Abandoned,
}

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
