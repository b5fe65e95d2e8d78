use thiserror::Error;

/// Failure kinds for a product search, surfaced to the MCP caller
/// as a single tool-call error with the display message.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("no products found")]
    NoResults,

    #[error("unexpected page structure: {0}")]
    Parse(String),
}

impl SearchError {
    /// True for errors worth another attempt: timeouts and connect
    /// failures. HTTP status errors and everything else are final.
    pub fn is_retryable(&self) -> bool {
        match self {
            SearchError::Network(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}
