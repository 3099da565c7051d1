/// Failure fetching or parsing the scrape target
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected HTTP status {0}")]
    Status(u16),

    #[error("Invalid dictionary URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(String),
}

/// Outcome of a lookup that produced nothing
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("Query is required")]
    EmptyQuery,

    #[error("No entry found")]
    NotFound,

    /// Not found, and the LLM fallback was refused with HTTP 429
    #[error("No entry found and the LLM quota is exhausted")]
    QuotaExceeded,
}
