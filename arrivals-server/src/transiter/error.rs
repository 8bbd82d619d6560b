//! Transiter client error types.

/// Errors from fetching the stops feed.
#[derive(Debug, thiserror::Error)]
pub enum TransiterError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// Cursor chain did not end within the page limit
    #[error("pagination did not finish within {limit} pages")]
    TooManyPages { limit: usize },
}

impl TransiterError {
    /// Build a JSON error, keeping a short prefix of the offending body.
    pub(crate) fn json(err: serde_json::Error, body: &str) -> Self {
        TransiterError::Json {
            message: err.to_string(),
            body: Some(body.chars().take(500).collect()),
        }
    }
}
