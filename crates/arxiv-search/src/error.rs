//! Error types for the arXiv search client.
//!
//! Uses `thiserror` for structured error handling with automatic `From` implementations.

/// Errors from the HTTP client layer.
///
/// The search view does not tell these apart: every variant is shown as a
/// generic fetch failure.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// HTTP transport error (connection, DNS, TLS, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Middleware error
    #[error("Middleware error: {0}")]
    Middleware(#[from] reqwest_middleware::Error),

    /// Non-2xx response
    #[error("Unexpected status {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body or message
        message: String,
    },

    /// Endpoint URL could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ClientError {
    /// Create a status error.
    #[must_use]
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status { status, message: message.into() }
    }

    /// HTTP status code, if the server answered.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors from mapping a feed document.
#[derive(thiserror::Error, Debug)]
pub enum FeedError {
    /// The document is not well-formed XML.
    #[error("Malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    /// No `feed` root element was found.
    #[error("Document has no feed element")]
    MissingFeed,

    /// A second top-level element followed the root.
    #[error("Document has more than one root element")]
    MultipleRoots,

    /// The document ended with elements still open.
    #[error("Document ended with {open} unclosed element(s)")]
    Truncated {
        /// Number of elements left open
        open: usize,
    },

    /// arXiv answered with an error entry instead of results.
    #[error("arXiv API error: {message}")]
    Api {
        /// Error text from the entry summary
        message: String,
    },
}

/// Errors from a search invocation.
#[derive(thiserror::Error, Debug)]
pub enum SearchError {
    /// The catalog could not be reached or answered with a failure status.
    #[error("Fetch failed: {0}")]
    Fetch(#[from] ClientError),

    /// The catalog answered with something that is not a readable feed.
    #[error("Malformed response: {0}")]
    Malformed(#[from] FeedError),

    /// Input validation failed
    #[error("Validation error: {message}")]
    Validation {
        /// Field that failed validation
        field: String,
        /// Validation error message
        message: String,
    },
}

impl SearchError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation { field: field.into(), message: message.into() }
    }

    /// Convert to the message shown to the user.
    #[must_use]
    pub fn to_user_message(&self) -> String {
        match self {
            Self::Fetch(_) => "Failed to fetch papers. Please try again.".to_string(),
            Self::Malformed(FeedError::Api { message }) => {
                format!("arXiv rejected the query: {message}")
            }
            Self::Malformed(_) => {
                "arXiv returned a response that could not be read. Please try again.".to_string()
            }
            Self::Validation { field, message } => {
                format!("Invalid input for '{field}': {message}")
            }
        }
    }
}

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Result type alias for feed mapping.
pub type FeedResult<T> = Result<T, FeedError>;

/// Result type alias for search operations.
pub type SearchResult<T> = Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_status_code() {
        assert_eq!(ClientError::status(503, "unavailable").status_code(), Some(503));
        let err = ClientError::from(url::Url::parse("not a url").unwrap_err());
        assert_eq!(err.status_code(), None);
    }

    #[test]
    fn test_fetch_errors_share_one_message() {
        let status = SearchError::from(ClientError::status(500, "boom"));
        let url = SearchError::from(ClientError::from(url::Url::parse("::").unwrap_err()));
        assert_eq!(status.to_user_message(), url.to_user_message());
        assert!(status.to_user_message().contains("Failed to fetch papers"));
    }

    #[test]
    fn test_malformed_message_differs_from_fetch() {
        let malformed = SearchError::from(FeedError::MissingFeed);
        let fetch = SearchError::from(ClientError::status(500, "boom"));
        assert_ne!(malformed.to_user_message(), fetch.to_user_message());
    }

    #[test]
    fn test_validation_user_message() {
        let err = SearchError::validation("query", "cannot be empty");
        assert!(err.to_user_message().contains("query"));
        assert!(err.to_user_message().contains("cannot be empty"));
    }
}
