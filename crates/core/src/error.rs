//! Error taxonomy for balance retrieval.

use thiserror::Error;

/// Classified failure from a retrieval attempt.
///
/// The inner string is the human-readable diagnostic forwarded
/// verbatim into the failure notification, so the operator can see
/// what went wrong without reading the job logs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RetrievalError {
    /// Transport-level failure: connection refused, timeout, DNS,
    /// or a non-2xx response from the portal.
    #[error("network error: {0}")]
    Network(String),

    /// The scrape-path login heuristic did not find a success signal.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Response body could not be decoded or the expected markup
    /// element was missing.
    #[error("failed to decode response: {0}")]
    Parse(String),

    /// Response decoded but was semantically invalid: wrong success
    /// code, missing fields, or a non-numeric balance.
    #[error("unexpected API response: {0}")]
    Api(String),
}

impl RetrievalError {
    /// Diagnostic detail, used verbatim in failure messages.
    pub fn detail(&self) -> &str {
        match self {
            RetrievalError::Network(d)
            | RetrievalError::Auth(d)
            | RetrievalError::Parse(d)
            | RetrievalError::Api(d) => d,
        }
    }

    /// Short classification label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            RetrievalError::Network(_) => "network",
            RetrievalError::Auth(_) => "auth",
            RetrievalError::Parse(_) => "parse",
            RetrievalError::Api(_) => "api",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_detail_is_verbatim() {
        let err = RetrievalError::Api("invalid account".to_string());
        assert_eq!(err.detail(), "invalid account");
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(RetrievalError::Network(String::new()).kind(), "network");
        assert_eq!(RetrievalError::Auth(String::new()).kind(), "auth");
        assert_eq!(RetrievalError::Parse(String::new()).kind(), "parse");
        assert_eq!(RetrievalError::Api(String::new()).kind(), "api");
    }

    #[test]
    fn test_display_includes_classification() {
        let err = RetrievalError::Network("connection timed out".to_string());
        assert_eq!(err.to_string(), "network error: connection timed out");
    }
}
