//! Error types for extraction.

use thiserror::Error;

/// Everything that can go wrong between sending text to the model and
/// holding a decoded graph.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("model service unreachable: {0}")]
    Unreachable(String),

    #[error("model request failed: {0}")]
    Request(String),

    #[error("model service responded with status {status}: {message}")]
    Service { status: u16, message: String },

    #[error("model service sent an unreadable response: {0}")]
    InvalidResponse(String),

    #[error("model reply was empty")]
    EmptyReply,

    #[error("model reply does not contain a JSON object")]
    MissingJson,

    #[error("model reply is not a valid graph: {0}")]
    MalformedGraph(#[from] serde_json::Error),

    #[error("invalid model client configuration: {0}")]
    Config(String),
}

impl ExtractionError {
    /// Returns true for failures that may succeed when retried unchanged:
    /// connection failures, timeouts, rate limiting and server-side errors.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Unreachable(_) => true,
            Self::Service { status, .. } => *status == 429 || (500..600).contains(status),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(ExtractionError::Unreachable("connection refused".into()).is_transient());
        assert!(
            ExtractionError::Service {
                status: 429,
                message: String::new()
            }
            .is_transient()
        );
        assert!(
            ExtractionError::Service {
                status: 503,
                message: String::new()
            }
            .is_transient()
        );
        assert!(
            !ExtractionError::Service {
                status: 401,
                message: String::new()
            }
            .is_transient()
        );
        assert!(!ExtractionError::MissingJson.is_transient());
        assert!(!ExtractionError::EmptyReply.is_transient());
    }
}
