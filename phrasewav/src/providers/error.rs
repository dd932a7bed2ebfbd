//! Error types for speech provider operations.
//!
//! [`ProviderError`] covers the failure modes of talking to a remote
//! text-to-speech backend (authentication, rate limiting, malformed
//! responses, network issues). It joins the crate-wide
//! [`Error`](crate::Error) hierarchy via `Error::Provider`.

/// Error type for speech provider operations.
///
/// Each variant is a distinct failure mode so callers can match on the
/// retryable ones.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum ProviderError {
    /// Authentication or authorization failure.
    #[error("[{provider}] {message}")]
    Auth {
        /// Provider name (e.g., "gemini").
        provider: String,
        /// Error description.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("[{provider}] Rate limit exceeded: {message}")]
    RateLimited {
        /// Provider name.
        provider: String,
        /// Message returned by the service, if any.
        message: String,
    },

    /// The response did not have the expected shape.
    #[error("Malformed response: expected {expected}, got {got}")]
    ResponseFormat {
        /// Expected shape description.
        expected: String,
        /// What was actually found.
        got: String,
    },

    /// Network or connection error.
    #[error("{0}")]
    Network(String),

    /// HTTP status error without a structured body.
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// Provider-specific error.
    #[error("[{provider}] {message}")]
    Provider {
        /// Provider name.
        provider: String,
        /// Error description.
        message: String,
        /// Optional error code from the provider.
        code: Option<String>,
    },

    /// Internal error.
    #[error("{0}")]
    Internal(String),
}

impl ProviderError {
    /// Create an authentication error.
    #[must_use]
    pub fn auth(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Auth {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a rate limit error.
    #[must_use]
    pub fn rate_limited(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RateLimited {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a malformed response error.
    #[must_use]
    pub fn response_format(expected: impl Into<String>, got: impl Into<String>) -> Self {
        Self::ResponseFormat {
            expected: expected.into(),
            got: got.into(),
        }
    }

    /// Create a network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Create an HTTP status error.
    #[must_use]
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a provider error with an error code.
    #[must_use]
    pub fn provider_code(
        provider: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
            code: Some(code.into()),
        }
    }

    /// Create an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is a retryable error.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::Network(_))
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::network("Request timed out")
        } else if err.is_connect() {
            Self::network(format!("Connection failed: {err}"))
        } else if err.is_decode() {
            Self::response_format("JSON body", err.to_string())
        } else {
            Self::network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_kinds() {
        assert!(ProviderError::rate_limited("gemini", "quota").is_retryable());
        assert!(ProviderError::network("reset").is_retryable());
        assert!(!ProviderError::auth("gemini", "bad key").is_retryable());
        assert!(!ProviderError::response_format("candidates", "none").is_retryable());
        assert!(!ProviderError::http_status(500, "oops").is_retryable());
    }

    #[test]
    fn display_includes_provider() {
        let err = ProviderError::auth("gemini", "API key not valid");
        assert_eq!(err.to_string(), "[gemini] API key not valid");

        let err = ProviderError::provider_code("gemini", "INVALID_ARGUMENT", "bad voice");
        assert_eq!(err.to_string(), "[gemini] bad voice");
    }

    #[test]
    fn malformed_response_display() {
        let err = ProviderError::response_format("at least one candidate", "0 candidates");
        assert_eq!(
            err.to_string(),
            "Malformed response: expected at least one candidate, got 0 candidates"
        );
    }
}
