//! Gemini client configuration.

use crate::error::{ProviderError, Result};

/// Configuration for the Gemini client.
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key for authentication.
    pub api_key: String,
    /// Base URL for the API (defaults to the public `v1beta` endpoint).
    pub base_url: String,
    /// Default speech model.
    pub model: String,
    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl GeminiConfig {
    /// Default Gemini API base URL.
    pub const DEFAULT_BASE_URL: &'static str = "https://generativelanguage.googleapis.com/v1beta";
    /// Default speech model.
    pub const DEFAULT_MODEL: &'static str = "gemini-2.5-flash-preview-tts";
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

    /// Creates a new configuration with the given API key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Creates configuration from environment variables.
    ///
    /// Reads from:
    /// - `GEMINI_API_KEY` (or `GOOGLE_API_KEY`) - Required API key
    /// - `GEMINI_BASE_URL` - Optional base URL
    /// - `GEMINI_MODEL` - Optional default model
    ///
    /// # Errors
    ///
    /// Returns an authentication error if no API key variable is set.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("GOOGLE_API_KEY"))
            .map_err(|_| {
                ProviderError::auth("gemini", "GEMINI_API_KEY environment variable not set")
            })?;

        let base_url =
            std::env::var("GEMINI_BASE_URL").unwrap_or_else(|_| Self::DEFAULT_BASE_URL.to_owned());

        let model =
            std::env::var("GEMINI_MODEL").unwrap_or_else(|_| Self::DEFAULT_MODEL.to_owned());

        Ok(Self {
            api_key,
            base_url,
            model,
            timeout_secs: Some(Self::DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Sets the base URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_owned();
        self
    }

    /// Sets the default model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: Self::DEFAULT_BASE_URL.to_owned(),
            model: Self::DEFAULT_MODEL.to_owned(),
            timeout_secs: Some(Self::DEFAULT_TIMEOUT_SECS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_new() {
        let config = GeminiConfig::new("test-key");
        assert_eq!(config.api_key, "test-key");
        assert_eq!(config.base_url, GeminiConfig::DEFAULT_BASE_URL);
        assert_eq!(config.model, GeminiConfig::DEFAULT_MODEL);
        assert_eq!(config.timeout_secs, Some(120));
    }

    #[test]
    fn test_config_builder() {
        let config = GeminiConfig::new("key")
            .with_model("gemini-2.5-pro-preview-tts")
            .with_base_url("http://127.0.0.1:9000/v1beta/")
            .with_timeout(10);

        assert_eq!(config.model, "gemini-2.5-pro-preview-tts");
        assert_eq!(config.base_url, "http://127.0.0.1:9000/v1beta");
        assert_eq!(config.timeout_secs, Some(10));
    }

    #[test]
    fn debug_redacts_key() {
        let config = GeminiConfig::new("super-secret");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
