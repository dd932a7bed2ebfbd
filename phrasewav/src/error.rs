//! Unified error types for phrasewav.
//!
//! The hierarchy mirrors the three ways a batch can fail:
//! - reading the phrase list ([`Error::Input`])
//! - talking to the speech service ([`Error::Provider`])
//! - writing audio to disk ([`Error::Wav`])

use std::path::PathBuf;

pub use crate::providers::error::ProviderError;

/// Result type alias for phrasewav operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for phrasewav.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Speech provider error.
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The phrase list is missing or has the wrong shape.
    #[error("Invalid phrase list {}: {reason}", path.display())]
    Input {
        /// Path of the phrase list.
        path: PathBuf,
        /// What went wrong.
        reason: String,
    },

    /// WAV container error.
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an input error for the given phrase list.
    #[must_use]
    pub fn input(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Input {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Check if this is a retryable error.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Provider(e) => e.is_retryable(),
            _ => false,
        }
    }
}
