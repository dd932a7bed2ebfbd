//! Speech provider implementations.
//!
//! - [`gemini`] - Google Gemini `generateContent` with audio output
//! - [`mock`] - scripted provider for tests and offline runs

pub mod error;
pub mod gemini;
pub mod mock;

pub use error::ProviderError;
pub use gemini::{Gemini, GeminiConfig};
pub use mock::MockSpeechProvider;
