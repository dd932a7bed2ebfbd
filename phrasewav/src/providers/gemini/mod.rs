//! Google Gemini speech generation.
//!
//! Speech comes from the `generateContent` endpoint with the response
//! modality set to audio and a prebuilt voice selected. The service returns
//! base64 PCM (mono, 16-bit, 24 kHz) in the first candidate's first part.

mod audio;
mod client;
mod config;
mod types;

pub use audio::prebuilt_voices;
pub use client::Gemini;
pub use config::GeminiConfig;

/// Voice used when none is configured.
pub const DEFAULT_VOICE: &str = "Zephyr";
