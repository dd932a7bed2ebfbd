//! Speech synthesis types and the provider trait.
//!
//! A [`TextToSpeechProvider`] turns a [`SpeechRequest`] into raw PCM audio.
//! Only one sample layout is supported, described by [`PcmSpec::MONO_16BIT_24K`].
//!
//! # Example
//!
//! ```rust,ignore
//! use phrasewav::prelude::*;
//!
//! let request = SpeechRequest::new(
//!     "gemini-2.5-flash-preview-tts",
//!     "Say quickly and in an australian accent: G'day mate",
//!     "Zephyr",
//! );
//! let response = provider.speech(&request).await?;
//! phrasewav::wav::write_wav("gday_mate.wav", &response.audio)?;
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Layout of raw PCM samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PcmSpec {
    /// Number of interleaved channels.
    pub channels: u16,
    /// Samples per second.
    pub sample_rate: u32,
    /// Bits per sample (signed little-endian integers).
    pub bits_per_sample: u16,
}

impl PcmSpec {
    /// Mono, 16-bit signed, 24 kHz. The format speech models return.
    pub const MONO_16BIT_24K: Self = Self {
        channels: 1,
        sample_rate: 24_000,
        bits_per_sample: 16,
    };

    /// Bytes per sample of a single channel.
    #[must_use]
    pub const fn sample_width(&self) -> usize {
        (self.bits_per_sample / 8) as usize
    }

    /// Bytes per frame (one sample for every channel).
    #[must_use]
    pub const fn frame_width(&self) -> usize {
        self.sample_width() * self.channels as usize
    }
}

impl Default for PcmSpec {
    fn default() -> Self {
        Self::MONO_16BIT_24K
    }
}

/// Prebuilt voice used for synthesis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    /// Voice identifier (e.g., "Zephyr", "Puck").
    pub id: String,
    /// Optional voice description (not sent to the API, for display only).
    #[serde(skip)]
    pub description: Option<String>,
}

impl Voice {
    /// Create a new voice with the given ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: None,
        }
    }

    /// Set the voice description.
    #[must_use]
    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }
}

impl<S: Into<String>> From<S> for Voice {
    fn from(s: S) -> Self {
        Self::new(s)
    }
}

/// Request for generating speech from text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechRequest {
    /// Model to use; empty selects the provider's configured model.
    pub model: String,
    /// Full prompt text, delivery directive included.
    pub input: String,
    /// Voice to use.
    pub voice: Voice,
}

impl SpeechRequest {
    /// Create a new speech request.
    #[must_use]
    pub fn new(
        model: impl Into<String>,
        input: impl Into<String>,
        voice: impl Into<Voice>,
    ) -> Self {
        Self {
            model: model.into(),
            input: input.into(),
            voice: voice.into(),
        }
    }
}

/// Response from a speech synthesis request.
#[derive(Debug, Clone)]
pub struct SpeechResponse {
    /// Raw PCM samples.
    pub audio: Vec<u8>,
    /// MIME type reported by the service (e.g., `audio/L16;codec=pcm;rate=24000`).
    pub mime_type: String,
}

impl SpeechResponse {
    /// Create a new speech response.
    #[must_use]
    pub fn new(audio: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            audio,
            mime_type: mime_type.into(),
        }
    }

    /// Sample rate declared in the MIME type, if any.
    #[must_use]
    pub fn declared_rate(&self) -> Option<u32> {
        self.mime_type
            .split(';')
            .filter_map(|param| param.trim().strip_prefix("rate="))
            .find_map(|rate| rate.parse().ok())
    }
}

/// Trait for providers that turn text into speech.
#[async_trait]
pub trait TextToSpeechProvider: Send + Sync {
    /// Generate speech for a single request.
    async fn speech(&self, request: &SpeechRequest) -> Result<SpeechResponse>;

    /// Prebuilt voices this provider knows about.
    fn available_voices(&self) -> Vec<Voice> {
        Vec::new()
    }
}
