//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use phrasewav::prelude::*;
//! ```

pub use crate::audio::{PcmSpec, SpeechRequest, SpeechResponse, TextToSpeechProvider, Voice};
pub use crate::batch::{
    BatchOptions, BatchReport, BatchRunner, FailedPhrase, FailurePolicy, PlannedFile, WrittenFile,
};
pub use crate::error::{Error, ProviderError, Result};
pub use crate::filename::derive_filename;
pub use crate::phrases::{DEFAULT_PHRASES_PATH, load_phrases, parse_phrases};
pub use crate::prompt::InstructionTemplate;
pub use crate::providers::{Gemini, GeminiConfig, MockSpeechProvider};
pub use crate::retry::RetryConfig;
pub use crate::throttle::Throttle;
pub use crate::wav::write_wav;
