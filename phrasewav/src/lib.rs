//! phrasewav - turn a list of phrases into WAV files with a remote
//! text-to-speech model.
//!
//! The pipeline is deliberately linear: [`phrases`] loads the input,
//! [`filename`] derives an output name per phrase, a
//! [`TextToSpeechProvider`](audio::TextToSpeechProvider) generates raw PCM,
//! and [`wav`] stores it. [`batch::BatchRunner`] drives the loop with a
//! fixed [`throttle`] between calls.

pub mod audio;
pub mod batch;
pub mod error;
pub mod filename;
pub mod phrases;
pub mod prelude;
pub mod prompt;
pub mod providers;
pub mod retry;
pub mod throttle;
pub mod wav;

pub use error::{Error, ProviderError, Result};
