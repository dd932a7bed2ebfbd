//! Sequential batch runner.
//!
//! For every phrase, in order: derive the filename, request speech, write the
//! WAV file, then pause. By default the first failure aborts the run; files
//! already written stay on disk and the remaining phrases are skipped.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::audio::{PcmSpec, SpeechRequest, TextToSpeechProvider, Voice};
use crate::error::Result;
use crate::filename::derive_filename;
use crate::prompt::InstructionTemplate;
use crate::providers::gemini::DEFAULT_VOICE;
use crate::retry::{RetryConfig, with_retry};
use crate::throttle::Throttle;
use crate::wav::write_wav;

/// What to do when a phrase fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Abort the run on the first error.
    #[default]
    FailFast,
    /// Record the error and carry on with the next phrase.
    KeepGoing,
}

/// Settings shared by every request in a batch.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Model override; `None` uses the provider's configured model.
    pub model: Option<String>,
    /// Prebuilt voice.
    pub voice: Voice,
    /// Delivery instruction wrapped around each phrase.
    pub instruction: InstructionTemplate,
    /// Directory receiving the WAV files.
    pub output_dir: PathBuf,
    /// Pause after each call.
    pub throttle: Throttle,
    /// Retry policy; `None` fails fast.
    pub retry: Option<RetryConfig>,
    /// Failure handling.
    pub failure_policy: FailurePolicy,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            model: None,
            voice: Voice::new(DEFAULT_VOICE),
            instruction: InstructionTemplate::default(),
            output_dir: PathBuf::from("."),
            throttle: Throttle::default(),
            retry: None,
            failure_policy: FailurePolicy::FailFast,
        }
    }
}

impl BatchOptions {
    /// Override the provider's model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the voice.
    #[must_use]
    pub fn with_voice(mut self, voice: impl Into<Voice>) -> Self {
        self.voice = voice.into();
        self
    }

    /// Set the instruction template.
    #[must_use]
    pub fn with_instruction(mut self, instruction: InstructionTemplate) -> Self {
        self.instruction = instruction;
        self
    }

    /// Set the output directory.
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set the throttle.
    #[must_use]
    pub const fn with_throttle(mut self, throttle: Throttle) -> Self {
        self.throttle = throttle;
        self
    }

    /// Enable retries.
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = Some(retry);
        self
    }

    /// Set the failure policy.
    #[must_use]
    pub const fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }
}

/// A phrase and the file it will be written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    /// Source phrase.
    pub phrase: String,
    /// Destination path.
    pub path: PathBuf,
}

/// A file written by the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    /// Source phrase.
    pub phrase: String,
    /// Path of the WAV file.
    pub path: PathBuf,
    /// Length of the PCM payload in bytes.
    pub bytes: usize,
}

/// A phrase that failed under [`FailurePolicy::KeepGoing`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedPhrase {
    /// Source phrase.
    pub phrase: String,
    /// Path that would have been written.
    pub path: PathBuf,
    /// Rendered error.
    pub error: String,
}

/// Outcome of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Files written, in processing order.
    pub written: Vec<WrittenFile>,
    /// Failures recorded under [`FailurePolicy::KeepGoing`].
    pub failed: Vec<FailedPhrase>,
}

impl BatchReport {
    /// Whether every phrase was written.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Number of phrases attempted.
    #[must_use]
    pub fn attempted(&self) -> usize {
        self.written.len() + self.failed.len()
    }
}

/// Turns phrases into WAV files through a speech provider.
#[derive(Debug)]
pub struct BatchRunner<P> {
    provider: P,
    options: BatchOptions,
}

impl<P: TextToSpeechProvider> BatchRunner<P> {
    /// Create a runner.
    #[must_use]
    pub fn new(provider: P, options: BatchOptions) -> Self {
        Self { provider, options }
    }

    /// The underlying provider.
    #[must_use]
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// The batch options.
    #[must_use]
    pub const fn options(&self) -> &BatchOptions {
        &self.options
    }

    /// Output path for a phrase.
    #[must_use]
    pub fn output_path(&self, phrase: &str) -> PathBuf {
        self.options.output_dir.join(derive_filename(phrase))
    }

    /// Map phrases to output paths without contacting the service.
    #[must_use]
    pub fn plan(&self, phrases: &[String]) -> Vec<PlannedFile> {
        plan(&self.options.output_dir, phrases)
    }

    /// Process every phrase in order.
    ///
    /// # Errors
    ///
    /// Under [`FailurePolicy::FailFast`], returns the first provider, audio
    /// or filesystem error. Under [`FailurePolicy::KeepGoing`] errors are
    /// recorded in the report instead.
    pub async fn run(&self, phrases: &[String]) -> Result<BatchReport> {
        self.check_voice();

        let mut report = BatchReport::default();
        for phrase in phrases {
            let path = self.output_path(phrase);
            info!("{}", processing_line(phrase, &path));

            match self.process(phrase, &path).await {
                Ok(written) => {
                    info!("{}", saved_line(&written.path));
                    report.written.push(written);
                }
                Err(err) => match self.options.failure_policy {
                    FailurePolicy::FailFast => return Err(err),
                    FailurePolicy::KeepGoing => {
                        warn!(phrase = %phrase, error = %err, "phrase failed, continuing");
                        report.failed.push(FailedPhrase {
                            phrase: phrase.clone(),
                            path,
                            error: err.to_string(),
                        });
                    }
                },
            }

            self.options.throttle.pause().await;
        }

        info!(
            written = report.written.len(),
            failed = report.failed.len(),
            "batch finished"
        );
        Ok(report)
    }

    async fn process(&self, phrase: &str, path: &Path) -> Result<WrittenFile> {
        let request = SpeechRequest::new(
            self.options.model.clone().unwrap_or_default(),
            self.options.instruction.render(phrase),
            self.options.voice.clone(),
        );

        let response = with_retry(self.options.retry.as_ref(), || {
            self.provider.speech(&request)
        })
        .await?;

        let expected = PcmSpec::MONO_16BIT_24K.sample_rate;
        if let Some(rate) = response.declared_rate().filter(|rate| *rate != expected) {
            warn!(rate, expected, "service declared an unexpected sample rate");
        }

        write_wav(path, &response.audio)?;

        Ok(WrittenFile {
            phrase: phrase.to_owned(),
            path: path.to_path_buf(),
            bytes: response.audio.len(),
        })
    }

    fn check_voice(&self) {
        let voices = self.provider.available_voices();
        let wanted = &self.options.voice.id;
        if !voices.is_empty() && !voices.iter().any(|v| v.id.eq_ignore_ascii_case(wanted)) {
            warn!(voice = %wanted, "voice is not in the provider's prebuilt list");
        }
    }
}

/// Map phrases to paths under `output_dir`, in input order.
#[must_use]
pub fn plan(output_dir: &Path, phrases: &[String]) -> Vec<PlannedFile> {
    phrases
        .iter()
        .map(|phrase| PlannedFile {
            phrase: phrase.clone(),
            path: output_dir.join(derive_filename(phrase)),
        })
        .collect()
}

/// Paths in the working directory print as bare filenames.
fn display_name(path: &Path) -> String {
    path.strip_prefix(".").unwrap_or(path).display().to_string()
}

fn processing_line(phrase: &str, path: &Path) -> String {
    format!("Processing: '{phrase}' -> '{}'", display_name(path))
}

fn saved_line(path: &Path) -> String {
    format!("Saved audio to {}", display_name(path))
}
