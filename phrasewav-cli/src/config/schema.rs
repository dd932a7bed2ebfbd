//! Configuration schema definitions.

use std::path::PathBuf;
use std::time::Duration;

use phrasewav::batch::{BatchOptions, FailurePolicy};
use phrasewav::prelude::{GeminiConfig, InstructionTemplate, RetryConfig, Throttle};
use phrasewav::providers::gemini::DEFAULT_VOICE;
use serde::{Deserialize, Serialize};

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Gemini API settings.
    #[serde(default)]
    pub gemini: GeminiSection,

    /// Voice and delivery settings.
    #[serde(default)]
    pub speech: SpeechSection,

    /// Input, output and pacing.
    #[serde(default)]
    pub batch: BatchSection,
}

/// Gemini API settings.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeminiSection {
    /// API key. Usually left unset in favour of `GEMINI_API_KEY`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Base URL override.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Speech model.
    #[serde(default = "default_model")]
    pub model: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl std::fmt::Debug for GeminiSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiSection")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for GeminiSection {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    GeminiConfig::DEFAULT_BASE_URL.to_owned()
}

fn default_model() -> String {
    GeminiConfig::DEFAULT_MODEL.to_owned()
}

const fn default_timeout_secs() -> u64 {
    GeminiConfig::DEFAULT_TIMEOUT_SECS
}

/// Voice and delivery settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpeechSection {
    /// Prebuilt voice name.
    #[serde(default = "default_voice")]
    pub voice: String,
    /// Instruction template; must contain `{phrase}`.
    #[serde(default)]
    pub instruction: InstructionTemplate,
}

impl Default for SpeechSection {
    fn default() -> Self {
        Self {
            voice: default_voice(),
            instruction: InstructionTemplate::default(),
        }
    }
}

fn default_voice() -> String {
    DEFAULT_VOICE.to_owned()
}

/// Input, output and pacing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatchSection {
    /// Phrase list (JSON array of strings).
    #[serde(default = "default_input")]
    pub input: PathBuf,
    /// Directory for WAV files.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Pause after each request, in seconds.
    #[serde(default = "default_delay_secs")]
    pub delay_secs: u64,
    /// Record failures and continue instead of stopping.
    #[serde(default)]
    pub keep_going: bool,
    /// Retry policy; absent means no retries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry: Option<RetryConfig>,
}

impl Default for BatchSection {
    fn default() -> Self {
        Self {
            input: default_input(),
            output_dir: default_output_dir(),
            delay_secs: default_delay_secs(),
            keep_going: false,
            retry: None,
        }
    }
}

fn default_input() -> PathBuf {
    PathBuf::from(phrasewav::phrases::DEFAULT_PHRASES_PATH)
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

const fn default_delay_secs() -> u64 {
    Throttle::DEFAULT_INTERVAL.as_secs()
}

impl AppConfig {
    /// Validate the configuration and return any issues.
    #[must_use]
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.gemini.api_key.as_deref().is_none_or(str::is_empty) {
            issues.push(ConfigIssue::warning(
                "gemini.api_key",
                "No API key set. Set GEMINI_API_KEY or pass --api-key.",
            ));
        }

        if self.gemini.model.trim().is_empty() {
            issues.push(ConfigIssue::error("gemini.model", "Model must not be empty"));
        }

        if self.speech.voice.trim().is_empty() {
            issues.push(ConfigIssue::error("speech.voice", "Voice must not be empty"));
        }

        if self.batch.delay_secs == 0 {
            issues.push(ConfigIssue::warning(
                "batch.delay_secs",
                "No pause between requests; the service may reject calls with 429",
            ));
        }

        if let Some(retry) = &self.batch.retry
            && retry.backoff_multiplier < 1.0
        {
            issues.push(ConfigIssue::warning(
                "batch.retry.backoff_multiplier",
                "Multipliers below 1.0 are treated as 1.0",
            ));
        }

        issues
    }

    /// Check if the configuration is valid (no errors).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate()
            .iter()
            .all(|issue| issue.level != IssueLevel::Error)
    }

    /// Merge environment variables into the configuration.
    #[must_use]
    pub fn with_env(self) -> Self {
        self.with_env_from(|key| std::env::var(key).ok())
    }

    /// Merge variables from `lookup`; set variables override file values.
    #[must_use]
    pub fn with_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(key) = lookup("GEMINI_API_KEY").or_else(|| lookup("GOOGLE_API_KEY")) {
            self.gemini.api_key = Some(key);
        }
        if let Some(url) = lookup("GEMINI_BASE_URL") {
            self.gemini.base_url = url;
        }
        if let Some(model) = lookup("GEMINI_MODEL") {
            self.gemini.model = model;
        }
        self
    }

    /// Client configuration for the Gemini provider.
    #[must_use]
    pub fn gemini_config(&self) -> GeminiConfig {
        GeminiConfig::new(self.gemini.api_key.clone().unwrap_or_default())
            .with_base_url(&self.gemini.base_url)
            .with_model(&self.gemini.model)
            .with_timeout(self.gemini.timeout_secs)
    }

    /// Batch options derived from this configuration.
    #[must_use]
    pub fn batch_options(&self) -> BatchOptions {
        let mut options = BatchOptions::default()
            .with_voice(&self.speech.voice)
            .with_instruction(self.speech.instruction.clone())
            .with_output_dir(&self.batch.output_dir)
            .with_throttle(Throttle::new(Duration::from_secs(self.batch.delay_secs)));

        if let Some(retry) = self.batch.retry {
            options = options.with_retry(retry);
        }
        if self.batch.keep_going {
            options = options.with_failure_policy(FailurePolicy::KeepGoing);
        }
        options
    }
}

/// A configuration validation issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    /// Issue severity level.
    pub level: IssueLevel,
    /// Configuration path (e.g., "gemini.api_key").
    pub path: String,
    /// Human-readable message.
    pub message: String,
}

impl ConfigIssue {
    /// Create an error-level issue.
    #[must_use]
    pub fn error(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: IssueLevel::Error,
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a warning-level issue.
    #[must_use]
    pub fn warning(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: IssueLevel::Warning,
            path: path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = match self.level {
            IssueLevel::Error => "ERROR",
            IssueLevel::Warning => "WARN",
        };
        write!(f, "[{}] {}: {}", prefix, self.path, self.message)
    }
}

/// Severity level for configuration issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueLevel {
    /// Error that prevents a run.
    Error,
    /// Warning about potential issues.
    Warning,
}
