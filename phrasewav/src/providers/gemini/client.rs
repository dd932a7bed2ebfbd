//! Gemini API client implementation.

use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Client;

use crate::audio::SpeechRequest;
use crate::error::{ProviderError, Result};

use super::config::GeminiConfig;
use super::types::{
    GeminiContent, GeminiErrorResponse, GeminiPart, GenerateContentRequest,
    GenerateContentResponse, GenerationConfig, PrebuiltVoiceConfig, SpeechConfig, VoiceConfig,
};

pub(crate) const PROVIDER: &str = "gemini";

/// Gemini API client.
#[derive(Debug, Clone)]
pub struct Gemini {
    pub(crate) config: Arc<GeminiConfig>,
    pub(crate) client: Client,
}

impl Gemini {
    /// Create a new Gemini client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an authentication error when the API key is empty, or an
    /// internal error if the HTTP client cannot be built.
    pub fn new(config: GeminiConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(ProviderError::auth(PROVIDER, "API key is required").into());
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(timeout));
        }

        let client = builder
            .build()
            .map_err(|e| ProviderError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            config: Arc::new(config),
            client,
        })
    }

    /// Create a client from environment variables.
    ///
    /// # Errors
    ///
    /// See [`GeminiConfig::from_env`] and [`Gemini::new`].
    pub fn from_env() -> Result<Self> {
        let config = GeminiConfig::from_env()?;
        Self::new(config)
    }

    /// Get the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Get the default model.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Build the `generateContent` URL for a model.
    pub(crate) fn generate_url(&self, model: &str) -> String {
        let model = if model.is_empty() {
            &self.config.model
        } else {
            model
        };
        format!("{}/models/{model}:generateContent", self.config.base_url)
    }

    /// Build an authenticated JSON POST request.
    pub(crate) fn build_request(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .post(url)
            .header("x-goog-api-key", &self.config.api_key)
            .header("Content-Type", "application/json")
    }

    /// Build the request body for a speech request.
    pub(crate) fn build_body(request: &SpeechRequest) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![GeminiContent {
                role: None,
                parts: vec![GeminiPart::text(request.input.clone())],
            }],
            generation_config: GenerationConfig {
                response_modalities: vec!["AUDIO".to_owned()],
                speech_config: SpeechConfig {
                    voice_config: VoiceConfig {
                        prebuilt_voice_config: PrebuiltVoiceConfig {
                            voice_name: request.voice.id.clone(),
                        },
                    },
                },
            },
        }
    }

    /// Pull the audio out of `candidates[0].content.parts[0].inlineData`.
    ///
    /// Returns the decoded bytes and the reported MIME type.
    pub(crate) fn extract_audio(
        response: GenerateContentResponse,
    ) -> std::result::Result<(Vec<u8>, String), ProviderError> {
        let Some(candidate) = response.candidates.into_iter().next() else {
            let got = response
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .map_or_else(
                    || "no candidates".to_owned(),
                    |reason| format!("no candidates (blocked: {reason})"),
                );
            return Err(ProviderError::response_format("at least one candidate", got));
        };

        let finish_reason = candidate.finish_reason;
        let Some(part) = candidate
            .content
            .and_then(|content| content.parts.into_iter().next())
        else {
            let got = finish_reason.map_or_else(
                || "candidate without content parts".to_owned(),
                |reason| format!("candidate without content parts (finish reason: {reason})"),
            );
            return Err(ProviderError::response_format("a content part", got));
        };

        let Some(inline) = part.inline_data else {
            let got = if part.text.is_some() {
                "a text part"
            } else {
                "an empty part"
            };
            return Err(ProviderError::response_format("inline audio data", got));
        };

        if !inline.mime_type.is_empty() && !inline.mime_type.starts_with("audio/") {
            return Err(ProviderError::response_format(
                "audio/* inline data",
                inline.mime_type,
            ));
        }

        let audio = STANDARD
            .decode(inline.data.as_bytes())
            .map_err(|e| ProviderError::response_format("base64 audio data", e.to_string()))?;

        Ok((audio, inline.mime_type))
    }

    /// Map a non-success HTTP response to a provider error.
    pub(crate) fn parse_error(status: u16, body: &str) -> ProviderError {
        if let Ok(error_response) = serde_json::from_str::<GeminiErrorResponse>(body) {
            let error = error_response.error;
            let code = error.status.unwrap_or_else(|| error.code.to_string());

            return match status {
                401 | 403 => ProviderError::auth(PROVIDER, error.message),
                429 => ProviderError::rate_limited(PROVIDER, error.message),
                _ => ProviderError::provider_code(PROVIDER, code, error.message),
            };
        }

        match status {
            401 | 403 => ProviderError::auth(PROVIDER, body.to_owned()),
            429 => ProviderError::rate_limited(PROVIDER, body.to_owned()),
            _ => ProviderError::http_status(status, body.to_owned()),
        }
    }
}
