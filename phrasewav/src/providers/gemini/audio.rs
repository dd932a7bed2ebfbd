//! Gemini text-to-speech implementation.

use async_trait::async_trait;
use tracing::debug;

use crate::audio::{SpeechRequest, SpeechResponse, TextToSpeechProvider, Voice};
use crate::error::{ProviderError, Result};

use super::client::Gemini;
use super::types::GenerateContentResponse;

/// Prebuilt Gemini voices and their published styles.
const PREBUILT_VOICES: &[(&str, &str)] = &[
    ("Zephyr", "Bright"),
    ("Puck", "Upbeat"),
    ("Charon", "Informative"),
    ("Kore", "Firm"),
    ("Fenrir", "Excitable"),
    ("Leda", "Youthful"),
    ("Orus", "Firm"),
    ("Aoede", "Breezy"),
    ("Callirrhoe", "Easy-going"),
    ("Autonoe", "Bright"),
    ("Enceladus", "Breathy"),
    ("Iapetus", "Clear"),
    ("Umbriel", "Easy-going"),
    ("Algieba", "Smooth"),
    ("Despina", "Smooth"),
    ("Erinome", "Clear"),
    ("Algenib", "Gravelly"),
    ("Rasalgethi", "Informative"),
    ("Laomedeia", "Upbeat"),
    ("Achernar", "Soft"),
    ("Alnilam", "Firm"),
    ("Schedar", "Even"),
    ("Gacrux", "Mature"),
    ("Pulcherrima", "Forward"),
    ("Achird", "Friendly"),
    ("Zubenelgenubi", "Casual"),
    ("Vindemiatrix", "Gentle"),
    ("Sadachbia", "Lively"),
    ("Sadaltager", "Knowledgeable"),
    ("Sulafat", "Warm"),
];

#[async_trait]
impl TextToSpeechProvider for Gemini {
    async fn speech(&self, request: &SpeechRequest) -> Result<SpeechResponse> {
        let url = self.generate_url(&request.model);
        let body = Self::build_body(request);

        debug!(url = %url, voice = %request.voice.id, "sending generateContent request");

        let response = self
            .build_request(&url)
            .json(&body)
            .send()
            .await
            .map_err(ProviderError::from)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(Self::parse_error(status.as_u16(), &error_text).into());
        }

        let text = response.text().await.map_err(ProviderError::from)?;
        let parsed: GenerateContentResponse = serde_json::from_str(&text)
            .map_err(|e| ProviderError::response_format("generateContent JSON", e.to_string()))?;

        let (audio, mime_type) = Self::extract_audio(parsed)?;
        debug!(bytes = audio.len(), mime_type = %mime_type, "received audio");

        Ok(SpeechResponse::new(audio, mime_type))
    }

    fn available_voices(&self) -> Vec<Voice> {
        prebuilt_voices()
    }
}

/// The prebuilt voice catalogue; needs no credentials.
#[must_use]
pub fn prebuilt_voices() -> Vec<Voice> {
    PREBUILT_VOICES
        .iter()
        .map(|(id, style)| Voice::new(*id).description(*style))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::providers::gemini::GeminiConfig;

    fn test_client() -> Gemini {
        Gemini::new(GeminiConfig::new("test-key")).unwrap()
    }

    #[test]
    fn returns_all_prebuilt_voices() {
        assert_eq!(test_client().available_voices().len(), 30);
    }

    #[test]
    fn contains_default_voice() {
        let voices = test_client().available_voices();
        assert!(voices.iter().any(|v| v.id == "Zephyr"));
    }

    #[test]
    fn all_voices_have_descriptions() {
        for voice in test_client().available_voices() {
            assert!(
                voice.description.is_some(),
                "Voice {} missing description",
                voice.id
            );
        }
    }

    #[test]
    fn voice_ids_are_unique() {
        let voices = test_client().available_voices();
        let mut ids: Vec<_> = voices.iter().map(|v| v.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), voices.len());
    }
}
