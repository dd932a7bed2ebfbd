//! Mock speech provider for testing.
//!
//! Replies with scripted payloads or errors, in order, and records every
//! request it receives so tests can assert on what would have been sent.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::audio::{SpeechRequest, SpeechResponse, TextToSpeechProvider, Voice};
use crate::error::{ProviderError, Result};

/// MIME type reported by the mock for every payload.
pub const MOCK_MIME_TYPE: &str = "audio/L16;codec=pcm;rate=24000";

/// A scripted speech provider.
///
/// Replies are returned in sequence, cycling when exhausted.
///
/// # Example
///
/// ```rust,ignore
/// let provider = MockSpeechProvider::new()
///     .reply(vec![0, 0, 1, 0])
///     .fail(ProviderError::rate_limited("mock", "slow down"));
/// ```
#[derive(Debug, Default)]
pub struct MockSpeechProvider {
    replies: Vec<std::result::Result<Vec<u8>, ProviderError>>,
    index: AtomicUsize,
    requests: Mutex<Vec<SpeechRequest>>,
}

impl MockSpeechProvider {
    /// Create a mock with no scripted replies; every call yields silence.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply carrying `audio`.
    #[must_use]
    pub fn reply(mut self, audio: Vec<u8>) -> Self {
        self.replies.push(Ok(audio));
        self
    }

    /// Queue a failing reply.
    #[must_use]
    pub fn fail(mut self, error: ProviderError) -> Self {
        self.replies.push(Err(error));
        self
    }

    /// Requests received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<SpeechRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of requests received so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.index.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextToSpeechProvider for MockSpeechProvider {
    async fn speech(&self, request: &SpeechRequest) -> Result<SpeechResponse> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());

        let index = self.index.fetch_add(1, Ordering::SeqCst);
        if self.replies.is_empty() {
            return Ok(SpeechResponse::new(Vec::new(), MOCK_MIME_TYPE));
        }

        match &self.replies[index % self.replies.len()] {
            Ok(audio) => Ok(SpeechResponse::new(audio.clone(), MOCK_MIME_TYPE)),
            Err(e) => Err(e.clone().into()),
        }
    }

    fn available_voices(&self) -> Vec<Voice> {
        vec![Voice::new("mock").description("Scripted replies")]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn request(text: &str) -> SpeechRequest {
        SpeechRequest::new("mock-model", text, "mock")
    }

    #[tokio::test]
    async fn cycles_replies() {
        let provider = MockSpeechProvider::new().reply(vec![1, 0]).reply(vec![2, 0]);

        let r1 = provider.speech(&request("a")).await.unwrap();
        let r2 = provider.speech(&request("b")).await.unwrap();
        let r3 = provider.speech(&request("c")).await.unwrap();

        assert_eq!(r1.audio, vec![1, 0]);
        assert_eq!(r2.audio, vec![2, 0]);
        assert_eq!(r3.audio, vec![1, 0]);
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn records_requests() {
        let provider = MockSpeechProvider::new();
        provider.speech(&request("hello")).await.unwrap();

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].input, "hello");
    }

    #[tokio::test]
    async fn scripted_failure() {
        let provider = MockSpeechProvider::new().fail(ProviderError::network("connection reset"));
        let err = provider.speech(&request("x")).await.unwrap_err();
        assert!(err.is_retryable());
    }
}
