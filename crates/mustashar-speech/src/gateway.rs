//! Speech gateway port.
//!
//! The remote text-to-speech function accepts text and returns encoded
//! audio. The transport decodes the payload; the controller only ever
//! sees ready-to-play bytes plus a content type.

use async_trait::async_trait;

use crate::error::SpeechError;

/// Decoded synthesis result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechAudio {
    /// Encoded audio bytes (already base64-decoded by the transport).
    pub data: Vec<u8>,
    /// MIME type of `data`, e.g. `audio/mpeg`.
    pub content_type: String,
}

/// Remote endpoint that turns text into encoded audio.
#[async_trait]
pub trait SpeechGateway: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<SpeechAudio, SpeechError>;
}

// =============================================================================
// Mock implementation
// =============================================================================

use std::collections::VecDeque;
use std::sync::Mutex;

/// Scripted speech gateway for tests.
///
/// Records every synthesized text; queued failures are returned first,
/// after which synthesis succeeds with deterministic bytes derived from
/// the text.
pub struct MockSpeechGateway {
    failures: Mutex<VecDeque<SpeechError>>,
    texts: Mutex<Vec<String>>,
}

impl Default for MockSpeechGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSpeechGateway {
    pub fn new() -> Self {
        Self {
            failures: Mutex::new(VecDeque::new()),
            texts: Mutex::new(Vec::new()),
        }
    }

    pub fn push_failure(&self, err: SpeechError) {
        self.failures.lock().expect("mock lock").push_back(err);
    }

    /// Texts synthesized so far, in order.
    pub fn texts(&self) -> Vec<String> {
        self.texts.lock().expect("mock lock").clone()
    }

    pub fn call_count(&self) -> usize {
        self.texts.lock().expect("mock lock").len()
    }
}

#[async_trait]
impl SpeechGateway for MockSpeechGateway {
    async fn synthesize(&self, text: &str) -> Result<SpeechAudio, SpeechError> {
        self.texts.lock().expect("mock lock").push(text.to_string());
        if let Some(err) = self.failures.lock().expect("mock lock").pop_front() {
            return Err(err);
        }
        Ok(SpeechAudio {
            data: text.as_bytes().to_vec(),
            content_type: "audio/mpeg".to_string(),
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
