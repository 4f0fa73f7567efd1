//! Error types for the playback controller.

use mustashar_core::error::{GatewayError, MustasharError};

/// Errors from speech synthesis and playback.
///
/// Everything here is recoverable: the controller returns to idle,
/// releases any partial resource, and the session stays usable.
#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    #[error("text cannot be empty")]
    EmptyText,
    #[error("a synthesis request is already in flight")]
    SynthesisPending,
    #[error("nothing is playing")]
    NotPlaying,
    #[error("gateway error: {0}")]
    Gateway(String),
    #[error("audio decode error: {0}")]
    Decode(String),
    #[error("playback error: {0}")]
    Playback(String),
}

impl From<GatewayError> for SpeechError {
    fn from(err: GatewayError) -> Self {
        SpeechError::Gateway(err.to_string())
    }
}

impl From<SpeechError> for MustasharError {
    fn from(err: SpeechError) -> Self {
        MustasharError::Speech(err.to_string())
    }
}
