//! Text-to-speech playback for Mustashar.
//!
//! Owns the lifecycle of at most one spoken-audio handle per session:
//! fetch, decode, play, pause, stop. Synthesis goes through the
//! `SpeechGateway` port; actual audio output goes through the `AudioSink`
//! port so the controller stays testable without a sound device.

pub mod error;
pub mod gateway;
pub mod playback;

pub use error::SpeechError;
pub use gateway::{MockSpeechGateway, SpeechAudio, SpeechGateway};
pub use playback::{
    AudioSink, MockAudioSink, PlaybackController, PlaybackHandle, PlaybackStatus, SpeakOutcome,
};
