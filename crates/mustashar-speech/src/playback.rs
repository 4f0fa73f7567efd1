//! Playback controller: the single-flight audio lifecycle.
//!
//! At most one audio handle is alive per session. Starting playback for
//! new text first releases any existing handle; the encoded audio of the
//! last synthesis is cached under the literal text it was synthesized
//! for, so replay never serves stale audio for different content.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::SpeechError;
use crate::gateway::{SpeechAudio, SpeechGateway};

// =============================================================================
// Enums
// =============================================================================

/// Current state of the playback lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStatus {
    /// No audio active.
    Idle,
    /// A synthesis request is in flight.
    Loading,
    /// Audio is audible.
    Playing,
    /// Audio is suspended and can be resumed.
    Paused,
}

/// What a `speak` call ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeakOutcome {
    /// Fresh audio was synthesized and playback started.
    Started,
    /// Cached audio for the same text was replayed without a gateway call.
    ReplayedFromCache,
    /// Something was already audible; the call acted as a stop toggle.
    Stopped,
}

// =============================================================================
// Ports
// =============================================================================

/// Live playback resource returned by a sink.
///
/// Dropped (after `stop`) on every exit path: normal end, manual stop,
/// error, or pre-emption by a new acquisition.
pub trait PlaybackHandle: Send {
    fn pause(&mut self) -> Result<(), SpeechError>;
    fn resume(&mut self) -> Result<(), SpeechError>;
    fn stop(&mut self);
}

/// Audio output device abstraction.
///
/// Implementations decode the encoded payload and begin playback,
/// returning a handle that controls the running stream.
pub trait AudioSink: Send + Sync {
    fn start(&self, audio: &SpeechAudio) -> Result<Box<dyn PlaybackHandle>, SpeechError>;
}

// =============================================================================
// Controller
// =============================================================================

struct CachedAudio {
    text: String,
    audio: SpeechAudio,
}

/// Owns the one-per-session audio slot and the text-keyed replay cache.
pub struct PlaybackController {
    status: PlaybackStatus,
    handle: Option<Box<dyn PlaybackHandle>>,
    cache: Option<CachedAudio>,
}

impl Default for PlaybackController {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackController {
    pub fn new() -> Self {
        Self {
            status: PlaybackStatus::Idle,
            handle: None,
            cache: None,
        }
    }

    /// Speak the given text, or stop if something is already audible.
    ///
    /// A second invocation while audio is audible always stops, regardless
    /// of whether the text changed. Replay from cache happens only for the
    /// exact text of the last synthesis; different text invalidates the
    /// cache and fetches fresh audio.
    pub async fn speak(
        &mut self,
        text: &str,
        gateway: &dyn SpeechGateway,
        sink: &dyn AudioSink,
    ) -> Result<SpeakOutcome, SpeechError> {
        match self.status {
            PlaybackStatus::Playing | PlaybackStatus::Paused => {
                self.stop();
                return Ok(SpeakOutcome::Stopped);
            }
            PlaybackStatus::Loading => return Err(SpeechError::SynthesisPending),
            PlaybackStatus::Idle => {}
        }

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(SpeechError::EmptyText);
        }

        if let Some(cached) = self.cache.as_ref().filter(|c| c.text == trimmed) {
            // Replay without a gateway call.
            match sink.start(&cached.audio) {
                Ok(handle) => {
                    self.handle = Some(handle);
                    self.status = PlaybackStatus::Playing;
                    tracing::debug!("Replaying cached audio");
                    return Ok(SpeakOutcome::ReplayedFromCache);
                }
                Err(err) => {
                    self.release(true);
                    return Err(err);
                }
            }
        }

        // Different text: the cached resource is stale.
        self.cache = None;
        self.status = PlaybackStatus::Loading;
        tracing::debug!(chars = trimmed.chars().count(), "Requesting synthesis");

        let audio = match gateway.synthesize(trimmed).await {
            Ok(audio) => audio,
            Err(err) => {
                self.release(true);
                return Err(err);
            }
        };
        if audio.data.is_empty() {
            self.release(true);
            return Err(SpeechError::Decode("empty audio payload".to_string()));
        }

        match sink.start(&audio) {
            Ok(handle) => {
                self.cache = Some(CachedAudio {
                    text: trimmed.to_string(),
                    audio,
                });
                self.handle = Some(handle);
                self.status = PlaybackStatus::Playing;
                Ok(SpeakOutcome::Started)
            }
            Err(err) => {
                self.release(true);
                Err(err)
            }
        }
    }

    /// Stop playback and release the handle. Idempotent; the replay cache
    /// is retained.
    pub fn stop(&mut self) {
        self.release(false);
    }

    /// Suspend audible playback.
    pub fn pause(&mut self) -> Result<(), SpeechError> {
        if self.status != PlaybackStatus::Playing {
            return Err(SpeechError::NotPlaying);
        }
        match self.handle.as_mut() {
            Some(handle) => {
                handle.pause()?;
                self.status = PlaybackStatus::Paused;
                Ok(())
            }
            None => Err(SpeechError::NotPlaying),
        }
    }

    /// Resume suspended playback.
    pub fn resume(&mut self) -> Result<(), SpeechError> {
        if self.status != PlaybackStatus::Paused {
            return Err(SpeechError::NotPlaying);
        }
        match self.handle.as_mut() {
            Some(handle) => {
                handle.resume()?;
                self.status = PlaybackStatus::Playing;
                Ok(())
            }
            None => Err(SpeechError::NotPlaying),
        }
    }

    /// Sink-driver callback: the stream reached its natural end.
    ///
    /// The decoded handle is released; the encoded cache stays for replay.
    pub fn on_playback_ended(&mut self) {
        self.handle = None;
        self.status = PlaybackStatus::Idle;
        tracing::debug!("Playback ended");
    }

    /// Sink-driver callback: the stream failed mid-play.
    ///
    /// Releases the handle and drops the cache entry for the failed text,
    /// then returns the recoverable error for the caller to surface.
    pub fn on_playback_error(&mut self, message: &str) -> SpeechError {
        self.release(true);
        tracing::warn!(message, "Playback failed");
        SpeechError::Playback(message.to_string())
    }

    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    /// Text of the cached synthesis, if any.
    pub fn cached_text(&self) -> Option<&str> {
        self.cache.as_ref().map(|c| c.text.as_str())
    }

    fn release(&mut self, drop_cache: bool) {
        if let Some(mut handle) = self.handle.take() {
            handle.stop();
        }
        if drop_cache {
            self.cache = None;
        }
        self.status = PlaybackStatus::Idle;
    }
}

// =============================================================================
// Mock sink
// =============================================================================

/// Sink double recording every lifecycle call.
///
/// Handles share an event log with the sink, so tests can assert the
/// exact start/pause/resume/stop sequence without a sound device.
pub struct MockAudioSink {
    fail_next: AtomicBool,
    events: Arc<Mutex<Vec<String>>>,
}

impl Default for MockAudioSink {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAudioSink {
    pub fn new() -> Self {
        Self {
            fail_next: AtomicBool::new(false),
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Make the next `start` call fail.
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::Relaxed);
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().expect("mock lock").clone()
    }

    pub fn start_count(&self) -> usize {
        self.events().iter().filter(|e| *e == "start").count()
    }
}

struct MockPlaybackHandle {
    events: Arc<Mutex<Vec<String>>>,
}

impl PlaybackHandle for MockPlaybackHandle {
    fn pause(&mut self) -> Result<(), SpeechError> {
        self.events.lock().expect("mock lock").push("pause".to_string());
        Ok(())
    }

    fn resume(&mut self) -> Result<(), SpeechError> {
        self.events.lock().expect("mock lock").push("resume".to_string());
        Ok(())
    }

    fn stop(&mut self) {
        self.events.lock().expect("mock lock").push("stop".to_string());
    }
}

impl AudioSink for MockAudioSink {
    fn start(&self, audio: &SpeechAudio) -> Result<Box<dyn PlaybackHandle>, SpeechError> {
        if self.fail_next.swap(false, Ordering::Relaxed) {
            return Err(SpeechError::Decode("undecodable payload".to_string()));
        }
        if audio.data.is_empty() {
            return Err(SpeechError::Decode("empty audio payload".to_string()));
        }
        self.events.lock().expect("mock lock").push("start".to_string());
        Ok(Box::new(MockPlaybackHandle {
            events: Arc::clone(&self.events),
        }))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MockSpeechGateway;

    fn fixtures() -> (PlaybackController, MockSpeechGateway, MockAudioSink) {
        (
            PlaybackController::new(),
            MockSpeechGateway::new(),
            MockAudioSink::new(),
        )
    }

    // ---- Validation ----

    #[tokio::test]
    async fn test_empty_text_rejected_before_gateway_call() {
        let (mut ctrl, gw, sink) = fixtures();
        let err = ctrl.speak("   ", &gw, &sink).await.unwrap_err();
        assert!(matches!(err, SpeechError::EmptyText));
        assert_eq!(gw.call_count(), 0);
        assert_eq!(ctrl.status(), PlaybackStatus::Idle);
    }

    // ---- Start / stop toggle ----

    #[tokio::test]
    async fn test_speak_starts_playback() {
        let (mut ctrl, gw, sink) = fixtures();
        let outcome = ctrl.speak("التحليل القانوني.", &gw, &sink).await.unwrap();
        assert_eq!(outcome, SpeakOutcome::Started);
        assert_eq!(ctrl.status(), PlaybackStatus::Playing);
        assert_eq!(gw.call_count(), 1);
        assert_eq!(sink.start_count(), 1);
    }

    #[tokio::test]
    async fn test_second_speak_toggles_stop_without_gateway_call() {
        let (mut ctrl, gw, sink) = fixtures();
        ctrl.speak("النص", &gw, &sink).await.unwrap();

        let outcome = ctrl.speak("النص", &gw, &sink).await.unwrap();
        assert_eq!(outcome, SpeakOutcome::Stopped);
        assert_eq!(ctrl.status(), PlaybackStatus::Idle);
        assert_eq!(gw.call_count(), 1);
        assert_eq!(sink.events().last().map(String::as_str), Some("stop"));
    }

    #[tokio::test]
    async fn test_speak_while_playing_stops_even_for_different_text() {
        let (mut ctrl, gw, sink) = fixtures();
        ctrl.speak("النص الأول", &gw, &sink).await.unwrap();

        // Toggle semantics: the second call stops, it does not switch.
        let outcome = ctrl.speak("نص مختلف تماماً", &gw, &sink).await.unwrap();
        assert_eq!(outcome, SpeakOutcome::Stopped);
        assert_eq!(gw.call_count(), 1);
    }

    #[tokio::test]
    async fn test_speak_while_paused_stops() {
        let (mut ctrl, gw, sink) = fixtures();
        ctrl.speak("النص", &gw, &sink).await.unwrap();
        ctrl.pause().unwrap();

        let outcome = ctrl.speak("النص", &gw, &sink).await.unwrap();
        assert_eq!(outcome, SpeakOutcome::Stopped);
        assert_eq!(ctrl.status(), PlaybackStatus::Idle);
    }

    #[test]
    fn test_stop_when_idle_is_noop() {
        let mut ctrl = PlaybackController::new();
        ctrl.stop();
        assert_eq!(ctrl.status(), PlaybackStatus::Idle);
    }

    // ---- Cache behavior ----

    #[tokio::test]
    async fn test_replay_same_text_uses_cache() {
        let (mut ctrl, gw, sink) = fixtures();
        ctrl.speak("النص", &gw, &sink).await.unwrap();
        ctrl.on_playback_ended();

        let outcome = ctrl.speak("النص", &gw, &sink).await.unwrap();
        assert_eq!(outcome, SpeakOutcome::ReplayedFromCache);
        assert_eq!(gw.call_count(), 1);
        assert_eq!(sink.start_count(), 2);
        assert_eq!(ctrl.status(), PlaybackStatus::Playing);
    }

    #[tokio::test]
    async fn test_new_text_invalidates_cache_and_fetches_fresh() {
        let (mut ctrl, gw, sink) = fixtures();
        ctrl.speak("النص الأول", &gw, &sink).await.unwrap();
        ctrl.on_playback_ended();

        // Cached audio exists for the first text; different text must not
        // replay it.
        let outcome = ctrl.speak("النص الثاني", &gw, &sink).await.unwrap();
        assert_eq!(outcome, SpeakOutcome::Started);
        assert_eq!(gw.call_count(), 2);
        assert_eq!(gw.texts(), vec!["النص الأول", "النص الثاني"]);
        assert_eq!(ctrl.cached_text(), Some("النص الثاني"));
    }

    #[tokio::test]
    async fn test_cache_survives_manual_stop() {
        let (mut ctrl, gw, sink) = fixtures();
        ctrl.speak("النص", &gw, &sink).await.unwrap();
        ctrl.stop();

        let outcome = ctrl.speak("النص", &gw, &sink).await.unwrap();
        assert_eq!(outcome, SpeakOutcome::ReplayedFromCache);
        assert_eq!(gw.call_count(), 1);
    }

    #[tokio::test]
    async fn test_cache_key_uses_trimmed_text() {
        let (mut ctrl, gw, sink) = fixtures();
        ctrl.speak("النص", &gw, &sink).await.unwrap();
        ctrl.on_playback_ended();

        let outcome = ctrl.speak("  النص  ", &gw, &sink).await.unwrap();
        assert_eq!(outcome, SpeakOutcome::ReplayedFromCache);
    }

    // ---- Failure paths ----

    #[tokio::test]
    async fn test_gateway_failure_returns_idle() {
        let (mut ctrl, gw, sink) = fixtures();
        gw.push_failure(SpeechError::Gateway("503".to_string()));

        let err = ctrl.speak("النص", &gw, &sink).await.unwrap_err();
        assert!(matches!(err, SpeechError::Gateway(_)));
        assert_eq!(ctrl.status(), PlaybackStatus::Idle);
        assert!(ctrl.cached_text().is_none());
        assert_eq!(sink.start_count(), 0);
    }

    #[tokio::test]
    async fn test_sink_failure_returns_idle_without_cache() {
        let (mut ctrl, gw, sink) = fixtures();
        sink.fail_next();

        let err = ctrl.speak("النص", &gw, &sink).await.unwrap_err();
        assert!(matches!(err, SpeechError::Decode(_)));
        assert_eq!(ctrl.status(), PlaybackStatus::Idle);
        // A failed start must not leave a cache entry that would be
        // replayed later.
        assert!(ctrl.cached_text().is_none());
    }

    #[tokio::test]
    async fn test_retry_after_gateway_failure() {
        let (mut ctrl, gw, sink) = fixtures();
        gw.push_failure(SpeechError::Gateway("down".to_string()));

        assert!(ctrl.speak("النص", &gw, &sink).await.is_err());
        let outcome = ctrl.speak("النص", &gw, &sink).await.unwrap();
        assert_eq!(outcome, SpeakOutcome::Started);
        assert_eq!(gw.call_count(), 2);
    }

    #[tokio::test]
    async fn test_playback_error_releases_handle_and_cache() {
        let (mut ctrl, gw, sink) = fixtures();
        ctrl.speak("النص", &gw, &sink).await.unwrap();

        let err = ctrl.on_playback_error("stream corrupt");
        assert!(matches!(err, SpeechError::Playback(_)));
        assert_eq!(ctrl.status(), PlaybackStatus::Idle);

        // The failed audio must not be replayed; the next speak fetches
        // fresh audio.
        let outcome = ctrl.speak("النص", &gw, &sink).await.unwrap();
        assert_eq!(outcome, SpeakOutcome::Started);
        assert_eq!(gw.call_count(), 2);
    }

    // ---- End-of-playback ----

    #[tokio::test]
    async fn test_playback_ended_transitions_to_idle() {
        let (mut ctrl, gw, sink) = fixtures();
        ctrl.speak("النص", &gw, &sink).await.unwrap();
        ctrl.on_playback_ended();
        assert_eq!(ctrl.status(), PlaybackStatus::Idle);
        // Cache retained for replay.
        assert_eq!(ctrl.cached_text(), Some("النص"));
    }

    // ---- Pause / resume ----

    #[tokio::test]
    async fn test_pause_resume_cycle() {
        let (mut ctrl, gw, sink) = fixtures();
        ctrl.speak("النص", &gw, &sink).await.unwrap();

        ctrl.pause().unwrap();
        assert_eq!(ctrl.status(), PlaybackStatus::Paused);
        ctrl.resume().unwrap();
        assert_eq!(ctrl.status(), PlaybackStatus::Playing);

        let events = sink.events();
        assert_eq!(events, vec!["start", "pause", "resume"]);
    }

    #[test]
    fn test_pause_when_idle_rejected() {
        let mut ctrl = PlaybackController::new();
        assert!(matches!(ctrl.pause().unwrap_err(), SpeechError::NotPlaying));
    }

    #[tokio::test]
    async fn test_resume_when_playing_rejected() {
        let (mut ctrl, gw, sink) = fixtures();
        ctrl.speak("النص", &gw, &sink).await.unwrap();
        assert!(matches!(ctrl.resume().unwrap_err(), SpeechError::NotPlaying));
    }

    #[tokio::test]
    async fn test_double_pause_rejected() {
        let (mut ctrl, gw, sink) = fixtures();
        ctrl.speak("النص", &gw, &sink).await.unwrap();
        ctrl.pause().unwrap();
        assert!(matches!(ctrl.pause().unwrap_err(), SpeechError::NotPlaying));
    }
}
