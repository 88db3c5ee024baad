//! Speech-synthesis backend trait and the always-absent backend.
//!
//! # Overview
//!
//! [`SpeechBackend`] is what the controller drives. It is object-safe and
//! `Send + Sync` so it can be held behind an `Arc<dyn SpeechBackend>`.
//!
//! [`SilentBackend`] reports itself unsupported; the controller then skips
//! audio and the host shows text only.
//!
//! [`MockSpeechBackend`] (available under `#[cfg(test)]`) records every
//! utterance and can hold one open until it is cancelled.

use async_trait::async_trait;
use thiserror::Error;

use super::settings::SpeechSettings;

// ---------------------------------------------------------------------------
// SpeechError
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpeechError {
    /// No synthesis engine is available on this system.
    #[error("speech synthesis is not supported on this system")]
    Unsupported,

    /// The synthesis engine could not be started.
    #[error("failed to start speech synthesis: {0}")]
    Spawn(String),

    /// The engine started but reported a failure.
    #[error("speech synthesis failed: {0}")]
    Failed(String),
}

// ---------------------------------------------------------------------------
// Utterance
// ---------------------------------------------------------------------------

/// Identifier handed out by the controller for each started utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UtteranceId(pub u64);

impl std::fmt::Display for UtteranceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One unit of spoken output with the settings captured when it was requested.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub id: UtteranceId,
    pub text: String,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
    pub voice: Option<String>,
}

impl Utterance {
    pub fn new(id: UtteranceId, text: &str, settings: &SpeechSettings) -> Self {
        Self {
            id,
            text: text.to_string(),
            rate: settings.rate,
            pitch: settings.pitch,
            volume: settings.volume,
            voice: settings.voice().map(str::to_string),
        }
    }
}

/// A voice offered by a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    /// Identifier stored in [`SpeechSettings::voice`].
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// BCP-47-ish language tag (e.g. `"fr-fr"`).
    pub language: String,
}

// ---------------------------------------------------------------------------
// SpeechBackend trait
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe interface to a speech synthesizer.
///
/// # Contract
///
/// - `utter` resolves when the utterance has finished playing.
/// - Dropping the `utter` future must silence the output immediately; the
///   controller cancels utterances by aborting the task that polls it.
#[async_trait]
pub trait SpeechBackend: Send + Sync {
    /// Whether audio output is possible at all.
    fn is_supported(&self) -> bool;

    /// Voices the backend can speak with.
    async fn voices(&self) -> Vec<Voice> {
        Vec::new()
    }

    /// Speak one utterance to completion.
    async fn utter(&self, utterance: &Utterance) -> Result<(), SpeechError>;
}

// Compile-time assertion: Box<dyn SpeechBackend> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn SpeechBackend>) {}
};

// ---------------------------------------------------------------------------
// SilentBackend
// ---------------------------------------------------------------------------

/// Stand-in for systems without any synthesizer.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentBackend;

#[async_trait]
impl SpeechBackend for SilentBackend {
    fn is_supported(&self) -> bool {
        false
    }

    async fn utter(&self, _utterance: &Utterance) -> Result<(), SpeechError> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MockSpeechBackend (tests only)
// ---------------------------------------------------------------------------

#[cfg(test)]
pub struct MockSpeechBackend {
    supported: bool,
    hold: bool,
    fail: bool,
    voices: Vec<Voice>,
    spoken: std::sync::Mutex<Vec<Utterance>>,
    cancelled: std::sync::Arc<std::sync::atomic::AtomicUsize>,
    finished: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl MockSpeechBackend {
    /// Finishes every utterance immediately.
    pub fn instant() -> Self {
        Self {
            supported: true,
            hold: false,
            fail: false,
            voices: Vec::new(),
            spoken: std::sync::Mutex::new(Vec::new()),
            cancelled: Default::default(),
            finished: Default::default(),
        }
    }

    /// Never finishes an utterance on its own; only cancellation ends it.
    pub fn holding() -> Self {
        Self {
            hold: true,
            ..Self::instant()
        }
    }

    /// Fails every utterance.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::instant()
        }
    }

    pub fn unsupported() -> Self {
        Self {
            supported: false,
            ..Self::instant()
        }
    }

    pub fn with_voices(voices: Vec<Voice>) -> Self {
        Self {
            voices,
            ..Self::instant()
        }
    }

    pub fn spoken(&self) -> Vec<Utterance> {
        self.spoken.lock().unwrap().clone()
    }

    pub fn spoken_texts(&self) -> Vec<String> {
        self.spoken().into_iter().map(|u| u.text).collect()
    }

    pub fn cancelled(&self) -> usize {
        self.cancelled.load(std::sync::atomic::Ordering::SeqCst)
    }

    pub fn finished(&self) -> usize {
        self.finished.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
struct CancelGuard(std::sync::Arc<std::sync::atomic::AtomicUsize>);

#[cfg(test)]
impl Drop for CancelGuard {
    fn drop(&mut self) {
        self.0.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(test)]
#[async_trait]
impl SpeechBackend for MockSpeechBackend {
    fn is_supported(&self) -> bool {
        self.supported
    }

    async fn voices(&self) -> Vec<Voice> {
        self.voices.clone()
    }

    async fn utter(&self, utterance: &Utterance) -> Result<(), SpeechError> {
        self.spoken.lock().unwrap().push(utterance.clone());

        if self.fail {
            return Err(SpeechError::Failed("mock failure".into()));
        }
        if self.hold {
            let _guard = CancelGuard(std::sync::Arc::clone(&self.cancelled));
            std::future::pending::<()>().await;
        }

        self.finished
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utterance_captures_settings() {
        let settings = SpeechSettings {
            rate: 1.5,
            pitch: 0.8,
            volume: 0.3,
            voice: "en-gb".into(),
        };
        let u = Utterance::new(UtteranceId(7), "hello", &settings);
        assert_eq!(u.text, "hello");
        assert_eq!(u.rate, 1.5);
        assert_eq!(u.pitch, 0.8);
        assert_eq!(u.volume, 0.3);
        assert_eq!(u.voice.as_deref(), Some("en-gb"));
    }

    #[test]
    fn utterance_without_voice_uses_default() {
        let u = Utterance::new(UtteranceId(1), "hi", &SpeechSettings::default());
        assert!(u.voice.is_none());
    }

    #[tokio::test]
    async fn silent_backend_is_unsupported_and_harmless() {
        let backend = SilentBackend;
        assert!(!backend.is_supported());
        assert!(backend.voices().await.is_empty());
        let u = Utterance::new(UtteranceId(1), "hi", &SpeechSettings::default());
        assert!(backend.utter(&u).await.is_ok());
    }

    #[test]
    fn utterance_id_display() {
        assert_eq!(UtteranceId(42).to_string(), "#42");
    }
}
