//! Speech output controller — the single owner of the active utterance.
//!
//! [`SpeechController`] guarantees at most one utterance is playing. A new
//! [`speak`](SpeechController::speak) aborts the previous utterance's task
//! (cancelled, not drained) before starting its own; there is no queue.
//!
//! # State machine
//!
//! ```text
//! Idle ──speak(text)──▶ Speaking
//! Speaking ──speak(text)──▶ Speaking   (previous utterance aborted)
//! Speaking ──finished / backend error──▶ Idle
//! Speaking ──stop()──▶ Idle
//! ```
//!
//! The state is published on a `tokio::sync::watch` channel so the host can
//! follow it without callbacks.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::lock;

use super::backend::{SpeechBackend, Utterance, UtteranceId, Voice};
use super::settings::{SettingsError, SpeechSettings};

// ---------------------------------------------------------------------------
// SpeechState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SpeechState {
    #[default]
    Idle,
    Speaking,
}

impl SpeechState {
    pub fn label(&self) -> &'static str {
        match self {
            SpeechState::Idle => "Idle",
            SpeechState::Speaking => "Speaking",
        }
    }
}

// ---------------------------------------------------------------------------
// SpeechController
// ---------------------------------------------------------------------------

struct ActiveUtterance {
    id: UtteranceId,
    task: JoinHandle<()>,
}

struct ControllerInner {
    backend: Arc<dyn SpeechBackend>,
    settings: Mutex<SpeechSettings>,
    active: Mutex<Option<ActiveUtterance>>,
    state_tx: watch::Sender<SpeechState>,
    next_id: AtomicU64,
}

impl ControllerInner {
    /// Called by an utterance task when it ends on its own.
    fn finish(&self, id: UtteranceId) {
        let mut active = lock(&self.active);
        if active.as_ref().is_some_and(|a| a.id == id) {
            *active = None;
            self.state_tx.send_replace(SpeechState::Idle);
            log::debug!("speech: utterance {id} finished");
        }
    }
}

impl Drop for ControllerInner {
    fn drop(&mut self) {
        if let Some(active) = lock(&self.active).take() {
            active.task.abort();
        }
    }
}

/// Cheap-to-clone handle; all clones share one active utterance.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use image_narrator::speech::{EspeakBackend, SpeechController, SpeechSettings};
///
/// # async fn example() {
/// let speech = SpeechController::new(Arc::new(EspeakBackend::detect()), SpeechSettings::default());
/// speech.speak("First sentence.");
/// speech.speak("Second sentence interrupts the first.");
/// speech.stop();
/// # }
/// ```
#[derive(Clone)]
pub struct SpeechController {
    inner: Arc<ControllerInner>,
}

impl SpeechController {
    /// Out-of-range `settings` are replaced by the defaults.
    pub fn new(backend: Arc<dyn SpeechBackend>, settings: SpeechSettings) -> Self {
        let (state_tx, _) = watch::channel(SpeechState::Idle);
        if !backend.is_supported() {
            log::info!("speech: synthesis unavailable, running text-only");
        }

        let settings = match settings.validate() {
            Ok(()) => settings,
            Err(e) => {
                log::warn!("speech: ignoring invalid settings ({e}), using defaults");
                SpeechSettings::default()
            }
        };

        Self {
            inner: Arc::new(ControllerInner {
                backend,
                settings: Mutex::new(settings),
                active: Mutex::new(None),
                state_tx,
                next_id: AtomicU64::new(1),
            }),
        }
    }

    // -----------------------------------------------------------------------
    // Speaking
    // -----------------------------------------------------------------------

    /// Start speaking `text`, pre-empting whatever is playing.
    ///
    /// Returns `None` without touching the state when `text` is blank or the
    /// backend is unsupported. Must be called inside a tokio runtime.
    pub fn speak(&self, text: &str) -> Option<UtteranceId> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        if !self.inner.backend.is_supported() {
            log::debug!("speech: unsupported backend, skipping {} chars", text.len());
            return None;
        }

        let id = UtteranceId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        let utterance = Utterance::new(id, text, &self.settings());

        let mut active = lock(&self.inner.active);
        if let Some(previous) = active.take() {
            log::debug!("speech: utterance {} pre-empted by {id}", previous.id);
            previous.task.abort();
        }

        let backend = Arc::clone(&self.inner.backend);
        let inner: Weak<ControllerInner> = Arc::downgrade(&self.inner);
        let task = tokio::spawn(async move {
            if let Err(e) = backend.utter(&utterance).await {
                log::warn!("speech: utterance {} failed: {e}", utterance.id);
            }
            if let Some(inner) = inner.upgrade() {
                inner.finish(utterance.id);
            }
        });

        *active = Some(ActiveUtterance { id, task });
        self.inner.state_tx.send_replace(SpeechState::Speaking);
        Some(id)
    }

    /// Cut off the active utterance. Returns `false` if nothing was playing.
    pub fn stop(&self) -> bool {
        let mut active = lock(&self.inner.active);
        match active.take() {
            Some(previous) => {
                previous.task.abort();
                self.inner.state_tx.send_replace(SpeechState::Idle);
                log::debug!("speech: utterance {} stopped", previous.id);
                true
            }
            None => false,
        }
    }

    // -----------------------------------------------------------------------
    // State
    // -----------------------------------------------------------------------

    pub fn state(&self) -> SpeechState {
        *self.inner.state_tx.borrow()
    }

    pub fn is_speaking(&self) -> bool {
        self.state() == SpeechState::Speaking
    }

    /// Follow state transitions.
    pub fn subscribe(&self) -> watch::Receiver<SpeechState> {
        self.inner.state_tx.subscribe()
    }

    pub fn is_supported(&self) -> bool {
        self.inner.backend.is_supported()
    }

    // -----------------------------------------------------------------------
    // Settings & voices
    // -----------------------------------------------------------------------

    /// Snapshot of the current settings.
    pub fn settings(&self) -> SpeechSettings {
        lock(&self.inner.settings).clone()
    }

    /// Replace the settings; they apply from the next `speak` on.
    pub fn set_settings(&self, settings: SpeechSettings) -> Result<(), SettingsError> {
        settings.validate()?;
        *lock(&self.inner.settings) = settings;
        Ok(())
    }

    pub async fn voices(&self) -> Vec<Voice> {
        self.inner.backend.voices().await
    }

    /// Pick the first voice for `language` when no voice is configured yet.
    ///
    /// Returns the chosen voice id, or `None` if a voice was already set or
    /// none matched.
    pub async fn select_default_voice(&self, language: &str) -> Option<String> {
        if self.settings().voice().is_some() {
            return None;
        }

        let language = language.to_ascii_lowercase();
        let voice = self
            .voices()
            .await
            .into_iter()
            .find(|v| v.language.to_ascii_lowercase().starts_with(&language))?;

        let mut settings = lock(&self.inner.settings);
        // Re-check: the host may have chosen a voice while we listed them.
        if settings.voice().is_some() {
            return None;
        }
        log::info!("speech: default voice set to {} ({})", voice.name, voice.id);
        settings.voice = voice.id.clone();
        Some(voice.id)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
