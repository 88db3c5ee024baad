//! Spoken output — one utterance at a time.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                 SpeechController                     │
//! │   settings ──snapshot──▶ Utterance                   │
//! │   active: Option<(UtteranceId, JoinHandle)>          │
//! │   state:  watch<Idle | Speaking>                     │
//! │                        │                             │
//! │                        ▼                             │
//! │           Arc<dyn SpeechBackend>                     │
//! │        ┌───────────────┴──────────────┐              │
//! │   EspeakBackend                 SilentBackend        │
//! │   (espeak-ng process)           (unsupported)        │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use image_narrator::config::AppConfig;
//! use image_narrator::speech::{EspeakBackend, SpeechController};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let backend = Arc::new(EspeakBackend::from_config(&config.speech));
//!     let speech = SpeechController::new(backend, config.speech.settings.clone());
//!
//!     speech.speak("Hello.");
//!     let mut state = speech.subscribe();
//!     let _ = state.wait_for(|s| !matches!(s, image_narrator::speech::SpeechState::Speaking)).await;
//! }
//! ```

pub mod backend;
pub mod controller;
pub mod espeak;
pub mod settings;

// ── Public re-exports ──────────────────────────────────────────────────────

pub use backend::{SilentBackend, SpeechBackend, SpeechError, Utterance, UtteranceId, Voice};
pub use controller::{SpeechController, SpeechState};
pub use espeak::EspeakBackend;
pub use settings::{SettingsError, SpeechSettings, PITCH_RANGE, RATE_RANGE, VOLUME_RANGE};

#[cfg(test)]
pub use backend::MockSpeechBackend;
