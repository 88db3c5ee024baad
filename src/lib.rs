//! image-narrator — spoken descriptions of images for blind and
//! visually-impaired users.
//!
//! A host UI hands files to [`pipeline::DescriptionPipeline`], which
//! validates them, asks a vision-language service for a description and
//! reads the result aloud, one utterance at a time.
//!
//! # Modules
//!
//! * [`intake`]   — file validation and request encoding.
//! * [`vision`]   — the description service trait and the Gemini backend.
//! * [`speech`]   — speech controller, settings and synthesis backends.
//! * [`pipeline`] — records and the orchestrator tying it all together.
//! * [`config`]   — TOML settings and platform paths.

pub mod config;
pub mod intake;
pub mod pipeline;
pub mod speech;
pub mod vision;

use std::sync::{Mutex, MutexGuard, PoisonError};

pub use config::AppConfig;
pub use intake::{DetailLevel, ImageFile, ValidationError};
pub use pipeline::{DescriptionPipeline, DescriptionRecord, RecordId, RecordStatus, Submission};
pub use speech::{SpeechController, SpeechSettings, SpeechState};
pub use vision::{DescribeError, DescriptionService};

/// Install `env_logger` for the host process.
///
/// Filter defaults to `info` and can be overridden with `RUST_LOG`. Calling
/// it more than once is harmless.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

/// Lock a std mutex, recovering the guard if a holder panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_logging_twice_is_fine() {
        init_logging();
        init_logging();
    }

    #[test]
    fn lock_recovers_from_poison() {
        let mutex = std::sync::Arc::new(Mutex::new(1));
        let poisoner = std::sync::Arc::clone(&mutex);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.lock().unwrap();
            panic!("poison");
        })
        .join();

        assert!(mutex.is_poisoned());
        *lock(&mutex) += 1;
        assert_eq!(*lock(&mutex), 2);
    }
}
