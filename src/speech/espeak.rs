//! Local synthesis through the `espeak-ng` (or legacy `espeak`) command.
//!
//! Each utterance runs one child process fed through stdin. The child is
//! spawned with `kill_on_drop`, so cancelling the utterance future stops the
//! audio at once.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::config::SpeechConfig;

use super::backend::{SpeechBackend, SpeechError, Utterance, Voice};

/// Programs probed on `PATH`, in order, when none is configured.
pub const CANDIDATE_PROGRAMS: [&str; 2] = ["espeak-ng", "espeak"];

/// espeak words-per-minute at rate 1.0.
const BASE_WPM: f32 = 175.0;

// ---------------------------------------------------------------------------
// EspeakBackend
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct EspeakBackend {
    program: Option<PathBuf>,
}

impl EspeakBackend {
    /// Locate the first of [`CANDIDATE_PROGRAMS`] on `PATH`.
    pub fn detect() -> Self {
        let program = CANDIDATE_PROGRAMS
            .iter()
            .find_map(|name| which::which(name).ok());

        match &program {
            Some(path) => log::info!("speech: using {}", path.display()),
            None => log::info!("speech: no espeak binary found, audio disabled"),
        }

        Self { program }
    }

    /// Use a specific program name or path.
    pub fn with_program(program: &str) -> Self {
        let program = which::which(program).ok();
        if program.is_none() {
            log::warn!("speech: configured synthesizer not found, audio disabled");
        }
        Self { program }
    }

    pub fn from_config(config: &SpeechConfig) -> Self {
        match config.program.as_deref().map(str::trim) {
            Some(program) if !program.is_empty() => Self::with_program(program),
            _ => Self::detect(),
        }
    }

    /// Resolved synthesizer path, if any.
    pub fn program(&self) -> Option<&Path> {
        self.program.as_deref()
    }
}

#[async_trait]
impl SpeechBackend for EspeakBackend {
    fn is_supported(&self) -> bool {
        self.program.is_some()
    }

    async fn voices(&self) -> Vec<Voice> {
        let Some(program) = &self.program else {
            return Vec::new();
        };

        match Command::new(program).arg("--voices").output().await {
            Ok(output) if output.status.success() => {
                parse_voices(&String::from_utf8_lossy(&output.stdout))
            }
            Ok(output) => {
                log::warn!("speech: --voices exited with {}", output.status);
                Vec::new()
            }
            Err(e) => {
                log::warn!("speech: failed to list voices: {e}");
                Vec::new()
            }
        }
    }

    async fn utter(&self, utterance: &Utterance) -> Result<(), SpeechError> {
        let program = self.program.as_ref().ok_or(SpeechError::Unsupported)?;

        let mut child = Command::new(program)
            .args(build_args(utterance))
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| SpeechError::Spawn(e.to_string()))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(utterance.text.as_bytes())
                .await
                .map_err(|e| SpeechError::Failed(e.to_string()))?;
            // stdin dropped here so espeak sees EOF
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| SpeechError::Failed(e.to_string()))?;

        if output.status.success() {
            Ok(())
        } else {
            Err(SpeechError::Failed(format!(
                "{}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )))
        }
    }
}

// ---------------------------------------------------------------------------
// Argument mapping
// ---------------------------------------------------------------------------

/// Command-line arguments for one utterance; the text itself goes to stdin.
///
/// | Setting | Flag | Mapping                       |
/// |---------|------|-------------------------------|
/// | rate    | `-s` | 175 wpm × rate (80..=450)     |
/// | pitch   | `-p` | 50 × pitch (0..=99)           |
/// | volume  | `-a` | 100 × volume (0..=100)        |
/// | voice   | `-v` | passed through when set       |
pub fn build_args(utterance: &Utterance) -> Vec<String> {
    let wpm = (BASE_WPM * utterance.rate).round().clamp(80.0, 450.0) as u32;
    let pitch = (50.0 * utterance.pitch).round().clamp(0.0, 99.0) as u32;
    let amplitude = (100.0 * utterance.volume).round().clamp(0.0, 100.0) as u32;

    let mut args = vec![
        "-s".to_string(),
        wpm.to_string(),
        "-p".to_string(),
        pitch.to_string(),
        "-a".to_string(),
        amplitude.to_string(),
    ];
    if let Some(voice) = &utterance.voice {
        args.push("-v".to_string());
        args.push(voice.clone());
    }
    args.push("--stdin".to_string());
    args
}

/// Parse `espeak --voices` output.
///
/// ```text
/// Pty Language       Age/Gender VoiceName          File                 Other Languages
///  5  af              --/M      Afrikaans          gmw/af
///  5  fr-fr           --/M      French_(France)    roa/fr               (fr 5)
/// ```
pub fn parse_voices(output: &str) -> Vec<Voice> {
    output
        .lines()
        .skip_while(|line| !line.trim_start().starts_with("Pty"))
        .skip(1)
        .filter_map(|line| {
            let mut cols = line.split_whitespace();
            let _priority = cols.next()?;
            let language = cols.next()?;
            let _age_gender = cols.next()?;
            let name = cols.next()?;
            Some(Voice {
                id: language.to_string(),
                name: name.replace('_', " "),
                language: language.to_string(),
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
