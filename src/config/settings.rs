//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across tasks.
//! Every section is `#[serde(default)]`, so a partial file fills the gaps
//! with defaults.

use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;
use crate::intake::DetailLevel;
use crate::speech::{SettingsError, SpeechSettings};

// ---------------------------------------------------------------------------
// VisionConfig
// ---------------------------------------------------------------------------

/// Connection settings for the vision-language service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionConfig {
    /// Base URL of the API, without the `/v1beta/...` path.
    pub base_url: String,
    /// Model identifier (e.g. `"gemini-2.5-flash"`).
    pub model: String,
    /// API key. `None` falls back to the `GEMINI_API_KEY` environment
    /// variable at startup.
    pub api_key: Option<String>,
    /// Maximum seconds to wait for one description.
    pub timeout_secs: u64,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".into(),
            model: "gemini-2.5-flash".into(),
            api_key: None,
            timeout_secs: 60,
        }
    }
}

// ---------------------------------------------------------------------------
// SpeechConfig
// ---------------------------------------------------------------------------

/// Speech-synthesis backend selection and voice parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Synthesizer program name or path. `None` probes for `espeak-ng`, then
    /// `espeak`.
    pub program: Option<String>,
    /// Rate, pitch, volume and voice.
    pub settings: SpeechSettings,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            program: None,
            settings: SpeechSettings::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// DescriptionConfig
// ---------------------------------------------------------------------------

/// How descriptions are requested and announced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DescriptionConfig {
    /// Verbosity of new descriptions.
    pub detail_level: DetailLevel,
    /// Language of instructions and announcements (`"en"` or `"fr"`).
    pub language: String,
    /// Pause between a description arriving and it being read out, so it
    /// does not collide with the "analysis in progress" announcement.
    pub result_delay_ms: u64,
}

impl Default for DescriptionConfig {
    fn default() -> Self {
        Self {
            detail_level: DetailLevel::default(),
            language: "en".into(),
            result_delay_ms: 500,
        }
    }
}

impl DescriptionConfig {
    pub fn result_delay(&self) -> Duration {
        Duration::from_millis(self.result_delay_ms)
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use image_narrator::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Vision service connection.
    pub vision: VisionConfig,
    /// Speech backend and voice parameters.
    pub speech: SpeechConfig,
    /// Description detail level, language and pacing.
    pub description: DescriptionConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("config: {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject values the UI should never have let through.
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.speech.settings.validate()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
