//! Voice, rate, pitch and volume applied to each utterance.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Accepted speaking-rate multipliers.
pub const RATE_RANGE: RangeInclusive<f32> = 0.5..=2.0;
/// Accepted pitch multipliers.
pub const PITCH_RANGE: RangeInclusive<f32> = 0.0..=2.0;
/// Accepted volume levels.
pub const VOLUME_RANGE: RangeInclusive<f32> = 0.0..=1.0;

// ---------------------------------------------------------------------------
// SettingsError
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
}

// ---------------------------------------------------------------------------
// SpeechSettings
// ---------------------------------------------------------------------------

/// Synthesis parameters, read by the controller each time it speaks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechSettings {
    /// Speaking-rate multiplier, see [`RATE_RANGE`].
    pub rate: f32,
    /// Pitch multiplier, see [`PITCH_RANGE`].
    pub pitch: f32,
    /// Output volume, see [`VOLUME_RANGE`].
    pub volume: f32,
    /// Backend voice identifier; empty means the backend default.
    pub voice: String,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            rate: 1.0,
            pitch: 1.0,
            volume: 1.0,
            voice: String::new(),
        }
    }
}

impl SpeechSettings {
    /// Check every numeric field against its range. NaN is always rejected.
    ///
    /// ```
    /// use image_narrator::speech::SpeechSettings;
    ///
    /// assert!(SpeechSettings::default().validate().is_ok());
    ///
    /// let too_fast = SpeechSettings { rate: 3.0, ..SpeechSettings::default() };
    /// assert!(too_fast.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), SettingsError> {
        check("rate", self.rate, &RATE_RANGE)?;
        check("pitch", self.pitch, &PITCH_RANGE)?;
        check("volume", self.volume, &VOLUME_RANGE)?;
        Ok(())
    }

    /// The voice to request, or `None` for the backend default.
    pub fn voice(&self) -> Option<&str> {
        let voice = self.voice.trim();
        (!voice.is_empty()).then_some(voice)
    }
}

fn check(field: &'static str, value: f32, range: &RangeInclusive<f32>) -> Result<(), SettingsError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(SettingsError::OutOfRange {
            field,
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_neutral() {
        let s = SpeechSettings::default();
        assert_eq!(s.rate, 1.0);
        assert_eq!(s.pitch, 1.0);
        assert_eq!(s.volume, 1.0);
        assert!(s.voice().is_none());
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let low = SpeechSettings {
            rate: 0.5,
            pitch: 0.0,
            volume: 0.0,
            voice: String::new(),
        };
        let high = SpeechSettings {
            rate: 2.0,
            pitch: 2.0,
            volume: 1.0,
            voice: String::new(),
        };
        assert!(low.validate().is_ok());
        assert!(high.validate().is_ok());
    }

    #[test]
    fn reports_the_offending_field() {
        let s = SpeechSettings {
            volume: 1.5,
            ..SpeechSettings::default()
        };
        assert_eq!(
            s.validate(),
            Err(SettingsError::OutOfRange {
                field: "volume",
                value: 1.5,
                min: 0.0,
                max: 1.0
            })
        );
    }

    #[test]
    fn rejects_slow_rate_and_nan_pitch() {
        let slow = SpeechSettings {
            rate: 0.4,
            ..SpeechSettings::default()
        };
        assert!(matches!(
            slow.validate(),
            Err(SettingsError::OutOfRange { field: "rate", .. })
        ));

        let nan = SpeechSettings {
            pitch: f32::NAN,
            ..SpeechSettings::default()
        };
        assert!(matches!(
            nan.validate(),
            Err(SettingsError::OutOfRange { field: "pitch", .. })
        ));
    }

    #[test]
    fn blank_voice_means_default() {
        let s = SpeechSettings {
            voice: "  ".into(),
            ..SpeechSettings::default()
        };
        assert!(s.voice().is_none());

        let s = SpeechSettings {
            voice: "fr-fr".into(),
            ..SpeechSettings::default()
        };
        assert_eq!(s.voice(), Some("fr-fr"));
    }

    #[test]
    fn missing_fields_deserialize_to_defaults() {
        let s: SpeechSettings = toml::from_str("rate = 1.5").unwrap();
        assert_eq!(s.rate, 1.5);
        assert_eq!(s.volume, 1.0);
    }
}
