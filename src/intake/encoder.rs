//! Request encoding — packages image bytes for the vision service.
//!
//! The bytes are base64-encoded (standard alphabet, padded) and paired with
//! the instruction and output budget of the selected [`DetailLevel`].

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use super::prompt::PromptBuilder;

// ---------------------------------------------------------------------------
// DetailLevel
// ---------------------------------------------------------------------------

/// User-selected verbosity of generated descriptions.
///
/// | Variant  | Output budget (tokens) |
/// |----------|------------------------|
/// | Brief    | 200                    |
/// | Moderate | 500                    |
/// | Detailed | 1000                   |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailLevel {
    Brief,
    #[default]
    Moderate,
    Detailed,
}

impl DetailLevel {
    pub const ALL: [DetailLevel; 3] = [Self::Brief, Self::Moderate, Self::Detailed];

    /// Generation-length budget sent to the vision service.
    ///
    /// ```
    /// use image_narrator::intake::DetailLevel;
    ///
    /// assert_eq!(DetailLevel::Brief.max_output_tokens(), 200);
    /// assert_eq!(DetailLevel::Moderate.max_output_tokens(), 500);
    /// assert_eq!(DetailLevel::Detailed.max_output_tokens(), 1000);
    /// ```
    pub fn max_output_tokens(self) -> u32 {
        match self {
            Self::Brief => 200,
            Self::Moderate => 500,
            Self::Detailed => 1000,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Brief => "Brief",
            Self::Moderate => "Moderate",
            Self::Detailed => "Detailed",
        }
    }
}

// ---------------------------------------------------------------------------
// EncodedRequest
// ---------------------------------------------------------------------------

/// Transport-ready packaging of one description request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedRequest {
    /// Declared media type of the image.
    pub media_type: String,
    /// Image bytes, standard base64.
    pub data: String,
    /// What the service is asked to do with the image.
    pub instruction: String,
    /// Upper bound on the generated description length.
    pub max_output_tokens: u32,
}

impl EncodedRequest {
    /// Decode [`data`](Self::data) back into the original bytes.
    pub fn decode_data(&self) -> Result<Vec<u8>, base64::DecodeError> {
        BASE64.decode(&self.data)
    }
}

// ---------------------------------------------------------------------------
// encode
// ---------------------------------------------------------------------------

/// Build the request for `bytes` at the given detail level.
///
/// Deterministic and free of I/O; `language` selects the instruction
/// phrasing (see [`PromptBuilder`]).
pub fn encode(bytes: &[u8], media_type: &str, level: DetailLevel, language: &str) -> EncodedRequest {
    EncodedRequest {
        media_type: media_type.trim().to_ascii_lowercase(),
        data: BASE64.encode(bytes),
        instruction: PromptBuilder::new(language).instruction(level).to_string(),
        max_output_tokens: level.max_output_tokens(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
