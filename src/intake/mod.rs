//! File intake — validation and request encoding for submitted images.
//!
//! This module provides:
//! * [`ImageFile`] — a submitted file: name, declared media type and bytes.
//! * [`validate`] / [`validate_file`] — the format and size gate run before
//!   any record is created.
//! * [`encode`] / [`EncodedRequest`] — base64 packaging plus the instruction
//!   and output budget for a [`DetailLevel`].
//!
//! # Quick start
//!
//! ```rust
//! use image_narrator::intake::{encode, validate_file, DetailLevel, ImageFile};
//!
//! let file = ImageFile::new("photo.png", "image/png", vec![0x89, b'P', b'N', b'G']);
//! validate_file(&file).unwrap();
//!
//! let request = encode(&file.bytes, &file.media_type, DetailLevel::Brief, "en");
//! assert_eq!(request.max_output_tokens, 200);
//! ```

pub mod encoder;
pub mod prompt;
pub mod validator;

use std::path::Path;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use encoder::{encode, DetailLevel, EncodedRequest};
pub use prompt::PromptBuilder;
pub use validator::{
    validate, validate_file, ValidationError, ALLOWED_MEDIA_TYPES, MAX_FILE_SIZE,
};

// ---------------------------------------------------------------------------
// ImageFile
// ---------------------------------------------------------------------------

/// A candidate file handed to the pipeline by the host UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    /// Original file name, kept verbatim on the resulting record.
    pub name: String,
    /// Declared media type (e.g. `"image/png"`).
    pub media_type: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Size of the file in bytes.
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Read a file from disk, inferring the media type from its extension.
    ///
    /// Unknown extensions map to `application/octet-stream`, which the
    /// validator rejects.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(name, media_type_for_path(path), bytes))
    }
}

/// Guess a media type from a path's extension.
pub fn media_type_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
