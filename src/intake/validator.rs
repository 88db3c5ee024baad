//! Format and size gate for submitted files.
//!
//! Runs before the pipeline creates a record; a rejected file never enters
//! the record collection.

use thiserror::Error;

use super::ImageFile;

/// Media types the vision service accepts.
pub const ALLOWED_MEDIA_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Largest accepted file: 10 MiB.
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

// ---------------------------------------------------------------------------
// ValidationError
// ---------------------------------------------------------------------------

/// Reasons a file is turned away before processing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The declared media type is not in [`ALLOWED_MEDIA_TYPES`].
    #[error("unsupported file type '{media_type}': expected JPEG, PNG, GIF or WebP")]
    UnsupportedType { media_type: String },

    /// The file is larger than [`MAX_FILE_SIZE`].
    #[error("file too large: {size} bytes (maximum {max} bytes)")]
    TooLarge { size: u64, max: u64 },
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

/// Accept or reject a file by declared media type and byte size.
///
/// The type check runs first, so an oversized PDF reports
/// [`ValidationError::UnsupportedType`].
///
/// ```
/// use image_narrator::intake::{validate, ValidationError, MAX_FILE_SIZE};
///
/// assert!(validate("image/png", 1024).is_ok());
/// assert!(matches!(
///     validate("application/pdf", 1024),
///     Err(ValidationError::UnsupportedType { .. })
/// ));
/// assert!(matches!(
///     validate("image/png", MAX_FILE_SIZE + 1),
///     Err(ValidationError::TooLarge { .. })
/// ));
/// ```
pub fn validate(media_type: &str, size: u64) -> Result<(), ValidationError> {
    let normalized = media_type.trim();
    if !ALLOWED_MEDIA_TYPES
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(normalized))
    {
        return Err(ValidationError::UnsupportedType {
            media_type: media_type.to_string(),
        });
    }

    if size > MAX_FILE_SIZE {
        return Err(ValidationError::TooLarge {
            size,
            max: MAX_FILE_SIZE,
        });
    }

    Ok(())
}

/// [`validate`] applied to an [`ImageFile`].
pub fn validate_file(file: &ImageFile) -> Result<(), ValidationError> {
    validate(&file.media_type, file.size())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
