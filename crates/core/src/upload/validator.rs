//! Batch validation against the content-type allow-list.

use super::error::ValidationError;
use super::types::UploadedFile;
use crate::encoder::ImageKind;

/// Checks every declared content type in the batch.
///
/// Returns the parsed kind of each file, in upload order, or rejects the
/// whole batch. Pure: no I/O, staged files are left untouched.
pub fn validate_batch(files: &[UploadedFile]) -> Result<Vec<ImageKind>, ValidationError> {
    validate_mime_types(files.iter().map(|f| f.mime_type.as_str()))
}

/// Same as [`validate_batch`] over bare content types.
pub(crate) fn validate_mime_types<'a>(
    mime_types: impl IntoIterator<Item = &'a str>,
) -> Result<Vec<ImageKind>, ValidationError> {
    let mut kinds = Vec::new();
    let mut offending: Vec<String> = Vec::new();

    for mime_type in mime_types {
        match ImageKind::from_mime(mime_type) {
            Some(kind) => kinds.push(kind),
            None => {
                if !offending.iter().any(|m| m == mime_type) {
                    offending.push(mime_type.to_string());
                }
            }
        }
    }

    if !offending.is_empty() {
        return Err(ValidationError::UnsupportedTypes(offending));
    }
    if kinds.is_empty() {
        return Err(ValidationError::EmptyBatch);
    }

    Ok(kinds)
}
