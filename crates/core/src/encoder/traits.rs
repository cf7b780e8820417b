//! Trait definitions for the encoder module.

use super::error::EncoderError;
use super::types::{EncodedImage, ImageKind};

/// An encoder that transcodes one uploaded image into its target format.
///
/// Encoding is CPU-bound and synchronous; callers on an async runtime are
/// expected to run it on a blocking thread.
pub trait ImageEncoder: Send + Sync {
    /// Returns the name of this encoder implementation.
    fn name(&self) -> &str;

    /// Encodes `input` according to its kind.
    fn encode(
        &self,
        file_name: &str,
        input: &[u8],
        kind: ImageKind,
    ) -> Result<EncodedImage, EncoderError>;

    /// Encodes `input` according to a declared content type.
    ///
    /// Content types outside the allow-list fail with
    /// [`EncoderError::UnsupportedType`].
    fn encode_mime(
        &self,
        file_name: &str,
        input: &[u8],
        mime_type: &str,
    ) -> Result<EncodedImage, EncoderError> {
        match ImageKind::from_mime(mime_type) {
            Some(kind) => self.encode(file_name, input, kind),
            None => Err(EncoderError::UnsupportedType {
                file_name: file_name.to_string(),
                mime_type: mime_type.to_string(),
            }),
        }
    }
}
