//! Error types for the encoder module.

use thiserror::Error;

/// Errors that can occur while encoding a single file.
#[derive(Debug, Error)]
pub enum EncoderError {
    /// Declared content type has no encoder.
    #[error("Unsupported content type for {file_name}: {mime_type}")]
    UnsupportedType {
        file_name: String,
        mime_type: String,
    },

    /// Input bytes could not be decoded (corrupt or truncated data).
    #[error("Failed to decode {file_name}: {reason}")]
    Decode { file_name: String, reason: String },

    /// Decoded image could not be written in the output format.
    #[error("Failed to encode {file_name}: {reason}")]
    Encode { file_name: String, reason: String },
}

impl EncoderError {
    /// Creates a new decode error.
    pub fn decode(file_name: &str, reason: impl ToString) -> Self {
        Self::Decode {
            file_name: file_name.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Creates a new encode error.
    pub fn encode(file_name: &str, reason: impl ToString) -> Self {
        Self::Encode {
            file_name: file_name.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Name of the uploaded file this error belongs to.
    pub fn file_name(&self) -> &str {
        match self {
            Self::UnsupportedType { file_name, .. }
            | Self::Decode { file_name, .. }
            | Self::Encode { file_name, .. } => file_name,
        }
    }
}
