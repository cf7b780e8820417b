//! Error types for the upload module.

use thiserror::Error;

/// A batch was rejected before any encoding started.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The request carried no files.
    #[error("No files uploaded")]
    EmptyBatch,

    /// One or more files declared a content type outside the allow-list.
    /// Holds each offending type once, in upload order.
    #[error("Unsupported file type(s): {}", .0.join(", "))]
    UnsupportedTypes(Vec<String>),
}

/// Errors while staging an uploaded part.
#[derive(Debug, Error)]
pub enum StagingError {
    /// The part grew past the per-file limit.
    #[error("File {file_name} exceeds the maximum size of {limit_bytes} bytes")]
    TooLarge { file_name: String, limit_bytes: u64 },

    /// I/O error while writing the staged file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
