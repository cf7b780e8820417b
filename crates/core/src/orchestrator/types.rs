//! Types for the orchestrator module.

use thiserror::Error;
use uuid::Uuid;

use crate::encoder::{EncodedImage, EncoderError, OutputFormat};
use crate::upload::ValidationError;

/// A successfully converted file.
#[derive(Debug, Clone)]
pub struct ConversionResult {
    /// Client-supplied file name.
    pub original_name: String,
    /// Fresh unique name with the output extension.
    pub converted_name: String,
    /// Output size in bytes.
    pub size_bytes: usize,
    pub format: OutputFormat,
    pub data: Vec<u8>,
}

impl ConversionResult {
    /// Wraps encoder output under a newly generated name.
    pub fn new(original_name: String, encoded: EncodedImage) -> Self {
        let converted_name = format!("{}.{}", Uuid::new_v4(), encoded.format.extension());
        Self {
            original_name,
            converted_name,
            size_bytes: encoded.len(),
            format: encoded.format,
            data: encoded.data,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }
}

/// Errors for a batch or a single file within it.
#[derive(Debug, Error)]
pub enum BatchError {
    /// The batch was rejected before conversion.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The encoder failed on one file.
    #[error(transparent)]
    Encoding(#[from] EncoderError),

    /// Staged bytes could not be read back.
    #[error("Failed to read staged file {file_name}: {source}")]
    Staging {
        file_name: String,
        #[source]
        source: std::io::Error,
    },

    /// The conversion task panicked or was aborted.
    #[error("Conversion task for {file_name} failed: {reason}")]
    TaskFailed { file_name: String, reason: String },
}

impl BatchError {
    /// Whether the client's input caused this error.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Outcome of one unit of work.
#[derive(Debug)]
pub struct FileOutcome {
    pub original_name: String,
    pub result: Result<ConversionResult, BatchError>,
}

impl FileOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Every file's outcome, in upload order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.len() - self.succeeded()
    }

    /// All results if every file converted, otherwise the first failure in
    /// upload order.
    pub fn into_result(self) -> Result<Vec<ConversionResult>, BatchError> {
        self.outcomes.into_iter().map(|o| o.result).collect()
    }
}
