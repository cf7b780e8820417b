//! Conversion orchestrator implementation.
//!
//! One batch is a fixed fan-out: a tokio task per file, each decoding and
//! encoding on the blocking pool, joined in upload order. There is no
//! cancellation: a failing file never stops its siblings.

use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use tokio::task::JoinError;
use tracing::{debug, info, warn};

use crate::encoder::{ImageEncoder, ImageKind};
use crate::upload::{validate_batch, UploadedFile, ValidationError};

use super::types::{BatchError, BatchReport, ConversionResult, FileOutcome};

/// Coordinates concurrent conversion of an uploaded batch.
#[derive(Clone)]
pub struct ConversionOrchestrator {
    encoder: Arc<dyn ImageEncoder>,
}

impl ConversionOrchestrator {
    pub fn new(encoder: Arc<dyn ImageEncoder>) -> Self {
        Self { encoder }
    }

    pub fn encoder(&self) -> &dyn ImageEncoder {
        self.encoder.as_ref()
    }

    /// Converts a batch, all or nothing.
    ///
    /// Every file is attempted and every staged file is removed before this
    /// returns; on failure the first error in upload order is reported.
    pub async fn convert_batch(
        &self,
        files: Vec<UploadedFile>,
    ) -> Result<Vec<ConversionResult>, BatchError> {
        self.run_batch(files).await?.into_result()
    }

    /// Converts a batch and reports each file's outcome.
    ///
    /// A rejected batch releases all staged files without encoding any of
    /// them.
    pub async fn run_batch(&self, files: Vec<UploadedFile>) -> Result<BatchReport, ValidationError> {
        let kinds = match validate_batch(&files) {
            Ok(kinds) => kinds,
            Err(e) => {
                warn!(files = files.len(), error = %e, "Rejecting upload batch");
                files.into_iter().for_each(UploadedFile::release);
                return Err(e);
            }
        };

        let started = Instant::now();
        info!(files = files.len(), encoder = self.encoder.name(), "Converting batch");

        let (names, units): (Vec<String>, Vec<_>) = files
            .into_iter()
            .zip(kinds)
            .map(|(file, kind)| {
                let name = file.original_name.clone();
                let unit = tokio::spawn(convert_file(Arc::clone(&self.encoder), file, kind));
                (name, unit)
            })
            .unzip();

        let outcomes: Vec<FileOutcome> = names
            .into_iter()
            .zip(join_all(units).await)
            .map(|(original_name, joined)| {
                let result = joined.unwrap_or_else(|e| Err(task_failed(&original_name, e)));
                if let Err(ref e) = result {
                    warn!(file = %original_name, error = %e, "File conversion failed");
                }
                FileOutcome {
                    original_name,
                    result,
                }
            })
            .collect();

        let report = BatchReport { outcomes };
        info!(
            files = report.len(),
            succeeded = report.succeeded(),
            failed = report.failed(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Batch finished"
        );

        Ok(report)
    }
}

/// One unit of work: read, encode, then release the staged file no matter
/// what the encoder did.
async fn convert_file(
    encoder: Arc<dyn ImageEncoder>,
    file: UploadedFile,
    kind: ImageKind,
) -> Result<ConversionResult, BatchError> {
    let outcome = encode_staged(encoder, &file, kind).await;
    let original_name = file.original_name.clone();
    file.release();
    debug!(file = %original_name, "Released staged file");

    outcome.map(|encoded| ConversionResult::new(original_name, encoded))
}

async fn encode_staged(
    encoder: Arc<dyn ImageEncoder>,
    file: &UploadedFile,
    kind: ImageKind,
) -> Result<crate::encoder::EncodedImage, BatchError> {
    let bytes = file.staged.read().await.map_err(|source| BatchError::Staging {
        file_name: file.original_name.clone(),
        source,
    })?;

    let file_name = file.original_name.clone();
    let encoded = tokio::task::spawn_blocking(move || encoder.encode(&file_name, &bytes, kind))
        .await
        .map_err(|e| task_failed(&file.original_name, e))??;

    Ok(encoded)
}

fn task_failed(file_name: &str, error: JoinError) -> BatchError {
    let reason = if error.is_panic() {
        "encoder panicked".to_string()
    } else {
        error.to_string()
    };
    BatchError::TaskFailed {
        file_name: file_name.to_string(),
        reason,
    }
}
