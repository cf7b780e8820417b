//! `POST /convert`: multipart batch conversion.

use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Serialize;
use tracing::{debug, info, warn};

use imagepress_core::{BatchError, ConversionResult, UploadedFile};

use super::error::ApiError;
use crate::metrics::{BATCH_FAILURES_TOTAL, BATCH_SIZE, FILES_CONVERTED_TOTAL};
use crate::state::AppState;

/// Multipart field carrying the images.
pub const IMAGES_FIELD: &str = "images";

pub const SUCCESS_MESSAGE: &str = "Conversion successful";

/// One converted file in the response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertedFile {
    pub original_name: String,
    pub converted_name: String,
    pub size: usize,
    /// Base64 of the output bytes.
    pub converted_buffer: String,
    pub mime_type: &'static str,
}

impl From<ConversionResult> for ConvertedFile {
    fn from(result: ConversionResult) -> Self {
        let mime_type = result.mime_type();
        Self {
            original_name: result.original_name,
            converted_name: result.converted_name,
            size: result.size_bytes,
            converted_buffer: STANDARD.encode(&result.data),
            mime_type,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ConvertResponse {
    pub message: &'static str,
    pub files: Vec<ConvertedFile>,
}

/// POST /convert
pub async fn convert(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ConvertResponse>, ApiError> {
    let files = receive_uploads(&state, multipart).await.inspect_err(|e| {
        BATCH_FAILURES_TOTAL.with_label_values(&["upload"]).inc();
        warn!(error = e.message(), "Rejecting upload");
    })?;
    let file_count = files.len();

    let results = state
        .orchestrator()
        .convert_batch(files)
        .await
        .inspect_err(|e| {
            BATCH_FAILURES_TOTAL
                .with_label_values(&[failure_reason(e)])
                .inc();
        })?;

    BATCH_SIZE.observe(file_count as f64);
    for result in &results {
        FILES_CONVERTED_TOTAL
            .with_label_values(&[result.format.extension()])
            .inc();
    }

    // Counting is best effort; a converted batch is still returned.
    if let Err(e) = state.usage().increment_usage(file_count).await {
        warn!(
            store = state.usage().store().name(),
            error = %e,
            "Failed to record usage"
        );
    }

    info!(files = file_count, "Batch converted");

    Ok(Json(ConvertResponse {
        message: SUCCESS_MESSAGE,
        files: results.into_iter().map(ConvertedFile::from).collect(),
    }))
}

/// Streams every `images` part into the staging area.
///
/// On error the parts staged so far are dropped, which removes them.
async fn receive_uploads(
    state: &AppState,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Vec<UploadedFile>, ApiError> {
    let mut multipart = multipart?;
    let max_files = state.config().uploads.max_files;
    let mut files = Vec::new();

    while let Some(mut field) = multipart.next_field().await? {
        if field.name() != Some(IMAGES_FIELD) {
            debug!(field = ?field.name(), "Ignoring multipart field");
            continue;
        }
        if files.len() == max_files {
            return Err(ApiError::BadRequest(format!(
                "Too many files (max {})",
                max_files
            )));
        }

        let original_name = field.file_name().unwrap_or_default().to_string();
        let mime_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();

        let mut writer = state.staging().begin(original_name, mime_type).await?;
        while let Some(chunk) = field.chunk().await? {
            writer.write_chunk(&chunk).await?;
        }
        files.push(writer.finish().await?);
    }

    Ok(files)
}

fn failure_reason(err: &BatchError) -> &'static str {
    match err {
        BatchError::Validation(_) => "validation",
        BatchError::Encoding(_) => "encoding",
        BatchError::Staging { .. } => "staging",
        BatchError::TaskFailed { .. } => "task",
    }
}
