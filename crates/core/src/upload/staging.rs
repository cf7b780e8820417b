//! Streaming uploaded parts into temporary files.

use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;

use super::error::StagingError;
use super::types::{StagedFile, UploadedFile};
use crate::config::UploadConfig;

/// Directory plus size limit that uploads are staged under.
#[derive(Debug, Clone)]
pub struct StagingArea {
    dir: PathBuf,
    max_file_size_bytes: u64,
}

impl StagingArea {
    pub fn new(dir: impl Into<PathBuf>, max_file_size_bytes: u64) -> Self {
        Self {
            dir: dir.into(),
            max_file_size_bytes,
        }
    }

    pub fn from_config(config: &UploadConfig) -> Self {
        Self::new(config.staging_dir.clone(), config.max_file_size_bytes)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_bytes
    }

    /// Opens a new staged file for an incoming part.
    pub async fn begin(
        &self,
        original_name: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Result<StagingWriter, StagingError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let (file, path) = tempfile::Builder::new()
            .prefix("upload-")
            .tempfile_in(&self.dir)?
            .into_parts();

        Ok(StagingWriter {
            original_name: original_name.into(),
            mime_type: mime_type.into(),
            limit_bytes: self.max_file_size_bytes,
            written: 0,
            file: tokio::fs::File::from_std(file),
            staged: StagedFile::new(path),
        })
    }

    /// Stages an in-memory buffer in one step.
    pub async fn stage_bytes(
        &self,
        original_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: &[u8],
    ) -> Result<UploadedFile, StagingError> {
        let mut writer = self.begin(original_name, mime_type).await?;
        writer.write_chunk(bytes).await?;
        writer.finish().await
    }
}

/// An in-progress staged file. Dropping it before [`finish`](Self::finish)
/// removes the partial file.
#[derive(Debug)]
pub struct StagingWriter {
    original_name: String,
    mime_type: String,
    limit_bytes: u64,
    written: u64,
    file: tokio::fs::File,
    staged: StagedFile,
}

impl StagingWriter {
    /// Appends a chunk, failing once the per-file limit is exceeded.
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> Result<(), StagingError> {
        self.written += chunk.len() as u64;
        if self.written > self.limit_bytes {
            return Err(StagingError::TooLarge {
                file_name: self.original_name.clone(),
                limit_bytes: self.limit_bytes,
            });
        }
        self.file.write_all(chunk).await?;
        Ok(())
    }

    pub fn bytes_written(&self) -> u64 {
        self.written
    }

    /// Flushes the staged file and hands it over as an [`UploadedFile`].
    pub async fn finish(mut self) -> Result<UploadedFile, StagingError> {
        self.file.flush().await?;
        Ok(UploadedFile {
            original_name: self.original_name,
            mime_type: self.mime_type,
            size_bytes: self.written,
            staged: self.staged,
        })
    }
}
