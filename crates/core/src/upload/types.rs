use std::io;
use std::path::Path;

use tempfile::TempPath;

/// Raw bytes of one upload, persisted in a temporary file.
///
/// Released exactly once: explicitly through [`StagedFile::release`], or on
/// drop if the owner never got that far.
#[derive(Debug)]
pub struct StagedFile {
    path: TempPath,
}

impl StagedFile {
    pub(crate) fn new(path: TempPath) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the staged bytes.
    pub async fn read(&self) -> io::Result<Vec<u8>> {
        tokio::fs::read(&*self.path).await
    }

    /// Deletes the staged file, reporting any error.
    pub fn release(self) -> io::Result<()> {
        self.path.close()
    }
}

/// One file of an upload batch.
#[derive(Debug)]
pub struct UploadedFile {
    /// Client-supplied file name.
    pub original_name: String,
    /// Client-declared content type, unverified.
    pub mime_type: String,
    pub size_bytes: u64,
    pub staged: StagedFile,
}

impl UploadedFile {
    /// Location of the staged bytes.
    pub fn path(&self) -> &Path {
        self.staged.path()
    }

    /// Deletes the staged bytes, logging instead of failing.
    pub fn release(self) {
        let path = self.staged.path().to_path_buf();
        if let Err(e) = self.staged.release() {
            tracing::warn!(
                file = %self.original_name,
                path = %path.display(),
                error = %e,
                "Failed to remove staged file"
            );
        }
    }
}
