//! Uploaded files: staging to disk and batch validation.
//!
//! Every uploaded part is written to its own temporary file under the
//! staging directory. The file is removed when the [`StagedFile`] is
//! released or dropped, whichever comes first.

mod error;
mod staging;
mod types;
mod validator;

pub use error::{StagingError, ValidationError};
pub use staging::{StagingArea, StagingWriter};
pub use types::{StagedFile, UploadedFile};
pub use validator::validate_batch;
