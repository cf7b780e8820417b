//! Conversion orchestrator.
//!
//! Validates a batch, converts every file concurrently (one task per file)
//! and joins the outcomes back in upload order. Each task removes its own
//! staged file before it finishes, whatever the encoder returned.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use imagepress_core::{ConversionOrchestrator, StandardEncoder};
//!
//! let orchestrator = ConversionOrchestrator::new(Arc::new(StandardEncoder::default()));
//! let results = orchestrator.convert_batch(uploaded_files).await?;
//! for result in &results {
//!     println!("{} -> {}", result.original_name, result.converted_name);
//! }
//! ```

mod runner;
mod types;

pub use runner::ConversionOrchestrator;
pub use types::{BatchError, BatchReport, ConversionResult, FileOutcome};
