//! Batch lifecycle integration tests.
//!
//! These tests run whole batches through the orchestrator with the real
//! encoders and a SQLite counter store:
//! - Mixed-format batches and upload-order preservation
//! - Staged file cleanup on success, rejection and encoder failure
//! - Counter updates only after fully successful batches

use std::sync::Arc;

use tempfile::TempDir;

use imagepress_core::{
    testing::fixtures, BatchError, ConversionOrchestrator, EncoderConfig, OutputFormat,
    SqliteCounterStore, StagingArea, StandardEncoder, UploadedFile, UsageCounters,
    ValidationError,
};

/// Test helper wiring an orchestrator, staging area and counters together.
struct TestHarness {
    orchestrator: ConversionOrchestrator,
    staging: StagingArea,
    counters: UsageCounters,
    staging_dir: TempDir,
}

impl TestHarness {
    fn new() -> Self {
        let staging_dir = TempDir::new().expect("Failed to create staging dir");
        let staging = StagingArea::new(staging_dir.path(), 10 * 1024 * 1024);
        let encoder = Arc::new(StandardEncoder::new(EncoderConfig::default()));
        let store = Arc::new(SqliteCounterStore::in_memory().expect("Failed to open store"));

        Self {
            orchestrator: ConversionOrchestrator::new(encoder),
            staging,
            counters: UsageCounters::new(store),
            staging_dir,
        }
    }

    async fn stage(&self, name: &str, mime: &str, bytes: &[u8]) -> UploadedFile {
        self.staging
            .stage_bytes(name, mime, bytes)
            .await
            .expect("Failed to stage file")
    }

    fn staged_files(&self) -> usize {
        std::fs::read_dir(self.staging_dir.path())
            .expect("Failed to list staging dir")
            .count()
    }

    /// Mirrors the request flow: convert, then count only on success.
    async fn convert_and_count(
        &self,
        files: Vec<UploadedFile>,
    ) -> Result<Vec<imagepress_core::ConversionResult>, BatchError> {
        let results = self.orchestrator.convert_batch(files).await?;
        self.counters
            .increment_usage(results.len())
            .await
            .expect("Failed to increment counters");
        Ok(results)
    }
}

#[tokio::test]
async fn test_png_and_jpeg_convert_to_webp_and_count() {
    let harness = TestHarness::new();
    let before = harness.counters.read_totals().await;
    assert_eq!(before.total_requests, None);

    let files = vec![
        harness
            .stage("photo.png", "image/png", &fixtures::png_bytes(160, 120))
            .await,
        harness
            .stage("photo.jpg", "image/jpeg", &fixtures::jpeg_bytes(120, 90))
            .await,
    ];

    let results = harness.convert_and_count(files).await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].original_name, "photo.png");
    assert_eq!(results[1].original_name, "photo.jpg");
    for result in &results {
        assert_eq!(result.mime_type(), "image/webp");
        assert!(result.converted_name.ends_with(".webp"));
        assert_eq!(result.size_bytes, result.data.len());
    }
    assert_ne!(results[0].converted_name, results[1].converted_name);

    let after = harness.counters.read_totals().await;
    assert_eq!(after.total_requests, Some(1));
    assert_eq!(after.total_files_transformed, Some(2));
    assert_eq!(harness.staged_files(), 0);
}

#[tokio::test]
async fn test_mixed_batch_preserves_order_and_formats() {
    let harness = TestHarness::new();
    let svg = fixtures::svg_bytes();

    let files = vec![
        harness
            .stage("anim.gif", "image/gif", &fixtures::animated_gif_bytes(3, 16, 16))
            .await,
        harness.stage("logo.svg", "image/svg+xml", &svg).await,
        harness
            .stage("pic.jpg", "image/jpg", &fixtures::jpeg_bytes(16, 16))
            .await,
    ];

    let results = harness.orchestrator.convert_batch(files).await.unwrap();

    let formats: Vec<_> = results.iter().map(|r| r.format).collect();
    assert_eq!(
        formats,
        vec![OutputFormat::Gif, OutputFormat::Svg, OutputFormat::Webp]
    );
    assert!(results[1].size_bytes <= svg.len());
    assert_eq!(harness.staged_files(), 0);
}

#[tokio::test]
async fn test_disallowed_type_rejects_batch_without_counting() {
    let harness = TestHarness::new();

    let files = vec![
        harness
            .stage("ok.png", "image/png", &fixtures::png_bytes(8, 8))
            .await,
        harness.stage("legacy.bmp", "image/bmp", b"BM....").await,
    ];

    let err = harness.convert_and_count(files).await.unwrap_err();
    match err {
        BatchError::Validation(ValidationError::UnsupportedTypes(types)) => {
            assert_eq!(types, vec!["image/bmp".to_string()]);
        }
        other => panic!("expected validation error, got {:?}", other),
    }

    let totals = harness.counters.read_totals().await;
    assert_eq!(totals.total_requests, None);
    assert_eq!(totals.total_files_transformed, None);
    assert_eq!(harness.staged_files(), 0);
}

#[tokio::test]
async fn test_corrupt_jpeg_fails_batch_and_cleans_up_all_files() {
    let harness = TestHarness::new();

    let corrupt = harness
        .stage("broken.jpg", "image/jpeg", &fixtures::truncated_jpeg_bytes())
        .await;
    let valid = harness
        .stage("fine.png", "image/png", &fixtures::png_bytes(32, 32))
        .await;
    let valid_path = valid.path().to_path_buf();

    let err = harness
        .convert_and_count(vec![corrupt, valid])
        .await
        .unwrap_err();

    match err {
        BatchError::Encoding(e) => assert_eq!(e.file_name(), "broken.jpg"),
        other => panic!("expected encoding error, got {:?}", other),
    }
    assert!(!valid_path.exists());
    assert_eq!(harness.staged_files(), 0);
    assert_eq!(harness.counters.read_totals().await.total_requests, None);
}

#[tokio::test]
async fn test_ten_file_batch() {
    let harness = TestHarness::new();

    let mut files = Vec::new();
    for i in 0..10 {
        let name = format!("img-{}.png", i);
        files.push(
            harness
                .stage(&name, "image/png", &fixtures::png_bytes(8 + i, 8))
                .await,
        );
    }

    let results = harness.orchestrator.convert_batch(files).await.unwrap();
    assert_eq!(results.len(), 10);
    for (i, result) in results.iter().enumerate() {
        assert_eq!(result.original_name, format!("img-{}.png", i));
    }
    assert_eq!(harness.staged_files(), 0);
}
