//! Common test utilities for in-process API testing.
//!
//! This module provides a test fixture that builds the router with an
//! in-memory counter store and a temporary staging directory, so the full
//! request path runs without external infrastructure.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use imagepress_core::{
    testing::{MemoryCounterStore, MockEncoder},
    Config, ConversionOrchestrator, ImageEncoder, StandardEncoder, UploadConfig, UsageCounters,
};
use imagepress_server::{api::create_router, state::AppState};

/// Re-export fixtures for test convenience
pub use imagepress_core::testing::fixtures;

const BOUNDARY: &str = "imagepress-test-boundary";

/// One part of a multipart request.
pub struct Part {
    pub field: String,
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl Part {
    /// A part under the `images` field.
    pub fn image(file_name: &str, content_type: &str, data: Vec<u8>) -> Self {
        Self {
            field: "images".to_string(),
            file_name: file_name.to_string(),
            content_type: content_type.to_string(),
            data,
        }
    }
}

/// Encodes parts as a `multipart/form-data` body.
pub fn multipart_body(parts: &[Part]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                part.field, part.file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", part.content_type).as_bytes());
        body.extend_from_slice(&part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

/// Configuration for the test fixture.
#[derive(Default)]
pub struct TestConfig {
    /// Use the recording mock instead of the real codecs.
    pub mock_encoder: bool,
    /// Overrides the batch size limit.
    pub max_files: Option<usize>,
    /// Overrides the per-file size limit.
    pub max_file_size_bytes: Option<u64>,
}

/// Test fixture wrapping an in-process router.
pub struct TestFixture {
    pub router: Router,
    /// Counter store backing `/logs`.
    pub counters: Arc<MemoryCounterStore>,
    /// Set when the fixture runs with `mock_encoder`.
    pub mock_encoder: Option<Arc<MockEncoder>>,
    /// Holds the staging directory.
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    /// JSON body, or the raw text as a JSON string when not JSON.
    pub body: Value,
}

impl TestFixture {
    /// Create a new test fixture with the real encoder.
    pub async fn new() -> Self {
        Self::with_config(TestConfig::default()).await
    }

    pub async fn with_config(test_config: TestConfig) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");

        let defaults = UploadConfig::default();
        let config = Config {
            uploads: UploadConfig {
                max_files: test_config.max_files.unwrap_or(defaults.max_files),
                max_file_size_bytes: test_config
                    .max_file_size_bytes
                    .unwrap_or(defaults.max_file_size_bytes),
                staging_dir: temp_dir.path().join("staging"),
            },
            ..Default::default()
        };

        let counters = Arc::new(MemoryCounterStore::new());
        let mock_encoder = test_config.mock_encoder.then(|| Arc::new(MockEncoder::new()));
        let encoder: Arc<dyn ImageEncoder> = match &mock_encoder {
            Some(mock) => mock.clone(),
            None => Arc::new(StandardEncoder::new(config.encoder.clone())),
        };

        let state = Arc::new(AppState::new(
            config,
            ConversionOrchestrator::new(encoder),
            UsageCounters::new(counters.clone()),
        ));

        Self {
            router: create_router(state),
            counters,
            mock_encoder,
            temp_dir,
        }
    }

    pub fn staging_dir(&self) -> std::path::PathBuf {
        self.temp_dir.path().join("staging")
    }

    /// Number of files left in the staging directory.
    pub fn staged_file_count(&self) -> usize {
        count_files(&self.staging_dir())
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// POST a multipart body built from `parts`.
    pub async fn post_multipart(&self, path: &str, parts: &[Part]) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(multipart_body(parts)))
            .unwrap();
        self.send(request).await
    }

    /// POST `/convert` with the given image parts.
    pub async fn convert(&self, parts: &[Part]) -> TestResponse {
        self.post_multipart("/convert", parts).await
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        TestResponse { status, body }
    }
}

fn count_files(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
}
