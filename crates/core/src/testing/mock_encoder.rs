//! Mock encoder for testing.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use crate::encoder::{EncodedImage, EncoderError, ImageEncoder, ImageKind};

/// A recorded encode call for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedEncode {
    pub file_name: String,
    pub kind: ImageKind,
    pub input_len: usize,
}

#[derive(Debug, Default)]
struct Behavior {
    fail_on: HashSet<String>,
    panic_on: HashSet<String>,
    delays_ms: HashMap<String, u64>,
}

/// Mock implementation of the ImageEncoder trait.
///
/// Echoes the input bytes back under the kind's output format. Per file
/// name it can:
/// - fail with a decode error
/// - panic
/// - sleep before returning, to force out-of-order completion
///
/// # Example
///
/// ```rust,ignore
/// use imagepress_core::testing::MockEncoder;
///
/// let encoder = MockEncoder::new();
/// encoder.fail_on("broken.jpg");
/// encoder.set_delay("slow.png", 200);
///
/// // ... run a batch ...
///
/// assert_eq!(encoder.encoded_files().len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct MockEncoder {
    behavior: Mutex<Behavior>,
    recorded: Mutex<Vec<RecordedEncode>>,
}

impl MockEncoder {
    /// Create a new mock encoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make encoding `file_name` fail with a decode error.
    pub fn fail_on(&self, file_name: &str) {
        self.lock_behavior().fail_on.insert(file_name.to_string());
    }

    /// Make encoding `file_name` panic.
    pub fn panic_on(&self, file_name: &str) {
        self.lock_behavior().panic_on.insert(file_name.to_string());
    }

    /// Delay the encode of `file_name` by `millis`.
    pub fn set_delay(&self, file_name: &str, millis: u64) {
        self.lock_behavior()
            .delays_ms
            .insert(file_name.to_string(), millis);
    }

    /// Get all recorded encode calls, in call order.
    pub fn recorded(&self) -> Vec<RecordedEncode> {
        self.recorded
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Names of every file passed to the encoder.
    pub fn encoded_files(&self) -> Vec<String> {
        self.recorded().into_iter().map(|r| r.file_name).collect()
    }

    fn lock_behavior(&self) -> std::sync::MutexGuard<'_, Behavior> {
        self.behavior.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ImageEncoder for MockEncoder {
    fn name(&self) -> &str {
        "mock"
    }

    fn encode(
        &self,
        file_name: &str,
        input: &[u8],
        kind: ImageKind,
    ) -> Result<EncodedImage, EncoderError> {
        self.recorded
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(RecordedEncode {
                file_name: file_name.to_string(),
                kind,
                input_len: input.len(),
            });

        let (delay, fail, panic) = {
            let behavior = self.lock_behavior();
            (
                behavior.delays_ms.get(file_name).copied(),
                behavior.fail_on.contains(file_name),
                behavior.panic_on.contains(file_name),
            )
        };

        if let Some(millis) = delay {
            std::thread::sleep(Duration::from_millis(millis));
        }
        if panic {
            panic!("mock encoder panic for {}", file_name);
        }
        if fail {
            return Err(EncoderError::decode(file_name, "mock decode failure"));
        }

        Ok(EncodedImage::new(input.to_vec(), kind.output_format()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::OutputFormat;

    #[test]
    fn test_echo_and_record() {
        let encoder = MockEncoder::new();
        let encoded = encoder.encode("a.png", b"abc", ImageKind::Png).unwrap();
        assert_eq!(encoded.data, b"abc");
        assert_eq!(encoded.format, OutputFormat::Webp);
        assert_eq!(
            encoder.recorded(),
            vec![RecordedEncode {
                file_name: "a.png".to_string(),
                kind: ImageKind::Png,
                input_len: 3,
            }]
        );
    }

    #[test]
    fn test_fail_on() {
        let encoder = MockEncoder::new();
        encoder.fail_on("bad.jpg");
        assert!(encoder.encode("bad.jpg", b"x", ImageKind::Jpeg).is_err());
        assert!(encoder.encode("good.jpg", b"x", ImageKind::Jpeg).is_ok());
    }

    #[test]
    #[should_panic(expected = "mock encoder panic")]
    fn test_panic_on() {
        let encoder = MockEncoder::new();
        encoder.panic_on("evil.gif");
        let _ = encoder.encode("evil.gif", b"x", ImageKind::Gif);
    }
}
