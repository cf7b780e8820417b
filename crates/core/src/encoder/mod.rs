//! Encoder module for transcoding uploaded images.
//!
//! Each supported input kind maps to exactly one output format:
//!
//! | Input        | Output | Policy                                   |
//! |--------------|--------|------------------------------------------|
//! | JPEG, PNG    | WebP   | lossy re-encode at the configured quality |
//! | GIF          | GIF    | re-quantized, animation preserved         |
//! | SVG          | SVG    | structural minification, never rasterized |
//!
//! # Example
//!
//! ```ignore
//! use imagepress_core::encoder::{EncoderConfig, ImageEncoder, ImageKind, StandardEncoder};
//!
//! let encoder = StandardEncoder::new(EncoderConfig::default());
//! let encoded = encoder.encode("photo.png", &bytes, ImageKind::Png)?;
//! assert_eq!(encoded.format.mime_type(), "image/webp");
//! ```

mod error;
mod gif_encoder;
mod standard;
mod svg_optimizer;
mod traits;
mod types;
mod webp_encoder;

pub use crate::config::EncoderConfig;
pub use error::EncoderError;
pub use gif_encoder::reencode_gif;
pub use standard::StandardEncoder;
pub use svg_optimizer::optimize_svg;
pub use traits::ImageEncoder;
pub use types::{EncodedImage, ImageKind, OutputFormat, ALLOWED_MIME_TYPES};
pub use webp_encoder::encode_webp;
