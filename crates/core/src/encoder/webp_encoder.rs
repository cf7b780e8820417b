//! Lossy WebP encoding for raster inputs (JPEG, PNG).

use image::{DynamicImage, ImageFormat};

use super::error::EncoderError;

/// Decodes a JPEG or PNG and re-encodes it as lossy WebP.
///
/// The decoder sniffs the real format from the bytes, so a PNG declared as
/// `image/jpeg` still converts. libwebp only accepts 8-bit RGB/RGBA buffers;
/// other pixel layouts are normalized first.
pub fn encode_webp(file_name: &str, input: &[u8], quality: f32) -> Result<Vec<u8>, EncoderError> {
    ensure_complete(file_name, input)?;
    let decoded = image::load_from_memory(input).map_err(|e| EncoderError::decode(file_name, e))?;

    let normalized = if decoded.color().has_alpha() {
        DynamicImage::ImageRgba8(decoded.to_rgba8())
    } else {
        DynamicImage::ImageRgb8(decoded.to_rgb8())
    };

    let encoder =
        ::webp::Encoder::from_image(&normalized).map_err(|e| EncoderError::encode(file_name, e))?;
    let memory = encoder
        .encode_simple(false, quality)
        .map_err(|e| EncoderError::encode(file_name, format!("{:?}", e)))?;

    Ok(memory.to_vec())
}

/// Rejects JPEG and PNG data cut off before its end marker. The `image`
/// decoders fill a short scan with blank pixels instead of failing.
fn ensure_complete(file_name: &str, input: &[u8]) -> Result<(), EncoderError> {
    let complete = match image::guess_format(input) {
        Ok(ImageFormat::Jpeg) => jpeg_has_end_marker(input),
        Ok(ImageFormat::Png) => png_has_end_chunk(input),
        _ => true,
    };
    if complete {
        Ok(())
    } else {
        Err(EncoderError::decode(file_name, "image data is truncated"))
    }
}

fn rfind(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).rposition(|w| w == needle)
}

/// EOI (`FF D9`) must follow the last start-of-scan marker (`FF DA`).
/// Scan data stuffs every `FF` byte, so neither marker occurs inside it.
fn jpeg_has_end_marker(input: &[u8]) -> bool {
    let scan_start = rfind(input, &[0xFF, 0xDA]).unwrap_or(0);
    rfind(&input[scan_start..], &[0xFF, 0xD9]).is_some()
}

/// The `IEND` chunk must come after the last `IDAT` chunk.
fn png_has_end_chunk(input: &[u8]) -> bool {
    match (rfind(input, b"IEND"), rfind(input, b"IDAT")) {
        (Some(end), Some(data)) => end > data,
        (Some(_), None) => true,
        (None, _) => false,
    }
}
