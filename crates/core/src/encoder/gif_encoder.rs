//! GIF re-encoding with animation preserved.

use std::io::Cursor;

use image::codecs::gif::{GifDecoder, GifEncoder, Repeat};
use image::AnimationDecoder;

use super::error::EncoderError;

/// Decodes every frame of a GIF and writes them back with a fresh palette
/// quantization at `speed` (1 = best quality, 30 = fastest).
///
/// Frame count, frame offsets and per-frame delays are carried over. Animated
/// inputs are written with an infinite loop.
pub fn reencode_gif(file_name: &str, input: &[u8], speed: i32) -> Result<Vec<u8>, EncoderError> {
    let decoder =
        GifDecoder::new(Cursor::new(input)).map_err(|e| EncoderError::decode(file_name, e))?;
    let frames = decoder
        .into_frames()
        .collect_frames()
        .map_err(|e| EncoderError::decode(file_name, e))?;

    if frames.is_empty() {
        return Err(EncoderError::decode(file_name, "GIF contains no frames"));
    }
    let animated = frames.len() > 1;

    let mut output = Vec::new();
    {
        let mut encoder = GifEncoder::new_with_speed(&mut output, speed);
        if animated {
            encoder
                .set_repeat(Repeat::Infinite)
                .map_err(|e| EncoderError::encode(file_name, e))?;
        }
        encoder
            .encode_frames(frames)
            .map_err(|e| EncoderError::encode(file_name, e))?;
    }

    Ok(output)
}
