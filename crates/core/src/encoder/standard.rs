//! Default encoder backed by libwebp, the `image` GIF codec and an XML-level
//! SVG minifier.

use tracing::debug;

use super::error::EncoderError;
use super::gif_encoder::reencode_gif;
use super::svg_optimizer::optimize_svg;
use super::traits::ImageEncoder;
use super::types::{EncodedImage, ImageKind};
use super::webp_encoder::encode_webp;
use crate::config::EncoderConfig;

/// Dispatches each image kind to its format-specific encoder.
#[derive(Debug, Clone, Default)]
pub struct StandardEncoder {
    config: EncoderConfig,
}

impl StandardEncoder {
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }
}

impl ImageEncoder for StandardEncoder {
    fn name(&self) -> &str {
        "standard"
    }

    fn encode(
        &self,
        file_name: &str,
        input: &[u8],
        kind: ImageKind,
    ) -> Result<EncodedImage, EncoderError> {
        let format = kind.output_format();
        let data = match kind {
            ImageKind::Jpeg | ImageKind::Png => {
                encode_webp(file_name, input, self.config.webp_quality)?
            }
            ImageKind::Gif => reencode_gif(file_name, input, self.config.gif_speed)?,
            ImageKind::Svg => optimize_svg(file_name, input)?,
        };

        debug!(
            file = file_name,
            kind = kind.as_str(),
            input_bytes = input.len(),
            output_bytes = data.len(),
            "Encoded image"
        );

        Ok(EncodedImage::new(data, format))
    }
}
