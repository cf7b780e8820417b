//! Testing utilities and mock implementations.
//!
//! Provides doubles for the encoder and the counter store plus generated
//! image fixtures, so batches can be exercised without real uploads.
//!
//! # Example
//!
//! ```rust,ignore
//! use imagepress_core::testing::{fixtures, MemoryCounterStore, MockEncoder};
//!
//! let store = MemoryCounterStore::new();
//! let encoder = MockEncoder::new();
//! encoder.fail_on("broken.jpg");
//!
//! let png = fixtures::png_bytes(64, 64);
//! ```

mod memory_counter_store;
mod mock_encoder;

pub use memory_counter_store::MemoryCounterStore;
pub use mock_encoder::{MockEncoder, RecordedEncode};

/// Generated image fixtures.
pub mod fixtures {
    use std::io::Cursor;

    use image::codecs::gif::{GifEncoder, Repeat};
    use image::{Delay, DynamicImage, Frame, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};

    fn gradient(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 7 % 256) as u8, (y * 5 % 256) as u8, ((x + y) % 256) as u8])
        })
    }

    fn write(image: DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        image
            .write_to(&mut out, format)
            .expect("Failed to encode fixture image");
        out.into_inner()
    }

    /// An opaque RGB PNG.
    pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        write(DynamicImage::ImageRgb8(gradient(width, height)), ImageFormat::Png)
    }

    /// A PNG with a translucent alpha channel.
    pub fn rgba_png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x % 256) as u8, (y % 256) as u8, 200, ((x * y) % 256) as u8])
        });
        write(DynamicImage::ImageRgba8(image), ImageFormat::Png)
    }

    /// A baseline JPEG.
    pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
        write(DynamicImage::ImageRgb8(gradient(width, height)), ImageFormat::Jpeg)
    }

    /// A JPEG cut off halfway through its scan data.
    pub fn truncated_jpeg_bytes() -> Vec<u8> {
        let mut jpeg = jpeg_bytes(256, 256);
        jpeg.truncate(jpeg.len() / 2);
        jpeg
    }

    /// A PNG cut off halfway through its image data.
    pub fn truncated_png_bytes() -> Vec<u8> {
        let mut png = png_bytes(256, 256);
        png.truncate(png.len() / 2);
        png
    }

    /// A looping GIF with `frames` distinct frames.
    pub fn animated_gif_bytes(frames: usize, width: u32, height: u32) -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut encoder = GifEncoder::new(&mut out);
            encoder
                .set_repeat(Repeat::Infinite)
                .expect("Failed to set GIF repeat");
            for i in 0..frames {
                let shade = (i * 255 / frames.max(1)) as u8;
                let buffer = RgbaImage::from_fn(width, height, |x, _| {
                    Rgba([shade, (x % 256) as u8, 255 - shade, 255])
                });
                let frame = Frame::from_parts(
                    buffer,
                    0,
                    0,
                    Delay::from_numer_denom_ms(100, 1),
                );
                encoder
                    .encode_frame(frame)
                    .expect("Failed to encode GIF frame");
            }
        }
        out
    }

    /// A hand-written SVG with the indentation, comments and metadata an
    /// editor typically leaves behind.
    pub fn svg_bytes() -> Vec<u8> {
        br##"<?xml version="1.0" encoding="UTF-8" standalone="no"?>
<!-- Created with a vector editor -->
<svg
    xmlns="http://www.w3.org/2000/svg"
    width="120"
    height="120"
    viewBox="0 0 120 120"
    version="1.1">
    <metadata>
        <description>Test badge used by the fixtures</description>
    </metadata>
    <defs>
        <linearGradient id="unusedGradient">
            <stop offset="0" style="stop-color:#ff0000;stop-opacity:1" />
        </linearGradient>
    </defs>
    <g id="layer1">
        <!-- outer ring -->
        <circle cx="60.000000" cy="60.000000" r="50.000000" fill="#336699" stroke="#000000" stroke-width="2.000000" />
        <!-- inner square -->
        <rect x="35.000000" y="35.000000" width="50.000000" height="50.000000" fill="#ffffff" opacity="1.000000" />
    </g>
</svg>
"##
        .to_vec()
    }

    /// An editor-exported SVG with text, a title and a linked symbol.
    pub fn svg_text_bytes() -> Vec<u8> {
        br##"<?xml version="1.0" encoding="UTF-8"?>
<svg
    xmlns="http://www.w3.org/2000/svg"
    xmlns:xlink="http://www.w3.org/1999/xlink"
    xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape"
    xmlns:sodipodi="http://sodipodi.sourceforge.net/DTD/sodipodi-0.dtd"
    width="200"
    height="80"
    inkscape:version="1.3">
    <sodipodi:namedview id="namedview1" pagecolor="#ffffff" inkscape:zoom="1.5" />
    <title>Quarterly report</title>
    <!-- reusable marker -->
    <defs>
        <circle id="mark" cx="5.0" cy="5.0" r="4.0" fill="#cc0000" />
    </defs>
    <g inkscape:label="Layer 1" inkscape:groupmode="layer">
        <use xlink:href="#mark" x="10" y="50" />
        <text x="10" y="25" font-size="16.00">Hello imagepress<tspan font-weight="bold"> and friends</tspan></text>
    </g>
</svg>
"##
        .to_vec()
    }
}
