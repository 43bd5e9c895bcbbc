//! PNG image format support
//!
//! Decoding expands palettes and sub-byte gray to 8 bits, then reduces
//! every color type to either `Gray8` or `Rgb8`: alpha is dropped and
//! 16-bit samples keep their high byte.

use crate::{DecodeError, IoResult};
use leafscan_core::{Image, PixelFormat};
use png::{BitDepth, ColorType, Decoder, Encoder, Transformations};
use std::io::{BufRead, Seek, Write};

/// Read a PNG image
pub fn read_png<R: BufRead + Seek>(reader: R) -> IoResult<Image> {
    let mut decoder = Decoder::new(reader);
    decoder.set_transformations(Transformations::EXPAND);
    let mut reader = decoder
        .read_info()
        .map_err(|e| DecodeError::Decode(format!("PNG decode error: {}", e)))?;

    let (width, height) = {
        let info = reader.info();
        (info.width, info.height)
    };
    let (color_type, bit_depth) = reader.output_color_type();

    let (format, channels) = match color_type {
        ColorType::Grayscale => (PixelFormat::Gray8, 1),
        ColorType::GrayscaleAlpha => (PixelFormat::Gray8, 2),
        ColorType::Rgb => (PixelFormat::Rgb8, 3),
        ColorType::Rgba => (PixelFormat::Rgb8, 4),
        ColorType::Indexed => {
            return Err(DecodeError::UnsupportedFormat(
                "PNG palette was not expanded".to_string(),
            ));
        }
    };
    let bytes_per_sample = match bit_depth {
        BitDepth::Eight => 1,
        BitDepth::Sixteen => 2,
        other => {
            return Err(DecodeError::UnsupportedFormat(format!(
                "unsupported PNG bit depth after expansion: {:?}",
                other
            )));
        }
    };

    let buf_size = reader.output_buffer_size().ok_or_else(|| {
        DecodeError::Decode("failed to get output buffer size".to_string())
    })?;
    let mut buf = vec![0; buf_size];
    let output_info = reader
        .next_frame(&mut buf)
        .map_err(|e| DecodeError::Decode(format!("PNG frame error: {}", e)))?;

    let bytes_per_row = output_info.line_size;
    let data = &buf[..output_info.buffer_size()];
    let stride = channels * bytes_per_sample;
    let keep = format.samples_per_pixel() as usize;

    let mut out = Vec::with_capacity(width as usize * height as usize * keep);
    for y in 0..height as usize {
        let row = &data[y * bytes_per_row..y * bytes_per_row + width as usize * stride];
        for px in row.chunks_exact(stride) {
            // Big-endian 16-bit samples: the first byte of each pair is the high byte.
            for c in 0..keep {
                out.push(px[c * bytes_per_sample]);
            }
        }
    }

    Ok(Image::from_raw(width, height, format, out)?)
}

/// Write a PNG image
///
/// Gray images are stored as 8-bit grayscale and RGB images as 8-bit RGB.
/// HSV images have no PNG representation and are rejected.
pub fn write_png<W: Write>(image: &Image, writer: W) -> IoResult<()> {
    let color_type = match image.format() {
        PixelFormat::Gray8 => ColorType::Grayscale,
        PixelFormat::Rgb8 => ColorType::Rgb,
        PixelFormat::Hsv8 => {
            return Err(DecodeError::UnsupportedFormat(
                "HSV images cannot be written as PNG".to_string(),
            ));
        }
    };

    let mut encoder = Encoder::new(writer, image.width(), image.height());
    encoder.set_color(color_type);
    encoder.set_depth(BitDepth::Eight);

    let mut writer = encoder
        .write_header()
        .map_err(|e| DecodeError::Encode(format!("PNG header error: {}", e)))?;
    writer
        .write_image_data(image.data())
        .map_err(|e| DecodeError::Encode(format!("PNG write error: {}", e)))?;
    writer
        .finish()
        .map_err(|e| DecodeError::Encode(format!("PNG finish error: {}", e)))?;

    Ok(())
}
