//! JPEG image format support
//!
//! Reads JPEG images using the `jpeg-decoder` crate. Luminance images
//! decode to `Gray8`, color images to `Rgb8`. An EXIF orientation tag is
//! applied before the image is returned.

use crate::orientation::Orientation;
use crate::{DecodeError, IoResult};
use jpeg_decoder::{Decoder, PixelFormat as JpegPixelFormat};
use leafscan_core::{Image, PixelFormat};
use std::io::Read;
use tracing::debug;

/// Read a JPEG image from a reader.
///
/// The reader must be positioned at the JPEG SOI marker (`FF D8`).
pub fn read_jpeg<R: Read>(reader: R) -> IoResult<Image> {
    let mut decoder = Decoder::new(reader);
    let pixels = decoder
        .decode()
        .map_err(|e| DecodeError::Decode(format!("JPEG decode error: {}", e)))?;
    let info = decoder
        .info()
        .ok_or_else(|| DecodeError::Decode("JPEG header missing".to_string()))?;

    let width = u32::from(info.width);
    let height = u32::from(info.height);

    let (format, data) = match info.pixel_format {
        JpegPixelFormat::L8 => (PixelFormat::Gray8, pixels),
        // 16-bit luminance arrives big-endian
        JpegPixelFormat::L16 => (
            PixelFormat::Gray8,
            pixels.chunks_exact(2).map(|s| s[0]).collect(),
        ),
        JpegPixelFormat::RGB24 => (PixelFormat::Rgb8, pixels),
        JpegPixelFormat::CMYK32 => (
            PixelFormat::Rgb8,
            pixels
                .chunks_exact(4)
                .flat_map(|p| {
                    let k = 255 - u32::from(p[3]);
                    let conv = |c: u8| ((255 - u32::from(c)) * k / 255) as u8;
                    [conv(p[0]), conv(p[1]), conv(p[2])]
                })
                .collect(),
        ),
    };

    let image = Image::from_raw(width, height, format, data)?;
    match decoder.exif_data().and_then(Orientation::from_exif) {
        Some(orientation) if orientation != Orientation::Normal => {
            debug!(?orientation, "applying EXIF orientation");
            Ok(orientation.apply(&image)?)
        }
        _ => Ok(image),
    }
}
