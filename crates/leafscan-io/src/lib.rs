//! leafscan-io - Image loading
//!
//! Decodes image files into [`leafscan_core::Image`] grids. The format is
//! detected from the file's magic bytes, never from its extension.
//!
//! # Supported formats
//!
//! | Format | Read | Write | Feature |
//! |--------|------|-------|---------|
//! | PNG    | yes  | yes   | `png-format` |
//! | JPEG   | yes  | no    | `jpeg` |
//!
//! Every decoded image is either `Gray8` or `Rgb8`; no resizing or color
//! conversion happens here. JPEG images are turned upright according to
//! their EXIF orientation tag.

mod error;
pub mod format;

#[cfg(feature = "jpeg")]
pub mod jpeg;
#[cfg(feature = "jpeg")]
pub mod orientation;
#[cfg(feature = "png-format")]
pub mod png;

pub use error::{DecodeError, IoResult};
pub use format::{ImageFormat, detect_format, detect_format_from_bytes};
#[cfg(feature = "jpeg")]
pub use orientation::Orientation;

use leafscan_core::Image;
use std::fs::File;
use std::io::{BufWriter, Cursor};
use std::path::Path;
use tracing::debug;

/// Read an image from a file path.
///
/// # Errors
///
/// Returns [`DecodeError::Io`] when the file is missing or unreadable,
/// [`DecodeError::UnsupportedFormat`] when the content is not PNG or JPEG,
/// and [`DecodeError::Decode`] when the decoder rejects the data.
pub fn read_image<P: AsRef<Path>>(path: P) -> IoResult<Image> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    let image = read_image_mem(&data)?;
    debug!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        format = ?image.format(),
        "decoded image"
    );
    Ok(image)
}

/// Read an image from an in-memory buffer.
pub fn read_image_mem(data: &[u8]) -> IoResult<Image> {
    match detect_format_from_bytes(data)? {
        #[cfg(feature = "png-format")]
        ImageFormat::Png => png::read_png(Cursor::new(data)),
        #[cfg(feature = "jpeg")]
        ImageFormat::Jpeg => jpeg::read_jpeg(Cursor::new(data)),
        #[allow(unreachable_patterns)]
        other => Err(DecodeError::UnsupportedFormat(format!(
            "{:?} support not enabled",
            other
        ))),
    }
}

/// Write an image to a file as PNG.
#[cfg(feature = "png-format")]
pub fn write_image<P: AsRef<Path>>(image: &Image, path: P) -> IoResult<()> {
    let file = File::create(path)?;
    png::write_png(image, BufWriter::new(file))
}

