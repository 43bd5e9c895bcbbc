//! Image format detection
//!
//! Detects image formats by examining magic numbers in the file header.
//! File extensions are never consulted.

use crate::{DecodeError, IoResult};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Raster formats the loader understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Png,
    Jpeg,
}

impl ImageFormat {
    /// Canonical file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
        }
    }
}

/// Magic numbers for image format detection
mod magic {
    /// PNG: 89 50 4E 47 0D 0A 1A 0A
    pub const PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    /// JPEG: FF D8 FF
    pub const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF];
}

/// Detect image format from a file path
pub fn detect_format<P: AsRef<Path>>(path: P) -> IoResult<ImageFormat> {
    let mut file = File::open(path)?;
    let mut header = [0u8; 8];
    let bytes_read = file.read(&mut header)?;
    detect_format_from_bytes(&header[..bytes_read])
}

/// Detect image format from bytes
pub fn detect_format_from_bytes(data: &[u8]) -> IoResult<ImageFormat> {
    if data.len() < 3 {
        return Err(DecodeError::InvalidData(
            "not enough data to detect format".to_string(),
        ));
    }

    if data.starts_with(magic::PNG) {
        return Ok(ImageFormat::Png);
    }

    if data.starts_with(magic::JPEG) {
        return Ok(ImageFormat::Jpeg);
    }

    Err(DecodeError::UnsupportedFormat(
        "unrecognized image signature".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_png() {
        let header = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];
        assert_eq!(detect_format_from_bytes(&header).unwrap(), ImageFormat::Png);
    }

    #[test]
    fn test_detect_jpeg() {
        let header = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];
        assert_eq!(
            detect_format_from_bytes(&header).unwrap(),
            ImageFormat::Jpeg
        );
    }

    #[test]
    fn test_detect_unknown() {
        assert!(matches!(
            detect_format_from_bytes(b"BM\x00\x00\x00\x00"),
            Err(DecodeError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            detect_format_from_bytes(b"\x89P"),
            Err(DecodeError::InvalidData(_))
        ));
    }

    #[test]
    fn test_truncated_png_signature_is_not_png() {
        assert!(detect_format_from_bytes(&[0x89, 0x50, 0x4E, 0x47]).is_err());
    }
}
