//! EXIF orientation
//!
//! Cameras store the sensor grid as captured and record how it should be
//! displayed in EXIF tag `0x0112`. The JPEG reader applies that tag so the
//! decoded grid is the upright picture, the way OpenCV's `imread` does.

use leafscan_core::{Image, Result};

const ORIENTATION_TAG: u16 = 0x0112;
const TYPE_SHORT: u16 = 3;
const IFD_ENTRY_LEN: usize = 12;

/// Display orientation recorded in EXIF tag `0x0112`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// 1: stored upright
    Normal,
    /// 2: mirrored left-right
    FlipHorizontal,
    /// 3: upside down
    Rotate180,
    /// 4: mirrored top-bottom
    FlipVertical,
    /// 5: mirrored across the main diagonal
    Transpose,
    /// 6: needs a 90 degree clockwise turn
    Rotate90,
    /// 7: mirrored across the anti-diagonal
    Transverse,
    /// 8: needs a 90 degree counterclockwise turn
    Rotate270,
}

impl Orientation {
    /// Map an EXIF orientation value. Values outside 1..=8 yield `None`.
    pub fn from_value(value: u16) -> Option<Self> {
        Some(match value {
            1 => Orientation::Normal,
            2 => Orientation::FlipHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::FlipVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270,
            _ => return None,
        })
    }

    /// Read the orientation from a raw EXIF block starting at the TIFF header.
    ///
    /// Only IFD0 is searched. A malformed block yields `None`.
    pub fn from_exif(exif: &[u8]) -> Option<Self> {
        let big_endian = match exif.get(0..2)? {
            b"MM" => true,
            b"II" => false,
            _ => return None,
        };
        let read_u16 = |at: usize| -> Option<u16> {
            let b: [u8; 2] = exif.get(at..at + 2)?.try_into().ok()?;
            Some(if big_endian {
                u16::from_be_bytes(b)
            } else {
                u16::from_le_bytes(b)
            })
        };
        let read_u32 = |at: usize| -> Option<u32> {
            let b: [u8; 4] = exif.get(at..at + 4)?.try_into().ok()?;
            Some(if big_endian {
                u32::from_be_bytes(b)
            } else {
                u32::from_le_bytes(b)
            })
        };

        if read_u16(2)? != 42 {
            return None;
        }
        let ifd = read_u32(4)? as usize;
        let count = read_u16(ifd)? as usize;
        (0..count)
            .map(|i| ifd + 2 + i * IFD_ENTRY_LEN)
            .find(|&entry| read_u16(entry) == Some(ORIENTATION_TAG))
            .and_then(|entry| {
                if read_u16(entry + 2)? != TYPE_SHORT {
                    return None;
                }
                Self::from_value(read_u16(entry + 8)?)
            })
    }

    /// True when applying the orientation swaps width and height.
    pub fn swaps_axes(self) -> bool {
        matches!(
            self,
            Orientation::Transpose
                | Orientation::Rotate90
                | Orientation::Transverse
                | Orientation::Rotate270
        )
    }

    /// Source coordinates of output pixel `(x, y)` for a `w` x `h` source.
    fn source(self, x: u32, y: u32, w: u32, h: u32) -> (u32, u32) {
        match self {
            Orientation::Normal => (x, y),
            Orientation::FlipHorizontal => (w - 1 - x, y),
            Orientation::Rotate180 => (w - 1 - x, h - 1 - y),
            Orientation::FlipVertical => (x, h - 1 - y),
            Orientation::Transpose => (y, x),
            Orientation::Rotate90 => (y, h - 1 - x),
            Orientation::Transverse => (w - 1 - y, h - 1 - x),
            Orientation::Rotate270 => (w - 1 - y, x),
        }
    }

    /// Return the upright version of `image`.
    pub fn apply(self, image: &Image) -> Result<Image> {
        if self == Orientation::Normal {
            return Ok(image.clone());
        }
        let (w, h) = (image.width(), image.height());
        let (out_w, out_h) = if self.swaps_axes() { (h, w) } else { (w, h) };
        let spp = image.spp() as usize;
        let src = image.data();

        let mut data = Vec::with_capacity(src.len());
        for y in 0..out_h {
            for x in 0..out_w {
                let (sx, sy) = self.source(x, y, w, h);
                let i = (sy as usize * w as usize + sx as usize) * spp;
                data.extend_from_slice(&src[i..i + spp]);
            }
        }
        Image::from_raw(out_w, out_h, image.format(), data)
    }
}
