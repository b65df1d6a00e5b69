//! raw pixel buffers and their format descriptors

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Pixel layout of a raw buffer, named the way image libraries name modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum PixelMode {
    /// 8-bit grayscale
    L,
    /// 8-bit palette indices
    P,
    /// grayscale + alpha
    La,
    /// 16-bit little-endian grayscale
    I16,
    Rgb,
    YCbCr,
    Lab,
    Hsv,
    Rgba,
    /// RGB with a padding byte
    Rgbx,
    Cmyk,
    /// 32-bit signed integer
    I,
    /// 32-bit float
    F,
}

impl PixelMode {
    pub const ALL: [PixelMode; 13] = [
        PixelMode::L,
        PixelMode::P,
        PixelMode::La,
        PixelMode::I16,
        PixelMode::Rgb,
        PixelMode::YCbCr,
        PixelMode::Lab,
        PixelMode::Hsv,
        PixelMode::Rgba,
        PixelMode::Rgbx,
        PixelMode::Cmyk,
        PixelMode::I,
        PixelMode::F,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            PixelMode::L => "L",
            PixelMode::P => "P",
            PixelMode::La => "LA",
            PixelMode::I16 => "I;16",
            PixelMode::Rgb => "RGB",
            PixelMode::YCbCr => "YCbCr",
            PixelMode::Lab => "LAB",
            PixelMode::Hsv => "HSV",
            PixelMode::Rgba => "RGBA",
            PixelMode::Rgbx => "RGBX",
            PixelMode::Cmyk => "CMYK",
            PixelMode::I => "I",
            PixelMode::F => "F",
        }
    }

    pub const fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelMode::L | PixelMode::P => 1,
            PixelMode::La | PixelMode::I16 => 2,
            PixelMode::Rgb | PixelMode::YCbCr | PixelMode::Lab | PixelMode::Hsv => 3,
            PixelMode::Rgba | PixelMode::Rgbx | PixelMode::Cmyk | PixelMode::I | PixelMode::F => 4,
        }
    }

    /// Byte length of a `width` x `height` buffer in this mode, if it fits in memory.
    pub fn buffer_len(&self, width: u32, height: u32) -> Option<usize> {
        (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(self.bytes_per_pixel())
    }
}

impl fmt::Display for PixelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PixelMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        PixelMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| Error::UnsupportedMode(s.to_string()))
    }
}

impl TryFrom<String> for PixelMode {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<PixelMode> for &'static str {
    fn from(mode: PixelMode) -> Self {
        mode.as_str()
    }
}

/// Flattened raw pixel data plus the geometry needed to interpret it.
///
/// Always satisfies `bytes.len() == width * height * mode.bytes_per_pixel()`.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    mode: PixelMode,
    width: u32,
    height: u32,
    bytes: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(mode: PixelMode, width: u32, height: u32, bytes: Vec<u8>) -> Result<Self> {
        let expected = mode.buffer_len(width, height);
        if expected != Some(bytes.len()) {
            return Err(Error::BufferSize {
                mode: mode.as_str(),
                width,
                height,
                expected: expected.unwrap_or(usize::MAX),
                actual: bytes.len(),
            });
        }
        Ok(Self {
            mode,
            width,
            height,
            bytes,
        })
    }

    pub fn mode(&self) -> PixelMode {
        self.mode
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

// pixel contents stay out of logs
impl fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("mode", &self.mode)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_names_roundtrip() {
        for mode in PixelMode::ALL {
            assert_eq!(mode.as_str().parse::<PixelMode>().unwrap(), mode);
        }
        assert!(matches!(
            "RGB;15".parse::<PixelMode>(),
            Err(Error::UnsupportedMode(m)) if m == "RGB;15"
        ));
    }

    #[test]
    fn test_mode_serde_uses_names() {
        let json = serde_json::to_string(&PixelMode::I16).unwrap();
        assert_eq!(json, "\"I;16\"");
        let mode: PixelMode = serde_json::from_str("\"RGBA\"").unwrap();
        assert_eq!(mode, PixelMode::Rgba);
        assert!(serde_json::from_str::<PixelMode>("\"rgba\"").is_err());
    }

    #[test]
    fn test_buffer_geometry_enforced() {
        let buf = PixelBuffer::new(PixelMode::Rgb, 2, 2, vec![0; 12]).unwrap();
        assert_eq!(buf.len(), 12);

        let err = PixelBuffer::new(PixelMode::Rgba, 2, 2, vec![0; 12]).unwrap_err();
        assert!(matches!(
            err,
            Error::BufferSize { expected: 16, actual: 12, .. }
        ));
    }

    #[test]
    fn test_debug_hides_pixels() {
        let buf = PixelBuffer::new(PixelMode::L, 1, 1, vec![42]).unwrap();
        let dbg = format!("{:?}", buf);
        assert!(dbg.contains("len: 1"));
        assert!(!dbg.contains("42"));
    }
}
