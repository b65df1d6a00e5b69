//! public description of a split
//!
//! stored in clear text next to the shares as `metadata.json`:
//!
//! ```json
//! {"version":1,"mode":"RGB","size":[640,480],"threshold":3,"shares":5}
//! ```
//!
//! it reveals the shape of the image, never its content.

use serde::{Deserialize, Serialize};

use crate::pixel::PixelMode;
use crate::scheme::Scheme;
use crate::{Error, Result};

/// Current metadata layout.
pub const METADATA_VERSION: u32 = 1;

/// Records written before the version tag existed share the version 1 layout.
fn legacy_version() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitMetadata {
    #[serde(default = "legacy_version")]
    pub version: u32,
    pub mode: PixelMode,
    /// `[width, height]`
    pub size: [u32; 2],
    pub threshold: u16,
    pub shares: u16,
}

impl SplitMetadata {
    pub fn new(mode: PixelMode, width: u32, height: u32, scheme: Scheme) -> Self {
        Self {
            version: METADATA_VERSION,
            mode,
            size: [width, height],
            threshold: scheme.threshold(),
            shares: scheme.shares(),
        }
    }

    pub fn width(&self) -> u32 {
        self.size[0]
    }

    pub fn height(&self) -> u32 {
        self.size[1]
    }

    /// Re-validates the recorded (k, n); metadata comes from outside.
    pub fn scheme(&self) -> Result<Scheme> {
        Scheme::new(self.threshold, self.shares)
    }

    /// Number of elements every share of this split carries.
    pub fn byte_len(&self) -> Result<usize> {
        self.mode
            .buffer_len(self.width(), self.height())
            .ok_or_else(|| {
                Error::Config(format!(
                    "{} {}x{} does not fit in memory",
                    self.mode,
                    self.width(),
                    self.height()
                ))
            })
    }

    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    /// Parse and validate a metadata record.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let meta: Self = serde_json::from_slice(bytes)?;
        if meta.version != METADATA_VERSION {
            return Err(Error::UnsupportedVersion(meta.version));
        }
        meta.scheme()?;
        meta.byte_len()?;
        Ok(meta)
    }
}
