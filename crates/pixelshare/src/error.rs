//! error types for pixelshare

use pixelshare_field::FieldError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Invalid (k, n) scheme or other configuration value
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to parse config file: {0}")]
    ConfigFile(#[from] toml::de::Error),

    // === reconstruction ===
    #[error("insufficient shares: need {required}, have {supplied} (present: {present:?})")]
    InsufficientShares {
        required: u16,
        supplied: usize,
        present: Vec<u16>,
    },

    #[error("duplicate share for evaluation point {x}")]
    DuplicateShare { x: u16 },

    #[error("evaluation point {x} is outside 1..={shares}")]
    InvalidEvaluationPoint { x: u16, shares: u16 },

    #[error("share {x} has {actual} elements, expected {expected}")]
    LengthMismatch { x: u16, expected: usize, actual: usize },

    #[error("split metadata is missing; cannot reassemble the image")]
    MissingMetadata,

    #[error("reconstructed value {value} at offset {offset} is not a byte (corrupted or mismatched shares)")]
    ReconstructionRange { offset: usize, value: u16 },

    /// Field invariant violation; not reachable with distinct evaluation points
    #[error(transparent)]
    Domain(#[from] FieldError),

    #[error("entropy source failed: {0}")]
    Entropy(String),

    // === formats ===
    #[error("unsupported pixel mode: {0:?}")]
    UnsupportedMode(String),

    #[error("pixel buffer holds {actual} bytes, {mode} {width}x{height} needs {expected}")]
    BufferSize {
        mode: &'static str,
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("malformed share {x}: {reason}")]
    MalformedShare { x: u16, reason: String },

    #[error("unsupported metadata version {0}")]
    UnsupportedVersion(u32),

    #[error("metadata encoding error: {0}")]
    Json(#[from] serde_json::Error),

    // === storage ===
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage error: {0}")]
    Storage(String),
}
