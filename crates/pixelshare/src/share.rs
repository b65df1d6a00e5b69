//! share records and their binary layout
//!
//! a share file is a flat array of little-endian `u16`, one per pixel byte,
//! with no header. field elements range over `0..=256`, so one byte per
//! element is not enough: storing `256` in a `u8` wraps to `0` and silently
//! corrupts every reconstruction that uses the share.
//!
//! the evaluation point is not part of the body; stores keep it in the file
//! name (`share_{x}.bin`) and hand it to [`ShareRecord::decode`].

use pixelshare_field::{Gf257, PRIME};

use crate::scheme::MAX_SHARES;
use crate::{Error, Result};

/// Width of one encoded element.
pub const ELEMENT_BYTES: usize = 2;

pub(crate) const FILE_PREFIX: &str = "share_";
pub(crate) const FILE_SUFFIX: &str = ".bin";

/// One participant's share: an evaluation point and one field element per
/// secret byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareRecord {
    x: u16,
    values: Vec<Gf257>,
}

impl ShareRecord {
    pub fn new(x: u16, values: Vec<Gf257>) -> Result<Self> {
        if x == 0 || x > MAX_SHARES {
            return Err(Error::InvalidEvaluationPoint { x, shares: MAX_SHARES });
        }
        Ok(Self { x, values })
    }

    /// Evaluation point
    pub fn x(&self) -> u16 {
        self.x
    }

    pub fn values(&self) -> &[Gf257] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Serialize the element sequence as little-endian `u16`s.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.values.len() * ELEMENT_BYTES);
        for v in &self.values {
            out.extend_from_slice(&v.value().to_le_bytes());
        }
        out
    }

    /// Parse a share body for evaluation point `x`.
    pub fn decode(x: u16, bytes: &[u8]) -> Result<Self> {
        if bytes.len() % ELEMENT_BYTES != 0 {
            return Err(Error::MalformedShare {
                x,
                reason: format!("odd body length {}", bytes.len()),
            });
        }

        let values = bytes
            .chunks_exact(ELEMENT_BYTES)
            .enumerate()
            .map(|(i, pair)| {
                let raw = u16::from_le_bytes([pair[0], pair[1]]);
                Gf257::new(raw).map_err(|_| Error::MalformedShare {
                    x,
                    reason: format!("element {i} = {raw} is not below {PRIME}"),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(x, values)
    }
}

/// File name a store uses for the share at point `x`.
pub fn share_file_name(x: u16) -> String {
    format!("{FILE_PREFIX}{x}{FILE_SUFFIX}")
}

/// Recover the evaluation point from a share file name.
///
/// Only the exact form [`share_file_name`] produces is accepted, so the
/// returned point always maps back to the same file.
pub fn parse_share_file_name(name: &str) -> Option<u16> {
    let digits = name.strip_prefix(FILE_PREFIX)?.strip_suffix(FILE_SUFFIX)?;
    if digits.is_empty() || digits.starts_with('0') || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match digits.parse::<u16>() {
        Ok(x) if (1..=MAX_SHARES).contains(&x) => Some(x),
        _ => None,
    }
}
