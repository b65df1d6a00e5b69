//! rebuild a pixel buffer from k shares
//!
//! shares are validated as a set before any arithmetic: duplicates, points
//! outside the split, and length disagreements are rejected up front. when
//! more than k shares are supplied the k with the lowest evaluation points are
//! used, so the result never depends on the order shares were gathered in.

use pixelshare_field::Gf257;
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::{SharingConfig, DEFAULT_CHUNK_SIZE};
use crate::metadata::SplitMetadata;
use crate::pixel::PixelBuffer;
use crate::poly::{combine, lagrange_at_zero};
use crate::share::ShareRecord;
use crate::{Error, Result};

/// Shares and (optionally) metadata gathered for a reconstruction attempt,
/// e.g. from an upload or a share directory.
#[derive(Debug, Clone, Default)]
pub struct ShareBundle {
    metadata: Option<SplitMetadata>,
    shares: Vec<ShareRecord>,
}

impl ShareBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metadata(metadata: SplitMetadata) -> Self {
        Self {
            metadata: Some(metadata),
            shares: Vec::new(),
        }
    }

    pub fn set_metadata(&mut self, metadata: SplitMetadata) {
        self.metadata = Some(metadata);
    }

    pub fn add_share(&mut self, share: ShareRecord) {
        self.shares.push(share);
    }

    pub fn metadata(&self) -> Option<&SplitMetadata> {
        self.metadata.as_ref()
    }

    pub fn shares(&self) -> &[ShareRecord] {
        &self.shares
    }

    /// Evaluation points present, sorted.
    pub fn points(&self) -> Vec<u16> {
        let mut points: Vec<u16> = self.shares.iter().map(|s| s.x()).collect();
        points.sort_unstable();
        points
    }

    /// Whether [`reconstruct`](Self::reconstruct) has what it needs.
    pub fn is_recoverable(&self) -> bool {
        match &self.metadata {
            Some(meta) => select_shares(meta, &self.shares).is_ok(),
            None => false,
        }
    }

    pub fn reconstruct(&self) -> Result<PixelBuffer> {
        Reconstructor::new().reconstruct_bundle(self)
    }
}

impl Extend<ShareRecord> for ShareBundle {
    fn extend<I: IntoIterator<Item = ShareRecord>>(&mut self, iter: I) {
        self.shares.extend(iter);
    }
}

/// Pick the shares to interpolate with: the `k` lowest evaluation points,
/// after checking the whole set is consistent with `metadata`.
pub fn select_shares<'a>(
    metadata: &SplitMetadata,
    shares: &'a [ShareRecord],
) -> Result<Vec<&'a ShareRecord>> {
    let scheme = metadata.scheme()?;
    let expected = metadata.byte_len()?;

    let mut sorted: Vec<&ShareRecord> = shares.iter().collect();
    sorted.sort_by_key(|s| s.x());

    if let Some(pair) = sorted.windows(2).find(|w| w[0].x() == w[1].x()) {
        return Err(Error::DuplicateShare { x: pair[0].x() });
    }

    for share in &sorted {
        if share.x() > scheme.shares() {
            return Err(Error::InvalidEvaluationPoint {
                x: share.x(),
                shares: scheme.shares(),
            });
        }
        if share.len() != expected {
            return Err(Error::LengthMismatch {
                x: share.x(),
                expected,
                actual: share.len(),
            });
        }
    }

    let required = scheme.threshold();
    if sorted.len() < required as usize {
        return Err(Error::InsufficientShares {
            required,
            supplied: sorted.len(),
            present: sorted.iter().map(|s| s.x()).collect(),
        });
    }

    if sorted.len() > required as usize {
        let unused: Vec<u16> = sorted[required as usize..].iter().map(|s| s.x()).collect();
        debug!(?unused, required, "more shares than needed, using lowest points");
        sorted.truncate(required as usize);
    }

    Ok(sorted)
}

/// Reconstructs pixel buffers from validated share sets.
#[derive(Debug, Clone)]
pub struct Reconstructor {
    chunk_size: usize,
}

impl Default for Reconstructor {
    fn default() -> Self {
        Self::new()
    }
}

impl Reconstructor {
    pub fn new() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    pub fn from_config(config: &SharingConfig) -> Self {
        Self::new().with_chunk_size(config.chunk_size)
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn reconstruct_bundle(&self, bundle: &ShareBundle) -> Result<PixelBuffer> {
        let metadata = bundle.metadata().ok_or(Error::MissingMetadata)?;
        self.reconstruct(metadata, bundle.shares())
    }

    pub fn reconstruct(&self, metadata: &SplitMetadata, shares: &[ShareRecord]) -> Result<PixelBuffer> {
        let selected = select_shares(metadata, shares)?;
        let points: Vec<u16> = selected.iter().map(|s| s.x()).collect();
        let basis = lagrange_at_zero(&points)?;
        let len = metadata.byte_len()?;

        debug!(?points, bytes = len, "reconstructing pixel buffer");

        let mut out = vec![0u8; len];
        if let Some((offset, value)) = reconstruct_chunks(&mut out, &selected, &basis, self.chunk_size) {
            return Err(Error::ReconstructionRange { offset, value });
        }

        PixelBuffer::new(metadata.mode, metadata.width(), metadata.height(), out)
    }
}

/// Reconstruct with default settings.
pub fn reconstruct(metadata: &SplitMetadata, shares: &[ShareRecord]) -> Result<PixelBuffer> {
    Reconstructor::new().reconstruct(metadata, shares)
}

/// Interpolate one chunk; returns the first out-of-range `(offset, value)`.
fn reconstruct_chunk(
    offset: usize,
    dst: &mut [u8],
    selected: &[&ShareRecord],
    basis: &[Gf257],
) -> Option<(usize, u16)> {
    for (i, slot) in dst.iter_mut().enumerate() {
        let pos = offset + i;
        let secret = combine(basis, selected.iter().map(|s| s.values()[pos]));
        match secret.to_byte() {
            Some(byte) => *slot = byte,
            None => return Some((pos, secret.value())),
        }
    }
    None
}

/// Lowest out-of-range offset over all chunks, independent of scheduling.
#[cfg(feature = "parallel")]
fn reconstruct_chunks(
    out: &mut [u8],
    selected: &[&ShareRecord],
    basis: &[Gf257],
    chunk: usize,
) -> Option<(usize, u16)> {
    out.par_chunks_mut(chunk)
        .enumerate()
        .filter_map(|(i, dst)| reconstruct_chunk(i * chunk, dst, selected, basis))
        .min()
}

#[cfg(not(feature = "parallel"))]
fn reconstruct_chunks(
    out: &mut [u8],
    selected: &[&ShareRecord],
    basis: &[Gf257],
    chunk: usize,
) -> Option<(usize, u16)> {
    out.chunks_mut(chunk)
        .enumerate()
        .find_map(|(i, dst)| reconstruct_chunk(i * chunk, dst, selected, basis))
}
