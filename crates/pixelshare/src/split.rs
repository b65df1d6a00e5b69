//! split a pixel buffer into n shares
//!
//! every byte gets its own degree-(k-1) polynomial whose constant term is the
//! byte and whose other coefficients are random bytes. share `x` stores the
//! polynomial evaluated at `x` for every byte position.
//!
//! the buffer is cut into contiguous chunks; each chunk owns a disjoint slice
//! of the output and its own chacha20 stream seeded from the split's generator,
//! so chunks run in parallel without locks or a shared rng.

use pixelshare_field::{FieldElement, Gf257};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use tracing::debug;
use zeroize::Zeroizing;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::{SharingConfig, DEFAULT_CHUNK_SIZE};
use crate::metadata::SplitMetadata;
use crate::pixel::PixelBuffer;
use crate::poly::{evaluate, power_table};
use crate::reconstruct::ShareBundle;
use crate::scheme::Scheme;
use crate::share::ShareRecord;
use crate::{Error, Result};

type ChunkSeed = [u8; 32];

/// Everything a split produces: the public metadata and one share per point.
#[derive(Debug, Clone)]
pub struct SplitOutput {
    pub metadata: SplitMetadata,
    pub shares: Vec<ShareRecord>,
}

impl SplitOutput {
    pub fn share(&self, x: u16) -> Option<&ShareRecord> {
        self.shares.iter().find(|s| s.x() == x)
    }

    /// Bundle the metadata with the shares at `points`, as a holder subset would.
    pub fn bundle(&self, points: &[u16]) -> ShareBundle {
        let mut bundle = ShareBundle::with_metadata(self.metadata.clone());
        bundle.extend(
            self.shares
                .iter()
                .filter(|s| points.contains(&s.x()))
                .cloned(),
        );
        bundle
    }
}

/// Splits pixel buffers under a fixed scheme.
#[derive(Debug, Clone)]
pub struct Splitter {
    scheme: Scheme,
    chunk_size: usize,
}

impl Splitter {
    pub fn new(scheme: Scheme) -> Self {
        Self {
            scheme,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    pub fn from_config(config: &SharingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config.scheme()?).with_chunk_size(config.chunk_size))
    }

    /// Input bytes handled per worker task.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Split with a fresh generator seeded from the OS.
    pub fn split(&self, image: &PixelBuffer) -> Result<SplitOutput> {
        let mut rng = ChaCha20Rng::from_rng(OsRng).map_err(|e| Error::Entropy(e.to_string()))?;
        self.split_with_rng(image, &mut rng)
    }

    /// Split drawing all coefficient randomness from `rng`.
    pub fn split_with_rng<R: RngCore + CryptoRng>(
        &self,
        image: &PixelBuffer,
        rng: &mut R,
    ) -> Result<SplitOutput> {
        let k = self.scheme.threshold() as usize;
        let n = self.scheme.shares() as usize;
        let len = image.len();
        let chunk = self.chunk_size;

        let total = len
            .checked_mul(n)
            .ok_or_else(|| Error::Config(format!("{len} bytes x {n} shares overflows")))?;

        let table = power_table(self.scheme.points(), k);

        let mut seeds: Zeroizing<Vec<ChunkSeed>> = Zeroizing::new(vec![[0u8; 32]; len.div_ceil(chunk)]);
        for seed in seeds.iter_mut() {
            rng.fill_bytes(seed);
        }

        debug!(
            threshold = k,
            shares = n,
            bytes = len,
            chunks = seeds.len(),
            "splitting pixel buffer"
        );

        // byte-major: evals[i * n + (x - 1)]
        let mut evals = vec![Gf257::zero(); total];
        split_chunks(image.bytes(), &mut evals, &seeds, &table, k, chunk);

        let shares = columns(&evals, n)
            .into_iter()
            .zip(self.scheme.points())
            .map(|(values, x)| ShareRecord::new(x, values))
            .collect::<Result<Vec<_>>>()?;

        Ok(SplitOutput {
            metadata: SplitMetadata::new(image.mode(), image.width(), image.height(), self.scheme),
            shares,
        })
    }
}

/// Split `image` under `scheme` with default settings.
pub fn split(image: &PixelBuffer, scheme: Scheme) -> Result<SplitOutput> {
    Splitter::new(scheme).split(image)
}

fn split_chunk(src: &[u8], dst: &mut [Gf257], table: &[Vec<Gf257>], threshold: usize, seed: &ChunkSeed) {
    let mut rng = ChaCha20Rng::from_seed(*seed);
    let mut coeffs = Zeroizing::new(vec![0u8; threshold]);

    for (&byte, row) in src.iter().zip(dst.chunks_exact_mut(table.len())) {
        coeffs[0] = byte;
        rng.fill_bytes(&mut coeffs[1..]);
        for (slot, powers) in row.iter_mut().zip(table) {
            *slot = evaluate(&coeffs, powers);
        }
    }
}

#[cfg(feature = "parallel")]
fn split_chunks(
    bytes: &[u8],
    evals: &mut [Gf257],
    seeds: &[ChunkSeed],
    table: &[Vec<Gf257>],
    threshold: usize,
    chunk: usize,
) {
    bytes
        .par_chunks(chunk)
        .zip(evals.par_chunks_mut(chunk * table.len()))
        .zip(seeds.par_iter())
        .for_each(|((src, dst), seed)| split_chunk(src, dst, table, threshold, seed));
}

#[cfg(not(feature = "parallel"))]
fn split_chunks(
    bytes: &[u8],
    evals: &mut [Gf257],
    seeds: &[ChunkSeed],
    table: &[Vec<Gf257>],
    threshold: usize,
    chunk: usize,
) {
    bytes
        .chunks(chunk)
        .zip(evals.chunks_mut(chunk * table.len()))
        .zip(seeds.iter())
        .for_each(|((src, dst), seed)| split_chunk(src, dst, table, threshold, seed));
}

/// Gather column `x - 1` of the byte-major table into share `x`.
#[cfg(feature = "parallel")]
fn columns(evals: &[Gf257], n: usize) -> Vec<Vec<Gf257>> {
    (0..n)
        .into_par_iter()
        .map(|col| evals.iter().skip(col).step_by(n).copied().collect())
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn columns(evals: &[Gf257], n: usize) -> Vec<Vec<Gf257>> {
    (0..n)
        .map(|col| evals.iter().skip(col).step_by(n).copied().collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::PixelMode;

    fn image(len_pixels: u32) -> PixelBuffer {
        let bytes = (0..len_pixels * 3).map(|i| (i * 7 % 256) as u8).collect();
        PixelBuffer::new(PixelMode::Rgb, len_pixels, 1, bytes).unwrap()
    }

    #[test]
    fn test_shape() {
        let out = split(&image(4), Scheme::new(2, 3).unwrap()).unwrap();
        assert_eq!(out.shares.len(), 3);
        for (i, share) in out.shares.iter().enumerate() {
            assert_eq!(share.x() as usize, i + 1);
            assert_eq!(share.len(), 12);
        }
        assert_eq!(out.metadata.size, [4, 1]);
    }

    #[test]
    fn test_seeded_split_is_deterministic() {
        let splitter = Splitter::new(Scheme::new(3, 5).unwrap()).with_chunk_size(5);
        let img = image(20);
        let a = splitter
            .split_with_rng(&img, &mut ChaCha20Rng::seed_from_u64(7))
            .unwrap();
        let b = splitter
            .split_with_rng(&img, &mut ChaCha20Rng::seed_from_u64(7))
            .unwrap();
        assert_eq!(a.shares, b.shares);

        let c = splitter
            .split_with_rng(&img, &mut ChaCha20Rng::seed_from_u64(8))
            .unwrap();
        assert_ne!(a.shares, c.shares);
    }

    #[test]
    fn test_chunk_size_does_not_change_validity() {
        let img = image(33);
        for chunk in [1, 2, 7, 64, 1 << 20] {
            let out = Splitter::new(Scheme::new(2, 4).unwrap())
                .with_chunk_size(chunk)
                .split(&img)
                .unwrap();
            let recovered = out.bundle(&[2, 4]).reconstruct().unwrap();
            assert_eq!(recovered, img, "chunk size {}", chunk);
        }
    }

    #[test]
    fn test_single_share_differs_from_secret() {
        // with random coefficients, a share copying a 300-byte secret verbatim is negligible
        let img = image(100);
        let out = split(&img, Scheme::new(2, 2).unwrap()).unwrap();
        let verbatim = out.shares[0]
            .values()
            .iter()
            .zip(img.bytes())
            .all(|(v, &b)| v.value() == b as u16);
        assert!(!verbatim);
    }

    #[test]
    fn test_empty_buffer() {
        let img = PixelBuffer::new(PixelMode::L, 0, 0, vec![]).unwrap();
        let out = split(&img, Scheme::new(2, 3).unwrap()).unwrap();
        assert!(out.shares.iter().all(|s| s.is_empty()));
    }
}
