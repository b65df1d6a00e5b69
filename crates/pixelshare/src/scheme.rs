//! (k, n) threshold parameters

use pixelshare_field::PRIME;

use crate::{Error, Result};

/// Smallest useful threshold; k = 1 would hand the secret to every holder.
pub const MIN_THRESHOLD: u16 = 2;

/// Evaluation points are `1..=n` and must be distinct non-zero field elements.
pub const MAX_SHARES: u16 = PRIME - 1;

/// A validated threshold scheme: any `threshold` of `shares` reconstruct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scheme {
    threshold: u16,
    shares: u16,
}

impl Scheme {
    pub fn new(threshold: u16, shares: u16) -> Result<Self> {
        if threshold < MIN_THRESHOLD {
            return Err(Error::Config(format!(
                "threshold {threshold} must be at least {MIN_THRESHOLD}"
            )));
        }
        if threshold > shares {
            return Err(Error::Config(format!(
                "threshold {threshold} exceeds total shares {shares}"
            )));
        }
        if shares > MAX_SHARES {
            return Err(Error::Config(format!(
                "{shares} shares requested, at most {MAX_SHARES} evaluation points exist"
            )));
        }
        Ok(Self { threshold, shares })
    }

    pub fn threshold(&self) -> u16 {
        self.threshold
    }

    pub fn shares(&self) -> u16 {
        self.shares
    }

    /// Evaluation points handed out by a split, in order.
    pub fn points(&self) -> impl Iterator<Item = u16> {
        1..=self.shares
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_schemes() {
        assert!(Scheme::new(2, 2).is_ok());
        assert!(Scheme::new(3, 5).is_ok());
        assert!(Scheme::new(2, MAX_SHARES).is_ok());
        assert_eq!(Scheme::new(2, 3).unwrap().points().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_rejects_bad_schemes() {
        for (k, n) in [(0, 3), (1, 3), (4, 3), (2, MAX_SHARES + 1)] {
            assert!(
                matches!(Scheme::new(k, n), Err(Error::Config(_))),
                "({k}, {n}) should be rejected"
            );
        }
    }
}
