use std::fmt;

use crate::{is_prime, pow_mod, FieldElement, FieldError, Result, PRIME};

/// Element of the prime field `Z/PZ`, always stored reduced.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fp<const P: u16>(u16);

/// The field used for image sharing.
pub type Gf257 = Fp<PRIME>;

impl<const P: u16> Fp<P> {
    /// Evaluated on first use of a modulus; a non-prime or a modulus that
    /// cannot hold every byte value fails the build.
    const MODULUS_CHECK: () = assert!(
        P > 255 && is_prime(P as u32),
        "field modulus must be a prime greater than 255"
    );

    pub const MODULUS: u16 = P;

    /// Create from an already-reduced value.
    pub fn new(value: u16) -> Result<Self> {
        let () = Self::MODULUS_CHECK;
        if value >= P {
            return Err(FieldError::OutOfRange { value, modulus: P });
        }
        Ok(Self(value))
    }

    /// Embed a byte. Infallible because the modulus exceeds 255.
    pub const fn from_byte(byte: u8) -> Self {
        let () = Self::MODULUS_CHECK;
        Self(byte as u16)
    }

    /// Reduce an arbitrary integer into the field.
    pub const fn reduce(value: u32) -> Self {
        let () = Self::MODULUS_CHECK;
        Self((value % P as u32) as u16)
    }

    pub const fn value(&self) -> u16 {
        self.0
    }

    /// The byte this element encodes, if it is in `0..=255`.
    pub fn to_byte(&self) -> Option<u8> {
        u8::try_from(self.0).ok()
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl<const P: u16> FieldElement for Fp<P> {
    fn zero() -> Self {
        Self::reduce(0)
    }

    fn one() -> Self {
        Self::reduce(1)
    }

    fn add(&self, other: &Self) -> Self {
        Self::reduce(self.0 as u32 + other.0 as u32)
    }

    fn sub(&self, other: &Self) -> Self {
        Self::reduce(self.0 as u32 + P as u32 - other.0 as u32)
    }

    fn neg(&self) -> Self {
        Self::reduce(P as u32 - self.0 as u32)
    }

    fn mul(&self, other: &Self) -> Self {
        Self::reduce(self.0 as u32 * other.0 as u32)
    }

    fn pow(&self, exp: u32) -> Self {
        Self::reduce(pow_mod(self.0 as u32, exp, P as u32))
    }

    fn inv(&self) -> Result<Self> {
        if self.is_zero() {
            return Err(FieldError::ZeroInverse);
        }
        // Fermat: d^(p-2) = d^(-1)
        Ok(self.pow(P as u32 - 2))
    }
}

impl<const P: u16> Default for Fp<P> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<const P: u16> fmt::Display for Fp<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<const P: u16> From<u8> for Fp<P> {
    fn from(byte: u8) -> Self {
        Self::from_byte(byte)
    }
}

impl<const P: u16> TryFrom<u16> for Fp<P> {
    type Error = FieldError;

    fn try_from(value: u16) -> Result<Self> {
        Self::new(value)
    }
}

impl<const P: u16> From<Fp<P>> for u16 {
    fn from(elem: Fp<P>) -> u16 {
        elem.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_bytes_map_to_distinct_elements() {
        let mut seen = [false; PRIME as usize];
        for b in 0..=255u8 {
            let e = Gf257::from_byte(b);
            assert!(!seen[e.value() as usize]);
            seen[e.value() as usize] = true;
            assert_eq!(e.to_byte(), Some(b));
        }
    }

    #[test]
    fn test_top_element_is_not_a_byte() {
        let top = Gf257::new(256).unwrap();
        assert_eq!(top.to_byte(), None);
        assert_eq!(top, Gf257::one().neg());
    }

    #[test]
    fn test_new_rejects_unreduced() {
        assert_eq!(
            Gf257::new(257),
            Err(FieldError::OutOfRange { value: 257, modulus: 257 })
        );
        assert!(Gf257::try_from(u16::MAX).is_err());
    }

    #[test]
    fn test_inverse_of_zero_fails() {
        assert_eq!(Gf257::zero().inv(), Err(FieldError::ZeroInverse));
        assert_eq!(
            Gf257::one().div(&Gf257::zero()),
            Err(FieldError::ZeroInverse)
        );
    }

    #[test]
    fn test_every_nonzero_element_inverts() {
        for v in 1..PRIME {
            let a = Gf257::new(v).unwrap();
            assert_eq!(a.mul(&a.inv().unwrap()), Gf257::one(), "inverse failed for {}", v);
        }
    }

    #[test]
    fn test_pow_small_powers() {
        let x = Gf257::from_byte(3);
        assert_eq!(x.pow(0), Gf257::one());
        assert_eq!(x.pow(1), x);
        assert_eq!(x.pow(4), Gf257::from_byte(81));
        // 3^5 = 243, 3^6 = 729 = 2*257 + 215
        assert_eq!(x.pow(6), Gf257::from_byte(215));
    }

    #[test]
    fn test_sub_wraps() {
        let a = Gf257::from_byte(1);
        let b = Gf257::from_byte(2);
        assert_eq!(a.sub(&b).value(), 256);
    }

    proptest! {
        #[test]
        fn prop_outputs_reduced(a in 0u16..257, b in 0u16..257, e in any::<u32>()) {
            let a = Gf257::new(a).unwrap();
            let b = Gf257::new(b).unwrap();
            prop_assert!(a.add(&b).value() < PRIME);
            prop_assert!(a.sub(&b).value() < PRIME);
            prop_assert!(a.mul(&b).value() < PRIME);
            prop_assert!(a.pow(e).value() < PRIME);
        }

        #[test]
        fn prop_matches_integer_arithmetic(a in 0u16..257, b in 0u16..257) {
            let (x, y) = (Gf257::new(a).unwrap(), Gf257::new(b).unwrap());
            prop_assert_eq!(x.add(&y).value() as u32, (a as u32 + b as u32) % 257);
            prop_assert_eq!(x.mul(&y).value() as u32, (a as u32 * b as u32) % 257);
        }

        #[test]
        fn prop_division_undoes_multiplication(a in 0u16..257, b in 1u16..257) {
            let (x, y) = (Gf257::new(a).unwrap(), Gf257::new(b).unwrap());
            prop_assert_eq!(x.mul(&y).div(&y).unwrap(), x);
        }
    }
}
