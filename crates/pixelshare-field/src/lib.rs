//! Prime field arithmetic for byte-wise threshold sharing
//!
//! Every byte value `0..=255` must map to a distinct field element, so the
//! modulus has to be a prime above 255. The smallest such prime is 257 and
//! that is the field the codec runs in ([`Gf257`]). The element type is
//! generic over its modulus, but the "prime above 255" requirement is checked
//! at compile time whenever a modulus is instantiated.
//!
//! Inverses use Fermat's little theorem: `d^(p-2) = d^(-1) mod p` for `d != 0`.

mod elem;
mod error;

pub use elem::{Fp, Gf257};
pub use error::{FieldError, Result};

/// The modulus used by the image codec.
pub const PRIME: u16 = 257;

/// Common interface for prime field elements.
pub trait FieldElement:
    Send + Sync + Sized + Copy + Clone + Default + PartialEq + Eq + std::fmt::Debug
{
    /// Additive identity
    fn zero() -> Self;

    /// Multiplicative identity
    fn one() -> Self;

    fn add(&self, other: &Self) -> Self;

    fn sub(&self, other: &Self) -> Self;

    fn neg(&self) -> Self;

    fn mul(&self, other: &Self) -> Self;

    /// Raise to a non-negative integer power.
    fn pow(&self, exp: u32) -> Self;

    /// Multiplicative inverse; fails for zero.
    fn inv(&self) -> Result<Self>;

    /// Field division `self / other`; fails when `other` is zero.
    fn div(&self, other: &Self) -> Result<Self> {
        Ok(self.mul(&other.inv()?))
    }
}

/// Modular exponentiation by square-and-multiply.
///
/// `base` does not need to be reduced. Returns `1 % modulus` for a zero exponent.
pub const fn pow_mod(base: u32, mut exp: u32, modulus: u32) -> u32 {
    let m = modulus as u64;
    let mut result = 1 % m;
    let mut base = base as u64 % m;

    while exp > 0 {
        if exp & 1 == 1 {
            result = result * base % m;
        }
        base = base * base % m;
        exp >>= 1;
    }

    result as u32
}

/// Trial-division primality test, usable in const context.
pub const fn is_prime(n: u32) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }
    let mut d = 3;
    while d * d <= n {
        if n % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pow_mod() {
        assert_eq!(pow_mod(2, 0, 257), 1);
        assert_eq!(pow_mod(2, 8, 257), 256);
        assert_eq!(pow_mod(2, 16, 257), 1); // 2 has order 16 mod 257
        assert_eq!(pow_mod(300, 1, 257), 43);
        assert_eq!(pow_mod(5, 3, 1), 0);
    }

    #[test]
    fn test_is_prime() {
        assert!(is_prime(2));
        assert!(is_prime(257));
        assert!(is_prime(65521));
        assert!(!is_prime(0));
        assert!(!is_prime(1));
        assert!(!is_prime(256));
        assert!(!is_prime(259)); // 7 * 37
    }

    #[test]
    fn test_fermat_inverse_matches_pow_mod() {
        for d in 1..257u32 {
            let inv = pow_mod(d, 255, 257);
            assert_eq!(d * inv % 257, 1, "bad inverse for {}", d);
        }
    }

    #[test]
    fn test_field_axioms() {
        macro_rules! test_field {
            ($elem:ty, $val1:expr, $val2:expr, $val3:expr) => {
                let a = <$elem>::new($val1).unwrap();
                let b = <$elem>::new($val2).unwrap();
                let c = <$elem>::new($val3).unwrap();

                // associativity
                assert_eq!(a.add(&b.add(&c)), a.add(&b).add(&c));
                assert_eq!(a.mul(&b.mul(&c)), a.mul(&b).mul(&c));

                // commutativity
                assert_eq!(a.add(&b), b.add(&a));
                assert_eq!(a.mul(&b), b.mul(&a));

                // distributivity
                assert_eq!(a.mul(&b.add(&c)), a.mul(&b).add(&a.mul(&c)));

                // identities
                assert_eq!(a.add(&<$elem>::zero()), a);
                assert_eq!(a.mul(&<$elem>::one()), a);

                // inverses
                assert_eq!(a.add(&a.neg()), <$elem>::zero());
                assert_eq!(a.sub(&b).add(&b), a);
                if a != <$elem>::zero() {
                    assert_eq!(a.mul(&a.inv().unwrap()), <$elem>::one());
                }
            };
        }

        test_field!(Gf257, 3, 200, 256);
        test_field!(Gf257, 256, 256, 1);
        test_field!(Fp<263>, 17, 262, 100);
        test_field!(Fp<65521>, 65520, 12345, 2);
    }
}
