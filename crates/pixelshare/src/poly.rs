//! polynomial evaluation and lagrange interpolation at zero over GF(257)

use pixelshare_field::{FieldElement, Gf257};

use crate::Result;

/// Table of `x^j` for `x` in `points` and `j < degree + 1`.
///
/// Row `i` holds the powers of `points[i]`; splitting evaluates every byte's
/// polynomial at the same points, so the table is built once per split.
pub fn power_table(points: impl IntoIterator<Item = u16>, terms: usize) -> Vec<Vec<Gf257>> {
    points
        .into_iter()
        .map(|x| {
            let x = Gf257::reduce(x as u32);
            (0..terms as u32).map(|j| x.pow(j)).collect()
        })
        .collect()
}

/// `Σ coeffs[j] * x^j` with `powers[j] = x^j`.
///
/// Coefficients are bytes: `coeffs[0]` is the secret, the rest are random.
pub fn evaluate(coeffs: &[u8], powers: &[Gf257]) -> Gf257 {
    debug_assert_eq!(coeffs.len(), powers.len());
    coeffs
        .iter()
        .zip(powers)
        .fold(Gf257::zero(), |acc, (&a, p)| acc.add(&Gf257::from_byte(a).mul(p)))
}

/// Lagrange basis values at zero for the given evaluation points.
///
/// `L_m(0) = Π_{j≠m} (0 - x_j) / (x_m - x_j)`. Points must be distinct;
/// a collision makes a denominator zero and surfaces as a domain error.
pub fn lagrange_at_zero(points: &[u16]) -> Result<Vec<Gf257>> {
    let xs: Vec<Gf257> = points.iter().map(|&x| Gf257::reduce(x as u32)).collect();

    let mut basis = Vec::with_capacity(xs.len());
    for (m, xm) in xs.iter().enumerate() {
        let mut num = Gf257::one();
        let mut den = Gf257::one();
        for (j, xj) in xs.iter().enumerate() {
            if j != m {
                num = num.mul(&xj.neg());
                den = den.mul(&xm.sub(xj));
            }
        }
        basis.push(num.div(&den)?);
    }

    Ok(basis)
}

/// Interpolate `f(0)` from `(basis_m, y_m)` pairs.
pub fn combine(basis: &[Gf257], ys: impl IntoIterator<Item = Gf257>) -> Gf257 {
    basis
        .iter()
        .zip(ys)
        .fold(Gf257::zero(), |acc, (l, y)| acc.add(&l.mul(&y)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use pixelshare_field::FieldError;

    fn el(v: u16) -> Gf257 {
        Gf257::new(v).unwrap()
    }

    #[test]
    fn test_evaluate() {
        // f(x) = 5 + 2x + 3x^2; f(2) = 5 + 4 + 12 = 21
        let table = power_table([2], 3);
        assert_eq!(evaluate(&[5, 2, 3], &table[0]), el(21));
    }

    #[test]
    fn test_evaluate_reaches_256() {
        // f(x) = 255 + x + 0x^2 at x = 1
        let table = power_table([1], 3);
        assert_eq!(evaluate(&[255, 1, 0], &table[0]).value(), 256);
    }

    #[test]
    fn test_lagrange_two_points() {
        // Q = {1, 2}: L_1 = 2, L_2 = -1
        let basis = lagrange_at_zero(&[1, 2]).unwrap();
        assert_eq!(basis, vec![el(2), el(256)]);
    }

    #[test]
    fn test_lagrange_three_points() {
        // Q = {1, 2, 3}: L = 3, -3, 1
        let basis = lagrange_at_zero(&[1, 2, 3]).unwrap();
        assert_eq!(basis, vec![el(3), el(254), el(1)]);
    }

    #[test]
    fn test_partition_of_unity() {
        for k in 2..=20u16 {
            let points: Vec<u16> = (1..=k).collect();
            let basis = lagrange_at_zero(&points).unwrap();
            let sum = basis.iter().fold(Gf257::zero(), |acc, l| acc.add(l));
            assert_eq!(sum, Gf257::one(), "basis should sum to 1 for k={}", k);
        }
    }

    #[test]
    fn test_interpolates_non_consecutive_points() {
        // f(x) = 1 + 2x + 3x^2 sampled at 1, 3, 5
        let coeffs = [1u8, 2, 3];
        let table = power_table([1, 3, 5], 3);
        let ys: Vec<Gf257> = table.iter().map(|row| evaluate(&coeffs, row)).collect();

        let basis = lagrange_at_zero(&[1, 3, 5]).unwrap();
        assert_eq!(combine(&basis, ys), el(1));
    }

    #[test]
    fn test_colliding_points_are_a_domain_error() {
        assert!(matches!(
            lagrange_at_zero(&[2, 2]),
            Err(Error::Domain(FieldError::ZeroInverse))
        ));
        // 258 is 1 in the field
        assert!(matches!(
            lagrange_at_zero(&[1, 258]),
            Err(Error::Domain(FieldError::ZeroInverse))
        ));
    }
}
