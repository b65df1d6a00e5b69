//! field error types

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FieldError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldError {
    /// Only reachable when two evaluation points collide.
    #[error("domain error: zero has no multiplicative inverse")]
    ZeroInverse,

    #[error("value {value} is not a reduced element of GF({modulus})")]
    OutOfRange { value: u16, modulus: u16 },
}
