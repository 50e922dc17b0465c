use thiserror::Error;

/// Reasons a sequence cannot be constructed.
///
/// These are only ever produced while building a [`Seq`](crate::Seq) (or seeking
/// one). Iteration itself cannot fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum Error {
    /// The lower bound is above the upper bound.
    #[error("range {min}..={max} is empty: min must not exceed max")]
    InvalidBounds { min: u64, max: u64 },

    /// The modulus does not exceed the number of values in the range, or is not prime.
    #[error("modulus {modulus} must be a prime greater than the range width {width}")]
    InvalidModulus { modulus: u64, width: u64 },

    /// The multiplier is not below the modulus.
    #[error("multiplier {mult} must be below the modulus {modulus}")]
    InvalidMultiplier { mult: u64, modulus: u64 },

    /// The starting value lies outside the range.
    #[error("start {start} lies outside {min}..={max}")]
    InvalidStart { start: u64, min: u64, max: u64 },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
