//! Lazy pseudo-random permutations of integer ranges in constant memory.
//!
//! Given a prime `modulus` and one of its primitive roots `mult`, the recurrence
//! `r -> r * mult mod modulus` visits every residue in `1..modulus` exactly once
//! before returning to where it began. Choosing a modulus larger than the number
//! of values in `min..=max` and skipping the residues that fall past `max` turns
//! that cycle into a shuffle of the range. The order is fully determined by the
//! five [`Params`], so it can be reproduced later without storing anything else.
//!
//! Use [`derive`] to pick a modulus and multiplier for a range, then build a
//! [`Seq`]. A [`Seq`] is a single-threaded state machine; wrap it in a
//! [`SyncSeq`] to drain it from several threads at once.
//!
//! ```
//! use rangeshuf::{derive, Seq};
//!
//! let params = derive(1, 10, 4);
//! let order: Vec<u64> = Seq::from_params(params).unwrap().collect();
//!
//! assert_eq!(order.len(), 10);
//! assert_eq!(order[0], 4);
//! assert_eq!(order, Seq::from_params(params).unwrap().collect::<Vec<_>>());
//! ```
//!
//! This is a shuffle, not a source of secure randomness.

mod calc;
mod error;
mod lock;
mod roots;
mod seq;
mod sieve;
mod sync;

#[cfg(feature = "rayon")]
mod rayon;

pub use calc::{derive, Derivation, Params};
pub use error::{Error, Result};
pub use roots::{gcd, is_prime, mod_exp, mod_mul, prime_factors, primitive_root, primitive_roots};
pub use seq::{Seq, SeqConfig};
pub use sieve::primes_past;
pub use sync::SyncSeq;

/// Common interface of [`Seq`] and [`SyncSeq`].
pub trait Shuffle {
    /// Produces the next value of the permutation and whether there was one.
    ///
    /// When the second element is `false` the sequence is finished and the first
    /// element must be ignored. Further calls keep returning `false`.
    fn advance(&mut self) -> (u64, bool);

    /// The parameters that reproduce this sequence.
    fn params(&self) -> Params;

    fn mult(&self) -> u64 {
        self.params().mult
    }

    fn modulus(&self) -> u64 {
        self.params().modulus
    }

    fn range_min(&self) -> u64 {
        self.params().min
    }

    fn range_max(&self) -> u64 {
        self.params().max
    }

    fn start(&self) -> u64 {
        self.params().start
    }
}
