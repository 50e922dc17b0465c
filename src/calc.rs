use crate::roots::{mod_exp, prime_factors, primitive_root, primitive_roots};
use crate::sieve::{isqrt, primes_past};
use once_cell::sync::OnceCell;
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The five values that fully determine a sequence.
///
/// Feeding the same `Params` to [`Seq::from_params`](crate::Seq::from_params)
/// always reproduces the same order. A `start` of 0 means "pick one at random".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Params {
    pub mult: u64,
    pub modulus: u64,
    pub min: u64,
    pub max: u64,
    pub start: u64,
}

impl Params {
    /// Distance between the bounds, in either order.
    pub fn span(&self) -> u64 {
        self.max.abs_diff(self.min)
    }

    /// Number of values in the range, saturating at `u64::MAX`.
    pub fn width(&self) -> u64 {
        self.span().saturating_add(1)
    }
}

/// Picks a modulus and multiplier for the range `range_min..=range_max`.
///
/// The bounds may be given in either order. `start` is passed through untouched.
/// The choice is deterministic: the modulus is the first prime past the width of
/// the range and the multiplier sits two thirds of the way into its list of
/// primitive roots.
///
/// # Examples
///
/// ```
/// use rangeshuf::derive;
///
/// let params = derive(1, 3, 0);
/// assert_eq!((params.mult, params.modulus), (3, 5));
/// ```
pub fn derive(range_min: u64, range_max: u64, start: u64) -> Params {
    let (min, max) = if range_max < range_min {
        (range_max, range_min)
    } else {
        (range_min, range_max)
    };

    let derivation = Derivation::for_range(min, max);
    let params = Params {
        mult: derivation.multiplier(),
        modulus: derivation.modulus(),
        min,
        max,
        start,
    };

    debug!(
        min,
        max,
        mult = params.mult,
        modulus = params.modulus,
        start,
        "derived sequence parameters"
    );

    params
}

/// Number theory behind a modulus, kept around so it can be reused.
///
/// Holds the sieved primes, the factors of the totient and the smallest primitive
/// root. The full list of roots is only enumerated if [`roots`](Self::roots) is
/// called.
#[derive(Debug)]
pub struct Derivation {
    primes: Vec<u64>,
    modulus: u64,
    factors: Vec<u64>,
    generator: Option<u64>,
    roots: OnceCell<Vec<u64>>,
}

impl Derivation {
    /// Derives the smallest usable modulus for `min..=max`, in either order.
    pub fn for_range(min: u64, max: u64) -> Self {
        let span = if max < min { min - max } else { max - min };
        let primes = primes_past(span.saturating_add(1));

        // Degenerate single-value ranges get the one-element group mod 2.
        let modulus = primes.last().copied().unwrap_or(2);

        Self::new(primes, modulus)
    }

    /// Prepares a derivation for a modulus chosen elsewhere.
    ///
    /// Sieves far enough to both cover a range of `width` values and fully factor
    /// `modulus - 1`.
    pub fn for_modulus(width: u64, modulus: u64) -> Self {
        let bound = width.max(isqrt(modulus.saturating_sub(1)));
        Self::new(primes_past(bound), modulus)
    }

    fn new(primes: Vec<u64>, modulus: u64) -> Self {
        let factors = prime_factors(modulus.saturating_sub(1), &primes);
        let generator = primitive_root(modulus, &primes);

        Self {
            primes,
            modulus,
            factors,
            generator,
            roots: OnceCell::new(),
        }
    }

    /// Primes found while sieving, ascending.
    pub fn primes(&self) -> &[u64] {
        &self.primes
    }

    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    /// The smallest primitive root of the modulus.
    pub fn generator(&self) -> Option<u64> {
        self.generator
    }

    /// Every primitive root of the modulus, in the order of their exponent relative
    /// to [`generator`](Self::generator). Computed on first use.
    pub fn roots(&self) -> &[u64] {
        self.roots
            .get_or_init(|| primitive_roots(self.modulus, &self.primes).unwrap_or_default())
    }

    /// Whether the modulus is large enough for the range `min..=max`, i.e. whether
    /// it exceeds the number of values in it.
    pub fn covers(&self, min: u64, max: u64) -> bool {
        min <= max && max - min < self.modulus.saturating_sub(1)
    }

    /// The root two thirds of the way into [`roots`](Self::roots).
    ///
    /// Walks the exponents instead of materializing the list. Falls back to 1
    /// when the modulus has no primitive root.
    pub fn multiplier(&self) -> u64 {
        let generator = match self.generator {
            Some(generator) => generator,
            None => return 1,
        };

        if let Some(roots) = self.roots.get() {
            return roots.get(roots.len() * 2 / 3).copied().unwrap_or(1);
        }

        let s = self.modulus - 1;
        let count = self.factors.iter().fold(s, |phi, f| phi / f * (f - 1));
        let target = count * 2 / 3;

        (1..self.modulus)
            .filter(|k| self.factors.iter().all(|f| k % f != 0))
            .nth(target as usize)
            .map_or(generator, |k| mod_exp(generator, k, self.modulus))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_range() {
        assert_eq!(
            derive(1, 3, 0),
            Params {
                mult: 3,
                modulus: 5,
                min: 1,
                max: 3,
                start: 0
            }
        );
        assert_eq!(derive(4, 7, 5).modulus, 5);
        assert_eq!(derive(4, 7, 5).mult, 3);
    }

    #[test]
    fn bounds_are_normalized() {
        let params = derive(7, 4, 6);
        assert_eq!((params.min, params.max, params.start), (4, 7, 6));
        assert_eq!(params, derive(4, 7, 6));
    }

    #[test]
    fn single_value_falls_back_to_trivial_group() {
        let params = derive(9, 9, 0);
        assert_eq!((params.mult, params.modulus), (1, 2));
    }

    #[test]
    fn two_values() {
        // width 2, first prime past it is 3 with the single root 2.
        let params = derive(10, 11, 0);
        assert_eq!((params.mult, params.modulus), (2, 3));
    }

    #[test]
    fn modulus_exceeds_width() {
        for max in 0..300 {
            let params = derive(0, max, 0);
            assert!(params.modulus > params.width());
        }
    }

    #[test]
    fn deterministic() {
        assert_eq!(derive(1000, 50_000, 0), derive(1000, 50_000, 0));
    }

    #[test]
    fn multiplier_walk_matches_root_list() {
        for max in 1..200 {
            let walked = Derivation::for_range(0, max);
            let listed = Derivation::for_range(0, max);
            let roots = listed.roots();

            assert_eq!(walked.multiplier(), roots[roots.len() * 2 / 3]);
            assert_eq!(listed.multiplier(), walked.multiplier());
        }
    }

    #[test]
    fn foreign_modulus_is_fully_factored() {
        // 1_000_003 - 1 = 2 * 3 * 166_667, far beyond what a width of 10 sieves.
        let derivation = Derivation::for_modulus(10, 1_000_003);
        assert!(derivation.covers(0, 9));
        assert_eq!(derivation.generator(), Some(2));
    }

    #[test]
    fn span_of_swapped_bounds() {
        let params = Params {
            mult: 3,
            modulus: 5,
            min: 7,
            max: 4,
            start: 0,
        };
        assert_eq!(params.span(), 3);
        assert_eq!(params.width(), 4);
    }

    #[test]
    fn covers() {
        let derivation = Derivation::for_range(4, 7);
        assert_eq!(derivation.modulus(), 5);
        assert!(derivation.covers(0, 3));
        assert!(derivation.covers(10, 12));
        assert!(!derivation.covers(0, 4));
        assert!(!derivation.covers(5, 4));
    }
}
