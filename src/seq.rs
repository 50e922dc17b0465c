use crate::calc::{Derivation, Params};
use crate::error::{Error, Result};
use crate::roots::{is_prime, mod_mul};
use crate::sync::SyncSeq;
use crate::Shuffle;
use core::iter::FusedIterator;
use rand::RngCore;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    NotStarted,
    Running,
    Exhausted,
}

/// Describes a sequence before it is built. Only `min` and `max` are required.
///
/// A `mult` or `modulus` of 0 is treated as unset. Unset values are derived the
/// same way [`derive`](crate::derive) does it, and an unset start is drawn from the
/// random source given to [`build_with`](Self::build_with).
///
/// # Examples
///
/// ```
/// use rangeshuf::SeqConfig;
///
/// let seq = SeqConfig::new(4, 7).mult(3).modulus(5).start(5).build().unwrap();
/// assert_eq!(seq.collect::<Vec<_>>(), vec![5, 4, 6, 7]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SeqConfig {
    min: u64,
    max: u64,
    mult: Option<u64>,
    modulus: Option<u64>,
    start: Option<u64>,
    derivation: Option<Arc<Derivation>>,
}

impl SeqConfig {
    pub fn new(min: u64, max: u64) -> Self {
        Self {
            min,
            max,
            ..Self::default()
        }
    }

    pub fn mult(mut self, mult: u64) -> Self {
        self.mult = Some(mult);
        self
    }

    pub fn modulus(mut self, modulus: u64) -> Self {
        self.modulus = Some(modulus);
        self
    }

    /// Sets the first value of the sequence. Must lie within `min..=max`.
    pub fn start(mut self, start: u64) -> Self {
        self.start = Some(start);
        self
    }

    /// Reuses previously sieved primes and roots instead of deriving them again.
    ///
    /// Ignored if the derivation does not cover the range or disagrees with an
    /// explicitly set modulus.
    pub fn derivation(mut self, derivation: Arc<Derivation>) -> Self {
        self.derivation = Some(derivation);
        self
    }

    /// Builds the sequence, drawing an unset start from the thread-local generator.
    pub fn build(self) -> Result<Seq> {
        self.build_with(&mut rand::rng())
    }

    /// Builds the sequence, drawing an unset start from `rng`.
    pub fn build_with<R: RngCore + ?Sized>(self, rng: &mut R) -> Result<Seq> {
        let SeqConfig {
            min,
            max,
            mult,
            modulus,
            start,
            derivation,
        } = self;

        if min > max {
            return Err(Error::InvalidBounds { min, max });
        }

        let span = max - min;
        let width = span.saturating_add(1);
        let mult = mult.filter(|&mult| mult != 0);
        let modulus = modulus.filter(|&modulus| modulus != 0);

        if let Some(modulus) = modulus {
            // A modulus equal to the width would leave `max` unreachable.
            if span == u64::MAX || modulus <= width || !is_prime(modulus) {
                return Err(Error::InvalidModulus { modulus, width });
            }
        }

        let attached = derivation.filter(|derivation| {
            derivation.covers(min, max) && modulus.map_or(true, |m| m == derivation.modulus())
        });

        let (mult, modulus, derivation) = match (mult, modulus) {
            (Some(mult), Some(modulus)) => (mult, modulus, attached),
            (mult, modulus) => {
                let derivation = match (attached, modulus) {
                    (Some(derivation), _) => derivation,
                    (None, Some(modulus)) => Arc::new(Derivation::for_modulus(width, modulus)),
                    (None, None) if span == u64::MAX => {
                        return Err(Error::InvalidModulus { modulus: 0, width });
                    }
                    (None, None) => Arc::new(Derivation::for_range(min, max)),
                };

                let modulus = modulus.unwrap_or_else(|| derivation.modulus());
                let mult = mult.unwrap_or_else(|| derivation.multiplier());
                (mult, modulus, Some(derivation))
            }
        };

        if mult >= modulus {
            return Err(Error::InvalidMultiplier { mult, modulus });
        }

        let start = match start {
            Some(start) if start < min || start > max => {
                return Err(Error::InvalidStart { start, min, max });
            }
            Some(start) => start,
            None => random_start(min, width, rng),
        };

        let params = Params {
            mult,
            modulus,
            min,
            max,
            start,
        };

        debug!(mult, modulus, min, max, start, "built sequence");

        Ok(Seq::with_params(params, derivation))
    }
}

impl From<Params> for SeqConfig {
    fn from(params: Params) -> Self {
        let config = SeqConfig::new(params.min, params.max)
            .mult(params.mult)
            .modulus(params.modulus);

        if params.start == 0 {
            config
        } else {
            config.start(params.start)
        }
    }
}

/// Draws a starting value in `min..=max`. A zero draw maps to the first residue.
///
/// A start of 0 reads as unset in [`Params`], so it is only drawn when the range
/// holds nothing else.
fn random_start<R: RngCore + ?Sized>(min: u64, width: u64, rng: &mut R) -> u64 {
    // `width` is below a prime modulus here, so this cannot overflow.
    let residue = match rng.next_u64() % (width + 1) {
        0 => 1,
        residue => residue,
    };

    match min + (residue - 1) {
        0 if width > 1 => 1,
        start => start,
    }
}

/// A pseudo-random permutation of `min..=max`.
///
/// Walks the cycle `r -> r * mult mod modulus` from the residue of `start` until it
/// comes back around, emitting `min + r - 1` for every residue that lands in the
/// range. With a prime modulus greater than the width and a primitive-root
/// multiplier, every value is produced exactly once.
///
/// This type is not thread safe. Wrap it in a [`SyncSeq`] to share it.
///
/// # Examples
///
/// ```
/// use rangeshuf::{derive, Seq};
///
/// let mut seq = Seq::from_params(derive(1, 1000, 0)).unwrap();
/// let mut seen: Vec<u64> = seq.by_ref().collect();
/// seen.sort_unstable();
/// assert_eq!(seen, (1..=1000).collect::<Vec<_>>());
/// ```
#[derive(Debug, Clone)]
pub struct Seq {
    params: Params,
    width: u64,
    origin: u64,
    residue: u64,
    state: State,
    steps: u64,
    derivation: Option<Arc<Derivation>>,
}

impl Seq {
    /// Builds a sequence from positional parameters, where 0 leaves `mult`, `modulus`
    /// or `start` unset.
    pub fn new(mult: u64, modulus: u64, min: u64, max: u64, start: u64) -> Result<Self> {
        Self::from_params(Params {
            mult,
            modulus,
            min,
            max,
            start,
        })
    }

    /// Builds a sequence from a parameter tuple, e.g. one returned by
    /// [`derive`](crate::derive) or [`Seq::params`].
    ///
    /// A `start` of 0 is read as unset. Drawn starts avoid 0, so only a sequence
    /// explicitly started at 0 needs [`Seq::config`] to be reproduced.
    pub fn from_params(params: Params) -> Result<Self> {
        SeqConfig::from(params).build()
    }

    fn with_params(params: Params, derivation: Option<Arc<Derivation>>) -> Self {
        Self {
            params,
            width: params.width(),
            origin: params.start - params.min + 1,
            residue: 0,
            state: State::NotStarted,
            steps: 0,
            derivation,
        }
    }

    /// Produces the next value and whether the sequence is still going.
    ///
    /// Once this returns `false` it keeps doing so. The value paired with `false`
    /// is the start value and carries no meaning.
    pub fn advance(&mut self) -> (u64, bool) {
        match self.state {
            State::Exhausted => return (self.params.start, false),
            State::NotStarted => {
                self.residue = self.origin;
                self.state = State::Running;
                return (self.params.start, true);
            }
            State::Running => {}
        }

        loop {
            self.residue = mod_mul(self.residue, self.params.mult, self.params.modulus);
            self.steps += 1;

            if self.residue == self.origin {
                self.state = State::Exhausted;
                return (self.params.start, false);
            }

            if self.residue <= self.width {
                return (self.params.min + (self.residue - 1), true);
            }
        }
    }

    /// Resumes the sequence as if `value` was the last one returned.
    ///
    /// The next call to [`advance`](Self::advance) yields whatever follows `value`
    /// in the cycle, and the sequence still ends when it gets back to `start`.
    /// An exhausted sequence stays exhausted.
    pub fn seek(&mut self, value: u64) -> Result<()> {
        let Params { min, max, .. } = self.params;

        if value < min || value > max {
            return Err(Error::InvalidStart {
                start: value,
                min,
                max,
            });
        }

        if self.state != State::Exhausted {
            self.residue = value - min + 1;
            self.state = State::Running;
        }

        Ok(())
    }

    /// A fresh copy of this sequence, back at its first value.
    pub fn rewind(&self) -> Self {
        Self::with_params(self.params, self.derivation.clone())
    }

    /// The same cycle entered at a new random start.
    pub fn rotate<R: RngCore + ?Sized>(&self, rng: &mut R) -> Self {
        let params = Params {
            start: random_start(self.params.min, self.width, rng),
            ..self.params
        };

        Self::with_params(params, self.derivation.clone())
    }

    /// A config that rebuilds this exact sequence, reusing its derivation.
    pub fn config(&self) -> SeqConfig {
        let config = SeqConfig::new(self.params.min, self.params.max)
            .mult(self.params.mult)
            .modulus(self.params.modulus)
            .start(self.params.start);

        match &self.derivation {
            Some(derivation) => config.derivation(Arc::clone(derivation)),
            None => config,
        }
    }

    /// Wraps this sequence so it can be shared between threads.
    pub fn into_sync(self) -> SyncSeq<Self> {
        SyncSeq::new(self)
    }

    pub fn params(&self) -> Params {
        self.params
    }

    pub fn mult(&self) -> u64 {
        self.params.mult
    }

    pub fn modulus(&self) -> u64 {
        self.params.modulus
    }

    pub fn range_min(&self) -> u64 {
        self.params.min
    }

    pub fn range_max(&self) -> u64 {
        self.params.max
    }

    pub fn start(&self) -> u64 {
        self.params.start
    }

    /// Multiplications performed so far, including skipped residues.
    ///
    /// A fully drained sequence has performed exactly `modulus - 1`.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn is_exhausted(&self) -> bool {
        self.state == State::Exhausted
    }

    /// The primes and roots used to fill in unset parameters, if any were needed.
    pub fn derivation(&self) -> Option<&Arc<Derivation>> {
        self.derivation.as_ref()
    }
}

impl Shuffle for Seq {
    fn advance(&mut self) -> (u64, bool) {
        Seq::advance(self)
    }

    fn params(&self) -> Params {
        self.params
    }
}

impl Iterator for Seq {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        let (value, more) = Seq::advance(self);
        more.then_some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.state {
            State::Exhausted => (0, Some(0)),
            _ => (0, usize::try_from(self.width).ok()),
        }
    }
}

impl FusedIterator for Seq {}
