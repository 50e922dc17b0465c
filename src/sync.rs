use crate::calc::Params;
use crate::lock::Mutex;
use crate::seq::Seq;
use crate::Shuffle;
use crossbeam_utils::CachePadded;

/// A sequence that can be shared between threads.
///
/// Every call to [`advance`](Self::advance) takes a lock around the wrapped
/// sequence, so concurrent callers see one total order of advances and together
/// observe each value exactly once.
///
/// # Examples
///
/// ```
/// use rangeshuf::{derive, Seq};
/// use std::sync::Arc;
/// use std::thread;
///
/// let seq = Arc::new(Seq::from_params(derive(1, 100, 0)).unwrap().into_sync());
///
/// let handles: Vec<_> = (0..4)
///     .map(|_| {
///         let seq = Arc::clone(&seq);
///         thread::spawn(move || seq.as_ref().collect::<Vec<u64>>())
///     })
///     .collect();
///
/// let mut seen: Vec<u64> = handles.into_iter().flat_map(|h| h.join().unwrap()).collect();
/// seen.sort_unstable();
/// assert_eq!(seen, (1..=100).collect::<Vec<_>>());
/// ```
#[derive(Debug)]
pub struct SyncSeq<S = Seq> {
    params: Params,
    inner: CachePadded<Mutex<S>>,
}

impl<S: Shuffle> SyncSeq<S> {
    pub fn new(inner: S) -> Self {
        Self {
            params: inner.params(),
            inner: CachePadded::new(Mutex::new(inner)),
        }
    }

    /// Locks the wrapped sequence and advances it once.
    pub fn advance(&self) -> (u64, bool) {
        self.inner.lock().advance()
    }

    /// Unwraps the sequence, wherever it currently is in its cycle.
    pub fn into_inner(self) -> S {
        CachePadded::into_inner(self.inner).into_inner()
    }

    /// Parameters of the wrapped sequence. Does not take the lock.
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
}

impl<S: Shuffle> From<S> for SyncSeq<S> {
    fn from(inner: S) -> Self {
        Self::new(inner)
    }
}

impl<S: Shuffle> Shuffle for SyncSeq<S> {
    fn advance(&mut self) -> (u64, bool) {
        // Exclusive access, no need to lock.
        self.inner.get_mut().advance()
    }

    fn params(&self) -> Params {
        self.params
    }
}

// Advancing only needs a shared reference, similar to `io::Write for &File`.
impl<S: Shuffle> Shuffle for &'_ SyncSeq<S> {
    fn advance(&mut self) -> (u64, bool) {
        SyncSeq::advance(*self)
    }

    fn params(&self) -> Params {
        self.params
    }
}

impl<S: Shuffle> Iterator for &'_ SyncSeq<S> {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        let (value, more) = SyncSeq::advance(*self);
        more.then_some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::SyncSeq;
    use crate::{Seq, SeqConfig, Shuffle};
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn same_order_as_inner() {
        let seq = Seq::new(3, 5, 4, 7, 5).unwrap();
        let sync = SyncSeq::new(seq.rewind());

        assert_eq!((&sync).collect::<Vec<_>>(), seq.collect::<Vec<_>>());
        assert_eq!(sync.advance().1, false);
    }

    #[test]
    fn params_pass_through() {
        let seq = Seq::new(3, 5, 4, 7, 6).unwrap();
        let params = seq.params();
        let sync = seq.into_sync();

        assert_eq!(sync.params(), params);
        assert_eq!(
            (sync.mult(), sync.modulus(), sync.range_min(), sync.range_max(), sync.start()),
            (3, 5, 4, 7, 6)
        );
    }

    #[test]
    fn into_inner_keeps_position() {
        let sync = Seq::new(3, 5, 4, 7, 5).unwrap().into_sync();
        assert_eq!(sync.advance(), (5, true));

        let rest: Vec<u64> = sync.into_inner().collect();
        assert_eq!(rest, vec![4, 6, 7]);
    }

    #[test]
    fn exclusive_advance_through_trait() {
        fn drain<S: Shuffle>(mut seq: S) -> Vec<u64> {
            let mut out = Vec::new();
            loop {
                match seq.advance() {
                    (value, true) => out.push(value),
                    (_, false) => return out,
                }
            }
        }

        let seq = Seq::new(3, 5, 4, 7, 5).unwrap();
        assert_eq!(drain(seq.rewind()), vec![5, 4, 6, 7]);
        assert_eq!(drain(SyncSeq::new(seq.rewind())), vec![5, 4, 6, 7]);
        assert_eq!(drain(&SyncSeq::new(seq)), vec![5, 4, 6, 7]);
    }

    #[test]
    fn threads_share_one_permutation() {
        const THREADS: usize = 8;
        const MAX: u64 = 50_000;

        let sync = Arc::new(SeqConfig::new(1, MAX).build().unwrap().into_sync());

        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let sync = Arc::clone(&sync);
                thread::spawn(move || {
                    let mut seen = Vec::new();
                    while let (value, true) = sync.advance() {
                        seen.push(value);
                    }
                    seen
                })
            })
            .collect();

        let mut all = HashSet::new();
        let mut count = 0;

        for handle in handles {
            for value in handle.join().unwrap() {
                assert!(all.insert(value), "{} produced twice", value);
                count += 1;
            }
        }

        assert_eq!(count, MAX);
        assert_eq!(all, (1..=MAX).collect::<HashSet<_>>());
    }
}
