use crate::sync::SyncSeq;
use crate::Shuffle;
use rayon::iter::{IntoParallelIterator, ParallelIterator};

impl<S: Shuffle + Send> SyncSeq<S> {
    /// Drains the remaining values on the rayon thread pool.
    ///
    /// Values arrive in no particular order, but each one at most once.
    pub fn par_drain(&self) -> impl ParallelIterator<Item = u64> + '_ {
        // A fresh sequence never yields more than `width` values, so this many
        // advances is always enough.
        (0..self.params().width())
            .into_par_iter()
            .filter_map(move |_| {
                let (value, more) = self.advance();
                more.then_some(value)
            })
    }
}
