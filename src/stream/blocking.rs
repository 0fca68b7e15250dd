//! Synchronous access to streams.

use std::iter::FusedIterator;

use super::Stream;
use super::runtime::{self, BlockingError};

/// Iterator that blocks the calling thread on each element. Created by
/// [`Stream::blocking_iter`].
///
/// # Panics
///
/// `next` panics when called from inside a current-thread runtime, and
/// resumes any panic raised by the pipeline.
#[derive(Debug)]
pub struct BlockingIter<T> {
    stream: Stream<T>,
    finished: bool,
}

impl<T> Iterator for BlockingIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.finished {
            return None;
        }
        let item = runtime::run_blocking(self.stream.next());
        self.finished = item.is_none();
        item
    }
}

impl<T> FusedIterator for BlockingIter<T> {}

impl<T> Stream<T> {
    /// Turns the stream into a blocking iterator.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fpkit::stream::Stream;
    ///
    /// let mut total = 0;
    /// for value in Stream::lazy(1..=4).map(|value| value * value).blocking_iter() {
    ///     total += value;
    /// }
    /// assert_eq!(total, 30);
    /// ```
    pub const fn blocking_iter(self) -> BlockingIter<T> {
        BlockingIter {
            stream: self,
            finished: false,
        }
    }

    /// Collects every element into a `Vec`, blocking the calling thread.
    ///
    /// # Panics
    ///
    /// Panics when called from inside a current-thread runtime; use
    /// [`try_collect_blocking`](Self::try_collect_blocking) to get an error
    /// instead. Resumes any panic raised by the pipeline.
    pub fn collect_blocking(self) -> Vec<T> {
        runtime::run_blocking(self.to_vec())
    }

    /// Collects every element into a `Vec`, blocking the calling thread.
    ///
    /// # Errors
    ///
    /// Returns [`BlockingError`] when the calling thread cannot block, such
    /// as inside a current-thread runtime. The stream is dropped in that
    /// case.
    pub fn try_collect_blocking(self) -> Result<Vec<T>, BlockingError> {
        runtime::try_run_blocking(self.to_vec())
    }
}
