//! Terminal operations.
//!
//! Draining terminals read until the channel closes and then join the
//! pipeline tasks, so a panic anywhere upstream is resumed here. The
//! short-circuiting ones (`find_first`, `any_match`, `all_match`,
//! `none_match`) return as soon as the answer is known and drop the rest of
//! the pipeline without waiting for it.

use std::cmp::Ordering;
use std::future::Future;
use std::ops::Add;

use crate::collector::Collector;

use super::Stream;

impl<T> Stream<T> {
    /// Collects every element into a `Vec`, in stream order.
    pub async fn to_vec(mut self) -> Vec<T> {
        let mut items = Vec::new();
        while let Some(item) = self.next().await {
            items.push(item);
        }
        items
    }

    /// Collects every element into any `FromIterator` container.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fpkit::stream::Stream;
    /// use std::collections::BTreeSet;
    ///
    /// # fpkit::stream::runtime::run_blocking(async {
    /// let set: BTreeSet<i32> = Stream::of([3, 1, 3]).collect().await;
    /// assert_eq!(set.into_iter().collect::<Vec<_>>(), vec![1, 3]);
    /// # });
    /// ```
    pub async fn collect<C>(self) -> C
    where
        C: FromIterator<T>,
    {
        self.to_vec().await.into_iter().collect()
    }

    /// Feeds every element into `collector` and returns its output.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fpkit::collector;
    /// use fpkit::stream::Stream;
    ///
    /// # fpkit::stream::runtime::run_blocking(async {
    /// let joined = Stream::of(["x", "y", "z"]).collect_with(collector::joining("+")).await;
    /// assert_eq!(joined, "x+y+z");
    /// # });
    /// ```
    pub async fn collect_with<C>(mut self, mut collector: C) -> C::Output
    where
        C: Collector<T>,
    {
        while let Some(item) = self.next().await {
            collector.accumulate(item);
        }
        collector.finish()
    }

    /// Calls `action` on every element, in stream order.
    pub async fn for_each<F>(mut self, mut action: F)
    where
        F: FnMut(T),
    {
        while let Some(item) = self.next().await {
            action(item);
        }
    }

    /// Runs the futures returned by `action` with up to `concurrency` of
    /// them in progress at once. Completion order is unspecified.
    ///
    /// # Panics
    ///
    /// Panics if `concurrency` is zero.
    pub async fn for_each_concurrent<F, Fut>(self, concurrency: usize, action: F)
    where
        F: FnMut(T) -> Fut,
        Fut: Future<Output = ()>,
    {
        assert!(
            concurrency > 0,
            "{}",
            super::StreamError::InvalidConcurrency
        );
        futures::StreamExt::for_each_concurrent(self, concurrency, action).await;
    }

    /// Folds every element into an accumulator.
    pub async fn fold<A, F>(mut self, initial: A, mut function: F) -> A
    where
        F: FnMut(A, T) -> A,
    {
        let mut accumulator = initial;
        while let Some(item) = self.next().await {
            accumulator = function(accumulator, item);
        }
        accumulator
    }

    /// Folds using the first element as the initial accumulator. Returns
    /// `None` for an empty stream.
    pub async fn reduce<F>(mut self, mut function: F) -> Option<T>
    where
        F: FnMut(T, T) -> T,
    {
        let first = self.next().await?;
        Some(self.fold(first, &mut function).await)
    }

    /// Counts the elements.
    pub async fn count(self) -> usize {
        self.fold(0, |count, _| count + 1).await
    }

    /// Adds up the elements, starting from `T::default()`.
    pub async fn sum(self) -> T
    where
        T: Add<Output = T> + Default,
    {
        self.fold(T::default(), |total, item| total + item).await
    }

    /// The smallest element; the first of several equal minima.
    pub async fn min(self) -> Option<T>
    where
        T: Ord,
    {
        self.min_by(Ord::cmp).await
    }

    /// The largest element; the last of several equal maxima.
    pub async fn max(self) -> Option<T>
    where
        T: Ord,
    {
        self.max_by(Ord::cmp).await
    }

    /// The smallest element under `compare`.
    pub async fn min_by<F>(self, mut compare: F) -> Option<T>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.reduce(|current, item| {
            if compare(&item, &current) == Ordering::Less {
                item
            } else {
                current
            }
        })
        .await
    }

    /// The largest element under `compare`.
    pub async fn max_by<F>(self, mut compare: F) -> Option<T>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.reduce(|current, item| {
            if compare(&item, &current) == Ordering::Less {
                current
            } else {
                item
            }
        })
        .await
    }

    /// The element with the smallest key.
    pub async fn min_by_key<K, F>(self, mut key: F) -> Option<T>
    where
        K: Ord,
        F: FnMut(&T) -> K,
    {
        self.min_by(|left, right| key(left).cmp(&key(right))).await
    }

    /// The element with the largest key.
    pub async fn max_by_key<K, F>(self, mut key: F) -> Option<T>
    where
        K: Ord,
        F: FnMut(&T) -> K,
    {
        self.max_by(|left, right| key(left).cmp(&key(right))).await
    }

    /// The last element.
    pub async fn last(self) -> Option<T> {
        self.fold(None, |_, item| Some(item)).await
    }

    // =========================================================================
    // Short-circuiting
    // =========================================================================

    /// The first element matching `predicate`. Stops reading as soon as one
    /// is found.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fpkit::stream::Stream;
    ///
    /// # fpkit::stream::runtime::run_blocking(async {
    /// let first_square = Stream::iterate(1_u64, |value| value + 1)
    ///     .find_first(|value| value * value > 50)
    ///     .await;
    /// assert_eq!(first_square, Some(8));
    /// # });
    /// ```
    pub async fn find_first<P>(mut self, mut predicate: P) -> Option<T>
    where
        P: FnMut(&T) -> bool,
    {
        while let Some(item) = self.next().await {
            if predicate(&item) {
                return Some(item);
            }
        }
        None
    }

    /// `true` if any element matches. `false` for an empty stream.
    pub async fn any_match<P>(self, mut predicate: P) -> bool
    where
        P: FnMut(&T) -> bool,
    {
        self.find_first(|item| predicate(item)).await.is_some()
    }

    /// `true` if every element matches. `true` for an empty stream.
    pub async fn all_match<P>(self, mut predicate: P) -> bool
    where
        P: FnMut(&T) -> bool,
    {
        self.find_first(|item| !predicate(item)).await.is_none()
    }

    /// `true` if no element matches. `true` for an empty stream.
    pub async fn none_match<P>(self, predicate: P) -> bool
    where
        P: FnMut(&T) -> bool,
    {
        !self.any_match(predicate).await
    }
}
