//! Collectors: reusable strategies for folding a sequence into a result.
//!
//! A [`Collector`] is the consuming half of a pipeline. The collector value
//! itself plays the role of the *supplier* (it owns the mutable
//! accumulation state), [`Collector::accumulate`] is the *accumulator*,
//! [`MergeableCollector::merge`] is the *combiner*, and
//! [`Collector::finish`] is the *finisher*.
//!
//! Collectors are driven either by an iterator through
//! [`IteratorCollectExt::collect_with`] or by a
//! [`Stream`](crate::stream::Stream) through `collect_with`.
//!
//! # Examples
//!
//! ```rust
//! use fpkit::collector::{self, IteratorCollectExt};
//!
//! let words = ["pear", "fig", "apple"];
//!
//! let joined = words.iter().collect_with(collector::joining_with(", ", "[", "]"));
//! assert_eq!(joined, "[pear, fig, apple]");
//!
//! let (count, longest) = words.iter().collect_with(collector::teeing(
//!     collector::counting(),
//!     collector::max_by(|left: &&&str, right: &&&str| left.len().cmp(&right.len())),
//!     |count, longest| (count, longest.copied()),
//! ));
//! assert_eq!(count, 3);
//! assert_eq!(longest, Some("apple"));
//! ```

mod standard;

pub use standard::{
    Averaging, Counting, Joining, MaxBy, MinBy, Summing, Teeing, ToOrderedMap, ToOrderedSet, ToVec,
};

use std::cmp::Ordering;
use std::ops::Add;

/// Accumulates items of type `T` and produces a final [`Output`](Collector::Output).
///
/// # Implementing
///
/// Keep the accumulation state inside the implementing struct, update it in
/// [`accumulate`](Collector::accumulate), and build the result in
/// [`finish`](Collector::finish).
///
/// ```rust
/// use fpkit::collector::{Collector, IteratorCollectExt};
///
/// #[derive(Default)]
/// struct Longest(Option<String>);
///
/// impl Collector<String> for Longest {
///     type Output = Option<String>;
///
///     fn accumulate(&mut self, item: String) {
///         let longer = self.0.as_ref().is_none_or(|current| item.len() > current.len());
///         if longer {
///             self.0 = Some(item);
///         }
///     }
///
///     fn finish(self) -> Self::Output {
///         self.0
///     }
/// }
///
/// let words = vec!["a".to_string(), "abc".to_string(), "ab".to_string()];
/// assert_eq!(words.into_iter().collect_with(Longest::default()), Some("abc".to_string()));
/// ```
pub trait Collector<T> {
    /// The result produced by [`finish`](Collector::finish).
    type Output;

    /// Folds one item into the accumulation state.
    fn accumulate(&mut self, item: T);

    /// Consumes the collector and returns the accumulated result.
    fn finish(self) -> Self::Output
    where
        Self: Sized;

    /// Folds every item of `items` into the accumulation state.
    fn accumulate_all<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = T>,
        Self: Sized,
    {
        for item in items {
            self.accumulate(item);
        }
    }
}

/// A [`Collector`] whose partial states can be combined.
///
/// Merging `other` into `self` must give the same result as if every item
/// accumulated into `other` had been accumulated into `self` afterwards.
pub trait MergeableCollector<T>: Collector<T> {
    /// Appends the partial state of `other` to `self`.
    fn merge(&mut self, other: Self)
    where
        Self: Sized;
}

/// Extension trait adding [`collect_with`](IteratorCollectExt::collect_with)
/// to every iterator.
pub trait IteratorCollectExt: Iterator {
    /// Feeds every item into `collector` and returns its output.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fpkit::collector::{self, IteratorCollectExt};
    ///
    /// let total = (1..=4).collect_with(collector::summing(|value: i32| value));
    /// assert_eq!(total, 10);
    /// ```
    fn collect_with<C>(self, mut collector: C) -> C::Output
    where
        Self: Sized,
        C: Collector<Self::Item>,
    {
        collector.accumulate_all(self);
        collector.finish()
    }
}

impl<I: Iterator> IteratorCollectExt for I {}

// =============================================================================
// Constructors
// =============================================================================

/// Collects items into a `Vec` in encounter order.
#[must_use]
pub const fn to_vec<T>() -> ToVec<T> {
    ToVec::new()
}

/// Collects items into an [`OrderedSet`](crate::collection::OrderedSet).
#[must_use]
pub const fn to_ordered_set<T>() -> ToOrderedSet<T> {
    ToOrderedSet::new()
}

/// Collects items into an [`OrderedMap`](crate::collection::OrderedMap).
/// When two items map to the same key the later value wins.
pub fn to_ordered_map<T, K, V, KF, VF>(
    key_function: KF,
    value_function: VF,
) -> ToOrderedMap<K, V, KF, VF, fn(V, V) -> V>
where
    KF: FnMut(&T) -> K,
    VF: FnMut(T) -> V,
{
    fn keep_incoming<V>(_: V, incoming: V) -> V {
        incoming
    }
    ToOrderedMap::new(key_function, value_function, keep_incoming::<V>)
}

/// Collects items into an [`OrderedMap`](crate::collection::OrderedMap).
/// Values that share a key are combined with `merge(earlier, later)` in
/// encounter order.
///
/// # Examples
///
/// ```rust
/// use fpkit::collector::{self, IteratorCollectExt};
///
/// let lengths = ["aa", "b", "cc", "d"].into_iter().collect_with(collector::to_ordered_map_with(
///     |word: &&str| word.len(),
///     |_| 1,
///     |earlier, later| earlier + later,
/// ));
/// assert_eq!(lengths.get(&1), Some(&2));
/// assert_eq!(lengths.get(&2), Some(&2));
/// ```
pub fn to_ordered_map_with<T, K, V, KF, VF, M>(
    key_function: KF,
    value_function: VF,
    merge: M,
) -> ToOrderedMap<K, V, KF, VF, M>
where
    KF: FnMut(&T) -> K,
    VF: FnMut(T) -> V,
    M: FnMut(V, V) -> V,
{
    ToOrderedMap::new(key_function, value_function, merge)
}

/// Concatenates string-like items with `separator` between them.
#[must_use]
pub fn joining(separator: &str) -> Joining {
    Joining::new(separator, "", "")
}

/// Concatenates string-like items with `separator` between them, wrapped in
/// `prefix` and `suffix`.
#[must_use]
pub fn joining_with(separator: &str, prefix: &str, suffix: &str) -> Joining {
    Joining::new(separator, prefix, suffix)
}

/// Counts the items.
#[must_use]
pub const fn counting() -> Counting {
    Counting::new()
}

/// Sums `function(item)` over all items, starting from `N::default()`.
pub fn summing<T, N, F>(function: F) -> Summing<N, F>
where
    F: FnMut(T) -> N,
    N: Add<Output = N> + Default,
{
    Summing::new(function)
}

/// Averages `function(item)` over all items. Yields `None` when nothing
/// was collected.
pub const fn averaging<T, F>(function: F) -> Averaging<F>
where
    F: FnMut(T) -> f64,
{
    Averaging::new(function)
}

/// Keeps the minimum item under `compare`; the first of several equal
/// minima wins.
pub const fn min_by<T, F>(compare: F) -> MinBy<T, F>
where
    F: FnMut(&T, &T) -> Ordering,
{
    MinBy::new(compare)
}

/// Keeps the maximum item under `compare`; the last of several equal
/// maxima wins.
pub const fn max_by<T, F>(compare: F) -> MaxBy<T, F>
where
    F: FnMut(&T, &T) -> Ordering,
{
    MaxBy::new(compare)
}

/// Feeds every item to both `first` and `second`, then combines their
/// outputs with `combine`.
pub const fn teeing<T, A, B, F, R>(first: A, second: B, combine: F) -> Teeing<A, B, F>
where
    T: Clone,
    A: Collector<T>,
    B: Collector<T>,
    F: FnOnce(A::Output, B::Output) -> R,
{
    Teeing::new(first, second, combine)
}
