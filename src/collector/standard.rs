//! Standard collector implementations.
//!
//! Use the constructor functions in [`crate::collector`] rather than the
//! types' `new` functions; the constructors pin down the closure signatures.

use std::cmp::Ordering;
use std::fmt;
use std::ops::Add;

use super::{Collector, MergeableCollector};
use crate::collection::{OrderedMap, OrderedSet};

// =============================================================================
// ToVec
// =============================================================================

/// Collects items into a `Vec`. Created by [`to_vec`](super::to_vec).
#[derive(Debug, Clone)]
pub struct ToVec<T> {
    items: Vec<T>,
}

impl<T> ToVec<T> {
    pub(super) const fn new() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> Collector<T> for ToVec<T> {
    type Output = Vec<T>;

    #[inline]
    fn accumulate(&mut self, item: T) {
        self.items.push(item);
    }

    fn finish(self) -> Self::Output {
        self.items
    }
}

impl<T> MergeableCollector<T> for ToVec<T> {
    fn merge(&mut self, other: Self) {
        self.items.extend(other.items);
    }
}

// =============================================================================
// ToOrderedSet
// =============================================================================

/// Collects items into an [`OrderedSet`]. Created by
/// [`to_ordered_set`](super::to_ordered_set).
#[derive(Debug, Clone)]
pub struct ToOrderedSet<T> {
    items: Vec<T>,
}

impl<T> ToOrderedSet<T> {
    pub(super) const fn new() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Ord> Collector<T> for ToOrderedSet<T> {
    type Output = OrderedSet<T>;

    #[inline]
    fn accumulate(&mut self, item: T) {
        self.items.push(item);
    }

    fn finish(self) -> Self::Output {
        self.items.into_iter().collect()
    }
}

impl<T: Ord> MergeableCollector<T> for ToOrderedSet<T> {
    fn merge(&mut self, other: Self) {
        self.items.extend(other.items);
    }
}

// =============================================================================
// ToOrderedMap
// =============================================================================

/// Collects items into an [`OrderedMap`]. Created by
/// [`to_ordered_map`](super::to_ordered_map) and
/// [`to_ordered_map_with`](super::to_ordered_map_with).
///
/// Entries are buffered in encounter order and resolved in `finish`, so
/// `merge` always sees values of one key in the order they arrived.
pub struct ToOrderedMap<K, V, KF, VF, M> {
    entries: Vec<(K, V)>,
    key_function: KF,
    value_function: VF,
    merge: M,
}

impl<K, V, KF, VF, M> ToOrderedMap<K, V, KF, VF, M> {
    pub(super) const fn new(key_function: KF, value_function: VF, merge: M) -> Self {
        Self {
            entries: Vec::new(),
            key_function,
            value_function,
            merge,
        }
    }
}

impl<T, K, V, KF, VF, M> Collector<T> for ToOrderedMap<K, V, KF, VF, M>
where
    K: Ord,
    KF: FnMut(&T) -> K,
    VF: FnMut(T) -> V,
    M: FnMut(V, V) -> V,
{
    type Output = OrderedMap<K, V>;

    fn accumulate(&mut self, item: T) {
        let key = (self.key_function)(&item);
        let value = (self.value_function)(item);
        self.entries.push((key, value));
    }

    fn finish(self) -> Self::Output {
        let Self {
            mut entries,
            mut merge,
            ..
        } = self;
        entries.sort_by(|left, right| left.0.cmp(&right.0));

        let mut resolved: Vec<(K, V)> = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            match resolved.pop() {
                Some((last_key, last_value)) if last_key == key => {
                    resolved.push((last_key, merge(last_value, value)));
                }
                Some(last) => {
                    resolved.push(last);
                    resolved.push((key, value));
                }
                None => resolved.push((key, value)),
            }
        }
        resolved.into_iter().collect()
    }
}

impl<T, K, V, KF, VF, M> MergeableCollector<T> for ToOrderedMap<K, V, KF, VF, M>
where
    K: Ord,
    KF: FnMut(&T) -> K,
    VF: FnMut(T) -> V,
    M: FnMut(V, V) -> V,
{
    fn merge(&mut self, other: Self) {
        self.entries.extend(other.entries);
    }
}

impl<K: fmt::Debug, V: fmt::Debug, KF, VF, M> fmt::Debug for ToOrderedMap<K, V, KF, VF, M> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ToOrderedMap")
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Joining
// =============================================================================

/// Concatenates string-like items. Created by [`joining`](super::joining)
/// and [`joining_with`](super::joining_with).
#[derive(Debug, Clone)]
pub struct Joining {
    buffer: String,
    separator: String,
    suffix: String,
    prefix_length: usize,
    empty: bool,
}

impl Joining {
    pub(super) fn new(separator: &str, prefix: &str, suffix: &str) -> Self {
        Self {
            buffer: prefix.to_owned(),
            separator: separator.to_owned(),
            suffix: suffix.to_owned(),
            prefix_length: prefix.len(),
            empty: true,
        }
    }

    fn push(&mut self, text: &str) {
        if !self.empty {
            self.buffer.push_str(&self.separator);
        }
        self.buffer.push_str(text);
        self.empty = false;
    }
}

impl<T: AsRef<str>> Collector<T> for Joining {
    type Output = String;

    fn accumulate(&mut self, item: T) {
        self.push(item.as_ref());
    }

    fn finish(mut self) -> Self::Output {
        self.buffer.push_str(&self.suffix);
        self.buffer
    }
}

impl<T: AsRef<str>> MergeableCollector<T> for Joining {
    fn merge(&mut self, other: Self) {
        if other.empty {
            return;
        }
        self.push(&other.buffer[other.prefix_length..]);
    }
}

// =============================================================================
// Counting
// =============================================================================

/// Counts items. Created by [`counting`](super::counting).
#[derive(Debug, Clone, Copy, Default)]
pub struct Counting {
    count: usize,
}

impl Counting {
    pub(super) const fn new() -> Self {
        Self { count: 0 }
    }
}

impl<T> Collector<T> for Counting {
    type Output = usize;

    #[inline]
    fn accumulate(&mut self, _: T) {
        self.count += 1;
    }

    fn finish(self) -> Self::Output {
        self.count
    }
}

impl<T> MergeableCollector<T> for Counting {
    fn merge(&mut self, other: Self) {
        self.count += other.count;
    }
}

// =============================================================================
// Summing / Averaging
// =============================================================================

/// Sums projected values. Created by [`summing`](super::summing).
#[derive(Debug, Clone)]
pub struct Summing<N, F> {
    total: N,
    function: F,
}

impl<N: Default, F> Summing<N, F> {
    pub(super) fn new(function: F) -> Self {
        Self {
            total: N::default(),
            function,
        }
    }
}

impl<N: Add<Output = N> + Default, F> Summing<N, F> {
    fn add(&mut self, value: N) {
        let total = std::mem::take(&mut self.total);
        self.total = total + value;
    }
}

impl<T, N, F> Collector<T> for Summing<N, F>
where
    N: Add<Output = N> + Default,
    F: FnMut(T) -> N,
{
    type Output = N;

    fn accumulate(&mut self, item: T) {
        let value = (self.function)(item);
        self.add(value);
    }

    fn finish(self) -> Self::Output {
        self.total
    }
}

impl<T, N, F> MergeableCollector<T> for Summing<N, F>
where
    N: Add<Output = N> + Default,
    F: FnMut(T) -> N,
{
    fn merge(&mut self, other: Self) {
        self.add(other.total);
    }
}

/// Averages projected values. Created by [`averaging`](super::averaging).
#[derive(Debug, Clone)]
pub struct Averaging<F> {
    sum: f64,
    count: usize,
    function: F,
}

impl<F> Averaging<F> {
    pub(super) const fn new(function: F) -> Self {
        Self {
            sum: 0.0,
            count: 0,
            function,
        }
    }
}

impl<T, F> Collector<T> for Averaging<F>
where
    F: FnMut(T) -> f64,
{
    type Output = Option<f64>;

    fn accumulate(&mut self, item: T) {
        self.sum += (self.function)(item);
        self.count += 1;
    }

    #[allow(clippy::cast_precision_loss)]
    fn finish(self) -> Self::Output {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

impl<T, F> MergeableCollector<T> for Averaging<F>
where
    F: FnMut(T) -> f64,
{
    fn merge(&mut self, other: Self) {
        self.sum += other.sum;
        self.count += other.count;
    }
}

// =============================================================================
// MinBy / MaxBy
// =============================================================================

/// Keeps the smallest item. Created by [`min_by`](super::min_by).
#[derive(Debug, Clone)]
pub struct MinBy<T, F> {
    current: Option<T>,
    compare: F,
}

impl<T, F> MinBy<T, F> {
    pub(super) const fn new(compare: F) -> Self {
        Self {
            current: None,
            compare,
        }
    }
}

impl<T, F> Collector<T> for MinBy<T, F>
where
    F: FnMut(&T, &T) -> Ordering,
{
    type Output = Option<T>;

    fn accumulate(&mut self, item: T) {
        match &self.current {
            Some(current) if (self.compare)(&item, current) != Ordering::Less => {}
            _ => self.current = Some(item),
        }
    }

    fn finish(self) -> Self::Output {
        self.current
    }
}

impl<T, F> MergeableCollector<T> for MinBy<T, F>
where
    F: FnMut(&T, &T) -> Ordering,
{
    fn merge(&mut self, other: Self) {
        if let Some(item) = other.current {
            self.accumulate(item);
        }
    }
}

/// Keeps the largest item. Created by [`max_by`](super::max_by).
#[derive(Debug, Clone)]
pub struct MaxBy<T, F> {
    current: Option<T>,
    compare: F,
}

impl<T, F> MaxBy<T, F> {
    pub(super) const fn new(compare: F) -> Self {
        Self {
            current: None,
            compare,
        }
    }
}

impl<T, F> Collector<T> for MaxBy<T, F>
where
    F: FnMut(&T, &T) -> Ordering,
{
    type Output = Option<T>;

    fn accumulate(&mut self, item: T) {
        match &self.current {
            Some(current) if (self.compare)(&item, current) == Ordering::Less => {}
            _ => self.current = Some(item),
        }
    }

    fn finish(self) -> Self::Output {
        self.current
    }
}

impl<T, F> MergeableCollector<T> for MaxBy<T, F>
where
    F: FnMut(&T, &T) -> Ordering,
{
    fn merge(&mut self, other: Self) {
        if let Some(item) = other.current {
            self.accumulate(item);
        }
    }
}

// =============================================================================
// Teeing
// =============================================================================

/// Feeds each item to two collectors. Created by [`teeing`](super::teeing).
#[derive(Debug, Clone)]
pub struct Teeing<A, B, F> {
    first: A,
    second: B,
    combine: F,
}

impl<A, B, F> Teeing<A, B, F> {
    pub(super) const fn new(first: A, second: B, combine: F) -> Self {
        Self {
            first,
            second,
            combine,
        }
    }
}

impl<T, A, B, F, R> Collector<T> for Teeing<A, B, F>
where
    T: Clone,
    A: Collector<T>,
    B: Collector<T>,
    F: FnOnce(A::Output, B::Output) -> R,
{
    type Output = R;

    fn accumulate(&mut self, item: T) {
        self.first.accumulate(item.clone());
        self.second.accumulate(item);
    }

    fn finish(self) -> Self::Output {
        (self.combine)(self.first.finish(), self.second.finish())
    }
}

// =============================================================================
// Tests
// =============================================================================
