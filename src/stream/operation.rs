//! Intermediate operations.
//!
//! Each operation consumes the stream, spawns one task and returns the
//! stream that task writes into. The task stops when its upstream is
//! exhausted or when the returned stream is dropped.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::hash::Hash;

use super::Stream;

impl<T: Send + 'static> Stream<T> {
    /// Applies `function` to every element.
    pub fn map<U, F>(self, mut function: F) -> Stream<U>
    where
        U: Send + 'static,
        F: FnMut(T) -> U + Send + 'static,
    {
        self.pipe("map", move |mut upstream, sender| async move {
            while let Some(item) = upstream.next().await {
                if sender.send(function(item)).await.is_err() {
                    break;
                }
            }
        })
    }

    /// Keeps the elements for which `predicate` returns `true`.
    #[must_use]
    pub fn filter<P>(self, mut predicate: P) -> Self
    where
        P: FnMut(&T) -> bool + Send + 'static,
    {
        self.pipe("filter", move |mut upstream, sender| async move {
            while let Some(item) = upstream.next().await {
                if predicate(&item) && sender.send(item).await.is_err() {
                    break;
                }
            }
        })
    }

    /// Maps and filters in one step, keeping the `Some` results.
    pub fn filter_map<U, F>(self, mut function: F) -> Stream<U>
    where
        U: Send + 'static,
        F: FnMut(T) -> Option<U> + Send + 'static,
    {
        self.pipe("filter_map", move |mut upstream, sender| async move {
            while let Some(item) = upstream.next().await {
                if let Some(mapped) = function(item)
                    && sender.send(mapped).await.is_err()
                {
                    break;
                }
            }
        })
    }

    /// Replaces every element with the elements of `function(element)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fpkit::stream::Stream;
    ///
    /// let letters = Stream::of(["ab", "c"])
    ///     .flat_map(|word| word.chars().collect::<Vec<_>>())
    ///     .collect_blocking();
    /// assert_eq!(letters, vec!['a', 'b', 'c']);
    /// ```
    pub fn flat_map<U, I, F>(self, mut function: F) -> Stream<U>
    where
        U: Send + 'static,
        I: IntoIterator<Item = U>,
        I::IntoIter: Send,
        F: FnMut(T) -> I + Send + 'static,
    {
        self.pipe("flat_map", move |mut upstream, sender| async move {
            'outer: while let Some(item) = upstream.next().await {
                for mapped in function(item) {
                    if sender.send(mapped).await.is_err() {
                        break 'outer;
                    }
                }
            }
        })
    }

    /// Calls `action` on every element as it passes through.
    #[must_use]
    pub fn peek<F>(self, mut action: F) -> Self
    where
        F: FnMut(&T) + Send + 'static,
    {
        self.pipe("peek", move |mut upstream, sender| async move {
            while let Some(item) = upstream.next().await {
                action(&item);
                if sender.send(item).await.is_err() {
                    break;
                }
            }
        })
    }

    /// Keeps at most the first `count` elements, then drops the upstream.
    #[must_use]
    pub fn limit(self, count: usize) -> Self {
        if count == 0 {
            return Self::empty().configure(self.config);
        }
        self.pipe("limit", move |mut upstream, sender| async move {
            let mut remaining = count;
            while let Some(item) = upstream.next().await {
                if sender.send(item).await.is_err() {
                    break;
                }
                remaining -= 1;
                if remaining == 0 {
                    break;
                }
            }
        })
    }

    /// Discards the first `count` elements.
    #[must_use]
    pub fn skip(self, count: usize) -> Self {
        self.pipe("skip", move |mut upstream, sender| async move {
            let mut skipped = 0;
            while let Some(item) = upstream.next().await {
                if skipped < count {
                    skipped += 1;
                    continue;
                }
                if sender.send(item).await.is_err() {
                    break;
                }
            }
        })
    }

    /// Forwards elements while `predicate` holds and ends at the first
    /// element that fails it.
    #[must_use]
    pub fn take_while<P>(self, mut predicate: P) -> Self
    where
        P: FnMut(&T) -> bool + Send + 'static,
    {
        self.pipe("take_while", move |mut upstream, sender| async move {
            while let Some(item) = upstream.next().await {
                if !predicate(&item) || sender.send(item).await.is_err() {
                    break;
                }
            }
        })
    }

    /// Discards elements while `predicate` holds, then forwards the rest.
    #[must_use]
    pub fn skip_while<P>(self, mut predicate: P) -> Self
    where
        P: FnMut(&T) -> bool + Send + 'static,
    {
        self.pipe("skip_while", move |mut upstream, sender| async move {
            let mut skipping = true;
            while let Some(item) = upstream.next().await {
                skipping = skipping && predicate(&item);
                if !skipping && sender.send(item).await.is_err() {
                    break;
                }
            }
        })
    }

    /// Drops elements equal to one already emitted. The first occurrence
    /// wins.
    #[must_use]
    pub fn distinct(self) -> Self
    where
        T: Eq + Hash + Clone,
    {
        self.pipe("distinct", move |mut upstream, sender| async move {
            let mut seen = HashSet::new();
            while let Some(item) = upstream.next().await {
                if seen.insert(item.clone()) && sender.send(item).await.is_err() {
                    break;
                }
            }
        })
    }

    /// Pairs every element with its zero-based position.
    pub fn enumerate(self) -> Stream<(usize, T)> {
        self.pipe("enumerate", move |mut upstream, sender| async move {
            let mut index = 0;
            while let Some(item) = upstream.next().await {
                if sender.send((index, item)).await.is_err() {
                    break;
                }
                index += 1;
            }
        })
    }

    /// Emits every element of `self`, then every element of `other`.
    #[must_use]
    pub fn chain(self, other: Self) -> Self {
        self.pipe("chain", move |mut first, sender| async move {
            let mut second = other;
            while let Some(item) = first.next().await {
                if sender.send(item).await.is_err() {
                    return;
                }
            }
            drop(first);
            while let Some(item) = second.next().await {
                if sender.send(item).await.is_err() {
                    return;
                }
            }
        })
    }

    /// Pairs elements of `self` and `other` positionally. Ends with the
    /// shorter of the two.
    pub fn zip<U: Send + 'static>(self, other: Stream<U>) -> Stream<(T, U)> {
        self.pipe("zip", move |mut left, sender| async move {
            let mut right = other;
            while let Some(left_item) = left.next().await {
                let Some(right_item) = right.next().await else {
                    break;
                };
                if sender.send((left_item, right_item)).await.is_err() {
                    break;
                }
            }
        })
    }

    /// Groups elements into vectors of `size`. The last chunk may be
    /// shorter.
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fpkit::stream::Stream;
    ///
    /// let chunks = Stream::of(1..=5).chunks(2).collect_blocking();
    /// assert_eq!(chunks, vec![vec![1, 2], vec![3, 4], vec![5]]);
    /// ```
    pub fn chunks(self, size: usize) -> Stream<Vec<T>> {
        assert!(size > 0, "chunk size must be greater than 0");
        self.pipe("chunks", move |mut upstream, sender| async move {
            let mut chunk = Vec::with_capacity(size);
            while let Some(item) = upstream.next().await {
                chunk.push(item);
                if chunk.len() == size {
                    let full = std::mem::replace(&mut chunk, Vec::with_capacity(size));
                    if sender.send(full).await.is_err() {
                        return;
                    }
                }
            }
            if !chunk.is_empty() {
                let _ = sender.send(chunk).await;
            }
        })
    }

    // =========================================================================
    // Barriers
    // =========================================================================

    /// Sorts the elements. Waits for the whole upstream before emitting.
    #[must_use]
    pub fn sorted(self) -> Self
    where
        T: Ord,
    {
        self.reorder("sorted", |items| items.sort())
    }

    /// Sorts the elements with `compare`. The sort is stable.
    #[must_use]
    pub fn sorted_by<F>(self, mut compare: F) -> Self
    where
        F: FnMut(&T, &T) -> Ordering + Send + 'static,
    {
        self.reorder("sorted_by", move |items| items.sort_by(&mut compare))
    }

    /// Sorts the elements by the key `key` extracts. The sort is stable.
    #[must_use]
    pub fn sorted_by_key<K, F>(self, key: F) -> Self
    where
        K: Ord,
        F: FnMut(&T) -> K + Send + 'static,
    {
        self.reorder("sorted_by_key", move |items| items.sort_by_key(key))
    }

    /// Emits the elements in reverse order.
    #[must_use]
    pub fn reverse(self) -> Self {
        self.reorder("reverse", |items| items.reverse())
    }

    fn reorder<F>(self, name: &'static str, arrange: F) -> Self
    where
        F: FnOnce(&mut Vec<T>) + Send + 'static,
    {
        self.pipe(name, move |mut upstream, sender| async move {
            let mut items = Vec::new();
            while let Some(item) = upstream.next().await {
                items.push(item);
            }
            drop(upstream);
            arrange(&mut items);
            for item in items {
                if sender.send(item).await.is_err() {
                    break;
                }
            }
        })
    }
}
