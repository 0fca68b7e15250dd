//! Ordered persistent map backed by a shared sorted slice of entries.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FusedIterator;
use std::ops::RangeBounds;
use std::sync::Arc;

use super::OrderedSet;
use super::sorted;

fn compare_keys<K: Ord, V>(left: &(K, V), right: &(K, V)) -> Ordering {
    left.0.cmp(&right.0)
}

fn borrowed_key<K: Borrow<Q>, Q: ?Sized, V>(entry: &(K, V)) -> &Q {
    entry.0.borrow()
}

/// A persistent map whose entries are kept in ascending key order.
///
/// Entries live in one `Arc<[(K, V)]>` slice. Lookups are binary searches;
/// updates copy the slice once and return a new map, so every earlier
/// version stays valid and cheap to clone.
///
/// # Time Complexity
///
/// | Operation             | Complexity |
/// |-----------------------|------------|
/// | `get`/`contains_key`  | O(log n)   |
/// | `insert`/`remove`     | O(n)       |
/// | `len`/`clone`         | O(1)       |
/// | `merge_with`          | O(n + m)   |
///
/// # Examples
///
/// ```rust
/// use fpkit::collection::OrderedMap;
///
/// let map: OrderedMap<&str, i32> = [("b", 2), ("a", 1), ("b", 3)].into_iter().collect();
///
/// // Later duplicates win
/// assert_eq!(map.get(&"b"), Some(&3));
///
/// let entries: Vec<(&&str, &i32)> = map.iter().collect();
/// assert_eq!(entries, vec![(&"a", &1), (&"b", &3)]);
/// ```
#[derive(Clone)]
pub struct OrderedMap<K, V> {
    entries: Arc<[(K, V)]>,
}

impl<K, V> OrderedMap<K, V> {
    /// Creates an empty map.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Arc::from(Vec::new()),
        }
    }

    /// Returns the number of entries.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the map holds no entries.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the entry with the smallest key.
    #[must_use]
    pub fn first(&self) -> Option<(&K, &V)> {
        self.entries.first().map(|(key, value)| (key, value))
    }

    /// Returns the entry with the largest key.
    #[must_use]
    pub fn last(&self) -> Option<(&K, &V)> {
        self.entries.last().map(|(key, value)| (key, value))
    }

    /// Returns an iterator over the entries in ascending key order.
    #[inline]
    pub fn iter(&self) -> OrderedMapIterator<'_, K, V> {
        OrderedMapIterator {
            inner: self.entries.iter(),
        }
    }

    /// Returns an iterator over the keys in ascending order.
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + ExactSizeIterator {
        self.entries.iter().map(|(key, _)| key)
    }

    /// Returns an iterator over the values in ascending key order.
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + ExactSizeIterator {
        self.entries.iter().map(|(_, value)| value)
    }

    fn from_strictly_ascending(entries: Vec<(K, V)>) -> Self {
        Self {
            entries: Arc::from(entries),
        }
    }
}

impl<K: Ord + Clone, V: Clone> OrderedMap<K, V> {
    /// Creates a map holding a single entry.
    #[inline]
    #[must_use]
    pub fn singleton(key: K, value: V) -> Self {
        Self::from_strictly_ascending(vec![(key, value)])
    }

    fn position<Q>(&self, key: &Q) -> Result<usize, usize>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.entries
            .binary_search_by(|(candidate, _)| candidate.borrow().cmp(key))
    }

    /// Returns the value stored under `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fpkit::collection::OrderedMap;
    ///
    /// let map = OrderedMap::singleton("key".to_string(), 42);
    /// assert_eq!(map.get("key"), Some(&42));
    /// assert_eq!(map.get("missing"), None);
    /// ```
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.position(key)
            .ok()
            .map(|index| &self.entries[index].1)
    }

    /// Returns the stored key and value for `key`.
    #[must_use]
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.position(key).ok().map(|index| {
            let (stored_key, value) = &self.entries[index];
            (stored_key, value)
        })
    }

    /// Returns `true` if the map has an entry for `key`.
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.position(key).is_ok()
    }

    /// Returns a map where `key` is bound to `value`, replacing any previous
    /// binding.
    #[must_use]
    pub fn insert(&self, key: K, value: V) -> Self {
        self.insert_with(key, value, |_, incoming| incoming)
    }

    /// Returns a map where `key` is bound to `value`. If `key` is already
    /// bound, the stored value becomes `merge(existing, value)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fpkit::collection::OrderedMap;
    ///
    /// let map = OrderedMap::singleton("hits", 1);
    /// let map = map.insert_with("hits", 1, |existing, incoming| existing + incoming);
    /// assert_eq!(map.get(&"hits"), Some(&2));
    /// ```
    #[must_use]
    pub fn insert_with<F>(&self, key: K, value: V, merge: F) -> Self
    where
        F: FnOnce(&V, V) -> V,
    {
        let mut entries = Vec::with_capacity(self.len() + 1);
        match self.position(&key) {
            Ok(index) => {
                let merged = merge(&self.entries[index].1, value);
                entries.extend_from_slice(&self.entries[..index]);
                entries.push((key, merged));
                entries.extend_from_slice(&self.entries[index + 1..]);
            }
            Err(index) => {
                entries.extend_from_slice(&self.entries[..index]);
                entries.push((key, value));
                entries.extend_from_slice(&self.entries[index..]);
            }
        }
        Self::from_strictly_ascending(entries)
    }

    /// Returns a map where the value under `key` is replaced by
    /// `function(existing)`. A missing key leaves the map unchanged.
    #[must_use]
    pub fn update<Q, F>(&self, key: &Q, function: F) -> Self
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
        F: FnOnce(&V) -> V,
    {
        match self.position(key) {
            Err(_) => self.clone(),
            Ok(index) => {
                let mut entries = self.entries.to_vec();
                entries[index].1 = function(&self.entries[index].1);
                Self::from_strictly_ascending(entries)
            }
        }
    }

    /// Returns a map without an entry for `key`.
    #[must_use]
    pub fn remove<Q>(&self, key: &Q) -> Self
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match self.position(key) {
            Err(_) => self.clone(),
            Ok(index) => {
                let mut entries = Vec::with_capacity(self.len() - 1);
                entries.extend_from_slice(&self.entries[..index]);
                entries.extend_from_slice(&self.entries[index + 1..]);
                Self::from_strictly_ascending(entries)
            }
        }
    }

    /// Returns an iterator over the entries whose keys fall inside `range`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fpkit::collection::OrderedMap;
    ///
    /// let map: OrderedMap<i32, char> = [(1, 'a'), (2, 'b'), (3, 'c')].into_iter().collect();
    /// let tail: Vec<char> = map.range(2..).map(|(_, value)| *value).collect();
    /// assert_eq!(tail, vec!['b', 'c']);
    /// ```
    pub fn range<Q, R>(&self, range: R) -> OrderedMapIterator<'_, K, V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
        R: RangeBounds<Q>,
    {
        let (start, end) =
            sorted::range_indices(&self.entries, &range, borrowed_key::<K, Q, V>);
        OrderedMapIterator {
            inner: self.entries[start..end].iter(),
        }
    }

    /// Combines two maps. Keys present in both are resolved with
    /// `function(key, self_value, other_value)`.
    #[must_use]
    pub fn merge_with<F>(&self, other: &Self, mut function: F) -> Self
    where
        F: FnMut(&K, &V, &V) -> V,
    {
        Self::from_strictly_ascending(sorted::union_by(
            &self.entries,
            &other.entries,
            compare_keys,
            |(key, left), (_, right)| (key.clone(), function(key, left, right)),
        ))
    }

    /// Returns the keys as an [`OrderedSet`].
    #[must_use]
    pub fn key_set(&self) -> OrderedSet<K> {
        OrderedSet::from_sorted_vec(self.keys().cloned().collect())
    }
}

#[cfg(feature = "rayon")]
impl<K: Sync, V: Sync> OrderedMap<K, V> {
    /// Returns a parallel iterator over the entries.
    pub fn par_iter(&self) -> rayon::slice::Iter<'_, (K, V)> {
        use rayon::prelude::*;
        self.entries.par_iter()
    }
}

#[cfg(feature = "stream")]
impl<K, V> OrderedMap<K, V>
where
    K: Ord + Clone + Send + 'static,
    V: Clone + Send + 'static,
{
    /// Converts the map into an eager stream of `(key, value)` pairs in
    /// ascending key order.
    pub fn into_stream(self) -> crate::stream::Stream<(K, V)> {
        crate::stream::Stream::of(self)
    }
}

impl<K, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for OrderedMap<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for OrderedMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries) || self.entries == other.entries
    }
}

impl<K: Eq, V: Eq> Eq for OrderedMap<K, V> {}

impl<K: Hash, V: Hash> Hash for OrderedMap<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.entries.hash(state);
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for OrderedMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let entries = sorted::sort_dedup_keep_last(iter.into_iter().collect(), compare_keys);
        Self::from_strictly_ascending(entries)
    }
}

/// Borrowing iterator over an [`OrderedMap`] in ascending key order.
#[derive(Clone)]
pub struct OrderedMapIterator<'a, K, V> {
    inner: std::slice::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iterator for OrderedMapIterator<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, value)| (key, value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for OrderedMapIterator<'_, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(key, value)| (key, value))
    }
}

impl<K, V> ExactSizeIterator for OrderedMapIterator<'_, K, V> {}

impl<K, V> FusedIterator for OrderedMapIterator<'_, K, V> {}

impl<'a, K, V> IntoIterator for &'a OrderedMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = OrderedMapIterator<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Owning iterator over an [`OrderedMap`] in ascending key order.
pub struct OrderedMapIntoIterator<K, V> {
    entries: Arc<[(K, V)]>,
    front: usize,
    back: usize,
}

impl<K: Clone, V: Clone> Iterator for OrderedMapIntoIterator<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        let entry = self.entries[self.front].clone();
        self.front += 1;
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<K: Clone, V: Clone> DoubleEndedIterator for OrderedMapIntoIterator<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        Some(self.entries[self.back].clone())
    }
}

impl<K: Clone, V: Clone> ExactSizeIterator for OrderedMapIntoIterator<K, V> {}

impl<K: Clone, V: Clone> IntoIterator for OrderedMap<K, V> {
    type Item = (K, V);
    type IntoIter = OrderedMapIntoIterator<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        let back = self.entries.len();
        OrderedMapIntoIterator {
            entries: self.entries,
            front: 0,
            back,
        }
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<K, V> serde::Serialize for OrderedMap<K, V>
where
    K: serde::Serialize,
    V: serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(feature = "serde")]
struct OrderedMapVisitor<K, V> {
    marker: std::marker::PhantomData<(K, V)>,
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::de::Visitor<'de> for OrderedMapVisitor<K, V>
where
    K: serde::Deserialize<'de> + Ord,
    V: serde::Deserialize<'de>,
{
    type Value = OrderedMap<K, V>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some(entry) = access.next_entry()? {
            entries.push(entry);
        }
        Ok(entries.into_iter().collect())
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::Deserialize<'de> for OrderedMap<K, V>
where
    K: serde::Deserialize<'de> + Ord,
    V: serde::Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_map(OrderedMapVisitor {
            marker: std::marker::PhantomData,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
