//! Ordered persistent set backed by a shared sorted slice.
//!
//! # Time Complexity
//!
//! | Operation        | Complexity  |
//! |------------------|-------------|
//! | `contains`/`get` | O(log n)    |
//! | `insert`         | O(n)        |
//! | `remove`         | O(n)        |
//! | `len`            | O(1)        |
//! | `clone`          | O(1)        |
//! | `range`          | O(log n)    |
//! | set algebra      | O(n + m)    |

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FusedIterator;
use std::ops::RangeBounds;
use std::sync::Arc;

use super::sorted;

/// A persistent set whose elements are kept in ascending order.
///
/// Elements live in one `Arc<[T]>` slice. Every update returns a new set;
/// the receiver is left unchanged and clones share storage.
///
/// # Examples
///
/// ```rust
/// use fpkit::collection::OrderedSet;
///
/// let set = OrderedSet::new().insert(3).insert(1).insert(2);
/// let sorted: Vec<i32> = set.iter().copied().collect();
/// assert_eq!(sorted, vec![1, 2, 3]);
///
/// let smaller = set.remove(&2);
/// assert!(set.contains(&2));
/// assert!(!smaller.contains(&2));
/// ```
#[derive(Clone)]
pub struct OrderedSet<T> {
    elements: Arc<[T]>,
}

impl<T> OrderedSet<T> {
    /// Creates an empty set.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            elements: Arc::from(Vec::new()),
        }
    }

    /// Returns the number of elements.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if the set holds no elements.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns the smallest element.
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.elements.first()
    }

    /// Returns the largest element.
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.elements.last()
    }

    /// Returns the elements as an ascending slice.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.elements
    }

    /// Returns an iterator over the elements in ascending order.
    #[inline]
    pub fn iter(&self) -> OrderedSetIterator<'_, T> {
        OrderedSetIterator {
            inner: self.elements.iter(),
        }
    }

    fn from_strictly_ascending(elements: Vec<T>) -> Self {
        Self {
            elements: Arc::from(elements),
        }
    }
}

impl<T: Ord + Clone> OrderedSet<T> {
    /// Creates a set holding exactly one element.
    #[inline]
    #[must_use]
    pub fn singleton(element: T) -> Self {
        Self::from_strictly_ascending(vec![element])
    }

    /// Creates a set from a vector that is already strictly ascending.
    ///
    /// The order is only checked in debug builds; an unsorted or duplicated
    /// input in release builds yields a set whose lookups are unspecified.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `elements` is not strictly ascending.
    #[must_use]
    pub fn from_sorted_vec(elements: Vec<T>) -> Self {
        #[cfg(debug_assertions)]
        debug_assert!(
            sorted::is_strictly_ascending_by(&elements, Ord::cmp),
            "from_sorted_vec requires strictly ascending elements"
        );
        Self::from_strictly_ascending(elements)
    }

    fn position<Q>(&self, element: &Q) -> Result<usize, usize>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.elements
            .binary_search_by(|candidate| candidate.borrow().cmp(element))
    }

    /// Returns `true` if the set contains an element equal to `element`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fpkit::collection::OrderedSet;
    ///
    /// let set: OrderedSet<String> = ["a".to_string()].into_iter().collect();
    /// assert!(set.contains("a"));
    /// ```
    #[must_use]
    pub fn contains<Q>(&self, element: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.position(element).is_ok()
    }

    /// Returns the stored element equal to `element`.
    #[must_use]
    pub fn get<Q>(&self, element: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.position(element)
            .ok()
            .map(|index| &self.elements[index])
    }

    /// Returns a set that also contains `element`.
    ///
    /// If an equal element is already present the result shares storage
    /// with `self`.
    #[must_use]
    pub fn insert(&self, element: T) -> Self {
        match self.position(&element) {
            Ok(_) => self.clone(),
            Err(index) => {
                let mut elements = Vec::with_capacity(self.len() + 1);
                elements.extend_from_slice(&self.elements[..index]);
                elements.push(element);
                elements.extend_from_slice(&self.elements[index..]);
                Self::from_strictly_ascending(elements)
            }
        }
    }

    /// Returns a set without the element equal to `element`.
    #[must_use]
    pub fn remove<Q>(&self, element: &Q) -> Self
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match self.position(element) {
            Err(_) => self.clone(),
            Ok(index) => {
                let mut elements = Vec::with_capacity(self.len() - 1);
                elements.extend_from_slice(&self.elements[..index]);
                elements.extend_from_slice(&self.elements[index + 1..]);
                Self::from_strictly_ascending(elements)
            }
        }
    }

    /// Returns an iterator over the elements that fall inside `range`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fpkit::collection::OrderedSet;
    ///
    /// let set: OrderedSet<i32> = (1..=10).collect();
    /// let middle: Vec<i32> = set.range(4..7).copied().collect();
    /// assert_eq!(middle, vec![4, 5, 6]);
    /// ```
    pub fn range<Q, R>(&self, range: R) -> OrderedSetIterator<'_, T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
        R: RangeBounds<Q>,
    {
        let (start, end) =
            sorted::range_indices(&self.elements, &range, <T as Borrow<Q>>::borrow);
        OrderedSetIterator {
            inner: self.elements[start..end].iter(),
        }
    }

    /// Copies the elements into a new ascending vector.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.elements.to_vec()
    }

    /// Returns the elements present in either set.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self::from_strictly_ascending(sorted::union_by(
            &self.elements,
            &other.elements,
            Ord::cmp,
            |kept, _| kept.clone(),
        ))
    }

    /// Returns the elements present in both sets.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        Self::from_strictly_ascending(sorted::intersection_by(
            &self.elements,
            &other.elements,
            Ord::cmp,
        ))
    }

    /// Returns the elements of `self` that are not in `other`.
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        Self::from_strictly_ascending(sorted::difference_by(
            &self.elements,
            &other.elements,
            Ord::cmp,
        ))
    }

    /// Returns the elements present in exactly one of the two sets.
    #[must_use]
    pub fn symmetric_difference(&self, other: &Self) -> Self {
        Self::from_strictly_ascending(sorted::symmetric_difference_by(
            &self.elements,
            &other.elements,
            Ord::cmp,
        ))
    }

    /// Returns `true` if every element of `self` is in `other`.
    #[must_use]
    pub fn is_subset(&self, other: &Self) -> bool {
        sorted::is_subset_by(&self.elements, &other.elements, Ord::cmp)
    }

    /// Returns `true` if the sets share no element.
    #[must_use]
    pub fn is_disjoint(&self, other: &Self) -> bool {
        sorted::is_disjoint_by(&self.elements, &other.elements, Ord::cmp)
    }
}

#[cfg(feature = "rayon")]
impl<T: Sync> OrderedSet<T> {
    /// Returns a parallel iterator over the elements.
    ///
    /// Indexed operations such as `collect::<Vec<_>>()` keep ascending order.
    pub fn par_iter(&self) -> rayon::slice::Iter<'_, T> {
        use rayon::prelude::*;
        self.elements.par_iter()
    }
}

#[cfg(feature = "stream")]
impl<T: Ord + Clone + Send + 'static> OrderedSet<T> {
    /// Converts the set into an eager stream of its elements in ascending order.
    pub fn into_stream(self) -> crate::stream::Stream<T> {
        crate::stream::Stream::of(self)
    }
}

impl<T> Default for OrderedSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for OrderedSet<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_set().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for OrderedSet<T> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.elements, &other.elements) || self.elements == other.elements
    }
}

impl<T: Eq> Eq for OrderedSet<T> {}

impl<T: Hash> Hash for OrderedSet<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.elements.hash(state);
    }
}

impl<T: PartialOrd> PartialOrd for OrderedSet<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.elements.partial_cmp(&other.elements)
    }
}

impl<T: Ord> Ord for OrderedSet<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.elements.cmp(&other.elements)
    }
}

impl<T: Ord> FromIterator<T> for OrderedSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let elements = sorted::sort_dedup_keep_last(iter.into_iter().collect(), Ord::cmp);
        Self::from_strictly_ascending(elements)
    }
}

/// Borrowing iterator over an [`OrderedSet`] in ascending order.
#[derive(Clone)]
pub struct OrderedSetIterator<'a, T> {
    inner: std::slice::Iter<'a, T>,
}

impl<'a, T> Iterator for OrderedSetIterator<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for OrderedSetIterator<'_, T> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for OrderedSetIterator<'_, T> {}

impl<T> FusedIterator for OrderedSetIterator<'_, T> {}

impl<'a, T> IntoIterator for &'a OrderedSet<T> {
    type Item = &'a T;
    type IntoIter = OrderedSetIterator<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Owning iterator over an [`OrderedSet`] in ascending order.
///
/// Elements are cloned out of the shared slice, which other versions may
/// still reference.
pub struct OrderedSetIntoIterator<T> {
    elements: Arc<[T]>,
    front: usize,
    back: usize,
}

impl<T: Clone> Iterator for OrderedSetIntoIterator<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        let element = self.elements[self.front].clone();
        self.front += 1;
        Some(element)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<T: Clone> DoubleEndedIterator for OrderedSetIntoIterator<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        Some(self.elements[self.back].clone())
    }
}

impl<T: Clone> ExactSizeIterator for OrderedSetIntoIterator<T> {}

impl<T: Clone> IntoIterator for OrderedSet<T> {
    type Item = T;
    type IntoIter = OrderedSetIntoIterator<T>;

    fn into_iter(self) -> Self::IntoIter {
        let back = self.elements.len();
        OrderedSetIntoIterator {
            elements: self.elements,
            front: 0,
            back,
        }
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<T: serde::Serialize> serde::Serialize for OrderedSet<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;
        let mut sequence = serializer.serialize_seq(Some(self.len()))?;
        for element in self {
            sequence.serialize_element(element)?;
        }
        sequence.end()
    }
}

#[cfg(feature = "serde")]
struct OrderedSetVisitor<T> {
    marker: std::marker::PhantomData<T>,
}

#[cfg(feature = "serde")]
impl<'de, T> serde::de::Visitor<'de> for OrderedSetVisitor<T>
where
    T: serde::Deserialize<'de> + Ord,
{
    type Value = OrderedSet<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence")
    }

    fn visit_seq<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        let mut elements = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some(element) = access.next_element()? {
            elements.push(element);
        }
        Ok(elements.into_iter().collect())
    }
}

#[cfg(feature = "serde")]
impl<'de, T> serde::Deserialize<'de> for OrderedSet<T>
where
    T: serde::Deserialize<'de> + Ord,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(OrderedSetVisitor {
            marker: std::marker::PhantomData,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
