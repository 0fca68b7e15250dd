//! Algorithms over strictly ascending slices.
//!
//! Every function here expects its inputs sorted in strictly ascending order
//! under `compare` and produces output with the same property. The binary
//! operations are linear two-pointer walks with a fast path for inputs whose
//! ranges do not overlap.

use std::cmp::Ordering;
use std::ops::{Bound, RangeBounds};

/// Returns `true` if `left` lies entirely before or entirely after `right`.
fn disjoint_ranges<T>(left: &[T], right: &[T], compare: &impl Fn(&T, &T) -> Ordering) -> bool {
    match (left.first(), left.last(), right.first(), right.last()) {
        (Some(left_first), Some(left_last), Some(right_first), Some(right_last)) => {
            compare(left_last, right_first) == Ordering::Less
                || compare(right_last, left_first) == Ordering::Less
        }
        _ => true,
    }
}

/// Translates `range` into `start..end` indices of `slice`, comparing the
/// bounds against `key(element)`. An inverted range yields an empty span.
pub(super) fn range_indices<T, Q, R>(slice: &[T], range: &R, key: impl Fn(&T) -> &Q) -> (usize, usize)
where
    Q: Ord + ?Sized,
    R: RangeBounds<Q>,
{
    let start = match range.start_bound() {
        Bound::Included(bound) => slice.partition_point(|element| key(element) < bound),
        Bound::Excluded(bound) => slice.partition_point(|element| key(element) <= bound),
        Bound::Unbounded => 0,
    };
    let end = match range.end_bound() {
        Bound::Included(bound) => slice.partition_point(|element| key(element) <= bound),
        Bound::Excluded(bound) => slice.partition_point(|element| key(element) < bound),
        Bound::Unbounded => slice.len(),
    };
    (start, end.max(start))
}

/// Sorts `items` and removes duplicates, keeping the last occurrence of each
/// equal run in input order.
pub(super) fn sort_dedup_keep_last<T>(
    mut items: Vec<T>,
    compare: impl Fn(&T, &T) -> Ordering,
) -> Vec<T> {
    // Stable sort keeps equal elements in input order.
    items.sort_by(|left, right| compare(left, right));
    let mut result: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        match result.last_mut() {
            Some(last) if compare(last, &item) == Ordering::Equal => *last = item,
            _ => result.push(item),
        }
    }
    result
}

/// Union of two sorted slices. When both sides hold an equal element,
/// `resolve(left, right)` produces the one that is kept.
pub(super) fn union_by<T: Clone>(
    left: &[T],
    right: &[T],
    compare: impl Fn(&T, &T) -> Ordering,
    mut resolve: impl FnMut(&T, &T) -> T,
) -> Vec<T> {
    if left.is_empty() {
        return right.to_vec();
    }
    if right.is_empty() {
        return left.to_vec();
    }

    let mut result = Vec::with_capacity(left.len() + right.len());
    if disjoint_ranges(left, right, &compare) {
        let (lower, upper) = if compare(&left[0], &right[0]) == Ordering::Less {
            (left, right)
        } else {
            (right, left)
        };
        result.extend_from_slice(lower);
        result.extend_from_slice(upper);
        return result;
    }

    let mut left_index = 0;
    let mut right_index = 0;
    while left_index < left.len() && right_index < right.len() {
        match compare(&left[left_index], &right[right_index]) {
            Ordering::Less => {
                result.push(left[left_index].clone());
                left_index += 1;
            }
            Ordering::Greater => {
                result.push(right[right_index].clone());
                right_index += 1;
            }
            Ordering::Equal => {
                result.push(resolve(&left[left_index], &right[right_index]));
                left_index += 1;
                right_index += 1;
            }
        }
    }
    result.extend_from_slice(&left[left_index..]);
    result.extend_from_slice(&right[right_index..]);
    result
}

/// Elements of `left` with no equal element in `right`.
pub(super) fn difference_by<T: Clone>(
    left: &[T],
    right: &[T],
    compare: impl Fn(&T, &T) -> Ordering,
) -> Vec<T> {
    if disjoint_ranges(left, right, &compare) {
        return left.to_vec();
    }

    let mut result = Vec::with_capacity(left.len());
    let mut left_index = 0;
    let mut right_index = 0;
    while left_index < left.len() && right_index < right.len() {
        match compare(&left[left_index], &right[right_index]) {
            Ordering::Less => {
                result.push(left[left_index].clone());
                left_index += 1;
            }
            Ordering::Greater => right_index += 1,
            Ordering::Equal => {
                left_index += 1;
                right_index += 1;
            }
        }
    }
    result.extend_from_slice(&left[left_index..]);
    result
}

/// Elements of `left` that have an equal element in `right`.
pub(super) fn intersection_by<T: Clone>(
    left: &[T],
    right: &[T],
    compare: impl Fn(&T, &T) -> Ordering,
) -> Vec<T> {
    if disjoint_ranges(left, right, &compare) {
        return Vec::new();
    }

    let mut result = Vec::with_capacity(left.len().min(right.len()));
    let mut left_index = 0;
    let mut right_index = 0;
    while left_index < left.len() && right_index < right.len() {
        match compare(&left[left_index], &right[right_index]) {
            Ordering::Less => left_index += 1,
            Ordering::Greater => right_index += 1,
            Ordering::Equal => {
                result.push(left[left_index].clone());
                left_index += 1;
                right_index += 1;
            }
        }
    }
    result
}

/// Elements present in exactly one of the two slices.
pub(super) fn symmetric_difference_by<T: Clone>(
    left: &[T],
    right: &[T],
    compare: impl Fn(&T, &T) -> Ordering,
) -> Vec<T> {
    let mut result = Vec::with_capacity(left.len() + right.len());
    if disjoint_ranges(left, right, &compare) {
        let (lower, upper) = match (left.first(), right.first()) {
            (Some(left_first), Some(right_first))
                if compare(right_first, left_first) == Ordering::Less =>
            {
                (right, left)
            }
            _ => (left, right),
        };
        result.extend_from_slice(lower);
        result.extend_from_slice(upper);
        return result;
    }

    let mut left_index = 0;
    let mut right_index = 0;
    while left_index < left.len() && right_index < right.len() {
        match compare(&left[left_index], &right[right_index]) {
            Ordering::Less => {
                result.push(left[left_index].clone());
                left_index += 1;
            }
            Ordering::Greater => {
                result.push(right[right_index].clone());
                right_index += 1;
            }
            Ordering::Equal => {
                left_index += 1;
                right_index += 1;
            }
        }
    }
    result.extend_from_slice(&left[left_index..]);
    result.extend_from_slice(&right[right_index..]);
    result
}

/// Returns `true` if every element of `left` has an equal element in
/// `right`. Stops at the first element of `left` that is missing.
pub(super) fn is_subset_by<T>(left: &[T], right: &[T], compare: impl Fn(&T, &T) -> Ordering) -> bool {
    if left.len() > right.len() {
        return false;
    }
    let mut candidates = right.iter();
    left.iter().all(|element| {
        candidates.find_map(|candidate| match compare(element, candidate) {
            Ordering::Greater => None,
            Ordering::Equal => Some(true),
            Ordering::Less => Some(false),
        }) == Some(true)
    })
}

/// Returns `true` if no element of `left` is equal to an element of
/// `right`. Stops at the first shared element.
pub(super) fn is_disjoint_by<T>(left: &[T], right: &[T], compare: impl Fn(&T, &T) -> Ordering) -> bool {
    if disjoint_ranges(left, right, &compare) {
        return true;
    }

    let mut left_index = 0;
    let mut right_index = 0;
    while left_index < left.len() && right_index < right.len() {
        match compare(&left[left_index], &right[right_index]) {
            Ordering::Less => left_index += 1,
            Ordering::Greater => right_index += 1,
            Ordering::Equal => return false,
        }
    }
    true
}

#[cfg(debug_assertions)]
pub(super) fn is_strictly_ascending_by<T>(
    slice: &[T],
    compare: impl Fn(&T, &T) -> Ordering,
) -> bool {
    slice
        .windows(2)
        .all(|window| compare(&window[0], &window[1]) == Ordering::Less)
}
