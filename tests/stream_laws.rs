#![cfg(feature = "stream")]
//! Property-based tests for `Stream`.
//!
//! Every stream operation must agree with the equivalent `Iterator`
//! operation on the same input.

use fpkit::stream::{Stream, StreamConfig};
use proptest::prelude::*;

fn small_config() -> impl Strategy<Value = StreamConfig> {
    (1..8_usize, 1..6_usize).prop_map(|(buffer_size, concurrency)| StreamConfig::new(buffer_size, concurrency))
}

// =============================================================================
// Concurrent Map Law
// Description: map_concurrent(n, f) == map(f) for every n
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_map_concurrent_equals_map(
        input in prop::collection::vec(any::<i32>(), 0..64),
        config in small_config()
    ) {
        let expected: Vec<i64> = input.iter().map(|value| i64::from(*value) * 3).collect();
        let actual = Stream::of(input)
            .configure(config)
            .map_parallel(|value| i64::from(value) * 3)
            .collect_blocking();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn prop_then_concurrent_equals_map(
        input in prop::collection::vec(any::<u16>(), 0..64),
        concurrency in 1..10_usize
    ) {
        let expected: Vec<u32> = input.iter().map(|value| u32::from(*value) + 1).collect();
        let actual = Stream::lazy(input)
            .then_concurrent(concurrency, |value| async move { u32::from(value) + 1 })
            .collect_blocking();
        prop_assert_eq!(actual, expected);
    }
}

// =============================================================================
// Iterator Agreement Laws
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_skip_limit_agree_with_iterator(
        input in prop::collection::vec(any::<i32>(), 0..64),
        skip in 0..70_usize,
        limit in 0..70_usize
    ) {
        let expected: Vec<i32> = input.iter().copied().skip(skip).take(limit).collect();
        let actual = Stream::of(input).skip(skip).limit(limit).collect_blocking();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn prop_sorted_agrees_with_sort(input in prop::collection::vec(any::<i32>(), 0..64)) {
        let mut expected = input.clone();
        expected.sort_unstable();
        prop_assert_eq!(Stream::lazy(input).sorted().collect_blocking(), expected);
    }

    #[test]
    fn prop_chunks_flatten_to_input(
        input in prop::collection::vec(any::<i32>(), 0..64),
        size in 1..10_usize
    ) {
        let chunks = Stream::of(input.clone()).chunks(size).collect_blocking();
        prop_assert!(chunks.iter().all(|chunk| !chunk.is_empty() && chunk.len() <= size));
        prop_assert_eq!(chunks.concat(), input);
    }

    #[test]
    fn prop_take_while_skip_while_partition(
        input in prop::collection::vec(0..10_i32, 0..64),
        threshold in 0..10_i32
    ) {
        let taken = Stream::of(input.clone()).take_while(move |value| *value < threshold).collect_blocking();
        let skipped = Stream::of(input.clone()).skip_while(move |value| *value < threshold).collect_blocking();
        prop_assert_eq!([taken, skipped].concat(), input);
    }
}
