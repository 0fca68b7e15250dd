#![cfg(feature = "stream")]
//! Integration tests for the order-preserving concurrent map.
//!
//! The properties checked here:
//! - output order equals input order regardless of completion order
//! - no more than `concurrency` transforms are started but unread
//! - a panicking transform is resumed on the consumer at its position
//! - dropping the output stops further dispatch

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use fpkit::stream::{Stream, StreamConfig};
use rstest::rstest;

/// Tracks how many transforms are running and the highest count seen.
#[derive(Clone, Default)]
struct Gauge {
    running: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

impl Gauge {
    fn enter(&self) {
        let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    fn exit(&self) {
        self.running.fetch_sub(1, Ordering::SeqCst);
    }

    fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

// =============================================================================
// Ordering
// =============================================================================

#[rstest]
#[case(1)]
#[case(2)]
#[case(8)]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_reverse_completion_order_is_reordered(#[case] concurrency: usize) {
    let result = Stream::of(0..24_u64)
        .map_concurrent(concurrency, |value| {
            std::thread::sleep(Duration::from_millis(24 - value));
            value
        })
        .to_vec()
        .await;
    assert_eq!(result, (0..24).collect::<Vec<_>>());
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_async_transforms_keep_order() {
    let result = Stream::lazy(0..30_u64)
        .then_concurrent(5, |value| async move {
            tokio::time::sleep(Duration::from_millis((value * 7) % 11)).await;
            value.to_string()
        })
        .to_vec()
        .await;
    assert_eq!(result, (0..30).map(|value| value.to_string()).collect::<Vec<_>>());
}

#[rstest]
#[tokio::test]
async fn test_chained_concurrent_maps() {
    let result = Stream::of(1..=10)
        .map_concurrent(3, |value| value + 1)
        .then_concurrent(2, |value| async move { value * 2 })
        .map_concurrent(4, |value| value - 1)
        .to_vec()
        .await;
    assert_eq!(result, (1..=10).map(|value| (value + 1) * 2 - 1).collect::<Vec<_>>());
}

// =============================================================================
// In-flight bound
// =============================================================================

#[rstest]
#[case(1)]
#[case(3)]
#[case(6)]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_blocking_transforms_respect_bound(#[case] concurrency: usize) {
    let gauge = Gauge::default();
    let inner = gauge.clone();
    let count = Stream::of(0..40)
        .map_concurrent(concurrency, move |value| {
            inner.enter();
            std::thread::sleep(Duration::from_millis(1));
            inner.exit();
            value
        })
        .count()
        .await;
    assert_eq!(count, 40);
    assert!(gauge.peak() <= concurrency);
    assert!(gauge.peak() >= 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_slow_consumer_limits_started_transforms() {
    let started = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&started);
    let config = StreamConfig::new(1, 1);
    let mut stream = Stream::lazy(0..1_000)
        .configure(config)
        .then_concurrent(4, move |value| {
            counter.fetch_add(1, Ordering::SeqCst);
            async move { value }
        });

    assert_eq!(stream.next().await, Some(0));
    tokio::time::sleep(Duration::from_millis(30)).await;
    // 4 cells, one value in the reader, one in the output channel, and the
    // one already consumed.
    assert!(started.load(Ordering::SeqCst) <= 4 + 1 + 1 + 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_map_uses_configured_concurrency() {
    let gauge = Gauge::default();
    let inner = gauge.clone();
    let config = StreamConfig::new(4, 2);
    let result = Stream::of(0..20)
        .configure(config)
        .map_parallel(move |value| {
            inner.enter();
            std::thread::sleep(Duration::from_millis(1));
            inner.exit();
            value
        })
        .to_vec()
        .await;
    assert_eq!(result, (0..20).collect::<Vec<_>>());
    assert!(gauge.peak() <= 2);
}

// =============================================================================
// Failure and cancellation
// =============================================================================

#[rstest]
#[tokio::test]
async fn test_panic_is_resumed_after_preceding_elements() {
    let delivered = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&delivered);
    let consumer = tokio::spawn(async move {
        Stream::of(0..8)
            .then_concurrent(3, |value| async move {
                assert!(value != 5, "element 5 failed");
                value
            })
            .for_each(|value| sink.lock().unwrap().push(value))
            .await;
    });

    let error = consumer.await.unwrap_err();
    assert!(error.is_panic());
    assert_eq!(*delivered.lock().unwrap(), vec![0, 1, 2, 3, 4]);
}

#[rstest]
#[tokio::test]
async fn test_upstream_panic_passes_through_concurrent_map() {
    let consumer = tokio::spawn(async {
        Stream::lazy(0..5)
            .map(|value| {
                assert!(value < 2, "upstream failed");
                value
            })
            .map_concurrent(2, |value| value)
            .to_vec()
            .await
    });
    assert!(consumer.await.unwrap_err().is_panic());
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_in_flight_work_completes_after_drop() {
    let finished = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&finished);
    let mut stream = Stream::of(0..3).map_concurrent(3, move |value| {
        std::thread::sleep(Duration::from_millis(20));
        counter.fetch_add(1, Ordering::SeqCst);
        value
    });

    assert_eq!(stream.next().await, Some(0));
    drop(stream);
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(finished.load(Ordering::SeqCst), 3);
}

#[rstest]
#[should_panic(expected = "concurrency must be greater than 0")]
fn test_zero_concurrency_is_rejected() {
    let _ = Stream::of(0..3).then_concurrent(0, |value: i32| async move { value });
}
