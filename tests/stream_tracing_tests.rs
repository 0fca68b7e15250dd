#![cfg(all(feature = "stream", feature = "tracing"))]
//! Tests for the diagnostic events emitted by pipeline stages.

use std::io;
use std::sync::{Arc, Mutex};

use fpkit::stream::Stream;
use rstest::rstest;
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

/// Writer that appends formatted events to a shared buffer.
#[derive(Clone, Default)]
struct CapturedOutput {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl CapturedOutput {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedOutput {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buffer.lock().unwrap().extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedOutput {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn capture(level: Level) -> (CapturedOutput, tracing::subscriber::DefaultGuard) {
    let output = CapturedOutput::default();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(false)
        .with_writer(output.clone())
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (output, guard)
}

#[rstest]
#[tokio::test(flavor = "current_thread")]
async fn test_stage_lifecycle_is_logged() {
    let (output, _guard) = capture(Level::DEBUG);

    let result = Stream::of(1..=3).map(|value| value * 10).to_vec().await;
    assert_eq!(result, vec![10, 20, 30]);

    let logs = output.contents();
    assert!(logs.contains("stream stage started"), "{logs}");
    assert!(logs.contains("stream stage finished"), "{logs}");
    assert!(logs.contains("stage=\"map\""), "{logs}");
}

#[rstest]
#[tokio::test(flavor = "current_thread")]
async fn test_dispatch_is_traced_per_element() {
    let (output, _guard) = capture(Level::TRACE);

    let count = Stream::of(0..4)
        .then_concurrent(2, |value| async move { value })
        .count()
        .await;
    assert_eq!(count, 4);

    let logs = output.contents();
    assert_eq!(logs.matches("dispatched element").count(), 4, "{logs}");
}

#[rstest]
#[tokio::test(flavor = "current_thread")]
async fn test_info_level_is_quiet() {
    let (output, _guard) = capture(Level::INFO);

    let _ = Stream::of(0..4).filter(|value| value % 2 == 0).to_vec().await;
    assert!(output.contents().is_empty());
}
