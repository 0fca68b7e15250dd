//! Channel-backed streams.
//!
//! A [`Stream`] is the receiving end of a bounded channel plus the tokio
//! tasks feeding it. Every intermediate operation spawns one task that reads
//! from the previous stream and writes into a fresh channel, so a pipeline
//! is a chain of tasks joined by bounded buffers:
//!
//! ```text
//! source ──▶ [map] ──▶ [filter] ──▶ [map_concurrent] ──▶ consumer
//!        chan       chan         chan                 chan
//! ```
//!
//! Backpressure comes from the channel capacity
//! ([`StreamConfig::buffer_size`]). Dropping a stream closes its channel;
//! the stage feeding it notices on its next send and stops, which in turn
//! drops *its* upstream.
//!
//! # Sources
//!
//! - [`Stream::of`] and `FromIterator` are *eager*: all items are moved into
//!   the channel up front and no task is spawned.
//! - [`Stream::lazy`], [`Stream::iterate`], [`Stream::generate`] and
//!   [`Stream::from_stream`] are *lazy*: a producer task pulls the next
//!   item only when the channel has room.
//!
//! # Concurrent map
//!
//! [`Stream::map_concurrent`] and [`Stream::then_concurrent`] apply a
//! transform to up to `concurrency` elements at once and emit results in
//! input order. The ordering and in-flight guarantees are listed on
//! [`Stream::map_concurrent`].
//!
//! # Panics
//!
//! A panic inside any user closure is captured by the task running it and
//! resumed on the consumer when the consumer reaches that point of the
//! stream. Nothing is caught or converted into an error value.
//!
//! # Runtime
//!
//! Stages run on the current tokio runtime when the stream is built inside
//! one, and on a global multi-thread runtime otherwise (see [`runtime`]).
//! The `*_blocking` terminals drive a stream from synchronous code.
//!
//! # Examples
//!
//! ```rust
//! use fpkit::stream::Stream;
//!
//! let words: Vec<String> = Stream::lazy(["delta", "alpha", "charlie", "bravo"])
//!     .filter(|word| word.len() == 5)
//!     .map(str::to_uppercase)
//!     .sorted()
//!     .collect_blocking();
//! assert_eq!(words, vec!["ALPHA", "BRAVO", "DELTA"]);
//! ```

mod blocking;
mod concurrent;
mod config;
mod operation;
pub mod runtime;
mod source;
mod stage;
mod terminal;

pub use blocking::BlockingIter;
pub use config::{StreamConfig, StreamError};
pub use runtime::BlockingError;

use std::fmt;
use std::future::poll_fn;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::mpsc;

use stage::StageSet;

/// An ordered sequence of values produced by a pipeline of tokio tasks.
///
/// Built with one of the [sources](self#sources), transformed with the
/// intermediate operations, and consumed by exactly one terminal operation.
/// `Stream<T>` also implements [`futures::Stream`], so any `StreamExt`
/// combinator works on it.
pub struct Stream<T> {
    receiver: mpsc::Receiver<T>,
    stages: StageSet,
    config: StreamConfig,
}

impl<T> Stream<T> {
    const fn from_parts(
        receiver: mpsc::Receiver<T>,
        stages: StageSet,
        config: StreamConfig,
    ) -> Self {
        Self {
            receiver,
            stages,
            config,
        }
    }

    /// The configuration inherited by stages appended to this stream.
    #[must_use]
    pub const fn config(&self) -> StreamConfig {
        self.config
    }

    /// Replaces the configuration inherited by stages appended after this
    /// point. Stages already in the pipeline keep their channels.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fpkit::stream::{Stream, StreamConfig};
    ///
    /// let config = StreamConfig::new(4, 2);
    /// let stream = Stream::of(1..=3).configure(config);
    /// assert_eq!(stream.config(), config);
    /// ```
    #[must_use]
    pub fn configure(mut self, config: StreamConfig) -> Self {
        self.config = config;
        self
    }

    /// Receives the next element, or `None` once the stream is exhausted.
    ///
    /// # Panics
    ///
    /// Resumes a panic raised by any stage of the pipeline.
    pub async fn next(&mut self) -> Option<T> {
        poll_fn(|context| self.poll_receive(context)).await
    }

    fn poll_receive(&mut self, context: &mut Context<'_>) -> Poll<Option<T>> {
        match self.receiver.poll_recv(context) {
            Poll::Ready(Some(item)) => Poll::Ready(Some(item)),
            // Every sender is gone: the producing tasks have returned or
            // unwound. Join them so a panic reaches the consumer.
            Poll::Ready(None) => self.stages.poll_join(context).map(|()| None),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<T> futures::Stream for Stream<T> {
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, context: &mut Context<'_>) -> Poll<Option<T>> {
        self.get_mut().poll_receive(context)
    }
}

impl<T> fmt::Debug for Stream<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Stream")
            .field("config", &self.config)
            .field("buffered", &self.receiver.len())
            .finish_non_exhaustive()
    }
}

static_assertions::assert_impl_all!(Stream<i32>: Send, Sync, Unpin);
static_assertions::assert_impl_all!(StreamConfig: Send, Sync, Copy);
