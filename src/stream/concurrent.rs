//! Order-preserving concurrent map.
//!
//! # Implementation
//!
//! Two tasks cooperate through a bounded FIFO queue of *cells*:
//!
//! - the **dispatcher** acquires a permit from a `Semaphore` of
//!   `concurrency` permits, pulls the next element, starts its transform
//!   as a separate task, and pushes `(JoinHandle, permit)` onto the queue;
//! - the **reader** pops cells in FIFO order, awaits each handle, releases
//!   its permit and forwards the value downstream.
//!
//! A cell is the transform's `JoinHandle`, which is written once by the
//! transform and read once by the reader. Because the permit is released
//! only after the reader has taken the result, at most `concurrency`
//! transforms are ever started but unread.
//!
//! ```text
//!            permits (n)
//!                │
//! upstream ─▶ dispatcher ──▶ [cell][cell]…[cell] ──▶ reader ─▶ downstream
//!                │            FIFO, capacity n        ▲
//!                └─ spawn ─▶ transform ─── result ────┘
//! ```

use std::future::Future;
use std::panic;
use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore, mpsc};
use tokio::task::{JoinError, JoinHandle};

use super::Stream;
use super::config::StreamError;
use super::stage::{StageSet, spawn_stage, until_closed};

/// A started transform and the permit it holds until its result is read.
type Cell<U> = (JoinHandle<U>, OwnedSemaphorePermit);

impl<T: Send + 'static> Stream<T> {
    /// Applies a synchronous `function` to up to `concurrency` elements at
    /// once, emitting results in input order.
    ///
    /// Each call runs on tokio's blocking thread pool, so `function` may
    /// block or burn CPU.
    ///
    /// Guarantees:
    ///
    /// - the output order equals the input order;
    /// - at most `concurrency` calls have started whose result has not yet
    ///   been taken by the reader;
    /// - once the output is dropped no further calls start, while calls
    ///   already running finish;
    /// - a panic in `function` is resumed on the consumer when it reaches
    ///   that element's position.
    ///
    /// # Panics
    ///
    /// Panics if `concurrency` is zero.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fpkit::stream::Stream;
    /// use std::time::Duration;
    ///
    /// let result = Stream::of([30_u64, 10, 20])
    ///     .map_concurrent(3, |millis| {
    ///         std::thread::sleep(Duration::from_millis(millis));
    ///         millis
    ///     })
    ///     .collect_blocking();
    /// assert_eq!(result, vec![30, 10, 20]);
    /// ```
    pub fn map_concurrent<U, F>(self, concurrency: usize, function: F) -> Stream<U>
    where
        U: Send + 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        let function = Arc::new(function);
        self.dispatch("map_concurrent", concurrency, move |item| {
            let function = Arc::clone(&function);
            tokio::task::spawn_blocking(move || function(item))
        })
    }

    /// Applies an asynchronous `function` to up to `concurrency` elements at
    /// once, emitting results in input order. Each returned future runs as
    /// its own task.
    ///
    /// Same guarantees as [`map_concurrent`](Self::map_concurrent).
    ///
    /// # Panics
    ///
    /// Panics if `concurrency` is zero.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fpkit::stream::Stream;
    ///
    /// let lengths = Stream::of(["a", "bcd", "ef"])
    ///     .then_concurrent(2, |word| async move { word.len() })
    ///     .collect_blocking();
    /// assert_eq!(lengths, vec![1, 3, 2]);
    /// ```
    pub fn then_concurrent<U, F, Fut>(self, concurrency: usize, mut function: F) -> Stream<U>
    where
        U: Send + 'static,
        F: FnMut(T) -> Fut + Send + 'static,
        Fut: Future<Output = U> + Send + 'static,
    {
        self.dispatch("then_concurrent", concurrency, move |item| {
            tokio::spawn(function(item))
        })
    }

    /// [`map_concurrent`](Self::map_concurrent) with the configured
    /// concurrency.
    pub fn map_parallel<U, F>(self, function: F) -> Stream<U>
    where
        U: Send + 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        let concurrency = self.config.concurrency();
        self.map_concurrent(concurrency, function)
    }

    /// [`then_concurrent`](Self::then_concurrent) with the configured
    /// concurrency.
    pub fn then_parallel<U, F, Fut>(self, function: F) -> Stream<U>
    where
        U: Send + 'static,
        F: FnMut(T) -> Fut + Send + 'static,
        Fut: Future<Output = U> + Send + 'static,
    {
        let concurrency = self.config.concurrency();
        self.then_concurrent(concurrency, function)
    }

    fn dispatch<U, S>(self, name: &'static str, concurrency: usize, mut start: S) -> Stream<U>
    where
        U: Send + 'static,
        S: FnMut(T) -> JoinHandle<U> + Send + 'static,
    {
        assert!(concurrency > 0, "{}", StreamError::InvalidConcurrency);

        let config = self.config;
        let permits = Arc::new(Semaphore::new(concurrency));
        let (cell_sender, mut cell_receiver) = mpsc::channel::<Cell<U>>(concurrency);
        let (sender, receiver) = mpsc::channel(config.buffer_size());
        // Lets the dispatcher see the output close without keeping it open.
        let output = sender.downgrade();

        let mut upstream = self;
        let dispatcher = spawn_stage(name, async move {
            // The reader drops its end of the queue once the output is gone.
            until_closed(&cell_sender, async {
                #[cfg(feature = "tracing")]
                let mut dispatched = 0_usize;
                loop {
                    let Ok(permit) = Arc::clone(&permits).acquire_owned().await else {
                        break;
                    };
                    let Some(item) = upstream.next().await else {
                        break;
                    };
                    if is_dropped(&output) {
                        break;
                    }
                    #[cfg(feature = "tracing")]
                    {
                        tracing::trace!(stage = name, index = dispatched, "dispatched element");
                        dispatched += 1;
                    }
                    if cell_sender.send((start(item), permit)).await.is_err() {
                        break;
                    }
                }
            })
            .await;
        });

        let reader = spawn_stage(name, async move {
            until_closed(&sender, async {
                while let Some((handle, permit)) = cell_receiver.recv().await {
                    let value = take_result(handle.await);
                    drop(permit);
                    if sender.send(value).await.is_err() {
                        break;
                    }
                }
            })
            .await;
        });

        Stream::from_parts(receiver, StageSet::from_tasks(vec![reader, dispatcher]), config)
    }
}

/// `true` once the receiving side of the output channel has been dropped,
/// or once the reader itself has stopped.
fn is_dropped<U>(output: &mpsc::WeakSender<U>) -> bool {
    output.upgrade().is_none_or(|sender| sender.is_closed())
}

/// Unwraps a finished transform. A panic is resumed as-is; a cancelled
/// transform panics, since the stream would otherwise end early with
/// elements silently missing.
fn take_result<U>(result: Result<U, JoinError>) -> U {
    match result {
        Ok(value) => value,
        Err(error) if error.is_panic() => panic::resume_unwind(error.into_panic()),
        Err(error) => panic!("concurrent map transform did not complete: {error}"),
    }
}
