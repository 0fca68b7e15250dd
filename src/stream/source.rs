//! Stream sources.

use std::pin::pin;

use futures::StreamExt;
use tokio::sync::mpsc;

use super::stage::{StageSet, spawn_stage, until_closed};
use super::{Stream, StreamConfig};

impl<T> Stream<T> {
    /// Creates an eager stream holding every item of `items`.
    ///
    /// The items are moved into a channel sized to fit them, so no task is
    /// spawned and no runtime is needed until a stage is appended.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fpkit::stream::Stream;
    ///
    /// assert_eq!(Stream::of(vec![3, 1, 2]).collect_blocking(), vec![3, 1, 2]);
    /// ```
    pub fn of<I>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let items: Vec<T> = items.into_iter().collect();
        let (sender, receiver) = mpsc::channel(items.len().max(1));
        for item in items {
            let accepted = sender.try_send(item).is_ok();
            debug_assert!(accepted, "eager channel is sized to hold every item");
        }
        Self::from_parts(receiver, StageSet::new(), StreamConfig::default())
    }

    /// Creates a stream with no elements.
    #[must_use]
    pub fn empty() -> Self {
        let (_, receiver) = mpsc::channel(1);
        Self::from_parts(receiver, StageSet::new(), StreamConfig::default())
    }

    /// Wraps an existing channel receiver. The stream ends when every sender
    /// has been dropped.
    pub fn from_receiver(receiver: mpsc::Receiver<T>) -> Self {
        Self::from_parts(receiver, StageSet::new(), StreamConfig::default())
    }

    /// Creates a channel whose receiving end is a stream.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fpkit::stream::Stream;
    ///
    /// let (sender, stream) = Stream::channel(4);
    /// std::thread::spawn(move || {
    ///     for value in 0..3 {
    ///         sender.blocking_send(value).unwrap();
    ///     }
    /// });
    /// assert_eq!(stream.collect_blocking(), vec![0, 1, 2]);
    /// ```
    #[must_use]
    pub fn channel(capacity: usize) -> (mpsc::Sender<T>, Self) {
        let (sender, receiver) = mpsc::channel(capacity);
        (sender, Self::from_receiver(receiver))
    }
}

impl<T: Send + 'static> Stream<T> {
    /// Creates a lazy stream over `items`.
    ///
    /// A producer task advances the iterator only while the downstream
    /// channel has room, and stops as soon as the stream is dropped.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fpkit::stream::Stream;
    ///
    /// let first: Vec<u64> = Stream::lazy(1..).limit(3).collect_blocking();
    /// assert_eq!(first, vec![1, 2, 3]);
    /// ```
    pub fn lazy<I>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: Send + 'static,
    {
        let items = items.into_iter();
        let config = StreamConfig::default();
        let (sender, receiver) = mpsc::channel(config.buffer_size());
        let task = spawn_stage("lazy", async move {
            for item in items {
                if sender.send(item).await.is_err() {
                    break;
                }
            }
        });
        Self::from_parts(receiver, StageSet::from_tasks(vec![task]), config)
    }

    /// Creates the infinite stream `seed, next(&seed), next(&next(&seed)), …`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fpkit::stream::Stream;
    ///
    /// let powers = Stream::iterate(1_u32, |value| value * 2).limit(5).collect_blocking();
    /// assert_eq!(powers, vec![1, 2, 4, 8, 16]);
    /// ```
    pub fn iterate<F>(seed: T, mut next: F) -> Self
    where
        F: FnMut(&T) -> T + Send + 'static,
    {
        Self::lazy(std::iter::successors(Some(seed), move |previous| {
            Some(next(previous))
        }))
    }

    /// Creates the infinite stream of values returned by `supplier`.
    pub fn generate<F>(supplier: F) -> Self
    where
        F: FnMut() -> T + Send + 'static,
    {
        Self::lazy(std::iter::repeat_with(supplier))
    }

    /// Drives any [`futures::Stream`] from a producer task.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fpkit::stream::Stream;
    ///
    /// let source = futures::stream::iter(vec!['a', 'b']);
    /// assert_eq!(Stream::from_stream(source).collect_blocking(), vec!['a', 'b']);
    /// ```
    pub fn from_stream<S>(source: S) -> Self
    where
        S: futures::Stream<Item = T> + Send + 'static,
    {
        let config = StreamConfig::default();
        let (sender, receiver) = mpsc::channel(config.buffer_size());
        let watcher = sender.clone();
        let task = spawn_stage("from_stream", async move {
            until_closed(&watcher, async move {
                let mut source = pin!(source);
                while let Some(item) = source.next().await {
                    if sender.send(item).await.is_err() {
                        break;
                    }
                }
            })
            .await;
        });
        Self::from_parts(receiver, StageSet::from_tasks(vec![task]), config)
    }
}

impl<T> FromIterator<T> for Stream<T> {
    /// Same as [`Stream::of`].
    fn from_iter<I: IntoIterator<Item = T>>(items: I) -> Self {
        Self::of(items)
    }
}
