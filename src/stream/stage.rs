//! Pipeline tasks and their join handles.

use std::future::Future;
use std::panic;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::{Stream, runtime};

/// Tasks writing into a stream's channel.
///
/// Each stage owns its upstream [`Stream`], so a panic anywhere upstream is
/// resumed inside the stage reading from it and travels down the pipeline
/// until it reaches the consumer.
#[derive(Debug, Default)]
pub(super) struct StageSet {
    tasks: Vec<JoinHandle<()>>,
}

impl StageSet {
    pub(super) const fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    pub(super) fn from_tasks(tasks: Vec<JoinHandle<()>>) -> Self {
        Self { tasks }
    }

    #[cfg(test)]
    pub(super) const fn tasks_mut(&mut self) -> &mut Vec<JoinHandle<()>> {
        &mut self.tasks
    }

    /// Waits for every task to finish, resuming the first panic found.
    pub(super) fn poll_join(&mut self, context: &mut Context<'_>) -> Poll<()> {
        let mut index = 0;
        while index < self.tasks.len() {
            match Pin::new(&mut self.tasks[index]).poll(context) {
                Poll::Pending => index += 1,
                Poll::Ready(result) => {
                    self.tasks.remove(index);
                    if let Err(error) = result {
                        if error.is_panic() {
                            panic::resume_unwind(error.into_panic());
                        }
                        #[cfg(feature = "tracing")]
                        tracing::warn!(%error, "stream stage was cancelled");
                    }
                }
            }
        }
        if self.tasks.is_empty() {
            Poll::Ready(())
        } else {
            Poll::Pending
        }
    }
}

/// Spawns one pipeline task on the runtime chosen by [`runtime::handle`].
pub(super) fn spawn_stage<F>(name: &'static str, body: F) -> JoinHandle<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    #[cfg(not(feature = "tracing"))]
    let _ = name;

    runtime::handle().spawn(async move {
        #[cfg(feature = "tracing")]
        tracing::debug!(stage = name, "stream stage started");
        body.await;
        #[cfg(feature = "tracing")]
        tracing::debug!(stage = name, "stream stage finished");
    })
}

/// Runs `body` until it finishes or the receiving side of `output` is
/// dropped, whichever comes first. In the second case `body` is dropped
/// mid-flight, together with the upstream it owns.
pub(super) async fn until_closed<U, F>(output: &mpsc::Sender<U>, body: F)
where
    F: Future<Output = ()>,
{
    tokio::select! {
        () = body => {}
        () = output.closed() => {}
    }
}

impl<T> Stream<T> {
    /// Appends a stage. `body` receives this stream as its upstream and the
    /// sending half of a fresh channel of the configured capacity.
    ///
    /// The stage stops as soon as the returned stream is dropped, even when
    /// `body` is waiting on its upstream rather than sending.
    pub(super) fn pipe<U, F, Fut>(self, name: &'static str, body: F) -> Stream<U>
    where
        U: Send + 'static,
        F: FnOnce(Self, mpsc::Sender<U>) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let config = self.config;
        let (sender, receiver) = mpsc::channel(config.buffer_size());
        let watcher = sender.clone();
        let body = body(self, sender);
        let task = spawn_stage(name, async move { until_closed(&watcher, body).await });
        Stream::from_parts(receiver, StageSet::from_tasks(vec![task]), config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::task::noop_waker_ref;
    use rstest::rstest;

    #[rstest]
    fn empty_set_is_joined() {
        let mut stages = StageSet::new();
        let mut context = Context::from_waker(noop_waker_ref());
        assert_eq!(stages.poll_join(&mut context), Poll::Ready(()));
    }

    #[rstest]
    #[tokio::test]
    async fn join_resumes_task_panic() {
        let task = spawn_stage("failing", async {
            panic!("stage failed");
        });
        let mut stages = StageSet::from_tasks(vec![task]);
        let joined = tokio::spawn(async move {
            std::future::poll_fn(|context| stages.poll_join(context)).await;
        })
        .await;

        let error = joined.unwrap_err();
        assert!(error.is_panic());
        assert_eq!(error.into_panic().downcast_ref::<&str>(), Some(&"stage failed"));
    }

    #[rstest]
    #[tokio::test]
    async fn until_closed_drops_body_when_receiver_goes_away() {
        let (sender, receiver) = mpsc::channel::<i32>(1);
        let (_keep_open, mut never) = mpsc::channel::<i32>(1);
        let waiting = tokio::spawn(async move {
            until_closed(&sender, async move {
                let _ = never.recv().await;
            })
            .await;
        });
        drop(receiver);
        tokio::time::timeout(std::time::Duration::from_secs(1), waiting)
            .await
            .expect("stage should stop once its output is dropped")
            .unwrap();
    }

    #[rstest]
    #[tokio::test]
    async fn join_waits_for_all_tasks() {
        let (sender, mut receiver) = mpsc::channel(1);
        let task = spawn_stage("sender", async move {
            let _ = sender.send(1).await;
        });
        let mut stages = StageSet::from_tasks(vec![task]);
        assert_eq!(receiver.recv().await, Some(1));
        std::future::poll_fn(|context| stages.poll_join(context)).await;
        assert!(stages.tasks.is_empty());
    }
}
