//! Coarse continuation task over a `futures` shared future.

use crate::awaiter::TaskOutput;
use bridge_traits::{
    AggregateFailure, Continuation, ContinuationScheduler, ContinuationTask, Failure, TaskOutcome,
    TaskPanicked,
};
use futures::future::{self, BoxFuture, Shared};
use futures::FutureExt;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tokio::task::{AbortHandle, JoinError, JoinHandle};
use tracing::trace;

type SharedOutcome = Shared<BoxFuture<'static, Result<(), AggregateFailure>>>;

/// [`ContinuationTask`] backed by a cloneable shared future.
///
/// The computation is driven by a job handed to a [`ContinuationScheduler`]
/// at construction, so it makes progress whether or not anyone waits on it.
/// Failures are always reported as an [`AggregateFailure`].
///
/// When built from Tokio tasks, completion also tracks the tasks themselves:
/// a task that already finished counts as settled before the driver job has
/// had a chance to run.
#[derive(Clone)]
pub struct SharedTask {
    inner: SharedOutcome,
    sources: Arc<[AbortHandle]>,
}

impl SharedTask {
    /// Wraps `future` and schedules a driver for it.
    pub fn spawn<F>(future: F, scheduler: &dyn ContinuationScheduler) -> Self
    where
        F: Future<Output = Result<(), AggregateFailure>> + Send + 'static,
    {
        let inner = future.boxed().shared();
        let driver = inner.clone();
        scheduler.schedule(
            async move {
                let _ = driver.await;
            }
            .boxed(),
        );

        Self {
            inner,
            sources: Arc::new([]),
        }
    }

    fn with_sources(mut self, sources: Vec<AbortHandle>) -> Self {
        self.sources = sources.into();
        self
    }

    /// Adapts a Tokio task. A failure becomes a one-element aggregate.
    ///
    /// A panic only keeps its message ([`TaskPanicked`]); cancellation is
    /// reported as the [`JoinError`] itself.
    pub fn from_join_handle<T: TaskOutput>(
        handle: JoinHandle<T>,
        scheduler: &dyn ContinuationScheduler,
    ) -> Self {
        Self::from_join_handle_with(handle, T::into_outcome, scheduler)
    }

    /// Like [`from_join_handle`](Self::from_join_handle), with an explicit
    /// conversion of the task's output.
    pub fn from_join_handle_with<T: Send + 'static>(
        handle: JoinHandle<T>,
        convert: fn(T) -> TaskOutcome,
        scheduler: &dyn ContinuationScheduler,
    ) -> Self {
        let source = handle.abort_handle();
        Self::spawn(
            async move { join_outcome(handle.await, convert).map_err(AggregateFailure::single) },
            scheduler,
        )
        .with_sources(vec![source])
    }

    /// Settles once every task settled, aggregating every failure in
    /// submission order.
    pub fn join_all<T: TaskOutput>(
        handles: Vec<JoinHandle<T>>,
        scheduler: &dyn ContinuationScheduler,
    ) -> Self {
        let sources = handles.iter().map(JoinHandle::abort_handle).collect();
        Self::spawn(
            async move {
                let failures: Vec<Failure> = future::join_all(handles)
                    .await
                    .into_iter()
                    .filter_map(|joined| join_outcome(joined, T::into_outcome).err())
                    .collect();

                if failures.is_empty() {
                    Ok(())
                } else {
                    Err(AggregateFailure::new(failures))
                }
            },
            scheduler,
        )
        .with_sources(sources)
    }
}

fn join_outcome<T>(joined: Result<T, JoinError>, convert: fn(T) -> TaskOutcome) -> TaskOutcome {
    match joined {
        Ok(output) => convert(output),
        Err(err) if err.is_panic() => Err(Arc::new(TaskPanicked::from_payload(err.into_panic()))),
        Err(err) => Err(Arc::new(err)),
    }
}

impl ContinuationTask for SharedTask {
    fn is_completed(&self) -> bool {
        self.inner.peek().is_some()
            || (!self.sources.is_empty() && self.sources.iter().all(AbortHandle::is_finished))
    }

    fn continue_with(&self, continuation: Continuation, scheduler: &dyn ContinuationScheduler) {
        let settled = self.inner.clone();
        scheduler.schedule(
            async move {
                let _ = settled.await;
                continuation();
            }
            .boxed(),
        );
    }

    fn wait(&mut self) -> Result<(), AggregateFailure> {
        trace!("blocking until shared task settles");
        futures::executor::block_on(self.inner.clone())
    }
}

impl fmt::Debug for SharedTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedTask")
            .field("completed", &self.is_completed())
            .finish()
    }
}
