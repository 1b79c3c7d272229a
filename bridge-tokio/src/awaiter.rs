//! Native awaiter over a Tokio task handle.

use bridge_traits::{failure, Awaiter, Continuation, ResultAlreadyTaken, TaskOutcome};
use futures::task::{waker, ArcWake};
use parking_lot::{Condvar, Mutex};
use std::error::Error as StdError;
use std::future::Future;
use std::panic;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::task::{JoinError, JoinHandle};
use tracing::trace;

/// Output types a Tokio task may settle with.
pub trait TaskOutput: Send + 'static {
    fn into_outcome(self) -> TaskOutcome;
}

impl TaskOutput for () {
    fn into_outcome(self) -> TaskOutcome {
        Ok(())
    }
}

/// A [`Failure`](bridge_traits::Failure) is passed through as is; any other
/// error type is shared without losing its concrete type.
impl<E> TaskOutput for Result<(), E>
where
    E: StdError + Send + Sync + 'static,
{
    fn into_outcome(self) -> TaskOutcome {
        self.map_err(failure)
    }
}

/// Conversion that drops a task's value and only keeps its settlement.
pub fn discard_output<T>(_output: T) -> TaskOutcome {
    Ok(())
}

/// [`Awaiter`] over a Tokio [`JoinHandle`].
///
/// The handle is polled with a waker owned by the awaiter, so completion is
/// observed on the Tokio worker that finishes the task. Every wake re-polls
/// the handle: a spurious wake never counts as settlement.
///
/// Dropping the awaiter detaches the task; it does not cancel it.
pub struct JoinHandleAwaiter<T> {
    driver: Arc<Driver<T>>,
    convert: fn(T) -> TaskOutcome,
}

struct Driver<T> {
    state: Mutex<DriverState<T>>,
    settled: Condvar,
}

struct DriverState<T> {
    /// Checked out while a thread polls it; dropped once settled.
    handle: Option<JoinHandle<T>>,
    output: Option<Result<T, JoinError>>,
    settled: bool,
    /// Set by a wake that arrived while the handle was checked out.
    repoll: bool,
    continuation: Option<Continuation>,
}

impl<T: TaskOutput> JoinHandleAwaiter<T> {
    pub fn new(handle: JoinHandle<T>) -> Self {
        Self::with_conversion(handle, T::into_outcome)
    }
}

impl<T: Send + 'static> JoinHandleAwaiter<T> {
    /// Awaiter whose settled output is turned into an outcome by `convert`,
    /// e.g. [`discard_output`] for tasks producing plain values.
    pub fn with_conversion(handle: JoinHandle<T>, convert: fn(T) -> TaskOutcome) -> Self {
        Self {
            driver: Arc::new(Driver {
                state: Mutex::new(DriverState {
                    handle: Some(handle),
                    output: None,
                    settled: false,
                    repoll: false,
                    continuation: None,
                }),
                settled: Condvar::new(),
            }),
            convert,
        }
    }
}

impl<T: Send + 'static> Driver<T> {
    /// Polls the handle until it is pending with our waker registered, or
    /// ready. Runs the continuation (outside the lock) on readiness.
    fn poll_handle(self: &Arc<Self>) {
        let mut handle = {
            let mut state = self.state.lock();
            match state.handle.take() {
                Some(handle) => handle,
                None => {
                    state.repoll = true;
                    return;
                }
            }
        };

        let waker = waker(Arc::clone(self));
        let mut cx = Context::from_waker(&waker);

        loop {
            let poll = Pin::new(&mut handle).poll(&mut cx);
            let mut state = self.state.lock();

            match poll {
                Poll::Ready(output) => {
                    state.output = Some(output);
                    state.settled = true;
                    state.repoll = false;
                    let continuation = state.continuation.take();
                    drop(state);

                    self.settled.notify_all();
                    trace!("task handle settled");

                    if let Some(continuation) = continuation {
                        continuation();
                    }
                    return;
                }
                Poll::Pending => {
                    if std::mem::take(&mut state.repoll) {
                        continue;
                    }
                    state.handle = Some(handle);
                    return;
                }
            }
        }
    }
}

impl<T: Send + 'static> ArcWake for Driver<T> {
    fn wake_by_ref(arc_self: &Arc<Self>) {
        arc_self.poll_handle();
    }
}

impl<T: Send + 'static> Awaiter for JoinHandleAwaiter<T> {
    fn is_completed(&self) -> bool {
        let state = self.driver.state.lock();
        state.settled || state.handle.as_ref().is_some_and(JoinHandle::is_finished)
    }

    fn on_completed_unscoped(&mut self, continuation: Continuation) {
        {
            let mut state = self.driver.state.lock();
            if !state.settled {
                state.continuation = Some(continuation);
                drop(state);
                self.driver.poll_handle();
                return;
            }
        }

        continuation();
    }

    fn get_result(&mut self) -> TaskOutcome {
        self.driver.poll_handle();

        let output = {
            let mut state = self.driver.state.lock();
            while !state.settled {
                trace!("blocking until task handle settles");
                self.driver.settled.wait(&mut state);
            }
            state.output.take()
        };

        match output {
            Some(Ok(output)) => (self.convert)(output),
            Some(Err(err)) if err.is_panic() => panic::resume_unwind(err.into_panic()),
            Some(Err(err)) => Err(Arc::new(err)),
            None => Err(Arc::new(ResultAlreadyTaken)),
        }
    }
}
