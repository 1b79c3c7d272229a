//! Continuation scheduling policies backed by host executors.

use bridge_traits::ContinuationScheduler;
use futures::executor::ThreadPool;
use futures::future::BoxFuture;
use tokio::runtime::Handle;
use tracing::trace;

/// Runs continuation jobs on a Tokio runtime.
#[derive(Debug, Clone)]
pub struct RuntimeScheduler {
    handle: Handle,
}

impl RuntimeScheduler {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Captures the runtime the calling thread is currently running on, if
    /// any.
    pub fn current() -> Option<Self> {
        Handle::try_current().ok().map(Self::new)
    }
}

impl ContinuationScheduler for RuntimeScheduler {
    fn schedule(&self, job: BoxFuture<'static, ()>) {
        trace!("scheduling continuation on tokio runtime");
        // Detached: the job owns everything it needs.
        drop(self.handle.spawn(job));
    }
}

/// Runs continuation jobs on a caller-owned `futures` thread pool.
#[derive(Debug, Clone)]
pub struct ThreadPoolScheduler {
    pool: ThreadPool,
}

impl ThreadPoolScheduler {
    pub fn new(pool: ThreadPool) -> Self {
        Self { pool }
    }
}

impl ContinuationScheduler for ThreadPoolScheduler {
    fn schedule(&self, job: BoxFuture<'static, ()>) {
        trace!("scheduling continuation on thread pool");
        self.pool.spawn_ok(job);
    }
}
