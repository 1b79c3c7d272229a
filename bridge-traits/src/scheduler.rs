//! Continuation Scheduling
//!
//! Makes the execution context of continuations an explicit parameter
//! instead of something captured implicitly from the registering thread.

use futures::future::BoxFuture;

/// Zero-argument callback run once after an awaitable settles.
pub type Continuation = Box<dyn FnOnce() + Send + 'static>;

/// Policy deciding where continuation jobs run.
///
/// Implementations hand the job to a host executor (a Tokio runtime, a
/// thread pool, ...). The job must eventually be polled to completion;
/// dropping it silently would lose the continuation it carries.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::scheduler::ContinuationScheduler;
/// use futures::FutureExt;
///
/// fn notify_later(scheduler: &dyn ContinuationScheduler) {
///     scheduler.schedule(async { tracing::info!("settled") }.boxed());
/// }
/// ```
pub trait ContinuationScheduler: Send + Sync {
    /// Hands `job` to the host for execution.
    fn schedule(&self, job: BoxFuture<'static, ()>);
}
