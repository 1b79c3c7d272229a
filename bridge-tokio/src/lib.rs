//! # Tokio Bridge Implementations
//!
//! Default implementations of the host await traits on top of Tokio and
//! the `futures` crate.
//!
//! ## Overview
//!
//! - `Awaiter` using a Tokio [`JoinHandle`](tokio::task::JoinHandle)
//!   ([`JoinHandleAwaiter`])
//! - `ContinuationTask` using a `futures` shared future ([`SharedTask`])
//! - `ContinuationScheduler` using a Tokio runtime handle
//!   ([`RuntimeScheduler`]) or a `futures` thread pool
//!   ([`ThreadPoolScheduler`])
//!
//! None of these types build a runtime or spawn threads on their own; they
//! observe computations that the host already runs.
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_tokio::{JoinHandleAwaiter, RuntimeScheduler, SharedTask};
//! use bridge_traits::Awaiter;
//!
//! let runtime = tokio::runtime::Runtime::new()?;
//! let mut awaiter = JoinHandleAwaiter::new(runtime.spawn(async { Ok(()) }));
//! awaiter.get_result()?;
//!
//! let scheduler = RuntimeScheduler::new(runtime.handle().clone());
//! let task = SharedTask::spawn(async { Ok(()) }, &scheduler);
//! ```

mod awaiter;
mod scheduler;
mod task;

pub use awaiter::{discard_output, JoinHandleAwaiter, TaskOutput};
pub use scheduler::{RuntimeScheduler, ThreadPoolScheduler};
pub use task::SharedTask;
