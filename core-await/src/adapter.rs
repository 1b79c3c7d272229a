//! Await adapter interface and strategy selection.

use crate::awaitable::{Awaitable, Shape};
use crate::config::{AdapterOptions, StrategyPreference};
use crate::error::{AdapterError, Result};
use crate::legacy::LegacyAwaitAdapter;
use crate::native::NativeAwaitAdapter;
use bridge_tokio::{RuntimeScheduler, SharedTask};
use bridge_traits::{Continuation, ContinuationScheduler, TaskOutcome};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Uniform view over one asynchronous computation.
///
/// The computation moves from pending to settled exactly once; the adapter
/// only observes that transition.
pub trait AwaitAdapter: Send {
    /// Returns `true` if the computation has settled, successfully or not.
    /// Never blocks and has no side effects.
    fn is_completed(&self) -> bool;

    /// Registers `callback` to run once, at or after settlement. `None` is a
    /// no-op. Only one registration per adapter is supported.
    ///
    /// The callback only signals completion; the outcome is retrieved
    /// through [`block_until_completed`](Self::block_until_completed).
    fn on_completed(&mut self, callback: Option<Continuation>);

    /// Blocks the calling thread until the computation settles and returns
    /// its outcome. A failure is the original value, not a wrapper.
    ///
    /// Must not be called from the only thread able to drive the
    /// computation; such hosts poll with [`is_completed`](Self::is_completed)
    /// and [`on_completed`](Self::on_completed) instead.
    fn block_until_completed(self) -> TaskOutcome
    where
        Self: Sized;
}

/// Strategy chosen for an adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Native,
    Legacy,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native => f.write_str("native"),
            Self::Legacy => f.write_str("legacy"),
        }
    }
}

/// Adapter for task-like awaitables, resolved once at construction.
pub enum TaskAwaitAdapter {
    Native(NativeAwaitAdapter),
    Legacy(LegacyAwaitAdapter),
}

impl TaskAwaitAdapter {
    /// Builds an adapter with [`AdapterOptions::default`].
    pub fn from_awaitable(awaitable: Option<Awaitable>) -> Result<Self> {
        from_awaitable(awaitable, &AdapterOptions::default())
    }

    pub fn strategy(&self) -> Strategy {
        match self {
            Self::Native(_) => Strategy::Native,
            Self::Legacy(_) => Strategy::Legacy,
        }
    }
}

impl AwaitAdapter for TaskAwaitAdapter {
    fn is_completed(&self) -> bool {
        match self {
            Self::Native(adapter) => adapter.is_completed(),
            Self::Legacy(adapter) => adapter.is_completed(),
        }
    }

    fn on_completed(&mut self, callback: Option<Continuation>) {
        match self {
            Self::Native(adapter) => adapter.on_completed(callback),
            Self::Legacy(adapter) => adapter.on_completed(callback),
        }
    }

    fn block_until_completed(self) -> TaskOutcome {
        trace!(strategy = %self.strategy(), "blocking until awaitable settles");
        match self {
            Self::Native(adapter) => adapter.block_until_completed(),
            Self::Legacy(adapter) => adapter.block_until_completed(),
        }
    }
}

impl fmt::Debug for TaskAwaitAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskAwaitAdapter")
            .field("strategy", &self.strategy())
            .field("completed", &self.is_completed())
            .finish()
    }
}

/// Creates an adapter for `awaitable`.
///
/// # Errors
///
/// - [`AdapterError::InvalidInput`] if `awaitable` is `None`
/// - [`AdapterError::UnsupportedAwaitable`] if its type is not a recognised
///   task shape; custom awaitable protocols are not supported
/// - [`AdapterError::CapabilityMissing`] if the legacy strategy is selected
///   and no continuation scheduler is configured or ambient
pub fn from_awaitable(
    awaitable: Option<Awaitable>,
    options: &AdapterOptions,
) -> Result<TaskAwaitAdapter> {
    let awaitable = awaitable.ok_or(AdapterError::InvalidInput)?;
    let type_name = awaitable.type_name();

    let shape = awaitable
        .into_shape()
        .map_err(|rejected| AdapterError::UnsupportedAwaitable {
            type_name: rejected.type_name().to_string(),
        })?;

    let adapter = match (shape, options.strategy) {
        (Shape::Task(task), StrategyPreference::Auto) => TaskAwaitAdapter::Native(task.into_native()),
        (Shape::Task(task), StrategyPreference::Legacy) => {
            let scheduler = resolve_scheduler(options)?;
            let shared = task.into_shared(scheduler.as_ref());
            legacy(shared, scheduler)
        }
        (Shape::Shared(task), _) => legacy(task, resolve_scheduler(options)?),
    };

    debug!(
        awaitable = type_name,
        strategy = %adapter.strategy(),
        "created await adapter"
    );
    Ok(adapter)
}

fn legacy(task: SharedTask, scheduler: Arc<dyn ContinuationScheduler>) -> TaskAwaitAdapter {
    TaskAwaitAdapter::Legacy(LegacyAwaitAdapter::new(Box::new(task), scheduler))
}

fn resolve_scheduler(options: &AdapterOptions) -> Result<Arc<dyn ContinuationScheduler>> {
    if let Some(scheduler) = &options.scheduler {
        return Ok(Arc::clone(scheduler));
    }

    RuntimeScheduler::current()
        .map(|scheduler| Arc::new(scheduler) as Arc<dyn ContinuationScheduler>)
        .ok_or_else(|| AdapterError::CapabilityMissing {
            capability: "ContinuationScheduler".to_string(),
            message: "Legacy continuations need a scheduler: configure one in \
                      AdapterOptions or create the adapter inside a Tokio runtime."
                .to_string(),
        })
}
