//! Workspace placeholder crate.
//!
//! This crate exposes feature flags that map to the individual workspace
//! crates (`core-await`, `bridge-tokio`). Test engines can depend on
//! `await-bridge-workspace` and enable the documented features without wiring
//! each crate individually.
//!
//! - `tokio-host` (default): the await adapter plus the Tokio-backed host
//!   implementations it selects between.

pub use bridge_traits::{AggregateFailure, Continuation, Failure, TaskOutcome};

#[cfg(feature = "tokio-host")]
pub use bridge_tokio::{RuntimeScheduler, SharedTask, ThreadPoolScheduler};

#[cfg(feature = "tokio-host")]
pub use core_await::{
    from_awaitable, AdapterError, AdapterOptions, AwaitAdapter, Awaitable, StrategyPreference,
    TaskAwaitAdapter,
};
