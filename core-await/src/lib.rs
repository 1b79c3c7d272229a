//! # Core Await Adapter
//!
//! Lets a synchronous engine (a test runner) wait on asynchronous
//! computations without becoming asynchronous itself.
//!
//! ## Overview
//!
//! The engine hands over an opaque [`Awaitable`]; [`from_awaitable`] turns it
//! into a [`TaskAwaitAdapter`] exposing three operations:
//!
//! - `is_completed` - non-blocking completion check
//! - `on_completed` - one-shot completion callback
//! - `block_until_completed` - block the calling thread, then return the
//!   original outcome
//!
//! Two strategies sit behind the [`AwaitAdapter`] interface and are chosen
//! once, at construction:
//!
//! - **Native** - Tokio tasks, through the host's low-level awaiter
//!   ([`bridge_tokio::JoinHandleAwaiter`])
//! - **Legacy** - coarse continuation tasks ([`bridge_tokio::SharedTask`]);
//!   continuations run through an explicit
//!   [`ContinuationScheduler`](bridge_traits::ContinuationScheduler), and an
//!   aggregate holding exactly one failure is unwrapped
//!
//! The adapter owns no threads and no runtime. A failed computation is
//! reported with the very failure it produced; a panicking Tokio task has
//! its panic resumed on the waiting thread.
//!
//! ## Example
//!
//! ```ignore
//! use core_await::{AwaitAdapter, Awaitable, TaskAwaitAdapter};
//!
//! let runtime = tokio::runtime::Runtime::new()?;
//! let handle = runtime.spawn(async { run_test_body().await });
//!
//! let adapter = TaskAwaitAdapter::from_awaitable(Some(Awaitable::new(handle)))?;
//! adapter.block_until_completed()?;
//! ```

pub mod adapter;
pub mod awaitable;
pub mod config;
pub mod error;
pub mod legacy;
pub mod logging;
pub mod native;

pub use adapter::{from_awaitable, AwaitAdapter, Strategy, TaskAwaitAdapter};
pub use awaitable::Awaitable;
pub use config::{AdapterOptions, StrategyPreference};
pub use error::{AdapterError, Result};
pub use legacy::LegacyAwaitAdapter;
pub use native::NativeAwaitAdapter;
