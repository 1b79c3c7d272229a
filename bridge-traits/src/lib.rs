//! # Host Await Traits
//!
//! Host capability traits that the await adapter is written against.
//!
//! ## Overview
//!
//! This crate defines the contract between the await adapter (`core-await`)
//! and the host that actually runs asynchronous computations. Each trait
//! represents one capability the adapter requires but never implements
//! itself: the adapter owns no scheduler, no thread pool and no future type.
//!
//! ## Traits
//!
//! - [`Awaiter`](awaiter::Awaiter) - Low-level awaiter: completion check,
//!   context-free continuation registration, blocking result retrieval
//! - [`ContinuationTask`](task::ContinuationTask) - Coarser task primitive:
//!   completion flag, continuation attachment, aggregating blocking wait
//! - [`ContinuationScheduler`](scheduler::ContinuationScheduler) - Explicit
//!   policy deciding where continuation jobs run
//!
//! ## Host Implementations
//!
//! | Host  | Implementation Crate | Status |
//! |-------|---------------------|--------|
//! | Tokio | `bridge-tokio`      | ✅ Default |
//!
//! ## Failures
//!
//! A computation settles with a [`TaskOutcome`]. Failures are shared
//! (`Arc`) so that the exact value produced by the computation can be handed
//! back to the caller without re-wrapping: identity is observable with
//! `Arc::ptr_eq`, and the concrete type stays reachable through
//! `downcast_ref`.
//!
//! ## Thread Safety
//!
//! Awaiters and tasks are `Send` because the adapter owning them may move
//! between threads; schedulers are `Send + Sync` because they are shared.

pub mod awaiter;
pub mod error;
pub mod scheduler;
pub mod task;

pub use awaiter::Awaiter;
pub use error::{failure, AggregateFailure, Failure, ResultAlreadyTaken, TaskOutcome, TaskPanicked};
pub use scheduler::{Continuation, ContinuationScheduler};
pub use task::ContinuationTask;
