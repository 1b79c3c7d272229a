//! Coarse Continuation Task
//!
//! The primitive a host offers when it has no low-level awaiter: a
//! completion flag, continuation attachment, and a blocking wait that
//! reports failures as an aggregate.

use crate::error::AggregateFailure;
use crate::scheduler::{Continuation, ContinuationScheduler};

/// Task-like computation observed through continuations and waits.
pub trait ContinuationTask: Send {
    /// Returns `true` if the task has settled. Never blocks.
    fn is_completed(&self) -> bool;

    /// Attaches `continuation`, to be run through `scheduler` after the task
    /// settles (successfully or not).
    fn continue_with(&self, continuation: Continuation, scheduler: &dyn ContinuationScheduler);

    /// Blocks the calling thread until the task settles.
    ///
    /// Every failure is reported inside an [`AggregateFailure`], even when
    /// there is only one.
    fn wait(&mut self) -> Result<(), AggregateFailure>;
}
