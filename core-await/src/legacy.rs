//! Legacy continuation strategy.
//!
//! Composes a coarse task's continuation and wait primitives into the
//! adapter contract. The only translation performed is unwrapping an
//! aggregate that carries exactly one failure.

use crate::adapter::AwaitAdapter;
use bridge_traits::{Continuation, ContinuationScheduler, ContinuationTask, TaskOutcome};
use std::sync::Arc;
use tracing::{trace, warn};

pub struct LegacyAwaitAdapter {
    task: Box<dyn ContinuationTask>,
    scheduler: Arc<dyn ContinuationScheduler>,
}

impl LegacyAwaitAdapter {
    pub fn new(task: Box<dyn ContinuationTask>, scheduler: Arc<dyn ContinuationScheduler>) -> Self {
        Self { task, scheduler }
    }
}

impl AwaitAdapter for LegacyAwaitAdapter {
    fn is_completed(&self) -> bool {
        self.task.is_completed()
    }

    fn on_completed(&mut self, callback: Option<Continuation>) {
        if let Some(callback) = callback {
            trace!("attaching continuation to legacy task");
            self.task.continue_with(callback, self.scheduler.as_ref());
        }
    }

    fn block_until_completed(mut self) -> TaskOutcome {
        let aggregate = match self.task.wait() {
            Ok(()) => return Ok(()),
            Err(aggregate) => aggregate,
        };

        match aggregate.into_single() {
            Ok(failure) => Err(failure),
            Err(aggregate) => {
                // Several inner failures: surfaced as-is, never reduced to the first.
                warn!(
                    failures = aggregate.len(),
                    "surfacing aggregate failure unchanged"
                );
                Err(Arc::new(aggregate))
            }
        }
    }
}
