//! Native awaiter strategy.

use crate::adapter::AwaitAdapter;
use bridge_traits::{Awaiter, Continuation, TaskOutcome};
use tracing::trace;

/// Delegates every operation to the host's low-level awaiter, obtained once
/// at construction.
pub struct NativeAwaitAdapter {
    awaiter: Box<dyn Awaiter>,
}

impl NativeAwaitAdapter {
    pub fn new(awaiter: Box<dyn Awaiter>) -> Self {
        Self { awaiter }
    }
}

impl AwaitAdapter for NativeAwaitAdapter {
    fn is_completed(&self) -> bool {
        self.awaiter.is_completed()
    }

    fn on_completed(&mut self, callback: Option<Continuation>) {
        if let Some(callback) = callback {
            trace!("registering continuation on native awaiter");
            self.awaiter.on_completed_unscoped(callback);
        }
    }

    fn block_until_completed(mut self) -> TaskOutcome {
        self.awaiter.get_result()
    }
}
