//! Low-level Awaiter
//!
//! The fast path a host offers for its own task type.

use crate::error::TaskOutcome;
use crate::scheduler::Continuation;

/// Low-level awaiter over one host computation.
///
/// An awaiter is obtained once from its computation and then observed; it
/// never drives the state transition itself. The computation moves from
/// pending to settled exactly once.
pub trait Awaiter: Send {
    /// Returns `true` if the computation has settled. Never blocks.
    fn is_completed(&self) -> bool;

    /// Registers `continuation` to run once after settlement, on whichever
    /// thread settles the computation. No execution context is captured.
    ///
    /// If the computation already settled, the continuation runs
    /// immediately on the calling thread.
    fn on_completed_unscoped(&mut self, continuation: Continuation);

    /// Blocks the calling thread until settlement and returns the original
    /// outcome.
    ///
    /// The outcome is handed out once; later calls report
    /// [`ResultAlreadyTaken`](crate::error::ResultAlreadyTaken). A panic
    /// inside the computation may be resumed on the calling thread.
    fn get_result(&mut self) -> TaskOutcome;
}
