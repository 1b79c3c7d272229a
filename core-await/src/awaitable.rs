//! Opaque awaitable envelope handed over by the test engine.

use crate::native::NativeAwaitAdapter;
use bridge_tokio::{discard_output, JoinHandleAwaiter, SharedTask, TaskOutput};
use bridge_traits::{ContinuationScheduler, TaskOutcome};
use std::any::{self, Any};
use std::fmt;
use tokio::task::JoinHandle;

/// An opaque "will complete later" value.
///
/// The engine wraps whatever a test method, setup or teardown step returned;
/// the factory inspects the concrete type once and either recognises it or
/// rejects it.
///
/// Values wrapped with [`new`](Self::new) or [`from_boxed`](Self::from_boxed)
/// are only recognised as `JoinHandle<TaskOutcome>`, `JoinHandle<()>` or
/// [`SharedTask`]. Tasks with any other output go through
/// [`task`](Self::task) or [`discarding`](Self::discarding), where the output
/// type is still known.
pub struct Awaitable {
    payload: Payload,
    type_name: &'static str,
}

enum Payload {
    Opaque(Box<dyn Any + Send>),
    Task(Box<dyn TaskSource>),
}

/// Concrete shapes the factory knows how to adapt.
pub(crate) enum Shape {
    Task(Box<dyn TaskSource>),
    Shared(SharedTask),
}

/// A Tokio task together with the conversion of its output.
pub(crate) trait TaskSource: Send {
    fn into_native(self: Box<Self>) -> NativeAwaitAdapter;

    fn into_shared(self: Box<Self>, scheduler: &dyn ContinuationScheduler) -> SharedTask;
}

struct ConvertedTask<T> {
    handle: JoinHandle<T>,
    convert: fn(T) -> TaskOutcome,
}

impl<T: Send + 'static> TaskSource for ConvertedTask<T> {
    fn into_native(self: Box<Self>) -> NativeAwaitAdapter {
        let Self { handle, convert } = *self;
        NativeAwaitAdapter::new(Box::new(JoinHandleAwaiter::with_conversion(handle, convert)))
    }

    fn into_shared(self: Box<Self>, scheduler: &dyn ContinuationScheduler) -> SharedTask {
        let Self { handle, convert } = *self;
        SharedTask::from_join_handle_with(handle, convert, scheduler)
    }
}

fn converted<T: Send + 'static>(
    handle: JoinHandle<T>,
    convert: fn(T) -> TaskOutcome,
) -> Box<dyn TaskSource> {
    Box::new(ConvertedTask { handle, convert })
}

impl Awaitable {
    pub fn new<T: Any + Send>(value: T) -> Self {
        Self {
            payload: Payload::Opaque(Box::new(value)),
            type_name: any::type_name::<T>(),
        }
    }

    /// Wraps an already type-erased value. Its type name is unknown.
    pub fn from_boxed(value: Box<dyn Any + Send>) -> Self {
        Self {
            payload: Payload::Opaque(value),
            type_name: "<type-erased>",
        }
    }

    /// Wraps a Tokio task whose output converts into an outcome, such as
    /// `Result<(), E>` for any error type `E`.
    pub fn task<T: TaskOutput>(handle: JoinHandle<T>) -> Self {
        Self {
            payload: Payload::Task(converted(handle, T::into_outcome)),
            type_name: any::type_name::<JoinHandle<T>>(),
        }
    }

    /// Wraps a Tokio task whose value is ignored; only its settlement
    /// (including a panic or cancellation) is observed.
    pub fn discarding<T: Send + 'static>(handle: JoinHandle<T>) -> Self {
        Self {
            payload: Payload::Task(converted(handle, discard_output::<T>)),
            type_name: any::type_name::<JoinHandle<T>>(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub(crate) fn into_shape(self) -> Result<Shape, Self> {
        let Self { payload, type_name } = self;

        let value = match payload {
            Payload::Task(task) => return Ok(Shape::Task(task)),
            Payload::Opaque(value) => value,
        };

        let value = match value.downcast::<JoinHandle<TaskOutcome>>() {
            Ok(handle) => {
                return Ok(Shape::Task(converted(
                    *handle,
                    <TaskOutcome as TaskOutput>::into_outcome,
                )))
            }
            Err(value) => value,
        };
        let value = match value.downcast::<JoinHandle<()>>() {
            Ok(handle) => {
                return Ok(Shape::Task(converted(*handle, <() as TaskOutput>::into_outcome)))
            }
            Err(value) => value,
        };
        let value = match value.downcast::<SharedTask>() {
            Ok(task) => return Ok(Shape::Shared(*task)),
            Err(value) => value,
        };

        Err(Self {
            payload: Payload::Opaque(value),
            type_name,
        })
    }
}

impl fmt::Debug for Awaitable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Awaitable")
            .field("type_name", &self.type_name)
            .finish()
    }
}
