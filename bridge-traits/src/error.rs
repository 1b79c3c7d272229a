use std::any::Any;
use std::error::Error as StdError;
use std::sync::Arc;

use thiserror::Error;

/// Failure produced by an asynchronous computation.
///
/// Shared so the original value can travel through aggregates and back to
/// the caller unchanged.
pub type Failure = Arc<dyn StdError + Send + Sync + 'static>;

/// Settled result of an asynchronous computation.
pub type TaskOutcome = Result<(), Failure>;

/// Wraps a concrete error into a [`Failure`].
///
/// A value that already is a [`Failure`] is returned as is, so its identity
/// survives generic conversions.
pub fn failure<E>(error: E) -> Failure
where
    E: StdError + Send + Sync + 'static,
{
    let boxed: Box<dyn StdError + Send + Sync> = Box::new(error);
    match boxed.downcast::<Failure>() {
        Ok(shared) => *shared,
        Err(other) => Arc::from(other),
    }
}

/// Failures collected by a coarse task wait, in the order they were observed.
#[derive(Error, Debug, Clone)]
#[error("{} task failure(s) occurred", .failures.len())]
pub struct AggregateFailure {
    failures: Vec<Failure>,
}

impl AggregateFailure {
    pub fn new(failures: Vec<Failure>) -> Self {
        debug_assert!(!failures.is_empty(), "aggregate failure must not be empty");
        Self { failures }
    }

    pub fn single(failure: Failure) -> Self {
        Self {
            failures: vec![failure],
        }
    }

    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// Returns the only inner failure, or the aggregate itself when it holds
    /// zero or several.
    pub fn into_single(mut self) -> Result<Failure, Self> {
        if self.failures.len() == 1 {
            Ok(self.failures.remove(0))
        } else {
            Err(self)
        }
    }

    pub fn into_failures(self) -> Vec<Failure> {
        self.failures
    }
}

/// A task panicked and the host could only keep the panic message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("task panicked: {message}")]
pub struct TaskPanicked {
    pub message: String,
}

impl TaskPanicked {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Extracts the message from a panic payload (`&str` or `String`).
    pub fn from_payload(payload: Box<dyn Any + Send>) -> Self {
        let message = match payload.downcast::<String>() {
            Ok(message) => *message,
            Err(payload) => match payload.downcast::<&'static str>() {
                Ok(message) => (*message).to_string(),
                Err(_) => "opaque panic payload".to_string(),
            },
        };
        Self { message }
    }
}

/// The settled result of an awaiter was already handed out.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("task result was already retrieved")]
pub struct ResultAlreadyTaken;
