//! # Adapter Configuration
//!
//! Options consulted by the factory when it selects a strategy.
//!
//! ## Usage
//!
//! ```ignore
//! use core_await::config::{AdapterOptions, StrategyPreference};
//! use bridge_tokio::RuntimeScheduler;
//! use std::sync::Arc;
//!
//! let options = AdapterOptions::default()
//!     .with_strategy(StrategyPreference::Legacy)
//!     .with_scheduler(Arc::new(RuntimeScheduler::new(runtime.handle().clone())));
//! ```
//!
//! ## Environment
//!
//! [`AdapterOptions::from_env`] reads `AWAIT_ADAPTER_STRATEGY` (`auto` or
//! `legacy`, case-insensitive). An unset variable means `auto`.

use crate::error::{AdapterError, Result};
use bridge_traits::ContinuationScheduler;
use std::env::{self, VarError};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Environment variable consulted by [`AdapterOptions::from_env`].
pub const STRATEGY_ENV_VAR: &str = "AWAIT_ADAPTER_STRATEGY";

/// Which strategy the factory may pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrategyPreference {
    /// Native awaiter whenever the host offers one, legacy otherwise.
    #[default]
    Auto,
    /// Always compose continuations and waits, as a host without a native
    /// awaiter would.
    Legacy,
}

impl FromStr for StrategyPreference {
    type Err = AdapterError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "legacy" => Ok(Self::Legacy),
            other => Err(AdapterError::Config(format!(
                "Unknown strategy preference '{}': expected 'auto' or 'legacy'",
                other
            ))),
        }
    }
}

impl fmt::Display for StrategyPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Legacy => f.write_str("legacy"),
        }
    }
}

/// Options for [`from_awaitable`](crate::from_awaitable).
#[derive(Clone, Default)]
pub struct AdapterOptions {
    /// Strategy preference
    pub strategy: StrategyPreference,
    /// Where legacy continuations run. Falls back to the ambient Tokio
    /// runtime when unset.
    pub scheduler: Option<Arc<dyn ContinuationScheduler>>,
}

impl AdapterOptions {
    /// Builds options from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Config`] if the variable holds an unknown
    /// strategy or is not valid unicode.
    pub fn from_env() -> Result<Self> {
        let strategy = strategy_from_env_value(env::var(STRATEGY_ENV_VAR))?;
        Ok(Self::default().with_strategy(strategy))
    }

    /// Set strategy preference
    pub fn with_strategy(mut self, strategy: StrategyPreference) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set continuation scheduler
    pub fn with_scheduler(mut self, scheduler: Arc<dyn ContinuationScheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }
}

fn strategy_from_env_value(
    value: std::result::Result<String, VarError>,
) -> Result<StrategyPreference> {
    match value {
        Ok(value) => value.parse(),
        Err(VarError::NotPresent) => Ok(StrategyPreference::Auto),
        Err(VarError::NotUnicode(_)) => Err(AdapterError::Config(format!(
            "{} is not valid unicode",
            STRATEGY_ENV_VAR
        ))),
    }
}

impl fmt::Debug for AdapterOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterOptions")
            .field("strategy", &self.strategy)
            .field(
                "scheduler",
                &self
                    .scheduler
                    .as_ref()
                    .map(|_| "ContinuationScheduler { ... }"),
            )
            .finish()
    }
}
