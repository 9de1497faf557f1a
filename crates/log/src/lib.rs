//! Structured logging and observability for the execution worker: a
//! `tracing`-based facade with pluggable output formats, context
//! propagation across execution/node boundaries, and optional Sentry
//! integration.

pub mod builder;
pub mod config;
mod core;
mod format;
pub mod layer;
#[macro_use]
mod macros;
pub mod observability;
mod writer;

pub use builder::{LoggerBuilder, LoggerGuard, ReloadHandle};
pub use config::{Config, DisplayConfig, Fields, Format};
pub use core::{LogError, LogResult};
pub use layer::Context;

pub use tracing::{debug, error, info, trace, warn};

use std::time::{Duration, Instant};

/// Commonly imported names for call sites that just want to log.
pub mod prelude {
    pub use crate::{debug, error, info, trace, warn};
    pub use crate::{Context, LoggerBuilder, LoggerGuard};
}

/// Builds and installs the global subscriber from `config`.
///
/// # Errors
///
/// Returns an error if `config.level` fails to parse, or if setting up the
/// configured writer fails.
pub fn init_with(config: Config) -> LogResult<LoggerGuard> {
    LoggerBuilder::from_config(config).build()
}

/// Builds and installs the global subscriber from [`Config::from_env`].
///
/// # Errors
///
/// See [`init_with`].
pub fn init() -> LogResult<LoggerGuard> {
    init_with(Config::from_env())
}

/// Alias for [`init`], read as "pick up whatever `NEBULA_LOG`/display env
/// vars are set, then go".
///
/// # Errors
///
/// See [`init_with`].
pub fn auto_init() -> LogResult<LoggerGuard> {
    init()
}

/// RAII timer: logs the elapsed time at [`tracing::Level::INFO`] when
/// dropped. Used by the [`timed!`] macro.
pub struct TimerGuard {
    name: &'static str,
    start: Instant,
}

impl TimerGuard {
    /// Starts a new timer labeled `name`.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self { name, start: Instant::now() }
    }

    /// Elapsed time since the timer started.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for TimerGuard {
    fn drop(&mut self) {
        tracing::info!(name = self.name, elapsed_ms = self.elapsed().as_millis(), "timed block completed");
    }
}

/// Extension trait for timing a future's execution. Used by the
/// [`async_timed!`] macro.
#[cfg(feature = "async")]
pub trait Timed: std::future::Future + Sized + Send {
    /// Awaits `self`, logging the elapsed time labeled `name`.
    async fn timed(self, name: &'static str) -> Self::Output
    where
        Self: Send,
    {
        let start = Instant::now();
        let result = self.await;
        let elapsed = start.elapsed().as_millis();
        tracing::info!(name, elapsed_ms = elapsed, "timed operation completed");
        result
    }
}

#[cfg(feature = "async")]
impl<F> Timed for F where F: std::future::Future + Sized + Send {}
