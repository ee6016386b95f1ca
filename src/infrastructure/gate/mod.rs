//! Startup gate
//!
//! Blocks until one or more TCP endpoints accept connections, then hands the
//! process over to the real entrypoint. Used as the web container's entrypoint
//! so the service does not start before Postgres is listening:
//!
//! ```text
//! facility-server wait --wait tcp://postgres:5432 --timeout 20s -- ./scripts/start.sh
//! ```

mod launcher;
mod policy;
mod probe;
mod target;

use std::time::Duration;

use thiserror::Error;

pub use launcher::{ExecLauncher, GateCommand, Launcher};
pub use policy::{parse_duration, RetryPolicy};
pub use probe::{run_gated, wait_for, wait_for_all};
pub use target::{parse_target, WaitTarget};

/// Startup gate errors
#[derive(Debug, Error)]
pub enum GateError {
    #[error("Timeout after {elapsed:?} waiting for {target}")]
    Timeout { target: String, elapsed: Duration },

    #[error("Invalid wait target '{input}': {reason}")]
    InvalidTarget { input: String, reason: String },

    #[error("Invalid duration '{0}'")]
    InvalidDuration(String),

    #[error("No command given to run after waiting")]
    NoCommand,

    #[error("Failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

impl GateError {
    pub fn invalid_target(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTarget {
            input: input.into(),
            reason: reason.into(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
