//! User-facing reporting side channel
//!
//! Operator-visible success/failure messages, distinct from the structured
//! `tracing` logs the engine emits for diagnostics. Write-only: the engine
//! never reads back what it reported.

use tracing::{error, info, warn};

pub trait Reporter: Send + Sync {
    fn status(&self, message: &str);
    fn warning(&self, message: &str);
    fn error(&self, message: &str);
}

/// Default reporter that forwards messages to `tracing`.
#[derive(Debug, Clone, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn status(&self, message: &str) {
        info!(target: "herald::report", "{message}");
    }

    fn warning(&self, message: &str) {
        warn!(target: "herald::report", "{message}");
    }

    fn error(&self, message: &str) {
        error!(target: "herald::report", "{message}");
    }
}
