//! Structured logging initialization
//!
//! Logs go to stderr. Stdout is reserved for the one-line result a
//! bootstrap binary reports to whoever invoked it.

use std::io;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Guard that keeps the tracing subscriber active.
/// Drop this at the end of main to flush logs.
pub struct LogGuard;

/// Initialize structured logging for a component.
///
/// Returns a guard that should be held for the lifetime of the program.
/// Calling it twice is harmless; the second subscriber is discarded.
///
/// # Example
/// ```ignore
/// let _guard = init_logging("mongo-bootstrap");
/// info!("Starting up...");
/// ```
pub fn init_logging(_component: &str) -> LogGuard {
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let format = fmt::layer().with_target(false).with_writer(io::stderr);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(format)
        .try_init();

    LogGuard
}
