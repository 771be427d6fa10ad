//! Shared utilities for mongo-bootstrap components
//!
//! This crate provides common functionality used by the bootstrap binaries:
//! - Structured logging initialization
//! - Environment variable parsing helpers
//! - Telemetry for reporting provisioning events

pub mod config;
pub mod logging;
pub mod telemetry;

pub use config::{ConfigExt, InitDbEnv};
pub use logging::init_logging;
pub use telemetry::{Telemetry, TelemetryEvent};
