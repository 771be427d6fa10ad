//! One-time MongoDB user provisioning
//!
//! Creates a single application user with a fixed set of role grants when a
//! fresh MongoDB volume is initialized, then reports the result on stdout.

pub mod admin;
pub mod error;
pub mod provision;
pub mod settings;
pub mod spec;

pub use admin::{CreateUser, MongoAdmin, UserAdmin};
pub use common::{ConfigExt, InitDbEnv, Telemetry, TelemetryEvent};
pub use error::ProvisionError;
pub use provision::{confirmation_message, run, validate};
pub use settings::{BootstrapSettings, ConnectionSettings};
pub use spec::{Grant, UserCredentialSpec};
