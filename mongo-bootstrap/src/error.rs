//! Provisioning error taxonomy
//!
//! Maps driver failures onto the handful of outcomes the bootstrap cares about.

use mongodb::error::{Error as DriverError, ErrorKind};
use thiserror::Error;

/// `createUser` on an existing user (MongoDB 4.2+)
pub const CODE_USER_EXISTS: i32 = 51003;
/// `createUser` on an existing user (older servers)
pub const CODE_DUPLICATE_KEY: i32 = 11000;
pub const CODE_UNAUTHORIZED: i32 = 13;
pub const CODE_AUTHENTICATION_FAILED: i32 = 18;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProvisionError {
    /// Database name or username is empty; nothing was sent to the server.
    #[error("invalid credential spec: {0}")]
    InvalidSpec(String),

    #[error("user '{username}' already exists in database '{database}'")]
    DuplicateUser { username: String, database: String },

    /// Server unreachable, or the administrative session is not authenticated.
    #[error("connection error: {0}")]
    ConnectionError(String),

    /// Any other command failure, as reported by the server.
    #[error("server rejected command ({code_name} {code}): {message}")]
    Server {
        code: i32,
        code_name: String,
        message: String,
    },

    /// Driver failure that is neither a connection problem nor a command error.
    #[error("driver error: {0}")]
    Driver(String),
}

impl ProvisionError {
    /// Classify a failed `createUser` for `username` in `database`.
    pub fn from_driver(err: &DriverError, username: &str, database: &str) -> Self {
        match err.kind.as_ref() {
            ErrorKind::Command(cmd) => {
                classify_command(cmd.code, &cmd.code_name, &cmd.message, username, database)
            }
            _ if is_connection_kind(err.kind.as_ref()) => Self::ConnectionError(err.to_string()),
            _ => Self::Driver(err.to_string()),
        }
    }

    /// Any failure while establishing the administrative session.
    pub fn connection(err: &DriverError) -> Self {
        Self::ConnectionError(err.to_string())
    }
}

/// Map a server command failure onto the error taxonomy.
pub fn classify_command(
    code: i32,
    code_name: &str,
    message: &str,
    username: &str,
    database: &str,
) -> ProvisionError {
    match code {
        CODE_USER_EXISTS | CODE_DUPLICATE_KEY => ProvisionError::DuplicateUser {
            username: username.to_string(),
            database: database.to_string(),
        },
        CODE_UNAUTHORIZED | CODE_AUTHENTICATION_FAILED => {
            ProvisionError::ConnectionError(format!("{}: {}", code_name, message))
        }
        _ => ProvisionError::Server {
            code,
            code_name: code_name.to_string(),
            message: message.to_string(),
        },
    }
}

fn is_connection_kind(kind: &ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::Authentication { .. }
            | ErrorKind::Io(_)
            | ErrorKind::ServerSelection { .. }
            | ErrorKind::DnsResolve { .. }
            | ErrorKind::ConnectionPoolCleared { .. }
    )
}
