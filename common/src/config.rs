//! Environment variable parsing helpers
//!
//! Provides ergonomic helpers for reading configuration from environment variables,
//! including the `*_FILE` convention used for mounted container secrets.

use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::str::FromStr;

/// Extension trait for parsing environment variables.
///
/// Provides convenient methods for reading env vars with defaults, secret files,
/// and type parsing.
pub trait ConfigExt {
    /// Get an environment variable with a default value.
    ///
    /// # Example
    /// ```ignore
    /// let host = String::env_or("MONGO_HOST", "127.0.0.1");
    /// ```
    fn env_or(name: &str, default: &str) -> String {
        env::var(name).unwrap_or_else(|_| default.to_string())
    }

    /// Get an environment variable parsed as a specific type.
    ///
    /// Returns `default` if the variable is not set or fails to parse.
    ///
    /// # Example
    /// ```ignore
    /// let port: u16 = u16::env_parse("MONGO_PORT", 27017);
    /// ```
    fn env_parse<T: FromStr>(name: &str, default: T) -> T {
        env::var(name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Read a value from `NAME`, or from the file named by `NAME_FILE`.
    ///
    /// `NAME` wins when both are set. Trailing newlines in the file are
    /// stripped. Returns `Ok(None)` when neither is set, and an error when
    /// `NAME_FILE` points at an unreadable file.
    ///
    /// # Example
    /// ```ignore
    /// let pass = String::env_or_file("MONGO_APP_PASSWORD")?;
    /// ```
    fn env_or_file(name: &str) -> Result<Option<String>> {
        if let Ok(value) = env::var(name) {
            return Ok(Some(value));
        }

        let file_var = format!("{}_FILE", name);
        match env::var(&file_var) {
            Ok(path) => {
                let content = fs::read_to_string(&path)
                    .context(format!("Failed to read {} ({})", file_var, path))?;
                Ok(Some(content.trim_end_matches(['\r', '\n']).to_string()))
            }
            Err(_) => Ok(None),
        }
    }
}

// Blanket implementation for all types
impl<T> ConfigExt for T {}

/// Variables the MongoDB container entrypoint exposes to init hooks.
pub struct InitDbEnv;

impl InitDbEnv {
    /// Root (administrative) username created by the entrypoint.
    pub fn root_username() -> Option<String> {
        env::var("MONGO_INITDB_ROOT_USERNAME")
            .ok()
            .filter(|v| !v.is_empty())
    }

    /// Root password, from the variable or its `_FILE` secret.
    pub fn root_password() -> Result<Option<String>> {
        String::env_or_file("MONGO_INITDB_ROOT_PASSWORD")
    }
}
