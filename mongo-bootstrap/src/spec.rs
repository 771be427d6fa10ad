//! Credential record for the user created at bootstrap

use serde::Deserialize;
use std::fmt;

/// Database the application user is provisioned in when nothing else is configured
pub const DEFAULT_DATABASE: &str = "secure_order_db";
pub const DEFAULT_USERNAME: &str = "teste";
pub const DEFAULT_PASSWORD: &str = "password";
pub const DEFAULT_ROLE: &str = "readWrite";

/// A role granted on a database.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Grant {
    pub role: String,
    pub database: String,
}

impl Grant {
    pub fn new(role: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            database: database.into(),
        }
    }
}

/// User to create: name, password, and the grants it receives, in order.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct UserCredentialSpec {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub grants: Vec<Grant>,
}

impl UserCredentialSpec {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        grants: Vec<Grant>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            grants,
        }
    }

    /// Spec with a single `role` grant on `database`.
    pub fn with_role(
        username: impl Into<String>,
        password: impl Into<String>,
        role: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self::new(username, password, vec![Grant::new(role, database)])
    }
}

impl Default for UserCredentialSpec {
    fn default() -> Self {
        Self::with_role(
            DEFAULT_USERNAME,
            DEFAULT_PASSWORD,
            DEFAULT_ROLE,
            DEFAULT_DATABASE,
        )
    }
}

// Password stays out of logs.
impl fmt::Debug for UserCredentialSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserCredentialSpec")
            .field("username", &self.username)
            .field("password", &"***")
            .field("grants", &self.grants)
            .finish()
    }
}
