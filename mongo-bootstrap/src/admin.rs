//! Administrative session against the MongoDB server
//!
//! `UserAdmin` is the one call the bootstrap needs from a server. `MongoAdmin`
//! implements it with the official driver.

use crate::error::ProvisionError;
use crate::settings::ConnectionSettings;
use crate::spec::UserCredentialSpec;
use async_trait::async_trait;
use mongodb::bson::{doc, Document};
use mongodb::options::ClientOptions;
use mongodb::Client;
use std::fmt;
use tracing::{debug, info};

/// The `createUser` command as sent on the wire.
#[derive(Clone, PartialEq, Eq)]
pub struct CreateUser {
    pub user: String,
    pub pwd: String,
    /// `(role, db)` pairs, in grant order
    pub roles: Vec<(String, String)>,
}

impl CreateUser {
    pub fn from_spec(spec: &UserCredentialSpec) -> Self {
        Self {
            user: spec.username.clone(),
            pwd: spec.password.clone(),
            roles: spec
                .grants
                .iter()
                .map(|g| (g.role.clone(), g.database.clone()))
                .collect(),
        }
    }

    /// `{ createUser, pwd, roles: [{ role, db }] }`
    pub fn to_document(&self) -> Document {
        let roles: Vec<Document> = self
            .roles
            .iter()
            .map(|(role, db)| doc! { "role": role.as_str(), "db": db.as_str() })
            .collect();

        doc! {
            "createUser": self.user.as_str(),
            "pwd": self.pwd.as_str(),
            "roles": roles,
        }
    }
}

impl fmt::Debug for CreateUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateUser")
            .field("user", &self.user)
            .field("pwd", &"***")
            .field("roles", &self.roles)
            .finish()
    }
}

/// A session allowed to create users.
#[async_trait]
pub trait UserAdmin {
    /// Create a user in `database`. Fails with `DuplicateUser` if it exists.
    async fn create_user(&self, database: &str, command: &CreateUser)
        -> Result<(), ProvisionError>;
}

/// Administrative connection backed by a `mongodb::Client`.
pub struct MongoAdmin {
    client: Client,
}

impl MongoAdmin {
    /// Connect and verify the session with a `ping` on `admin`.
    ///
    /// The driver connects lazily, so without the ping an unreachable server
    /// would only show up at `createUser`.
    pub async fn connect(settings: &ConnectionSettings) -> Result<Self, ProvisionError> {
        debug!(uri = %settings.redacted_uri(), "Connecting to MongoDB");

        let mut options = ClientOptions::parse(&settings.uri)
            .await
            .map_err(|e| ProvisionError::connection(&e))?;
        options.connect_timeout = Some(settings.connect_timeout);
        options.server_selection_timeout = Some(settings.connect_timeout);
        options.app_name = Some(settings.app_name.clone());

        let client = Client::with_options(options).map_err(|e| ProvisionError::connection(&e))?;

        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| ProvisionError::connection(&e))?;

        info!(uri = %settings.redacted_uri(), "Connected to MongoDB");
        Ok(Self { client })
    }
}

#[async_trait]
impl UserAdmin for MongoAdmin {
    async fn create_user(
        &self,
        database: &str,
        command: &CreateUser,
    ) -> Result<(), ProvisionError> {
        debug!(database = %database, command = ?command, "Running createUser");

        self.client
            .database(database)
            .run_command(command.to_document())
            .await
            .map_err(|e| ProvisionError::from_driver(&e, &command.user, database))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::Grant;
    use mongodb::bson::Bson;

    #[test]
    fn test_document_matches_wire_shape() {
        let spec = UserCredentialSpec::default();
        let document = CreateUser::from_spec(&spec).to_document();

        let keys: Vec<&str> = document.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["createUser", "pwd", "roles"]);
        assert_eq!(document.get_str("createUser").unwrap(), "teste");
        assert_eq!(document.get_str("pwd").unwrap(), "password");

        let roles = document.get_array("roles").unwrap();
        assert_eq!(
            roles,
            &vec![Bson::Document(
                doc! { "role": "readWrite", "db": "secure_order_db" }
            )]
        );
    }

    #[test]
    fn test_roles_keep_grant_order() {
        let spec = UserCredentialSpec::new(
            "svc",
            "pw",
            vec![Grant::new("read", "a"), Grant::new("dbAdmin", "b")],
        );
        let command = CreateUser::from_spec(&spec);
        assert_eq!(
            command.roles,
            vec![
                ("read".to_string(), "a".to_string()),
                ("dbAdmin".to_string(), "b".to_string()),
            ]
        );
    }

    #[test]
    fn test_debug_hides_password() {
        let command = CreateUser::from_spec(&UserCredentialSpec::with_role(
            "svc", "hunter2", "read", "a",
        ));
        let rendered = format!("{:?}", command);
        assert!(rendered.contains("svc"));
        assert!(!rendered.contains("hunter2"));
    }
}
