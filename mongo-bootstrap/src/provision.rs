//! The bootstrap action: validate, create the user, confirm on stdout

use crate::admin::{CreateUser, UserAdmin};
use crate::error::ProvisionError;
use crate::spec::UserCredentialSpec;
use std::io::{self, Write};
use tracing::{info, warn};

/// Line printed once the user exists.
pub fn confirmation_message(username: &str, database: &str) -> String {
    format!(
        "✅ Usuário '{}' criado com sucesso no banco '{}'!",
        username, database
    )
}

/// Reject empty database names and usernames before touching the server.
pub fn validate(db_name: &str, spec: &UserCredentialSpec) -> Result<(), ProvisionError> {
    if db_name.trim().is_empty() {
        return Err(ProvisionError::InvalidSpec(
            "database name must not be empty".to_string(),
        ));
    }
    if spec.username.trim().is_empty() {
        return Err(ProvisionError::InvalidSpec(
            "username must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Create `spec` in `db_name` and print the confirmation to stdout.
pub async fn run<A>(admin: &A, db_name: &str, spec: &UserCredentialSpec) -> Result<(), ProvisionError>
where
    A: UserAdmin + ?Sized,
{
    run_to(admin, db_name, spec, &mut io::stdout()).await
}

/// Same as [`run`], writing the confirmation to `out`.
pub async fn run_to<A, W>(
    admin: &A,
    db_name: &str,
    spec: &UserCredentialSpec,
    out: &mut W,
) -> Result<(), ProvisionError>
where
    A: UserAdmin + ?Sized,
    W: Write,
{
    validate(db_name, spec)?;

    info!(
        user = %spec.username,
        database = %db_name,
        grants = spec.grants.len(),
        "Creating user"
    );

    admin
        .create_user(db_name, &CreateUser::from_spec(spec))
        .await?;

    // The user exists at this point; a broken stdout does not undo that.
    if let Err(e) = writeln!(out, "{}", confirmation_message(&spec.username, db_name)) {
        warn!(error = %e, "Failed to write confirmation");
    }

    Ok(())
}
