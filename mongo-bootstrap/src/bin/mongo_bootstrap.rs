//! MongoDB init hook: create the application user
//!
//! Runs ONCE, from /docker-entrypoint-initdb.d, while the entrypoint's
//! temporary mongod is up on localhost. A second run against the same
//! volume fails with a duplicate-user error.

use anyhow::{Context, Result};
use common::{init_logging, Telemetry, TelemetryEvent};
use mongo_bootstrap::{
    run, validate, BootstrapSettings, ConnectionSettings, MongoAdmin, ProvisionError,
};
use std::time::Instant;
use tracing::{error, info};

async fn report_failure(telemetry: &Telemetry, database: &str, phase: &str, err: &ProvisionError) {
    error!(database = %database, phase = %phase, error = %err, "Provisioning failed");
    telemetry
        .send(TelemetryEvent::ProvisionFailed {
            database: database.to_string(),
            error: err.to_string(),
            phase: phase.to_string(),
        })
        .await;
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let _guard = init_logging("mongo-bootstrap");

    let start = Instant::now();
    let telemetry = Telemetry::from_env("mongo-bootstrap");

    let settings = BootstrapSettings::load().context("Failed to load bootstrap settings")?;
    let connection = ConnectionSettings::from_env().context("Failed to load connection settings")?;

    info!(
        database = %settings.database,
        user = %settings.user.username,
        server = %connection.redacted_uri(),
        "Mongo bootstrap starting"
    );

    telemetry
        .send(TelemetryEvent::ProvisionStarted {
            database: settings.database.clone(),
            username: settings.user.username.clone(),
        })
        .await;

    if let Err(e) = validate(&settings.database, &settings.user) {
        report_failure(&telemetry, &settings.database, "validate", &e).await;
        return Err(e.into());
    }

    let admin = match MongoAdmin::connect(&connection).await {
        Ok(admin) => admin,
        Err(e) => {
            report_failure(&telemetry, &settings.database, "connect", &e).await;
            return Err(e.into());
        }
    };

    if let Err(e) = run(&admin, &settings.database, &settings.user).await {
        report_failure(&telemetry, &settings.database, "create_user", &e).await;
        return Err(e.into());
    }

    let duration_ms = start.elapsed().as_millis() as u64;
    telemetry
        .send(TelemetryEvent::ProvisionCompleted {
            database: settings.database.clone(),
            username: settings.user.username.clone(),
            duration_ms,
        })
        .await;

    info!(duration_ms, "Mongo bootstrap completed");

    Ok(())
}
