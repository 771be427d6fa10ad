//! Provisioning against a real MongoDB server
//!
//! These tests require a running server with authentication enabled:
//!   docker run -d -p 27017:27017 \
//!     -e MONGO_INITDB_ROOT_USERNAME=root -e MONGO_INITDB_ROOT_PASSWORD=example mongo:7
//!
//! Override with MONGO_TEST_HOST, MONGO_TEST_PORT, MONGO_TEST_ROOT_USERNAME and
//! MONGO_TEST_ROOT_PASSWORD. Tests that need the server skip when it is down.

use mongo_bootstrap::admin::CreateUser;
use mongo_bootstrap::provision::run_to;
use mongo_bootstrap::{
    ConfigExt, ConnectionSettings, MongoAdmin, ProvisionError, UserAdmin, UserCredentialSpec,
};
use mongodb::bson::{doc, Document};
use mongodb::Client;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::time::timeout;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

fn host() -> String {
    String::env_or("MONGO_TEST_HOST", "127.0.0.1")
}

fn port() -> u16 {
    u16::env_parse("MONGO_TEST_PORT", 27017)
}

fn root_settings() -> ConnectionSettings {
    ConnectionSettings::from_parts(
        &host(),
        port(),
        Some(&String::env_or("MONGO_TEST_ROOT_USERNAME", "root")),
        Some(String::env_or("MONGO_TEST_ROOT_PASSWORD", "example")),
        CONNECT_TIMEOUT,
    )
}

/// Check if a port is open (database is running)
async fn port_is_open(host: &str, port: u16) -> bool {
    timeout(
        Duration::from_secs(1),
        tokio::net::TcpStream::connect(format!("{}:{}", host, port)),
    )
    .await
    .map(|r| r.is_ok())
    .unwrap_or(false)
}

async fn skip_if_not_available() -> bool {
    if !port_is_open(&host(), port()).await {
        eprintln!(
            "Skipping MongoDB tests - server not available on {}:{}",
            host(),
            port()
        );
        return true;
    }
    false
}

fn unique(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or_default();
    format!("{}_{}_{}", prefix, std::process::id(), nanos)
}

async fn drop_user(database: &str, username: &str) {
    let client = Client::with_uri_str(&root_settings().uri).await.unwrap();
    let _ = client
        .database(database)
        .run_command(doc! { "dropUser": username })
        .await;
}

#[tokio::test]
async fn test_created_user_can_read_and_write() {
    if skip_if_not_available().await {
        return;
    }

    let database = unique("bootstrap_db");
    let username = unique("bootstrap_user");
    let spec = UserCredentialSpec::with_role(&username, "password", "readWrite", &database);

    let admin = MongoAdmin::connect(&root_settings()).await.unwrap();
    let mut out = Vec::new();
    run_to(&admin, &database, &spec, &mut out).await.unwrap();

    let printed = String::from_utf8(out).unwrap();
    assert!(printed.contains(&format!("'{}'", username)));
    assert!(printed.contains(&format!("'{}'", database)));

    let user_uri = format!(
        "mongodb://{}:password@{}:{}/{}?authSource={}",
        username,
        host(),
        port(),
        database,
        database
    );
    let user_client = Client::with_uri_str(&user_uri).await.unwrap();
    let inserted = user_client
        .database(&database)
        .collection::<Document>("probe")
        .insert_one(doc! { "ok": true })
        .await;
    assert!(inserted.is_ok(), "user could not write: {:?}", inserted.err());

    drop_user(&database, &username).await;
    let _ = user_client.database(&database).drop().await;
}

#[tokio::test]
async fn test_second_create_is_duplicate() {
    if skip_if_not_available().await {
        return;
    }

    let database = unique("bootstrap_dup_db");
    let username = unique("bootstrap_dup");
    let spec = UserCredentialSpec::with_role(&username, "password", "readWrite", &database);

    let admin = MongoAdmin::connect(&root_settings()).await.unwrap();
    let command = CreateUser::from_spec(&spec);
    admin.create_user(&database, &command).await.unwrap();
    let err = admin.create_user(&database, &command).await.unwrap_err();

    drop_user(&database, &username).await;

    assert_eq!(
        err,
        ProvisionError::DuplicateUser {
            username,
            database,
        }
    );
}

#[tokio::test]
async fn test_unreachable_server_is_connection_error() {
    let settings = ConnectionSettings::from_parts(
        "127.0.0.1",
        1,
        Some("root"),
        Some("example".to_string()),
        Duration::from_secs(1),
    );

    let result = MongoAdmin::connect(&settings).await;

    assert!(matches!(result, Err(ProvisionError::ConnectionError(_))));
}

#[tokio::test]
async fn test_wrong_root_password_is_connection_error() {
    if skip_if_not_available().await {
        return;
    }

    let settings = ConnectionSettings::from_parts(
        &host(),
        port(),
        Some("root"),
        Some("definitely-not-the-password".to_string()),
        CONNECT_TIMEOUT,
    );

    let result = MongoAdmin::connect(&settings).await;

    assert!(matches!(result, Err(ProvisionError::ConnectionError(_))));
}
