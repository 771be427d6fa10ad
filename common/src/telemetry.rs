//! Telemetry for reporting provisioning events
//!
//! Every event is logged locally. When `BOOTSTRAP_TELEMETRY_URL` is set the
//! event is also posted there as JSON. Delivery is best effort.

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::env;
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

/// All telemetry events a bootstrap run can emit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum TelemetryEvent {
    /// Provisioning started
    ProvisionStarted { database: String, username: String },

    /// User was created
    ProvisionCompleted {
        database: String,
        username: String,
        duration_ms: u64,
    },

    /// Provisioning failed
    ProvisionFailed {
        database: String,
        error: String,
        phase: String,
    },
}

impl TelemetryEvent {
    /// Get the event type name for logging and the wire payload.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::ProvisionStarted { .. } => "MONGO_BOOTSTRAP_STARTED",
            Self::ProvisionCompleted { .. } => "MONGO_BOOTSTRAP_COMPLETED",
            Self::ProvisionFailed { .. } => "MONGO_BOOTSTRAP_FAILED",
        }
    }

    /// Convert event to a human-readable message.
    pub fn message(&self) -> String {
        match self {
            Self::ProvisionStarted { database, username } => {
                format!("Provisioning user {} in {}", username, database)
            }
            Self::ProvisionCompleted {
                database,
                username,
                duration_ms,
            } => {
                format!(
                    "Created user {} in {} in {}ms",
                    username, database, duration_ms
                )
            }
            Self::ProvisionFailed {
                database,
                error,
                phase,
            } => {
                format!("Provisioning {} failed during {}: {}", database, phase, error)
            }
        }
    }
}

/// Telemetry client for reporting bootstrap events.
#[derive(Clone)]
pub struct Telemetry {
    client: Client,
    endpoint: Option<String>,
    run_id: Uuid,
    component: String,
}

impl Telemetry {
    /// Create a new telemetry client from environment variables.
    pub fn from_env(component: &str) -> Self {
        let endpoint = env::var("BOOTSTRAP_TELEMETRY_URL")
            .ok()
            .filter(|v| !v.is_empty());
        Self::new(component, endpoint)
    }

    pub fn new(component: &str, endpoint: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            endpoint,
            run_id: Uuid::new_v4(),
            component: component.to_string(),
        }
    }

    /// Build the JSON body posted for an event.
    pub fn payload(&self, event: &TelemetryEvent, at: DateTime<Utc>) -> serde_json::Value {
        json!({
            "event": event.event_type(),
            "message": event.message(),
            "component": self.component,
            "runId": self.run_id.to_string(),
            "timestamp": at.to_rfc3339(),
            "data": event,
        })
    }

    /// Log an event and, if an endpoint is configured, post it.
    ///
    /// Failures are logged as warnings and never reach the caller.
    pub async fn send(&self, event: TelemetryEvent) {
        info!(event = %event.event_type(), "{}", event.message());

        let Some(endpoint) = &self.endpoint else {
            return;
        };

        let payload = self.payload(&event, Utc::now());
        match self.client.post(endpoint).json(&payload).send().await {
            Ok(resp) if resp.status().is_success() => {}
            Ok(resp) => {
                warn!("Telemetry got status {}", resp.status());
            }
            Err(e) => {
                warn!("Telemetry send failed: {}", e);
            }
        }
    }
}
