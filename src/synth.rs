//! Fabricated log records and the random fields that fill them.
//!
//! Everything here is purely functional: draw a value, build a record,
//! serialize it to a single JSON line. Writing the lines anywhere is the
//! sink's job.

use chrono::Local;
use rand::Rng;
use serde::Serialize;

pub const METHODS: &[&str] = &["GET", "POST", "PUT", "DELETE"];

pub const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64)",
    "curl/7.68.0",
    "PostmanRuntime/7.26.10",
    "HTTPie/2.4.0",
    "python-requests/2.25.1",
];

/// Simulated subsystems and the events each one emits, used by the bulk
/// generation endpoint. Four services, five messages each.
pub const SERVICE_MESSAGES: &[(&str, &[&str])] = &[
    (
        "postgresql",
        &[
            "connection authorized: user=admin database=main",
            "query executed: SELECT * FROM users;",
            "user logged out: user=admin",
            "backup started",
            "checkpoint complete",
        ],
    ),
    (
        "redis",
        &[
            "Accepted connection from 127.0.0.1:51284",
            "SET key1 value1",
            "DEL key1",
            "SAVE completed",
            "Connection closed",
        ],
    ),
    (
        "systemd",
        &[
            "Started Time App Service.",
            "Reloading.",
            "Stopping Time App Service.",
            "Session 1 of user admin started.",
            "Service restarted.",
        ],
    ),
    (
        "docker",
        &[
            "Container time-app started.",
            "Image pulled time-app:latest.",
            "Container time-app stopped.",
            "Network created bridge0.",
            "Volume logs attached.",
        ],
    ),
];

/// One fabricated observation of an inbound HTTP request.
#[derive(Debug, Serialize)]
pub struct AccessRecord {
    pub timestamp: String,
    pub ip: String,
    pub method: String,
    pub user_agent: String,
    pub path: String,
}

/// One fabricated event from a simulated subsystem.
#[derive(Debug, Serialize)]
pub struct ServiceEvent {
    pub timestamp: String,
    pub service: String,
    pub message: String,
}

/// Current local time, ISO-8601 with microseconds.
pub fn now_iso() -> String {
    Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

/// Dotted quad with the first octet kept out of the reserved low ranges.
pub fn random_ip<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!(
        "{}.{}.{}.{}",
        rng.gen_range(10..=255),
        rng.gen_range(0..=255),
        rng.gen_range(0..=255),
        rng.gen_range(0..=255),
    )
}

pub fn access_record<R: Rng + ?Sized>(rng: &mut R) -> AccessRecord {
    AccessRecord {
        timestamp: now_iso(),
        ip: random_ip(rng),
        method: METHODS[rng.gen_range(0..METHODS.len())].to_string(),
        user_agent: USER_AGENTS[rng.gen_range(0..USER_AGENTS.len())].to_string(),
        path: "/".to_string(),
    }
}

/// All twenty service events for one generation call, sharing `timestamp`.
pub fn service_events(timestamp: &str) -> Vec<ServiceEvent> {
    let mut events = Vec::with_capacity(20);
    for (service, messages) in SERVICE_MESSAGES {
        for message in *messages {
            events.push(ServiceEvent {
                timestamp: timestamp.to_string(),
                service: (*service).to_string(),
                message: (*message).to_string(),
            });
        }
    }
    events
}

/// Serializes a record as one newline-terminated JSON line. Field order is
/// the struct's declaration order; non-ASCII text passes through unescaped.
pub fn to_json_line<T: Serialize>(record: &T) -> serde_json::Result<String> {
    let mut line = serde_json::to_string(record)?;
    line.push('\n');
    Ok(line)
}
