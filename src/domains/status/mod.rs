//! Status domain module.
//!
//! The dashboard snapshot behind `GET /api/v1/status`. Latency and connection
//! figures are simulated; the service has no metrics pipeline.

use chrono::Utc;
use rand::Rng;
use serde::Serialize;

use crate::core::config::Config;

const SYSTEM_STATUS: &str = "OPERATIONAL";
const NOTE: &str = "API is integrated with external tools (TTS, WHOIS, file creation).";

/// Snapshot returned by the status endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct SystemStatus {
    pub service_name: String,
    pub version: String,
    pub system_status: &'static str,
    pub current_time: String,
    pub api_latency_ms: u32,
    pub active_connections: u32,
    pub note: &'static str,
}

impl SystemStatus {
    /// Take a snapshot for the configured service.
    pub fn snapshot(config: &Config) -> Self {
        let mut rng = rand::thread_rng();
        Self {
            service_name: config.server.name.clone(),
            version: config.server.version.clone(),
            system_status: SYSTEM_STATUS,
            current_time: Utc::now().to_rfc3339(),
            api_latency_ms: rng.gen_range(5..55),
            active_connections: rng.gen_range(100..600),
            note: NOTE,
        }
    }
}
