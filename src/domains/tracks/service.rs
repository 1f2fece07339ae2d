//! Track service implementation.

use chrono::Utc;
use rand::Rng;
use std::time::Duration;
use tracing::{info, instrument};

use super::catalog::{Track, TrackCatalog};
use crate::core::config::TracksConfig;
use crate::domains::tools::{ResponseEnvelope, ToolError};

/// Id suggested to callers that asked for a missing track.
const SUGGESTED_TRACK_ID: &str = "terimakasih";

/// Serves the demonstration track lookup.
#[derive(Debug, Clone)]
pub struct TrackService {
    catalog: TrackCatalog,
    config: TracksConfig,
}

impl TrackService {
    /// Create a new TrackService with the given configuration.
    pub fn new(config: TracksConfig) -> Self {
        info!("Initializing TrackService");
        Self {
            catalog: TrackCatalog::new(),
            config,
        }
    }

    /// Look up a track and build its envelope.
    ///
    /// Found tracks are returned after the simulated latency; missing ones
    /// are answered immediately with a 404 envelope.
    #[instrument(skip(self))]
    pub async fn lookup(&self, id: &str) -> ResponseEnvelope {
        let Some(track) = self.catalog.find(id) else {
            info!("Track not found: {}", id);
            return not_found();
        };

        let latency = self.simulated_latency();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        found(track, latency)
    }

    /// Configured latency plus up to 20% jitter.
    fn simulated_latency(&self) -> Duration {
        let base = self.config.simulated_latency_ms;
        if base == 0 {
            return Duration::ZERO;
        }
        let jitter = rand::thread_rng().gen_range(0..=base / 5);
        Duration::from_millis(base + jitter)
    }
}

fn found(track: Track, latency: Duration) -> ResponseEnvelope {
    ResponseEnvelope::success("Metadata retrieved.")
        .with("id", track.id)
        .with("title", track.title)
        .with("artist", track.artist)
        .with("duration_ms", track.duration_ms)
        .with("retrieved_at", Utc::now().to_rfc3339())
        .with("latency_ms", latency.as_millis() as u64)
}

fn not_found() -> ResponseEnvelope {
    ResponseEnvelope::from(ToolError::not_found("Resource ID not found.")).with(
        "suggestion",
        format!("Try /api/v1/track/{}", SUGGESTED_TRACK_ID),
    )
}
