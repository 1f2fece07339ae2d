//! Gateway server and its lifecycle.
//!
//! `GatewayServer` owns the shared configuration and the domain services and
//! hands them to the HTTP transport. Routing lives in `core/transport/http.rs`.

use std::sync::Arc;
use tracing::info;

use super::config::Config;
use super::error::{Error, Result};
use super::transport::HttpTransport;
use crate::domains::status::SystemStatus;
use crate::domains::tools::{Capabilities, ToolGateway};
use crate::domains::tracks::TrackService;

/// The gateway server.
#[derive(Clone)]
pub struct GatewayServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Validates and dispatches tool requests.
    tools: ToolGateway,

    /// Serves the demonstration track lookup.
    tracks: Arc<TrackService>,
}

impl GatewayServer {
    /// Create a server backed by the production capability adapters.
    pub fn new(config: Config) -> Result<Self> {
        let capabilities = Capabilities::from_config(&config.tools)
            .map_err(|e| Error::config(format!("cannot build speech client: {}", e)))?;
        Self::with_capabilities(config, capabilities)
    }

    /// Create a server dispatching to the given capabilities.
    ///
    /// The artifact directory is created if it does not exist yet.
    pub fn with_capabilities(config: Config, capabilities: Capabilities) -> Result<Self> {
        std::fs::create_dir_all(&config.artifacts.root_dir)?;
        info!(
            "Artifacts stored in {} and served under {}",
            config.artifacts.root_dir.display(),
            config.artifacts.static_prefix
        );

        let config = Arc::new(config);
        let tracks = Arc::new(TrackService::new(config.tracks.clone()));

        Ok(Self {
            tools: ToolGateway::new(config.clone(), capabilities),
            tracks,
            config,
        })
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    pub fn tools(&self) -> &ToolGateway {
        &self.tools
    }

    pub fn tracks(&self) -> &TrackService {
        &self.tracks
    }

    /// Current status snapshot.
    pub fn status(&self) -> SystemStatus {
        SystemStatus::snapshot(&self.config)
    }

    /// Serve HTTP until ctrl-c.
    pub async fn run(self) -> Result<()> {
        let transport = HttpTransport::new(self.config.transport.clone());
        transport.run(self).await?;
        Ok(())
    }
}
