//! Configuration management for the tool gateway.
//!
//! This module provides a centralized configuration structure that is built
//! once at startup (from defaults, a `.env` file and `GATEWAY_*` environment
//! variables) and then handed to the server and the tool gateway.

use super::transport::HttpConfig;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

/// Main configuration structure for the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// HTTP transport configuration.
    pub transport: HttpConfig,

    /// Artifact directory and public URL configuration.
    pub artifacts: ArtifactsConfig,

    /// Tool endpoint configuration.
    pub tools: ToolsConfig,

    /// Demonstration track endpoint configuration.
    pub tracks: TracksConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the service as reported to clients.
    pub name: String,

    /// The version of the service.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,
}

/// Configuration for server-created artifacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactsConfig {
    /// Directory every artifact is written into. Created at startup.
    pub root_dir: PathBuf,

    /// Base URL clients use to reach this service. When `None`, it is
    /// derived from the transport host and port.
    pub public_base_url: Option<String>,

    /// URL prefix the artifact directory is served under.
    pub static_prefix: String,

    /// Whether `createfile` may replace an existing artifact.
    pub allow_overwrite: bool,

    /// Upper bound for `createfile` content, in bytes.
    pub max_content_bytes: usize,
}

/// Configuration for the tool endpoints and their capabilities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Language used when a TTS request omits `lang`.
    pub default_lang: String,

    /// Longest text accepted by the TTS endpoint, in characters.
    pub max_text_chars: usize,

    /// Hard bound on any single capability call, in milliseconds.
    pub capability_timeout_ms: u64,

    /// Speech synthesis backend settings.
    pub tts: TtsConfig,

    /// WHOIS backend settings.
    pub whois: WhoisConfig,
}

/// Speech synthesis backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtsConfig {
    /// Endpoint returning MP3 audio for a text chunk.
    pub endpoint: String,

    /// Largest text chunk sent per backend request, in characters.
    pub chunk_chars: usize,

    /// Timeout for each backend request, in milliseconds.
    pub request_timeout_ms: u64,
}

/// WHOIS backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhoisConfig {
    /// Server the lookup starts at.
    pub server: String,

    /// TCP port WHOIS servers listen on.
    pub port: u16,

    /// How many referrals are followed after the first server.
    pub max_referrals: usize,

    /// Timeout for the whole lookup, in milliseconds.
    pub timeout_ms: u64,

    /// Follow referrals to IP literals, non-public addresses and ports other
    /// than `port`. Only meant for local test servers.
    #[serde(default)]
    pub allow_local_referrals: bool,
}

/// Configuration for the demonstration track endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TracksConfig {
    /// Simulated latency before a track is returned, in milliseconds.
    pub simulated_latency_ms: u64,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("public"),
            public_base_url: None,
            static_prefix: "/static".to_string(),
            allow_overwrite: true,
            max_content_bytes: 1024 * 1024,
        }
    }
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://translate.google.com/translate_tts".to_string(),
            chunk_chars: 100,
            request_timeout_ms: 15_000,
        }
    }
}

impl Default for WhoisConfig {
    fn default() -> Self {
        Self {
            server: "whois.iana.org".to_string(),
            port: 43,
            max_referrals: 2,
            timeout_ms: 10_000,
            allow_local_referrals: false,
        }
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            default_lang: "id".to_string(),
            max_text_chars: 5_000,
            capability_timeout_ms: 30_000,
            tts: TtsConfig::default(),
            whois: WhoisConfig::default(),
        }
    }
}

impl Default for TracksConfig {
    fn default() -> Self {
        Self {
            simulated_latency_ms: 500,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            with_timestamps: true,
        }
    }
}

impl LoggingConfig {
    /// Load logging settings from `GATEWAY_LOG_LEVEL` and
    /// `GATEWAY_LOG_TIMESTAMPS`.
    ///
    /// Read before the subscriber exists, so it must not log.
    pub fn from_env() -> Self {
        let mut logging = Self::default();

        if let Ok(level) = std::env::var("GATEWAY_LOG_LEVEL") {
            logging.level = level;
        }

        if let Some(with_timestamps) = std::env::var("GATEWAY_LOG_TIMESTAMPS")
            .ok()
            .and_then(|raw| raw.parse().ok())
        {
            logging.with_timestamps = with_timestamps;
        }

        logging
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "DIZI Advanced API Gateway".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig::default(),
            transport: HttpConfig::default(),
            artifacts: ArtifactsConfig::default(),
            tools: ToolsConfig::default(),
            tracks: TracksConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables are expected to be prefixed with `GATEWAY_`.
    /// For example: `GATEWAY_ARTIFACT_DIR`, `GATEWAY_LOG_LEVEL`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("GATEWAY_SERVICE_NAME") {
            config.server.name = name;
        }

        config.logging = LoggingConfig::from_env();

        config.transport = HttpConfig::from_env();

        if let Ok(dir) = std::env::var("GATEWAY_ARTIFACT_DIR") {
            config.artifacts.root_dir = PathBuf::from(dir);
        }
        info!("Artifact directory: {:?}", config.artifacts.root_dir);

        if let Ok(url) = std::env::var("GATEWAY_PUBLIC_BASE_URL") {
            config.artifacts.public_base_url = Some(url.trim_end_matches('/').to_string());
        }

        if let Ok(prefix) = std::env::var("GATEWAY_STATIC_PREFIX") {
            config.artifacts.static_prefix = normalize_prefix(&prefix);
        }

        env_parse("GATEWAY_ALLOW_OVERWRITE", &mut config.artifacts.allow_overwrite);
        info!("Artifact overwrite allowed: {}", config.artifacts.allow_overwrite);

        env_parse("GATEWAY_MAX_CONTENT_BYTES", &mut config.artifacts.max_content_bytes);

        if let Ok(lang) = std::env::var("GATEWAY_DEFAULT_LANG") {
            config.tools.default_lang = lang;
        }

        env_parse("GATEWAY_MAX_TEXT_CHARS", &mut config.tools.max_text_chars);
        env_parse(
            "GATEWAY_CAPABILITY_TIMEOUT_MS",
            &mut config.tools.capability_timeout_ms,
        );

        if let Ok(endpoint) = std::env::var("GATEWAY_TTS_ENDPOINT") {
            config.tools.tts.endpoint = endpoint;
        }
        env_parse("GATEWAY_TTS_TIMEOUT_MS", &mut config.tools.tts.request_timeout_ms);

        if let Ok(server) = std::env::var("GATEWAY_WHOIS_SERVER") {
            config.tools.whois.server = server;
        }
        env_parse("GATEWAY_WHOIS_PORT", &mut config.tools.whois.port);
        env_parse(
            "GATEWAY_WHOIS_MAX_REFERRALS",
            &mut config.tools.whois.max_referrals,
        );
        env_parse("GATEWAY_WHOIS_TIMEOUT_MS", &mut config.tools.whois.timeout_ms);
        env_parse(
            "GATEWAY_WHOIS_ALLOW_LOCAL_REFERRALS",
            &mut config.tools.whois.allow_local_referrals,
        );

        env_parse(
            "GATEWAY_TRACK_LATENCY_MS",
            &mut config.tracks.simulated_latency_ms,
        );

        config
    }

    /// Base URL clients use to reach this service, without trailing slash.
    pub fn public_base_url(&self) -> String {
        self.artifacts
            .public_base_url
            .clone()
            .unwrap_or_else(|| format!("http://{}", self.transport.address()))
    }

    /// Public URL of an artifact stored under `relative_name`.
    ///
    /// The name is percent-encoded as a single path segment, so `#`, `?`,
    /// `%` and spaces stay part of the file name.
    pub fn artifact_url(&self, relative_name: &str) -> String {
        let base = format!("{}{}/", self.public_base_url(), self.artifacts.static_prefix);
        let mut url = match Url::parse(&base) {
            Ok(url) => url,
            Err(e) => {
                warn!("Invalid public base URL '{}': {}", base, e);
                return format!("{}{}", base, relative_name);
            }
        };

        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(relative_name);
        }
        url.to_string()
    }

    /// Bound applied to every capability call.
    pub fn capability_timeout(&self) -> Duration {
        Duration::from_millis(self.tools.capability_timeout_ms)
    }
}

/// Override `target` from an environment variable, keeping the current value
/// when the variable is missing or malformed.
fn env_parse<T: FromStr>(key: &str, target: &mut T) {
    if let Ok(raw) = std::env::var(key) {
        match raw.parse() {
            Ok(value) => *target = value,
            Err(_) => warn!("Ignoring invalid value '{}' for {}", raw, key),
        }
    }
}

fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/static".to_string()
    } else {
        format!("/{}", trimmed)
    }
}
