//! HTTP transport implementation.
//!
//! Plain JSON over HTTP: every tool and track endpoint answers with a
//! `ResponseEnvelope`, and artifacts are served read-only under the static
//! prefix. Standard HTTP clients (curl, browsers, the dashboard) talk to it
//! directly.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::Uri,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use http::StatusCode;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::extract::ToolBody;
use super::{HttpConfig, TransportError, TransportResult};
use crate::core::GatewayServer;
use crate::domains::tools::definitions::{CreateFileTool, TtsTool, WhoisTool};
use crate::domains::tools::{CreateFileBody, ResponseEnvelope, ToolRegistry, TtsBody, WhoisBody};

const STATUS_PATH: &str = "/api/v1/status";
const TRACK_PATH: &str = "/api/v1/track/{id}";
const TOOLS_PATH: &str = "/api/v1/tools";

/// HTTP transport handler.
pub struct HttpTransport {
    config: HttpConfig,
}

/// Application state shared across HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    server: GatewayServer,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given config.
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        self.config.address()
    }

    /// Run the HTTP transport until ctrl-c.
    pub async fn run(self, server: GatewayServer) -> TransportResult<()> {
        let addr = self.address();
        let static_prefix = server.config().artifacts.static_prefix.clone();
        let app = build_router(server);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        let cors_status = if self.config.enable_cors {
            "enabled"
        } else {
            "disabled"
        };
        info!("Ready - listening on {} (CORS {})", addr, cors_status);
        info!("  → Status:    GET {}", STATUS_PATH);
        info!("  → Tracks:    GET {}", TRACK_PATH);
        info!("  → Tools:     POST {}/{{tts,whois,createfile}}", TOOLS_PATH);
        info!("  → Artifacts: GET {}/<name>", static_prefix);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| TransportError::http(e.to_string()))?;

        info!("HTTP transport stopped");
        Ok(())
    }
}

/// Build the application router for a server.
pub fn build_router(server: GatewayServer) -> Router {
    let config = server.config().clone();
    let artifacts = ServeDir::new(&config.artifacts.root_dir);

    let mut app = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_check))
        .route(STATUS_PATH, get(status_handler))
        .route(TRACK_PATH, get(track_handler))
        .route(TOOLS_PATH, get(tools_handler))
        .route(TtsTool::PATH, post(tts_handler))
        .route(WhoisTool::PATH, post(whois_handler))
        .route(CreateFileTool::PATH, post(create_file_handler))
        .nest_service(&config.artifacts.static_prefix, artifacts)
        .fallback(route_not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .with_state(AppState { server });

    if config.transport.enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    app.layer(TraceLayer::new_for_http())
}

impl IntoResponse for ResponseEnvelope {
    fn into_response(self) -> Response {
        (self.http_code(), Json(self)).into_response()
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Root handler - provides API info.
async fn root_handler(State(state): State<AppState>) -> impl IntoResponse {
    let config = state.server.config();
    Json(serde_json::json!({
        "name": state.server.name(),
        "version": state.server.version(),
        "endpoints": {
            "status": STATUS_PATH,
            "track": TRACK_PATH,
            "tools": TOOLS_PATH,
            "artifacts": config.artifacts.static_prefix,
            "health": "/health"
        },
        "tools": ToolRegistry::tool_names()
    }))
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn status_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.server.status())
}

async fn track_handler(State(state): State<AppState>, Path(id): Path<String>) -> ResponseEnvelope {
    state.server.tracks().lookup(&id).await
}

async fn tools_handler() -> ResponseEnvelope {
    ResponseEnvelope::success("Available tools.").with("tools", serde_json::json!(ToolRegistry::all()))
}

async fn tts_handler(
    State(state): State<AppState>,
    ToolBody(body): ToolBody<TtsBody>,
) -> ResponseEnvelope {
    state.server.tools().handle(body.into()).await
}

async fn whois_handler(
    State(state): State<AppState>,
    ToolBody(body): ToolBody<WhoisBody>,
) -> ResponseEnvelope {
    state.server.tools().handle(body.into()).await
}

async fn create_file_handler(
    State(state): State<AppState>,
    ToolBody(body): ToolBody<CreateFileBody>,
) -> ResponseEnvelope {
    state.server.tools().handle(body.into()).await
}

async fn route_not_found(uri: Uri) -> ResponseEnvelope {
    info!("No route for {}", uri.path());
    ResponseEnvelope::route_not_found(uri.path())
}

async fn method_not_allowed(uri: Uri) -> ResponseEnvelope {
    ResponseEnvelope::error(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed.")
        .with("path", uri.path())
}
