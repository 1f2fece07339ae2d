//! HTTP transport for the gateway.
//!
//! Binds the listener, declares the routes and converts request bodies and
//! response envelopes to and from HTTP. All behaviour is delegated to
//! `GatewayServer`.

mod config;
mod error;
mod extract;

pub mod http;

pub use config::HttpConfig;
pub use error::{TransportError, TransportResult};
pub use extract::ToolBody;
pub use http::{HttpTransport, build_router};
