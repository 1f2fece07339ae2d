//! Tool Gateway Library
//!
//! A small HTTP gateway exposing a handful of tool endpoints (speech
//! synthesis, WHOIS lookup, server-side file creation) behind a uniform JSON
//! response envelope, plus a status snapshot and a demonstration track
//! lookup.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, path safety, the server and the HTTP transport
//! - **domains**: business logic organized by bounded contexts
//!   - **tools**: validation, dispatch and the capability adapters
//!   - **tracks**: the demonstration track lookup
//!   - **status**: the dashboard status snapshot
//!
//! # Example
//!
//! ```rust,no_run
//! use tool_gateway::{Config, GatewayServer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = GatewayServer::new(config)?;
//!     server.run().await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, GatewayServer, Result};
