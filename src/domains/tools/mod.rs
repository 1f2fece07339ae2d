//! Tools domain module.
//!
//! This module handles the tool endpoints: text-to-speech, WHOIS lookup and
//! file creation. Each request is validated, dispatched to a capability
//! adapter and answered with a uniform response envelope.
//!
//! ## Architecture
//!
//! - `definitions/` - Per-tool validation rules and success envelopes (one file per tool)
//! - `capabilities/` - Narrow async traits over external operations, plus their backends
//! - `gateway.rs` - The shared validate -> dispatch -> envelope sequence
//! - `envelope.rs` - The response envelope every endpoint returns
//! - `identifier.rs` - Unique names for generated artifacts
//! - `artifact.rs` - Artifact references and the in-flight write guard
//! - `registry.rs` - Tool metadata for listing
//! - `error.rs` - Tool-specific error types

pub mod artifact;
pub mod capabilities;
pub mod definitions;
pub mod envelope;
mod error;
pub mod gateway;
pub mod identifier;
mod registry;
pub mod request;

pub use artifact::ArtifactRef;
pub use capabilities::Capabilities;
pub use envelope::{EnvelopeStatus, ResponseEnvelope};
pub use error::{CapabilityFailure, ToolError};
pub use gateway::{DispatchPhase, ToolGateway};
pub use registry::{ToolDescriptor, ToolRegistry};
pub use request::{CreateFileBody, ToolKind, ToolRequest, TtsBody, WhoisBody};
