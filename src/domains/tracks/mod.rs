//! Tracks domain module.
//!
//! The demonstration track lookup behind `GET /api/v1/track/{id}`. It shows
//! the success and not-found envelope shapes and has no persistence: known
//! ids come from a fixed in-memory catalog, other well-formed ids get
//! synthesized metadata, and the reserved id `nonexistent` is always missing.
//!
//! ## Architecture
//!
//! - `catalog.rs` - The fixed track table and lookup rules
//! - `service.rs` - Simulated latency and envelope construction

mod catalog;
mod service;

pub use catalog::{MISSING_TRACK_ID, Track, TrackCatalog};
pub use service::TrackService;
