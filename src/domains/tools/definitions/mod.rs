//! Tool definitions module.
//!
//! One file per tool endpoint. Each definition owns its validation rules,
//! the plan it hands to the gateway, and the shape of its success envelope.
//! Dispatch itself is shared and lives in `gateway.rs`.

pub mod create_file;
pub mod tts;
pub mod whois;

pub use create_file::{CreateFilePlan, CreateFileTool};
pub use tts::{TtsPlan, TtsTool};
pub use whois::{WhoisPlan, WhoisTool};
