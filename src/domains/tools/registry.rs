//! Tool Registry - the list of tool endpoints and their metadata.
//!
//! Used by the HTTP layer for the service index and `GET /api/v1/tools`.
//! Routing itself is declared in `core/transport/http.rs`.

use serde::Serialize;

use super::definitions::{CreateFileTool, TtsTool, WhoisTool};

/// Metadata describing one tool endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub method: &'static str,
    pub path: &'static str,
    pub description: &'static str,
}

/// Tool registry - lists all available tools.
pub struct ToolRegistry;

impl ToolRegistry {
    /// Get all tool names.
    pub fn tool_names() -> Vec<&'static str> {
        Self::all().into_iter().map(|t| t.name).collect()
    }

    /// Get metadata for every tool endpoint.
    pub fn all() -> Vec<ToolDescriptor> {
        vec![
            ToolDescriptor {
                name: TtsTool::NAME,
                method: "POST",
                path: TtsTool::PATH,
                description: TtsTool::DESCRIPTION,
            },
            ToolDescriptor {
                name: WhoisTool::NAME,
                method: "POST",
                path: WhoisTool::PATH,
                description: WhoisTool::DESCRIPTION,
            },
            ToolDescriptor {
                name: CreateFileTool::NAME,
                method: "POST",
                path: CreateFileTool::PATH,
                description: CreateFileTool::DESCRIPTION,
            },
        ]
    }
}
