//! File creation tool definition.
//!
//! Writes client-supplied content under a client-chosen name inside the
//! artifact directory. The name is sanitized; existing files are replaced
//! unless overwriting is disabled in the configuration.

use tracing::info;

use crate::core::config::Config;
use crate::core::security::sanitize;
use crate::domains::tools::artifact::ArtifactRef;
use crate::domains::tools::envelope::ResponseEnvelope;
use crate::domains::tools::error::ToolError;

/// A validated file creation request.
#[derive(Debug, Clone)]
pub struct CreateFilePlan {
    pub content: String,
    pub artifact: ArtifactRef,
    pub replaces_existing: bool,
}

/// File creation tool.
pub struct CreateFileTool;

impl CreateFileTool {
    /// Tool name as listed by the registry.
    pub const NAME: &'static str = "createfile";

    /// Route the tool is served on.
    pub const PATH: &'static str = "/api/v1/tools/createfile";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Create or overwrite a file on the server. \
         Body: {filename, content}. Returns a download URL.";

    /// Validate the request and resolve the destination path.
    pub fn plan(filename: &str, content: &str, config: &Config) -> Result<CreateFilePlan, ToolError> {
        if filename.trim().is_empty() {
            return Err(ToolError::validation("filename is required."));
        }

        if content.trim().is_empty() {
            return Err(ToolError::validation("content is required."));
        }

        let max_bytes = config.artifacts.max_content_bytes;
        if content.len() > max_bytes {
            return Err(ToolError::validation(format!(
                "content must be at most {} bytes.",
                max_bytes
            )));
        }

        let safe = sanitize(filename, &config.artifacts.root_dir)?;
        let replaces_existing = safe.path.exists();
        if replaces_existing && !config.artifacts.allow_overwrite {
            return Err(ToolError::conflict(format!(
                "File {} already exists.",
                safe.file_name
            )));
        }

        if replaces_existing {
            info!("createfile will replace existing artifact {}", safe.file_name);
        }

        Ok(CreateFilePlan {
            content: content.to_string(),
            artifact: ArtifactRef::new(safe, config),
            replaces_existing,
        })
    }

    /// Envelope returned once the file is written.
    pub fn success(artifact: &ArtifactRef) -> ResponseEnvelope {
        ResponseEnvelope::success(format!(
            "File {} created on the server.",
            artifact.relative_name
        ))
        .with("filename", artifact.relative_name.as_str())
        .with("download_url", artifact.public_url.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::security::PathSecurityError;
    use tempfile::TempDir;

    fn config_with_root(root: &TempDir) -> Config {
        let mut config = Config::default();
        config.artifacts.root_dir = root.path().to_path_buf();
        config
    }

    #[test]
    fn test_plan_plain_name() {
        let root = TempDir::new().unwrap();
        let plan = CreateFileTool::plan(" main.rs ", "fn main() {}\n", &config_with_root(&root)).unwrap();

        assert_eq!(plan.artifact.relative_name, "main.rs");
        assert_eq!(plan.content, "fn main() {}\n");
        assert!(!plan.replaces_existing);
    }

    #[test]
    fn test_plan_requires_fields() {
        let root = TempDir::new().unwrap();
        let config = config_with_root(&root);

        let err = CreateFileTool::plan("", "x", &config).unwrap_err();
        assert!(matches!(err, ToolError::Validation(ref m) if m.contains("filename")));

        let err = CreateFileTool::plan("a.txt", "  \n", &config).unwrap_err();
        assert!(matches!(err, ToolError::Validation(ref m) if m.contains("content")));
    }

    #[test]
    fn test_plan_rejects_traversal() {
        let root = TempDir::new().unwrap();
        let err = CreateFileTool::plan("../../etc/passwd", "root::0:0", &config_with_root(&root))
            .unwrap_err();
        assert!(matches!(
            err,
            ToolError::PathSafety(PathSecurityError::DirectoryComponents { .. })
        ));
    }

    #[test]
    fn test_plan_rejects_oversized_content() {
        let root = TempDir::new().unwrap();
        let mut config = config_with_root(&root);
        config.artifacts.max_content_bytes = 4;
        assert!(CreateFileTool::plan("a.txt", "12345", &config).is_err());
    }

    #[test]
    fn test_plan_overwrite_policy() {
        let root = TempDir::new().unwrap();
        std::fs::write(root.path().join("taken.txt"), "old").unwrap();
        let mut config = config_with_root(&root);

        let plan = CreateFileTool::plan("taken.txt", "new", &config).unwrap();
        assert!(plan.replaces_existing);

        config.artifacts.allow_overwrite = false;
        let err = CreateFileTool::plan("taken.txt", "new", &config).unwrap_err();
        assert!(matches!(err, ToolError::Conflict(_)));
    }

    #[test]
    fn test_success_envelope() {
        let root = TempDir::new().unwrap();
        let plan = CreateFileTool::plan("a.txt", "x", &config_with_root(&root)).unwrap();
        let envelope = CreateFileTool::success(&plan.artifact);

        assert_eq!(envelope.message(), "File a.txt created on the server.");
        assert_eq!(
            envelope.field("download_url").and_then(|v| v.as_str()),
            Some("http://127.0.0.1:3000/static/a.txt")
        );
    }
}
