//! Local filesystem writer.

use async_trait::async_trait;
use std::path::Path;
use tracing::debug;

use super::{FileWriter, WriteError};

/// Writes artifacts with `tokio::fs`, replacing any existing file.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileWriter;

#[async_trait]
impl FileWriter for LocalFileWriter {
    async fn write(&self, path: &Path, content: &[u8]) -> Result<(), WriteError> {
        debug!("Writing {} bytes to {}", content.len(), path.display());
        tokio::fs::write(path, content)
            .await
            .map_err(|source| WriteError {
                path: path.display().to_string(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_creates_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("hello.txt");

        LocalFileWriter.write(&path, b"hello").await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello");
    }

    #[tokio::test]
    async fn test_write_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("hello.txt");
        std::fs::write(&path, "old content").unwrap();

        LocalFileWriter.write(&path, b"new").await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    }

    #[tokio::test]
    async fn test_write_into_missing_dir_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("hello.txt");

        let err = LocalFileWriter.write(&path, b"x").await.unwrap_err();
        assert!(err.path.ends_with("hello.txt"));
    }
}
