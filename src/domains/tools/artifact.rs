//! Artifact references and the in-flight write guard.

use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::core::config::Config;
use crate::core::security::SafePath;

/// A file produced on behalf of a request.
///
/// `absolute_path` always lies inside the artifact root because it comes from
/// the path sanitizer; `public_url` is derived from `relative_name` alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactRef {
    pub relative_name: String,
    pub absolute_path: PathBuf,
    pub public_url: String,
}

impl ArtifactRef {
    pub fn new(safe: SafePath, config: &Config) -> Self {
        let public_url = config.artifact_url(&safe.file_name);
        Self {
            relative_name: safe.file_name,
            absolute_path: safe.path,
            public_url,
        }
    }
}

/// Guards an artifact while its capability call is outstanding.
///
/// If the guard is dropped without `commit` (the call failed, timed out, or
/// the client disconnected and the request future was dropped) the leftover
/// file is reported. Generated artifacts are also removed; client-named ones
/// are left alone since they may have replaced a file the client wanted.
#[derive(Debug)]
pub struct PendingArtifact {
    path: PathBuf,
    remove_on_abort: bool,
    committed: bool,
}

impl PendingArtifact {
    /// Guard a file whose name the gateway generated.
    pub fn generated(path: PathBuf) -> Self {
        Self {
            path,
            remove_on_abort: true,
            committed: false,
        }
    }

    /// Guard a file whose name the client chose.
    pub fn client_named(path: PathBuf) -> Self {
        Self {
            path,
            remove_on_abort: false,
            committed: false,
        }
    }

    /// Mark the artifact complete.
    pub fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for PendingArtifact {
    fn drop(&mut self) {
        if self.committed {
            return;
        }

        if self.remove_on_abort {
            match std::fs::remove_file(&self.path) {
                Ok(()) => warn!("Removed incomplete artifact {}", self.path.display()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    debug!("No artifact left behind at {}", self.path.display())
                }
                Err(e) => warn!(
                    "Incomplete artifact left at {} (cleanup failed: {})",
                    self.path.display(),
                    e
                ),
            }
        } else if self.path.exists() {
            warn!(
                "Write to {} did not complete; the file may be partial",
                self.path.display()
            );
        }
    }
}
