use std::io;
use std::path::{Path, PathBuf};

/// Errors that can occur while deriving a safe artifact path
#[derive(Debug, thiserror::Error)]
pub enum PathSecurityError {
    #[error("File name is empty")]
    EmptyName,

    #[error("File name '{name}' must not contain directory components")]
    DirectoryComponents { name: String },

    #[error("File name '{name}' is reserved")]
    ReservedName { name: String },

    #[error("Path '{path}' is outside allowed root directory '{root}'")]
    OutsideRootDirectory { path: PathBuf, root: PathBuf },

    #[error("Symlink '{path}' points outside allowed root directory")]
    SymlinkOutsideRoot { path: PathBuf },

    #[error("Artifact root '{root}' is unavailable: {error}")]
    RootUnavailable { root: PathBuf, error: io::Error },

    #[error("Cannot canonicalize path '{path}': {error}")]
    CannotCanonicalize { path: PathBuf, error: io::Error },
}

/// A file name paired with its resolved location inside the artifact root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafePath {
    /// The bare file name, relative to the artifact root.
    pub file_name: String,

    /// Canonical absolute path of the file.
    pub path: PathBuf,
}

/// Derives a path for `raw_name` that is confined to `root_dir`.
///
/// The name is trimmed and must be a single path segment: anything carrying
/// directory components (`../`, `/etc/`, `dir\file`, `C:`) is rejected rather
/// than silently stripped, so callers learn their name was not used as sent.
/// The segment is then joined onto the canonical root and the result is
/// re-checked to be a strict descendant of that root, which also catches an
/// existing symlink in the root pointing elsewhere.
///
/// Nothing is written; the only filesystem access is canonicalization.
///
/// # Examples
///
/// ```rust,ignore
/// let safe = sanitize("notes.txt", Path::new("public"))?;
/// assert!(safe.path.ends_with("notes.txt"));
/// ```
pub fn sanitize(raw_name: &str, root_dir: &Path) -> Result<SafePath, PathSecurityError> {
    let name = raw_name.trim();
    if name.is_empty() {
        return Err(PathSecurityError::EmptyName);
    }

    if name.contains('\0') {
        return Err(PathSecurityError::ReservedName {
            name: name.replace('\0', "\\0"),
        });
    }

    // rsplit always yields at least one item
    let final_segment = name.rsplit(['/', '\\']).next().unwrap_or_default();
    if final_segment != name || has_drive_prefix(name) {
        return Err(PathSecurityError::DirectoryComponents {
            name: name.to_string(),
        });
    }

    if matches!(final_segment, "." | "..") {
        return Err(PathSecurityError::ReservedName {
            name: name.to_string(),
        });
    }

    let canonical_root =
        root_dir
            .canonicalize()
            .map_err(|e| PathSecurityError::RootUnavailable {
                root: root_dir.to_path_buf(),
                error: e,
            })?;

    let joined = canonical_root.join(final_segment);
    let (resolved, is_symlink) = resolve(&joined)?;

    if !is_strictly_within(&resolved, &canonical_root) {
        return Err(if is_symlink {
            PathSecurityError::SymlinkOutsideRoot { path: joined }
        } else {
            PathSecurityError::OutsideRootDirectory {
                path: resolved,
                root: canonical_root,
            }
        });
    }

    Ok(SafePath {
        file_name: final_segment.to_string(),
        path: resolved,
    })
}

/// Resolves an existing entry to its canonical form. A path that does not
/// exist yet is already canonical since its parent is the canonical root.
fn resolve(joined: &Path) -> Result<(PathBuf, bool), PathSecurityError> {
    match joined.symlink_metadata() {
        Ok(meta) if meta.file_type().is_symlink() => {
            // A dangling link would let a write land at its target
            let target = joined
                .canonicalize()
                .map_err(|_| PathSecurityError::SymlinkOutsideRoot {
                    path: joined.to_path_buf(),
                })?;
            Ok((target, true))
        }
        Ok(_) => {
            let canonical =
                joined
                    .canonicalize()
                    .map_err(|e| PathSecurityError::CannotCanonicalize {
                        path: joined.to_path_buf(),
                        error: e,
                    })?;
            Ok((canonical, false))
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok((joined.to_path_buf(), false)),
        Err(e) => Err(PathSecurityError::CannotCanonicalize {
            path: joined.to_path_buf(),
            error: e,
        }),
    }
}

/// Checks that `path` lies below `root` and is not the root itself
fn is_strictly_within(path: &Path, root: &Path) -> bool {
    path != root && path.starts_with(root)
}

fn has_drive_prefix(name: &str) -> bool {
    let bytes = name.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_plain_name_within_root() {
        let temp_dir = TempDir::new().unwrap();
        let safe = sanitize("notes.txt", temp_dir.path()).unwrap();

        let root = temp_dir.path().canonicalize().unwrap();
        assert_eq!(safe.file_name, "notes.txt");
        assert!(safe.path.starts_with(&root));
        assert_ne!(safe.path, root);
        assert_eq!(safe.path.parent(), Some(root.as_path()));
    }

    #[test]
    fn test_name_is_trimmed() {
        let temp_dir = TempDir::new().unwrap();
        let safe = sanitize("  report.md \n", temp_dir.path()).unwrap();
        assert_eq!(safe.file_name, "report.md");
    }

    #[test]
    fn test_existing_file_is_allowed() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("old.txt"), "old").unwrap();

        let safe = sanitize("old.txt", temp_dir.path()).unwrap();
        assert!(safe.path.exists());
    }

    #[test]
    fn test_empty_name_rejected() {
        let temp_dir = TempDir::new().unwrap();
        assert!(matches!(
            sanitize("   ", temp_dir.path()),
            Err(PathSecurityError::EmptyName)
        ));
    }

    #[test]
    fn test_traversal_rejected() {
        let temp_dir = TempDir::new().unwrap();
        for name in [
            "../../etc/passwd",
            "../secret.txt",
            "sub/../../x",
            "..\\..\\windows\\win.ini",
            "a/b.txt",
        ] {
            let result = sanitize(name, temp_dir.path());
            assert!(
                matches!(result, Err(PathSecurityError::DirectoryComponents { .. })),
                "expected rejection for {name}"
            );
        }
    }

    #[test]
    fn test_absolute_paths_rejected() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["/etc/passwd", "C:\\boot.ini", "c:evil", "/"] {
            assert!(
                matches!(
                    sanitize(name, temp_dir.path()),
                    Err(PathSecurityError::DirectoryComponents { .. })
                ),
                "expected rejection for {name}"
            );
        }
    }

    #[test]
    fn test_reserved_names_rejected() {
        let temp_dir = TempDir::new().unwrap();
        for name in [".", "..", "bad\0name"] {
            assert!(matches!(
                sanitize(name, temp_dir.path()),
                Err(PathSecurityError::ReservedName { .. })
            ));
        }
    }

    #[test]
    fn test_missing_root_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope");
        assert!(matches!(
            sanitize("a.txt", &missing),
            Err(PathSecurityError::RootUnavailable { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_within_root() {
        use std::os::unix::fs::symlink;

        let temp_dir = TempDir::new().unwrap();
        let target_file = temp_dir.path().join("target.txt");
        fs::write(&target_file, "test").unwrap();
        symlink(&target_file, temp_dir.path().join("link.txt")).unwrap();

        let safe = sanitize("link.txt", temp_dir.path()).unwrap();
        assert_eq!(safe.path, target_file.canonicalize().unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_outside_root_blocked() {
        use std::os::unix::fs::symlink;

        let root_dir = TempDir::new().unwrap();
        let outside_dir = TempDir::new().unwrap();
        let target_file = outside_dir.path().join("target.txt");
        fs::write(&target_file, "test").unwrap();
        symlink(&target_file, root_dir.path().join("link.txt")).unwrap();

        assert!(matches!(
            sanitize("link.txt", root_dir.path()),
            Err(PathSecurityError::SymlinkOutsideRoot { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_blocked() {
        use std::os::unix::fs::symlink;

        let root_dir = TempDir::new().unwrap();
        let outside_dir = TempDir::new().unwrap();
        symlink(
            outside_dir.path().join("not-yet.txt"),
            root_dir.path().join("link.txt"),
        )
        .unwrap();

        assert!(matches!(
            sanitize("link.txt", root_dir.path()),
            Err(PathSecurityError::SymlinkOutsideRoot { .. })
        ));
    }
}
