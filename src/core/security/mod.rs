// Security module for artifact path confinement
//
// This module derives on-disk paths for client-influenced filenames and
// guarantees they stay inside the configured artifact directory, preventing
// path traversal attacks and writes outside the served root.

pub mod path_sanitizer;

pub use path_sanitizer::{PathSecurityError, SafePath, sanitize};
