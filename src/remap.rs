//! Symbolic prefix remapping through trusted indirection files.
//!
//! The caller only ever names paths under a symbolic root such as
//! `/workspace`. The real host directory is the content of a file the caller
//! cannot write, so it is never taken from the invocation itself.

use crate::error::Violation;
use std::ffi::OsString;
use std::fs::File;
use std::io::Read;
use std::os::unix::ffi::OsStringExt;
use std::path::{Path, PathBuf};

/// A sanctioned symbolic root and the file holding its real host path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixMapping {
    /// Symbolic root, absolute and without a trailing slash (e.g. `/workspace`).
    pub root: String,

    /// File whose contents replace `root`.
    pub indirection: PathBuf,
}

impl PrefixMapping {
    /// Create a mapping.
    pub fn new(root: impl Into<String>, indirection: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            indirection: indirection.into(),
        }
    }

    /// Whether `local` lies under this root.
    ///
    /// The root must be followed by `/`, so `/workspacefoo` and a bare
    /// `/workspace` do not match.
    pub fn matches(&self, local: &str) -> bool {
        local
            .strip_prefix(self.root.as_str())
            .is_some_and(|rest| rest.starts_with('/'))
    }

    /// Rewrite `local` through this mapping's indirection file.
    pub fn remap(&self, local: &str) -> Result<OsString, Violation> {
        remap_prefix(local, &self.root, &self.indirection)
    }
}

/// Replace `prefix` at the start of `path` with the contents of `indirection`.
///
/// The file is read in full as raw bytes and used literally: no trimming, no
/// UTF-8 requirement.
///
/// # Errors
///
/// - `MountPrefix` if `path` does not start with `prefix`
/// - `IndirectionOpen` if the file cannot be opened
/// - `IndirectionSize` if its length cannot be determined
/// - `IndirectionRead` if reading fails
pub fn remap_prefix(path: &str, prefix: &str, indirection: &Path) -> Result<OsString, Violation> {
    let suffix = path.strip_prefix(prefix).ok_or_else(|| Violation::MountPrefix {
        spec: path.to_string(),
    })?;

    let mut file = File::open(indirection).map_err(|e| {
        tracing::warn!(path = %indirection.display(), error = %e, "indirection open failed");
        Violation::IndirectionOpen {
            path: indirection.to_path_buf(),
            reason: e.to_string(),
        }
    })?;

    let len = file.metadata().map(|m| m.len()).map_err(|e| {
        tracing::warn!(path = %indirection.display(), error = %e, "indirection stat failed");
        Violation::IndirectionSize {
            path: indirection.to_path_buf(),
            reason: e.to_string(),
        }
    })?;

    let mut bytes = Vec::with_capacity(len as usize + suffix.len());
    file.read_to_end(&mut bytes).map_err(|e| {
        tracing::warn!(path = %indirection.display(), error = %e, "indirection read failed");
        Violation::IndirectionRead {
            path: indirection.to_path_buf(),
            reason: e.to_string(),
        }
    })?;

    bytes.extend_from_slice(suffix.as_bytes());
    Ok(OsString::from_vec(bytes))
}
