//! Validated launch ready for process replacement.
//!
//! This module contains `PreparedLaunch`, which can only be created
//! by `LauncherConfig::prepare()`. This ensures every forwarded token went
//! through validation.

use crate::error::ExecError;
use std::ffi::{OsStr, OsString};
use std::os::unix::process::CommandExt;
use std::path::{Path, PathBuf};
use std::process::Command;

/// A fully validated argument vector.
///
/// This type cannot be constructed outside of `docker_launcher`.
/// The only way to create it is via `LauncherConfig::prepare()`.
#[derive(Debug, Clone)]
pub struct PreparedLaunch {
    pub(crate) runtime: PathBuf,
    pub(crate) arg0: String,
    pub(crate) args: Vec<OsString>,
}

impl PreparedLaunch {
    /// Replace the current process image with the runtime.
    ///
    /// The runtime is started by absolute path (no `PATH` lookup) with the
    /// current environment. On success this never returns; the runtime's own
    /// exit status is what the caller observes.
    ///
    /// # Errors
    ///
    /// Returns `ExecError::ExecFailed` carrying the OS error if `execv` fails.
    pub fn exec(self) -> ExecError {
        tracing::debug!(
            runtime = %self.runtime.display(),
            argc = self.args.len() + 1,
            "replacing process image"
        );

        let source = Command::new(&self.runtime)
            .arg0(&self.arg0)
            .args(&self.args)
            .exec();

        tracing::error!(runtime = %self.runtime.display(), error = %source, "exec failed");
        ExecError::ExecFailed {
            runtime: self.runtime,
            source,
        }
    }

    /// Get the runtime binary path.
    pub fn runtime(&self) -> &Path {
        &self.runtime
    }

    /// Get argv[0].
    pub fn arg0(&self) -> &OsStr {
        OsStr::new(&self.arg0)
    }

    /// Get the validated arguments, without argv[0].
    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// Get the full vector the runtime receives: argv[0] followed by the arguments.
    pub fn argv(&self) -> Vec<OsString> {
        std::iter::once(OsString::from(&self.arg0))
            .chain(self.args.iter().cloned())
            .collect()
    }
}
