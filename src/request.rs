//! Launch request.

use std::ffi::OsString;

/// The caller's arguments, excluding the launcher's own argv[0].
///
/// Untrusted. Must be validated by `LauncherConfig::prepare()` before anything
/// reaches the runtime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchRequest {
    /// Tokens in the order the caller gave them.
    pub argv: Vec<OsString>,
}

impl LaunchRequest {
    /// Create a request from explicit tokens.
    pub fn new<I, S>(argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self {
            argv: argv.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a request from this process's command line.
    pub fn from_env() -> Self {
        Self::new(std::env::args_os().skip(1))
    }
}
