//! # docker_launcher
//!
//! Privilege-mediating launcher for containerized build environments.
//!
//! An unprivileged build agent cannot talk to the container runtime directly.
//! Instead it invokes this launcher, which checks every token of the request
//! against a closed grammar, rewrites mount paths through trusted indirection
//! files, and only then replaces itself with the runtime.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docker_launcher::{LaunchRequest, LauncherConfig};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = LauncherConfig::deployment()?;
//!
//! let request = LaunchRequest::new([
//!     "run", "--rm", "--network", "none",
//!     "-v", "/workspace/src:/src",
//!     "helium-build/build-env:debian-buster-20190708",
//!     "make", "all",
//! ]);
//!
//! let prepared = config.prepare(request)?;
//! // Only returns if the runtime could not be executed.
//! let err = prepared.exec();
//! eprintln!("{err}");
//! # Ok(())
//! # }
//! ```
//!
//! ## Design Principles
//!
//! - **Closed grammar**: `run`, whitelisted flags, an image reference; nothing else
//! - **Fail closed**: the first bad token rejects the whole request
//! - **No caller-chosen host paths**: mounts must sit under a sanctioned root, and
//!   the real path comes from a file the caller cannot write
//! - **Absolute runtime path**: no `PATH` lookup
//! - **Type-safe API**: only `PreparedLaunch` can exec the runtime
//!
//! Everything after the image reference is the in-container command line and is
//! forwarded verbatim.

#[cfg(windows)]
compile_error!(
    "docker_launcher does not support Windows. \
     It replaces its own process image with execv, which has no Windows equivalent."
);

mod config;
mod error;
mod flag_rules;
mod logging;
mod mount;
mod pattern;
mod prepared;
mod remap;
mod request;
mod scanner;

// Public API
pub use config::{
    LauncherConfig, LauncherConfigBuilder, CACHE_INDIRECTION, CACHE_ROOT, RUNTIME_ARG0,
    RUNTIME_PATH, SUBCOMMAND, WORKSPACE_INDIRECTION, WORKSPACE_ROOT,
};
pub use error::{ExecError, LaunchError, Violation, ViolationCategory};
pub use flag_rules::{FlagRule, FlagValue};
pub use logging::{init_tracing, LOG_ENV};
pub use mount::{validate_mount, MountSpec};
pub use pattern::Grammar;
pub use prepared::PreparedLaunch;
pub use remap::{remap_prefix, PrefixMapping};
pub use request::LaunchRequest;
