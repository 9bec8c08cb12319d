//! Launcher configuration.
//!
//! The main entry point for docker-launcher. `LauncherConfig` fixes which
//! runtime is started, which flags are forwarded, and which symbolic roots can
//! be mounted, and validates requests before anything is executed.

use crate::error::Violation;
use crate::flag_rules::FlagRule;
use crate::prepared::PreparedLaunch;
use crate::remap::PrefixMapping;
use crate::request::LaunchRequest;
use crate::scanner::ArgumentScanner;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Absolute path of the container runtime binary.
pub const RUNTIME_PATH: &str = "/usr/bin/docker";

/// argv[0] passed to the runtime.
pub const RUNTIME_ARG0: &str = "docker";

/// The only subcommand forwarded to the runtime.
pub const SUBCOMMAND: &str = "run";

/// Symbolic root for the build workspace.
pub const WORKSPACE_ROOT: &str = "/workspace";

/// Indirection file holding the real workspace path.
pub const WORKSPACE_INDIRECTION: &str = "/helium/realpaths/workspace";

/// Symbolic root for the shared cache.
pub const CACHE_ROOT: &str = "/helium/cache";

/// Indirection file holding the real cache path.
pub const CACHE_INDIRECTION: &str = "/helium/realpaths/cache";

/// Validated launcher configuration.
///
/// Create using `LauncherConfig::builder()`, or `LauncherConfig::deployment()`
/// for the fixed production setup.
#[derive(Debug, Clone)]
pub struct LauncherConfig {
    /// Runtime binary (absolute).
    runtime: PathBuf,

    /// argv[0] for the runtime.
    arg0: String,

    /// Required first token.
    subcommand: String,

    /// Whitelisted flags.
    flag_rules: Vec<FlagRule>,

    /// Mountable roots, in priority order.
    mappings: Vec<PrefixMapping>,
}

impl LauncherConfig {
    /// Create a new configuration builder.
    pub fn builder() -> LauncherConfigBuilder {
        LauncherConfigBuilder::new()
    }

    /// The production configuration.
    ///
    /// Nothing here comes from the environment or the caller; the real host
    /// paths are read from the indirection files only when a mount needs them.
    pub fn deployment() -> Result<Self, Violation> {
        Self::builder()
            .runtime(RUNTIME_PATH)
            .arg0(RUNTIME_ARG0)
            .subcommand(SUBCOMMAND)
            .flag(FlagRule::switch("--rm"))
            .flag(FlagRule::switch("-it"))
            .flag(FlagRule::exact("--network", "none"))
            .flag(FlagRule::any("--hostname"))
            .flag(FlagRule::any("-e"))
            .flag(FlagRule::mount("-v"))
            .mapping(PrefixMapping::new(WORKSPACE_ROOT, WORKSPACE_INDIRECTION))
            .mapping(PrefixMapping::new(CACHE_ROOT, CACHE_INDIRECTION))
            .build()
    }

    /// Validate a request and prepare it for execution.
    ///
    /// This is the ONLY way to create a `PreparedLaunch`.
    ///
    /// # Errors
    ///
    /// Returns the first `Violation` found in the request.
    pub fn prepare(&self, request: LaunchRequest) -> Result<PreparedLaunch, Violation> {
        let scanner = ArgumentScanner {
            subcommand: &self.subcommand,
            rules: &self.flag_rules,
            mappings: &self.mappings,
        };

        let args = scanner.scan(request.argv).map_err(|v| {
            tracing::warn!(category = %v.category(), violation = %v, "request rejected");
            v
        })?;

        Ok(PreparedLaunch {
            runtime: self.runtime.clone(),
            arg0: self.arg0.clone(),
            args,
        })
    }

    /// Runtime binary path.
    pub fn runtime(&self) -> &Path {
        &self.runtime
    }

    /// Whitelisted flags.
    pub fn flag_rules(&self) -> &[FlagRule] {
        &self.flag_rules
    }

    /// Mountable roots in priority order.
    pub fn mappings(&self) -> &[PrefixMapping] {
        &self.mappings
    }
}

/// Builder for `LauncherConfig`.
#[derive(Debug, Clone)]
pub struct LauncherConfigBuilder {
    runtime: PathBuf,
    arg0: String,
    subcommand: String,
    flag_rules: Vec<FlagRule>,
    mappings: Vec<PrefixMapping>,
}

impl LauncherConfigBuilder {
    /// Create a builder with the production runtime and subcommand but no
    /// flags and no mountable roots.
    pub fn new() -> Self {
        Self {
            runtime: PathBuf::from(RUNTIME_PATH),
            arg0: RUNTIME_ARG0.to_string(),
            subcommand: SUBCOMMAND.to_string(),
            flag_rules: Vec::new(),
            mappings: Vec::new(),
        }
    }

    /// Set the runtime binary. Must be absolute.
    pub fn runtime(mut self, path: impl Into<PathBuf>) -> Self {
        self.runtime = path.into();
        self
    }

    /// Set argv[0] for the runtime.
    pub fn arg0(mut self, arg0: impl Into<String>) -> Self {
        self.arg0 = arg0.into();
        self
    }

    /// Set the required subcommand.
    pub fn subcommand(mut self, cmd: impl Into<String>) -> Self {
        self.subcommand = cmd.into();
        self
    }

    /// Whitelist a flag.
    pub fn flag(mut self, rule: FlagRule) -> Self {
        self.flag_rules.push(rule);
        self
    }

    /// Add a mountable root. Earlier mappings take priority.
    pub fn mapping(mut self, mapping: PrefixMapping) -> Self {
        self.mappings.push(mapping);
        self
    }

    /// Build the configuration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if:
    /// - the runtime path is not absolute
    /// - the subcommand is empty
    /// - a flag name is empty or listed twice
    /// - a root is not absolute, ends with `/`, or its indirection path is relative
    pub fn build(self) -> Result<LauncherConfig, Violation> {
        let invalid = |reason: String| Violation::InvalidConfig { reason };

        if !self.runtime.is_absolute() {
            return Err(invalid(format!(
                "runtime path must be absolute: {}",
                self.runtime.display()
            )));
        }

        if self.subcommand.is_empty() {
            return Err(invalid("subcommand must not be empty".to_string()));
        }

        let mut seen = HashSet::new();
        for rule in &self.flag_rules {
            if rule.name.is_empty() {
                return Err(invalid("flag name must not be empty".to_string()));
            }
            if !seen.insert(rule.name.as_str()) {
                return Err(invalid(format!("flag listed twice: {}", rule.name)));
            }
        }

        for mapping in &self.mappings {
            if !mapping.root.starts_with('/') || mapping.root.ends_with('/') {
                return Err(invalid(format!(
                    "mount root must be absolute without a trailing slash: {}",
                    mapping.root
                )));
            }
            if !mapping.indirection.is_absolute() {
                return Err(invalid(format!(
                    "indirection path must be absolute: {}",
                    mapping.indirection.display()
                )));
            }
        }

        Ok(LauncherConfig {
            runtime: self.runtime,
            arg0: self.arg0,
            subcommand: self.subcommand,
            flag_rules: self.flag_rules,
            mappings: self.mappings,
        })
    }
}

impl Default for LauncherConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
