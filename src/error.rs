//! Error types for docker-launcher.
//!
//! This module defines two main error categories:
//! - [`Violation`]: Rejections detected during `prepare()` - nothing is forwarded
//! - [`ExecError`]: Failure to replace the process image with the container runtime

use std::path::PathBuf;
use thiserror::Error;

/// Broad class of a [`Violation`], used for structured logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationCategory {
    /// The caller's argument list does not follow the fixed grammar.
    MalformedInvocation,
    /// A mount spec is malformed or names a path outside the sanctioned roots.
    MountPolicy,
    /// A trusted indirection file is missing or unreadable (deployment problem).
    Indirection,
    /// The launcher itself is broken (bad pattern or bad configuration).
    Internal,
}

impl std::fmt::Display for ViolationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViolationCategory::MalformedInvocation => write!(f, "malformed-invocation"),
            ViolationCategory::MountPolicy => write!(f, "mount-policy"),
            ViolationCategory::Indirection => write!(f, "indirection"),
            ViolationCategory::Internal => write!(f, "internal"),
        }
    }
}

/// Rejection detected while validating a launch request.
///
/// Any violation aborts the whole request; the runtime is never invoked.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Violation {
    // Invocation errors
    /// First argument is not the required subcommand
    #[error("subcommand mismatch: expected {expected}, got {got:?}")]
    SubcommandMismatch {
        expected: String,
        got: Option<String>,
    },

    /// Token is neither a whitelisted flag nor an image reference
    #[error("Unknown argument {arg}.")]
    UnknownArgument { arg: String },

    /// Flag requires a value but none followed it
    #[error("Argument {flag} must have a value.")]
    MissingValue { flag: String },

    /// Flag value is not the single accepted literal
    #[error("Argument {flag} must have the value {expected}, got {got:?}.")]
    ValueNotAllowed {
        flag: String,
        expected: String,
        got: String,
    },

    /// Token before the image reference is not valid UTF-8
    #[error("argument {index} is not valid UTF-8")]
    NonUtf8Argument { index: usize },

    /// Scan reached the end of input without an image reference
    #[error("Docker image not specified.")]
    ImageNotSpecified,

    // Mount errors
    /// Mount spec does not match `<local>:<host>[:ro]`
    #[error("Mount spec {spec} did not pass regular expression")]
    MountGrammar { spec: String },

    /// Mount spec local path is outside every sanctioned root
    #[error("Mount spec {spec} did not begin with correct prefix.")]
    MountPrefix { spec: String },

    // Indirection file errors
    /// Indirection file could not be opened
    #[error("could not open indirection file {path}: {reason}")]
    IndirectionOpen { path: PathBuf, reason: String },

    /// Indirection file length could not be determined
    #[error("could not get length of indirection file {path}: {reason}")]
    IndirectionSize { path: PathBuf, reason: String },

    /// Indirection file could not be read
    #[error("could not read indirection file {path}: {reason}")]
    IndirectionRead { path: PathBuf, reason: String },

    // Internal errors
    /// A fixed grammar failed to compile
    #[error("pattern for {grammar} failed to compile: {reason}")]
    PatternCompile {
        grammar: &'static str,
        reason: String,
    },

    /// Launcher configuration is inconsistent
    #[error("invalid launcher configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl Violation {
    /// Classify the violation.
    pub fn category(&self) -> ViolationCategory {
        match self {
            Violation::SubcommandMismatch { .. }
            | Violation::UnknownArgument { .. }
            | Violation::MissingValue { .. }
            | Violation::ValueNotAllowed { .. }
            | Violation::NonUtf8Argument { .. }
            | Violation::ImageNotSpecified => ViolationCategory::MalformedInvocation,
            Violation::MountGrammar { .. } | Violation::MountPrefix { .. } => {
                ViolationCategory::MountPolicy
            }
            Violation::IndirectionOpen { .. }
            | Violation::IndirectionSize { .. }
            | Violation::IndirectionRead { .. } => ViolationCategory::Indirection,
            Violation::PatternCompile { .. } | Violation::InvalidConfig { .. } => {
                ViolationCategory::Internal
            }
        }
    }

    /// Whether the generic "Invalid Docker Arguments" trailer follows the message.
    ///
    /// A missing image is reported on its own.
    pub fn is_invalid_arguments(&self) -> bool {
        !matches!(
            self,
            Violation::ImageNotSpecified | Violation::InvalidConfig { .. }
        )
    }
}

/// Failure to replace the current process with the container runtime.
#[derive(Debug, Error)]
pub enum ExecError {
    /// `execv` returned; the OS error explains why
    #[error("Could not execute docker: {source}")]
    ExecFailed {
        runtime: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Combined error type for the prepare-and-exec flow.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error(transparent)]
    Violation(#[from] Violation),

    #[error(transparent)]
    Exec(#[from] ExecError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_match_launcher_diagnostics() {
        assert_eq!(
            Violation::MissingValue {
                flag: "-v".to_string()
            }
            .to_string(),
            "Argument -v must have a value."
        );
        assert_eq!(
            Violation::ImageNotSpecified.to_string(),
            "Docker image not specified."
        );
        assert_eq!(
            Violation::MountPrefix {
                spec: "/etc:/data".to_string()
            }
            .to_string(),
            "Mount spec /etc:/data did not begin with correct prefix."
        );
    }

    #[test]
    fn test_categories() {
        assert_eq!(
            Violation::ImageNotSpecified.category(),
            ViolationCategory::MalformedInvocation
        );
        assert_eq!(
            Violation::MountGrammar {
                spec: "x".to_string()
            }
            .category(),
            ViolationCategory::MountPolicy
        );
        assert_eq!(
            Violation::IndirectionOpen {
                path: PathBuf::from("/missing"),
                reason: "gone".to_string()
            }
            .category(),
            ViolationCategory::Indirection
        );
    }

    #[test]
    fn test_missing_image_has_no_generic_trailer() {
        assert!(!Violation::ImageNotSpecified.is_invalid_arguments());
        assert!(Violation::UnknownArgument {
            arg: "--privileged".to_string()
        }
        .is_invalid_arguments());
    }

    #[test]
    fn test_exec_error_carries_os_error() {
        let err = ExecError::ExecFailed {
            runtime: PathBuf::from("/usr/bin/docker"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(err.to_string().starts_with("Could not execute docker: "));

        let launch: LaunchError = err.into();
        assert!(matches!(launch, LaunchError::Exec(_)));
    }
}
