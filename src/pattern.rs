//! Fixed grammars for image references and mount specs.
//!
//! Both patterns are compiled once per process and matched against the
//! whole token.

use crate::error::Violation;
use regex::Regex;
use std::sync::LazyLock;

const IMAGE_REFERENCE_PATTERN: &str = r"^helium-build/build-env:[a-z0-9-]+$";
const MOUNT_SPEC_PATTERN: &str = r"^[^:]+:[^:]+(:ro)?$";

static IMAGE_REFERENCE: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(IMAGE_REFERENCE_PATTERN));
static MOUNT_SPEC: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(MOUNT_SPEC_PATTERN));

/// One of the fixed token grammars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grammar {
    /// `helium-build/build-env:<tag>` where the tag is `[a-z0-9-]+`.
    ImageReference,
    /// `<local>:<host>` with an optional `:ro` suffix; neither path contains `:`.
    MountSpec,
}

impl Grammar {
    /// Short name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Grammar::ImageReference => "image reference",
            Grammar::MountSpec => "mount spec",
        }
    }

    /// The source pattern.
    pub fn pattern(self) -> &'static str {
        match self {
            Grammar::ImageReference => IMAGE_REFERENCE_PATTERN,
            Grammar::MountSpec => MOUNT_SPEC_PATTERN,
        }
    }

    fn compiled(self) -> Result<&'static Regex, Violation> {
        let compiled: &'static Result<Regex, regex::Error> = match self {
            Grammar::ImageReference => &*IMAGE_REFERENCE,
            Grammar::MountSpec => &*MOUNT_SPEC,
        };

        match compiled {
            Ok(re) => Ok(re),
            Err(e) => {
                tracing::error!(
                    grammar = self.name(),
                    pattern = self.pattern(),
                    error = %e,
                    "fixed pattern failed to compile"
                );
                Err(Violation::PatternCompile {
                    grammar: self.name(),
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Test `input` against the grammar.
    ///
    /// `Ok(false)` is a legitimate rejection; `Err` means the grammar itself is
    /// unusable and must not be treated as a rejection of the caller's input.
    pub fn matches(self, input: &str) -> Result<bool, Violation> {
        Ok(self.compiled()?.is_match(input))
    }
}
