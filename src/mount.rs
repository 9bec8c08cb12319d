//! Volume mount validation and rewriting.

use crate::error::Violation;
use crate::pattern::Grammar;
use crate::remap::PrefixMapping;
use std::ffi::{OsStr, OsString};

/// A parsed `<local>:<host>[:ro]` mount spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountSpec<'a> {
    /// Path on the launcher's side (the caller's symbolic view).
    pub local: &'a str,
    /// Path inside the container.
    pub host: &'a str,
    /// Whether the `:ro` marker was present.
    pub read_only: bool,
}

impl<'a> MountSpec<'a> {
    /// Parse a token that already matched [`Grammar::MountSpec`].
    ///
    /// Returns `None` for anything with other than two or three fields, or a
    /// third field other than `ro`.
    pub fn parse(spec: &'a str) -> Option<Self> {
        let mut fields = spec.split(':');
        let local = fields.next().filter(|s| !s.is_empty())?;
        let host = fields.next().filter(|s| !s.is_empty())?;
        let read_only = match fields.next() {
            None => false,
            Some("ro") => true,
            Some(_) => return None,
        };
        if fields.next().is_some() {
            return None;
        }

        Some(Self {
            local,
            host,
            read_only,
        })
    }

    /// Reassemble the spec with `local` replaced, keeping host and `:ro` verbatim.
    pub fn with_local(&self, local: OsString) -> OsString {
        let mut out = local;
        out.push(":");
        out.push(self.host);
        if self.read_only {
            out.push(":ro");
        }
        out
    }
}

/// Validate a raw `-v` value and rewrite its local path.
///
/// Mappings are tried in order; the first whose root matches wins and the
/// rest are not consulted, even if its indirection file cannot be read.
///
/// # Errors
///
/// - `MountGrammar` if the token is not `<local>:<host>[:ro]`
/// - `MountPrefix` if the local path is under no sanctioned root
/// - any indirection failure from the matching mapping
pub fn validate_mount(token: &OsStr, mappings: &[PrefixMapping]) -> Result<OsString, Violation> {
    let spec_str = token.to_str().ok_or_else(|| Violation::MountGrammar {
        spec: token.to_string_lossy().into_owned(),
    })?;

    let grammar_error = || Violation::MountGrammar {
        spec: spec_str.to_string(),
    };

    if !Grammar::MountSpec.matches(spec_str)? {
        tracing::warn!(spec = spec_str, "mount spec rejected by grammar");
        return Err(grammar_error());
    }
    let spec = MountSpec::parse(spec_str).ok_or_else(grammar_error)?;

    let mapping = mappings
        .iter()
        .find(|m| m.matches(spec.local))
        .ok_or_else(|| {
            tracing::warn!(spec = spec_str, "mount spec outside sanctioned roots");
            Violation::MountPrefix {
                spec: spec_str.to_string(),
            }
        })?;

    let local = mapping.remap(spec.local)?;
    let rewritten = spec.with_local(local);
    tracing::debug!(
        root = %mapping.root,
        original = spec_str,
        rewritten = %rewritten.to_string_lossy(),
        "mount spec remapped"
    );
    Ok(rewritten)
}
