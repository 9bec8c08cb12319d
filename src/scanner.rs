//! Whitelist scan over the caller's argument list.
//!
//! The grammar is closed: subcommand, then whitelisted flags, then an image
//! reference. Everything after the image reference is the in-container
//! command line and is forwarded untouched.

use crate::error::Violation;
use crate::flag_rules::{find_rule, FlagRule, FlagValue};
use crate::mount::validate_mount;
use crate::pattern::Grammar;
use crate::remap::PrefixMapping;
use std::ffi::{OsStr, OsString};

/// Scans one request against a fixed set of rules.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ArgumentScanner<'c> {
    pub(crate) subcommand: &'c str,
    pub(crate) rules: &'c [FlagRule],
    pub(crate) mappings: &'c [PrefixMapping],
}

impl ArgumentScanner<'_> {
    /// Validate `argv` and return the tokens to forward, in order.
    ///
    /// The first invalid token aborts the scan; nothing partial is returned.
    pub(crate) fn scan(&self, argv: Vec<OsString>) -> Result<Vec<OsString>, Violation> {
        let mut forwarded = Vec::with_capacity(argv.len());
        let mut tokens = argv.into_iter().enumerate();

        match tokens.next() {
            Some((_, first)) if first.as_os_str() == OsStr::new(self.subcommand) => {
                forwarded.push(first);
            }
            other => {
                let got = other.map(|(_, t)| t.to_string_lossy().into_owned());
                tracing::warn!(expected = self.subcommand, got = ?got, "subcommand rejected");
                return Err(Violation::SubcommandMismatch {
                    expected: self.subcommand.to_string(),
                    got,
                });
            }
        }

        while let Some((index, token)) = tokens.next() {
            let Some(text) = token.to_str() else {
                tracing::warn!(index, "non-UTF-8 argument before image reference");
                return Err(Violation::NonUtf8Argument { index });
            };

            if let Some(rule) = find_rule(self.rules, text) {
                forwarded.push(token);

                if rule.arity() == 0 {
                    tracing::debug!(flag = %rule.name, "flag accepted");
                    continue;
                }

                let Some((_, value)) = tokens.next() else {
                    tracing::warn!(flag = %rule.name, "flag value missing");
                    return Err(Violation::MissingValue {
                        flag: rule.name.clone(),
                    });
                };
                forwarded.push(self.check_value(rule, value)?);
                continue;
            }

            if Grammar::ImageReference.matches(text)? {
                tracing::debug!(image = text, index, "image reference found");
                forwarded.push(token);
                forwarded.extend(tokens.by_ref().map(|(_, t)| t));
                return Ok(forwarded);
            }

            tracing::warn!(arg = text, index, "unknown argument");
            return Err(Violation::UnknownArgument {
                arg: text.to_string(),
            });
        }

        tracing::warn!("no image reference in request");
        Err(Violation::ImageNotSpecified)
    }

    fn check_value(&self, rule: &FlagRule, value: OsString) -> Result<OsString, Violation> {
        match &rule.value {
            FlagValue::Exact(expected) => {
                if value.as_os_str() == OsStr::new(expected) {
                    tracing::debug!(flag = %rule.name, "flag accepted");
                    Ok(value)
                } else {
                    tracing::warn!(flag = %rule.name, "flag value not allowed");
                    Err(Violation::ValueNotAllowed {
                        flag: rule.name.clone(),
                        expected: expected.clone(),
                        got: value.to_string_lossy().into_owned(),
                    })
                }
            }
            FlagValue::Any => {
                tracing::debug!(flag = %rule.name, "flag accepted");
                Ok(value)
            }
            FlagValue::Mount => validate_mount(&value, self.mappings),
            FlagValue::None => Ok(value),
        }
    }
}
