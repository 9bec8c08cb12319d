//! Whitelisted flags and their value rules.
//!
//! Every flag the launcher forwards MUST have a `FlagRule`.
//! There is no "allow any flag" mode.

/// What a flag requires from the token that follows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagValue {
    /// The flag takes no value and is forwarded as-is.
    None,

    /// The next token must equal this literal exactly.
    Exact(String),

    /// The next token must exist; its content is not inspected.
    Any,

    /// The next token is a mount spec, validated and rewritten.
    Mount,
}

/// A permitted flag.
///
/// Flags are matched exactly: `--network=none` is not `--network none`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagRule {
    /// Flag name as it appears on the command line.
    pub name: String,

    /// Value requirement.
    pub value: FlagValue,
}

impl FlagRule {
    /// A flag with no value.
    pub fn switch(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: FlagValue::None,
        }
    }

    /// A flag whose value must be exactly `value`.
    pub fn exact(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: FlagValue::Exact(value.into()),
        }
    }

    /// A flag taking any value.
    pub fn any(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: FlagValue::Any,
        }
    }

    /// A flag taking a mount spec.
    pub fn mount(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: FlagValue::Mount,
        }
    }

    /// Number of trailing tokens consumed (0 or 1).
    pub fn arity(&self) -> usize {
        match self.value {
            FlagValue::None => 0,
            FlagValue::Exact(_) | FlagValue::Any | FlagValue::Mount => 1,
        }
    }
}

/// Find the rule for `token`, if it is a whitelisted flag.
pub(crate) fn find_rule<'r>(rules: &'r [FlagRule], token: &str) -> Option<&'r FlagRule> {
    rules.iter().find(|r| r.name == token)
}
