//! Compile options.
//!
//! [`CompileOptions`] controls the two behaviors that are a matter of policy
//! rather than grammar: how `?d` / `?f` treat arguments that are not
//! cleanly numeric, and whether `?#` identifiers are checked before quoting.

use std::env;

/// Environment variable selecting the [`NumericMode`] (`loose` or `strict`).
pub const ENV_NUMERIC_MODE: &str = "SQLWEAVE_NUMERIC_MODE";

/// Environment variable toggling identifier checks (`true` or `false`).
pub const ENV_CHECK_IDENTIFIERS: &str = "SQLWEAVE_CHECK_IDENTIFIERS";

/// How `?d` and `?f` coerce their arguments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NumericMode {
    /// Parse the longest numeric prefix of a string and fall back to zero.
    /// Booleans become `1` / `0`; a float bound to `?d` is truncated.
    #[default]
    Loose,
    /// The whole string (after trimming) must parse, and a float bound to
    /// `?d` must have no fractional part. Anything else is
    /// [`crate::CompileError::InvalidNumber`].
    Strict,
}

impl NumericMode {
    /// Parses `loose` / `strict`, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "loose" => Some(NumericMode::Loose),
            "strict" => Some(NumericMode::Strict),
            _ => None,
        }
    }
}

/// Options applied uniformly to every placeholder of a compile call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
    /// Numeric coercion policy for `?d` and `?f`.
    pub numeric: NumericMode,

    /// Reject identifiers that are empty or contain a backtick or a
    /// control character.
    pub check_identifiers: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            numeric: NumericMode::Loose,
            check_identifiers: true,
        }
    }
}

impl CompileOptions {
    /// Loads options from the environment, falling back to the defaults for
    /// unset or unparsable variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        CompileOptions {
            numeric: lookup(ENV_NUMERIC_MODE)
                .and_then(|v| NumericMode::parse(&v))
                .unwrap_or(defaults.numeric),

            check_identifiers: lookup(ENV_CHECK_IDENTIFIERS)
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.check_identifiers),
        }
    }

    pub fn with_numeric(mut self, numeric: NumericMode) -> Self {
        self.numeric = numeric;
        self
    }

    pub fn with_identifier_check(mut self, enabled: bool) -> Self {
        self.check_identifiers = enabled;
        self
    }
}
