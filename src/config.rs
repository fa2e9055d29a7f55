//! Factory configuration.
//!
//! Options are fixed when a [`Factory`](crate::Factory) is created. They can be
//! built in code, read from the environment, or (with the `config` feature)
//! deserialized from any serde format.

use std::env;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

/// Default cap on nested resolutions per thread.
pub const DEFAULT_MAX_DEPTH: usize = 1024;

/// Environment prefix used by [`FactoryOptions::from_env`].
pub const ENV_PREFIX: &str = "FERROUS_IOC";

/// Behavioural switches for a factory.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{Factory, FactoryOptions};
///
/// let options = FactoryOptions::new()
///     .strict_injection(true)
///     .max_depth(64);
///
/// let factory = Factory::with_options(options);
/// assert!(factory.options().strict_injection);
/// assert_eq!(factory.options().max_depth, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct FactoryOptions {
    /// Fail with [`DiError::Unresolvable`](crate::DiError::Unresolvable) when a
    /// constructor parameter cannot be injected, instead of retrying the
    /// activation with zero arguments.
    pub strict_injection: bool,
    /// Maximum number of nested resolutions on one thread.
    pub max_depth: usize,
}

impl Default for FactoryOptions {
    fn default() -> Self {
        Self {
            strict_injection: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl FactoryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strict_injection(mut self, strict: bool) -> Self {
        self.strict_injection = strict;
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Reads `FERROUS_IOC_STRICT_INJECTION` and `FERROUS_IOC_MAX_DEPTH`.
    ///
    /// Missing variables keep their defaults; unparsable ones are logged and
    /// ignored.
    pub fn from_env() -> Self {
        Self::from_env_with_prefix(ENV_PREFIX)
    }

    /// Like [`from_env`](Self::from_env) with a custom variable prefix.
    pub fn from_env_with_prefix(prefix: &str) -> Self {
        let mut options = Self::default();
        let prefix = prefix.to_uppercase();

        let name = format!("{}_STRICT_INJECTION", prefix);
        if let Ok(raw) = env::var(&name) {
            match parse_bool(&raw) {
                Some(value) => options.strict_injection = value,
                None => tracing::warn!(variable = %name, value = %raw, "ignoring invalid boolean"),
            }
        }

        let name = format!("{}_MAX_DEPTH", prefix);
        if let Ok(raw) = env::var(&name) {
            match raw.trim().parse::<usize>() {
                Ok(value) if value > 0 => options.max_depth = value,
                _ => tracing::warn!(variable = %name, value = %raw, "ignoring invalid depth"),
            }
        }

        options
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
