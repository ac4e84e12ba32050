//! Registry configuration.
//!
//! Options can be built in code, read from environment variables, or (with the
//! `config` feature) deserialized from any serde format.

use std::env;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

/// Maximum number of suppressed errors kept per top-level creation.
pub const DEFAULT_SUPPRESSED_ERROR_LIMIT: usize = 100;

/// Default pre-allocated capacity of the finished-instance tier.
pub const DEFAULT_INITIAL_CAPACITY: usize = 256;

const ENV_SUPPRESSED_LIMIT: &str = "FERROUS_LIFECYCLE_SUPPRESSED_LIMIT";
const ENV_INITIAL_CAPACITY: &str = "FERROUS_LIFECYCLE_INITIAL_CAPACITY";
const ENV_ALLOW_ALIAS_OVERRIDING: &str = "FERROUS_LIFECYCLE_ALLOW_ALIAS_OVERRIDING";

/// Tunables for a [`SingletonRegistry`](crate::SingletonRegistry).
///
/// # Examples
///
/// ```
/// use ferrous_lifecycle::{RegistryOptions, SingletonRegistry};
///
/// let options = RegistryOptions::default().with_suppressed_error_limit(10);
/// let registry = SingletonRegistry::builder().options(options).build();
/// assert_eq!(registry.options().suppressed_error_limit, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct RegistryOptions {
    /// Cap on errors recorded through `on_suppressed_error`; newer ones are dropped.
    pub suppressed_error_limit: usize,
    /// Initial capacity of the finished-instance tier.
    pub initial_capacity: usize,
    /// Whether the default alias registry lets an alias be re-pointed.
    pub allow_alias_overriding: bool,
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self {
            suppressed_error_limit: DEFAULT_SUPPRESSED_ERROR_LIMIT,
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            allow_alias_overriding: true,
        }
    }
}

impl RegistryOptions {
    /// Reads options from `FERROUS_LIFECYCLE_*` environment variables.
    ///
    /// Missing or unparsable variables keep their default value; unparsable
    /// ones are reported with a warning.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            suppressed_error_limit: env_value(ENV_SUPPRESSED_LIMIT)
                .unwrap_or(defaults.suppressed_error_limit),
            initial_capacity: env_value(ENV_INITIAL_CAPACITY).unwrap_or(defaults.initial_capacity),
            allow_alias_overriding: env_value(ENV_ALLOW_ALIAS_OVERRIDING)
                .unwrap_or(defaults.allow_alias_overriding),
        }
    }

    pub fn with_suppressed_error_limit(mut self, limit: usize) -> Self {
        self.suppressed_error_limit = limit;
        self
    }

    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    pub fn with_alias_overriding(mut self, allow: bool) -> Self {
        self.allow_alias_overriding = allow;
        self
    }
}

fn env_value<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring unparsable registry option");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let options = RegistryOptions::default();
        assert_eq!(options.suppressed_error_limit, 100);
        assert_eq!(options.initial_capacity, 256);
        assert!(options.allow_alias_overriding);
    }

    #[test]
    fn builder_methods_override_fields() {
        let options = RegistryOptions::default()
            .with_suppressed_error_limit(5)
            .with_initial_capacity(8)
            .with_alias_overriding(false);
        assert_eq!(options.suppressed_error_limit, 5);
        assert_eq!(options.initial_capacity, 8);
        assert!(!options.allow_alias_overriding);
    }
}
