//! In-memory alias registry.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::config::RegistryOptions;
use crate::error::{RegistryError, RegistryResult};
use crate::traits::AliasResolver;

/// Simple alias table mapping alias -> name.
///
/// Aliases may chain (`a -> b -> c`); [`canonical_name`](AliasResolver::canonical_name)
/// follows the chain to its end. Registrations that would close a chain into a
/// loop are rejected, so resolution always terminates.
///
/// # Examples
///
/// ```
/// use ferrous_lifecycle::{AliasResolver, SimpleAliasRegistry};
///
/// let aliases = SimpleAliasRegistry::new();
/// aliases.register_alias("dataSource", "primaryDb").unwrap();
/// aliases.register_alias("primaryDb", "db").unwrap();
///
/// assert_eq!(aliases.canonical_name("db"), "dataSource");
/// assert!(aliases.register_alias("db", "dataSource").is_err());
/// ```
#[derive(Debug)]
pub struct SimpleAliasRegistry {
    alias_map: RwLock<HashMap<String, String>>,
    allow_overriding: bool,
}

impl SimpleAliasRegistry {
    /// Creates an empty registry that allows alias overriding.
    pub fn new() -> Self {
        Self::with_overriding(true)
    }

    /// Creates an empty registry with the given overriding policy.
    pub fn with_overriding(allow_overriding: bool) -> Self {
        Self {
            alias_map: RwLock::new(HashMap::new()),
            allow_overriding,
        }
    }

    /// Creates an empty registry following `options.allow_alias_overriding`.
    pub fn from_options(options: &RegistryOptions) -> Self {
        Self::with_overriding(options.allow_alias_overriding)
    }

    /// Whether an alias may be re-pointed at a different name.
    pub fn allows_overriding(&self) -> bool {
        self.allow_overriding
    }

    /// Registers `alias` for `name`.
    ///
    /// Registering a name as its own alias removes any existing alias of that
    /// spelling. Re-registering an identical alias is a no-op.
    pub fn register_alias(&self, name: &str, alias: &str) -> RegistryResult<()> {
        let mut map = self.alias_map.write();
        if alias == name {
            map.remove(alias);
            tracing::debug!(alias, "alias ignored since it points to the same name");
            return Ok(());
        }
        if let Some(existing) = map.get(alias) {
            if existing == name {
                return Ok(());
            }
            if !self.allow_overriding {
                return Err(RegistryError::AliasOverride {
                    name: name.to_string(),
                    alias: alias.to_string(),
                    existing: existing.clone(),
                });
            }
            tracing::debug!(alias, old = %existing, new = name, "overriding alias definition");
        }
        if resolves_to(&map, name, alias) {
            return Err(RegistryError::AliasCycle {
                name: name.to_string(),
                alias: alias.to_string(),
            });
        }
        map.insert(alias.to_string(), name.to_string());
        tracing::trace!(alias, name, "alias registered");
        Ok(())
    }

    /// Removes a registered alias.
    pub fn remove_alias(&self, alias: &str) -> RegistryResult<()> {
        match self.alias_map.write().remove(alias) {
            Some(_) => Ok(()),
            None => Err(RegistryError::AliasNotFound(alias.to_string())),
        }
    }

    /// Returns true if `name` is registered as an alias.
    pub fn is_alias(&self, name: &str) -> bool {
        self.alias_map.read().contains_key(name)
    }

    /// Returns every alias that resolves to `name`, directly or through other aliases.
    pub fn aliases(&self, name: &str) -> Vec<String> {
        let map = self.alias_map.read();
        let mut result = Vec::new();
        collect_aliases(&map, name, &mut result);
        result
    }
}

impl Default for SimpleAliasRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl AliasResolver for SimpleAliasRegistry {
    fn canonical_name(&self, name: &str) -> String {
        let map = self.alias_map.read();
        let mut canonical = name;
        while let Some(resolved) = map.get(canonical) {
            canonical = resolved.as_str();
        }
        canonical.to_string()
    }
}

/// True if `name` already resolves to `alias` through the alias chain.
fn resolves_to(map: &HashMap<String, String>, name: &str, alias: &str) -> bool {
    let mut current = name;
    while let Some(next) = map.get(current) {
        if next == alias {
            return true;
        }
        current = next.as_str();
    }
    false
}

fn collect_aliases(map: &HashMap<String, String>, name: &str, result: &mut Vec<String>) {
    for (alias, registered) in map.iter() {
        if registered == name && !result.contains(alias) {
            result.push(alias.clone());
            collect_aliases(map, alias, result);
        }
    }
}
