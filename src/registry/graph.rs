//! Dependency and containment edges between managed instances.

use std::collections::{HashMap, HashSet};

use indexmap::IndexSet;
use parking_lot::Mutex;

use super::SingletonRegistry;
use crate::traits::AliasResolver;

type EdgeMap = HashMap<String, IndexSet<String>>;

/// Edge indices used to order teardown.
///
/// Each map has its own lock; none of them is ever held while calling back
/// into the registry, and at most one of them is held at a time.
#[derive(Debug, Default)]
pub(crate) struct DependencyGraph {
    /// containing name -> names it contains
    contained: Mutex<EdgeMap>,
    /// dependency name -> names that depend on it
    dependents: Mutex<EdgeMap>,
    /// dependent name -> names it depends on
    dependencies: Mutex<EdgeMap>,
}

impl DependencyGraph {
    /// Records containment; returns false if the pair was already known.
    pub(crate) fn register_contained(&self, contained: &str, containing: &str) -> bool {
        self.contained
            .lock()
            .entry(containing.to_string())
            .or_default()
            .insert(contained.to_string())
    }

    /// Records `dependent -> dependency`; `dependency` must already be canonical.
    pub(crate) fn register_dependent(&self, dependency: &str, dependent: &str) {
        {
            let mut dependents = self.dependents.lock();
            let set = dependents.entry(dependency.to_string()).or_default();
            if !set.insert(dependent.to_string()) {
                return;
            }
        }
        self.dependencies
            .lock()
            .entry(dependent.to_string())
            .or_default()
            .insert(dependency.to_string());
    }

    pub(crate) fn is_dependent(&self, name: &str, dependent: &str, aliases: &dyn AliasResolver) -> bool {
        let dependents = self.dependents.lock();
        let mut seen = HashSet::new();
        is_dependent_from(&dependents, name, dependent, aliases, &mut seen)
    }

    pub(crate) fn has_dependents(&self, name: &str) -> bool {
        self.dependents.lock().contains_key(name)
    }

    pub(crate) fn dependents_of(&self, name: &str) -> Vec<String> {
        snapshot(&self.dependents.lock(), name)
    }

    pub(crate) fn dependencies_of(&self, name: &str) -> Vec<String> {
        snapshot(&self.dependencies.lock(), name)
    }

    /// Detaches the dependents of `name` so they can be destroyed without the lock.
    pub(crate) fn take_dependents(&self, name: &str) -> Option<IndexSet<String>> {
        self.dependents.lock().remove(name)
    }

    pub(crate) fn take_contained(&self, name: &str) -> Option<IndexSet<String>> {
        self.contained.lock().remove(name)
    }

    /// Drops `name` from every dependent set and forgets its own dependencies.
    pub(crate) fn scrub(&self, name: &str) {
        self.dependents.lock().retain(|_, set| {
            set.shift_remove(name);
            !set.is_empty()
        });
        self.dependencies.lock().remove(name);
    }

    pub(crate) fn clear(&self) {
        self.contained.lock().clear();
        self.dependents.lock().clear();
        self.dependencies.lock().clear();
    }
}

impl SingletonRegistry {
    /// Records that `containing` owns `contained`.
    ///
    /// `containing` also becomes a dependent of `contained`, so destroying the
    /// contained instance first tears down its owner; destroying the owner
    /// tears down everything it contains afterwards. Duplicate registrations
    /// are ignored.
    pub fn register_contained(&self, contained: &str, containing: &str) {
        if self.graph.register_contained(contained, containing) {
            self.register_dependent(contained, containing);
        }
    }

    /// Records that `dependent` requires `dependency`.
    ///
    /// `dependency` is canonicalized through the alias resolver first.
    /// Registering the same edge twice is a no-op.
    pub fn register_dependent(&self, dependency: &str, dependent: &str) {
        let canonical = self.aliases.canonical_name(dependency);
        self.graph.register_dependent(&canonical, dependent);
    }

    /// True if `dependent` depends on `name`, directly or through any chain of edges.
    ///
    /// Terminates on graphs that already contain cycles.
    ///
    /// ```
    /// use ferrous_lifecycle::SingletonRegistry;
    ///
    /// let registry = SingletonRegistry::new();
    /// registry.register_dependent("x", "y");
    /// registry.register_dependent("y", "z");
    ///
    /// assert!(registry.is_dependent("x", "z"));
    /// assert!(!registry.is_dependent("z", "x"));
    /// ```
    pub fn is_dependent(&self, name: &str, dependent: &str) -> bool {
        self.graph.is_dependent(name, dependent, self.aliases.as_ref())
    }

    pub fn has_dependents(&self, name: &str) -> bool {
        self.graph.has_dependents(name)
    }

    /// Names that depend on `name`, in registration order.
    pub fn dependents_of(&self, name: &str) -> Vec<String> {
        self.graph.dependents_of(name)
    }

    /// Names that `name` depends on, in registration order.
    pub fn dependencies_of(&self, name: &str) -> Vec<String> {
        self.graph.dependencies_of(name)
    }
}

fn snapshot(map: &EdgeMap, name: &str) -> Vec<String> {
    map.get(name)
        .map(|set| set.iter().cloned().collect())
        .unwrap_or_default()
}

/// Depth-first walk over the reverse index. `seen` holds names whose
/// dependents were already expanded, so existing cycles cannot loop forever.
fn is_dependent_from(
    dependents: &EdgeMap,
    name: &str,
    candidate: &str,
    aliases: &dyn AliasResolver,
    seen: &mut HashSet<String>,
) -> bool {
    if seen.contains(name) {
        return false;
    }
    let canonical = aliases.canonical_name(name);
    let Some(direct) = dependents.get(&canonical) else {
        return false;
    };
    if direct.contains(candidate) {
        return true;
    }
    seen.insert(name.to_string());
    direct
        .iter()
        .any(|transitive| is_dependent_from(dependents, transitive, candidate, aliases, seen))
}
