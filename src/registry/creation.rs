//! Creation tracking: which names are currently under construction.

use std::collections::HashSet;

use super::SingletonRegistry;
use crate::error::{RegistryError, RegistryResult};

/// In-creation bookkeeping guarded by the singleton lock.
///
/// A name is marked by [`before_creation`](Self::before_creation) and
/// unmarked by [`after_creation`](Self::after_creation). Names in the
/// exclusion set skip both checks.
#[derive(Debug, Default)]
pub(crate) struct CreationTracker {
    in_creation: HashSet<String>,
    exclusions: HashSet<String>,
}

impl CreationTracker {
    pub(crate) fn before_creation(&mut self, name: &str) -> RegistryResult<()> {
        if !self.exclusions.contains(name) && !self.in_creation.insert(name.to_string()) {
            return Err(RegistryError::CreationCycle(name.to_string()));
        }
        Ok(())
    }

    /// Panics if `name` was never marked: a bracket mismatch is a caller bug.
    pub(crate) fn after_creation(&mut self, name: &str) {
        if !self.exclusions.contains(name) && !self.in_creation.remove(name) {
            panic!("instance '{}' isn't currently in creation", name);
        }
    }

    pub(crate) fn is_currently_in_creation(&self, name: &str) -> bool {
        !self.exclusions.contains(name) && self.in_creation.contains(name)
    }

    /// Raw membership, ignoring exclusions.
    pub(crate) fn is_actually_in_creation(&self, name: &str) -> bool {
        self.in_creation.contains(name)
    }

    pub(crate) fn set_excluded(&mut self, name: &str, excluded: bool) {
        if excluded {
            self.exclusions.insert(name.to_string());
        } else {
            self.exclusions.remove(name);
        }
    }
}

impl SingletonRegistry {
    /// Marks `name` as in creation.
    ///
    /// Fails with [`RegistryError::CreationCycle`] if it already is and is not
    /// excluded from in-creation checks.
    pub fn before_creation(&self, name: &str) -> RegistryResult<()> {
        self.lock_tiers().borrow_mut().tracker.before_creation(name)
    }

    /// Unmarks `name`.
    ///
    /// # Panics
    ///
    /// If `name` is not excluded and was not marked by [`before_creation`](Self::before_creation).
    pub fn after_creation(&self, name: &str) {
        self.lock_tiers().borrow_mut().tracker.after_creation(name)
    }

    /// True if `name` is in creation and not excluded from in-creation checks.
    pub fn is_currently_in_creation(&self, name: &str) -> bool {
        self.lock_tiers().borrow().tracker.is_currently_in_creation(name)
    }

    /// True if `name` is marked as in creation, regardless of exclusions.
    pub fn is_actually_in_creation(&self, name: &str) -> bool {
        self.lock_tiers().borrow().tracker.is_actually_in_creation(name)
    }

    /// Exempts `name` from (or re-subjects it to) the in-creation checks.
    pub fn set_excluded(&self, name: &str, excluded: bool) {
        self.lock_tiers().borrow_mut().tracker.set_excluded(name, excluded)
    }

    /// Inverse of [`set_excluded`](Self::set_excluded): `false` means repeated
    /// creation of `name` is expected and never flagged.
    pub fn set_currently_in_creation(&self, name: &str, in_creation: bool) {
        self.set_excluded(name, !in_creation)
    }
}
