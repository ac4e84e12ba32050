//! Tiered instance cache: finished instances, early references, pending factories.

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use indexmap::IndexSet;

use super::creation::CreationTracker;
use super::SingletonRegistry;
use crate::error::{BoxError, RegistryError, RegistryResult};
use crate::instance::{EarlyFactory, FactoryResult, Instance};

/// State guarded by the singleton lock.
pub(crate) struct InstanceTiers {
    /// name -> fully created instance
    finished: HashMap<String, Instance>,
    /// name -> instance exposed before its creation completed
    early: HashMap<String, Instance>,
    /// name -> producer of the early reference
    factories: HashMap<String, EarlyFactory>,
    /// every name with a finished instance or a pending factory, in registration order
    registered: IndexSet<String>,
    pub(crate) tracker: CreationTracker,
    /// `Some` while a top-level creation is recording suppressed errors
    suppressed: Option<Vec<BoxError>>,
    pub(crate) in_destruction: bool,
}

impl InstanceTiers {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            finished: HashMap::with_capacity(capacity),
            early: HashMap::new(),
            factories: HashMap::new(),
            registered: IndexSet::with_capacity(capacity),
            tracker: CreationTracker::default(),
            suppressed: None,
            in_destruction: false,
        }
    }

    fn add_singleton(&mut self, name: &str, instance: Instance) {
        self.finished.insert(name.to_string(), instance);
        self.factories.remove(name);
        self.early.remove(name);
        self.registered.insert(name.to_string());
    }

    fn remove(&mut self, name: &str) {
        self.finished.remove(name);
        self.factories.remove(name);
        self.early.remove(name);
        self.registered.shift_remove(name);
    }

    pub(crate) fn clear(&mut self) {
        self.finished.clear();
        self.factories.clear();
        self.early.clear();
        self.registered.clear();
        self.in_destruction = false;
    }
}

impl SingletonRegistry {
    /// Registers a finished instance under `name`.
    ///
    /// Fails with [`RegistryError::AlreadyRegistered`] if `name` already has a
    /// finished instance; the existing instance is kept.
    pub fn register_singleton(&self, name: &str, instance: Instance) -> RegistryResult<()> {
        let guard = self.lock_tiers();
        let mut tiers = guard.borrow_mut();
        if tiers.finished.contains_key(name) {
            return Err(RegistryError::AlreadyRegistered(name.to_string()));
        }
        tiers.add_singleton(name, instance);
        Ok(())
    }

    /// Stores a producer for the early reference of `name`.
    ///
    /// Ignored if `name` already has a finished instance. Replaces any early
    /// reference already published for `name`.
    pub fn add_singleton_factory<F>(&self, name: &str, factory: F)
    where
        F: FnOnce() -> Instance + Send + 'static,
    {
        let guard = self.lock_tiers();
        let mut tiers = guard.borrow_mut();
        if tiers.finished.contains_key(name) {
            return;
        }
        tiers.factories.insert(name.to_string(), Box::new(factory));
        tiers.early.remove(name);
        tiers.registered.insert(name.to_string());
    }

    /// Returns the instance for `name`, allowing early references.
    pub fn get_singleton(&self, name: &str) -> Option<Instance> {
        self.get_singleton_with(name, true)
    }

    /// Returns the finished instance for `name`, or its early reference if
    /// `name` is currently in creation.
    ///
    /// With `allow_early_reference`, a pending factory is invoked (once) to
    /// publish the early reference. Names that are neither finished nor in
    /// creation yield `None` without side effects.
    pub fn get_singleton_with(&self, name: &str, allow_early_reference: bool) -> Option<Instance> {
        let guard = self.lock_tiers();
        {
            let tiers = guard.borrow();
            if let Some(found) = tiers.finished.get(name) {
                return Some(found.clone());
            }
            if !tiers.tracker.is_actually_in_creation(name) {
                return None;
            }
            if let Some(early) = tiers.early.get(name) {
                return Some(early.clone());
            }
            if !allow_early_reference {
                return None;
            }
        }
        // Removed before the call so a re-entrant lookup cannot run it twice.
        let factory = guard.borrow_mut().factories.remove(name)?;
        let early = factory();
        let mut tiers = guard.borrow_mut();
        if let Some(found) = tiers.finished.get(name) {
            return Some(found.clone());
        }
        tiers.early.insert(name.to_string(), early.clone());
        Some(early)
    }

    /// Returns the finished instance for `name`, creating it with `factory` if absent.
    ///
    /// The factory runs under the singleton lock, bracketed by the creation
    /// tracker, and is invoked at most once per call. If the factory itself
    /// registers a finished instance under `name`, that instance is kept and
    /// returned in place of the factory's value. Fails with
    /// [`RegistryError::CreationNotAllowed`] during teardown and with
    /// [`RegistryError::CreationCycle`] if `name` is already being created.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferrous_lifecycle::{instance, RegistryError, SingletonRegistry};
    ///
    /// let registry = SingletonRegistry::new();
    /// let err = registry
    ///     .get_or_create("broken", || Err("connection refused".into()))
    ///     .unwrap_err();
    /// assert!(matches!(err, RegistryError::CreationFailed { .. }));
    /// assert!(!registry.contains_singleton("broken"));
    /// ```
    pub fn get_or_create<F>(&self, name: &str, factory: F) -> RegistryResult<Instance>
    where
        F: FnOnce() -> FactoryResult,
    {
        let guard = self.lock_tiers();
        let recording = {
            let mut tiers = guard.borrow_mut();
            if let Some(found) = tiers.finished.get(name) {
                return Ok(found.clone());
            }
            if tiers.in_destruction {
                return Err(RegistryError::CreationNotAllowed(name.to_string()));
            }
            tracing::debug!(name, "creating shared instance");
            tiers.tracker.before_creation(name)?;
            let recording = tiers.suppressed.is_none();
            if recording {
                tiers.suppressed = Some(Vec::new());
            }
            recording
        };

        self.observers.creating(name);
        let started = Instant::now();
        let outcome = panic::catch_unwind(AssertUnwindSafe(factory));

        let related = {
            let mut tiers = guard.borrow_mut();
            let related = if recording {
                tiers.suppressed.take().unwrap_or_default()
            } else {
                Vec::new()
            };
            tiers.tracker.after_creation(name);
            // A failed creation never promotes its early reference.
            if !matches!(outcome, Ok(Ok(_))) && !tiers.finished.contains_key(name) {
                tiers.remove(name);
            }
            related
        };

        let result = match outcome {
            Ok(result) => result,
            Err(payload) => panic::resume_unwind(payload),
        };

        match result {
            Ok(created) => {
                let finished = {
                    let mut tiers = guard.borrow_mut();
                    match tiers.finished.get(name) {
                        // Registered by the factory itself; the first finished instance wins.
                        Some(existing) => existing.clone(),
                        None => {
                            tiers.add_singleton(name, created.clone());
                            created
                        }
                    }
                };
                self.observers.created(name, started.elapsed());
                Ok(finished)
            }
            Err(source) => {
                let err = creation_error(name, source, related);
                if let RegistryError::AlreadyRegistered(existing) = &err {
                    // The instance appeared in the meantime through an implicit registration.
                    if existing == name {
                        if let Some(found) = guard.borrow().finished.get(name) {
                            return Ok(found.clone());
                        }
                    }
                }
                self.observers.creation_failed(name, &err);
                Err(err)
            }
        }
    }

    /// Records an error suppressed during the current top-level creation.
    ///
    /// Kept errors are attached to a failing creation as related causes. Once
    /// the configured limit is reached newer errors are dropped; outside of a
    /// creation the error is discarded.
    pub fn on_suppressed_error(&self, error: impl Into<BoxError>) {
        let guard = self.lock_tiers();
        let mut tiers = guard.borrow_mut();
        let limit = self.options.suppressed_error_limit;
        if let Some(suppressed) = tiers.suppressed.as_mut() {
            if suppressed.len() < limit {
                suppressed.push(error.into());
            }
        }
    }

    /// Removes `name` from every tier, e.g. to roll back a failed eager registration.
    pub fn remove_singleton(&self, name: &str) {
        self.lock_tiers().borrow_mut().remove(name);
    }

    /// True if a finished instance exists for `name`.
    pub fn contains_singleton(&self, name: &str) -> bool {
        self.lock_tiers().borrow().finished.contains_key(name)
    }

    /// Names registered as finished instances or pending factories, in registration order.
    pub fn singleton_names(&self) -> Vec<String> {
        self.lock_tiers().borrow().registered.iter().cloned().collect()
    }

    pub fn singleton_count(&self) -> usize {
        self.lock_tiers().borrow().registered.len()
    }

    /// Drops every cached instance and ends the teardown phase.
    pub fn clear_singleton_cache(&self) {
        self.lock_tiers().borrow_mut().clear();
    }
}

/// Maps a factory failure to the error surfaced by `get_or_create`.
///
/// Registry errors raised by nested creations pass through unchanged, except
/// that a nested `CreationFailed` collects the related causes of this level.
fn creation_error(name: &str, source: BoxError, related: Vec<BoxError>) -> RegistryError {
    match source.downcast::<RegistryError>() {
        Ok(nested) => match *nested {
            RegistryError::CreationFailed {
                name: nested_name,
                source,
                related: mut nested_related,
            } => {
                nested_related.extend(related);
                RegistryError::CreationFailed {
                    name: nested_name,
                    source,
                    related: nested_related,
                }
            }
            other => other,
        },
        Err(source) => RegistryError::CreationFailed {
            name: name.to_string(),
            source,
            related,
        },
    }
}
