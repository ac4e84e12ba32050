//! Dependency-ordered teardown.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use super::SingletonRegistry;
use crate::internal::panic_message;
use crate::traits::Dispose;

impl SingletonRegistry {
    /// Registers the destroy action for `name`.
    ///
    /// Records are destroyed in reverse registration order by
    /// [`destroy_singletons`](Self::destroy_singletons). Re-registering a name
    /// replaces its handle but keeps its original position.
    pub fn register_disposable(&self, name: impl Into<String>, handle: Arc<dyn Dispose>) {
        self.disposables.lock().insert(name.into(), handle);
    }

    /// True while [`destroy_singletons`](Self::destroy_singletons) is running.
    pub fn is_in_destruction(&self) -> bool {
        self.lock_tiers().borrow().in_destruction
    }

    /// Destroys every registered disposal record, then forgets all instances and edges.
    ///
    /// Creation through [`get_or_create`](Self::get_or_create) fails with
    /// `CreationNotAllowed` until this returns. Records are visited in reverse
    /// registration order, but each instance's dependents go before it.
    pub fn destroy_singletons(&self) {
        tracing::trace!("destroying singletons");
        self.lock_tiers().borrow_mut().in_destruction = true;

        let names: Vec<String> = self.disposables.lock().keys().cloned().collect();
        for name in names.iter().rev() {
            self.destroy_singleton(name);
        }

        self.graph.clear();
        self.clear_singleton_cache();
    }

    /// Removes `name` from the cache and destroys it together with its dependents.
    pub fn destroy_singleton(&self, name: &str) {
        self.remove_singleton(name);
        let handle = self.disposables.lock().shift_remove(name);
        self.destroy_instance(name, handle);
    }

    /// Destroys `name`: its dependents first, then its own handle, then the
    /// instances it contains. Never fails; destroy errors and panics are logged.
    pub fn destroy_instance(&self, name: &str, handle: Option<Arc<dyn Dispose>>) {
        if let Some(dependents) = self.graph.take_dependents(name) {
            tracing::trace!(name, ?dependents, "retrieved dependents");
            for dependent in &dependents {
                self.destroy_singleton(dependent);
            }
        }

        if let Some(handle) = handle {
            self.observers.destroying(name);
            match panic::catch_unwind(AssertUnwindSafe(|| handle.dispose())) {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    tracing::warn!(name, error = %err, "destruction of instance threw an error");
                    self.observers.destroy_failed(name, &err.to_string());
                }
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    tracing::warn!(name, panic = %message, "destruction of instance panicked");
                    self.observers.destroy_failed(name, &message);
                }
            }
        }

        if let Some(contained) = self.graph.take_contained(name) {
            for inner in &contained {
                self.destroy_singleton(inner);
            }
        }

        self.graph.scrub(name);
    }
}
