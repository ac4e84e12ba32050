//! Lifecycle observers.
//!
//! Hooks for watching instance creation and teardown: timing, failed
//! factories, destroy actions that fail. Observers are called synchronously
//! from the registry, some of them while the singleton lock is held, so keep
//! implementations lightweight and never call back into the registry.

use std::sync::Arc;
use std::time::Duration;

/// Observer trait for registry lifecycle events.
///
/// Every method has a no-op default, so implementations only override the
/// events they care about.
///
/// # Examples
///
/// ```
/// use ferrous_lifecycle::{LifecycleObserver, SingletonRegistry, instance};
/// use std::sync::{Arc, Mutex};
/// use std::time::Duration;
///
/// #[derive(Default)]
/// struct Recorder {
///     created: Mutex<Vec<String>>,
/// }
///
/// impl LifecycleObserver for Recorder {
///     fn created(&self, name: &str, _duration: Duration) {
///         self.created.lock().unwrap().push(name.to_string());
///     }
/// }
///
/// let recorder = Arc::new(Recorder::default());
/// let registry = SingletonRegistry::builder().observer(recorder.clone()).build();
/// registry.get_or_create("clock", || Ok(instance(0u64))).unwrap();
///
/// assert_eq!(*recorder.created.lock().unwrap(), vec!["clock".to_string()]);
/// ```
pub trait LifecycleObserver: Send + Sync {
    /// Called right before a creation factory is invoked.
    fn creating(&self, _name: &str) {}

    /// Called after a creation factory produced an instance.
    fn created(&self, _name: &str, _duration: Duration) {}

    /// Called when a creation factory returned an error.
    fn creation_failed(&self, _name: &str, _error: &(dyn std::error::Error + 'static)) {}

    /// Called before the destroy action of `name` runs.
    fn destroying(&self, _name: &str) {}

    /// Called when the destroy action of `name` failed or panicked.
    fn destroy_failed(&self, _name: &str, _message: &str) {}
}

/// Built-in observer forwarding every event to `tracing`.
///
/// # Examples
///
/// ```
/// use ferrous_lifecycle::{LoggingObserver, SingletonRegistry};
/// use std::sync::Arc;
///
/// let registry = SingletonRegistry::builder()
///     .observer(Arc::new(LoggingObserver::with_prefix("app")))
///     .build();
/// ```
pub struct LoggingObserver {
    prefix: String,
}

impl LoggingObserver {
    /// Creates a new logging observer with default prefix.
    pub fn new() -> Self {
        Self {
            prefix: "ferrous-lifecycle".to_string(),
        }
    }

    /// Creates a new logging observer with a custom prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for LoggingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl LifecycleObserver for LoggingObserver {
    fn creating(&self, name: &str) {
        tracing::debug!(prefix = %self.prefix, name, "creating instance");
    }

    fn created(&self, name: &str, duration: Duration) {
        tracing::debug!(prefix = %self.prefix, name, ?duration, "created instance");
    }

    fn creation_failed(&self, name: &str, error: &(dyn std::error::Error + 'static)) {
        tracing::warn!(prefix = %self.prefix, name, error = %error, "instance creation failed");
    }

    fn destroying(&self, name: &str) {
        tracing::trace!(prefix = %self.prefix, name, "destroying instance");
    }

    fn destroy_failed(&self, name: &str, message: &str) {
        tracing::warn!(prefix = %self.prefix, name, message, "destroy action failed");
    }
}

/// Collection of observers held by the registry.
#[derive(Default)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn LifecycleObserver>>,
}

impl Observers {
    pub(crate) fn add(&mut self, observer: Arc<dyn LifecycleObserver>) {
        self.observers.push(observer);
    }

    #[inline]
    pub(crate) fn creating(&self, name: &str) {
        for observer in &self.observers {
            observer.creating(name);
        }
    }

    #[inline]
    pub(crate) fn created(&self, name: &str, duration: Duration) {
        for observer in &self.observers {
            observer.created(name, duration);
        }
    }

    #[inline]
    pub(crate) fn creation_failed(&self, name: &str, error: &(dyn std::error::Error + 'static)) {
        for observer in &self.observers {
            observer.creation_failed(name, error);
        }
    }

    #[inline]
    pub(crate) fn destroying(&self, name: &str) {
        for observer in &self.observers {
            observer.destroying(name);
        }
    }

    #[inline]
    pub(crate) fn destroy_failed(&self, name: &str, message: &str) {
        for observer in &self.observers {
            observer.destroy_failed(name, message);
        }
    }
}
