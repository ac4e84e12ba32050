//! Managed instance and factory types.

use std::any::Any;
use std::sync::Arc;

use crate::error::BoxError;

/// Type-erased shared instance stored by the registry.
///
/// Identity is pointer identity: two lookups of the same name observe the
/// same instance when `Arc::ptr_eq` holds.
pub type Instance = Arc<dyn Any + Send + Sync>;

/// Deferred producer of an early reference, registered through
/// [`SingletonRegistry::add_singleton_factory`](crate::SingletonRegistry::add_singleton_factory).
///
/// Invoked at most once, and only while its name is in creation.
pub type EarlyFactory = Box<dyn FnOnce() -> Instance + Send>;

/// Result of a creation factory passed to
/// [`SingletonRegistry::get_or_create`](crate::SingletonRegistry::get_or_create).
pub type FactoryResult = Result<Instance, BoxError>;

/// Wraps a value as a shared [`Instance`].
///
/// # Examples
///
/// ```rust
/// use ferrous_lifecycle::{instance, downcast};
///
/// let shared = instance(String::from("postgres://localhost"));
/// let url = downcast::<String>(&shared).unwrap();
/// assert_eq!(url.as_str(), "postgres://localhost");
/// ```
pub fn instance<T: Any + Send + Sync>(value: T) -> Instance {
    Arc::new(value)
}

/// Recovers the concrete type of an instance, keeping the shared identity.
pub fn downcast<T: Any + Send + Sync>(instance: &Instance) -> Option<Arc<T>> {
    instance.clone().downcast::<T>().ok()
}
