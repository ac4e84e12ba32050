//! Disposal trait for instance teardown.

use crate::error::BoxError;

/// Destroy action registered for a managed instance.
///
/// Implement this trait for instances that need structured teardown (flushing
/// caches, closing connections). Handles are registered with
/// [`SingletonRegistry::register_disposable`](crate::SingletonRegistry::register_disposable)
/// and run during [`destroy_singletons`](crate::SingletonRegistry::destroy_singletons),
/// always after every instance that depends on them.
///
/// A failing or panicking `dispose` is logged and swallowed; it never aborts
/// the rest of the teardown.
///
/// # Examples
///
/// ```
/// use ferrous_lifecycle::{BoxError, Dispose, SingletonRegistry};
/// use std::sync::Arc;
///
/// struct Cache {
///     name: String,
/// }
///
/// impl Dispose for Cache {
///     fn dispose(&self) -> Result<(), BoxError> {
///         println!("Flushing cache: {}", self.name);
///         Ok(())
///     }
/// }
///
/// let registry = SingletonRegistry::new();
/// registry.register_disposable("cache", Arc::new(Cache { name: "user_cache".to_string() }));
/// registry.destroy_singletons();
/// ```
pub trait Dispose: Send + Sync + 'static {
    /// Perform cleanup of resources.
    fn dispose(&self) -> Result<(), BoxError>;
}

/// Closure adapter returned by [`dispose_fn`].
pub struct DisposeFn<F>(F);

impl<F> Dispose for DisposeFn<F>
where
    F: Fn() -> Result<(), BoxError> + Send + Sync + 'static,
{
    fn dispose(&self) -> Result<(), BoxError> {
        (self.0)()
    }
}

/// Builds a disposal handle from a closure.
///
/// ```
/// use ferrous_lifecycle::{dispose_fn, SingletonRegistry};
/// use std::sync::Arc;
///
/// let registry = SingletonRegistry::new();
/// registry.register_disposable("pool", Arc::new(dispose_fn(|| Ok(()))));
/// ```
pub fn dispose_fn<F>(f: F) -> DisposeFn<F>
where
    F: Fn() -> Result<(), BoxError> + Send + Sync + 'static,
{
    DisposeFn(f)
}
