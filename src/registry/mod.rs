//! The singleton registry.
//!
//! `SingletonRegistry` composes the tiered instance cache, the creation
//! tracker, the dependency graph and the disposal records behind one API.
//!
//! # Locking
//!
//! The finished, early-reference and factory tiers, the creation tracker and
//! the suppressed-error list form a single critical region behind one
//! re-entrant mutex. Factories run while it is held, so creation is
//! serialized registry-wide; a factory may call back into the registry on the
//! same thread (that is how circular references resolve) but other threads
//! wait. The dependency graph and the disposal records use their own
//! per-map locks.

use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::{Mutex, ReentrantMutex, ReentrantMutexGuard};

use crate::alias::SimpleAliasRegistry;
use crate::config::RegistryOptions;
use crate::observer::{LifecycleObserver, Observers};
use crate::traits::{AliasResolver, Dispose};

mod cache;
mod creation;
mod disposal;
mod graph;

use cache::InstanceTiers;
use graph::DependencyGraph;

/// Shared-instance registry with circular-reference resolution and
/// dependency-ordered teardown.
///
/// # Thread Safety
///
/// `SingletonRegistry` is `Send + Sync`; share it through an `Arc`.
///
/// # Examples
///
/// ```
/// use ferrous_lifecycle::{downcast, instance, SingletonRegistry};
///
/// struct Database {
///     url: String,
/// }
///
/// let registry = SingletonRegistry::new();
/// let db = registry
///     .get_or_create("database", || {
///         Ok(instance(Database { url: "postgres://localhost".to_string() }))
///     })
///     .unwrap();
///
/// let again = registry.get_singleton("database").unwrap();
/// assert!(std::sync::Arc::ptr_eq(&db, &again));
/// assert_eq!(downcast::<Database>(&again).unwrap().url, "postgres://localhost");
/// ```
pub struct SingletonRegistry {
    tiers: ReentrantMutex<RefCell<InstanceTiers>>,
    graph: DependencyGraph,
    disposables: Mutex<IndexMap<String, Arc<dyn Dispose>>>,
    aliases: Arc<dyn AliasResolver>,
    observers: Observers,
    options: RegistryOptions,
}

impl SingletonRegistry {
    /// Creates a registry with default options and an empty alias table.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    pub fn options(&self) -> &RegistryOptions {
        &self.options
    }

    /// Resolves `name` through the configured alias resolver.
    pub fn canonical_name(&self, name: &str) -> String {
        self.aliases.canonical_name(name)
    }

    /// Acquires the singleton lock.
    ///
    /// Collaborators performing multi-step creation hold this guard to keep
    /// their sequence inside the same critical section as the registry's own
    /// creation logic. The lock is re-entrant: registry calls made while the
    /// guard is alive, on the same thread, do not deadlock.
    ///
    /// ```
    /// use ferrous_lifecycle::{instance, SingletonRegistry};
    ///
    /// let registry = SingletonRegistry::new();
    /// {
    ///     let _lock = registry.singleton_lock();
    ///     if !registry.contains_singleton("config") {
    ///         registry.register_singleton("config", instance(42u8)).unwrap();
    ///     }
    /// }
    /// assert!(registry.contains_singleton("config"));
    /// ```
    pub fn singleton_lock(&self) -> SingletonLock<'_> {
        SingletonLock {
            _guard: self.tiers.lock(),
        }
    }

    pub(crate) fn lock_tiers(&self) -> ReentrantMutexGuard<'_, RefCell<InstanceTiers>> {
        self.tiers.lock()
    }
}

impl Default for SingletonRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SingletonRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SingletonRegistry")
            .field("singletons", &self.singleton_names())
            .field("disposables", &self.disposables.lock().len())
            .field("options", &self.options)
            .finish()
    }
}

/// Guard returned by [`SingletonRegistry::singleton_lock`].
///
/// Not `Send`: release it on the thread that acquired it.
pub struct SingletonLock<'a> {
    _guard: ReentrantMutexGuard<'a, RefCell<InstanceTiers>>,
}

/// Builder for [`SingletonRegistry`].
///
/// # Examples
///
/// ```
/// use ferrous_lifecycle::{
///     AliasResolver, LoggingObserver, RegistryOptions, SimpleAliasRegistry, SingletonRegistry,
/// };
/// use std::sync::Arc;
///
/// let options = RegistryOptions::default().with_alias_overriding(false);
/// let aliases = Arc::new(SimpleAliasRegistry::from_options(&options));
/// aliases.register_alias("primaryDb", "db").unwrap();
///
/// let registry = SingletonRegistry::builder()
///     .options(options)
///     .aliases(aliases.clone())
///     .observer(Arc::new(LoggingObserver::new()))
///     .build();
///
/// assert_eq!(registry.canonical_name("db"), "primaryDb");
/// ```
#[derive(Default)]
pub struct RegistryBuilder {
    options: RegistryOptions,
    aliases: Option<Arc<dyn AliasResolver>>,
    observers: Observers,
}

impl RegistryBuilder {
    pub fn options(mut self, options: RegistryOptions) -> Self {
        self.options = options;
        self
    }

    /// Uses `aliases` for canonical-name resolution instead of a private,
    /// empty [`SimpleAliasRegistry`].
    pub fn aliases(mut self, aliases: Arc<dyn AliasResolver>) -> Self {
        self.aliases = Some(aliases);
        self
    }

    pub fn observer(mut self, observer: Arc<dyn LifecycleObserver>) -> Self {
        self.observers.add(observer);
        self
    }

    pub fn build(self) -> SingletonRegistry {
        let aliases = self
            .aliases
            .unwrap_or_else(|| Arc::new(SimpleAliasRegistry::from_options(&self.options)));
        SingletonRegistry {
            tiers: ReentrantMutex::new(RefCell::new(InstanceTiers::with_capacity(
                self.options.initial_capacity,
            ))),
            graph: DependencyGraph::default(),
            disposables: Mutex::new(IndexMap::new()),
            aliases,
            observers: self.observers,
            options: self.options,
        }
    }
}
