//! # ferrous-lifecycle
//!
//! Lifecycle registry at the core of a dependency injection container: it
//! stores shared, name-addressed instances, resolves circular references that
//! arise while instances are being constructed, records which instances depend
//! on which, and tears everything down in dependency order.
//!
//! ## Features
//!
//! - **Singleton identity**: at most one finished instance per name
//! - **Early references**: in-progress instances are exposed to the
//!   constructions they are part of, breaking construction cycles
//! - **Re-entrancy detection**: illegal re-entrant creation fails with
//!   `CreationCycle` instead of recursing
//! - **Dependency graph**: cycle-tolerant transitive dependency queries
//! - **Ordered teardown**: dependents are always destroyed before what they
//!   depend on; destroy failures are logged, never propagated
//! - **Thread-safe**: one re-entrant creation lock plus per-map locks
//!
//! ## Quick Start
//!
//! ```rust
//! use ferrous_lifecycle::{dispose_fn, downcast, instance, SingletonRegistry};
//! use std::sync::Arc;
//!
//! struct Database {
//!     url: String,
//! }
//!
//! struct UserService {
//!     db: Arc<Database>,
//! }
//!
//! let registry = SingletonRegistry::new();
//!
//! let db = registry
//!     .get_or_create("database", || {
//!         Ok(instance(Database { url: "postgres://localhost".to_string() }))
//!     })
//!     .unwrap();
//! registry.register_disposable("database", Arc::new(dispose_fn(|| Ok(()))));
//!
//! let service = registry
//!     .get_or_create("userService", || {
//!         let db = downcast::<Database>(&db).unwrap();
//!         Ok(instance(UserService { db }))
//!     })
//!     .unwrap();
//! registry.register_dependent("database", "userService");
//!
//! let service = downcast::<UserService>(&service).unwrap();
//! assert_eq!(service.db.url, "postgres://localhost");
//!
//! // userService is torn down before database.
//! registry.destroy_singletons();
//! assert_eq!(registry.singleton_count(), 0);
//! ```
//!
//! ## Circular References
//!
//! A construction in progress publishes a factory for its early reference.
//! When a nested construction asks for that name, it receives the early
//! reference instead of recursing:
//!
//! ```rust
//! use ferrous_lifecycle::{instance, SingletonRegistry};
//! use std::sync::Arc;
//!
//! let registry = Arc::new(SingletonRegistry::new());
//! let raw_a = instance("A");
//!
//! let a = registry
//!     .get_or_create("a", || {
//!         let early = raw_a.clone();
//!         registry.add_singleton_factory("a", move || early);
//!         registry.get_or_create("b", || {
//!             // "a" is in creation: this yields its early reference
//!             let a = registry.get_singleton("a").unwrap();
//!             Ok(instance(a))
//!         })?;
//!         Ok(raw_a.clone())
//!     })
//!     .unwrap();
//!
//! assert!(Arc::ptr_eq(&a, &raw_a));
//! ```

pub mod alias;
pub mod config;
pub mod error;
pub mod instance;
pub mod observer;
pub mod registry;
pub mod traits;

// Internal modules
mod internal;

// Re-export core types
pub use alias::SimpleAliasRegistry;
pub use config::{RegistryOptions, DEFAULT_INITIAL_CAPACITY, DEFAULT_SUPPRESSED_ERROR_LIMIT};
pub use error::{BoxError, RegistryError, RegistryResult};
pub use instance::{downcast, instance, EarlyFactory, FactoryResult, Instance};
pub use observer::{LifecycleObserver, LoggingObserver};
pub use registry::{RegistryBuilder, SingletonLock, SingletonRegistry};
pub use traits::{dispose_fn, AliasResolver, Dispose, DisposeFn};
