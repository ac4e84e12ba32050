//! Error types for the lifecycle registry.

use thiserror::Error;

/// Boxed error produced by collaborators: instance factories and destroy actions.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Lifecycle registry errors
///
/// Recoverable outcomes of registration, creation and alias handling. Internal
/// contract violations (an after-creation hook without a matching
/// before-creation hook) are not represented here: they panic.
///
/// # Examples
///
/// ```rust
/// use ferrous_lifecycle::{instance, RegistryError, SingletonRegistry};
///
/// let registry = SingletonRegistry::new();
/// registry.register_singleton("db", instance(1u32)).unwrap();
///
/// match registry.register_singleton("db", instance(2u32)) {
///     Err(RegistryError::AlreadyRegistered(name)) => assert_eq!(name, "db"),
///     _ => unreachable!(),
/// }
/// ```
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A finished instance is already bound under this name
    #[error("could not register instance under name '{0}': there is already an instance bound")]
    AlreadyRegistered(String),
    /// Re-entrant creation of a name that is not excluded from in-creation checks
    #[error("instance '{0}' is currently in creation: is there an unresolvable circular reference?")]
    CreationCycle(String),
    /// Creation requested while the registry is tearing down
    #[error("creation of instance '{0}' not allowed while instances of this registry are in destruction")]
    CreationNotAllowed(String),
    /// The factory for `name` failed
    #[error("error creating instance '{name}': {source}")]
    CreationFailed {
        name: String,
        #[source]
        source: BoxError,
        /// Failures suppressed during the same top-level creation
        related: Vec<BoxError>,
    },
    /// Registering the alias would make the name resolve back to itself
    #[error("cannot register alias '{alias}' for name '{name}': circular reference - '{name}' is a direct or indirect alias for '{alias}' already")]
    AliasCycle { name: String, alias: String },
    /// The alias is already bound to another name and overriding is disabled
    #[error("cannot define alias '{alias}' for name '{name}': it is already registered for name '{existing}'")]
    AliasOverride {
        name: String,
        alias: String,
        existing: String,
    },
    /// No alias with this name is registered
    #[error("no alias '{0}' registered")]
    AliasNotFound(String),
}

impl RegistryError {
    /// Returns true if this error, or any error it wraps, is a creation cycle.
    pub fn is_creation_cycle(&self) -> bool {
        let mut current: Option<&(dyn std::error::Error + 'static)> = Some(self);
        while let Some(err) = current {
            if let Some(RegistryError::CreationCycle(_)) = err.downcast_ref::<RegistryError>() {
                return true;
            }
            current = err.source();
        }
        false
    }

    /// Failures attached to a top-level creation error, if any.
    pub fn related_causes(&self) -> &[BoxError] {
        match self {
            RegistryError::CreationFailed { related, .. } => related,
            _ => &[],
        }
    }
}

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;
