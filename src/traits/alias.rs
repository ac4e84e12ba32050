//! Canonical-name resolution.

/// Resolves a possibly aliased name to its canonical form.
///
/// The registry canonicalizes names before it records dependency edges and
/// before it runs transitive dependency queries. The default implementation is
/// [`SimpleAliasRegistry`](crate::SimpleAliasRegistry); orchestrators that keep
/// their own alias table can plug it in through
/// [`RegistryBuilder::aliases`](crate::RegistryBuilder::aliases).
///
/// Implementations are called while the dependency graph lock is held and
/// must not call back into the registry.
///
/// # Examples
///
/// ```
/// use ferrous_lifecycle::{AliasResolver, SingletonRegistry};
/// use std::sync::Arc;
///
/// struct LowerCase;
///
/// impl AliasResolver for LowerCase {
///     fn canonical_name(&self, name: &str) -> String {
///         name.to_lowercase()
///     }
/// }
///
/// let registry = SingletonRegistry::builder().aliases(Arc::new(LowerCase)).build();
/// registry.register_dependent("Database", "repository");
/// assert_eq!(registry.dependents_of("database"), vec!["repository".to_string()]);
/// ```
pub trait AliasResolver: Send + Sync + 'static {
    /// Returns the canonical name for `name`, or `name` itself if it is not an alias.
    fn canonical_name(&self, name: &str) -> String;
}
