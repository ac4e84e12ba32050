//! Collaborator traits consumed by the registry.

mod alias;
mod dispose;

pub use alias::AliasResolver;
pub use dispose::{dispose_fn, Dispose, DisposeFn};
