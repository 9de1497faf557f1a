//! Base traits implemented by Nebula domain types.

use crate::scope::ScopeLevel;

/// A type that carries a stable identity, independent of its content.
pub trait Identifiable {
    type Id: Copy + Eq;

    fn id(&self) -> Self::Id;
}

/// A type whose lifecycle is bound to a [`ScopeLevel`].
pub trait Scoped {
    fn scope(&self) -> ScopeLevel;
}

/// A type that can produce the contextual metadata attached to a request or
/// execution, for tracing and scoped lookups.
pub trait HasContext {
    /// Opaque context value, e.g. a request's active [`ScopeLevel`] chain.
    fn context(&self) -> &[ScopeLevel];
}
