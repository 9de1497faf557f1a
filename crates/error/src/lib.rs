//! Enterprise error infrastructure for the Nebula workflow engine.
//!
//! Domain crates define their own `thiserror` enums for precise, local error
//! handling, then convert into [`NebulaError`] at crate boundaries so callers
//! further up the stack deal with one classified error type instead of a
//! different enum per crate.

mod error;
mod kind;

pub use error::NebulaError;
pub use kind::ErrorKind;

#[cfg(feature = "derive")]
pub use nebula_error_macros::NebulaError;

/// Result type aliased to [`NebulaError`], for crates that convert at their
/// public boundary.
pub type NebulaResult<T> = std::result::Result<T, NebulaError>;
