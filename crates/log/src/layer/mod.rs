//! Request-scoped context and the layer that stamps global fields onto the
//! root span.

pub mod context;
pub mod fields;

pub use context::Context;
