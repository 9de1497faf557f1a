//! Closed-grammar template substitution for workflow node configs.
//!
//! Node configuration values carry `{{ }}` expressions that resolve against
//! the node's JSON input and the execution's context metadata. The grammar
//! is fixed: path lookups, a handful of generator functions, and a handful
//! of formatting/string functions. There is no user-defined function
//! registration and no arithmetic.

mod context;
mod engine;
mod error;
mod expr;
mod path;
mod validate;

pub use context::TemplateContext;
pub use error::TemplateError;
pub use expr::Expr;
pub use engine::{render_str, render_value};
pub use validate::validate;
