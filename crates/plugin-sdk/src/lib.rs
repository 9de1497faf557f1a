//! SDK for writing community plugins that speak the worker's tool-server
//! wire protocol over stdio: implement [`ToolHandler`], hand it to
//! [`PluginServer`], run.

mod error;
mod handler;
mod server;

pub use error::PluginError;
pub use handler::ToolHandler;
pub use server::PluginServer;
