//! Tool-server supervisor: spawns MCP-speaking subprocess tool servers,
//! drives them through handshake and health checks, and multiplexes
//! `tools/call` requests over their stdio.
#![allow(unsafe_code)]

mod error;
mod multiplexer;
mod process;
mod registration;
mod restrict;
mod state;
mod supervisor;

pub use error::SandboxError;
pub use registration::{ToolServerKey, ToolServerRegistration};
pub use restrict::SandboxPolicy;
pub use state::ServerState;
pub use supervisor::ToolServerSupervisor;
