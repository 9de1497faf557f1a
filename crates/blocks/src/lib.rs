//! Block-kind registry and the closed set of block handlers.
//!
//! Resolves a workflow node's `kind` to a [`BlockHandler`], wraps every
//! resolved handler with a metrics/logging decorator, and ships concrete
//! handlers for every kind named in the workflow document schema.

pub mod context;
pub mod error;
pub mod handler;
pub mod handlers;
pub mod registry;

pub use context::BlockContext;
pub use error::BlockError;
pub use handler::BlockHandler;
pub use registry::{BlockRegistry, BlockRegistryBuilder};

pub use handlers::ai_agent::{
    AiAgentHandler, ReasonOutcome, ReasonRequest, Reasoner, ToolDescriptor, ToolInvoke,
};
pub use handlers::blockchain::{
    BlockchainProvider, DefiLiquidityHandler, DefiYieldHandler, PortfolioBalanceHandler,
    UnavailableBlockchainProvider,
};
pub use handlers::condition::ConditionHandler;
pub use handlers::custom::{CodeSandbox, CodeStore, CustomBlockHandler};
pub use handlers::data_transform::DataTransformHandler;
pub use handlers::email::{EmailHandler, EmailSender};
pub use handlers::http::HttpRequestHandler;
pub use handlers::schedule::ScheduleHandler;
pub use handlers::unknown::UnknownHandler;
pub use handlers::webhook::WebhookHandler;
