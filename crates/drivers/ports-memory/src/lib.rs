#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! In-memory drivers for the ports introduced alongside the execution
//! engine: log/transcript storage, circuit-breaker state, subscription
//! entitlements, and security screening. Suitable for tests and
//! single-process deployments; none of these durably survive a restart.

mod circuit_breaker;
mod observability;
mod security;
mod subscription;

pub use circuit_breaker::MemoryCircuitBreakerStore;
pub use observability::{MemoryLogSink, MemoryTranscriptStore};
pub use security::AllowAllSecurityValidator;
pub use subscription::{AllowAllSubscriptionPort, MemorySubscriptionPort};
