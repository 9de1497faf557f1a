//! Subscription/entitlement port — which users may use which reasoning modes.

use async_trait::async_trait;
use nebula_core::UserId;

use crate::error::PortsError;

/// Answers entitlement questions for the reasoning engine's gated modes.
///
/// `deliberate` mode adds a reflection pass; `collaborative` mode shares
/// session state across a team. Both cost more provider calls than the
/// default `fast` mode, so they're gated behind a subscription tier.
#[async_trait]
pub trait SubscriptionPort: Send + Sync {
    /// Whether `user_id` is entitled to the `deliberate` thinking mode.
    async fn can_use_deliberate(&self, user_id: UserId) -> Result<bool, PortsError>;

    /// Whether `user_id` is entitled to the `collaborative` thinking mode.
    async fn can_use_collaborative(&self, user_id: UserId) -> Result<bool, PortsError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trait_is_object_safe() {
        fn _assert(_: &dyn SubscriptionPort) {}
    }
}
