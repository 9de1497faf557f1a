use std::collections::HashSet;

use async_trait::async_trait;
use nebula_core::UserId;
use nebula_ports::error::PortsError;
use nebula_ports::SubscriptionPort;
use parking_lot::RwLock;

/// Always grants every gated mode. Useful for tests that don't exercise
/// entitlement logic.
#[derive(Debug, Default)]
pub struct AllowAllSubscriptionPort;

#[async_trait]
impl SubscriptionPort for AllowAllSubscriptionPort {
    async fn can_use_deliberate(&self, _user_id: UserId) -> Result<bool, PortsError> {
        Ok(true)
    }

    async fn can_use_collaborative(&self, _user_id: UserId) -> Result<bool, PortsError> {
        Ok(true)
    }
}

/// In-memory subscription port backed by explicit per-user entitlement sets.
#[derive(Debug, Default)]
pub struct MemorySubscriptionPort {
    deliberate: RwLock<HashSet<UserId>>,
    collaborative: RwLock<HashSet<UserId>>,
}

impl MemorySubscriptionPort {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant_deliberate(&self, user_id: UserId) {
        self.deliberate.write().insert(user_id);
    }

    pub fn grant_collaborative(&self, user_id: UserId) {
        self.collaborative.write().insert(user_id);
    }
}

#[async_trait]
impl SubscriptionPort for MemorySubscriptionPort {
    async fn can_use_deliberate(&self, user_id: UserId) -> Result<bool, PortsError> {
        Ok(self.deliberate.read().contains(&user_id))
    }

    async fn can_use_collaborative(&self, user_id: UserId) -> Result<bool, PortsError> {
        Ok(self.collaborative.read().contains(&user_id))
    }
}
