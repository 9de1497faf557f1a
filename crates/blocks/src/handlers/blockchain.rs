use std::sync::Arc;

use async_trait::async_trait;
use nebula_workflow::NodeDefinition;
use serde_json::Value;

use crate::context::BlockContext;
use crate::error::BlockError;
use crate::handler::BlockHandler;

/// Port the blockchain-ops handlers call into.
///
/// One concrete implementation would talk to an RPC node / indexer per
/// chain; this crate only depends on the narrow interface the three
/// handlers below need.
#[async_trait]
pub trait BlockchainProvider: Send + Sync {
    async fn liquidity_position(
        &self,
        config: &Value,
    ) -> Result<Value, BlockError>;

    async fn yield_position(&self, config: &Value) -> Result<Value, BlockError>;

    async fn portfolio_balance(&self, config: &Value) -> Result<Value, BlockError>;
}

/// Reports a DeFi liquidity-pool position.
pub struct DefiLiquidityHandler {
    provider: Arc<dyn BlockchainProvider>,
}

impl DefiLiquidityHandler {
    pub fn new(provider: Arc<dyn BlockchainProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl BlockHandler for DefiLiquidityHandler {
    async fn execute(
        &self,
        node: &NodeDefinition,
        ctx: &BlockContext,
    ) -> Result<serde_json::Value, BlockError> {
        let config = ctx.effective_inputs(&node.config)?;
        self.provider.liquidity_position(&config).await
    }
}

/// Reports a DeFi yield-farming position.
pub struct DefiYieldHandler {
    provider: Arc<dyn BlockchainProvider>,
}

impl DefiYieldHandler {
    pub fn new(provider: Arc<dyn BlockchainProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl BlockHandler for DefiYieldHandler {
    async fn execute(
        &self,
        node: &NodeDefinition,
        ctx: &BlockContext,
    ) -> Result<serde_json::Value, BlockError> {
        let config = ctx.effective_inputs(&node.config)?;
        self.provider.yield_position(&config).await
    }
}

/// Reports a wallet's portfolio balance.
pub struct PortfolioBalanceHandler {
    provider: Arc<dyn BlockchainProvider>,
}

impl PortfolioBalanceHandler {
    pub fn new(provider: Arc<dyn BlockchainProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl BlockHandler for PortfolioBalanceHandler {
    async fn execute(
        &self,
        node: &NodeDefinition,
        ctx: &BlockContext,
    ) -> Result<serde_json::Value, BlockError> {
        let config = ctx.effective_inputs(&node.config)?;
        self.provider.portfolio_balance(&config).await
    }
}

/// Placeholder used where no chain RPC/indexer backend has been configured.
/// Every operation fails with a clear, non-transient validation error rather
/// than panicking or hanging a node on an absent dependency.
pub struct UnavailableBlockchainProvider;

#[async_trait]
impl BlockchainProvider for UnavailableBlockchainProvider {
    async fn liquidity_position(&self, _config: &Value) -> Result<Value, BlockError> {
        Err(BlockError::Validation("blockchain provider not configured".into()))
    }

    async fn yield_position(&self, _config: &Value) -> Result<Value, BlockError> {
        Err(BlockError::Validation("blockchain provider not configured".into()))
    }

    async fn portfolio_balance(&self, _config: &Value) -> Result<Value, BlockError> {
        Err(BlockError::Validation("blockchain provider not configured".into()))
    }
}
