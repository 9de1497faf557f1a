use std::collections::HashMap;
use std::sync::Arc;

use crate::error::ProviderError;
use crate::provider::Provider;
use crate::request::{GenerateRequest, GenerateResponse};

/// Holds named providers and, when the requested one is unhealthy, walks a
/// configured fallback chain (e.g. `openrouter → openai → anthropic`,
/// `ollama → openrouter`) to find one that is.
pub struct ProviderPool {
    providers: HashMap<String, Arc<dyn Provider>>,
    fallbacks: HashMap<String, Vec<String>>,
}

impl ProviderPool {
    pub fn new() -> Self {
        Self {
            providers: HashMap::new(),
            fallbacks: HashMap::new(),
        }
    }

    pub fn register(&mut self, provider: Arc<dyn Provider>) {
        self.providers.insert(provider.name().to_string(), provider);
    }

    /// Configures the fallback chain consulted when `name` is unhealthy.
    /// Order matters: the first healthy entry wins.
    pub fn set_fallback_chain(&mut self, name: impl Into<String>, chain: Vec<String>) {
        self.fallbacks.insert(name.into(), chain);
    }

    fn get(&self, name: &str) -> Option<&Arc<dyn Provider>> {
        self.providers.get(name)
    }

    /// Resolves `preferred` to a healthy provider: itself if healthy,
    /// otherwise the first healthy entry in its fallback chain.
    pub async fn resolve(&self, preferred: &str) -> Result<Arc<dyn Provider>, ProviderError> {
        let mut tried = Vec::new();
        let mut candidates = vec![preferred.to_string()];
        candidates.extend(self.fallbacks.get(preferred).cloned().unwrap_or_default());

        for name in candidates {
            let Some(provider) = self.get(&name) else {
                continue;
            };
            tried.push(name.clone());
            if provider.healthy().await {
                return Ok(Arc::clone(provider));
            }
        }

        if tried.is_empty() {
            return Err(ProviderError::UnknownProvider(preferred.to_string()));
        }
        Err(ProviderError::NoHealthyProvider(tried))
    }

    pub async fn generate(
        &self,
        preferred: &str,
        request: GenerateRequest,
    ) -> Result<GenerateResponse, ProviderError> {
        let provider = self.resolve(preferred).await?;
        provider.generate(request).await
    }
}

impl Default for ProviderPool {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;

    struct StubProvider {
        name: &'static str,
        healthy: bool,
    }

    #[async_trait]
    impl Provider for StubProvider {
        fn name(&self) -> &str {
            self.name
        }

        async fn generate(&self, _request: GenerateRequest) -> Result<GenerateResponse, ProviderError> {
            Ok(GenerateResponse {
                text: self.name.to_string(),
                steps: Vec::new(),
                tool_calls: Vec::new(),
                usage: None,
            })
        }

        async fn healthy(&self) -> bool {
            self.healthy
        }
    }

    #[tokio::test]
    async fn resolve_returns_preferred_when_healthy() {
        let mut pool = ProviderPool::new();
        pool.register(Arc::new(StubProvider { name: "openai", healthy: true }));
        let resolved = pool.resolve("openai").await.unwrap();
        assert_eq!(resolved.name(), "openai");
    }

    #[tokio::test]
    async fn resolve_falls_back_when_preferred_unhealthy() {
        let mut pool = ProviderPool::new();
        pool.register(Arc::new(StubProvider { name: "openrouter", healthy: false }));
        pool.register(Arc::new(StubProvider { name: "openai", healthy: true }));
        pool.register(Arc::new(StubProvider { name: "anthropic", healthy: true }));
        pool.set_fallback_chain("openrouter", vec!["openai".to_string(), "anthropic".to_string()]);

        let resolved = pool.resolve("openrouter").await.unwrap();
        assert_eq!(resolved.name(), "openai");
    }

    #[tokio::test]
    async fn resolve_fails_when_nothing_is_healthy() {
        let mut pool = ProviderPool::new();
        pool.register(Arc::new(StubProvider { name: "ollama", healthy: false }));
        pool.register(Arc::new(StubProvider { name: "openrouter", healthy: false }));
        pool.set_fallback_chain("ollama", vec!["openrouter".to_string()]);

        let err = pool.resolve("ollama").await.unwrap_err();
        assert!(matches!(err, ProviderError::NoHealthyProvider(_)));
    }

    #[tokio::test]
    async fn resolve_unknown_provider_with_no_chain_fails() {
        let pool = ProviderPool::new();
        let err = pool.resolve("nonexistent").await.unwrap_err();
        assert!(matches!(err, ProviderError::UnknownProvider(_)));
    }

    #[tokio::test]
    async fn generate_uses_resolved_provider() {
        let mut pool = ProviderPool::new();
        pool.register(Arc::new(StubProvider { name: "openai", healthy: true }));
        let response = pool.generate("openai", GenerateRequest::new("hi")).await.unwrap();
        assert_eq!(response.text, "openai");
    }
}
