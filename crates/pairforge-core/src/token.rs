//! Access token provider trait and resolution chain.
//!
//! Commit credentials resolve through an ordered chain of providers: a
//! request-supplied token (handled by the orchestrator before the chain is
//! consulted), then the environment, then static configuration. Concrete
//! providers live in pairforge-infra; the chain itself is provider-agnostic.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use pairforge_types::error::StoreError;

/// Trait for access token sources (environment, configuration).
///
/// Providers return `None` when they hold no token, letting the chain fall
/// through to the next source.
pub trait TokenProvider: Send + Sync {
    /// Short provider name for logging.
    fn name(&self) -> &'static str;

    /// Retrieve the token held by this provider, if any.
    fn get(&self) -> impl Future<Output = Result<Option<String>, StoreError>> + Send;
}

/// Object-safe version of [`TokenProvider`] with boxed futures.
///
/// This trait exists solely to enable dynamic dispatch (`dyn TokenProviderDyn`).
/// A blanket implementation is provided for all types implementing `TokenProvider`.
pub trait TokenProviderDyn: Send + Sync {
    fn name(&self) -> &'static str;

    fn get_boxed<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<Option<String>, StoreError>> + Send + 'a>>;
}

/// Blanket implementation: any `TokenProvider` automatically implements `TokenProviderDyn`.
impl<T: TokenProvider> TokenProviderDyn for T {
    fn name(&self) -> &'static str {
        TokenProvider::name(self)
    }

    fn get_boxed<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<Option<String>, StoreError>> + Send + 'a>> {
        Box::pin(self.get())
    }
}

/// Type-erased token provider, usable in a heterogeneous chain.
pub type DynTokenProvider = Arc<dyn TokenProviderDyn>;

/// Ordered token resolution chain (first match wins).
pub struct TokenChain {
    providers: Vec<DynTokenProvider>,
}

impl TokenChain {
    /// Create a chain from providers ordered by precedence (highest first).
    pub fn new(providers: Vec<DynTokenProvider>) -> Self {
        Self { providers }
    }

    /// Resolve a token by iterating providers in priority order.
    pub async fn resolve(&self) -> Result<Option<String>, StoreError> {
        for provider in &self.providers {
            if let Some(token) = provider.get_boxed().await? {
                tracing::debug!(provider = provider.name(), "Resolved access token");
                return Ok(Some(token));
            }
        }
        Ok(None)
    }
}
