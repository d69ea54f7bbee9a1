//! Access token provider implementations.
//!
//! - `env`: Environment variable provider (read-only, highest priority)
//! - `static_token`: Token pinned in `config.toml` (lowest priority)
//!
//! This module lives in `pairforge-infra` because it assembles concrete
//! provider implementations. The resulting chain is passed to the commit
//! orchestrator in `pairforge-core` via the `DynTokenProvider` abstraction.

pub mod env;
pub mod static_token;

use std::sync::Arc;

use pairforge_core::token::TokenChain;
use pairforge_types::config::GitHubConfig;

use self::env::EnvTokenProvider;
use self::static_token::StaticTokenProvider;

/// Build the default token resolution chain.
///
/// The chain is ordered by precedence (first match wins):
/// 1. `GITHUB_TOKEN` environment variable
/// 2. `[github] token` from `config.toml`
///
/// A request-supplied token bypasses the chain entirely; the orchestrator
/// handles that case before any provider is consulted.
pub fn build_token_chain(config: &GitHubConfig) -> TokenChain {
    TokenChain::new(vec![
        Arc::new(EnvTokenProvider::new()),
        Arc::new(StaticTokenProvider::from_config(config)),
    ])
}
