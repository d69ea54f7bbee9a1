//! Static token provider backed by configuration.
//!
//! Wraps the `[github] token` value from `config.toml` in a
//! [`secrecy::SecretString`] so it never appears in Debug output or logs.
//! The token only leaves the wrapper when the orchestrator hands it to the
//! gateway for one commit.

use pairforge_core::token::TokenProvider;
use pairforge_types::config::GitHubConfig;
use pairforge_types::error::StoreError;
use secrecy::{ExposeSecret, SecretString};

/// Configuration-backed token provider.
pub struct StaticTokenProvider {
    token: Option<SecretString>,
}

impl StaticTokenProvider {
    /// Create a provider from the configured token, if any.
    ///
    /// Blank values are treated as absent so a stray empty string in
    /// `config.toml` cannot shadow other providers.
    pub fn from_config(config: &GitHubConfig) -> Self {
        let token = config
            .token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(SecretString::from);
        Self { token }
    }
}

impl TokenProvider for StaticTokenProvider {
    fn name(&self) -> &'static str {
        "config"
    }

    async fn get(&self) -> Result<Option<String>, StoreError> {
        Ok(self.token.as_ref().map(|t| t.expose_secret().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(token: Option<&str>) -> GitHubConfig {
        GitHubConfig {
            token: token.map(String::from),
            ..GitHubConfig::default()
        }
    }

    #[tokio::test]
    async fn test_configured_token_resolves() {
        let provider = StaticTokenProvider::from_config(&config_with(Some("ghp_configured")));
        let result = provider.get().await.unwrap();
        assert_eq!(result, Some("ghp_configured".to_string()));
    }

    #[tokio::test]
    async fn test_absent_token_resolves_none() {
        let provider = StaticTokenProvider::from_config(&config_with(None));
        let result = provider.get().await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_blank_token_treated_as_absent() {
        let provider = StaticTokenProvider::from_config(&config_with(Some("  ")));
        let result = provider.get().await.unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_provider_name() {
        let provider = StaticTokenProvider::from_config(&config_with(None));
        assert_eq!(provider.name(), "config");
    }
}
