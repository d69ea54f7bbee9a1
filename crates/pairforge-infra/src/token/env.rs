//! Environment variable token provider.
//!
//! A read-only provider that checks `GITHUB_TOKEN`. This is the highest
//! priority source in the resolution chain: an exported token overrides
//! anything in `config.toml`.

use pairforge_core::token::TokenProvider;
use pairforge_types::error::StoreError;

/// Environment variable holding the GitHub access token.
pub const GITHUB_TOKEN_VAR: &str = "GITHUB_TOKEN";

/// Environment variable token provider.
pub struct EnvTokenProvider {
    var: &'static str,
}

impl EnvTokenProvider {
    /// Create a provider reading `GITHUB_TOKEN`.
    pub fn new() -> Self {
        Self {
            var: GITHUB_TOKEN_VAR,
        }
    }

    /// Create a provider reading a different variable (used by tests).
    pub fn with_var(var: &'static str) -> Self {
        Self { var }
    }
}

impl Default for EnvTokenProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenProvider for EnvTokenProvider {
    fn name(&self) -> &'static str {
        "env"
    }

    async fn get(&self) -> Result<Option<String>, StoreError> {
        match std::env::var(self.var) {
            Ok(val) if !val.trim().is_empty() => Ok(Some(val)),
            // Blank values fall through to the next provider.
            Ok(_) => Ok(None),
            Err(std::env::VarError::NotPresent) => Ok(None),
            // Non-unicode values fall through the same way.
            Err(std::env::VarError::NotUnicode(_)) => Ok(None),
        }
    }
}
