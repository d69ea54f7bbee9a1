//! Global configuration types for Pairforge.
//!
//! `GlobalConfig` represents the top-level `config.toml` that controls
//! validation policy and GitHub access defaults.

use serde::{Deserialize, Serialize};

use crate::validation::ValidationPolicy;

/// Top-level configuration for the Pairforge service.
///
/// Loaded from `~/.pairforge/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Completeness validation and promotion tunables.
    #[serde(default)]
    pub validation: ValidationPolicy,

    /// GitHub commit settings.
    #[serde(default)]
    pub github: GitHubConfig,
}

/// GitHub access settings.
///
/// The token here is the last entry in the credential chain, behind the
/// request-supplied token and the `GITHUB_TOKEN` environment variable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    /// Static fallback token; usually absent outside single-user setups.
    pub token: Option<String>,

    /// API base URL; override for GitHub Enterprise or tests.
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

fn default_api_base() -> String {
    "https://api.github.com".to_string()
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_base: default_api_base(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_config_default_values() {
        let config = GlobalConfig::default();
        assert!(config.github.token.is_none());
        assert_eq!(config.github.api_base, "https://api.github.com");
        assert_eq!(config.validation.min_content_length, 50);
    }

    #[test]
    fn test_global_config_deserialize_with_defaults() {
        let config: GlobalConfig = toml::from_str("").unwrap();
        assert!(config.github.token.is_none());
        assert!((config.validation.auto_promote_threshold - 0.95).abs() < f64::EPSILON);
    }

    #[test]
    fn test_global_config_deserialize_with_values() {
        let toml_str = r#"
[validation]
auto_promote_threshold = 0.85

[github]
token = "ghp_example"
api_base = "https://github.internal/api/v3"
"#;
        let config: GlobalConfig = toml::from_str(toml_str).unwrap();
        assert!((config.validation.auto_promote_threshold - 0.85).abs() < f64::EPSILON);
        assert_eq!(config.github.token.as_deref(), Some("ghp_example"));
        assert_eq!(config.github.api_base, "https://github.internal/api/v3");
    }

    #[test]
    fn test_global_config_serde_roundtrip() {
        let config = GlobalConfig {
            validation: ValidationPolicy::default(),
            github: GitHubConfig {
                token: Some("ghp_x".to_string()),
                api_base: default_api_base(),
            },
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: GlobalConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.github.token.as_deref(), Some("ghp_x"));
    }
}
