//! Completeness validation types.
//!
//! `ValidationPolicy` holds every tunable the validator and the promotion
//! pipeline consult: per-check penalties, the auto-promotion threshold, and
//! the pre-commit floor. Defaults match the shipped behavior; a `[validation]`
//! section in `config.toml` can override any field individually.

use serde::{Deserialize, Serialize};

use std::fmt;

/// Result of scoring one file's content for completeness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletenessReport {
    /// Completeness score, 0.0 to 1.0 (rounded to three decimals).
    pub score: f64,
    /// One issue per triggered check, in check order; empty for clean content.
    pub issues: Vec<String>,
    /// Language detected from the filename (or content shape).
    pub language: Language,
}

impl CompletenessReport {
    /// Whether no check was triggered.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Languages the structural completeness check recognizes.
///
/// Detection is by filename extension, with a shebang sniff as fallback.
/// Unknown content skips the structural check entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    JavaScript,
    Rust,
    Html,
    Css,
    Unknown,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Python => write!(f, "python"),
            Language::JavaScript => write!(f, "javascript"),
            Language::Rust => write!(f, "rust"),
            Language::Html => write!(f, "html"),
            Language::Css => write!(f, "css"),
            Language::Unknown => write!(f, "unknown"),
        }
    }
}

/// Tunable parameters for completeness validation and promotion decisions.
///
/// Each triggered check subtracts its penalty from 1.0, floored at 0.0.
/// `auto_promote_threshold` gates automatic promotion on submit (>= compares,
/// so an exact-threshold score promotes). `commit_floor` is the defensive
/// re-validation bound applied to every file before a commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationPolicy {
    /// Penalty for truncation markers or unclosed delimiters.
    #[serde(default = "default_truncation_penalty")]
    pub truncation_penalty: f64,

    /// Penalty for content shorter than `min_content_length`.
    #[serde(default = "default_min_length_penalty")]
    pub min_length_penalty: f64,

    /// Penalty for recognizable source files with no structural element.
    #[serde(default = "default_structure_penalty")]
    pub structure_penalty: f64,

    /// Penalty for placeholder/stub markers.
    #[serde(default = "default_placeholder_penalty")]
    pub placeholder_penalty: f64,

    /// Penalty for unbalanced delimiters or quotes.
    #[serde(default = "default_balance_penalty")]
    pub balance_penalty: f64,

    /// Minimum content length in characters before the length check triggers.
    #[serde(default = "default_min_content_length")]
    pub min_content_length: usize,

    /// Allowed difference between opening and closing delimiters. Quote
    /// balance ignores this (an odd quote count always counts as unbalanced).
    #[serde(default = "default_delimiter_tolerance")]
    pub delimiter_tolerance: usize,

    /// Score at or above which a submitted draft promotes automatically.
    #[serde(default = "default_auto_promote_threshold")]
    pub auto_promote_threshold: f64,

    /// Minimum score every file must reach for a commit to proceed.
    #[serde(default = "default_commit_floor")]
    pub commit_floor: f64,
}

fn default_truncation_penalty() -> f64 {
    0.30
}

fn default_min_length_penalty() -> f64 {
    0.20
}

fn default_structure_penalty() -> f64 {
    0.25
}

fn default_placeholder_penalty() -> f64 {
    0.15
}

fn default_balance_penalty() -> f64 {
    0.10
}

fn default_min_content_length() -> usize {
    50
}

fn default_delimiter_tolerance() -> usize {
    1
}

fn default_auto_promote_threshold() -> f64 {
    0.95
}

fn default_commit_floor() -> f64 {
    0.5
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            truncation_penalty: default_truncation_penalty(),
            min_length_penalty: default_min_length_penalty(),
            structure_penalty: default_structure_penalty(),
            placeholder_penalty: default_placeholder_penalty(),
            balance_penalty: default_balance_penalty(),
            min_content_length: default_min_content_length(),
            delimiter_tolerance: default_delimiter_tolerance(),
            auto_promote_threshold: default_auto_promote_threshold(),
            commit_floor: default_commit_floor(),
        }
    }
}
