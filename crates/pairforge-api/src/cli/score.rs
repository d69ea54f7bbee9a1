//! Completeness scoring command for local files.

use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use pairforge_core::validator::CompletenessValidator;
use pairforge_infra::config::{load_global_config, resolve_data_dir};
use pairforge_types::validation::{CompletenessReport, ValidationPolicy};

/// Score a local file and print the completeness report.
///
/// The policy comes from the global config file unless `--policy` points
/// at a TOML override.
pub async fn score(path: &Path, policy_path: Option<&Path>, json: bool) -> Result<()> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;

    let policy = match policy_path {
        Some(p) => {
            let text = tokio::fs::read_to_string(p)
                .await
                .with_context(|| format!("failed to read policy file {}", p.display()))?;
            toml::from_str::<ValidationPolicy>(&text)
                .with_context(|| format!("invalid policy file {}", p.display()))?
        }
        None => load_global_config(&resolve_data_dir()).await.validation,
    };

    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    let validator = CompletenessValidator::new(policy);
    let report = validator.score(&filename, &content);
    let verdict = verdict(&report, validator.policy());

    if json {
        let out = serde_json::json!({
            "filename": filename,
            "language": report.language.to_string(),
            "score": report.score,
            "issues": report.issues,
            "verdict": verdict,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!("  {} {}", style("🔍").bold(), style(&filename).cyan());
    println!();
    println!("  Language: {}", report.language);
    println!(
        "  Score:    {}",
        styled_score(report.score, validator.policy())
    );
    println!();

    if report.issues.is_empty() {
        println!("  {} no issues found", style("✓").green());
    } else {
        println!("  {}", style("── Issues ──").dim());
        for issue in &report.issues {
            println!("  {} {}", style("•").yellow(), issue);
        }
    }
    println!();
    println!("  Verdict: {}", styled_verdict(verdict));
    println!();

    Ok(())
}

/// Classify a report against the promotion threshold and the commit floor.
fn verdict(report: &CompletenessReport, policy: &ValidationPolicy) -> &'static str {
    if report.score >= policy.auto_promote_threshold {
        "auto-promote"
    } else if report.score >= policy.commit_floor {
        "needs review"
    } else {
        "below commit floor"
    }
}

fn styled_score(score: f64, policy: &ValidationPolicy) -> String {
    let text = format!("{score:.2}");
    if score >= policy.auto_promote_threshold {
        style(text).green().bold().to_string()
    } else if score >= policy.commit_floor {
        style(text).yellow().bold().to_string()
    } else {
        style(text).red().bold().to_string()
    }
}

fn styled_verdict(verdict: &str) -> String {
    match verdict {
        "auto-promote" => style(verdict).green().to_string(),
        "needs review" => style(verdict).yellow().to_string(),
        _ => style(verdict).red().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pairforge_types::validation::Language;

    fn report_with_score(score: f64) -> CompletenessReport {
        CompletenessReport {
            score,
            issues: Vec::new(),
            language: Language::Python,
        }
    }

    #[test]
    fn test_verdict_at_threshold_auto_promotes() {
        let policy = ValidationPolicy::default();
        assert_eq!(verdict(&report_with_score(0.95), &policy), "auto-promote");
        assert_eq!(verdict(&report_with_score(1.0), &policy), "auto-promote");
    }

    #[test]
    fn test_verdict_between_floor_and_threshold_needs_review() {
        let policy = ValidationPolicy::default();
        assert_eq!(verdict(&report_with_score(0.94), &policy), "needs review");
        assert_eq!(verdict(&report_with_score(0.5), &policy), "needs review");
    }

    #[test]
    fn test_verdict_below_floor() {
        let policy = ValidationPolicy::default();
        assert_eq!(
            verdict(&report_with_score(0.49), &policy),
            "below commit floor"
        );
    }
}
