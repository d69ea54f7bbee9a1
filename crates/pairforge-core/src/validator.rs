//! Completeness validation for AI-generated file content.
//!
//! The validator is a pure weighted checklist: each triggered check subtracts
//! its policy penalty from 1.0, floored at 0.0, and contributes exactly one
//! issue string. Checks run in a fixed order so the issue list is stable for
//! identical input. No I/O, no clock, no randomness.

use pairforge_types::validation::{CompletenessReport, Language, ValidationPolicy};

/// Fixed phrases that indicate the model cut its output short.
///
/// Matched case-insensitively as substrings. A plain ellipsis is included:
/// real source rarely contains one, and a false positive only lowers the
/// score into manual review rather than blocking anything.
const TRUNCATION_MARKERS: &[&str] = &[
    "...",
    "[truncated]",
    "[continued]",
    "rest of code",
    "rest of the code",
    "remaining implementation",
    "continue from here",
];

/// Stub phrases that indicate unfinished sections.
const PLACEHOLDER_MARKERS: &[&str] = &[
    "todo: implement",
    "not implemented",
    "notimplementederror",
    "unimplemented!()",
    "todo!()",
    "your code here",
    "implementation goes here",
    "pass  # todo",
    "pass # todo",
];

/// Delimiter pairs checked for truncation and balance.
const DELIMITERS: &[(char, char, &str)] = &[
    ('{', '}', "braces"),
    ('[', ']', "brackets"),
    ('(', ')', "parentheses"),
];

/// Scores file content for completeness against a [`ValidationPolicy`].
///
/// Checks, in order:
/// 1. truncation markers or unclosed delimiters
/// 2. minimum content length
/// 3. structural completeness for recognized languages
/// 4. placeholder/stub markers
/// 5. delimiter and quote balance
#[derive(Debug, Clone)]
pub struct CompletenessValidator {
    policy: ValidationPolicy,
}

impl CompletenessValidator {
    /// Create a validator with the given policy.
    pub fn new(policy: ValidationPolicy) -> Self {
        Self { policy }
    }

    /// Access the active policy.
    pub fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }

    /// Score `content` destined for `filename`.
    ///
    /// Empty or whitespace-only content short-circuits to a zero score with
    /// a single issue; callers that refuse empty input outright (the draft
    /// pipeline does) never reach this path.
    pub fn score(&self, filename: &str, content: &str) -> CompletenessReport {
        let language = detect_language(filename, content);

        if content.trim().is_empty() {
            return CompletenessReport {
                score: 0.0,
                issues: vec!["empty content".to_string()],
                language,
            };
        }

        let lower = content.to_lowercase();
        let mut issues = Vec::new();
        let mut penalty = 0.0;

        if let Some(issue) = self.check_truncation(content, &lower) {
            penalty += self.policy.truncation_penalty;
            issues.push(issue);
        }

        if content.chars().count() < self.policy.min_content_length {
            penalty += self.policy.min_length_penalty;
            issues.push(format!(
                "content shorter than {} characters",
                self.policy.min_content_length
            ));
        }

        if let Some(issue) = check_structure(language, content) {
            penalty += self.policy.structure_penalty;
            issues.push(issue);
        }

        if let Some(issue) = check_placeholders(&lower) {
            penalty += self.policy.placeholder_penalty;
            issues.push(issue);
        }

        if let Some(issue) = self.check_balance(content) {
            penalty += self.policy.balance_penalty;
            issues.push(issue);
        }

        CompletenessReport {
            score: round_score((1.0 - penalty).max(0.0)),
            issues,
            language,
        }
    }

    /// Check 1: known truncation phrases, or opening delimiters exceeding
    /// closers by more than the tolerance. One issue regardless of how many
    /// markers match.
    fn check_truncation(&self, content: &str, lower: &str) -> Option<String> {
        let found: Vec<&str> = TRUNCATION_MARKERS
            .iter()
            .filter(|marker| lower.contains(&marker.to_lowercase()))
            .copied()
            .collect();

        if !found.is_empty() {
            return Some(format!("truncation markers found: {}", found.join(", ")));
        }

        for (open, close, _) in DELIMITERS {
            let opens = content.matches(*open).count();
            let closes = content.matches(*close).count();
            if opens > closes + self.policy.delimiter_tolerance {
                return Some("unclosed delimiters suggest truncated output".to_string());
            }
        }

        None
    }

    /// Check 5: delimiters unbalanced beyond the tolerance in either
    /// direction, or an odd number of double quotes.
    fn check_balance(&self, content: &str) -> Option<String> {
        let mut unbalanced = Vec::new();

        for (open, close, name) in DELIMITERS {
            let opens = content.matches(*open).count();
            let closes = content.matches(*close).count();
            if opens.abs_diff(closes) > self.policy.delimiter_tolerance {
                unbalanced.push(*name);
            }
        }

        if content.matches('"').count() % 2 != 0 {
            unbalanced.push("quotes");
        }

        if unbalanced.is_empty() {
            None
        } else {
            Some(format!("unbalanced {}", unbalanced.join(", ")))
        }
    }
}

impl Default for CompletenessValidator {
    fn default() -> Self {
        Self::new(ValidationPolicy::default())
    }
}

/// Detect the language from the filename extension, with a shebang sniff as
/// fallback for extensionless scripts.
pub fn detect_language(filename: &str, content: &str) -> Language {
    let lower = filename.to_lowercase();

    if lower.ends_with(".py") {
        return Language::Python;
    }
    if lower.ends_with(".js")
        || lower.ends_with(".jsx")
        || lower.ends_with(".ts")
        || lower.ends_with(".tsx")
    {
        return Language::JavaScript;
    }
    if lower.ends_with(".rs") {
        return Language::Rust;
    }
    if lower.ends_with(".html") || lower.ends_with(".htm") {
        return Language::Html;
    }
    if lower.ends_with(".css") || lower.ends_with(".scss") {
        return Language::Css;
    }

    if let Some(first_line) = content.lines().next() {
        if first_line.starts_with("#!") {
            if first_line.contains("python") {
                return Language::Python;
            }
            if first_line.contains("node") {
                return Language::JavaScript;
            }
        }
    }

    Language::Unknown
}

/// Check 3: a recognizable source file must contain at least one structural
/// element of its language. Unknown content skips the check.
fn check_structure(language: Language, content: &str) -> Option<String> {
    let markers: &[&str] = match language {
        Language::Python => &["def ", "class ", "import ", "from ", "async def "],
        Language::JavaScript => &[
            "function", "=>", "const ", "let ", "var ", "class ", "import ", "export ",
        ],
        Language::Rust => &[
            "fn ", "struct ", "enum ", "impl ", "trait ", "mod ", "use ", "macro_rules!",
        ],
        Language::Html => &["<"],
        Language::Css => &["{"],
        Language::Unknown => return None,
    };

    if markers.iter().any(|m| content.contains(m)) {
        None
    } else {
        Some(format!("no recognizable {language} structure"))
    }
}

/// Check 4: stub markers. One issue regardless of how many match.
fn check_placeholders(lower: &str) -> Option<String> {
    let found: Vec<&str> = PLACEHOLDER_MARKERS
        .iter()
        .filter(|marker| lower.contains(*marker))
        .copied()
        .collect();

    if found.is_empty() {
        None
    } else {
        Some(format!("placeholder markers found: {}", found.join(", ")))
    }
}

/// Round to three decimals so computed scores compare exactly against
/// policy thresholds expressed as decimal literals.
fn round_score(score: f64) -> f64 {
    (score * 1000.0).round() / 1000.0
}
