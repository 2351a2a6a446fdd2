//! Task classification against expertise profiles
//!
//! Scoring: every keyword found in the task text counts twice, every file
//! pattern that matches at least one path counts once. Profiles that score
//! nothing are dropped; if nothing scores at all a neutral `general` match
//! is returned.

use super::profile::ExpertiseProfile;
use glob::Pattern;
use serde::{Deserialize, Serialize};

/// Weight of a keyword hit relative to a file-pattern hit
pub const KEYWORD_WEIGHT: usize = 2;
pub const FILE_PATTERN_WEIGHT: usize = 1;

/// Name of the fallback match when no profile scores
pub const GENERAL_EXPERTISE: &str = "general";

const GENERAL_FOCUS: &str =
    "Review overall correctness, readability, error handling and test coverage.";

/// A profile's score for one task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpertiseMatch {
    pub name: String,
    pub score: usize,
    pub focus: String,
    pub matched_keywords: Vec<String>,
    pub matched_patterns: Vec<String>,
}

impl ExpertiseMatch {
    /// The neutral match used when nothing scores
    pub fn general() -> Self {
        Self {
            name: GENERAL_EXPERTISE.to_string(),
            score: 0,
            focus: GENERAL_FOCUS.to_string(),
            matched_keywords: Vec::new(),
            matched_patterns: Vec::new(),
        }
    }

    pub fn is_general(&self) -> bool {
        self.name == GENERAL_EXPERTISE && self.score == 0
    }
}

/// Rank `profiles` for a task.
///
/// The result is never empty, sorted by descending score with ties kept in
/// declaration order.
///
/// # Example
///
/// ```
/// use council_domain::expertise::{classify_task, ExpertiseProfile};
///
/// let profiles = vec![
///     ExpertiseProfile::new("security", "Check auth").with_keywords(["auth", "jwt"]),
/// ];
/// let matches = classify_task("Add JWT Authentication", &[], &profiles);
/// assert_eq!(matches[0].name, "security");
/// assert_eq!(matches[0].score, 4);
/// ```
pub fn classify_task(
    text: &str,
    files: &[String],
    profiles: &[ExpertiseProfile],
) -> Vec<ExpertiseMatch> {
    let text_lower = text.to_lowercase();
    let normalized_files: Vec<String> = files.iter().map(|f| normalize_path(f)).collect();

    let mut matches: Vec<ExpertiseMatch> = profiles
        .iter()
        .map(|profile| score_profile(profile, &text_lower, &normalized_files))
        .filter(|m| m.score > 0)
        .collect();

    if matches.is_empty() {
        return vec![ExpertiseMatch::general()];
    }

    // sort_by is stable: equal scores keep declaration order
    matches.sort_by(|a, b| b.score.cmp(&a.score));
    matches
}

fn score_profile(profile: &ExpertiseProfile, text_lower: &str, files: &[String]) -> ExpertiseMatch {
    let matched_keywords: Vec<String> = profile
        .keywords
        .iter()
        .filter(|k| {
            let k = k.trim().to_lowercase();
            !k.is_empty() && text_lower.contains(&k)
        })
        .cloned()
        .collect();

    let matched_patterns: Vec<String> = profile
        .file_patterns
        .iter()
        .filter(|p| !p.trim().is_empty() && files.iter().any(|f| glob_match(p, f)))
        .cloned()
        .collect();

    ExpertiseMatch {
        name: profile.name.clone(),
        score: KEYWORD_WEIGHT * matched_keywords.len()
            + FILE_PATTERN_WEIGHT * matched_patterns.len(),
        focus: profile.focus.clone(),
        matched_keywords,
        matched_patterns,
    }
}

/// Match a path against a glob pattern with substring fallback.
fn glob_match(pattern: &str, path: &str) -> bool {
    let pattern_normalized = normalize_path(pattern);

    match Pattern::new(&pattern_normalized) {
        Ok(glob) => glob.matches(path),
        Err(_) => path.contains(&pattern_normalized.replace('*', "")),
    }
}

fn normalize_path(path: &str) -> String {
    let path = path.trim().replace('\\', "/");
    path.strip_prefix("./").map(str::to_string).unwrap_or(path)
}
