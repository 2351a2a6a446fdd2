//! Review settings from TOML (`[review]` section)
//!
//! Example configuration:
//!
//! ```toml
//! [review]
//! max_iterations = 3
//! consensus_mode = "unanimous"   # or "majority"
//! min_votes = 2
//! ```

use council_domain::config::{ConfigIssue, ConfigIssueCode};
use council_domain::roles::DEFAULT_MAX_ITERATIONS;
use council_domain::ConsensusMode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileReviewConfig {
    /// Revision cycles before a proposal is escalated to a human
    pub max_iterations: u32,
    /// "majority" or "unanimous"
    pub consensus_mode: String,
    /// Votes required before approve / reject / dispute verdicts apply.
    /// Unset means every distinct reviewer must vote.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_votes: Option<usize>,
}

impl Default for FileReviewConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            consensus_mode: ConsensusMode::default().as_str().to_string(),
            min_votes: None,
        }
    }
}

impl FileReviewConfig {
    /// Parse consensus_mode string into ConsensusMode enum
    ///
    /// Falls back to `ConsensusMode::default()` on parse failure.
    pub fn parse_consensus_mode(&self) -> (ConsensusMode, Vec<ConfigIssue>) {
        match self.consensus_mode.parse::<ConsensusMode>() {
            Ok(mode) => (mode, vec![]),
            Err(_) => {
                let fallback = ConsensusMode::default();
                let issue = ConfigIssue::warning(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "review.consensus_mode".to_string(),
                        value: self.consensus_mode.clone(),
                        valid_values: ConsensusMode::valid_values(),
                    },
                    format!(
                        "review.consensus_mode: unknown value '{}', falling back to '{}'",
                        self.consensus_mode, fallback
                    ),
                );
                (fallback, vec![issue])
            }
        }
    }

    /// A zero cap would escalate before any review could happen.
    pub fn parse_max_iterations(&self) -> (Option<u32>, Vec<ConfigIssue>) {
        if self.max_iterations == 0 {
            (
                None,
                vec![ConfigIssue::error(
                    ConfigIssueCode::InvalidMaxIterations,
                    "review.max_iterations: must be at least 1",
                )],
            )
        } else {
            (Some(self.max_iterations), vec![])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::config::Severity;

    #[test]
    fn test_review_config_default() {
        let config = FileReviewConfig::default();
        assert_eq!(config.max_iterations, 3);
        assert_eq!(config.consensus_mode, "majority");
        assert_eq!(config.min_votes, None);
    }

    #[test]
    fn test_review_config_deserialize() {
        let toml_str = r#"
[review]
max_iterations = 5
consensus_mode = "unanimous"
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.review.max_iterations, 5);
        assert_eq!(config.review.min_votes, None);
        assert_eq!(
            config.review.parse_consensus_mode().0,
            ConsensusMode::Unanimous
        );
    }

    #[test]
    fn test_invalid_consensus_mode_falls_back() {
        let config = FileReviewConfig {
            consensus_mode: "plurality".to_string(),
            ..Default::default()
        };
        let (mode, issues) = config.parse_consensus_mode();
        assert_eq!(mode, ConsensusMode::Majority);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
    }

    #[test]
    fn test_zero_max_iterations_is_error() {
        let config = FileReviewConfig {
            max_iterations: 0,
            ..Default::default()
        };
        let (value, issues) = config.parse_max_iterations();
        assert!(value.is_none());
        assert_eq!(issues[0].severity, Severity::Error);
    }
}
