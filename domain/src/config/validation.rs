//! Structured configuration issues.
//!
//! Validation never stops at the first problem: it returns every detected
//! [`ConfigIssue`] with a [`Severity`]. Callers refuse to start when any
//! issue is an [`Severity::Error`] and log the warnings.
//!
//! # Examples
//!
//! ```
//! use council_domain::config::{ConfigIssue, Severity};
//!
//! let issues = vec![ConfigIssue::warning_no_arbiters()];
//! assert!(!ConfigIssue::has_errors(&issues));
//! assert_eq!(issues[0].severity, Severity::Warning);
//! ```

use crate::core::error::DomainError;
use crate::quorum::ConsensusMode;
use crate::roles::ArbiterStrategy;

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// No planner identity configured.
    EmptyPlanner,
    /// Reviewer list is missing or empty.
    NoReviewers,
    /// An identity name in a list is blank.
    EmptyIdentityName { field: String },
    /// An enum-valued string did not parse; the default is used instead.
    InvalidEnumValue {
        field: String,
        value: String,
        valid_values: Vec<String>,
    },
    /// `max_iterations` is zero.
    InvalidMaxIterations,
    /// No arbiter candidates: disputes can only be settled by a human.
    NoArbiters,
    /// The same reviewer appears more than once.
    DuplicateReviewer { name: String },
    /// `min_votes` is zero or larger than the distinct reviewer roster.
    UnreachableMinVotes { min_votes: usize, reviewers: usize },
    /// An expertise profile has neither keywords nor file patterns.
    EmptyExpertiseProfile { name: String },
}

/// A detected issue in the configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn warning_no_arbiters() -> Self {
        Self::warning(
            ConfigIssueCode::NoArbiters,
            "roles.arbiters: no arbiter candidates, disputes will wait for a human decision",
        )
    }

    /// Check whether any issues are errors (i.e. fatal).
    pub fn has_errors(issues: &[ConfigIssue]) -> bool {
        issues.iter().any(|i| i.severity == Severity::Error)
    }
}

impl From<&DomainError> for ConfigIssue {
    fn from(error: &DomainError) -> Self {
        let invalid = |field: &str, value: &str, valid_values: Vec<String>| {
            ConfigIssueCode::InvalidEnumValue {
                field: field.to_string(),
                value: value.to_string(),
                valid_values,
            }
        };
        let code = match error {
            DomainError::EmptyPlanner => ConfigIssueCode::EmptyPlanner,
            DomainError::NoReviewers => ConfigIssueCode::NoReviewers,
            DomainError::EmptyIdentity(field) => ConfigIssueCode::EmptyIdentityName {
                field: field.clone(),
            },
            DomainError::InvalidMaxIterations => ConfigIssueCode::InvalidMaxIterations,
            DomainError::UnreachableMinVotes {
                min_votes,
                reviewers,
            } => ConfigIssueCode::UnreachableMinVotes {
                min_votes: *min_votes,
                reviewers: *reviewers,
            },
            DomainError::InvalidVote(value) => invalid(
                "vote",
                value,
                vec!["approve".into(), "reject".into(), "revise".into()],
            ),
            DomainError::InvalidConsensusMode(value) => {
                invalid("consensus_mode", value, ConsensusMode::valid_values())
            }
            DomainError::InvalidStrategy(value) => {
                invalid("arbiter_strategy", value, ArbiterStrategy::valid_values())
            }
        };
        let severity = if error.is_fatal_config() {
            Severity::Error
        } else {
            Severity::Warning
        };
        Self {
            severity,
            code,
            message: error.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {}", level, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_errors() {
        let warn = ConfigIssue::warning_no_arbiters();
        let err = ConfigIssue::error(ConfigIssueCode::EmptyPlanner, "roles.planner is empty");

        assert!(!ConfigIssue::has_errors(&[warn.clone()]));
        assert!(ConfigIssue::has_errors(&[warn, err]));
        assert!(!ConfigIssue::has_errors(&[]));
    }

    #[test]
    fn test_from_domain_error() {
        let issue = ConfigIssue::from(&DomainError::NoReviewers);
        assert_eq!(issue.severity, Severity::Error);
        assert_eq!(issue.code, ConfigIssueCode::NoReviewers);

        let issue = ConfigIssue::from(&DomainError::UnreachableMinVotes {
            min_votes: 4,
            reviewers: 2,
        });
        assert_eq!(issue.severity, Severity::Error);
        assert_eq!(
            issue.code,
            ConfigIssueCode::UnreachableMinVotes {
                min_votes: 4,
                reviewers: 2
            }
        );

        let issue = ConfigIssue::from(&DomainError::InvalidStrategy("coin".to_string()));
        assert_eq!(issue.severity, Severity::Warning);
        assert!(matches!(
            issue.code,
            ConfigIssueCode::InvalidEnumValue { ref field, .. } if field == "arbiter_strategy"
        ));
    }

    #[test]
    fn test_display() {
        let err = ConfigIssue::error(ConfigIssueCode::NoReviewers, "roles.reviewers is empty");
        assert_eq!(err.to_string(), "error: roles.reviewers is empty");
    }
}
