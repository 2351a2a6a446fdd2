//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("No planner identity configured")]
    EmptyPlanner,

    #[error("No reviewer identities configured")]
    NoReviewers,

    #[error("Identity name cannot be empty ({0})")]
    EmptyIdentity(String),

    #[error("max_iterations must be greater than zero")]
    InvalidMaxIterations,

    #[error("min_votes must be between 1 and {reviewers} (distinct reviewers), got {min_votes}")]
    UnreachableMinVotes { min_votes: usize, reviewers: usize },

    #[error("Invalid vote: {0}")]
    InvalidVote(String),

    #[error("Invalid consensus mode: {0}")]
    InvalidConsensusMode(String),

    #[error("Invalid arbiter strategy: {0}")]
    InvalidStrategy(String),
}

impl DomainError {
    /// Whether this error makes a role configuration unusable at startup
    pub fn is_fatal_config(&self) -> bool {
        matches!(
            self,
            DomainError::EmptyPlanner
                | DomainError::NoReviewers
                | DomainError::EmptyIdentity(_)
                | DomainError::InvalidMaxIterations
                | DomainError::UnreachableMinVotes { .. }
        )
    }
}
