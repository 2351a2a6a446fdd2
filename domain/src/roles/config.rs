//! Role configuration
//!
//! [`RoleConfig`] is supplied once at startup and never mutated. Missing
//! planner or reviewers are fatal: [`RoleConfig::new`] refuses to build
//! such a configuration.

use crate::config::validation::{ConfigIssue, ConfigIssueCode};
use crate::core::error::DomainError;
use crate::core::identity::AgentIdentity;
use crate::quorum::ConsensusMode;
use serde::{Deserialize, Serialize};

/// Default cap on revision cycles before escalation
pub const DEFAULT_MAX_ITERATIONS: u32 = 3;

/// How an arbiter is chosen among eligible candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArbiterStrategy {
    /// Fewest prior arbitrations wins, ties by configuration order
    #[default]
    RoundRobin,
    /// Same selection as `RoundRobin`
    LeastUsed,
    /// First eligible candidate in configuration order
    Specific,
}

impl ArbiterStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArbiterStrategy::RoundRobin => "round-robin",
            ArbiterStrategy::LeastUsed => "least-used",
            ArbiterStrategy::Specific => "specific",
        }
    }

    pub fn valid_values() -> Vec<String> {
        vec![
            "round-robin".to_string(),
            "least-used".to_string(),
            "specific".to_string(),
        ]
    }

    /// Whether selection balances by arbitration count
    pub fn balances_load(&self) -> bool {
        matches!(self, ArbiterStrategy::RoundRobin | ArbiterStrategy::LeastUsed)
    }
}

impl std::fmt::Display for ArbiterStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ArbiterStrategy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "round-robin" | "roundrobin" | "rr" => Ok(ArbiterStrategy::RoundRobin),
            "least-used" | "leastused" => Ok(ArbiterStrategy::LeastUsed),
            "specific" | "first" => Ok(ArbiterStrategy::Specific),
            _ => Err(DomainError::InvalidStrategy(s.to_string())),
        }
    }
}

/// Who plans, who reviews, who arbitrates, and how proposals are bounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleConfig {
    planner: AgentIdentity,
    reviewers: Vec<AgentIdentity>,
    arbiters: Vec<AgentIdentity>,
    strategy: ArbiterStrategy,
    max_iterations: u32,
    consensus_mode: ConsensusMode,
    /// `None` waits for the whole distinct roster
    min_votes: Option<usize>,
}

impl RoleConfig {
    /// Build a role configuration, rejecting an empty planner or roster.
    pub fn new(
        planner: AgentIdentity,
        reviewers: Vec<AgentIdentity>,
    ) -> Result<Self, DomainError> {
        if planner.name().trim().is_empty() {
            return Err(DomainError::EmptyPlanner);
        }
        if reviewers.is_empty() {
            return Err(DomainError::NoReviewers);
        }
        if reviewers.iter().any(|r| r.name().trim().is_empty()) {
            return Err(DomainError::EmptyIdentity("reviewers".to_string()));
        }

        Ok(Self {
            planner,
            reviewers,
            arbiters: Vec::new(),
            strategy: ArbiterStrategy::default(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            consensus_mode: ConsensusMode::default(),
            min_votes: None,
        })
    }

    pub fn with_arbiters(mut self, arbiters: Vec<AgentIdentity>) -> Result<Self, DomainError> {
        if arbiters.iter().any(|a| a.name().trim().is_empty()) {
            return Err(DomainError::EmptyIdentity("arbiters".to_string()));
        }
        self.arbiters = arbiters;
        Ok(self)
    }

    pub fn with_strategy(mut self, strategy: ArbiterStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: u32) -> Result<Self, DomainError> {
        if max_iterations == 0 {
            return Err(DomainError::InvalidMaxIterations);
        }
        self.max_iterations = max_iterations;
        Ok(self)
    }

    pub fn with_consensus_mode(mut self, mode: ConsensusMode) -> Self {
        self.consensus_mode = mode;
        self
    }

    /// Votes required before approve / reject / dispute verdicts fire.
    ///
    /// Must lie between 1 and the number of distinct reviewers.
    pub fn with_min_votes(mut self, min_votes: usize) -> Result<Self, DomainError> {
        let reviewers = self.distinct_reviewers();
        if min_votes == 0 || min_votes > reviewers {
            return Err(DomainError::UnreachableMinVotes {
                min_votes,
                reviewers,
            });
        }
        self.min_votes = Some(min_votes);
        Ok(self)
    }

    // ==================== Accessors ====================

    pub fn planner(&self) -> &AgentIdentity {
        &self.planner
    }

    pub fn reviewers(&self) -> &[AgentIdentity] {
        &self.reviewers
    }

    pub fn arbiters(&self) -> &[AgentIdentity] {
        &self.arbiters
    }

    pub fn strategy(&self) -> ArbiterStrategy {
        self.strategy
    }

    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    pub fn consensus_mode(&self) -> ConsensusMode {
        self.consensus_mode
    }

    /// Effective quorum: the configured value or every distinct reviewer
    pub fn min_votes(&self) -> usize {
        self.min_votes.unwrap_or_else(|| self.distinct_reviewers())
    }

    fn distinct_reviewers(&self) -> usize {
        let mut seen = std::collections::HashSet::new();
        self.reviewers.iter().filter(|r| seen.insert(r.name())).count()
    }

    /// Resolve an agent name to its configured identity.
    ///
    /// Unknown names get an identity with a derived family.
    pub fn identity(&self, name: &str) -> AgentIdentity {
        std::iter::once(&self.planner)
            .chain(&self.reviewers)
            .chain(&self.arbiters)
            .find(|id| id.name() == name)
            .cloned()
            .unwrap_or_else(|| AgentIdentity::new(name))
    }

    /// Non-fatal issues in an otherwise valid configuration
    pub fn warnings(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.arbiters.is_empty() {
            issues.push(ConfigIssue::warning_no_arbiters());
        }

        let mut seen = std::collections::HashSet::new();
        for reviewer in &self.reviewers {
            if !seen.insert(reviewer.name()) {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::DuplicateReviewer {
                        name: reviewer.name().to_string(),
                    },
                    format!("roles.reviewers: '{}' is listed more than once", reviewer),
                ));
            }
        }

        issues
    }
}
