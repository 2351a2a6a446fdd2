//! Vote types for review consensus
//!
//! This module defines the voting primitives cast by reviewing agents.

use crate::core::error::DomainError;
use crate::core::identity::AgentIdentity;
use serde::{Deserialize, Serialize};

/// A reviewer's verdict on a proposal within one iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Vote {
    Approve,
    Reject,
    Revise,
}

impl Vote {
    pub fn as_str(&self) -> &'static str {
        match self {
            Vote::Approve => "APPROVE",
            Vote::Reject => "REJECT",
            Vote::Revise => "REVISE",
        }
    }

    /// Single-character glyph used in vote summaries
    pub fn glyph(&self) -> char {
        match self {
            Vote::Approve => '●',
            Vote::Reject => '○',
            Vote::Revise => '◐',
        }
    }

    pub fn is_approve(&self) -> bool {
        matches!(self, Vote::Approve)
    }

    pub fn is_reject(&self) -> bool {
        matches!(self, Vote::Reject)
    }

    pub fn is_revise(&self) -> bool {
        matches!(self, Vote::Revise)
    }
}

impl std::fmt::Display for Vote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Vote {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "approve" | "approved" | "a" | "yes" => Ok(Vote::Approve),
            "reject" | "rejected" | "r" | "no" => Ok(Vote::Reject),
            "revise" | "revision" | "changes" => Ok(Vote::Revise),
            _ => Err(DomainError::InvalidVote(s.to_string())),
        }
    }
}

/// A vote attributed to the agent that cast it
///
/// # Example
///
/// ```
/// use council_domain::quorum::{CastVote, Vote};
///
/// let vote = CastVote::new("claude-opus", Vote::Approve);
/// assert_eq!(vote.agent.family(), "claude");
/// assert!(vote.vote.is_approve());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastVote {
    pub agent: AgentIdentity,
    pub vote: Vote,
}

impl CastVote {
    pub fn new(agent: impl Into<AgentIdentity>, vote: Vote) -> Self {
        Self {
            agent: agent.into(),
            vote,
        }
    }
}

/// Counts of each vote kind in an ordered vote list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    pub approve: usize,
    pub reject: usize,
    pub revise: usize,
}

impl VoteTally {
    pub fn from_votes(votes: &[CastVote]) -> Self {
        votes.iter().fold(Self::default(), |mut tally, v| {
            match v.vote {
                Vote::Approve => tally.approve += 1,
                Vote::Reject => tally.reject += 1,
                Vote::Revise => tally.revise += 1,
            }
            tally
        })
    }

    pub fn total(&self) -> usize {
        self.approve + self.reject + self.revise
    }

    /// Every vote is APPROVE (false for an empty tally)
    pub fn all_approve(&self) -> bool {
        self.total() > 0 && self.approve == self.total()
    }

    /// Every vote is REJECT (false for an empty tally)
    pub fn all_reject(&self) -> bool {
        self.total() > 0 && self.reject == self.total()
    }
}

/// Generate a visual vote summary (e.g., "[●●○]")
pub fn vote_summary(votes: &[CastVote]) -> String {
    let mut summary = String::from("[");
    for v in votes {
        summary.push(v.vote.glyph());
    }
    summary.push(']');
    summary
}
