//! Proposal entity
//!
//! A [`Proposal`] is mutated only through [`Proposal::apply`], which runs
//! the lifecycle [`transition`] and writes the result back.

use super::lifecycle::{LifecycleContext, LifecycleEvent, TransitionOutcome, transition};
use super::status::ProposalStatus;
use crate::core::identity::AgentIdentity;
use crate::quorum::{CastVote, ConsensusMode};
use crate::roles::{RoleAssignment, RoleConfig, RoleSlot};
use crate::util::current_timestamp;
use serde::{Deserialize, Serialize};

/// Unique identifier for a proposal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProposalId(String);

impl ProposalId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a new random ProposalId.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<T: Into<String>> From<T> for ProposalId {
    fn from(s: T) -> Self {
        Self::new(s)
    }
}

impl std::fmt::Display for ProposalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A proposed change moving through review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: ProposalId,
    pub title: String,
    pub content: String,
    status: ProposalStatus,
    pub planner: RoleSlot,
    /// Reviewer roster in assignment order
    pub reviewers: Vec<RoleSlot>,
    arbiter: Option<AgentIdentity>,
    #[serde(flatten)]
    lifecycle: LifecycleContext,
    /// Milliseconds since the Unix epoch
    pub created_at: u64,
    pub updated_at: u64,
}

impl Proposal {
    /// Create a draft proposal from a role assignment.
    pub fn new(
        id: impl Into<ProposalId>,
        title: impl Into<String>,
        content: impl Into<String>,
        assignment: &RoleAssignment,
        config: &RoleConfig,
    ) -> Self {
        let now = current_timestamp();
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            status: ProposalStatus::Draft,
            planner: assignment.planner.clone(),
            reviewers: assignment.reviewers.clone(),
            arbiter: None,
            lifecycle: LifecycleContext::new(config.max_iterations(), config.consensus_mode())
                .with_min_votes(config.min_votes()),
            created_at: now,
            updated_at: now,
        }
    }

    /// Feed one event through the lifecycle.
    ///
    /// Ignored events leave the proposal untouched, including `updated_at`.
    pub fn apply(&mut self, event: &LifecycleEvent) -> TransitionOutcome {
        let (status, ctx, outcome) = transition(self.status, event, self.lifecycle.clone());
        self.status = status;
        self.lifecycle = ctx;
        if outcome.is_applied() {
            self.updated_at = current_timestamp();
        }
        outcome
    }

    /// Bind the arbiter that settles the current dispute
    pub fn assign_arbiter(&mut self, arbiter: AgentIdentity) {
        self.arbiter = Some(arbiter);
        self.updated_at = current_timestamp();
    }

    // ==================== Accessors ====================

    pub fn status(&self) -> ProposalStatus {
        self.status
    }

    pub fn arbiter(&self) -> Option<&AgentIdentity> {
        self.arbiter.as_ref()
    }

    pub fn iterations(&self) -> u32 {
        self.lifecycle.iterations
    }

    pub fn max_iterations(&self) -> u32 {
        self.lifecycle.max_iterations
    }

    pub fn consensus_mode(&self) -> ConsensusMode {
        self.lifecycle.consensus_mode
    }

    pub fn min_votes(&self) -> usize {
        self.lifecycle.min_votes
    }

    /// Votes counted in the current iteration
    pub fn votes(&self) -> &[CastVote] {
        &self.lifecycle.votes
    }

    pub fn has_voted(&self, agent: &AgentIdentity) -> bool {
        self.lifecycle
            .votes
            .iter()
            .any(|v| v.agent.name() == agent.name())
    }

    /// Roster reviewers who have not voted in the current iteration
    pub fn pending_reviewers(&self) -> impl Iterator<Item = &RoleSlot> {
        self.reviewers
            .iter()
            .filter(|slot| !self.has_voted(&slot.identity))
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
