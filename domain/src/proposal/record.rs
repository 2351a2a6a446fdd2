//! Review and decision records
//!
//! Records are append-only facts kept next to a proposal. A [`Decision`] is
//! never made up on its own: [`Decision::for_transition`] derives it from
//! the event and transition that produced it.

use super::entities::{Proposal, ProposalId};
use super::lifecycle::{LifecycleEvent, TransitionOutcome};
use super::status::ProposalStatus;
use crate::core::identity::AgentIdentity;
use crate::quorum::Vote;
use crate::util::current_timestamp;
use serde::{Deserialize, Serialize};

/// Identifier of a review: `<proposal>/<iteration>/<sequence>`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReviewId(String);

impl ReviewId {
    pub fn new(proposal: &ProposalId, iteration: u32, sequence: usize) -> Self {
        Self(format!("{}/{}/{}", proposal, iteration, sequence))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ReviewId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Number of findings per severity reported by a reviewer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityBreakdown {
    pub critical: u32,
    pub high: u32,
    pub medium: u32,
    pub low: u32,
}

impl SeverityBreakdown {
    pub fn total(&self) -> u32 {
        self.critical + self.high + self.medium + self.low
    }

    pub fn has_blocking(&self) -> bool {
        self.critical > 0 || self.high > 0
    }
}

/// A reviewer's submitted review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub proposal_id: ProposalId,
    pub agent: AgentIdentity,
    pub vote: Vote,
    pub content: String,
    pub severity: Option<SeverityBreakdown>,
    /// Iteration the vote was cast in
    pub iteration: u32,
    /// False when the vote arrived after the proposal left `pending_review`
    pub counted: bool,
    pub created_at: u64,
}

impl Review {
    pub fn new(
        id: ReviewId,
        proposal_id: ProposalId,
        agent: AgentIdentity,
        vote: Vote,
        content: impl Into<String>,
        iteration: u32,
    ) -> Self {
        Self {
            id,
            proposal_id,
            agent,
            vote,
            content: content.into(),
            severity: None,
            iteration,
            counted: true,
            created_at: current_timestamp(),
        }
    }

    pub fn with_severity(mut self, severity: SeverityBreakdown) -> Self {
        self.severity = Some(severity);
        self
    }

    /// Mark as kept for audit only
    pub fn uncounted(mut self) -> Self {
        self.counted = false;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionOutcome {
    Approved,
    Rejected,
    /// Handed over to a human after the revision cap
    Deferred,
}

impl DecisionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionOutcome::Approved => "approved",
            DecisionOutcome::Rejected => "rejected",
            DecisionOutcome::Deferred => "deferred",
        }
    }
}

impl std::fmt::Display for DecisionOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Who produced a decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionSource {
    Consensus,
    Arbiter,
    Human,
    Escalation,
}

impl DecisionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionSource::Consensus => "consensus",
            DecisionSource::Arbiter => "arbiter",
            DecisionSource::Human => "human",
            DecisionSource::Escalation => "escalation",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub proposal_id: ProposalId,
    pub outcome: DecisionOutcome,
    pub source: DecisionSource,
    pub summary: String,
    pub created_at: u64,
}

impl Decision {
    /// Derive the decision, if any, produced by applying `event`.
    ///
    /// `proposal` is the state after the event. Only status changes into
    /// approved, rejected or escalated produce a decision.
    pub fn for_transition(
        proposal: &Proposal,
        event: &LifecycleEvent,
        outcome: &TransitionOutcome,
    ) -> Option<Decision> {
        let TransitionOutcome::Applied {
            from,
            to,
            consensus,
        } = outcome
        else {
            return None;
        };
        if from == to {
            return None;
        }

        let decided = match to {
            ProposalStatus::Approved => DecisionOutcome::Approved,
            ProposalStatus::Rejected => DecisionOutcome::Rejected,
            ProposalStatus::Escalated => DecisionOutcome::Deferred,
            _ => return None,
        };

        let (source, summary) = match event {
            LifecycleEvent::ReviewReceived { .. } => {
                let votes = consensus
                    .as_ref()
                    .map(|c| format!("{} ({})", c.summary, c.mode))
                    .unwrap_or_default();
                (
                    DecisionSource::Consensus,
                    format!("Reviewers reached consensus: {} {}", decided, votes),
                )
            }
            LifecycleEvent::ArbiterDecision { vote } => {
                let arbiter = proposal
                    .arbiter()
                    .map(|a| a.name().to_string())
                    .unwrap_or_else(|| "arbiter".to_string());
                (
                    DecisionSource::Arbiter,
                    format!("Dispute settled by {} with {}", arbiter, vote),
                )
            }
            LifecycleEvent::HumanDecision { approved } => (
                DecisionSource::Human,
                format!(
                    "Human decision after {}: {}",
                    from,
                    if *approved { "approve" } else { "reject" }
                ),
            ),
            LifecycleEvent::Revised => (
                DecisionSource::Escalation,
                format!(
                    "Revision limit reached after {} of {} iterations; deferred to a human",
                    proposal.iterations(),
                    proposal.max_iterations()
                ),
            ),
            _ => return None,
        };

        Some(Decision {
            proposal_id: proposal.id.clone(),
            outcome: decided,
            source,
            summary,
            created_at: current_timestamp(),
        })
    }
}
