//! Proposal lifecycle state machine
//!
//! A closed set of states ([`ProposalStatus`]), a closed set of events
//! ([`LifecycleEvent`]) and one pure [`transition`] function.
//!
//! ```text
//!  draft ──CREATE──▶ pending_review ◀──────────REVISED (under cap)──┐
//!                        │                                          │
//!          REVIEW_RECEIVED (re-evaluate consensus)                  │
//!        ┌───────────┬───┴────────┬─────────────┐                   │
//!        ▼           ▼            ▼             ▼                   │
//!    approved     rejected     disputed      revision ──────────────┘
//!        │                    │      │          │
//!        │      ARBITER / HUMAN      │          └─REVISED (cap)─▶ escalated
//!        │                    ▼      ▼                               │
//!        │               approved  rejected ◀──────HUMAN──────────────┘
//!        └─IMPLEMENTATION_COMPLETE─▶ implemented
//! ```
//!
//! Events that have no transition from the current state are not errors:
//! they come back as [`TransitionOutcome::Ignored`] so the caller can audit
//! them and move on.

use super::status::ProposalStatus;
use crate::core::identity::AgentIdentity;
use crate::quorum::{CastVote, ConsensusMode, ConsensusOutcome, ConsensusResult, Vote, evaluate};
use serde::{Deserialize, Serialize};

/// Inputs that drive the lifecycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LifecycleEvent {
    Create,
    ReviewReceived { agent: AgentIdentity, vote: Vote },
    Revised,
    ArbiterDecision { vote: Vote },
    HumanDecision { approved: bool },
    ImplementationComplete,
}

impl LifecycleEvent {
    pub fn name(&self) -> &'static str {
        match self {
            LifecycleEvent::Create => "CREATE",
            LifecycleEvent::ReviewReceived { .. } => "REVIEW_RECEIVED",
            LifecycleEvent::Revised => "REVISED",
            LifecycleEvent::ArbiterDecision { .. } => "ARBITER_DECISION",
            LifecycleEvent::HumanDecision { .. } => "HUMAN_DECISION",
            LifecycleEvent::ImplementationComplete => "IMPLEMENTATION_COMPLETE",
        }
    }
}

impl std::fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Mutable lifecycle data carried alongside the status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleContext {
    /// Completed revision cycles
    pub iterations: u32,
    pub max_iterations: u32,
    pub consensus_mode: ConsensusMode,
    /// Votes needed before approve / reject / dispute verdicts apply
    pub min_votes: usize,
    /// Votes of the current iteration, in arrival order
    pub votes: Vec<CastVote>,
}

impl LifecycleContext {
    pub fn new(max_iterations: u32, consensus_mode: ConsensusMode) -> Self {
        Self {
            iterations: 0,
            max_iterations: max_iterations.max(1),
            consensus_mode,
            min_votes: 1,
            votes: Vec::new(),
        }
    }

    pub fn with_min_votes(mut self, min_votes: usize) -> Self {
        self.min_votes = min_votes.max(1);
        self
    }

    /// Whether the next REVISED must escalate instead of looping
    pub fn revision_cap_reached(&self) -> bool {
        self.iterations.saturating_add(1) >= self.max_iterations
    }
}

/// Why an event did not change anything
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    /// No transition is defined for this (state, event) pair
    NoTransition,
    /// Arbiters settle disputes with APPROVE or REJECT only
    ArbiterCannotRevise,
    /// The agent already voted in this iteration
    DuplicateVote,
}

impl IgnoreReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            IgnoreReason::NoTransition => "no_transition",
            IgnoreReason::ArbiterCannotRevise => "arbiter_cannot_revise",
            IgnoreReason::DuplicateVote => "duplicate_vote",
        }
    }
}

/// Result of feeding one event to the machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransitionOutcome {
    /// The event was accepted. `from == to` when a vote was recorded but
    /// did not settle the iteration.
    Applied {
        from: ProposalStatus,
        to: ProposalStatus,
        /// Present for REVIEW_RECEIVED
        consensus: Option<ConsensusResult>,
    },
    Ignored {
        state: ProposalStatus,
        event: String,
        reason: IgnoreReason,
    },
}

impl TransitionOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, TransitionOutcome::Applied { .. })
    }

    pub fn is_ignored(&self) -> bool {
        matches!(self, TransitionOutcome::Ignored { .. })
    }

    /// Whether the status changed
    pub fn changed_status(&self) -> bool {
        matches!(self, TransitionOutcome::Applied { from, to, .. } if from != to)
    }

    /// Status after the event
    pub fn status(&self) -> ProposalStatus {
        match self {
            TransitionOutcome::Applied { to, .. } => *to,
            TransitionOutcome::Ignored { state, .. } => *state,
        }
    }
}

fn applied(from: ProposalStatus, to: ProposalStatus) -> TransitionOutcome {
    TransitionOutcome::Applied {
        from,
        to,
        consensus: None,
    }
}

fn ignored(state: ProposalStatus, event: &LifecycleEvent, reason: IgnoreReason) -> TransitionOutcome {
    TransitionOutcome::Ignored {
        state,
        event: event.name().to_string(),
        reason,
    }
}

/// Apply one event.
///
/// Pure: `(state, event, context) → (state, context, outcome)`. An ignored
/// event returns the state and context unchanged.
///
/// # Example
///
/// ```
/// use council_domain::proposal::{transition, LifecycleContext, LifecycleEvent, ProposalStatus};
/// use council_domain::quorum::{ConsensusMode, Vote};
/// use council_domain::AgentIdentity;
///
/// let ctx = LifecycleContext::new(3, ConsensusMode::Majority);
/// let (state, ctx, _) = transition(ProposalStatus::Draft, &LifecycleEvent::Create, ctx);
/// assert_eq!(state, ProposalStatus::PendingReview);
///
/// let event = LifecycleEvent::ReviewReceived {
///     agent: AgentIdentity::new("gpt-5"),
///     vote: Vote::Revise,
/// };
/// let (state, _, _) = transition(state, &event, ctx);
/// assert_eq!(state, ProposalStatus::Revision);
/// ```
pub fn transition(
    state: ProposalStatus,
    event: &LifecycleEvent,
    mut ctx: LifecycleContext,
) -> (ProposalStatus, LifecycleContext, TransitionOutcome) {
    use LifecycleEvent as E;
    use ProposalStatus as S;

    match (state, event) {
        (S::Draft, E::Create) => {
            ctx.votes.clear();
            (S::PendingReview, ctx, applied(state, S::PendingReview))
        }

        (S::PendingReview, E::ReviewReceived { agent, vote }) => {
            ctx.votes.push(CastVote {
                agent: agent.clone(),
                vote: *vote,
            });
            let consensus = evaluate(&ctx.votes, ctx.consensus_mode);
            let next = resolve_review(&consensus, ctx.votes.len() >= ctx.min_votes);
            let outcome = TransitionOutcome::Applied {
                from: state,
                to: next,
                consensus: Some(consensus),
            };
            (next, ctx, outcome)
        }

        (S::Revision, E::Revised) => {
            let next = if ctx.revision_cap_reached() {
                S::Escalated
            } else {
                ctx.votes.clear();
                S::PendingReview
            };
            ctx.iterations = ctx.iterations.saturating_add(1);
            (next, ctx, applied(state, next))
        }

        (S::Disputed, E::ArbiterDecision { vote }) => match vote {
            Vote::Approve => (S::Approved, ctx, applied(state, S::Approved)),
            Vote::Reject => (S::Rejected, ctx, applied(state, S::Rejected)),
            Vote::Revise => {
                let outcome = ignored(state, event, IgnoreReason::ArbiterCannotRevise);
                (state, ctx, outcome)
            }
        },

        (S::Disputed | S::Escalated, E::HumanDecision { approved }) => {
            let next = if *approved { S::Approved } else { S::Rejected };
            (next, ctx, applied(state, next))
        }

        (S::Approved, E::ImplementationComplete) => {
            (S::Implemented, ctx, applied(state, S::Implemented))
        }

        _ => {
            let outcome = ignored(state, event, IgnoreReason::NoTransition);
            (state, ctx, outcome)
        }
    }
}

/// Map a consensus evaluation to the next status while collecting reviews.
///
/// REVISE applies immediately; everything else waits for `quorum_met`.
/// Past the quorum only a unanimous tally approves or rejects, and any mix
/// of APPROVE and REJECT is a dispute whatever the majority verdict.
fn resolve_review(consensus: &ConsensusResult, quorum_met: bool) -> ProposalStatus {
    match consensus.outcome {
        ConsensusOutcome::Revise => ProposalStatus::Revision,
        _ if !quorum_met => ProposalStatus::PendingReview,
        _ if consensus.tally.all_approve() => ProposalStatus::Approved,
        _ if consensus.tally.all_reject() => ProposalStatus::Rejected,
        _ => ProposalStatus::Disputed,
    }
}
