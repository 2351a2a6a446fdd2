//! Consensus evaluation
//!
//! [`evaluate`] turns one iteration's votes into a [`ConsensusResult`].
//! It is a pure function: no state, no clock, no I/O.

use super::mode::ConsensusMode;
use super::vote::{CastVote, VoteTally, vote_summary};
use serde::{Deserialize, Serialize};

/// Outcome of evaluating an iteration's votes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsensusOutcome {
    /// No votes yet
    None,
    Approved,
    Rejected,
    /// At least one reviewer asked for changes
    Revise,
    /// Mixed APPROVE/REJECT that the mode cannot resolve
    Disputed,
}

impl ConsensusOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsensusOutcome::None => "none",
            ConsensusOutcome::Approved => "approved",
            ConsensusOutcome::Rejected => "rejected",
            ConsensusOutcome::Revise => "revise",
            ConsensusOutcome::Disputed => "disputed",
        }
    }
}

impl std::fmt::Display for ConsensusOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of a consensus evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusResult {
    /// Whether the votes settle the iteration
    pub reached: bool,
    pub outcome: ConsensusOutcome,
    pub mode: ConsensusMode,
    pub tally: VoteTally,
    /// Visual summary of the votes in cast order (e.g., "[●●◐]")
    pub summary: String,
}

impl ConsensusResult {
    pub fn is_approved(&self) -> bool {
        self.outcome == ConsensusOutcome::Approved
    }

    pub fn is_rejected(&self) -> bool {
        self.outcome == ConsensusOutcome::Rejected
    }

    /// Approval with every single vote being APPROVE
    pub fn is_unanimous_approve(&self) -> bool {
        self.is_approved() && self.tally.all_approve()
    }

    /// Rejection with every single vote being REJECT
    pub fn is_unanimous_reject(&self) -> bool {
        self.is_rejected() && self.tally.all_reject()
    }
}

/// Evaluate the votes of the current iteration.
///
/// Rules are checked in order and the first match wins:
///
/// 1. no votes → no consensus (`None`)
/// 2. all APPROVE → `Approved`
/// 3. all REJECT → `Rejected`
/// 4. any REVISE → `Revise`, whatever the other votes say
/// 5. `Majority` with unequal APPROVE/REJECT counts → the larger side
/// 6. otherwise → no consensus (`Disputed`)
///
/// # Example
///
/// ```
/// use council_domain::quorum::{evaluate, CastVote, ConsensusMode, ConsensusOutcome, Vote};
///
/// let votes = vec![
///     CastVote::new("claude-opus", Vote::Approve),
///     CastVote::new("gpt-5", Vote::Approve),
///     CastVote::new("gemini-pro", Vote::Revise),
/// ];
/// let result = evaluate(&votes, ConsensusMode::Majority);
/// assert_eq!(result.outcome, ConsensusOutcome::Revise);
/// assert!(result.reached);
/// ```
pub fn evaluate(votes: &[CastVote], mode: ConsensusMode) -> ConsensusResult {
    let tally = VoteTally::from_votes(votes);

    let (reached, outcome) = if tally.total() == 0 {
        (false, ConsensusOutcome::None)
    } else if tally.all_approve() {
        (true, ConsensusOutcome::Approved)
    } else if tally.all_reject() {
        (true, ConsensusOutcome::Rejected)
    } else if tally.revise > 0 {
        (true, ConsensusOutcome::Revise)
    } else if mode == ConsensusMode::Majority && tally.approve != tally.reject {
        if tally.approve > tally.reject {
            (true, ConsensusOutcome::Approved)
        } else {
            (true, ConsensusOutcome::Rejected)
        }
    } else {
        (false, ConsensusOutcome::Disputed)
    };

    ConsensusResult {
        reached,
        outcome,
        mode,
        tally,
        summary: vote_summary(votes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quorum::vote::Vote;

    fn votes(vs: &[Vote]) -> Vec<CastVote> {
        vs.iter()
            .enumerate()
            .map(|(i, v)| CastVote::new(format!("agent-{}", i), *v))
            .collect()
    }

    #[test]
    fn test_empty_is_no_consensus() {
        for mode in [ConsensusMode::Majority, ConsensusMode::Unanimous] {
            let result = evaluate(&[], mode);
            assert!(!result.reached);
            assert_eq!(result.outcome, ConsensusOutcome::None);
            assert_eq!(result.summary, "[]");
        }
    }

    #[test]
    fn test_all_approve_is_approved_in_both_modes() {
        for n in 1..=4 {
            let vs = votes(&vec![Vote::Approve; n]);
            for mode in [ConsensusMode::Majority, ConsensusMode::Unanimous] {
                let result = evaluate(&vs, mode);
                assert!(result.reached);
                assert_eq!(result.outcome, ConsensusOutcome::Approved);
                assert!(result.is_unanimous_approve());
            }
        }
    }

    #[test]
    fn test_all_reject_is_rejected_in_both_modes() {
        let vs = votes(&[Vote::Reject, Vote::Reject]);
        for mode in [ConsensusMode::Majority, ConsensusMode::Unanimous] {
            let result = evaluate(&vs, mode);
            assert_eq!(result.outcome, ConsensusOutcome::Rejected);
            assert!(result.is_unanimous_reject());
        }
    }

    #[test]
    fn test_any_revise_forces_revision() {
        let cases: [&[Vote]; 4] = [
            &[Vote::Revise],
            &[Vote::Approve, Vote::Approve, Vote::Revise],
            &[Vote::Reject, Vote::Revise, Vote::Reject],
            &[Vote::Revise, Vote::Revise],
        ];
        for case in cases {
            for mode in [ConsensusMode::Majority, ConsensusMode::Unanimous] {
                let result = evaluate(&votes(case), mode);
                assert_eq!(result.outcome, ConsensusOutcome::Revise, "{:?}", case);
                assert!(result.reached);
            }
        }
    }

    #[test]
    fn test_majority_mode() {
        let approve = evaluate(
            &votes(&[Vote::Approve, Vote::Approve, Vote::Reject]),
            ConsensusMode::Majority,
        );
        assert_eq!(approve.outcome, ConsensusOutcome::Approved);
        assert!(!approve.is_unanimous_approve());

        let reject = evaluate(
            &votes(&[Vote::Reject, Vote::Reject, Vote::Approve]),
            ConsensusMode::Majority,
        );
        assert_eq!(reject.outcome, ConsensusOutcome::Rejected);

        let tie = evaluate(&votes(&[Vote::Approve, Vote::Reject]), ConsensusMode::Majority);
        assert!(!tie.reached);
        assert_eq!(tie.outcome, ConsensusOutcome::Disputed);
    }

    #[test]
    fn test_unanimous_mode_mixed_is_disputed() {
        let result = evaluate(
            &votes(&[Vote::Approve, Vote::Approve, Vote::Reject]),
            ConsensusMode::Unanimous,
        );
        assert!(!result.reached);
        assert_eq!(result.outcome, ConsensusOutcome::Disputed);
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let vs = votes(&[Vote::Approve, Vote::Reject, Vote::Approve]);
        let first = evaluate(&vs, ConsensusMode::Majority);
        let second = evaluate(&vs, ConsensusMode::Majority);
        assert_eq!(first, second);
        assert_eq!(first.summary, "[●○●]");
    }
}
