//! Role assignment
//!
//! Turns ranked expertise matches into concrete planner / reviewer / arbiter
//! assignments. Everything here is a pure function of its inputs: the
//! arbitration history arrives as a snapshot and is never updated.

use super::config::{ArbiterStrategy, RoleConfig};
use super::history::ArbitrationHistory;
use crate::core::identity::AgentIdentity;
use crate::expertise::ExpertiseMatch;
use serde::{Deserialize, Serialize};

/// An identity paired with the expertise it should focus on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSlot {
    pub identity: AgentIdentity,
    pub expertise: String,
    pub focus: String,
}

impl RoleSlot {
    fn from_match(identity: AgentIdentity, expertise: &ExpertiseMatch) -> Self {
        Self {
            identity,
            expertise: expertise.name.clone(),
            focus: expertise.focus.clone(),
        }
    }
}

/// Outcome of arbiter selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArbiterSelection {
    pub arbiter: AgentIdentity,
    /// Arbitrations recorded for this identity before this selection
    pub prior_arbitrations: usize,
    /// No candidate outside the excluded families was available
    pub fallback: bool,
}

/// Concrete role assignment for one task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub planner: RoleSlot,
    pub reviewers: Vec<RoleSlot>,
    /// Provisional arbiter; `None` when no candidates are configured
    pub arbiter: Option<ArbiterSelection>,
}

/// Assign planner, reviewers and a provisional arbiter.
///
/// - The planner gets the top-ranked expertise.
/// - Reviewer `i` gets match `i`, clamped to the last match, so a task that
///   touches several domains spreads reviewer focus across them.
/// - The arbiter is chosen as if the last reviewer in the roster had just
///   contributed to a dispute.
///
/// # Example
///
/// ```
/// use council_domain::{AgentIdentity, ArbitrationHistory, RoleConfig};
/// use council_domain::expertise::{classify_task, ExpertiseProfile};
/// use council_domain::roles::assign_roles;
///
/// let config = RoleConfig::new(
///     AgentIdentity::new("claude-opus"),
///     vec![AgentIdentity::new("gpt-5"), AgentIdentity::new("gemini-pro")],
/// )
/// .unwrap();
/// let matches = classify_task("Add JWT auth", &[], &ExpertiseProfile::defaults());
/// let assignment = assign_roles(&matches, &config, &ArbitrationHistory::new());
///
/// assert_eq!(assignment.planner.identity.name(), "claude-opus");
/// assert_eq!(assignment.planner.expertise, "security");
/// assert_eq!(assignment.reviewers.len(), 2);
/// ```
pub fn assign_roles(
    matches: &[ExpertiseMatch],
    config: &RoleConfig,
    history: &ArbitrationHistory,
) -> RoleAssignment {
    let general = [ExpertiseMatch::general()];
    let matches = if matches.is_empty() { &general[..] } else { matches };
    let last = matches.len() - 1;

    let planner = RoleSlot::from_match(config.planner().clone(), &matches[0]);

    let reviewers = config
        .reviewers()
        .iter()
        .enumerate()
        .map(|(i, reviewer)| RoleSlot::from_match(reviewer.clone(), &matches[i.min(last)]))
        .collect();

    let arbiter = select_arbiter(
        config.arbiters(),
        config.strategy(),
        config.reviewers(),
        history,
    );

    RoleAssignment {
        planner,
        reviewers,
        arbiter,
    }
}

/// Choose an arbiter for a dispute.
///
/// `contributors` are the reviewers whose votes formed the dispute, in cast
/// order; the last one is the most recent. Eligibility narrows in three
/// steps:
///
/// 1. exclude every contributor's family;
/// 2. if nobody is left, exclude only the most recent contributor's family;
/// 3. if still nobody is left, fall back to the first configured candidate
///    regardless of family (flagged via [`ArbiterSelection::fallback`]).
///
/// Returns `None` only when there are no candidates at all.
pub fn select_arbiter(
    candidates: &[AgentIdentity],
    strategy: ArbiterStrategy,
    contributors: &[AgentIdentity],
    history: &ArbitrationHistory,
) -> Option<ArbiterSelection> {
    let first = candidates.first()?;

    let outside_all: Vec<&AgentIdentity> = candidates
        .iter()
        .filter(|c| !contributors.iter().any(|r| r.same_family(c)))
        .collect();

    let eligible = if !outside_all.is_empty() {
        outside_all
    } else {
        match contributors.last() {
            Some(recent) => candidates
                .iter()
                .filter(|c| !c.same_family(recent))
                .collect(),
            None => candidates.iter().collect(),
        }
    };

    let (arbiter, fallback) = match pick(&eligible, strategy, history) {
        Some(chosen) => (chosen, false),
        None => (first, true),
    };

    Some(ArbiterSelection {
        arbiter: arbiter.clone(),
        prior_arbitrations: history.count(arbiter),
        fallback,
    })
}

fn pick<'a>(
    eligible: &[&'a AgentIdentity],
    strategy: ArbiterStrategy,
    history: &ArbitrationHistory,
) -> Option<&'a AgentIdentity> {
    if strategy.balances_load() {
        // min_by_key keeps the first of equal minimums
        eligible.iter().copied().min_by_key(|c| history.count(c))
    } else {
        eligible.first().copied()
    }
}
