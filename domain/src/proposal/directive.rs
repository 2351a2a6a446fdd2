//! Next-step directives
//!
//! [`next_directive`] reads a proposal and tells the caller who should act
//! next and what they should do. It never mutates anything, so calling it
//! twice on the same proposal yields the same directive.

use super::entities::Proposal;
use super::status::ProposalStatus;
use crate::core::identity::AgentIdentity;
use crate::util::truncate_str;
use serde::{Deserialize, Serialize};

/// Maximum bytes of proposal content quoted in instructions
const CONTENT_PREVIEW_BYTES: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectiveAction {
    SubmitForReview,
    RequestReview,
    AwaitReviews,
    Revise,
    Arbitrate,
    AwaitHumanDecision,
    Implement,
    None,
}

impl DirectiveAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            DirectiveAction::SubmitForReview => "submit_for_review",
            DirectiveAction::RequestReview => "request_review",
            DirectiveAction::AwaitReviews => "await_reviews",
            DirectiveAction::Revise => "revise",
            DirectiveAction::Arbitrate => "arbitrate",
            DirectiveAction::AwaitHumanDecision => "await_human_decision",
            DirectiveAction::Implement => "implement",
            DirectiveAction::None => "none",
        }
    }

    /// Whether an agent (rather than a human or nobody) acts next
    pub fn needs_agent(&self) -> bool {
        matches!(
            self,
            DirectiveAction::SubmitForReview
                | DirectiveAction::RequestReview
                | DirectiveAction::Revise
                | DirectiveAction::Arbitrate
                | DirectiveAction::Implement
        )
    }
}

impl std::fmt::Display for DirectiveAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What should happen next for a proposal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directive {
    pub action: DirectiveAction,
    pub target_agent: Option<AgentIdentity>,
    pub instructions: String,
}

impl Directive {
    fn to_agent(action: DirectiveAction, agent: &AgentIdentity, instructions: String) -> Self {
        Self {
            action,
            target_agent: Some(agent.clone()),
            instructions,
        }
    }

    fn untargeted(action: DirectiveAction, instructions: String) -> Self {
        Self {
            action,
            target_agent: None,
            instructions,
        }
    }
}

/// Compute the next directive for a proposal.
///
/// # Example
///
/// ```
/// use council_domain::proposal::{next_directive, DirectiveAction, LifecycleEvent, Proposal};
/// use council_domain::expertise::ExpertiseMatch;
/// use council_domain::roles::assign_roles;
/// use council_domain::{AgentIdentity, ArbitrationHistory, RoleConfig};
///
/// let config = RoleConfig::new(
///     AgentIdentity::new("claude-opus"),
///     vec![AgentIdentity::new("gpt-5")],
/// )
/// .unwrap();
/// let assignment = assign_roles(&[ExpertiseMatch::general()], &config, &ArbitrationHistory::new());
/// let mut proposal = Proposal::new("p-1", "Add cache", "Cache lookups", &assignment, &config);
///
/// assert_eq!(next_directive(&proposal).action, DirectiveAction::SubmitForReview);
///
/// proposal.apply(&LifecycleEvent::Create);
/// let directive = next_directive(&proposal);
/// assert_eq!(directive.action, DirectiveAction::RequestReview);
/// assert_eq!(directive.target_agent.unwrap().name(), "gpt-5");
/// ```
pub fn next_directive(proposal: &Proposal) -> Directive {
    let preview = truncate_str(&proposal.content, CONTENT_PREVIEW_BYTES);
    let planner = &proposal.planner.identity;

    match proposal.status() {
        ProposalStatus::Draft => Directive::to_agent(
            DirectiveAction::SubmitForReview,
            planner,
            format!(
                "Submit proposal \"{}\" for review when the draft is ready.",
                proposal.title
            ),
        ),

        ProposalStatus::PendingReview => match proposal.pending_reviewers().next() {
            Some(slot) => Directive::to_agent(
                DirectiveAction::RequestReview,
                &slot.identity,
                format!(
                    "Review proposal \"{}\" as {} reviewer (focus: {}). \
                     Vote APPROVE, REJECT or REVISE.\n\n{}",
                    proposal.title, slot.expertise, slot.focus, preview
                ),
            ),
            None => Directive::untargeted(
                DirectiveAction::AwaitReviews,
                format!(
                    "All assigned reviewers have voted on \"{}\"; waiting for enough votes to settle.",
                    proposal.title
                ),
            ),
        },

        ProposalStatus::Revision => {
            let requested: Vec<&str> = proposal
                .votes()
                .iter()
                .filter(|v| v.vote.is_revise())
                .map(|v| v.agent.name())
                .collect();
            Directive::to_agent(
                DirectiveAction::Revise,
                planner,
                format!(
                    "Revise proposal \"{}\" (iteration {}/{}). Changes requested by: {}.",
                    proposal.title,
                    proposal.iterations() + 1,
                    proposal.max_iterations(),
                    requested.join(", ")
                ),
            )
        }

        ProposalStatus::Disputed => match proposal.arbiter() {
            Some(arbiter) => Directive::to_agent(
                DirectiveAction::Arbitrate,
                arbiter,
                format!(
                    "Reviewers disagree on \"{}\". Decide APPROVE or REJECT.\n\n{}",
                    proposal.title, preview
                ),
            ),
            None => Directive::untargeted(
                DirectiveAction::AwaitHumanDecision,
                format!(
                    "Reviewers disagree on \"{}\" and no arbiter is available; a human must decide.",
                    proposal.title
                ),
            ),
        },

        ProposalStatus::Escalated => Directive::untargeted(
            DirectiveAction::AwaitHumanDecision,
            format!(
                "Proposal \"{}\" hit the revision limit ({} iterations); a human must decide.",
                proposal.title,
                proposal.max_iterations()
            ),
        ),

        ProposalStatus::Approved => Directive::to_agent(
            DirectiveAction::Implement,
            planner,
            format!("Proposal \"{}\" is approved. Implement it.", proposal.title),
        ),

        ProposalStatus::Rejected | ProposalStatus::Implemented => Directive::untargeted(
            DirectiveAction::None,
            format!(
                "Proposal \"{}\" is {}; nothing left to do.",
                proposal.title,
                proposal.status()
            ),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expertise::ExpertiseMatch;
    use crate::proposal::LifecycleEvent;
    use crate::quorum::Vote;
    use crate::roles::{ArbitrationHistory, RoleConfig, assign_roles};

    fn proposal(reviewers: &[&str], min_votes: usize) -> Proposal {
        let config = RoleConfig::new(
            AgentIdentity::new("claude-opus"),
            reviewers.iter().map(|r| AgentIdentity::new(*r)).collect(),
        )
        .unwrap()
        .with_min_votes(min_votes)
        .unwrap();
        let assignment = assign_roles(
            &[ExpertiseMatch::general()],
            &config,
            &ArbitrationHistory::new(),
        );
        Proposal::new("p-1", "Add cache", "Cache user lookups", &assignment, &config)
    }

    fn review(agent: &str, vote: Vote) -> LifecycleEvent {
        LifecycleEvent::ReviewReceived {
            agent: AgentIdentity::new(agent),
            vote,
        }
    }

    fn target(d: &Directive) -> Option<&str> {
        d.target_agent.as_ref().map(|a| a.name())
    }

    #[test]
    fn test_draft_goes_to_planner() {
        let p = proposal(&["gpt-5"], 1);
        let d = next_directive(&p);
        assert_eq!(d.action, DirectiveAction::SubmitForReview);
        assert_eq!(target(&d), Some("claude-opus"));
    }

    #[test]
    fn test_request_review_picks_first_pending_reviewer() {
        let mut p = proposal(&["gpt-5", "gemini-pro"], 2);
        p.apply(&LifecycleEvent::Create);
        assert_eq!(target(&next_directive(&p)), Some("gpt-5"));

        p.apply(&review("gpt-5", Vote::Approve));
        let d = next_directive(&p);
        assert_eq!(d.action, DirectiveAction::RequestReview);
        assert_eq!(target(&d), Some("gemini-pro"));
        assert!(d.instructions.contains("general"));
    }

    #[test]
    fn test_mixed_votes_from_whole_roster_need_a_decider() {
        let mut p = proposal(&["gpt-5", "gemini-pro", "llama-3"], 3);
        p.apply(&LifecycleEvent::Create);
        p.apply(&review("gpt-5", Vote::Approve));
        p.apply(&review("gemini-pro", Vote::Approve));
        assert_eq!(next_directive(&p).action, DirectiveAction::RequestReview);

        p.apply(&review("llama-3", Vote::Reject));
        assert_eq!(p.status(), ProposalStatus::Disputed);
        assert_eq!(p.pending_reviewers().count(), 0);

        let d = next_directive(&p);
        assert_ne!(d.action, DirectiveAction::AwaitReviews);
        assert_eq!(d.action, DirectiveAction::AwaitHumanDecision);
    }

    #[test]
    fn test_revision_names_requesters() {
        let mut p = proposal(&["gpt-5", "gemini-pro"], 1);
        p.apply(&LifecycleEvent::Create);
        p.apply(&review("gemini-pro", Vote::Revise));

        let d = next_directive(&p);
        assert_eq!(d.action, DirectiveAction::Revise);
        assert_eq!(target(&d), Some("claude-opus"));
        assert!(d.instructions.contains("gemini-pro"));
        assert!(d.instructions.contains("1/3"));
    }

    #[test]
    fn test_dispute_with_and_without_arbiter() {
        let mut p = proposal(&["gpt-5", "gemini-pro"], 2);
        p.apply(&LifecycleEvent::Create);
        p.apply(&review("gpt-5", Vote::Approve));
        p.apply(&review("gemini-pro", Vote::Reject));
        assert_eq!(p.status(), ProposalStatus::Disputed);

        let d = next_directive(&p);
        assert_eq!(d.action, DirectiveAction::AwaitHumanDecision);
        assert!(d.target_agent.is_none());

        p.assign_arbiter(AgentIdentity::new("llama-3"));
        let d = next_directive(&p);
        assert_eq!(d.action, DirectiveAction::Arbitrate);
        assert_eq!(target(&d), Some("llama-3"));
    }

    #[test]
    fn test_escalated_and_terminal_states() {
        let mut p = proposal(&["gpt-5"], 1);
        p.apply(&LifecycleEvent::Create);
        p.apply(&review("gpt-5", Vote::Approve));
        let d = next_directive(&p);
        assert_eq!(d.action, DirectiveAction::Implement);
        assert_eq!(target(&d), Some("claude-opus"));

        p.apply(&LifecycleEvent::ImplementationComplete);
        let d = next_directive(&p);
        assert_eq!(d.action, DirectiveAction::None);
        assert!(d.target_agent.is_none());

        let mut p = proposal(&["gpt-5"], 1);
        p.apply(&LifecycleEvent::Create);
        p.apply(&review("gpt-5", Vote::Reject));
        assert_eq!(next_directive(&p).action, DirectiveAction::None);
    }

    #[test]
    fn test_escalated_awaits_human() {
        let config = RoleConfig::new(
            AgentIdentity::new("claude-opus"),
            vec![AgentIdentity::new("gpt-5")],
        )
        .unwrap()
        .with_max_iterations(1)
        .unwrap();
        let assignment = assign_roles(
            &[ExpertiseMatch::general()],
            &config,
            &ArbitrationHistory::new(),
        );
        let mut p = Proposal::new("p-2", "t", "c", &assignment, &config);
        p.apply(&LifecycleEvent::Create);
        p.apply(&review("gpt-5", Vote::Revise));
        p.apply(&LifecycleEvent::Revised);
        assert_eq!(p.status(), ProposalStatus::Escalated);

        let d = next_directive(&p);
        assert_eq!(d.action, DirectiveAction::AwaitHumanDecision);
        assert!(d.target_agent.is_none());
    }

    #[test]
    fn test_directive_is_idempotent() {
        let mut p = proposal(&["gpt-5", "gemini-pro"], 2);
        p.apply(&LifecycleEvent::Create);
        p.apply(&review("gpt-5", Vote::Approve));
        let before = p.clone();
        assert_eq!(next_directive(&p), next_directive(&p));
        assert_eq!(p, before);
    }

    #[test]
    fn test_long_content_is_truncated() {
        let config = RoleConfig::new(
            AgentIdentity::new("claude-opus"),
            vec![AgentIdentity::new("gpt-5")],
        )
        .unwrap();
        let assignment = assign_roles(
            &[ExpertiseMatch::general()],
            &config,
            &ArbitrationHistory::new(),
        );
        let mut p = Proposal::new("p-3", "t", "x".repeat(1000), &assignment, &config);
        p.apply(&LifecycleEvent::Create);
        let d = next_directive(&p);
        assert!(d.instructions.len() < 500);
    }

    #[test]
    fn test_needs_agent() {
        assert!(DirectiveAction::Arbitrate.needs_agent());
        assert!(!DirectiveAction::AwaitHumanDecision.needs_agent());
        assert!(!DirectiveAction::None.needs_agent());
    }
}
