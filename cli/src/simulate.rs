//! Scripted walk of one proposal through the review lifecycle

use crate::commands::SimulateArgs;
use council_application::{
    ArbitrationLedger, CoordinatorError, ProposalRepository, ReviewCoordinator, ReviewSubmission,
    TransitionReport,
};
use council_domain::util::truncate_str;
use council_domain::{
    ArbiterSelection, Decision, Directive, ExpertiseMatch, Proposal, ProposalStatus, Review,
    TransitionOutcome,
};
use serde::Serialize;

const TITLE_BYTES: usize = 72;

/// One event fed to the coordinator and what it did
#[derive(Debug, Serialize)]
pub struct SimulationStep {
    pub event: String,
    pub outcome: TransitionOutcome,
    pub decision: Option<Decision>,
    pub arbiter: Option<ArbiterSelection>,
}

impl SimulationStep {
    fn new(event: impl Into<String>, report: TransitionReport) -> Self {
        Self {
            event: event.into(),
            outcome: report.outcome,
            decision: report.decision,
            arbiter: report.arbiter,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SimulationReport {
    pub proposal: Proposal,
    pub matches: Vec<ExpertiseMatch>,
    pub steps: Vec<SimulationStep>,
    pub reviews: Vec<Review>,
    pub decisions: Vec<Decision>,
    pub directive: Directive,
}

/// Open a proposal for the task and feed it the scripted events.
///
/// Votes are sent in order. Whenever a vote sends the proposal into
/// revision the planner revises, until `--revisions` runs out; the
/// arbiter, human and implementation events are only sent when the
/// proposal is in a state that accepts them.
pub async fn run<R, L>(
    coordinator: &ReviewCoordinator<R, L>,
    args: &SimulateArgs,
) -> Result<SimulationReport, CoordinatorError>
where
    R: ProposalRepository + 'static,
    L: ArbitrationLedger + 'static,
{
    let task = &args.task.task;
    let title = truncate_str(task.lines().next().unwrap_or_default(), TITLE_BYTES);

    let opened = coordinator
        .open_proposal(title, task.as_str(), &args.task.files)
        .await?;
    let id = opened.proposal.id.clone();

    let mut steps = vec![SimulationStep::new(
        "CREATE",
        coordinator.create_proposal(&id).await?,
    )];

    let mut revisions_left = args.revisions;
    for (agent, vote) in &args.votes {
        let report = coordinator
            .record_review(&id, ReviewSubmission::new(agent.as_str(), *vote))
            .await?;
        let status = report.status();
        steps.push(SimulationStep::new(
            format!("REVIEW_RECEIVED {}={}", agent, vote),
            report,
        ));

        if status == ProposalStatus::Revision {
            if revisions_left == Some(0) {
                break;
            }
            revisions_left = revisions_left.map(|n| n - 1);
            steps.push(SimulationStep::new(
                "REVISED",
                coordinator.record_revision(&id, None).await?,
            ));
        }
    }

    let mut status = coordinator.proposal(&id).await?.status();

    if let Some(vote) = args.arbiter_vote
        && status == ProposalStatus::Disputed
    {
        let report = coordinator.record_arbiter_decision(&id, vote).await?;
        status = report.status();
        steps.push(SimulationStep::new(
            format!("ARBITER_DECISION {}", vote),
            report,
        ));
    }

    if let Some(approved) = args.human
        && matches!(status, ProposalStatus::Disputed | ProposalStatus::Escalated)
    {
        let report = coordinator.record_human_decision(&id, approved).await?;
        status = report.status();
        steps.push(SimulationStep::new(
            format!("HUMAN_DECISION {}", if approved { "approve" } else { "reject" }),
            report,
        ));
    }

    if args.implement && status == ProposalStatus::Approved {
        steps.push(SimulationStep::new(
            "IMPLEMENTATION_COMPLETE",
            coordinator.mark_implemented(&id).await?,
        ));
    }

    Ok(SimulationReport {
        proposal: coordinator.proposal(&id).await?,
        matches: opened.matches,
        steps,
        reviews: coordinator.reviews(&id).await?,
        decisions: coordinator.decisions(&id).await?,
        directive: coordinator.next_directive(&id).await?,
    })
}
