//! Review coordinator use case
//!
//! Drives proposals through their lifecycle: loads the proposal, feeds the
//! event to the domain state machine, assigns an arbiter when a dispute
//! opens and saves the result. Ledger updates and decision records are
//! written only after the proposal itself has been saved.
//!
//! Events for the same proposal are serialized with a per-proposal lock
//! held across load → apply → save. Different proposals proceed in parallel.

use crate::config::CouncilConfig;
use crate::ports::audit_logger::{AuditEvent, AuditLogger, NoAuditLogger};
use crate::ports::repository::{ArbitrationLedger, ProposalRepository, RepositoryError};
use council_domain::{
    AgentIdentity, ArbiterSelection, Decision, Directive, ExpertiseMatch, IgnoreReason,
    LifecycleEvent, Proposal, ProposalId, ProposalStatus, Review, ReviewId, RoleAssignment,
    SeverityBreakdown, TransitionOutcome, Vote, assign_roles, classify_task, next_directive,
    select_arbiter,
};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Errors that can occur while coordinating reviews
#[derive(Error, Debug)]
pub enum CoordinatorError {
    #[error("Proposal not found: {0}")]
    ProposalNotFound(ProposalId),

    #[error("Proposal already exists: {0}")]
    DuplicateProposal(ProposalId),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// A review as submitted by a reviewer
#[derive(Debug, Clone)]
pub struct ReviewSubmission {
    /// Reviewer name; resolved against the configured identities
    pub agent: String,
    pub vote: Vote,
    pub content: String,
    pub severity: Option<SeverityBreakdown>,
}

impl ReviewSubmission {
    pub fn new(agent: impl Into<String>, vote: Vote) -> Self {
        Self {
            agent: agent.into(),
            vote,
            content: String::new(),
            severity: None,
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_severity(mut self, severity: SeverityBreakdown) -> Self {
        self.severity = Some(severity);
        self
    }
}

/// A freshly opened proposal together with how its roles were chosen
#[derive(Debug, Clone)]
pub struct OpenedProposal {
    pub proposal: Proposal,
    pub matches: Vec<ExpertiseMatch>,
    pub assignment: RoleAssignment,
}

/// What one event did to a proposal
#[derive(Debug, Clone)]
pub struct TransitionReport {
    /// Proposal after the event
    pub proposal: Proposal,
    pub outcome: TransitionOutcome,
    /// Decision recorded by this event
    pub decision: Option<Decision>,
    /// Arbiter assigned because this event opened a dispute
    pub arbiter: Option<ArbiterSelection>,
    /// Stored review, for review submissions
    pub review: Option<Review>,
}

impl TransitionReport {
    pub fn status(&self) -> ProposalStatus {
        self.proposal.status()
    }
}

/// Side effects of applying one event
struct Effects {
    outcome: TransitionOutcome,
    decision: Option<Decision>,
    arbiter: Option<ArbiterSelection>,
    /// Arbiter to credit in the ledger once the proposal is saved
    arbitrated: Option<AgentIdentity>,
}

impl Effects {
    fn ignored(outcome: TransitionOutcome) -> Self {
        Self {
            outcome,
            decision: None,
            arbiter: None,
            arbitrated: None,
        }
    }
}

/// Use case coordinating proposal reviews
pub struct ReviewCoordinator<R, L>
where
    R: ProposalRepository + 'static,
    L: ArbitrationLedger + 'static,
{
    repository: Arc<R>,
    ledger: Arc<L>,
    config: CouncilConfig,
    audit: Arc<dyn AuditLogger>,
    locks: Mutex<HashMap<ProposalId, Arc<Mutex<()>>>>,
}

impl<R, L> ReviewCoordinator<R, L>
where
    R: ProposalRepository + 'static,
    L: ArbitrationLedger + 'static,
{
    pub fn new(repository: Arc<R>, ledger: Arc<L>, config: CouncilConfig) -> Self {
        Self {
            repository,
            ledger,
            config,
            audit: Arc::new(NoAuditLogger),
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_audit_logger(mut self, audit: Arc<dyn AuditLogger>) -> Self {
        self.audit = audit;
        self
    }

    pub fn config(&self) -> &CouncilConfig {
        &self.config
    }

    // ==================== Opening ====================

    /// Classify a task, assign roles and store it as a draft proposal.
    pub async fn open_proposal(
        &self,
        title: impl Into<String>,
        content: impl Into<String>,
        files: &[String],
    ) -> Result<OpenedProposal, CoordinatorError> {
        let title = title.into();
        let content = content.into();

        let text = format!("{}\n{}", title, content);
        let matches = classify_task(&text, files, self.config.profiles());
        let history = self.ledger.snapshot().await?;
        let assignment = assign_roles(&matches, self.config.roles(), &history);

        let proposal = Proposal::new(
            ProposalId::generate(),
            title,
            content,
            &assignment,
            self.config.roles(),
        );
        self.insert(&proposal).await?;

        info!(
            "Opened proposal {} ({} expertise, {} reviewers)",
            proposal.id,
            assignment.planner.expertise,
            assignment.reviewers.len()
        );
        self.audit.log(AuditEvent::new(
            "proposal_opened",
            json!({
                "proposal_id": proposal.id.as_str(),
                "title": proposal.title,
                "planner": proposal.planner.identity.name(),
                "reviewers": proposal.reviewers.iter().map(|r| r.identity.name()).collect::<Vec<_>>(),
                "expertise": matches.iter().map(|m| m.name.as_str()).collect::<Vec<_>>(),
            }),
        ));

        Ok(OpenedProposal {
            proposal,
            matches,
            assignment,
        })
    }

    /// Submit a draft for review (`CREATE`).
    pub async fn create_proposal(
        &self,
        id: &ProposalId,
    ) -> Result<TransitionReport, CoordinatorError> {
        self.drive(id, LifecycleEvent::Create).await
    }

    // ==================== Events ====================

    /// Record a reviewer's vote (`REVIEW_RECEIVED`).
    ///
    /// The review is always stored. It only counts when the proposal is
    /// collecting reviews and the agent has not voted in this iteration yet;
    /// otherwise it is kept with `counted = false` and the status stays.
    pub async fn record_review(
        &self,
        id: &ProposalId,
        submission: ReviewSubmission,
    ) -> Result<TransitionReport, CoordinatorError> {
        let lock = self.proposal_lock(id).await;
        let _guard = lock.lock().await;

        let mut proposal = self.load(id).await?;
        let agent = self.config.roles().identity(&submission.agent);
        let iteration = proposal.iterations();
        let sequence = self.repository.reviews(id).await?.len();

        let effects = if proposal.status() == ProposalStatus::PendingReview
            && proposal.has_voted(&agent)
        {
            warn!(
                "{} already voted on proposal {} in iteration {}",
                agent, id, iteration
            );
            let outcome = TransitionOutcome::Ignored {
                state: proposal.status(),
                event: "REVIEW_RECEIVED".to_string(),
                reason: IgnoreReason::DuplicateVote,
            };
            self.audit_ignored(&proposal, &outcome);
            Effects::ignored(outcome)
        } else {
            let event = LifecycleEvent::ReviewReceived {
                agent: agent.clone(),
                vote: submission.vote,
            };
            self.apply_event(&mut proposal, &event).await?
        };

        let mut review = Review::new(
            ReviewId::new(id, iteration, sequence),
            id.clone(),
            agent,
            submission.vote,
            submission.content,
            iteration,
        );
        if let Some(severity) = submission.severity {
            review = review.with_severity(severity);
        }
        if effects.outcome.is_ignored() {
            review = review.uncounted();
        }

        self.commit(&proposal, &effects).await?;
        self.repository.append_review(review.clone()).await?;
        self.audit.log(AuditEvent::new(
            "review_recorded",
            json!({
                "proposal_id": id.as_str(),
                "review_id": review.id.as_str(),
                "agent": review.agent.name(),
                "vote": review.vote.as_str(),
                "iteration": review.iteration,
                "counted": review.counted,
                "severity": review.severity,
            }),
        ));

        Ok(TransitionReport {
            proposal,
            outcome: effects.outcome,
            decision: effects.decision,
            arbiter: effects.arbiter,
            review: Some(review),
        })
    }

    /// The planner finished a revision (`REVISED`).
    ///
    /// `content` replaces the proposal text when the revision is accepted.
    pub async fn record_revision(
        &self,
        id: &ProposalId,
        content: Option<String>,
    ) -> Result<TransitionReport, CoordinatorError> {
        let lock = self.proposal_lock(id).await;
        let _guard = lock.lock().await;

        let mut proposal = self.load(id).await?;
        let effects = self
            .apply_event(&mut proposal, &LifecycleEvent::Revised)
            .await?;
        if effects.outcome.is_applied()
            && let Some(content) = content
        {
            proposal.content = content;
        }
        self.commit(&proposal, &effects).await?;

        Ok(Self::report(proposal, effects))
    }

    /// The assigned arbiter settled a dispute (`ARBITER_DECISION`).
    pub async fn record_arbiter_decision(
        &self,
        id: &ProposalId,
        vote: Vote,
    ) -> Result<TransitionReport, CoordinatorError> {
        self.drive(id, LifecycleEvent::ArbiterDecision { vote })
            .await
    }

    /// A human settled a dispute or an escalation (`HUMAN_DECISION`).
    pub async fn record_human_decision(
        &self,
        id: &ProposalId,
        approved: bool,
    ) -> Result<TransitionReport, CoordinatorError> {
        self.drive(id, LifecycleEvent::HumanDecision { approved })
            .await
    }

    /// The approved change has been implemented (`IMPLEMENTATION_COMPLETE`).
    pub async fn mark_implemented(
        &self,
        id: &ProposalId,
    ) -> Result<TransitionReport, CoordinatorError> {
        self.drive(id, LifecycleEvent::ImplementationComplete)
            .await
    }

    // ==================== Queries ====================

    pub async fn next_directive(&self, id: &ProposalId) -> Result<Directive, CoordinatorError> {
        let proposal = self.load(id).await?;
        Ok(next_directive(&proposal))
    }

    pub async fn proposal(&self, id: &ProposalId) -> Result<Proposal, CoordinatorError> {
        self.load(id).await
    }

    pub async fn reviews(&self, id: &ProposalId) -> Result<Vec<Review>, CoordinatorError> {
        self.load(id).await?;
        Ok(self.repository.reviews(id).await?)
    }

    pub async fn decisions(&self, id: &ProposalId) -> Result<Vec<Decision>, CoordinatorError> {
        self.load(id).await?;
        Ok(self.repository.decisions(id).await?)
    }

    // ==================== Internals ====================

    async fn proposal_lock(&self, id: &ProposalId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        Arc::clone(locks.entry(id.clone()).or_default())
    }

    async fn load(&self, id: &ProposalId) -> Result<Proposal, CoordinatorError> {
        self.repository
            .load(id)
            .await?
            .ok_or_else(|| CoordinatorError::ProposalNotFound(id.clone()))
    }

    async fn insert(&self, proposal: &Proposal) -> Result<(), CoordinatorError> {
        match self.repository.insert(proposal).await {
            Ok(()) => Ok(()),
            Err(RepositoryError::AlreadyExists(id)) => Err(CoordinatorError::DuplicateProposal(id)),
            Err(e) => Err(e.into()),
        }
    }

    /// Lock, load, apply, commit.
    async fn drive(
        &self,
        id: &ProposalId,
        event: LifecycleEvent,
    ) -> Result<TransitionReport, CoordinatorError> {
        let lock = self.proposal_lock(id).await;
        let _guard = lock.lock().await;

        let mut proposal = self.load(id).await?;
        let effects = self.apply_event(&mut proposal, &event).await?;
        self.commit(&proposal, &effects).await?;

        Ok(Self::report(proposal, effects))
    }

    /// Save an applied event, then write its ledger and decision records.
    ///
    /// A failed save leaves the ledger and the decision log untouched.
    async fn commit(&self, proposal: &Proposal, effects: &Effects) -> Result<(), CoordinatorError> {
        if !effects.outcome.is_applied() {
            return Ok(());
        }
        self.repository.save(proposal).await?;

        if let Some(arbiter) = &effects.arbitrated {
            self.ledger.record_arbitration(arbiter).await?;
        }

        if let Some(decision) = &effects.decision {
            info!(
                "Proposal {} decided: {} ({:?})",
                proposal.id, decision.outcome, decision.source
            );
            self.repository.append_decision(decision.clone()).await?;
            self.audit.log(AuditEvent::new(
                "decision",
                json!({
                    "proposal_id": proposal.id.as_str(),
                    "outcome": decision.outcome,
                    "source": decision.source,
                    "summary": decision.summary,
                }),
            ));
        }

        Ok(())
    }

    fn report(proposal: Proposal, effects: Effects) -> TransitionReport {
        TransitionReport {
            proposal,
            outcome: effects.outcome,
            decision: effects.decision,
            arbiter: effects.arbiter,
            review: None,
        }
    }

    /// Apply one event and work out its side effects. The caller commits.
    async fn apply_event(
        &self,
        proposal: &mut Proposal,
        event: &LifecycleEvent,
    ) -> Result<Effects, CoordinatorError> {
        let outcome = proposal.apply(event);

        let TransitionOutcome::Applied { from, to, .. } = &outcome else {
            self.audit_ignored(proposal, &outcome);
            return Ok(Effects::ignored(outcome));
        };

        if from != to {
            info!("Proposal {}: {} → {} on {}", proposal.id, from, to, event);
        } else {
            debug!("Proposal {}: {} recorded in {}", proposal.id, event, from);
        }
        self.audit.log(AuditEvent::new(
            "transition",
            json!({
                "proposal_id": proposal.id.as_str(),
                "event": event.name(),
                "from": from,
                "to": to,
                "iterations": proposal.iterations(),
            }),
        ));

        let arbiter = if outcome.changed_status() && proposal.status() == ProposalStatus::Disputed
        {
            self.assign_arbiter(proposal).await?
        } else {
            None
        };

        let arbitrated = if matches!(event, LifecycleEvent::ArbiterDecision { .. }) {
            if proposal.arbiter().is_none() {
                warn!(
                    "Proposal {}: arbiter decision applied without an assigned arbiter",
                    proposal.id
                );
            }
            proposal.arbiter().cloned()
        } else {
            None
        };

        let decision = Decision::for_transition(proposal, event, &outcome);

        Ok(Effects {
            outcome,
            decision,
            arbiter,
            arbitrated,
        })
    }

    /// Bind an arbiter for a fresh dispute, excluding the voters' families.
    async fn assign_arbiter(
        &self,
        proposal: &mut Proposal,
    ) -> Result<Option<ArbiterSelection>, CoordinatorError> {
        let history = self.ledger.snapshot().await?;
        let contributors: Vec<AgentIdentity> =
            proposal.votes().iter().map(|v| v.agent.clone()).collect();
        let roles = self.config.roles();

        let Some(selection) =
            select_arbiter(roles.arbiters(), roles.strategy(), &contributors, &history)
        else {
            warn!(
                "Proposal {} disputed with no arbiter candidates; awaiting a human decision",
                proposal.id
            );
            return Ok(None);
        };

        if selection.fallback {
            warn!(
                "Proposal {}: every arbiter shares a family with the reviewers, falling back to {}",
                proposal.id, selection.arbiter
            );
        } else {
            info!(
                "Proposal {}: arbiter {} assigned ({} prior arbitrations)",
                proposal.id, selection.arbiter, selection.prior_arbitrations
            );
        }

        proposal.assign_arbiter(selection.arbiter.clone());
        self.audit.log(AuditEvent::new(
            "arbiter_assigned",
            json!({
                "proposal_id": proposal.id.as_str(),
                "arbiter": selection.arbiter.name(),
                "family": selection.arbiter.family(),
                "prior_arbitrations": selection.prior_arbitrations,
                "fallback": selection.fallback,
            }),
        ));

        Ok(Some(selection))
    }

    fn audit_ignored(&self, proposal: &Proposal, outcome: &TransitionOutcome) {
        if let TransitionOutcome::Ignored {
            state,
            event,
            reason,
        } = outcome
        {
            debug!(
                "Proposal {}: {} ignored in {} ({})",
                proposal.id,
                event,
                state,
                reason.as_str()
            );
            self.audit.log(AuditEvent::new(
                "event_ignored",
                json!({
                    "proposal_id": proposal.id.as_str(),
                    "state": state,
                    "event": event,
                    "reason": reason,
                }),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use council_domain::{
        ArbitrationHistory, DecisionOutcome, DecisionSource, DirectiveAction, RoleConfig,
    };
    use std::sync::atomic::{AtomicBool, Ordering};

    // ==================== Mock Ports ====================

    #[derive(Default)]
    struct MockRepository {
        proposals: Mutex<HashMap<ProposalId, Proposal>>,
        reviews: Mutex<Vec<Review>>,
        decisions: Mutex<Vec<Decision>>,
        fail_saves: AtomicBool,
    }

    #[async_trait]
    impl ProposalRepository for MockRepository {
        async fn insert(&self, proposal: &Proposal) -> Result<(), RepositoryError> {
            let mut proposals = self.proposals.lock().await;
            if proposals.contains_key(&proposal.id) {
                return Err(RepositoryError::AlreadyExists(proposal.id.clone()));
            }
            proposals.insert(proposal.id.clone(), proposal.clone());
            Ok(())
        }

        async fn load(&self, id: &ProposalId) -> Result<Option<Proposal>, RepositoryError> {
            Ok(self.proposals.lock().await.get(id).cloned())
        }

        async fn save(&self, proposal: &Proposal) -> Result<(), RepositoryError> {
            if self.fail_saves.load(Ordering::SeqCst) {
                return Err(RepositoryError::Storage("disk full".to_string()));
            }
            self.proposals
                .lock()
                .await
                .insert(proposal.id.clone(), proposal.clone());
            Ok(())
        }

        async fn append_review(&self, review: Review) -> Result<(), RepositoryError> {
            self.reviews.lock().await.push(review);
            Ok(())
        }

        async fn reviews(&self, id: &ProposalId) -> Result<Vec<Review>, RepositoryError> {
            Ok(self
                .reviews
                .lock()
                .await
                .iter()
                .filter(|r| &r.proposal_id == id)
                .cloned()
                .collect())
        }

        async fn append_decision(&self, decision: Decision) -> Result<(), RepositoryError> {
            self.decisions.lock().await.push(decision);
            Ok(())
        }

        async fn decisions(&self, id: &ProposalId) -> Result<Vec<Decision>, RepositoryError> {
            Ok(self
                .decisions
                .lock()
                .await
                .iter()
                .filter(|d| &d.proposal_id == id)
                .cloned()
                .collect())
        }
    }

    #[derive(Default)]
    struct MockLedger {
        counts: Mutex<HashMap<String, usize>>,
    }

    #[async_trait]
    impl ArbitrationLedger for MockLedger {
        async fn snapshot(&self) -> Result<ArbitrationHistory, RepositoryError> {
            Ok(self
                .counts
                .lock()
                .await
                .iter()
                .map(|(k, v)| (k.clone(), *v))
                .collect())
        }

        async fn record_arbitration(&self, arbiter: &AgentIdentity) -> Result<(), RepositoryError> {
            *self
                .counts
                .lock()
                .await
                .entry(arbiter.name().to_string())
                .or_insert(0) += 1;
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingAudit {
        types: std::sync::Mutex<Vec<&'static str>>,
    }

    impl AuditLogger for RecordingAudit {
        fn log(&self, event: AuditEvent) {
            self.types.lock().unwrap().push(event.event_type);
        }
    }

    // ==================== Helpers ====================

    type Coordinator = ReviewCoordinator<MockRepository, MockLedger>;

    fn ids(names: &[&str]) -> Vec<AgentIdentity> {
        names.iter().map(|n| AgentIdentity::new(*n)).collect()
    }

    fn coordinator(roles: RoleConfig) -> (Coordinator, Arc<MockLedger>) {
        let (coordinator, _, ledger) = coordinator_with_repository(roles);
        (coordinator, ledger)
    }

    fn coordinator_with_repository(
        roles: RoleConfig,
    ) -> (Coordinator, Arc<MockRepository>, Arc<MockLedger>) {
        let repository = Arc::new(MockRepository::default());
        let ledger = Arc::new(MockLedger::default());
        let coordinator = ReviewCoordinator::new(
            Arc::clone(&repository),
            Arc::clone(&ledger),
            CouncilConfig::new(roles),
        );
        (coordinator, repository, ledger)
    }

    fn roles(reviewers: &[&str], arbiters: &[&str], min_votes: usize) -> RoleConfig {
        RoleConfig::new(AgentIdentity::new("claude-opus"), ids(reviewers))
            .unwrap()
            .with_arbiters(ids(arbiters))
            .unwrap()
            .with_min_votes(min_votes)
            .unwrap()
    }

    async fn open(c: &Coordinator) -> ProposalId {
        let opened = c
            .open_proposal("Add JWT auth", "Add token auth", &[])
            .await
            .unwrap();
        let id = opened.proposal.id.clone();
        c.create_proposal(&id).await.unwrap();
        id
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn test_open_proposal_classifies_and_assigns() {
        let (c, _) = coordinator(roles(&["gpt-5", "gemini-pro"], &[], 1));
        let opened = c
            .open_proposal(
                "Add JWT auth",
                "Token based login",
                &["src/auth/jwt.rs".to_string()],
            )
            .await
            .unwrap();

        assert_eq!(opened.matches[0].name, "security");
        assert_eq!(opened.proposal.status(), ProposalStatus::Draft);
        assert_eq!(opened.proposal.planner.expertise, "security");
        assert_eq!(opened.proposal.reviewers.len(), 2);

        let stored = c.proposal(&opened.proposal.id).await.unwrap();
        assert_eq!(stored, opened.proposal);
    }

    #[tokio::test]
    async fn test_happy_path_to_implemented() {
        let (c, _) = coordinator(roles(&["gpt-5"], &[], 1));
        let id = open(&c).await;

        let report = c
            .record_review(
                &id,
                ReviewSubmission::new("gpt-5", Vote::Approve).with_content("LGTM"),
            )
            .await
            .unwrap();
        assert_eq!(report.status(), ProposalStatus::Approved);
        let decision = report.decision.unwrap();
        assert_eq!(decision.outcome, DecisionOutcome::Approved);
        assert_eq!(decision.source, DecisionSource::Consensus);

        let directive = c.next_directive(&id).await.unwrap();
        assert_eq!(directive.action, DirectiveAction::Implement);

        let report = c.mark_implemented(&id).await.unwrap();
        assert_eq!(report.status(), ProposalStatus::Implemented);
        assert_eq!(c.decisions(&id).await.unwrap().len(), 1);
        assert_eq!(c.reviews(&id).await.unwrap()[0].content, "LGTM");
    }

    #[tokio::test]
    async fn test_dispute_assigns_arbiter_and_updates_ledger() {
        let (c, ledger) = coordinator(roles(
            &["gpt-5", "gemini-pro"],
            &["gpt-4o", "claude-sonnet"],
            2,
        ));
        let id = open(&c).await;

        c.record_review(&id, ReviewSubmission::new("gpt-5", Vote::Approve))
            .await
            .unwrap();
        let report = c
            .record_review(&id, ReviewSubmission::new("gemini-pro", Vote::Reject))
            .await
            .unwrap();
        assert_eq!(report.status(), ProposalStatus::Disputed);
        let selection = report.arbiter.unwrap();
        assert_eq!(selection.arbiter.name(), "claude-sonnet");
        assert!(!selection.fallback);

        let directive = c.next_directive(&id).await.unwrap();
        assert_eq!(directive.action, DirectiveAction::Arbitrate);
        assert_eq!(directive.target_agent.unwrap().name(), "claude-sonnet");

        let report = c.record_arbiter_decision(&id, Vote::Reject).await.unwrap();
        assert_eq!(report.status(), ProposalStatus::Rejected);
        assert_eq!(report.decision.unwrap().source, DecisionSource::Arbiter);

        let history = ledger.snapshot().await.unwrap();
        assert_eq!(history.count(&AgentIdentity::new("claude-sonnet")), 1);
    }

    #[tokio::test]
    async fn test_arbiter_revise_is_ignored_and_not_counted() {
        let (c, ledger) = coordinator(roles(&["gpt-5", "gemini-pro"], &["llama-3"], 2));
        let id = open(&c).await;
        c.record_review(&id, ReviewSubmission::new("gpt-5", Vote::Approve))
            .await
            .unwrap();
        c.record_review(&id, ReviewSubmission::new("gemini-pro", Vote::Reject))
            .await
            .unwrap();

        let report = c.record_arbiter_decision(&id, Vote::Revise).await.unwrap();
        assert!(report.outcome.is_ignored());
        assert_eq!(report.status(), ProposalStatus::Disputed);
        assert!(ledger.snapshot().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_dispute_without_arbiters_waits_for_human() {
        let (c, _) = coordinator(roles(&["gpt-5", "gemini-pro"], &[], 2));
        let id = open(&c).await;
        c.record_review(&id, ReviewSubmission::new("gpt-5", Vote::Approve))
            .await
            .unwrap();
        let report = c
            .record_review(&id, ReviewSubmission::new("gemini-pro", Vote::Reject))
            .await
            .unwrap();
        assert_eq!(report.status(), ProposalStatus::Disputed);
        assert!(report.arbiter.is_none());

        let directive = c.next_directive(&id).await.unwrap();
        assert_eq!(directive.action, DirectiveAction::AwaitHumanDecision);

        let report = c.record_human_decision(&id, true).await.unwrap();
        assert_eq!(report.status(), ProposalStatus::Approved);
        assert_eq!(report.decision.unwrap().source, DecisionSource::Human);
    }

    #[tokio::test]
    async fn test_majority_split_across_roster_goes_to_dispute() {
        let roles = RoleConfig::new(
            AgentIdentity::new("claude-opus"),
            ids(&["gpt-5", "gemini-pro", "llama-3"]),
        )
        .unwrap();
        let (c, _) = coordinator(roles);
        let id = open(&c).await;

        for (agent, vote) in [
            ("gpt-5", Vote::Approve),
            ("gemini-pro", Vote::Approve),
            ("llama-3", Vote::Reject),
        ] {
            c.record_review(&id, ReviewSubmission::new(agent, vote))
                .await
                .unwrap();
        }
        assert_eq!(c.proposal(&id).await.unwrap().status(), ProposalStatus::Disputed);

        let directive = c.next_directive(&id).await.unwrap();
        assert_eq!(directive.action, DirectiveAction::AwaitHumanDecision);

        let revote = c
            .record_review(&id, ReviewSubmission::new("llama-3", Vote::Approve))
            .await
            .unwrap();
        assert!(revote.outcome.is_ignored());

        let report = c.record_human_decision(&id, true).await.unwrap();
        assert_eq!(report.status(), ProposalStatus::Approved);
        assert_eq!(report.decision.unwrap().source, DecisionSource::Human);
    }

    #[tokio::test]
    async fn test_default_quorum_waits_for_every_reviewer() {
        let roles = RoleConfig::new(
            AgentIdentity::new("claude-opus"),
            ids(&["gpt-5", "gemini-pro", "llama-3"]),
        )
        .unwrap();
        let (c, _) = coordinator(roles);

        // A first APPROVE settles nothing
        let id = open(&c).await;
        let report = c
            .record_review(&id, ReviewSubmission::new("gpt-5", Vote::Approve))
            .await
            .unwrap();
        assert_eq!(report.status(), ProposalStatus::PendingReview);
        assert!(report.decision.is_none());

        let report = c
            .record_review(&id, ReviewSubmission::new("gemini-pro", Vote::Reject))
            .await
            .unwrap();
        assert!(report.outcome.is_applied());
        assert!(report.review.as_ref().unwrap().counted);
        assert_eq!(report.status(), ProposalStatus::PendingReview);

        // REVISE still wins after earlier APPROVE votes
        let id = open(&c).await;
        c.record_review(&id, ReviewSubmission::new("gpt-5", Vote::Approve))
            .await
            .unwrap();
        let report = c
            .record_review(&id, ReviewSubmission::new("gemini-pro", Vote::Revise))
            .await
            .unwrap();
        assert_eq!(report.status(), ProposalStatus::Revision);
    }

    #[tokio::test]
    async fn test_failed_save_writes_no_ledger_or_decision() {
        let (c, repository, ledger) =
            coordinator_with_repository(roles(&["gpt-5", "gemini-pro"], &["llama-3"], 2));
        let id = open(&c).await;
        c.record_review(&id, ReviewSubmission::new("gpt-5", Vote::Approve))
            .await
            .unwrap();
        c.record_review(&id, ReviewSubmission::new("gemini-pro", Vote::Reject))
            .await
            .unwrap();

        repository.fail_saves.store(true, Ordering::SeqCst);
        let err = c.record_arbiter_decision(&id, Vote::Approve).await.unwrap_err();
        assert!(matches!(err, CoordinatorError::Repository(RepositoryError::Storage(_))));

        assert!(ledger.snapshot().await.unwrap().is_empty());
        assert!(c.decisions(&id).await.unwrap().is_empty());
        assert_eq!(c.proposal(&id).await.unwrap().status(), ProposalStatus::Disputed);
    }

    #[tokio::test]
    async fn test_late_vote_is_stored_uncounted() {
        let (c, _) = coordinator(roles(&["gpt-5", "gemini-pro"], &[], 1));
        let id = open(&c).await;
        c.record_review(&id, ReviewSubmission::new("gpt-5", Vote::Approve))
            .await
            .unwrap();

        let report = c
            .record_review(&id, ReviewSubmission::new("gemini-pro", Vote::Reject))
            .await
            .unwrap();
        assert!(report.outcome.is_ignored());
        assert_eq!(report.status(), ProposalStatus::Approved);
        assert!(!report.review.unwrap().counted);

        let reviews = c.reviews(&id).await.unwrap();
        assert_eq!(reviews.len(), 2);
        assert!(reviews[0].counted);
        assert!(!reviews[1].counted);
        assert_eq!(c.proposal(&id).await.unwrap().votes().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_vote_in_iteration_is_not_counted() {
        let (c, _) = coordinator(roles(&["gpt-5", "gemini-pro"], &[], 2));
        let id = open(&c).await;
        c.record_review(&id, ReviewSubmission::new("gpt-5", Vote::Approve))
            .await
            .unwrap();
        let report = c
            .record_review(&id, ReviewSubmission::new("gpt-5", Vote::Approve))
            .await
            .unwrap();

        assert!(matches!(
            report.outcome,
            TransitionOutcome::Ignored {
                reason: IgnoreReason::DuplicateVote,
                ..
            }
        ));
        assert_eq!(report.status(), ProposalStatus::PendingReview);
        assert_eq!(report.proposal.votes().len(), 1);
    }

    #[tokio::test]
    async fn test_revision_replaces_content_and_escalates_at_cap() {
        let roles = roles(&["gpt-5"], &[], 1).with_max_iterations(2).unwrap();
        let (c, _) = coordinator(roles);
        let id = open(&c).await;

        c.record_review(&id, ReviewSubmission::new("gpt-5", Vote::Revise))
            .await
            .unwrap();
        let report = c
            .record_revision(&id, Some("second draft".to_string()))
            .await
            .unwrap();
        assert_eq!(report.status(), ProposalStatus::PendingReview);
        assert_eq!(report.proposal.content, "second draft");
        assert_eq!(report.proposal.iterations(), 1);

        c.record_review(&id, ReviewSubmission::new("gpt-5", Vote::Revise))
            .await
            .unwrap();
        let report = c.record_revision(&id, None).await.unwrap();
        assert_eq!(report.status(), ProposalStatus::Escalated);
        assert_eq!(report.proposal.content, "second draft");
        let decision = report.decision.unwrap();
        assert_eq!(decision.outcome, DecisionOutcome::Deferred);
        assert_eq!(decision.source, DecisionSource::Escalation);

        let reviews = c.reviews(&id).await.unwrap();
        assert_eq!(reviews[0].iteration, 0);
        assert_eq!(reviews[1].iteration, 1);
    }

    #[tokio::test]
    async fn test_ignored_revision_keeps_content() {
        let (c, _) = coordinator(roles(&["gpt-5"], &[], 1));
        let id = open(&c).await;
        let report = c
            .record_revision(&id, Some("ignored".to_string()))
            .await
            .unwrap();
        assert!(report.outcome.is_ignored());
        assert_eq!(report.proposal.content, "Add token auth");
    }

    #[tokio::test]
    async fn test_unknown_proposal() {
        let (c, _) = coordinator(roles(&["gpt-5"], &[], 1));
        let missing = ProposalId::new("missing");
        let err = c.create_proposal(&missing).await.unwrap_err();
        assert!(matches!(err, CoordinatorError::ProposalNotFound(id) if id == missing));
        assert!(c.next_directive(&missing).await.is_err());
        assert!(c.reviews(&missing).await.is_err());
    }

    #[tokio::test]
    async fn test_concurrent_reviews_are_serialized() {
        let reviewers = ["gpt-5", "gemini-pro", "llama-3", "mistral-large"];
        let (c, _) = coordinator(roles(&reviewers, &[], reviewers.len()));
        let c = Arc::new(c);
        let id = open(&c).await;

        let mut handles = Vec::new();
        for reviewer in reviewers {
            let c = Arc::clone(&c);
            let id = id.clone();
            handles.push(tokio::spawn(async move {
                c.record_review(&id, ReviewSubmission::new(reviewer, Vote::Approve))
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let proposal = c.proposal(&id).await.unwrap();
        assert_eq!(proposal.status(), ProposalStatus::Approved);
        assert_eq!(proposal.votes().len(), reviewers.len());
        assert!(c.reviews(&id).await.unwrap().iter().all(|r| r.counted));
    }

    #[tokio::test]
    async fn test_audit_events() {
        let audit = Arc::new(RecordingAudit::default());
        let (c, _) = coordinator(roles(&["gpt-5"], &[], 1));
        let c = c.with_audit_logger(audit.clone());
        let id = open(&c).await;
        c.record_review(&id, ReviewSubmission::new("gpt-5", Vote::Approve))
            .await
            .unwrap();
        c.record_revision(&id, None).await.unwrap();

        let types = audit.types.lock().unwrap().clone();
        assert_eq!(
            types,
            vec![
                "proposal_opened",
                "transition",
                "transition",
                "decision",
                "review_recorded",
                "event_ignored",
            ]
        );
    }
}
