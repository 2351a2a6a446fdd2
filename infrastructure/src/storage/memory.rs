//! In-memory proposal store.
//!
//! Implements both [`ProposalRepository`] and [`ArbitrationLedger`] behind
//! `tokio::sync::RwLock`s. Contents live as long as the store.

use async_trait::async_trait;
use council_application::{ArbitrationLedger, ProposalRepository, RepositoryError};
use council_domain::{AgentIdentity, ArbitrationHistory, Decision, Proposal, ProposalId, Review};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Default)]
struct ProposalRecords {
    proposal: Option<Proposal>,
    reviews: Vec<Review>,
    decisions: Vec<Decision>,
}

#[derive(Default)]
pub struct InMemoryProposalStore {
    records: RwLock<HashMap<ProposalId, ProposalRecords>>,
    arbitrations: RwLock<HashMap<String, usize>>,
}

impl InMemoryProposalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the ledger, e.g. from a previous run
    pub fn with_arbitrations(self, history: impl IntoIterator<Item = (String, usize)>) -> Self {
        Self {
            records: self.records,
            arbitrations: RwLock::new(history.into_iter().collect()),
        }
    }

    /// All stored proposals, oldest first
    pub async fn proposals(&self) -> Vec<Proposal> {
        let records = self.records.read().await;
        let mut proposals: Vec<Proposal> = records
            .values()
            .filter_map(|r| r.proposal.clone())
            .collect();
        proposals.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        proposals
    }
}

#[async_trait]
impl ProposalRepository for InMemoryProposalStore {
    async fn insert(&self, proposal: &Proposal) -> Result<(), RepositoryError> {
        let mut records = self.records.write().await;
        let entry = records.entry(proposal.id.clone()).or_default();
        if entry.proposal.is_some() {
            return Err(RepositoryError::AlreadyExists(proposal.id.clone()));
        }
        entry.proposal = Some(proposal.clone());
        debug!("Stored proposal {}", proposal.id);
        Ok(())
    }

    async fn load(&self, id: &ProposalId) -> Result<Option<Proposal>, RepositoryError> {
        let records = self.records.read().await;
        Ok(records.get(id).and_then(|r| r.proposal.clone()))
    }

    async fn save(&self, proposal: &Proposal) -> Result<(), RepositoryError> {
        let mut records = self.records.write().await;
        match records.get_mut(&proposal.id) {
            Some(record) if record.proposal.is_some() => {
                record.proposal = Some(proposal.clone());
                Ok(())
            }
            _ => Err(RepositoryError::NotFound(proposal.id.clone())),
        }
    }

    async fn append_review(&self, review: Review) -> Result<(), RepositoryError> {
        let mut records = self.records.write().await;
        match records.get_mut(&review.proposal_id) {
            Some(record) => {
                record.reviews.push(review);
                Ok(())
            }
            None => Err(RepositoryError::NotFound(review.proposal_id)),
        }
    }

    async fn reviews(&self, id: &ProposalId) -> Result<Vec<Review>, RepositoryError> {
        let records = self.records.read().await;
        Ok(records.get(id).map(|r| r.reviews.clone()).unwrap_or_default())
    }

    async fn append_decision(&self, decision: Decision) -> Result<(), RepositoryError> {
        let mut records = self.records.write().await;
        match records.get_mut(&decision.proposal_id) {
            Some(record) => {
                record.decisions.push(decision);
                Ok(())
            }
            None => Err(RepositoryError::NotFound(decision.proposal_id)),
        }
    }

    async fn decisions(&self, id: &ProposalId) -> Result<Vec<Decision>, RepositoryError> {
        let records = self.records.read().await;
        Ok(records
            .get(id)
            .map(|r| r.decisions.clone())
            .unwrap_or_default())
    }
}

#[async_trait]
impl ArbitrationLedger for InMemoryProposalStore {
    async fn snapshot(&self) -> Result<ArbitrationHistory, RepositoryError> {
        let counts = self.arbitrations.read().await;
        Ok(counts.iter().map(|(name, count)| (name.clone(), *count)).collect())
    }

    async fn record_arbitration(&self, arbiter: &AgentIdentity) -> Result<(), RepositoryError> {
        let mut counts = self.arbitrations.write().await;
        *counts.entry(arbiter.name().to_string()).or_insert(0) += 1;
        Ok(())
    }
}
