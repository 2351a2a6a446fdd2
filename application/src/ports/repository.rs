//! Storage ports
//!
//! [`ProposalRepository`] keeps proposals with their review and decision
//! records; [`ArbitrationLedger`] keeps per-identity arbitration counts.
//! Implementations (adapters) live in the infrastructure layer.

use async_trait::async_trait;
use council_domain::{AgentIdentity, ArbitrationHistory, Decision, Proposal, ProposalId, Review};
use thiserror::Error;

/// Errors that can occur in storage adapters
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Proposal not found: {0}")]
    NotFound(ProposalId),

    #[error("Proposal already exists: {0}")]
    AlreadyExists(ProposalId),

    #[error("Storage error: {0}")]
    Storage(String),
}

#[async_trait]
pub trait ProposalRepository: Send + Sync {
    /// Store a new proposal; fails with `AlreadyExists` for a known id
    async fn insert(&self, proposal: &Proposal) -> Result<(), RepositoryError>;

    async fn load(&self, id: &ProposalId) -> Result<Option<Proposal>, RepositoryError>;

    /// Overwrite an existing proposal; fails with `NotFound` for an unknown id
    async fn save(&self, proposal: &Proposal) -> Result<(), RepositoryError>;

    async fn append_review(&self, review: Review) -> Result<(), RepositoryError>;

    /// Reviews of a proposal in arrival order
    async fn reviews(&self, id: &ProposalId) -> Result<Vec<Review>, RepositoryError>;

    async fn append_decision(&self, decision: Decision) -> Result<(), RepositoryError>;

    /// Decisions of a proposal in the order they were made
    async fn decisions(&self, id: &ProposalId) -> Result<Vec<Decision>, RepositoryError>;
}

#[async_trait]
pub trait ArbitrationLedger: Send + Sync {
    /// Read-only copy of the current counts
    async fn snapshot(&self) -> Result<ArbitrationHistory, RepositoryError>;

    /// Count one more arbitration for `arbiter`
    async fn record_arbitration(&self, arbiter: &AgentIdentity) -> Result<(), RepositoryError>;
}
