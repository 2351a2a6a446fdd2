//! Application layer for review-council
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::CouncilConfig;
pub use ports::{
    audit_logger::{AuditEvent, AuditLogger, NoAuditLogger},
    repository::{ArbitrationLedger, ProposalRepository, RepositoryError},
};
pub use use_cases::review_coordinator::{
    CoordinatorError, OpenedProposal, ReviewCoordinator, ReviewSubmission, TransitionReport,
};
