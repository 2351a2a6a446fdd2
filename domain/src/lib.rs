//! Domain layer for review-council
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns, and
//! every operation in it is a pure function of its inputs.
//!
//! # Core Concepts
//!
//! ## Proposals
//!
//! A planner agent drafts a proposal; reviewer agents vote on it; an arbiter
//! settles disputes; a human steps in when the revision cap is hit.
//!
//! - **Expertise**: [`classify_task`] ranks expertise profiles for a task
//! - **Roles**: [`assign_roles`] binds planner, reviewers and an arbiter
//! - **Quorum**: [`evaluate`] turns one iteration's votes into a verdict
//! - **Lifecycle**: [`transition`] moves a proposal through its states
//! - **Directives**: [`next_directive`] says who acts next

pub mod config;
pub mod core;
pub mod expertise;
pub mod proposal;
pub mod quorum;
pub mod roles;
pub mod util;

// Re-export commonly used types
pub use config::{ConfigIssue, ConfigIssueCode, Severity};
pub use core::{error::DomainError, identity::AgentIdentity};
pub use expertise::{ExpertiseMatch, ExpertiseProfile, GENERAL_EXPERTISE, classify_task};
pub use proposal::{
    Decision, DecisionOutcome, DecisionSource, Directive, DirectiveAction, IgnoreReason,
    LifecycleContext, LifecycleEvent, Proposal, ProposalId, ProposalStatus, Review, ReviewId,
    SeverityBreakdown, TransitionOutcome, next_directive, transition,
};
pub use quorum::{
    CastVote, ConsensusMode, ConsensusOutcome, ConsensusResult, Vote, VoteTally, evaluate,
};
pub use roles::{
    ArbiterSelection, ArbiterStrategy, ArbitrationHistory, RoleAssignment, RoleConfig, RoleSlot,
    assign_roles, select_arbiter,
};
