//! Proposal lifecycle domain
//!
//! - [`ProposalStatus`] / [`LifecycleEvent`] / [`transition`]: the state machine
//! - [`Proposal`]: the entity that carries status and lifecycle data
//! - [`Review`] / [`Decision`]: append-only records kept per proposal
//! - [`next_directive`]: who acts next and how

pub mod directive;
pub mod entities;
pub mod lifecycle;
pub mod record;
pub mod status;

pub use directive::{Directive, DirectiveAction, next_directive};
pub use entities::{Proposal, ProposalId};
pub use lifecycle::{IgnoreReason, LifecycleContext, LifecycleEvent, TransitionOutcome, transition};
pub use record::{
    Decision, DecisionOutcome, DecisionSource, Review, ReviewId, SeverityBreakdown,
};
pub use status::ProposalStatus;
