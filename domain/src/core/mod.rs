//! Core domain concepts shared across all subdomains.
//!
//! - [`identity::AgentIdentity`]: a named agent and its identity family
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod identity;
