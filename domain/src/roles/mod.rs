//! Role assignment domain
//!
//! - [`RoleConfig`]: planner, reviewers, arbiter candidates and bounds
//! - [`ArbitrationHistory`]: read-only snapshot of past arbitrations
//! - [`assign_roles`] / [`select_arbiter`]: pure assignment functions

pub mod assigner;
pub mod config;
pub mod history;

pub use assigner::{ArbiterSelection, RoleAssignment, RoleSlot, assign_roles, select_arbiter};
pub use config::{ArbiterStrategy, DEFAULT_MAX_ITERATIONS, RoleConfig};
pub use history::ArbitrationHistory;
