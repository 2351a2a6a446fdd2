//! Expertise matching
//!
//! [`ExpertiseProfile`]s describe domain focuses; [`classify_task`] ranks
//! them for a task description and its touched files.

pub mod classifier;
pub mod profile;

pub use classifier::{ExpertiseMatch, GENERAL_EXPERTISE, classify_task};
pub use profile::ExpertiseProfile;
