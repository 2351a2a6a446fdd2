//! Infrastructure layer for review-council
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod logging;
pub mod storage;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FileConfig, FileExpertiseProfile, FileReviewConfig, FileRolesConfig,
    merge_profiles,
};
pub use logging::JsonlAuditLogger;
pub use storage::InMemoryProposalStore;
