//! Application-level configuration.
//!
//! - [`CouncilConfig`]: validated roles plus expertise profiles

pub mod council_config;

pub use council_config::CouncilConfig;
