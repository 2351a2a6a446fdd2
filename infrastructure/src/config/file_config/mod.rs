//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and turned into domain types by the
//! `parse_*` methods, which report every problem as a [`ConfigIssue`].

mod expertise;
mod review;
mod roles;

pub use expertise::{FileExpertiseProfile, merge_profiles};
pub use review::FileReviewConfig;
pub use roles::FileRolesConfig;

use council_application::CouncilConfig;
use council_domain::RoleConfig;
use council_domain::config::ConfigIssue;
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Planner, reviewers and arbiter candidates
    pub roles: FileRolesConfig,
    /// Iteration cap and consensus settings
    pub review: FileReviewConfig,
    /// Additional or replacement expertise profiles
    pub expertise: Vec<FileExpertiseProfile>,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        self.to_council_config().1
    }

    /// Build the application config.
    ///
    /// Returns `None` when any issue is fatal. Warnings are returned either
    /// way, including the ones the assembled config reports about itself.
    pub fn to_council_config(&self) -> (Option<CouncilConfig>, Vec<ConfigIssue>) {
        let mut issues = Vec::new();

        let (planner, planner_issues) = self.roles.parse_planner();
        issues.extend(planner_issues);
        let (reviewers, reviewer_issues) = self.roles.parse_reviewers();
        issues.extend(reviewer_issues);
        let (arbiters, arbiter_issues) = self.roles.parse_arbiters();
        issues.extend(arbiter_issues);
        let (strategy, strategy_issues) = self.roles.parse_strategy();
        issues.extend(strategy_issues);
        let (max_iterations, iteration_issues) = self.review.parse_max_iterations();
        issues.extend(iteration_issues);
        let (mode, mode_issues) = self.review.parse_consensus_mode();
        issues.extend(mode_issues);

        if ConfigIssue::has_errors(&issues) {
            return (None, issues);
        }
        let (Some(planner), Some(max_iterations)) = (planner, max_iterations) else {
            return (None, issues);
        };

        // Only min_votes can still fail here
        let roles = RoleConfig::new(planner, reviewers)
            .and_then(|r| r.with_arbiters(arbiters))
            .and_then(|r| r.with_max_iterations(max_iterations))
            .map(|r| r.with_strategy(strategy).with_consensus_mode(mode))
            .and_then(|r| match self.review.min_votes {
                Some(min_votes) => r.with_min_votes(min_votes),
                None => Ok(r),
            });
        let roles = match roles {
            Ok(roles) => roles,
            Err(e) => {
                issues.push(ConfigIssue::from(&e));
                return (None, issues);
            }
        };

        let config = CouncilConfig::new(roles).with_profiles(merge_profiles(&self.expertise));
        issues.extend(config.validate());
        (Some(config), issues)
    }
}
