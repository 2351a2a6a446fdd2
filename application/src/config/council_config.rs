//! Council configuration container.
//!
//! [`CouncilConfig`] groups the validated role configuration with the
//! expertise profiles used for classification. It is built once at
//! startup and handed to [`ReviewCoordinator`](crate::ReviewCoordinator).

use council_domain::config::{ConfigIssue, ConfigIssueCode, Severity};
use council_domain::{ExpertiseProfile, RoleConfig};

#[derive(Debug, Clone)]
pub struct CouncilConfig {
    roles: RoleConfig,
    profiles: Vec<ExpertiseProfile>,
}

impl CouncilConfig {
    /// Create a config with the built-in expertise profiles.
    pub fn new(roles: RoleConfig) -> Self {
        Self {
            roles,
            profiles: ExpertiseProfile::defaults(),
        }
    }

    /// Replace the expertise profiles.
    pub fn with_profiles(mut self, profiles: Vec<ExpertiseProfile>) -> Self {
        self.profiles = profiles;
        self
    }

    // ==================== Accessors ====================

    pub fn roles(&self) -> &RoleConfig {
        &self.roles
    }

    pub fn profiles(&self) -> &[ExpertiseProfile] {
        &self.profiles
    }

    // ==================== Validation ====================

    /// Non-fatal issues of the assembled configuration.
    ///
    /// Fatal role problems cannot occur here: [`RoleConfig`] refuses to be
    /// built without a planner and reviewers.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.roles.warnings();

        for profile in self.profiles.iter().filter(|p| p.is_empty()) {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::EmptyExpertiseProfile {
                    name: profile.name.clone(),
                },
                format!(
                    "expertise '{}': no keywords or file patterns, it can never match",
                    profile.name
                ),
            ));
        }

        issues
    }

    /// Check whether any issues are errors (i.e. fatal).
    pub fn has_errors(issues: &[ConfigIssue]) -> bool {
        issues.iter().any(|i| i.severity == Severity::Error)
    }
}
