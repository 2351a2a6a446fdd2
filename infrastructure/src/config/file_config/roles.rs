//! Role configuration from TOML (`[roles]` section)

use council_domain::config::{ConfigIssue, ConfigIssueCode};
use council_domain::{AgentIdentity, ArbiterStrategy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Role configuration from TOML
///
/// # Example
///
/// ```toml
/// [roles]
/// planner = "claude-opus-4.5"
/// reviewers = ["gpt-5.2-codex", "gemini-3-pro"]
/// arbiters = ["claude-sonnet-4.5", "llama-4"]
/// arbiter_strategy = "least-used"   # or "round-robin", "specific"
///
/// [roles.families]
/// "o3-mini" = "gpt"                 # override the derived identity family
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRolesConfig {
    pub planner: Option<String>,
    pub reviewers: Vec<String>,
    pub arbiters: Vec<String>,
    pub arbiter_strategy: String,
    /// Identity name → family override
    pub families: BTreeMap<String, String>,
}

impl Default for FileRolesConfig {
    fn default() -> Self {
        Self {
            planner: None,
            reviewers: Vec::new(),
            arbiters: Vec::new(),
            arbiter_strategy: ArbiterStrategy::default().as_str().to_string(),
            families: BTreeMap::new(),
        }
    }
}

impl FileRolesConfig {
    /// Build an identity, applying any family override.
    fn identity(&self, name: &str) -> AgentIdentity {
        let name = name.trim();
        let identity = AgentIdentity::new(name);
        match self.families.get(name) {
            Some(family) => identity.with_family(family.as_str()),
            None => identity,
        }
    }

    /// Parse an identity list, collecting issues for blank names.
    fn parse_identity_list(&self, field: &str, names: &[String]) -> (Vec<AgentIdentity>, Vec<ConfigIssue>) {
        let mut issues = Vec::new();
        let mut identities = Vec::new();
        for name in names {
            if name.trim().is_empty() {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::EmptyIdentityName {
                        field: format!("roles.{}", field),
                    },
                    format!("roles.{}: identity name cannot be empty in list", field),
                ));
            } else {
                identities.push(self.identity(name));
            }
        }
        (identities, issues)
    }

    /// Parse the planner name; missing or blank is fatal.
    pub fn parse_planner(&self) -> (Option<AgentIdentity>, Vec<ConfigIssue>) {
        match self.planner.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => (Some(self.identity(name)), vec![]),
            _ => (
                None,
                vec![ConfigIssue::error(
                    ConfigIssueCode::EmptyPlanner,
                    "roles.planner: a planner identity is required",
                )],
            ),
        }
    }

    /// Parse reviewer names; an empty roster is fatal.
    pub fn parse_reviewers(&self) -> (Vec<AgentIdentity>, Vec<ConfigIssue>) {
        let (reviewers, mut issues) = self.parse_identity_list("reviewers", &self.reviewers);
        if reviewers.is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::NoReviewers,
                "roles.reviewers: at least one reviewer identity is required",
            ));
        }
        (reviewers, issues)
    }

    pub fn parse_arbiters(&self) -> (Vec<AgentIdentity>, Vec<ConfigIssue>) {
        self.parse_identity_list("arbiters", &self.arbiters)
    }

    /// Parse arbiter_strategy string into ArbiterStrategy enum
    ///
    /// Falls back to `ArbiterStrategy::default()` on parse failure.
    pub fn parse_strategy(&self) -> (ArbiterStrategy, Vec<ConfigIssue>) {
        match self.arbiter_strategy.parse::<ArbiterStrategy>() {
            Ok(strategy) => (strategy, vec![]),
            Err(_) => {
                let fallback = ArbiterStrategy::default();
                let issue = ConfigIssue::warning(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "roles.arbiter_strategy".to_string(),
                        value: self.arbiter_strategy.clone(),
                        valid_values: ArbiterStrategy::valid_values(),
                    },
                    format!(
                        "roles.arbiter_strategy: unknown value '{}', falling back to '{}'",
                        self.arbiter_strategy, fallback
                    ),
                );
                (fallback, vec![issue])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::config::Severity;

    #[test]
    fn test_roles_config_default() {
        let config = FileRolesConfig::default();
        assert!(config.planner.is_none());
        assert!(config.reviewers.is_empty());
        assert_eq!(config.arbiter_strategy, "round-robin");
    }

    #[test]
    fn test_roles_config_deserialize() {
        let toml_str = r#"
[roles]
planner = "claude-opus"
reviewers = ["gpt-5", "o3-mini"]
arbiters = ["gemini-pro"]
arbiter_strategy = "least-used"

[roles.families]
"o3-mini" = "GPT"
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        let roles = &config.roles;

        let (planner, issues) = roles.parse_planner();
        assert!(issues.is_empty());
        assert_eq!(planner.unwrap().family(), "claude");

        let (reviewers, _) = roles.parse_reviewers();
        assert_eq!(reviewers[1].name(), "o3-mini");
        assert_eq!(reviewers[1].family(), "gpt");
        assert!(reviewers[0].same_family(&reviewers[1]));

        assert_eq!(roles.parse_strategy().0, ArbiterStrategy::LeastUsed);
    }

    #[test]
    fn test_missing_planner_and_reviewers_are_errors() {
        let config = FileRolesConfig::default();
        let (planner, issues) = config.parse_planner();
        assert!(planner.is_none());
        assert_eq!(issues[0].severity, Severity::Error);

        let (_, issues) = config.parse_reviewers();
        assert!(
            issues
                .iter()
                .any(|i| matches!(i.code, ConfigIssueCode::NoReviewers))
        );
    }

    #[test]
    fn test_blank_names_are_reported() {
        let config = FileRolesConfig {
            planner: Some("   ".to_string()),
            reviewers: vec!["gpt-5".to_string(), "".to_string()],
            ..Default::default()
        };
        assert!(config.parse_planner().0.is_none());

        let (reviewers, issues) = config.parse_reviewers();
        assert_eq!(reviewers.len(), 1);
        assert!(matches!(
            &issues[0].code,
            ConfigIssueCode::EmptyIdentityName { field } if field == "roles.reviewers"
        ));
    }

    #[test]
    fn test_invalid_strategy_falls_back() {
        let config = FileRolesConfig {
            arbiter_strategy: "random".to_string(),
            ..Default::default()
        };
        let (strategy, issues) = config.parse_strategy();
        assert_eq!(strategy, ArbiterStrategy::RoundRobin);
        assert_eq!(issues[0].severity, Severity::Warning);
    }
}
