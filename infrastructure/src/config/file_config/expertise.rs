//! Expertise profiles from TOML (`[[expertise]]` array)
//!
//! Entries whose name matches a built-in profile replace it; other entries
//! are added after the built-ins.
//!
//! ```toml
//! [[expertise]]
//! name = "payments"
//! keywords = ["payment", "invoice", "stripe"]
//! file_patterns = ["**/billing/**"]
//! focus = "Check idempotency, currency rounding and refund paths."
//! ```

use council_domain::ExpertiseProfile;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileExpertiseProfile {
    pub name: String,
    pub keywords: Vec<String>,
    pub file_patterns: Vec<String>,
    pub focus: String,
}

impl FileExpertiseProfile {
    pub fn to_profile(&self) -> ExpertiseProfile {
        ExpertiseProfile::new(self.name.trim(), self.focus.clone())
            .with_keywords(self.keywords.iter().map(String::as_str))
            .with_file_patterns(self.file_patterns.iter().map(String::as_str))
    }
}

/// Merge configured profiles over the built-in ones.
pub fn merge_profiles(configured: &[FileExpertiseProfile]) -> Vec<ExpertiseProfile> {
    let mut profiles = ExpertiseProfile::defaults();
    for entry in configured.iter().filter(|e| !e.name.trim().is_empty()) {
        let profile = entry.to_profile();
        match profiles.iter_mut().find(|p| p.name == profile.name) {
            Some(existing) => *existing = profile,
            None => profiles.push(profile),
        }
    }
    profiles
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expertise_deserialize_and_merge() {
        let toml_str = r#"
[[expertise]]
name = "payments"
keywords = ["invoice"]
file_patterns = ["**/billing/**"]
focus = "Money paths"

[[expertise]]
name = "security"
keywords = ["vault"]
focus = "Secrets only"
"#;
        let config: crate::config::FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.expertise.len(), 2);

        let profiles = merge_profiles(&config.expertise);
        let defaults = ExpertiseProfile::defaults();
        assert_eq!(profiles.len(), defaults.len() + 1);

        let security = profiles.iter().find(|p| p.name == "security").unwrap();
        assert_eq!(security.keywords, vec!["vault".to_string()]);
        assert_eq!(profiles.last().unwrap().name, "payments");
    }

    #[test]
    fn test_unnamed_entries_are_skipped() {
        let profiles = merge_profiles(&[FileExpertiseProfile::default()]);
        assert_eq!(profiles.len(), ExpertiseProfile::defaults().len());
    }
}
