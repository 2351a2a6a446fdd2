//! Agent identity value object

use serde::{Deserialize, Serialize};

/// A named reviewing / planning / arbitrating capability.
///
/// Every identity belongs to an identity family. Families are used to keep
/// arbitration diverse: an arbiter should not come from the same family as
/// the reviewers whose dispute it settles.
///
/// # Example
///
/// ```
/// use council_domain::AgentIdentity;
///
/// let claude = AgentIdentity::new("claude-opus");
/// assert_eq!(claude.family(), "claude");
///
/// let custom = AgentIdentity::new("sec-bot").with_family("internal");
/// assert_eq!(custom.family(), "internal");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentIdentity {
    name: String,
    family: String,
}

impl AgentIdentity {
    /// Create an identity whose family is derived from the name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let family = derive_family(&name);
        Self { name, family }
    }

    /// Override the derived family
    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        let family = family.into();
        if !family.trim().is_empty() {
            self.family = family.trim().to_lowercase();
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    /// Whether both identities belong to the same family
    pub fn same_family(&self, other: &AgentIdentity) -> bool {
        self.family == other.family
    }
}

impl std::fmt::Display for AgentIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl From<&str> for AgentIdentity {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for AgentIdentity {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Leading segment of the name, lowercased.
///
/// E.g., "claude-sonnet" -> "claude", "gpt_codex" -> "gpt"
fn derive_family(name: &str) -> String {
    let trimmed = name.trim();
    trimmed
        .split(['-', '_', ':', '/'])
        .find(|s| !s.is_empty())
        .unwrap_or(trimmed)
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_derivation() {
        assert_eq!(AgentIdentity::new("claude-opus").family(), "claude");
        assert_eq!(AgentIdentity::new("gpt_codex").family(), "gpt");
        assert_eq!(AgentIdentity::new("Gemini-Pro").family(), "gemini");
        assert_eq!(AgentIdentity::new("solo").family(), "solo");
        assert_eq!(AgentIdentity::new("ollama:llama3").family(), "ollama");
        assert_eq!(AgentIdentity::new("openai/gpt-4o").family(), "openai");
    }

    #[test]
    fn test_family_override() {
        let id = AgentIdentity::new("codex").with_family("OpenAI");
        assert_eq!(id.family(), "openai");
        assert_eq!(id.name(), "codex");

        // Blank override keeps the derived family
        let id = AgentIdentity::new("claude-haiku").with_family("  ");
        assert_eq!(id.family(), "claude");
    }

    #[test]
    fn test_same_family() {
        let a = AgentIdentity::new("claude-opus");
        let b = AgentIdentity::new("claude-sonnet");
        let c = AgentIdentity::new("gpt-5");
        assert!(a.same_family(&b));
        assert!(!a.same_family(&c));
    }

    #[test]
    fn test_display_is_name() {
        assert_eq!(AgentIdentity::new("gpt-5").to_string(), "gpt-5");
    }
}
