//! Arbitration history snapshot

use crate::core::identity::AgentIdentity;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Read-only snapshot of how many arbitrations each identity has handled.
///
/// Callers refresh it from storage and pass it into the assigner; the
/// assigner itself never keeps counts between calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArbitrationHistory {
    counts: HashMap<String, usize>,
}

impl ArbitrationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_count(mut self, identity: &str, count: usize) -> Self {
        self.counts.insert(identity.to_string(), count);
        self
    }

    /// Prior arbitrations for an identity (0 if never recorded)
    pub fn count(&self, identity: &AgentIdentity) -> usize {
        self.counts.get(identity.name()).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl FromIterator<(String, usize)> for ArbitrationHistory {
    fn from_iter<T: IntoIterator<Item = (String, usize)>>(iter: T) -> Self {
        Self {
            counts: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_defaults_to_zero() {
        let history = ArbitrationHistory::new().with_count("claude-opus", 2);
        assert_eq!(history.count(&AgentIdentity::new("claude-opus")), 2);
        assert_eq!(history.count(&AgentIdentity::new("gpt-5")), 0);
        assert_eq!(history.total(), 2);
    }

    #[test]
    fn test_from_iter() {
        let history: ArbitrationHistory =
            vec![("a".to_string(), 1), ("b".to_string(), 3)].into_iter().collect();
        assert_eq!(history.total(), 4);
    }
}
