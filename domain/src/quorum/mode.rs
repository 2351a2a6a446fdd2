//! Consensus modes
//!
//! The mode decides how a mix of APPROVE and REJECT votes resolves.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// How mixed votes resolve
///
/// - `Majority`: the larger side wins; a tie is a dispute (default)
/// - `Unanimous`: any mix is a dispute
///
/// # Example
///
/// ```
/// use council_domain::quorum::ConsensusMode;
///
/// let mode: ConsensusMode = "unanimous".parse().unwrap();
/// assert_eq!(mode, ConsensusMode::Unanimous);
/// assert_eq!(ConsensusMode::default(), ConsensusMode::Majority);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConsensusMode {
    #[default]
    Majority,
    Unanimous,
}

impl ConsensusMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsensusMode::Majority => "majority",
            ConsensusMode::Unanimous => "unanimous",
        }
    }

    /// Get a human-readable description of this mode
    pub fn description(&self) -> &'static str {
        match self {
            ConsensusMode::Majority => "majority (larger side wins, ties are disputed)",
            ConsensusMode::Unanimous => "unanimous (any disagreement is disputed)",
        }
    }

    pub fn valid_values() -> Vec<String> {
        vec!["majority".to_string(), "unanimous".to_string()]
    }
}

impl std::fmt::Display for ConsensusMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ConsensusMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "majority" | "maj" => Ok(ConsensusMode::Majority),
            "unanimous" | "all" => Ok(ConsensusMode::Unanimous),
            _ => Err(DomainError::InvalidConsensusMode(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mode() {
        assert_eq!(
            "majority".parse::<ConsensusMode>().ok(),
            Some(ConsensusMode::Majority)
        );
        assert_eq!(
            "UNANIMOUS".parse::<ConsensusMode>().ok(),
            Some(ConsensusMode::Unanimous)
        );
        assert!("atleast:2".parse::<ConsensusMode>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(ConsensusMode::Majority.to_string(), "majority");
        assert_eq!(ConsensusMode::Unanimous.to_string(), "unanimous");
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&ConsensusMode::Unanimous).unwrap();
        assert_eq!(json, "\"unanimous\"");
    }
}
