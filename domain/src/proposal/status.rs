//! Proposal lifecycle states

use serde::{Deserialize, Serialize};

/// Lifecycle status of a proposal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    #[default]
    Draft,
    PendingReview,
    Revision,
    Disputed,
    Escalated,
    Approved,
    Rejected,
    Implemented,
}

impl ProposalStatus {
    pub const ALL: [ProposalStatus; 8] = [
        ProposalStatus::Draft,
        ProposalStatus::PendingReview,
        ProposalStatus::Revision,
        ProposalStatus::Disputed,
        ProposalStatus::Escalated,
        ProposalStatus::Approved,
        ProposalStatus::Rejected,
        ProposalStatus::Implemented,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProposalStatus::Draft => "draft",
            ProposalStatus::PendingReview => "pending_review",
            ProposalStatus::Revision => "revision",
            ProposalStatus::Disputed => "disputed",
            ProposalStatus::Escalated => "escalated",
            ProposalStatus::Approved => "approved",
            ProposalStatus::Rejected => "rejected",
            ProposalStatus::Implemented => "implemented",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProposalStatus::Draft => "Draft",
            ProposalStatus::PendingReview => "Pending Review",
            ProposalStatus::Revision => "Revision",
            ProposalStatus::Disputed => "Disputed",
            ProposalStatus::Escalated => "Escalated",
            ProposalStatus::Approved => "Approved",
            ProposalStatus::Rejected => "Rejected",
            ProposalStatus::Implemented => "Implemented",
        }
    }

    /// Approved is terminal for the review process; only implementation follows.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ProposalStatus::Approved | ProposalStatus::Rejected | ProposalStatus::Implemented
        )
    }
}

impl std::fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        let terminal: Vec<_> = ProposalStatus::ALL
            .iter()
            .filter(|s| s.is_terminal())
            .collect();
        assert_eq!(
            terminal,
            vec![
                &ProposalStatus::Approved,
                &ProposalStatus::Rejected,
                &ProposalStatus::Implemented
            ]
        );
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&ProposalStatus::PendingReview).unwrap();
        assert_eq!(json, "\"pending_review\"");
        assert_eq!(ProposalStatus::PendingReview.to_string(), "pending_review");
    }

    #[test]
    fn test_default_is_draft() {
        assert_eq!(ProposalStatus::default(), ProposalStatus::Draft);
    }
}
