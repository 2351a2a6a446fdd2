//! Review consensus domain
//!
//! Votes cast by reviewing agents during one iteration are resolved into a
//! single outcome by [`evaluate`].
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  votes (current iteration) + ConsensusMode                │
//! │                    ↓                                      │
//! │  1. empty          → none                                 │
//! │  2. all APPROVE    → approved                             │
//! │  3. all REJECT     → rejected                             │
//! │  4. any REVISE     → revise                               │
//! │  5. majority, A≠R  → larger side                          │
//! │  6. otherwise      → disputed                             │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod consensus;
pub mod mode;
pub mod vote;

// Re-export main types
pub use consensus::{ConsensusOutcome, ConsensusResult, evaluate};
pub use mode::ConsensusMode;
pub use vote::{CastVote, Vote, VoteTally, vote_summary};
