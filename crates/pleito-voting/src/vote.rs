//! # Vote Records
//!
//! One [`Vote`] per committee member per judgment session, immutable once
//! cast. The substantive choices carry domain labels depending on the case
//! kind: for a denúncia, `Favor` reads "procedente" (complaint upheld) and
//! `Against` reads "improcedente".

use serde::{Deserialize, Serialize};

use pleito_core::{MemberId, Timestamp};

/// A committee member's choice in a judgment vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoteChoice {
    /// In favor of the filing party (procedente).
    Favor,
    /// Against the filing party (improcedente).
    Against,
    /// Abstention — counted for quorum, ignored for the outcome.
    Abstain,
}

impl VoteChoice {
    /// Whether this choice counts toward the outcome comparison.
    pub fn is_substantive(&self) -> bool {
        !matches!(self, Self::Abstain)
    }
}

impl std::fmt::Display for VoteChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Favor => "FAVOR",
            Self::Against => "AGAINST",
            Self::Abstain => "ABSTAIN",
        };
        f.write_str(s)
    }
}

/// A single cast vote. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vote {
    /// The member who cast the vote.
    pub member: MemberId,
    /// The member's choice.
    pub choice: VoteChoice,
    /// Optional written justification (declaração de voto).
    pub justification: Option<String>,
    /// When the vote was cast.
    pub cast_at: Timestamp,
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substantive_choices() {
        assert!(VoteChoice::Favor.is_substantive());
        assert!(VoteChoice::Against.is_substantive());
        assert!(!VoteChoice::Abstain.is_substantive());
    }

    #[test]
    fn test_vote_serde_roundtrip() {
        let vote = Vote {
            member: MemberId::new(),
            choice: VoteChoice::Favor,
            justification: Some("Violation is documented".to_string()),
            cast_at: Timestamp::parse("2024-05-10T14:00:00Z").unwrap(),
        };
        let json = serde_json::to_string(&vote).unwrap();
        let parsed: Vote = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, vote);
    }
}
