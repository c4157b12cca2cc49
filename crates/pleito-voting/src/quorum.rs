//! # Quorum and Tally Resolution
//!
//! Decides whether a committee may decide at all ([`QuorumRule`]) and what
//! the cast votes amount to ([`resolve`]).
//!
//! ## Quorum Fraction
//!
//! The council's flows historically disagreed on the fraction — some required
//! a simple majority of active members, others three fifths. The rule is
//! therefore an explicit, named configuration value carried per flow; there
//! is no default at the type level.
//!
//! ## Tie-Break
//!
//! A strict tie between the substantive sides yields an explicit
//! [`TallyOutcome::Tie`]. What happens next is a named policy
//! ([`TieBreakPolicy`]): declare the tie and require a re-vote, or let the
//! relator's substantive vote count double.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use pleito_core::MemberId;

use crate::vote::{Vote, VoteChoice};

// ─── Quorum Rules ────────────────────────────────────────────────────

/// Minimum fraction of active members that must have voted before a
/// decision is valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuorumRule {
    /// ⌈N/2⌉ of the active members.
    SimpleMajority,
    /// ⌈0.6·N⌉ of the active members.
    ThreeFifths,
}

impl QuorumRule {
    /// The number of votes required for a committee of `total` active members.
    pub fn required_votes(&self, total: usize) -> usize {
        match self {
            Self::SimpleMajority => total.div_ceil(2),
            Self::ThreeFifths => (total * 3).div_ceil(5),
        }
    }

    /// Whether `votes_cast` satisfies this rule for `total` active members.
    ///
    /// An empty committee never has quorum.
    pub fn has_quorum(&self, total: usize, votes_cast: usize) -> bool {
        total > 0 && votes_cast >= self.required_votes(total)
    }
}

impl std::fmt::Display for QuorumRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::SimpleMajority => "SIMPLE_MAJORITY",
            Self::ThreeFifths => "THREE_FIFTHS",
        };
        f.write_str(s)
    }
}

/// What to do when the substantive votes split evenly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TieBreakPolicy {
    /// Declare the tie; the decision attempt fails and the committee
    /// must vote again.
    DeclareTie,
    /// The relator's substantive vote counts double (voto de qualidade).
    RelatorCastingVote,
}

/// Per-flow voting configuration: quorum fraction, tie-break policy, and an
/// optional override of the committee's scope-default minimum size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuorumConfig {
    /// The quorum fraction for this flow.
    pub rule: QuorumRule,
    /// The tie-break policy for this flow.
    pub tie_break: TieBreakPolicy,
    /// Overrides [`CommitteeScope::min_members`] when set.
    ///
    /// [`CommitteeScope::min_members`]: crate::committee::CommitteeScope::min_members
    pub min_members: Option<usize>,
}

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors from vote collection and tally resolution.
#[derive(Error, Debug)]
pub enum QuorumError {
    /// A member attempted to vote twice in the same session. The existing
    /// vote is preserved untouched.
    #[error("member {member} has already voted in this session")]
    DuplicateVote {
        /// The member whose second vote was rejected.
        member: MemberId,
    },

    /// The substantive votes split evenly and the policy declines to break
    /// the tie.
    #[error("vote tied at {favor} x {against}; a re-vote is required")]
    UnresolvedTie {
        /// Votes in favor.
        favor: usize,
        /// Votes against.
        against: usize,
    },
}

// ─── Tally ───────────────────────────────────────────────────────────

/// The side the tally favors, before any tie-break is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TallyOutcome {
    /// The favor side holds the plurality.
    Favor,
    /// The against side holds the plurality.
    Against,
    /// Strict tie between the substantive sides.
    Tie,
}

/// The resolved counts and outcome of a vote set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    /// Votes in favor.
    pub favor: usize,
    /// Votes against.
    pub against: usize,
    /// Abstentions.
    pub abstain: usize,
    /// Plurality outcome between the substantive sides.
    pub outcome: TallyOutcome,
    /// True iff one substantive side is empty and there are no abstentions.
    pub unanimous: bool,
}

impl VoteTally {
    /// Total number of votes cast, abstentions included.
    pub fn total_cast(&self) -> usize {
        self.favor + self.against + self.abstain
    }
}

/// Resolve a set of cast votes into counts, plurality outcome, and
/// unanimity.
///
/// Abstentions are ignored for the plurality comparison; a strict tie
/// between the substantive sides yields [`TallyOutcome::Tie`]. Unanimity
/// requires every cast vote on one substantive side — any abstention
/// defeats it.
pub fn resolve(votes: &[Vote]) -> VoteTally {
    let favor = votes.iter().filter(|v| v.choice == VoteChoice::Favor).count();
    let against = votes.iter().filter(|v| v.choice == VoteChoice::Against).count();
    let abstain = votes.iter().filter(|v| v.choice == VoteChoice::Abstain).count();

    let outcome = match favor.cmp(&against) {
        std::cmp::Ordering::Greater => TallyOutcome::Favor,
        std::cmp::Ordering::Less => TallyOutcome::Against,
        std::cmp::Ordering::Equal => TallyOutcome::Tie,
    };

    let unanimous = abstain == 0 && (favor == 0) != (against == 0);

    VoteTally { favor, against, abstain, outcome, unanimous }
}

/// Apply the tie-break policy to a tallied outcome.
///
/// Non-tied outcomes pass through unchanged. Under
/// [`TieBreakPolicy::RelatorCastingVote`] the relator's substantive choice
/// decides; if the relator abstained or did not vote, the tie stands.
///
/// # Errors
///
/// [`QuorumError::UnresolvedTie`] when the tie cannot be broken.
pub fn break_tie(
    tally: &VoteTally,
    policy: TieBreakPolicy,
    relator_choice: Option<VoteChoice>,
) -> Result<TallyOutcome, QuorumError> {
    if tally.outcome != TallyOutcome::Tie {
        return Ok(tally.outcome);
    }

    let unresolved = QuorumError::UnresolvedTie { favor: tally.favor, against: tally.against };

    match policy {
        TieBreakPolicy::DeclareTie => Err(unresolved),
        TieBreakPolicy::RelatorCastingVote => match relator_choice {
            Some(VoteChoice::Favor) => Ok(TallyOutcome::Favor),
            Some(VoteChoice::Against) => Ok(TallyOutcome::Against),
            Some(VoteChoice::Abstain) | None => Err(unresolved),
        },
    }
}

// ─── Ballot Box ──────────────────────────────────────────────────────

/// Collects the votes of one judgment session, enforcing one vote per
/// member. Votes are immutable once cast.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BallotBox {
    votes: Vec<Vote>,
}

impl BallotBox {
    /// Empty ballot box.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cast a vote.
    ///
    /// # Errors
    ///
    /// [`QuorumError::DuplicateVote`] if the member has already voted; the
    /// existing vote is left untouched.
    pub fn cast(&mut self, vote: Vote) -> Result<(), QuorumError> {
        if self.votes.iter().any(|v| v.member == vote.member) {
            return Err(QuorumError::DuplicateVote { member: vote.member });
        }
        self.votes.push(vote);
        Ok(())
    }

    /// The votes cast so far, in casting order.
    pub fn votes(&self) -> &[Vote] {
        &self.votes
    }

    /// Number of votes cast.
    pub fn count(&self) -> usize {
        self.votes.len()
    }

    /// The choice a member cast, if they have voted.
    pub fn choice_of(&self, member: &MemberId) -> Option<VoteChoice> {
        self.votes.iter().find(|v| v.member == *member).map(|v| v.choice)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pleito_core::Timestamp;

    fn vote(choice: VoteChoice) -> Vote {
        Vote {
            member: MemberId::new(),
            choice,
            justification: None,
            cast_at: Timestamp::parse("2024-05-10T14:00:00Z").unwrap(),
        }
    }

    fn votes(favor: usize, against: usize, abstain: usize) -> Vec<Vote> {
        let mut out = Vec::new();
        out.extend((0..favor).map(|_| vote(VoteChoice::Favor)));
        out.extend((0..against).map(|_| vote(VoteChoice::Against)));
        out.extend((0..abstain).map(|_| vote(VoteChoice::Abstain)));
        out
    }

    // ── Quorum fractions ─────────────────────────────────────────────

    #[test]
    fn test_simple_majority_required_votes() {
        assert_eq!(QuorumRule::SimpleMajority.required_votes(5), 3);
        assert_eq!(QuorumRule::SimpleMajority.required_votes(4), 2);
        assert_eq!(QuorumRule::SimpleMajority.required_votes(3), 2);
        assert_eq!(QuorumRule::SimpleMajority.required_votes(1), 1);
    }

    #[test]
    fn test_three_fifths_required_votes() {
        assert_eq!(QuorumRule::ThreeFifths.required_votes(5), 3);
        assert_eq!(QuorumRule::ThreeFifths.required_votes(7), 5); // ceil(4.2)
        assert_eq!(QuorumRule::ThreeFifths.required_votes(10), 6);
        assert_eq!(QuorumRule::ThreeFifths.required_votes(3), 2); // ceil(1.8)
    }

    #[test]
    fn test_has_quorum_boundary() {
        assert!(QuorumRule::SimpleMajority.has_quorum(5, 3));
        assert!(!QuorumRule::SimpleMajority.has_quorum(5, 2));
        assert!(QuorumRule::ThreeFifths.has_quorum(5, 3));
        assert!(!QuorumRule::ThreeFifths.has_quorum(7, 4));
    }

    #[test]
    fn test_empty_committee_never_has_quorum() {
        assert!(!QuorumRule::SimpleMajority.has_quorum(0, 0));
        assert!(!QuorumRule::ThreeFifths.has_quorum(0, 5));
    }

    // ── Tally resolution ─────────────────────────────────────────────

    #[test]
    fn test_three_two_split_favors_majority_not_unanimous() {
        let tally = resolve(&votes(3, 2, 0));
        assert_eq!(tally.outcome, TallyOutcome::Favor);
        assert!(!tally.unanimous);
        assert_eq!(tally.total_cast(), 5);
    }

    #[test]
    fn test_five_zero_is_unanimous() {
        let tally = resolve(&votes(5, 0, 0));
        assert_eq!(tally.outcome, TallyOutcome::Favor);
        assert!(tally.unanimous);
    }

    #[test]
    fn test_abstention_defeats_unanimity() {
        let tally = resolve(&votes(4, 0, 1));
        assert_eq!(tally.outcome, TallyOutcome::Favor);
        assert!(!tally.unanimous);
    }

    #[test]
    fn test_abstentions_ignored_for_plurality() {
        let tally = resolve(&votes(1, 2, 4));
        assert_eq!(tally.outcome, TallyOutcome::Against);
    }

    #[test]
    fn test_strict_tie() {
        let tally = resolve(&votes(2, 2, 1));
        assert_eq!(tally.outcome, TallyOutcome::Tie);
        assert!(!tally.unanimous);
    }

    #[test]
    fn test_all_abstentions_is_tie_not_unanimous() {
        let tally = resolve(&votes(0, 0, 3));
        assert_eq!(tally.outcome, TallyOutcome::Tie);
        assert!(!tally.unanimous);
    }

    // ── Tie-break ────────────────────────────────────────────────────

    #[test]
    fn test_declare_tie_requires_revote() {
        let tally = resolve(&votes(2, 2, 0));
        let result = break_tie(&tally, TieBreakPolicy::DeclareTie, Some(VoteChoice::Favor));
        assert!(matches!(result, Err(QuorumError::UnresolvedTie { favor: 2, against: 2 })));
    }

    #[test]
    fn test_relator_casting_vote_breaks_tie() {
        let tally = resolve(&votes(2, 2, 0));
        let outcome =
            break_tie(&tally, TieBreakPolicy::RelatorCastingVote, Some(VoteChoice::Against))
                .unwrap();
        assert_eq!(outcome, TallyOutcome::Against);
    }

    #[test]
    fn test_relator_abstention_leaves_tie_standing() {
        let tally = resolve(&votes(2, 2, 1));
        let result =
            break_tie(&tally, TieBreakPolicy::RelatorCastingVote, Some(VoteChoice::Abstain));
        assert!(result.is_err());
    }

    #[test]
    fn test_non_tie_passes_through_unchanged() {
        let tally = resolve(&votes(3, 2, 0));
        let outcome = break_tie(&tally, TieBreakPolicy::DeclareTie, None).unwrap();
        assert_eq!(outcome, TallyOutcome::Favor);
    }

    // ── Ballot box ───────────────────────────────────────────────────

    #[test]
    fn test_duplicate_vote_rejected_tally_unchanged() {
        let member = MemberId::new();
        let mut box_ = BallotBox::new();
        box_.cast(Vote {
            member,
            choice: VoteChoice::Favor,
            justification: None,
            cast_at: Timestamp::parse("2024-05-10T14:00:00Z").unwrap(),
        })
        .unwrap();

        let second = box_.cast(Vote {
            member,
            choice: VoteChoice::Against,
            justification: None,
            cast_at: Timestamp::parse("2024-05-10T14:05:00Z").unwrap(),
        });

        assert!(matches!(second, Err(QuorumError::DuplicateVote { .. })));
        assert_eq!(box_.count(), 1);
        // The original vote is preserved untouched.
        assert_eq!(box_.choice_of(&member), Some(VoteChoice::Favor));
    }

    #[test]
    fn test_choice_of_unknown_member() {
        let box_ = BallotBox::new();
        assert_eq!(box_.choice_of(&MemberId::new()), None);
    }

    #[test]
    fn test_ballot_box_serde_roundtrip() {
        let mut box_ = BallotBox::new();
        box_.cast(vote(VoteChoice::Favor)).unwrap();
        box_.cast(vote(VoteChoice::Abstain)).unwrap();
        let json = serde_json::to_string(&box_).unwrap();
        let parsed: BallotBox = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, box_);
    }
}
