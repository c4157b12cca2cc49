//! # pleito-voting — Collegiate Judgment Voting
//!
//! Implements the voting side of case adjudication:
//!
//! - **Committee** (`committee.rs`): committee scopes with their minimum-size
//!   rules, and the read-only [`CommitteeRoster`] seam through which active
//!   membership is fetched — fresh at every quorum evaluation.
//!
//! - **Vote** (`vote.rs`): immutable per-member vote records with the
//!   favor/against/abstain choice set.
//!
//! - **Quorum** (`quorum.rs`): named quorum fractions (the source flows
//!   disagreed between 50% and 60%, so the rule is explicit configuration),
//!   tally resolution with an explicit tie outcome, pluggable tie-break
//!   policy, and the duplicate-rejecting [`BallotBox`].
//!
//! ## Crate Policy
//!
//! - Depends only on `pleito-core` internally.
//! - Pure data and arithmetic — no clock access, no I/O.

pub mod committee;
pub mod quorum;
pub mod vote;

pub use committee::{CommitteeRoster, CommitteeScope, StaticRoster};
pub use quorum::{
    break_tie, resolve, BallotBox, QuorumConfig, QuorumError, QuorumRule, TallyOutcome,
    TieBreakPolicy, VoteTally,
};
pub use vote::{Vote, VoteChoice};
