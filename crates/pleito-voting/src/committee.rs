//! # Committees — Scope and Roster Lookup
//!
//! Committee membership is managed outside this engine; the adjudication
//! core consumes it read-only through [`CommitteeRoster`]. The roster is
//! fetched fresh at every quorum evaluation — composition may change between
//! vote casts, and quorum is always judged against the membership at
//! decision time, not a snapshot taken at scheduling time.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use pleito_core::{CommitteeId, MemberId};

/// The scope of an electoral committee.
///
/// The minimum-size rule differs by scope: the national committee must seat
/// more members than a state committee before it may decide anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommitteeScope {
    /// National electoral committee.
    National,
    /// State (UF) electoral committee.
    State,
}

impl CommitteeScope {
    /// Default minimum number of active members required before the
    /// committee may decide a case. Overridable via [`QuorumConfig`].
    ///
    /// [`QuorumConfig`]: crate::quorum::QuorumConfig
    pub fn min_members(&self) -> usize {
        match self {
            Self::National => 5,
            Self::State => 3,
        }
    }
}

impl std::fmt::Display for CommitteeScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::National => "NATIONAL",
            Self::State => "STATE",
        };
        f.write_str(s)
    }
}

/// Read-only lookup of a committee's active members.
///
/// Implemented by the committee-management collaborator; the engine only
/// ever calls it at quorum-evaluation time.
pub trait CommitteeRoster: Send + Sync {
    /// The currently active members of the committee, in seating order.
    fn active_members(&self, committee: &CommitteeId) -> Vec<MemberId>;
}

/// In-memory roster for tests and fixtures.
#[derive(Debug, Default)]
pub struct StaticRoster {
    members: HashMap<CommitteeId, Vec<MemberId>>,
}

impl StaticRoster {
    /// Empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a committee's member list.
    pub fn seat(&mut self, committee: CommitteeId, members: Vec<MemberId>) {
        self.members.insert(committee, members);
    }
}

impl CommitteeRoster for StaticRoster {
    fn active_members(&self, committee: &CommitteeId) -> Vec<MemberId> {
        self.members.get(committee).cloned().unwrap_or_default()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_minimum_sizes() {
        assert_eq!(CommitteeScope::National.min_members(), 5);
        assert_eq!(CommitteeScope::State.min_members(), 3);
    }

    #[test]
    fn test_scope_display() {
        assert_eq!(CommitteeScope::National.to_string(), "NATIONAL");
        assert_eq!(CommitteeScope::State.to_string(), "STATE");
    }

    #[test]
    fn test_static_roster_lookup() {
        let committee = CommitteeId::new();
        let members = vec![MemberId::new(), MemberId::new(), MemberId::new()];
        let mut roster = StaticRoster::new();
        roster.seat(committee, members.clone());

        assert_eq!(roster.active_members(&committee), members);
    }

    #[test]
    fn test_static_roster_unknown_committee_is_empty() {
        let roster = StaticRoster::new();
        assert!(roster.active_members(&CommitteeId::new()).is_empty());
    }

    #[test]
    fn test_static_roster_reseat_replaces() {
        let committee = CommitteeId::new();
        let mut roster = StaticRoster::new();
        roster.seat(committee, vec![MemberId::new()]);
        let replacement = vec![MemberId::new(), MemberId::new()];
        roster.seat(committee, replacement.clone());
        assert_eq!(roster.active_members(&committee), replacement);
    }
}
