//! # Domain Identity Newtypes
//!
//! Newtype wrappers for every identifier namespace in the adjudication
//! engine. You cannot pass a `MemberId` where a `CaseId` is expected —
//! the distinction is enforced by the type system, not by convention.
//!
//! Also defines [`CaseKind`] (denúncia vs impugnação) and the generated
//! [`ProtocolNumber`] under which a case is filed.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

/// Unique identifier for a case (complaint or challenge).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaseId(pub Uuid);

/// Unique identifier for a council member (professional).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberId(pub Uuid);

/// Unique identifier for a candidacy slate (chapa).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlateId(pub Uuid);

/// Unique identifier for an electoral committee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommitteeId(pub Uuid);

/// Unique identifier for a judgment session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JudgmentId(pub Uuid);

/// Unique identifier for an appeal (recurso).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AppealId(pub Uuid);

macro_rules! impl_uuid_id {
    ($($ty:ident),+ $(,)?) => {
        $(
            impl $ty {
                /// Generate a new random identifier.
                #[allow(clippy::new_without_default)]
                pub fn new() -> Self {
                    Self(Uuid::new_v4())
                }

                /// Access the inner UUID.
                pub fn as_uuid(&self) -> &Uuid {
                    &self.0
                }
            }

            impl std::fmt::Display for $ty {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    self.0.fmt(f)
                }
            }
        )+
    };
}

impl_uuid_id!(CaseId, MemberId, SlateId, CommitteeId, JudgmentId, AppealId);

// ─── Case Kind ───────────────────────────────────────────────────────

/// The two kinds of electoral dispute the engine adjudicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CaseKind {
    /// Denúncia — ethics complaint against a slate, slate member,
    /// committee member, or third party.
    Complaint,
    /// Impugnação — formal challenge to a candidacy or election result.
    Challenge,
}

impl CaseKind {
    /// The protocol prefix for this kind (`DEN` / `IMP`).
    pub fn protocol_prefix(&self) -> &'static str {
        match self {
            Self::Complaint => "DEN",
            Self::Challenge => "IMP",
        }
    }
}

impl std::fmt::Display for CaseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Complaint => "DENUNCIA",
            Self::Challenge => "IMPUGNACAO",
        };
        f.write_str(s)
    }
}

// ─── Protocol Number ─────────────────────────────────────────────────

/// The protocol under which a case is filed: kind prefix, filing year,
/// and a zero-padded sequential number, rendered `DEN/2024/000123`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProtocolNumber {
    kind: CaseKind,
    year: i32,
    sequence: u32,
}

impl ProtocolNumber {
    /// Maximum sequence number representable in the six-digit field.
    pub const MAX_SEQUENCE: u32 = 999_999;

    /// Create a protocol number.
    ///
    /// # Errors
    ///
    /// Returns an error if the sequence is zero or exceeds the six-digit
    /// field, or if the year is outside 1900..=9999.
    pub fn new(kind: CaseKind, year: i32, sequence: u32) -> Result<Self, CoreError> {
        if sequence == 0 || sequence > Self::MAX_SEQUENCE {
            return Err(CoreError::InvalidProtocol(format!(
                "sequence must be in 1..={}, got {sequence}",
                Self::MAX_SEQUENCE
            )));
        }
        if !(1900..=9999).contains(&year) {
            return Err(CoreError::InvalidProtocol(format!(
                "year must be in 1900..=9999, got {year}"
            )));
        }
        Ok(Self { kind, year, sequence })
    }

    /// The case kind encoded in the prefix.
    pub fn kind(&self) -> CaseKind {
        self.kind
    }

    /// The filing year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The sequential number within the year.
    pub fn sequence(&self) -> u32 {
        self.sequence
    }
}

impl std::fmt::Display for ProtocolNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{:06}", self.kind.protocol_prefix(), self.year, self.sequence)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_distinct() {
        let a = CaseId::new();
        let b = CaseId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_id_display_is_uuid() {
        let id = MemberId::new();
        assert_eq!(id.to_string(), id.as_uuid().to_string());
    }

    #[test]
    fn test_id_serde_roundtrip() {
        let id = CommitteeId::new();
        let json = serde_json::to_string(&id).unwrap();
        let parsed: CommitteeId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }

    // ── Protocol numbers ─────────────────────────────────────────────

    #[test]
    fn test_protocol_rendering_zero_padded() {
        let p = ProtocolNumber::new(CaseKind::Complaint, 2024, 123).unwrap();
        assert_eq!(p.to_string(), "DEN/2024/000123");
    }

    #[test]
    fn test_challenge_protocol_prefix() {
        let p = ProtocolNumber::new(CaseKind::Challenge, 2024, 999_999).unwrap();
        assert_eq!(p.to_string(), "IMP/2024/999999");
    }

    #[test]
    fn test_protocol_rejects_zero_sequence() {
        assert!(ProtocolNumber::new(CaseKind::Complaint, 2024, 0).is_err());
    }

    #[test]
    fn test_protocol_rejects_overflowing_sequence() {
        assert!(ProtocolNumber::new(CaseKind::Complaint, 2024, 1_000_000).is_err());
    }

    #[test]
    fn test_protocol_rejects_absurd_year() {
        assert!(ProtocolNumber::new(CaseKind::Complaint, 189, 1).is_err());
        assert!(ProtocolNumber::new(CaseKind::Complaint, 10_000, 1).is_err());
    }

    #[test]
    fn test_case_kind_display() {
        assert_eq!(CaseKind::Complaint.to_string(), "DENUNCIA");
        assert_eq!(CaseKind::Challenge.to_string(), "IMPUGNACAO");
    }
}
