//! # Case Record — The Dispute Aggregate
//!
//! The persistent state of one electoral dispute: current status, phase
//! data, and the append-only history of every transition it has undergone.
//!
//! ## Mutation Discipline
//!
//! Fields are private. A `CaseRecord` is mutated exclusively through
//! [`CaseWorkflow`] transition methods — each one appends exactly one
//! history entry and bumps the optimistic `version` counter. Records are
//! never physically deleted; `Archived` is an append-only endpoint.
//!
//! [`CaseWorkflow`]: crate::workflow::CaseWorkflow

use serde::{Deserialize, Serialize};

use pleito_core::{CaseId, CaseKind, CommitteeId, MemberId, ProtocolNumber, SlateId, Timestamp};

// ─── Status ──────────────────────────────────────────────────────────

/// The lifecycle status of a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CaseStatus {
    /// Filed and protocol assigned.
    Received,
    /// Admissibility review in progress.
    UnderReview,
    /// Ruled admissible; defense will be requested.
    Admissible,
    /// Ruled inadmissible; routes to Archived.
    Inadmissible,
    /// Defense requested, statutory window open.
    AwaitingDefense,
    /// Defense received within the window.
    DefenseReceived,
    /// Evidence period open.
    EvidencePeriodOpen,
    /// Hearing scheduled.
    HearingScheduled,
    /// Closing-arguments window open.
    ClosingArgumentsPeriod,
    /// Ready for collegiate judgment.
    AwaitingJudgment,
    /// First-instance decision recorded.
    Judged,
    /// Appeal (recurso) in progress, second instance pending.
    UnderAppeal,
    /// Closed. Terminal — append-only endpoint.
    Archived,
}

impl CaseStatus {
    /// Whether this status is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Archived)
    }
}

impl std::fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Received => "RECEIVED",
            Self::UnderReview => "UNDER_REVIEW",
            Self::Admissible => "ADMISSIBLE",
            Self::Inadmissible => "INADMISSIBLE",
            Self::AwaitingDefense => "AWAITING_DEFENSE",
            Self::DefenseReceived => "DEFENSE_RECEIVED",
            Self::EvidencePeriodOpen => "EVIDENCE_PERIOD_OPEN",
            Self::HearingScheduled => "HEARING_SCHEDULED",
            Self::ClosingArgumentsPeriod => "CLOSING_ARGUMENTS_PERIOD",
            Self::AwaitingJudgment => "AWAITING_JUDGMENT",
            Self::Judged => "JUDGED",
            Self::UnderAppeal => "UNDER_APPEAL",
            Self::Archived => "ARCHIVED",
        };
        f.write_str(s)
    }
}

// ─── Target ──────────────────────────────────────────────────────────

/// Who the dispute is directed against. Exactly one target per case —
/// a single tagged variant, not four parallel entity types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaseTarget {
    /// A whole candidacy slate (chapa).
    Slate(SlateId),
    /// An individual member of a slate.
    SlateMember(MemberId),
    /// A sitting electoral-committee member.
    CommitteeMember(MemberId),
    /// Someone outside the council's registries.
    ThirdParty(String),
}

// ─── Audit ───────────────────────────────────────────────────────────

/// Composable audit stamp attached to each aggregate — created/updated
/// by and at. A value, not a base class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStamp {
    /// Who created the aggregate.
    pub created_by: String,
    /// When it was created.
    pub created_at: Timestamp,
    /// Who last mutated it.
    pub updated_by: String,
    /// When it was last mutated.
    pub updated_at: Timestamp,
}

impl AuditStamp {
    /// Stamp for a freshly created aggregate.
    pub fn new(actor: &str, at: Timestamp) -> Self {
        Self {
            created_by: actor.to_string(),
            created_at: at,
            updated_by: actor.to_string(),
            updated_at: at,
        }
    }

    /// Record a mutation.
    pub fn touch(&mut self, actor: &str, at: Timestamp) {
        self.updated_by = actor.to_string();
        self.updated_at = at;
    }
}

// ─── History ─────────────────────────────────────────────────────────

/// One immutable entry in a case's transition history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseHistoryEntry {
    /// Status before the transition.
    pub from_status: CaseStatus,
    /// Status after the transition.
    pub to_status: CaseStatus,
    /// Who drove the transition.
    pub actor: String,
    /// When it occurred.
    pub timestamp: Timestamp,
    /// Human-readable note.
    pub note: String,
}

// ─── Phase Data ──────────────────────────────────────────────────────

/// The admissibility ruling. Present from `Admissible`/`Inadmissible`
/// onward; a reasoning text is mandatory when `admissible` is false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmissibilityRuling {
    /// Whether the case was admitted.
    pub admissible: bool,
    /// The committee's reasoning.
    pub reasoning: String,
    /// When the ruling was made.
    pub ruled_at: Timestamp,
}

/// The defense filed by the target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Defense {
    /// The defense text.
    pub text: String,
    /// When it was received.
    pub received_at: Timestamp,
}

/// Bounds of the evidence-production period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidencePeriod {
    /// When the period opened.
    pub opened_at: Timestamp,
    /// Statutory close: defense receipt + 30 calendar days.
    pub closes_at: Timestamp,
}

/// The instruction hearing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hearing {
    /// When the hearing is (or was) held.
    pub scheduled_for: Timestamp,
    /// Summary minutes, filled once the hearing is recorded.
    pub summary: Option<String>,
}

/// The first-instance decision as applied to the case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseDecision {
    /// Decision text (outcome and reasoning).
    pub text: String,
    /// When it was decided.
    pub decided_at: Timestamp,
    /// Whether an appeal lies against it.
    pub appealable: bool,
    /// End of the appeal window, when appealable.
    pub appeal_deadline: Option<Timestamp>,
}

// ─── Case Record ─────────────────────────────────────────────────────

/// Parameters for filing a new case.
#[derive(Debug, Clone)]
pub struct CaseFiling {
    /// Protocol assigned at filing (carries the case kind).
    pub protocol: ProtocolNumber,
    /// Short subject line.
    pub subject: String,
    /// Full description of the alleged facts.
    pub description: String,
    /// The member who filed the case.
    pub filer: MemberId,
    /// Who the case is directed against.
    pub target: CaseTarget,
    /// The committee competent to adjudicate it.
    pub committee: CommitteeId,
    /// Sigilo — whether the case is confidential.
    pub confidential: bool,
}

/// The persistent state of one dispute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseRecord {
    id: CaseId,
    protocol: ProtocolNumber,
    subject: String,
    description: String,
    filer: MemberId,
    target: CaseTarget,
    committee: CommitteeId,
    confidential: bool,
    filed_at: Timestamp,
    status: CaseStatus,
    admissibility: Option<AdmissibilityRuling>,
    defense_deadline: Option<Timestamp>,
    defense: Option<Defense>,
    evidence_period: Option<EvidencePeriod>,
    hearing: Option<Hearing>,
    closing_deadline: Option<Timestamp>,
    closing_arguments: Option<String>,
    decision: Option<CaseDecision>,
    history: Vec<CaseHistoryEntry>,
    version: u64,
    audit: AuditStamp,
}

impl CaseRecord {
    /// Create a case in `Received`. Filing itself is not a transition —
    /// the history starts empty.
    pub(crate) fn new(filing: CaseFiling, actor: &str, filed_at: Timestamp) -> Self {
        Self {
            id: CaseId::new(),
            protocol: filing.protocol,
            subject: filing.subject,
            description: filing.description,
            filer: filing.filer,
            target: filing.target,
            committee: filing.committee,
            confidential: filing.confidential,
            filed_at,
            status: CaseStatus::Received,
            admissibility: None,
            defense_deadline: None,
            defense: None,
            evidence_period: None,
            hearing: None,
            closing_deadline: None,
            closing_arguments: None,
            decision: None,
            history: Vec::new(),
            version: 0,
            audit: AuditStamp::new(actor, filed_at),
        }
    }

    /// Append a history entry and move to the new status.
    ///
    /// Every caller has already validated its preconditions; this is the
    /// single point where status, version, and audit change together.
    pub(crate) fn apply_transition(
        &mut self,
        to: CaseStatus,
        actor: &str,
        note: String,
        at: Timestamp,
    ) {
        self.history.push(CaseHistoryEntry {
            from_status: self.status,
            to_status: to,
            actor: actor.to_string(),
            timestamp: at,
            note,
        });
        self.status = to;
        self.version += 1;
        self.audit.touch(actor, at);
    }

    pub(crate) fn set_admissibility(&mut self, ruling: AdmissibilityRuling) {
        self.admissibility = Some(ruling);
    }

    pub(crate) fn set_defense_deadline(&mut self, deadline: Timestamp) {
        self.defense_deadline = Some(deadline);
    }

    pub(crate) fn set_defense(&mut self, defense: Defense) {
        self.defense = Some(defense);
    }

    pub(crate) fn set_evidence_period(&mut self, period: EvidencePeriod) {
        self.evidence_period = Some(period);
    }

    pub(crate) fn set_hearing(&mut self, hearing: Hearing) {
        self.hearing = Some(hearing);
    }

    pub(crate) fn set_hearing_summary(&mut self, summary: String) {
        if let Some(hearing) = &mut self.hearing {
            hearing.summary = Some(summary);
        }
    }

    pub(crate) fn set_closing_deadline(&mut self, deadline: Timestamp) {
        self.closing_deadline = Some(deadline);
    }

    pub(crate) fn set_closing_arguments(&mut self, text: String) {
        self.closing_arguments = Some(text);
    }

    pub(crate) fn set_decision(&mut self, decision: CaseDecision) {
        self.decision = Some(decision);
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// Case identifier.
    pub fn id(&self) -> CaseId {
        self.id
    }

    /// Filing protocol.
    pub fn protocol(&self) -> ProtocolNumber {
        self.protocol
    }

    /// Case kind, as encoded in the protocol.
    pub fn kind(&self) -> CaseKind {
        self.protocol.kind()
    }

    /// Subject line.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Full description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The filing member.
    pub fn filer(&self) -> MemberId {
        self.filer
    }

    /// The target of the dispute.
    pub fn target(&self) -> &CaseTarget {
        &self.target
    }

    /// The adjudicating committee.
    pub fn committee(&self) -> CommitteeId {
        self.committee
    }

    /// Sigilo flag.
    pub fn confidential(&self) -> bool {
        self.confidential
    }

    /// When the case was filed.
    pub fn filed_at(&self) -> Timestamp {
        self.filed_at
    }

    /// Current status.
    pub fn status(&self) -> CaseStatus {
        self.status
    }

    /// The admissibility ruling, once made. `None` means not yet decided;
    /// exactly one of admitted / rejected / undecided holds at any time.
    pub fn admissibility(&self) -> Option<&AdmissibilityRuling> {
        self.admissibility.as_ref()
    }

    /// Defense deadline, once the defense was requested.
    pub fn defense_deadline(&self) -> Option<Timestamp> {
        self.defense_deadline
    }

    /// The received defense.
    pub fn defense(&self) -> Option<&Defense> {
        self.defense.as_ref()
    }

    /// Evidence-period bounds.
    pub fn evidence_period(&self) -> Option<EvidencePeriod> {
        self.evidence_period
    }

    /// The hearing, once scheduled.
    pub fn hearing(&self) -> Option<&Hearing> {
        self.hearing.as_ref()
    }

    /// Closing-arguments deadline.
    pub fn closing_deadline(&self) -> Option<Timestamp> {
        self.closing_deadline
    }

    /// Closing-arguments text.
    pub fn closing_arguments(&self) -> Option<&str> {
        self.closing_arguments.as_deref()
    }

    /// The first-instance decision as applied to the case.
    pub fn decision(&self) -> Option<&CaseDecision> {
        self.decision.as_ref()
    }

    /// Append-only transition history.
    pub fn history(&self) -> &[CaseHistoryEntry] {
        &self.history
    }

    /// Optimistic-concurrency token: bumped once per transition.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Audit stamp.
    pub fn audit(&self) -> &AuditStamp {
        &self.audit
    }

    /// Whether the case is closed.
    pub fn is_archived(&self) -> bool {
        self.status.is_terminal()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pleito_core::CaseKind;

    fn filing() -> CaseFiling {
        CaseFiling {
            protocol: ProtocolNumber::new(CaseKind::Complaint, 2024, 42).unwrap(),
            subject: "Irregular campaign material".to_string(),
            description: "Slate distributed material outside the permitted window".to_string(),
            filer: MemberId::new(),
            target: CaseTarget::Slate(SlateId::new()),
            committee: CommitteeId::new(),
            confidential: false,
        }
    }

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse(s).unwrap()
    }

    #[test]
    fn test_new_case_is_received_with_empty_history() {
        let case = CaseRecord::new(filing(), "protocol-desk", ts("2024-03-01T09:00:00Z"));
        assert_eq!(case.status(), CaseStatus::Received);
        assert!(case.history().is_empty());
        assert_eq!(case.version(), 0);
        assert!(!case.is_archived());
        assert_eq!(case.protocol().to_string(), "DEN/2024/000042");
        assert_eq!(case.kind(), CaseKind::Complaint);
    }

    #[test]
    fn test_apply_transition_appends_history_and_bumps_version() {
        let mut case = CaseRecord::new(filing(), "desk", ts("2024-03-01T09:00:00Z"));
        case.apply_transition(
            CaseStatus::UnderReview,
            "committee-clerk",
            "Admissibility review opened".to_string(),
            ts("2024-03-01T10:00:00Z"),
        );

        assert_eq!(case.status(), CaseStatus::UnderReview);
        assert_eq!(case.version(), 1);
        assert_eq!(case.history().len(), 1);
        let entry = &case.history()[0];
        assert_eq!(entry.from_status, CaseStatus::Received);
        assert_eq!(entry.to_status, CaseStatus::UnderReview);
        assert_eq!(entry.actor, "committee-clerk");
        assert_eq!(case.audit().updated_by, "committee-clerk");
    }

    #[test]
    fn test_audit_stamp_tracks_creation_and_mutation() {
        let created = ts("2024-03-01T09:00:00Z");
        let mut case = CaseRecord::new(filing(), "desk", created);
        assert_eq!(case.audit().created_by, "desk");
        assert_eq!(case.audit().created_at, created);

        let later = ts("2024-03-02T09:00:00Z");
        case.apply_transition(CaseStatus::UnderReview, "clerk", "note".to_string(), later);
        assert_eq!(case.audit().created_at, created);
        assert_eq!(case.audit().updated_at, later);
    }

    #[test]
    fn test_only_archived_is_terminal() {
        for status in [
            CaseStatus::Received,
            CaseStatus::UnderReview,
            CaseStatus::Admissible,
            CaseStatus::Inadmissible,
            CaseStatus::AwaitingDefense,
            CaseStatus::DefenseReceived,
            CaseStatus::EvidencePeriodOpen,
            CaseStatus::HearingScheduled,
            CaseStatus::ClosingArgumentsPeriod,
            CaseStatus::AwaitingJudgment,
            CaseStatus::Judged,
            CaseStatus::UnderAppeal,
        ] {
            assert!(!status.is_terminal(), "{status} must not be terminal");
        }
        assert!(CaseStatus::Archived.is_terminal());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(CaseStatus::Received.to_string(), "RECEIVED");
        assert_eq!(CaseStatus::ClosingArgumentsPeriod.to_string(), "CLOSING_ARGUMENTS_PERIOD");
        assert_eq!(CaseStatus::UnderAppeal.to_string(), "UNDER_APPEAL");
    }

    #[test]
    fn test_case_serde_roundtrip() {
        let case = CaseRecord::new(filing(), "desk", ts("2024-03-01T09:00:00Z"));
        let json = serde_json::to_string(&case).unwrap();
        let parsed: CaseRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, case);
    }

    #[test]
    fn test_target_variants_serialize_distinctly() {
        let slate = serde_json::to_string(&CaseTarget::Slate(SlateId::new())).unwrap();
        let third = serde_json::to_string(&CaseTarget::ThirdParty("J. Doe".to_string())).unwrap();
        assert!(slate.contains("Slate"));
        assert!(third.contains("ThirdParty"));
    }
}
