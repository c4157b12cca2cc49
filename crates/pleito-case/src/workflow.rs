//! # Case Workflow — The Adjudication State Machine
//!
//! Drives a [`CaseRecord`] through its legal process:
//!
//! ```text
//! Received ──▶ UnderReview ──▶ Admissible ──▶ AwaitingDefense ──▶ DefenseReceived
//!                  │                                                    │
//!                  └──▶ Inadmissible ──▶ Archived                       ▼
//!                                                             EvidencePeriodOpen
//!                                                                       │
//! Archived ◀── Judged ◀── AwaitingJudgment ◀── ClosingArgumentsPeriod ◀─┘
//!    ▲            │                                      ▲              (via
//!    │            └──▶ UnderAppeal ──▶ Archived          └── HearingScheduled)
//!    └── archive() from any non-terminal state
//! ```
//!
//! ## Contract Per Transition
//!
//! Each method validates the exact required prior status, then its
//! phase-specific business rules, and only then mutates: one status change,
//! any new deadline computed through the deadline module, exactly one
//! history entry, one domain event. Transitions are never skipped or
//! batched; a rejected operation leaves the record untouched.
//!
//! ## Statutory Windows
//!
//! Defense 15 business days from notification; evidence 30 calendar days
//! from defense receipt; closing arguments 10 calendar days from the
//! hearing; appeal 15 business days from the first-instance judgment.

use std::sync::Arc;

use thiserror::Error;

use pleito_core::{
    add_business_days, add_calendar_days, is_expired, CaseId, Clock, Timestamp,
};

use crate::event::{DomainEvent, EventSink};
use crate::record::{
    AdmissibilityRuling, CaseDecision, CaseFiling, CaseRecord, CaseStatus, Defense,
    EvidencePeriod, Hearing,
};

// ─── Statutory Windows ───────────────────────────────────────────────

/// The deadline lengths the regulation attaches to each phase.
///
/// Defaults reflect the regulation as applied today; every field is an
/// explicit configuration point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatutoryWindows {
    /// Defense window, in business days from notification.
    pub defense_business_days: u32,
    /// Evidence period, in calendar days from defense receipt.
    pub evidence_calendar_days: u32,
    /// Closing-arguments window, in calendar days from the hearing.
    pub closing_calendar_days: u32,
    /// Appeal window, in business days from the first-instance judgment.
    pub appeal_business_days: u32,
    /// Counter-argument window, in business days from the appeal filing.
    pub counter_argument_business_days: u32,
}

impl Default for StatutoryWindows {
    fn default() -> Self {
        Self {
            defense_business_days: 15,
            evidence_calendar_days: 30,
            closing_calendar_days: 10,
            appeal_business_days: 15,
            counter_argument_business_days: 15,
        }
    }
}

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors raised by case transitions.
#[derive(Error, Debug)]
pub enum CaseError {
    /// The case is not in the state the requested transition requires.
    /// Never auto-corrected — the caller must re-fetch and decide.
    #[error("invalid case transition: {from} -> {to}")]
    InvalidTransition {
        /// Current status.
        from: CaseStatus,
        /// Attempted target status.
        to: CaseStatus,
    },

    /// `archive()` on a case that is already archived.
    #[error("case {case_id} is already archived")]
    AlreadyArchived {
        /// The case.
        case_id: CaseId,
    },

    /// An action was attempted after its computed deadline. Distinct from
    /// a precondition error so callers can show "late", not "invalid".
    #[error("{action} deadline expired at {deadline}")]
    DeadlineExpired {
        /// What was attempted.
        action: &'static str,
        /// The deadline that was missed.
        deadline: Timestamp,
    },

    /// Mandatory text or data missing. Rejected before any mutation.
    #[error("validation error: {0}")]
    Validation(String),
}

// ─── Workflow ────────────────────────────────────────────────────────

/// The state machine driving case records. Stateless between calls — all
/// case state lives on the [`CaseRecord`]; the workflow carries only its
/// injected clock, event sink, and window configuration.
pub struct CaseWorkflow {
    clock: Arc<dyn Clock>,
    events: Arc<dyn EventSink>,
    windows: StatutoryWindows,
}

impl CaseWorkflow {
    /// Build a workflow with the given collaborators.
    pub fn new(clock: Arc<dyn Clock>, events: Arc<dyn EventSink>, windows: StatutoryWindows) -> Self {
        Self { clock, events, windows }
    }

    /// The configured statutory windows.
    pub fn windows(&self) -> &StatutoryWindows {
        &self.windows
    }

    /// File a new case. The record starts in `Received` with an empty
    /// history; assignment of the protocol happened upstream.
    pub fn file(&self, filing: CaseFiling, actor: &str) -> Result<CaseRecord, CaseError> {
        if filing.subject.trim().is_empty() {
            return Err(CaseError::Validation("case subject must not be blank".to_string()));
        }
        if filing.description.trim().is_empty() {
            return Err(CaseError::Validation("case description must not be blank".to_string()));
        }

        let case = CaseRecord::new(filing, actor, self.clock.now());
        tracing::debug!(case_id = %case.id(), protocol = %case.protocol(), "case filed");
        self.events.emit(DomainEvent::CaseFiled {
            case_id: case.id(),
            protocol: case.protocol().to_string(),
        });
        Ok(case)
    }

    /// Open the admissibility review (RECEIVED → UNDER_REVIEW).
    pub fn begin_review(&self, case: &mut CaseRecord, actor: &str) -> Result<(), CaseError> {
        require_status(case, CaseStatus::Received, CaseStatus::UnderReview)?;
        self.transition(case, CaseStatus::UnderReview, actor, "Admissibility review opened".to_string());
        Ok(())
    }

    /// Admit the case (UNDER_REVIEW → ADMISSIBLE).
    pub fn rule_admissible(
        &self,
        case: &mut CaseRecord,
        actor: &str,
        reasoning: impl Into<String>,
    ) -> Result<(), CaseError> {
        require_status(case, CaseStatus::UnderReview, CaseStatus::Admissible)?;
        let now = self.clock.now();
        case.set_admissibility(AdmissibilityRuling {
            admissible: true,
            reasoning: reasoning.into(),
            ruled_at: now,
        });
        self.transition(case, CaseStatus::Admissible, actor, "Case ruled admissible".to_string());
        self.events.emit(DomainEvent::AdmissibilityRuled { case_id: case.id(), admissible: true });
        Ok(())
    }

    /// Reject the case (UNDER_REVIEW → INADMISSIBLE).
    ///
    /// A non-blank reasoning is mandatory for an inadmissibility ruling.
    pub fn rule_inadmissible(
        &self,
        case: &mut CaseRecord,
        actor: &str,
        reasoning: impl Into<String>,
    ) -> Result<(), CaseError> {
        require_status(case, CaseStatus::UnderReview, CaseStatus::Inadmissible)?;
        let reasoning = reasoning.into();
        if reasoning.trim().is_empty() {
            return Err(CaseError::Validation(
                "an inadmissibility ruling requires a reasoning text".to_string(),
            ));
        }
        let now = self.clock.now();
        case.set_admissibility(AdmissibilityRuling { admissible: false, reasoning, ruled_at: now });
        self.transition(case, CaseStatus::Inadmissible, actor, "Case ruled inadmissible".to_string());
        self.events.emit(DomainEvent::AdmissibilityRuled { case_id: case.id(), admissible: false });
        Ok(())
    }

    /// Notify the target to present a defense (ADMISSIBLE →
    /// AWAITING_DEFENSE). Opens the defense window from the notification
    /// instant.
    pub fn request_defense(&self, case: &mut CaseRecord, actor: &str) -> Result<(), CaseError> {
        require_status(case, CaseStatus::Admissible, CaseStatus::AwaitingDefense)?;
        let deadline = add_business_days(self.clock.now(), self.windows.defense_business_days);
        case.set_defense_deadline(deadline);
        self.transition(
            case,
            CaseStatus::AwaitingDefense,
            actor,
            format!("Defense requested; due {deadline}"),
        );
        self.events.emit(DomainEvent::DefenseRequested { case_id: case.id(), deadline });
        Ok(())
    }

    /// Receive the defense (AWAITING_DEFENSE → DEFENSE_RECEIVED).
    ///
    /// Checked against the deadline computed when the phase opened.
    pub fn receive_defense(
        &self,
        case: &mut CaseRecord,
        actor: &str,
        text: impl Into<String>,
    ) -> Result<(), CaseError> {
        require_status(case, CaseStatus::AwaitingDefense, CaseStatus::DefenseReceived)?;
        let text = text.into();
        if text.trim().is_empty() {
            return Err(CaseError::Validation("defense text must not be blank".to_string()));
        }
        let deadline = case
            .defense_deadline()
            .ok_or_else(|| CaseError::Validation("defense deadline was never set".to_string()))?;
        let now = self.clock.now();
        if is_expired(now, deadline) {
            return Err(CaseError::DeadlineExpired { action: "defense", deadline });
        }
        case.set_defense(Defense { text, received_at: now });
        self.transition(case, CaseStatus::DefenseReceived, actor, "Defense received".to_string());
        self.events.emit(DomainEvent::DefenseReceived { case_id: case.id() });
        Ok(())
    }

    /// Open the evidence period (DEFENSE_RECEIVED → EVIDENCE_PERIOD_OPEN).
    /// Closes 30 calendar days after the defense receipt.
    pub fn open_evidence_period(&self, case: &mut CaseRecord, actor: &str) -> Result<(), CaseError> {
        require_status(case, CaseStatus::DefenseReceived, CaseStatus::EvidencePeriodOpen)?;
        let received_at = case
            .defense()
            .map(|d| d.received_at)
            .ok_or_else(|| CaseError::Validation("no defense on record".to_string()))?;
        let now = self.clock.now();
        let closes_at = add_calendar_days(received_at, self.windows.evidence_calendar_days);
        case.set_evidence_period(EvidencePeriod { opened_at: now, closes_at });
        self.transition(
            case,
            CaseStatus::EvidencePeriodOpen,
            actor,
            format!("Evidence period open until {closes_at}"),
        );
        self.events.emit(DomainEvent::EvidencePeriodOpened { case_id: case.id(), closes_at });
        Ok(())
    }

    /// Schedule the instruction hearing (EVIDENCE_PERIOD_OPEN →
    /// HEARING_SCHEDULED). The hearing date must lie in the future.
    pub fn schedule_hearing(
        &self,
        case: &mut CaseRecord,
        actor: &str,
        date: Timestamp,
    ) -> Result<(), CaseError> {
        require_status(case, CaseStatus::EvidencePeriodOpen, CaseStatus::HearingScheduled)?;
        if date <= self.clock.now() {
            return Err(CaseError::Validation(format!(
                "hearing date {date} must be in the future"
            )));
        }
        case.set_hearing(Hearing { scheduled_for: date, summary: None });
        self.transition(
            case,
            CaseStatus::HearingScheduled,
            actor,
            format!("Hearing scheduled for {date}"),
        );
        self.events.emit(DomainEvent::HearingScheduled { case_id: case.id(), date });
        Ok(())
    }

    /// Record the held hearing and open the closing-arguments window
    /// (HEARING_SCHEDULED → CLOSING_ARGUMENTS_PERIOD). The window runs 10
    /// calendar days from the hearing date.
    pub fn record_hearing(
        &self,
        case: &mut CaseRecord,
        actor: &str,
        summary: impl Into<String>,
    ) -> Result<(), CaseError> {
        require_status(case, CaseStatus::HearingScheduled, CaseStatus::ClosingArgumentsPeriod)?;
        let summary = summary.into();
        if summary.trim().is_empty() {
            return Err(CaseError::Validation("hearing summary must not be blank".to_string()));
        }
        let hearing_date = case
            .hearing()
            .map(|h| h.scheduled_for)
            .ok_or_else(|| CaseError::Validation("no hearing on record".to_string()))?;
        if self.clock.now() < hearing_date {
            return Err(CaseError::Validation(format!(
                "hearing scheduled for {hearing_date} has not been held yet"
            )));
        }
        let deadline = add_calendar_days(hearing_date, self.windows.closing_calendar_days);
        case.set_hearing_summary(summary);
        case.set_closing_deadline(deadline);
        self.transition(
            case,
            CaseStatus::ClosingArgumentsPeriod,
            actor,
            format!("Hearing recorded; closing arguments due {deadline}"),
        );
        self.events.emit(DomainEvent::ClosingArgumentsOpened { case_id: case.id(), deadline });
        Ok(())
    }

    /// Receive closing arguments and send the case to judgment
    /// (CLOSING_ARGUMENTS_PERIOD → AWAITING_JUDGMENT).
    pub fn receive_closing_arguments(
        &self,
        case: &mut CaseRecord,
        actor: &str,
        text: impl Into<String>,
    ) -> Result<(), CaseError> {
        require_status(case, CaseStatus::ClosingArgumentsPeriod, CaseStatus::AwaitingJudgment)?;
        let text = text.into();
        if text.trim().is_empty() {
            return Err(CaseError::Validation("closing arguments must not be blank".to_string()));
        }
        let deadline = case
            .closing_deadline()
            .ok_or_else(|| CaseError::Validation("closing deadline was never set".to_string()))?;
        if is_expired(self.clock.now(), deadline) {
            return Err(CaseError::DeadlineExpired { action: "closing arguments", deadline });
        }
        case.set_closing_arguments(text);
        self.transition(
            case,
            CaseStatus::AwaitingJudgment,
            actor,
            "Closing arguments received; awaiting judgment".to_string(),
        );
        self.events.emit(DomainEvent::SentToJudgment { case_id: case.id() });
        Ok(())
    }

    /// Apply a first-instance decision to the case (AWAITING_JUDGMENT →
    /// JUDGED). The appeal deadline was computed by the judgment session at
    /// decision time and is carried through unchanged.
    pub fn record_judgment(
        &self,
        case: &mut CaseRecord,
        actor: &str,
        outcome: impl Into<String>,
        text: impl Into<String>,
        appealable: bool,
        appeal_deadline: Option<Timestamp>,
    ) -> Result<(), CaseError> {
        require_status(case, CaseStatus::AwaitingJudgment, CaseStatus::Judged)?;
        let text = text.into();
        if text.trim().is_empty() {
            return Err(CaseError::Validation("decision text must not be blank".to_string()));
        }
        if appealable && appeal_deadline.is_none() {
            return Err(CaseError::Validation(
                "an appealable decision requires an appeal deadline".to_string(),
            ));
        }
        let now = self.clock.now();
        case.set_decision(CaseDecision {
            text,
            decided_at: now,
            appealable,
            appeal_deadline: if appealable { appeal_deadline } else { None },
        });
        self.transition(case, CaseStatus::Judged, actor, "First-instance decision recorded".to_string());
        self.events.emit(DomainEvent::JudgmentDecided {
            case_id: case.id(),
            outcome: outcome.into(),
            appealable,
            appeal_deadline: if appealable { appeal_deadline } else { None },
        });
        Ok(())
    }

    /// Move the case into its appeal phase (JUDGED → UNDER_APPEAL).
    ///
    /// Valid only while the appeal window is open; filing exactly at the
    /// deadline instant is in time.
    pub fn open_appeal(
        &self,
        case: &mut CaseRecord,
        actor: &str,
        counter_argument_deadline: Timestamp,
    ) -> Result<(), CaseError> {
        require_status(case, CaseStatus::Judged, CaseStatus::UnderAppeal)?;
        let decision = case
            .decision()
            .ok_or_else(|| CaseError::Validation("no decision on record".to_string()))?;
        if !decision.appealable {
            return Err(CaseError::Validation("the decision is not appealable".to_string()));
        }
        let deadline = decision.appeal_deadline.ok_or_else(|| {
            CaseError::Validation("appealable decision is missing its appeal deadline".to_string())
        })?;
        if is_expired(self.clock.now(), deadline) {
            return Err(CaseError::DeadlineExpired { action: "appeal", deadline });
        }
        self.transition(case, CaseStatus::UnderAppeal, actor, "Appeal filed".to_string());
        self.events.emit(DomainEvent::AppealFiled {
            case_id: case.id(),
            counter_argument_deadline,
        });
        Ok(())
    }

    /// Close the case (any non-terminal status → ARCHIVED).
    ///
    /// Serves both the ordinary endpoints (inadmissible cases, final or
    /// appealed-and-decided judgments) and the administrative
    /// short-circuit. Idempotent-guarded: archiving an archived case fails.
    pub fn archive(
        &self,
        case: &mut CaseRecord,
        actor: &str,
        reason: impl Into<String>,
    ) -> Result<(), CaseError> {
        if case.is_archived() {
            return Err(CaseError::AlreadyArchived { case_id: case.id() });
        }
        let reason = reason.into();
        if reason.trim().is_empty() {
            return Err(CaseError::Validation("archival requires a reason".to_string()));
        }
        self.transition(case, CaseStatus::Archived, actor, reason.clone());
        self.events.emit(DomainEvent::CaseArchived { case_id: case.id(), reason });
        Ok(())
    }

    /// Single mutation point: one history entry, one status change.
    fn transition(&self, case: &mut CaseRecord, to: CaseStatus, actor: &str, note: String) {
        let from = case.status();
        case.apply_transition(to, actor, note, self.clock.now());
        tracing::debug!(case_id = %case.id(), %from, %to, "case transition");
    }
}

/// Validate that the case is in the exact state a transition requires.
fn require_status(case: &CaseRecord, expected: CaseStatus, target: CaseStatus) -> Result<(), CaseError> {
    if case.status() != expected {
        return Err(CaseError::InvalidTransition { from: case.status(), to: target });
    }
    Ok(())
}

// ─── Tests ───────────────────────────────────────────────────────────
