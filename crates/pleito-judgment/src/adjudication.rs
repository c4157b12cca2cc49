//! # Adjudication Orchestrator
//!
//! Ties the judgment and appeal processes back to the case workflow: a
//! session's decision becomes the case's decision, an appeal moves the case
//! under appeal, and a second-instance decision archives it. All cross-
//! aggregate coordination lives here; the aggregates themselves never reach
//! into each other.

use std::sync::Arc;

use thiserror::Error;

use pleito_core::{CaseId, Clock, MemberId, Timestamp};
use pleito_voting::{CommitteeRoster, CommitteeScope, QuorumConfig};

use pleito_case::{
    CaseError, CaseRecord, CaseStatus, CaseWorkflow, DomainEvent, EventSink, StatutoryWindows,
};

use crate::appeal::{AppealError, AppealProcess};
use crate::judgment::{Decision, Instance, JudgmentError, JudgmentProcess};

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors from cross-aggregate adjudication operations.
#[derive(Error, Debug)]
pub enum AdjudicationError {
    /// A case transition failed.
    #[error(transparent)]
    Case(#[from] CaseError),

    /// A judgment-session operation failed.
    #[error(transparent)]
    Judgment(#[from] JudgmentError),

    /// An appeal operation failed.
    #[error(transparent)]
    Appeal(#[from] AppealError),

    /// The case is not ready for the requested step.
    #[error("case {case_id} is not ready: status is {status}")]
    CaseNotReady {
        /// The case.
        case_id: CaseId,
        /// Its current status.
        status: CaseStatus,
    },

    /// The committee has shrunk below its minimum size and may not decide
    /// anything until reseated.
    #[error("committee has {active} active members; at least {required} required")]
    CommitteeBelowMinimum {
        /// Active members found.
        active: usize,
        /// Minimum required.
        required: usize,
    },
}

// ─── Orchestrator ────────────────────────────────────────────────────

/// Coordinates cases, judgment sessions, and appeals for one committee
/// scope under one voting configuration.
pub struct Adjudication {
    clock: Arc<dyn Clock>,
    events: Arc<dyn EventSink>,
    roster: Arc<dyn CommitteeRoster>,
    workflow: CaseWorkflow,
    scope: CommitteeScope,
    quorum: QuorumConfig,
    windows: StatutoryWindows,
}

impl Adjudication {
    /// Build the orchestrator. The same clock and sink drive both the case
    /// workflow and the judgment processes.
    pub fn new(
        clock: Arc<dyn Clock>,
        events: Arc<dyn EventSink>,
        roster: Arc<dyn CommitteeRoster>,
        scope: CommitteeScope,
        quorum: QuorumConfig,
        windows: StatutoryWindows,
    ) -> Self {
        let workflow = CaseWorkflow::new(clock.clone(), events.clone(), windows);
        Self { clock, events, roster, workflow, scope, quorum, windows }
    }

    /// The underlying case workflow, for driving pre-judgment phases.
    pub fn workflow(&self) -> &CaseWorkflow {
        &self.workflow
    }

    /// Schedule a judgment session for a case that is awaiting one.
    pub fn open_judgment(
        &self,
        case: &CaseRecord,
        relator: MemberId,
        scheduled_for: Timestamp,
    ) -> Result<JudgmentProcess, AdjudicationError> {
        if case.status() != CaseStatus::AwaitingJudgment {
            return Err(AdjudicationError::CaseNotReady {
                case_id: case.id(),
                status: case.status(),
            });
        }
        Ok(JudgmentProcess::new(
            case.id(),
            case.committee(),
            Instance::First,
            relator,
            scheduled_for,
        ))
    }

    /// Close a session's vote and apply the decision to the case.
    ///
    /// The roster is consulted fresh here; a committee below its minimum
    /// size cannot decide regardless of how many votes were cast. A
    /// first-instance decision moves the case to JUDGED; a second-instance
    /// decision is final and archives it.
    pub fn decide(
        &self,
        case: &mut CaseRecord,
        session: &mut JudgmentProcess,
        actor: &str,
        reasoning: impl Into<String>,
    ) -> Result<Decision, AdjudicationError> {
        let members = self.roster.active_members(&session.committee_id());
        let required = self.quorum.min_members.unwrap_or_else(|| self.scope.min_members());
        if members.len() < required {
            return Err(AdjudicationError::CommitteeBelowMinimum {
                active: members.len(),
                required,
            });
        }

        let now = self.clock.now();
        let decision = session
            .decide(now, reasoning, &members, &self.quorum, self.windows.appeal_business_days)?
            .clone();

        match session.instance() {
            Instance::First => {
                self.workflow.record_judgment(
                    case,
                    actor,
                    decision.outcome.to_string(),
                    decision.reasoning.clone(),
                    decision.appealable,
                    decision.appeal_deadline,
                )?;
            }
            Instance::Second => {
                self.workflow.archive(
                    case,
                    actor,
                    format!("Second-instance decision: {}", decision.outcome),
                )?;
            }
        }
        Ok(decision)
    }

    /// File an appeal and move the case under appeal.
    pub fn file_appeal(
        &self,
        case: &mut CaseRecord,
        session: &JudgmentProcess,
        appellant: MemberId,
        reasoning: impl Into<String>,
        actor: &str,
    ) -> Result<AppealProcess, AdjudicationError> {
        let now = self.clock.now();
        let mut appeal = AppealProcess::file(
            session,
            appellant,
            reasoning,
            now,
            self.windows.counter_argument_business_days,
        )?;
        self.workflow.open_appeal(case, actor, appeal.counter_argument_deadline())?;
        appeal.request_counter_argument()?;
        Ok(appeal)
    }

    /// Receive the opposing party's counter-argument.
    pub fn receive_counter_argument(
        &self,
        appeal: &mut AppealProcess,
        author: MemberId,
        text: impl Into<String>,
    ) -> Result<(), AdjudicationError> {
        appeal.receive_counter_argument(author, text, self.clock.now())?;
        self.events.emit(DomainEvent::CounterArgumentReceived { case_id: appeal.case_id() });
        Ok(())
    }

    /// Seize the second instance for a ready appeal.
    ///
    /// Moves the appeal to AWAITING_JUDGMENT if the counter-argument
    /// arrived or its window lapsed, then schedules the final session.
    pub fn open_second_instance(
        &self,
        appeal: &mut AppealProcess,
        relator: MemberId,
        scheduled_for: Timestamp,
    ) -> Result<JudgmentProcess, AdjudicationError> {
        appeal.mark_awaiting_judgment(self.clock.now())?;
        Ok(appeal.open_second_instance(relator, scheduled_for)?)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pleito_case::{CaseFiling, CaseTarget, RecordingEventSink};
    use pleito_core::{CaseKind, CommitteeId, FixedClock, ProtocolNumber, SlateId};
    use pleito_voting::{QuorumRule, StaticRoster, TieBreakPolicy, Vote, VoteChoice};

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse(s).unwrap()
    }

    struct Fixture {
        clock: Arc<FixedClock>,
        committee: CommitteeId,
        members: Vec<MemberId>,
        adjudication: Adjudication,
    }

    fn fixture(start: &str, seats: usize) -> Fixture {
        let clock = Arc::new(FixedClock::new(ts(start)));
        let committee = CommitteeId::new();
        let members: Vec<MemberId> = (0..seats).map(|_| MemberId::new()).collect();
        let mut roster = StaticRoster::new();
        roster.seat(committee, members.clone());

        let adjudication = Adjudication::new(
            clock.clone(),
            Arc::new(RecordingEventSink::new()),
            Arc::new(roster),
            CommitteeScope::National,
            QuorumConfig {
                rule: QuorumRule::SimpleMajority,
                tie_break: TieBreakPolicy::DeclareTie,
                min_members: None,
            },
            StatutoryWindows::default(),
        );
        Fixture { clock, committee, members, adjudication }
    }

    /// Drive a case to AWAITING_JUDGMENT under the fixture's clock.
    fn case_awaiting_judgment(f: &Fixture) -> CaseRecord {
        let w = f.adjudication.workflow();
        let mut case = w
            .file(
                CaseFiling {
                    protocol: ProtocolNumber::new(CaseKind::Challenge, 2024, 3).unwrap(),
                    subject: "Slate registration challenge".to_string(),
                    description: "The slate lacks the required regional representation".to_string(),
                    filer: MemberId::new(),
                    target: CaseTarget::Slate(SlateId::new()),
                    committee: f.committee,
                    confidential: false,
                },
                "desk",
            )
            .unwrap();
        w.begin_review(&mut case, "clerk").unwrap();
        w.rule_admissible(&mut case, "committee", "Formally adequate").unwrap();
        w.request_defense(&mut case, "clerk").unwrap();
        f.clock.set(ts("2024-03-15T10:00:00Z"));
        w.receive_defense(&mut case, "target", "The slate is regular").unwrap();
        w.open_evidence_period(&mut case, "clerk").unwrap();
        w.schedule_hearing(&mut case, "clerk", ts("2024-04-10T14:00:00Z")).unwrap();
        f.clock.set(ts("2024-04-10T16:00:00Z"));
        w.record_hearing(&mut case, "clerk", "Documents examined").unwrap();
        f.clock.set(ts("2024-04-15T10:00:00Z"));
        w.receive_closing_arguments(&mut case, "filer", "Final arguments").unwrap();
        case
    }

    fn cast_all(session: &mut JudgmentProcess, members: &[MemberId], favor: usize, at: Timestamp) {
        for (i, m) in members.iter().enumerate() {
            let choice = if i < favor { VoteChoice::Favor } else { VoteChoice::Against };
            session
                .record_vote(Vote { member: *m, choice, justification: None, cast_at: at })
                .unwrap();
        }
    }

    #[test]
    fn test_open_judgment_requires_awaiting_judgment() {
        let f = fixture("2024-03-01T09:00:00Z", 5);
        let case = f
            .adjudication
            .workflow()
            .file(
                CaseFiling {
                    protocol: ProtocolNumber::new(CaseKind::Complaint, 2024, 9).unwrap(),
                    subject: "Subject".to_string(),
                    description: "Description".to_string(),
                    filer: MemberId::new(),
                    target: CaseTarget::ThirdParty("J. Doe".to_string()),
                    committee: f.committee,
                    confidential: true,
                },
                "desk",
            )
            .unwrap();
        let err = f
            .adjudication
            .open_judgment(&case, f.members[0], ts("2024-05-10T14:00:00Z"))
            .unwrap_err();
        assert!(matches!(err, AdjudicationError::CaseNotReady { .. }));
    }

    #[test]
    fn test_first_instance_decision_lands_on_the_case() {
        let f = fixture("2024-03-01T09:00:00Z", 5);
        let mut case = case_awaiting_judgment(&f);

        f.clock.set(ts("2024-05-10T14:00:00Z"));
        let mut session =
            f.adjudication.open_judgment(&case, f.members[0], ts("2024-05-10T14:00:00Z")).unwrap();
        session.start(ts("2024-05-10T14:00:00Z")).unwrap();
        cast_all(&mut session, &f.members, 3, ts("2024-05-10T14:30:00Z"));

        f.clock.set(ts("2024-05-10T16:00:00Z"));
        let decision =
            f.adjudication.decide(&mut case, &mut session, "clerk", "Challenge upheld").unwrap();

        assert_eq!(case.status(), CaseStatus::Judged);
        let on_case = case.decision().unwrap();
        assert!(on_case.appealable);
        assert_eq!(on_case.appeal_deadline, decision.appeal_deadline);
        assert_eq!(on_case.decided_at, ts("2024-05-10T16:00:00Z"));
    }

    #[test]
    fn test_shrunken_committee_cannot_decide() {
        // National scope requires 5; only 4 are seated.
        let f = fixture("2024-03-01T09:00:00Z", 4);
        let mut case = case_awaiting_judgment(&f);

        f.clock.set(ts("2024-05-10T14:00:00Z"));
        let mut session =
            f.adjudication.open_judgment(&case, f.members[0], ts("2024-05-10T14:00:00Z")).unwrap();
        session.start(ts("2024-05-10T14:00:00Z")).unwrap();
        cast_all(&mut session, &f.members, 3, ts("2024-05-10T14:30:00Z"));

        f.clock.set(ts("2024-05-10T16:00:00Z"));
        let err =
            f.adjudication.decide(&mut case, &mut session, "clerk", "Reasoning").unwrap_err();
        assert!(matches!(
            err,
            AdjudicationError::CommitteeBelowMinimum { active: 4, required: 5 }
        ));
        assert_eq!(case.status(), CaseStatus::AwaitingJudgment);
    }

    #[test]
    fn test_min_members_override_wins_over_scope_default() {
        let clock = Arc::new(FixedClock::new(ts("2024-03-01T09:00:00Z")));
        let committee = CommitteeId::new();
        let members: Vec<MemberId> = (0..3).map(|_| MemberId::new()).collect();
        let mut roster = StaticRoster::new();
        roster.seat(committee, members.clone());
        let adjudication = Adjudication::new(
            clock.clone(),
            Arc::new(RecordingEventSink::new()),
            Arc::new(roster),
            CommitteeScope::National,
            QuorumConfig {
                rule: QuorumRule::SimpleMajority,
                tie_break: TieBreakPolicy::DeclareTie,
                min_members: Some(3),
            },
            StatutoryWindows::default(),
        );
        let f = Fixture { clock, committee, members, adjudication };
        let mut case = case_awaiting_judgment(&f);

        f.clock.set(ts("2024-05-10T14:00:00Z"));
        let mut session =
            f.adjudication.open_judgment(&case, f.members[0], ts("2024-05-10T14:00:00Z")).unwrap();
        session.start(ts("2024-05-10T14:00:00Z")).unwrap();
        cast_all(&mut session, &f.members, 2, ts("2024-05-10T14:30:00Z"));

        f.clock.set(ts("2024-05-10T16:00:00Z"));
        assert!(f.adjudication.decide(&mut case, &mut session, "clerk", "Reasoning").is_ok());
    }
}
