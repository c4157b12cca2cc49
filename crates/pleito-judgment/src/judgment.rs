//! # Judgment Sessions
//!
//! A collegiate session in which a committee votes a case to a decision.
//!
//! ```text
//! Scheduled ──▶ InProgress ──▶ Decided ──▶ Annulled
//!                 │   ▲  │
//!                 ▼   │  └──▶ Suspended ──▶ (resume) InProgress
//!              Adjourned ──▶ (start) InProgress
//! ```
//!
//! The decision outcome is never supplied by the caller: it is computed from
//! the recorded votes through tally resolution and the configured tie-break
//! policy, so the tally and the outcome cannot disagree. Quorum is judged
//! against the active membership passed in at decision time.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use pleito_core::{add_business_days, CaseId, CommitteeId, JudgmentId, MemberId, Timestamp};
use pleito_voting::{
    break_tie, resolve, BallotBox, QuorumConfig, QuorumError, TallyOutcome, Vote, VoteTally,
};

// ─── Status ──────────────────────────────────────────────────────────

/// Which instance a session decides at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Instance {
    /// First instance. Its decisions are appealable.
    First,
    /// Second instance, seized by an appeal. Its decisions are final.
    Second,
}

impl std::fmt::Display for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::First => "FIRST",
            Self::Second => "SECOND",
        };
        f.write_str(s)
    }
}

/// Lifecycle status of a judgment session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JudgmentStatus {
    /// Session scheduled, not yet opened.
    Scheduled,
    /// Session open; votes may be cast.
    InProgress,
    /// Session paused mid-sitting.
    Suspended,
    /// Session postponed to a new date.
    Adjourned,
    /// Decision reached and recorded.
    Decided,
    /// Decision annulled after the fact. Terminal.
    Annulled,
}

impl JudgmentStatus {
    /// Whether no further transitions exist on the session itself.
    ///
    /// `Decided` is not terminal in this sense: a decided session can
    /// still be annulled. Finality toward the case is carried by
    /// [`Decision::appealable`], not by the session status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Annulled)
    }
}

impl std::fmt::Display for JudgmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Scheduled => "SCHEDULED",
            Self::InProgress => "IN_PROGRESS",
            Self::Suspended => "SUSPENDED",
            Self::Adjourned => "ADJOURNED",
            Self::Decided => "DECIDED",
            Self::Annulled => "ANNULLED",
        };
        f.write_str(s)
    }
}

// ─── Decision ────────────────────────────────────────────────────────

/// What the committee decided on the merits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DecisionOutcome {
    /// The filing party prevailed (procedente).
    Upheld,
    /// The filing party lost (improcedente).
    Dismissed,
    /// The decision was annulled after being recorded.
    Annulled,
}

impl std::fmt::Display for DecisionOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Upheld => "UPHELD",
            Self::Dismissed => "DISMISSED",
            Self::Annulled => "ANNULLED",
        };
        f.write_str(s)
    }
}

/// A recorded decision: outcome plus the tally it was computed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    /// The computed outcome.
    pub outcome: DecisionOutcome,
    /// The committee's written reasoning.
    pub reasoning: String,
    /// When the decision was taken.
    pub decided_at: Timestamp,
    /// The tally the outcome was computed from.
    pub tally: VoteTally,
    /// Whether the vote was unanimous.
    pub unanimous: bool,
    /// Whether an appeal lies. Second-instance decisions are never
    /// appealable.
    pub appealable: bool,
    /// End of the appeal window, when appealable.
    pub appeal_deadline: Option<Timestamp>,
}

/// One entry in a session's transition log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JudgmentTransition {
    /// Status before.
    pub from_status: JudgmentStatus,
    /// Status after.
    pub to_status: JudgmentStatus,
    /// When the transition occurred.
    pub at: Timestamp,
    /// Human-readable note.
    pub note: String,
}

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors raised by judgment-session operations.
#[derive(Error, Debug)]
pub enum JudgmentError {
    /// The session is not in the state the operation requires.
    #[error("invalid judgment transition: {from} -> {to}")]
    InvalidTransition {
        /// Current status.
        from: JudgmentStatus,
        /// Attempted target status.
        to: JudgmentStatus,
    },

    /// `start()` before the scheduled sitting date.
    #[error("session cannot open before its scheduled date {scheduled_for}")]
    BeforeScheduledDate {
        /// The scheduled sitting date.
        scheduled_for: Timestamp,
    },

    /// A member tried to vote twice. The first vote stands.
    #[error("member {member} has already voted in this session")]
    DuplicateVote {
        /// The member whose second vote was rejected.
        member: MemberId,
    },

    /// Too few members voted for the decision to be valid.
    #[error("quorum not met: {cast}/{total} members voted ({required} required)")]
    QuorumNotMet {
        /// Votes cast.
        cast: usize,
        /// Votes required by the configured fraction.
        required: usize,
        /// Active members at decision time.
        total: usize,
    },

    /// The substantive votes tied and the policy could not break it.
    /// The session stays open for a re-vote.
    #[error("vote tied at {favor} x {against}; the session remains open for a re-vote")]
    TieVote {
        /// Votes in favor.
        favor: usize,
        /// Votes against.
        against: usize,
    },

    /// Mandatory data missing or malformed.
    #[error("validation error: {0}")]
    Validation(String),
}

// ─── Judgment Process ────────────────────────────────────────────────

/// One committee sitting over one case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgmentProcess {
    id: JudgmentId,
    case_id: CaseId,
    committee_id: CommitteeId,
    instance: Instance,
    relator: MemberId,
    scheduled_for: Timestamp,
    status: JudgmentStatus,
    ballots: BallotBox,
    decision: Option<Decision>,
    transitions: Vec<JudgmentTransition>,
}

impl JudgmentProcess {
    /// Schedule a new session.
    pub fn new(
        case_id: CaseId,
        committee_id: CommitteeId,
        instance: Instance,
        relator: MemberId,
        scheduled_for: Timestamp,
    ) -> Self {
        Self {
            id: JudgmentId::new(),
            case_id,
            committee_id,
            instance,
            relator,
            scheduled_for,
            status: JudgmentStatus::Scheduled,
            ballots: BallotBox::new(),
            decision: None,
            transitions: Vec::new(),
        }
    }

    /// Open the sitting (SCHEDULED or ADJOURNED → IN_PROGRESS).
    ///
    /// Valid only once the scheduled date has arrived.
    pub fn start(&mut self, now: Timestamp) -> Result<(), JudgmentError> {
        if !matches!(self.status, JudgmentStatus::Scheduled | JudgmentStatus::Adjourned) {
            return Err(self.invalid(JudgmentStatus::InProgress));
        }
        if now < self.scheduled_for {
            return Err(JudgmentError::BeforeScheduledDate { scheduled_for: self.scheduled_for });
        }
        self.transition(JudgmentStatus::InProgress, now, "Session opened".to_string());
        Ok(())
    }

    /// Record one member's vote (IN_PROGRESS only).
    ///
    /// Membership is not screened here — the caller gates who may sit in
    /// the session, and quorum is judged against the roster at decision
    /// time. Any ballot accepted counts toward the cast total.
    pub fn record_vote(&mut self, vote: Vote) -> Result<(), JudgmentError> {
        if self.status != JudgmentStatus::InProgress {
            return Err(self.invalid(JudgmentStatus::InProgress));
        }
        self.ballots.cast(vote).map_err(|e| match e {
            QuorumError::DuplicateVote { member } => JudgmentError::DuplicateVote { member },
            QuorumError::UnresolvedTie { favor, against } => {
                JudgmentError::TieVote { favor, against }
            }
        })
    }

    /// Pause the sitting (IN_PROGRESS → SUSPENDED). Votes already cast are
    /// kept.
    pub fn suspend(&mut self, now: Timestamp, reason: impl Into<String>) -> Result<(), JudgmentError> {
        if self.status != JudgmentStatus::InProgress {
            return Err(self.invalid(JudgmentStatus::Suspended));
        }
        self.transition(JudgmentStatus::Suspended, now, reason.into());
        Ok(())
    }

    /// Resume a paused sitting (SUSPENDED → IN_PROGRESS).
    pub fn resume(&mut self, now: Timestamp) -> Result<(), JudgmentError> {
        if self.status != JudgmentStatus::Suspended {
            return Err(self.invalid(JudgmentStatus::InProgress));
        }
        self.transition(JudgmentStatus::InProgress, now, "Session resumed".to_string());
        Ok(())
    }

    /// Postpone the sitting to a later date (IN_PROGRESS or SUSPENDED →
    /// ADJOURNED). Votes already cast are kept for the resumed sitting.
    pub fn adjourn(&mut self, now: Timestamp, new_date: Timestamp) -> Result<(), JudgmentError> {
        if !matches!(self.status, JudgmentStatus::InProgress | JudgmentStatus::Suspended) {
            return Err(self.invalid(JudgmentStatus::Adjourned));
        }
        if new_date <= now {
            return Err(JudgmentError::Validation(format!(
                "adjournment date {new_date} must be in the future"
            )));
        }
        self.scheduled_for = new_date;
        self.transition(JudgmentStatus::Adjourned, now, format!("Adjourned to {new_date}"));
        Ok(())
    }

    /// Close the vote and compute the decision (IN_PROGRESS → DECIDED).
    ///
    /// Quorum is checked against `active_members` as of now, never a
    /// snapshot from scheduling time. The outcome comes from the tally plus
    /// the tie-break policy; on an unresolved tie the session stays open.
    /// First-instance decisions carry an appeal deadline of
    /// `appeal_window_business_days` from the decision instant;
    /// second-instance decisions are final.
    pub fn decide(
        &mut self,
        now: Timestamp,
        reasoning: impl Into<String>,
        active_members: &[MemberId],
        config: &QuorumConfig,
        appeal_window_business_days: u32,
    ) -> Result<&Decision, JudgmentError> {
        if self.status != JudgmentStatus::InProgress {
            return Err(self.invalid(JudgmentStatus::Decided));
        }
        let reasoning = reasoning.into();
        if reasoning.trim().is_empty() {
            return Err(JudgmentError::Validation("a decision requires a reasoning text".to_string()));
        }

        let total = active_members.len();
        let cast = self.ballots.count();
        if !config.rule.has_quorum(total, cast) {
            return Err(JudgmentError::QuorumNotMet {
                cast,
                required: config.rule.required_votes(total),
                total,
            });
        }

        let tally = resolve(self.ballots.votes());
        let outcome = break_tie(&tally, config.tie_break, self.ballots.choice_of(&self.relator))
            .map_err(|e| match e {
                QuorumError::UnresolvedTie { favor, against } => {
                    JudgmentError::TieVote { favor, against }
                }
                QuorumError::DuplicateVote { member } => JudgmentError::DuplicateVote { member },
            })?;
        let outcome = match outcome {
            TallyOutcome::Favor => DecisionOutcome::Upheld,
            TallyOutcome::Against => DecisionOutcome::Dismissed,
            // break_tie never returns Tie.
            TallyOutcome::Tie => {
                return Err(JudgmentError::TieVote { favor: tally.favor, against: tally.against })
            }
        };

        let appealable = self.instance == Instance::First;
        let appeal_deadline =
            appealable.then(|| add_business_days(now, appeal_window_business_days));

        self.transition(JudgmentStatus::Decided, now, format!("Decision: {outcome}"));
        tracing::debug!(judgment_id = %self.id, %outcome, unanimous = tally.unanimous, "session decided");
        Ok(&*self.decision.insert(Decision {
            outcome,
            reasoning,
            decided_at: now,
            tally,
            unanimous: tally.unanimous,
            appealable,
            appeal_deadline,
        }))
    }

    /// Annul a recorded decision (DECIDED → ANNULLED).
    ///
    /// The tally and reasoning stay on record; only the outcome is replaced
    /// by the annulment sentinel.
    pub fn annul(&mut self, now: Timestamp, reason: impl Into<String>) -> Result<(), JudgmentError> {
        if self.status != JudgmentStatus::Decided {
            return Err(self.invalid(JudgmentStatus::Annulled));
        }
        let reason = reason.into();
        if reason.trim().is_empty() {
            return Err(JudgmentError::Validation("annulment requires a reason".to_string()));
        }
        if let Some(decision) = &mut self.decision {
            decision.outcome = DecisionOutcome::Annulled;
            decision.appealable = false;
            decision.appeal_deadline = None;
        }
        self.transition(JudgmentStatus::Annulled, now, reason);
        Ok(())
    }

    fn transition(&mut self, to: JudgmentStatus, at: Timestamp, note: String) {
        self.transitions.push(JudgmentTransition {
            from_status: self.status,
            to_status: to,
            at,
            note,
        });
        self.status = to;
    }

    fn invalid(&self, to: JudgmentStatus) -> JudgmentError {
        JudgmentError::InvalidTransition { from: self.status, to }
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// Session identifier.
    pub fn id(&self) -> JudgmentId {
        self.id
    }

    /// The case under judgment.
    pub fn case_id(&self) -> CaseId {
        self.case_id
    }

    /// The sitting committee.
    pub fn committee_id(&self) -> CommitteeId {
        self.committee_id
    }

    /// Which instance this session decides at.
    pub fn instance(&self) -> Instance {
        self.instance
    }

    /// The relator (reporting member).
    pub fn relator(&self) -> MemberId {
        self.relator
    }

    /// Scheduled sitting date (updated on adjournment).
    pub fn scheduled_for(&self) -> Timestamp {
        self.scheduled_for
    }

    /// Current status.
    pub fn status(&self) -> JudgmentStatus {
        self.status
    }

    /// The votes cast so far.
    pub fn ballots(&self) -> &BallotBox {
        &self.ballots
    }

    /// The decision, once taken.
    pub fn decision(&self) -> Option<&Decision> {
        self.decision.as_ref()
    }

    /// The session's transition log.
    pub fn transitions(&self) -> &[JudgmentTransition] {
        &self.transitions
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
