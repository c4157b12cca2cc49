//! # Appeals
//!
//! The recurso against a first-instance decision, filed within the appeal
//! window and answered by the opposing party's contrarrazões before the
//! second-instance session is seized.
//!
//! ```text
//! Filed ──▶ AwaitingCounterArgument ──▶ CounterArgumentReceived ──▶ AwaitingJudgment
//!                     │                                                  ▲
//!                     └── (deadline lapses without an answer) ───────────┘
//! ```
//!
//! Filing exactly at the appeal-deadline instant is in time; one second
//! later is not. A lapsed counter-argument window does not block the appeal:
//! the case proceeds to second instance without the answer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use pleito_core::{
    add_business_days, is_expired, AppealId, CaseId, CommitteeId, JudgmentId, MemberId, Timestamp,
};

use crate::judgment::{Instance, JudgmentProcess, JudgmentStatus};

// ─── Status ──────────────────────────────────────────────────────────

/// Lifecycle status of an appeal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppealStatus {
    /// Appeal filed within the window.
    Filed,
    /// Opposing party notified; counter-argument window open.
    AwaitingCounterArgument,
    /// Counter-argument received in time.
    CounterArgumentReceived,
    /// Ready for (or under) second-instance judgment.
    AwaitingJudgment,
}

impl std::fmt::Display for AppealStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Filed => "FILED",
            Self::AwaitingCounterArgument => "AWAITING_COUNTER_ARGUMENT",
            Self::CounterArgumentReceived => "COUNTER_ARGUMENT_RECEIVED",
            Self::AwaitingJudgment => "AWAITING_JUDGMENT",
        };
        f.write_str(s)
    }
}

/// The opposing party's answer to the appeal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterArgument {
    /// Who answered.
    pub author: MemberId,
    /// The answer text.
    pub text: String,
    /// When it was received.
    pub received_at: Timestamp,
}

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors raised by appeal operations.
#[derive(Error, Debug)]
pub enum AppealError {
    /// An appeal can only be taken against a decided judgment.
    #[error("judgment {judgment_id} has no decision to appeal")]
    JudgmentNotDecided {
        /// The session.
        judgment_id: JudgmentId,
    },

    /// The decision does not admit an appeal.
    #[error("the decision of judgment {judgment_id} is not appealable")]
    NotAppealable {
        /// The session.
        judgment_id: JudgmentId,
    },

    /// The appeal window closed before the filing.
    #[error("appeal window expired at {deadline}")]
    AppealWindowExpired {
        /// End of the window.
        deadline: Timestamp,
    },

    /// The appeal is not in the state the operation requires.
    #[error("invalid appeal transition: {from} -> {to}")]
    InvalidTransition {
        /// Current status.
        from: AppealStatus,
        /// Attempted target status.
        to: AppealStatus,
    },

    /// The counter-argument arrived after its window closed.
    #[error("counter-argument deadline expired at {deadline}")]
    DeadlineExpired {
        /// End of the window.
        deadline: Timestamp,
    },

    /// The appeal cannot be sent to judgment yet: the counter-argument
    /// window is still open and unanswered.
    #[error("counter-argument window open until {deadline}; not ready for judgment")]
    NotReady {
        /// End of the window.
        deadline: Timestamp,
    },

    /// A second-instance session has already been seized for this appeal.
    #[error("second instance already opened for appeal {appeal_id}")]
    SecondInstanceAlreadyOpened {
        /// The appeal.
        appeal_id: AppealId,
    },

    /// Mandatory data missing or malformed.
    #[error("validation error: {0}")]
    Validation(String),
}

// ─── Appeal Process ──────────────────────────────────────────────────

/// One appeal against one first-instance judgment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppealProcess {
    id: AppealId,
    judgment_id: JudgmentId,
    case_id: CaseId,
    committee_id: CommitteeId,
    appellant: MemberId,
    filed_at: Timestamp,
    reasoning: String,
    status: AppealStatus,
    counter_argument_deadline: Timestamp,
    counter_argument: Option<CounterArgument>,
    second_instance: Option<JudgmentId>,
}

impl AppealProcess {
    /// File an appeal against a decided, appealable judgment.
    ///
    /// Valid only while the appeal window is open; the deadline instant
    /// itself is in time. Opens the counter-argument window of
    /// `counter_argument_business_days` from the filing instant.
    pub fn file(
        judgment: &JudgmentProcess,
        appellant: MemberId,
        reasoning: impl Into<String>,
        now: Timestamp,
        counter_argument_business_days: u32,
    ) -> Result<Self, AppealError> {
        if judgment.status() != JudgmentStatus::Decided {
            return Err(AppealError::JudgmentNotDecided { judgment_id: judgment.id() });
        }
        let decision = judgment
            .decision()
            .ok_or(AppealError::JudgmentNotDecided { judgment_id: judgment.id() })?;
        if judgment.instance() == Instance::Second || !decision.appealable {
            return Err(AppealError::NotAppealable { judgment_id: judgment.id() });
        }
        let deadline = decision
            .appeal_deadline
            .ok_or(AppealError::NotAppealable { judgment_id: judgment.id() })?;
        if is_expired(now, deadline) {
            return Err(AppealError::AppealWindowExpired { deadline });
        }
        let reasoning = reasoning.into();
        if reasoning.trim().is_empty() {
            return Err(AppealError::Validation("an appeal requires a reasoning text".to_string()));
        }

        let appeal = Self {
            id: AppealId::new(),
            judgment_id: judgment.id(),
            case_id: judgment.case_id(),
            committee_id: judgment.committee_id(),
            appellant,
            filed_at: now,
            reasoning,
            status: AppealStatus::Filed,
            counter_argument_deadline: add_business_days(now, counter_argument_business_days),
            counter_argument: None,
            second_instance: None,
        };
        tracing::debug!(appeal_id = %appeal.id, case_id = %appeal.case_id, "appeal filed");
        Ok(appeal)
    }

    /// Notify the opposing party (FILED → AWAITING_COUNTER_ARGUMENT).
    pub fn request_counter_argument(&mut self) -> Result<(), AppealError> {
        if self.status != AppealStatus::Filed {
            return Err(self.invalid(AppealStatus::AwaitingCounterArgument));
        }
        self.status = AppealStatus::AwaitingCounterArgument;
        Ok(())
    }

    /// Receive the counter-argument within its window
    /// (AWAITING_COUNTER_ARGUMENT → COUNTER_ARGUMENT_RECEIVED).
    pub fn receive_counter_argument(
        &mut self,
        author: MemberId,
        text: impl Into<String>,
        now: Timestamp,
    ) -> Result<(), AppealError> {
        if self.status != AppealStatus::AwaitingCounterArgument {
            return Err(self.invalid(AppealStatus::CounterArgumentReceived));
        }
        let text = text.into();
        if text.trim().is_empty() {
            return Err(AppealError::Validation("counter-argument must not be blank".to_string()));
        }
        if is_expired(now, self.counter_argument_deadline) {
            return Err(AppealError::DeadlineExpired { deadline: self.counter_argument_deadline });
        }
        self.counter_argument = Some(CounterArgument { author, text, received_at: now });
        self.status = AppealStatus::CounterArgumentReceived;
        Ok(())
    }

    /// Whether the appeal may be sent to second-instance judgment: either
    /// the counter-argument arrived, or its window lapsed unanswered.
    pub fn ready_for_judgment(&self, now: Timestamp) -> bool {
        match self.status {
            AppealStatus::CounterArgumentReceived | AppealStatus::AwaitingJudgment => true,
            AppealStatus::AwaitingCounterArgument => {
                is_expired(now, self.counter_argument_deadline)
            }
            AppealStatus::Filed => false,
        }
    }

    /// Move the appeal to AWAITING_JUDGMENT once it is ready.
    pub fn mark_awaiting_judgment(&mut self, now: Timestamp) -> Result<(), AppealError> {
        if self.status == AppealStatus::AwaitingJudgment {
            return Ok(());
        }
        if !self.ready_for_judgment(now) {
            if self.status == AppealStatus::AwaitingCounterArgument {
                return Err(AppealError::NotReady { deadline: self.counter_argument_deadline });
            }
            return Err(self.invalid(AppealStatus::AwaitingJudgment));
        }
        self.status = AppealStatus::AwaitingJudgment;
        Ok(())
    }

    /// Seize the second instance (AWAITING_JUDGMENT only, once only).
    ///
    /// Returns the new session; its decisions are final.
    pub fn open_second_instance(
        &mut self,
        relator: MemberId,
        scheduled_for: Timestamp,
    ) -> Result<JudgmentProcess, AppealError> {
        if self.status != AppealStatus::AwaitingJudgment {
            return Err(self.invalid(AppealStatus::AwaitingJudgment));
        }
        if self.second_instance.is_some() {
            return Err(AppealError::SecondInstanceAlreadyOpened { appeal_id: self.id });
        }
        let session = JudgmentProcess::new(
            self.case_id,
            self.committee_id,
            Instance::Second,
            relator,
            scheduled_for,
        );
        self.second_instance = Some(session.id());
        Ok(session)
    }

    fn invalid(&self, to: AppealStatus) -> AppealError {
        AppealError::InvalidTransition { from: self.status, to }
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// Appeal identifier.
    pub fn id(&self) -> AppealId {
        self.id
    }

    /// The appealed judgment.
    pub fn judgment_id(&self) -> JudgmentId {
        self.judgment_id
    }

    /// The underlying case.
    pub fn case_id(&self) -> CaseId {
        self.case_id
    }

    /// The committee competent for the second instance.
    pub fn committee_id(&self) -> CommitteeId {
        self.committee_id
    }

    /// Who appealed.
    pub fn appellant(&self) -> MemberId {
        self.appellant
    }

    /// When the appeal was filed.
    pub fn filed_at(&self) -> Timestamp {
        self.filed_at
    }

    /// The appellant's reasoning.
    pub fn reasoning(&self) -> &str {
        &self.reasoning
    }

    /// Current status.
    pub fn status(&self) -> AppealStatus {
        self.status
    }

    /// End of the counter-argument window.
    pub fn counter_argument_deadline(&self) -> Timestamp {
        self.counter_argument_deadline
    }

    /// The counter-argument, if one arrived.
    pub fn counter_argument(&self) -> Option<&CounterArgument> {
        self.counter_argument.as_ref()
    }

    /// The second-instance session, once seized.
    pub fn second_instance(&self) -> Option<JudgmentId> {
        self.second_instance
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
