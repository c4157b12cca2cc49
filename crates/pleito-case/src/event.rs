//! # Domain Events
//!
//! The workflow's responsibility ends at emitting an event with its payload
//! (case id, new status, relevant deadline). Notification rendering and
//! delivery belong to an external collaborator consuming the sink.

use std::sync::Mutex;

use serde::Serialize;

use pleito_core::{CaseId, Timestamp};

/// An event raised by a case transition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DomainEvent {
    /// A case was filed and a protocol assigned.
    CaseFiled {
        /// The new case.
        case_id: CaseId,
        /// Rendered protocol (`DEN/2024/000042`).
        protocol: String,
    },
    /// Admissibility was ruled.
    AdmissibilityRuled {
        /// The case.
        case_id: CaseId,
        /// Whether it was admitted.
        admissible: bool,
    },
    /// The target was notified to present a defense.
    DefenseRequested {
        /// The case.
        case_id: CaseId,
        /// End of the defense window.
        deadline: Timestamp,
    },
    /// A defense was received in time.
    DefenseReceived {
        /// The case.
        case_id: CaseId,
    },
    /// The evidence-production period opened.
    EvidencePeriodOpened {
        /// The case.
        case_id: CaseId,
        /// When the period closes.
        closes_at: Timestamp,
    },
    /// An instruction hearing was scheduled.
    HearingScheduled {
        /// The case.
        case_id: CaseId,
        /// Hearing date.
        date: Timestamp,
    },
    /// The closing-arguments window opened.
    ClosingArgumentsOpened {
        /// The case.
        case_id: CaseId,
        /// End of the window.
        deadline: Timestamp,
    },
    /// Closing arguments were received; the case awaits judgment.
    SentToJudgment {
        /// The case.
        case_id: CaseId,
    },
    /// A judgment was decided and recorded on the case.
    JudgmentDecided {
        /// The case.
        case_id: CaseId,
        /// Rendered outcome.
        outcome: String,
        /// Whether an appeal lies.
        appealable: bool,
        /// End of the appeal window, when appealable.
        appeal_deadline: Option<Timestamp>,
    },
    /// An appeal was filed; the case moved to second instance.
    AppealFiled {
        /// The case.
        case_id: CaseId,
        /// End of the counter-argument window.
        counter_argument_deadline: Timestamp,
    },
    /// A counter-argument (contrarrazão) was received.
    CounterArgumentReceived {
        /// The case.
        case_id: CaseId,
    },
    /// The case was archived.
    CaseArchived {
        /// The case.
        case_id: CaseId,
        /// Why it was closed.
        reason: String,
    },
}

/// Consumer of domain events, injected into each workflow component at
/// construction.
pub trait EventSink: Send + Sync {
    /// Receive one event. Must not fail — delivery guarantees are the
    /// consumer's concern.
    fn emit(&self, event: DomainEvent);
}

/// Sink that logs each event through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&self, event: DomainEvent) {
        tracing::info!(?event, "domain event");
    }
}

/// Sink that drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullEventSink;

impl EventSink for NullEventSink {
    fn emit(&self, _event: DomainEvent) {}
}

/// Sink that records events for inspection in tests.
#[derive(Debug, Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<DomainEvent>>,
}

impl RecordingEventSink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events emitted so far.
    pub fn events(&self) -> Vec<DomainEvent> {
        self.events.lock().expect("event sink lock poisoned").clone()
    }

    /// Drain the recorded events.
    pub fn take(&self) -> Vec<DomainEvent> {
        std::mem::take(&mut *self.events.lock().expect("event sink lock poisoned"))
    }
}

impl EventSink for RecordingEventSink {
    fn emit(&self, event: DomainEvent) {
        self.events.lock().expect("event sink lock poisoned").push(event);
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
