//! # pleito-case — Case Aggregate and Workflow
//!
//! The procedural heart of the adjudication engine:
//!
//! - **Record** (`record.rs`): the [`CaseRecord`] aggregate with its
//!   append-only transition history, audit stamp, and optimistic version
//!   counter. Fields are private; mutation flows exclusively through the
//!   workflow.
//!
//! - **Workflow** (`workflow.rs`): the [`CaseWorkflow`] state machine
//!   carrying a case from filing through admissibility, defense, evidence,
//!   hearing, closing arguments, judgment, appeal, and archival. Deadlines
//!   are computed from the configured [`StatutoryWindows`] via the injected
//!   clock.
//!
//! - **Events** (`event.rs`): [`DomainEvent`] payloads emitted through the
//!   [`EventSink`] seam on every transition that the outside world cares
//!   about.
//!
//! ## Crate Policy
//!
//! - All time flows through the injected [`pleito_core::Clock`].
//! - A rejected transition leaves the record byte-for-byte unchanged.

pub mod event;
pub mod record;
pub mod workflow;

pub use event::{DomainEvent, EventSink, NullEventSink, RecordingEventSink, TracingEventSink};
pub use record::{
    AdmissibilityRuling, AuditStamp, CaseDecision, CaseFiling, CaseHistoryEntry, CaseRecord,
    CaseStatus, CaseTarget, Defense, EvidencePeriod, Hearing,
};
pub use workflow::{CaseError, CaseWorkflow, StatutoryWindows};
