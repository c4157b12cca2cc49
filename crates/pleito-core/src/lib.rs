//! # pleito-core — Foundational Types for the Adjudication Engine
//!
//! Bedrock crate of the pleito workspace. Defines the primitives every
//! other crate builds on; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** `CaseId`, `MemberId`,
//!    `SlateId`, `CommitteeId`, `JudgmentId`, `AppealId` — validated
//!    constructors, no bare strings or UUIDs crossing crate boundaries.
//!
//! 2. **UTC-only timestamps.** The `Timestamp` type enforces UTC with
//!    seconds precision; non-UTC inputs are rejected at construction.
//!
//! 3. **Injected clock.** No business method reads the system clock
//!    directly — components hold a `Clock` and pass observed instants down.
//!
//! 4. **Deadlines are data.** `deadline` computes statutory windows as pure
//!    functions of `(start, n, calendar)`; expiry is a comparison against a
//!    stored instant, never a running timer.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `pleito-*` crates (leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All persistent types derive `Debug`, `Clone`, `Serialize`/`Deserialize`.

pub mod deadline;
pub mod error;
pub mod identity;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use deadline::{
    add_business_days, add_business_days_with, add_calendar_days, is_expired, BusinessCalendar,
    WeekdayCalendar,
};
pub use error::CoreError;
pub use identity::{
    AppealId, CaseId, CaseKind, CommitteeId, JudgmentId, MemberId, ProtocolNumber, SlateId,
};
pub use temporal::{Clock, FixedClock, SystemClock, Timestamp};
