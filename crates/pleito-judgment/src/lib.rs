//! # pleito-judgment — Collegiate Decisions and Appeals
//!
//! The deciding end of the adjudication engine:
//!
//! - **Judgment** (`judgment.rs`): the [`JudgmentProcess`] session state
//!   machine. Votes collect in a duplicate-rejecting ballot box; the
//!   decision outcome is computed from the tally and the configured
//!   tie-break policy, never supplied by a caller.
//!
//! - **Appeal** (`appeal.rs`): the [`AppealProcess`] from a timely filing
//!   through the counter-argument window to the second-instance session.
//!
//! - **Adjudication** (`adjudication.rs`): the orchestrator wiring
//!   sessions and appeals back into the case workflow, with the
//!   fresh-roster minimum-size check at every decision.
//!
//! ## Crate Policy
//!
//! - Quorum is always evaluated against the roster at decision time.
//! - A failed decision attempt leaves the session open and the case
//!   untouched.

pub mod adjudication;
pub mod appeal;
pub mod judgment;

pub use adjudication::{Adjudication, AdjudicationError};
pub use appeal::{AppealError, AppealProcess, AppealStatus, CounterArgument};
pub use judgment::{
    Decision, DecisionOutcome, Instance, JudgmentError, JudgmentProcess, JudgmentStatus,
    JudgmentTransition,
};
