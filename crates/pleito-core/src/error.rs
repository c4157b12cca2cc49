//! # Error Types — Core Construction Failures
//!
//! Errors raised by the foundational types in this crate. Workflow-level
//! business errors (invalid transitions, missed deadlines, quorum failures)
//! live with the state machines that raise them — each adjudication crate
//! defines its own `thiserror` enum.

use thiserror::Error;

/// Errors from constructing or parsing core types.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A timestamp string was malformed or used a non-UTC offset.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// A protocol number component was out of range.
    #[error("invalid protocol number: {0}")]
    InvalidProtocol(String),
}
