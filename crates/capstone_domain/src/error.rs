//! Error types for the domain crate.

use thiserror::Error;

use crate::roster::RosterDenied;

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

/// Errors raised by domain rules.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("{0}")]
    Roster(#[from] RosterDenied),

    #[error("Team {team_id} has an inconsistent roster: {message}")]
    InconsistentRoster { team_id: i64, message: String },

    #[error("Semester {0} is ended and can no longer be edited")]
    SemesterLocked(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),
}
