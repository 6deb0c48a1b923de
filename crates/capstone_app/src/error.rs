//! Error types for portal workflows.

use thiserror::Error;

use capstone_api::ApiError;
use capstone_domain::{DomainError, RosterDenied};

/// Result type alias for workflow operations.
pub type AppResult<T> = Result<T, AppError>;

/// Errors surfaced to the user by a workflow.
#[derive(Error, Debug)]
pub enum AppError {
    /// Form validation failed; nothing was sent.
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Roster guard refused the action; nothing was sent.
    #[error("{0}")]
    Denied(#[from] RosterDenied),

    /// Any other client-side refusal; nothing was sent.
    #[error("{0}")]
    NotAllowed(String),

    #[error("Action cancelled")]
    Cancelled,

    #[error("A submission is already in progress")]
    Busy,

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl AppError {
    /// Text for an alert dialog.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Api(e) => e.user_message(),
            AppError::Validation(errors) => errors.join("\n"),
            other => other.to_string(),
        }
    }

    /// The action was stopped before any request was made.
    pub fn is_client_side(&self) -> bool {
        matches!(
            self,
            AppError::Validation(_)
                | AppError::Denied(_)
                | AppError::NotAllowed(_)
                | AppError::Cancelled
                | AppError::Busy
        )
    }
}
