//! Alerts shown after an action.

use std::fmt;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// A modal-style message: short title plus body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, "Success", message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, "Info", message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, "Warning", message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, "Error", message)
    }
}

impl From<&AppError> for Notice {
    fn from(err: &AppError) -> Self {
        match err {
            AppError::Validation(_) => {
                Notice::new(NoticeLevel::Warning, "Invalid input", err.user_message())
            }
            AppError::Denied(_) | AppError::NotAllowed(_) => {
                Notice::new(NoticeLevel::Warning, "Not allowed", err.user_message())
            }
            AppError::Cancelled => Notice::info(err.user_message()),
            _ => Notice::error(err.user_message()),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use capstone_api::ApiError;
    use capstone_domain::{RosterDenied, LEADER_LEAVE_MESSAGE};

    #[test]
    fn test_leader_leave_notice() {
        let notice = Notice::from(&AppError::Denied(RosterDenied::LeaderCannotLeave));
        assert_eq!(notice.level, NoticeLevel::Warning);
        assert_eq!(notice.message, LEADER_LEAVE_MESSAGE);
    }

    #[test]
    fn test_api_notice_uses_backend_message() {
        let err = AppError::Api(ApiError::Http {
            status: 409,
            message: "Semester code already exists".into(),
        });
        let notice = Notice::from(&err);
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.message, "Semester code already exists");
    }
}
