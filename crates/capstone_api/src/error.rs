//! Error types for the API client.

use thiserror::Error;

/// Shown when a failure carries no message of its own.
pub const GENERIC_ERROR_MESSAGE: &str = "An unexpected error occurred. Please try again.";

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors that can occur while talking to the portal backend.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request failed with status {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Not signed in")]
    NotAuthenticated,

    #[error("Session expired, please sign in again")]
    SessionExpired,

    #[error("Invalid session token: {0}")]
    InvalidToken(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ApiError {
    /// Message suitable for an alert.
    ///
    /// Backend messages are passed through verbatim; everything else falls
    /// back to a generic message.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Http { message, .. }
            | ApiError::NotFound(message)
            | ApiError::Unauthorized(message)
            | ApiError::Forbidden(message)
                if !message.trim().is_empty() =>
            {
                message.clone()
            }
            ApiError::NotAuthenticated | ApiError::SessionExpired => self.to_string(),
            _ => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::NotFound(_) => Some(404),
            ApiError::Unauthorized(_) => Some(401),
            ApiError::Forbidden(_) => Some(403),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }

    /// The session is missing, expired or rejected by the backend.
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            ApiError::NotAuthenticated
                | ApiError::SessionExpired
                | ApiError::InvalidToken(_)
                | ApiError::Unauthorized(_)
        )
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

impl From<toml::de::Error> for ApiError {
    fn from(err: toml::de::Error) -> Self {
        ApiError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_message_passthrough() {
        let err = ApiError::Http {
            status: 400,
            message: "Semester code already exists".into(),
        };
        assert_eq!(err.user_message(), "Semester code already exists");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn test_generic_fallback() {
        let err = ApiError::Network("connection refused".into());
        assert_eq!(err.user_message(), GENERIC_ERROR_MESSAGE);

        let err = ApiError::Http {
            status: 500,
            message: "  ".into(),
        };
        assert_eq!(err.user_message(), GENERIC_ERROR_MESSAGE);
    }
}
