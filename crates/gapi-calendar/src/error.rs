//! Calendar-specific error types.

use gapi_auth::AuthError;
use thiserror::Error;

use crate::event_time::ValidationErrors;

#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("Invalid event dates: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Authentication required")]
    AuthRequired,

    #[error("Token expired")]
    TokenExpired,

    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid event data: {0}")]
    InvalidEventData(String),

    #[error("Conflict: resource was modified")]
    Conflict,

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Credentials error: {0}")]
    Auth(#[from] AuthError),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
}

impl CalendarError {
    /// User-friendly error message for UI display.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(errors) => format!("Invalid event: {}", errors),
            Self::AuthRequired => "The service account has no access to this calendar".to_string(),
            Self::TokenExpired => "Credentials were rejected. Check the key file.".to_string(),
            Self::RateLimited(secs) => format!("Too many requests. Please wait {} seconds.", secs),
            Self::NotFound(_) => "Calendar or event not found".to_string(),
            Self::InvalidEventData(msg) => format!("Unreadable event from the API: {}", msg),
            Self::Conflict => "The calendar was modified elsewhere. Please refresh.".to_string(),
            Self::ApiError(msg) => format!("Calendar error: {}", msg),
            Self::Auth(e) => e.user_message().to_string(),
            Self::NetworkError(_) => "Network error. Check your connection.".to_string(),
        }
    }

    /// Whether the caller may retry the same request later. Nothing here retries.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited(_) | Self::NetworkError(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_user_messages() {
        let err = CalendarError::RateLimited(30);
        assert!(err.user_message().contains("30"));

        let err = CalendarError::Conflict;
        assert!(err.user_message().contains("modified"));

        let err = CalendarError::Auth(AuthError::MissingProjectId);
        assert!(err.user_message().contains("Failed to authenticate"));
    }

    #[test]
    fn test_validation_message_carries_fields() {
        let mut errors = ValidationErrors::default();
        errors.add("start date", "cannot specify both");
        let err = CalendarError::from(errors);
        assert!(err.to_string().contains("start date: cannot specify both"));
        assert!(err.user_message().contains("start date"));
    }

    #[test]
    fn test_is_retryable() {
        assert!(CalendarError::RateLimited(10).is_retryable());
        assert!(!CalendarError::NotFound("x".into()).is_retryable());
        assert!(!CalendarError::Validation(ValidationErrors::default()).is_retryable());
    }
}
