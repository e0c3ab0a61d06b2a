//! Sheets-specific error types.

use gapi_auth::AuthError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SheetsError {
    #[error("Authentication required")]
    AuthRequired,

    #[error("Token expired")]
    TokenExpired,

    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    #[error("Spreadsheet not found: {0}")]
    SpreadsheetNotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Credentials error: {0}")]
    Auth(#[from] AuthError),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
}

impl SheetsError {
    /// User-friendly error message for UI display.
    pub fn user_message(&self) -> String {
        match self {
            Self::AuthRequired => {
                "The service account has no access to this spreadsheet".to_string()
            }
            Self::TokenExpired => "Credentials were rejected. Check the key file.".to_string(),
            Self::RateLimited(secs) => format!("Too many requests. Please wait {} seconds.", secs),
            Self::SpreadsheetNotFound(_) => "Spreadsheet not found".to_string(),
            Self::BadRequest(msg) => format!("Invalid request: {}", msg),
            Self::ApiError(msg) => format!("Sheets error: {}", msg),
            Self::Auth(e) => e.user_message().to_string(),
            Self::NetworkError(_) => "Network error. Check your connection.".to_string(),
        }
    }

    /// Whether the caller may retry the same request later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited(_) | Self::NetworkError(_))
    }
}
