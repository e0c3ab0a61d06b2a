//! Credential and token errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Failed to read key file: {0}")]
    KeyFileRead(#[from] std::io::Error),

    #[error("Failed to parse key file: {0}")]
    KeyFileParse(#[from] serde_json::Error),

    #[error("Failed to authenticate: key file has no project id")]
    MissingProjectId,

    #[error("Project id in key file ({found}) does not match the expected project id ({expected})")]
    ProjectMismatch { expected: String, found: String },

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Failed to sign assertion: {0}")]
    Signing(String),

    #[error("Token exchange failed: {0}")]
    TokenExchange(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl AuthError {
    /// User-friendly error message for display.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::KeyFileRead(_) => "The credentials file could not be read.",
            Self::KeyFileParse(_) => "The credentials file is not a valid service-account key.",
            Self::MissingProjectId => "Failed to authenticate. The credentials have no project.",
            Self::ProjectMismatch { .. } => "The credentials belong to a different project.",
            Self::InvalidPrivateKey(_) | Self::Signing(_) => {
                "The credentials private key is unusable."
            }
            Self::TokenExchange(_) => "Google rejected the credentials.",
            Self::Network(_) => "Network error. Check your connection.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_mismatch_message_names_both_projects() {
        let err = AuthError::ProjectMismatch {
            expected: "prod".into(),
            found: "staging".into(),
        };
        let text = err.to_string();
        assert!(text.contains("prod"));
        assert!(text.contains("staging"));
        assert!(err.user_message().contains("different project"));
    }

    #[test]
    fn test_missing_project_id_message() {
        assert!(AuthError::MissingProjectId
            .to_string()
            .contains("Failed to authenticate"));
    }
}
